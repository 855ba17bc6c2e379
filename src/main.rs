use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use qualcode::io::{load_research_questions, make_output_folder, timestamp_now};
use qualcode::{
    extract_text, load_codebook, parse_domain_keywords, process_document_as, segment_speakers,
    split_into_sentences, unique_document_ids, write_document_outputs, BatchSummary,
    CodingConfig, PipelineConfig, SegmenterConfig,
};

#[derive(Parser)]
#[command(name = "qualcode")]
#[command(author, version, about = "Three-stage qualitative coding for interview transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Code transcripts and write Stage 1-3 tables per document
    Process {
        /// Transcript files (.docx, .pdf, .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Base directory for results
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Project name used for the run folder
        #[arg(long, default_value = "project")]
        project_name: String,

        /// Codebook JSON file (label -> keyword list); built-in codebook if omitted
        #[arg(long)]
        codebook: Option<PathBuf>,

        /// Research question (repeatable)
        #[arg(long = "rq")]
        research_questions: Vec<String>,

        /// File with one research question per line
        #[arg(long)]
        rq_file: Option<PathBuf>,

        /// Domain keyword, or comma separated list (repeatable)
        #[arg(short = 'k', long = "domain-keyword")]
        domain_keywords: Vec<String>,

        /// File with domain keywords separated by commas or newlines
        #[arg(long)]
        domain_keyword_file: Option<PathBuf>,

        #[command(flatten)]
        segmenter: SegmenterArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show participant blocks and sentences without coding
    Segment {
        /// Transcript files (.docx, .pdf, .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        segmenter: SegmenterArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the active codebook as JSON
    Codebook {
        /// Codebook JSON file; built-in codebook if omitted
        #[arg(long)]
        codebook: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SegmenterArgs {
    /// Participant line prefix, e.g. "participant:" (repeatable, replaces defaults)
    #[arg(long = "participant-marker")]
    participant_markers: Vec<String>,

    /// Interviewer line prefix, e.g. "interviewer:" (repeatable, replaces defaults)
    #[arg(long = "interviewer-marker")]
    interviewer_markers: Vec<String>,

    /// Minimum participant block length in characters
    #[arg(long, default_value = "20")]
    min_block_chars: usize,
}

impl SegmenterArgs {
    fn into_config(self) -> SegmenterConfig {
        let defaults = SegmenterConfig::default();
        SegmenterConfig {
            participant_markers: if self.participant_markers.is_empty() {
                defaults.participant_markers
            } else {
                self.participant_markers
            },
            interviewer_markers: if self.interviewer_markers.is_empty() {
                defaults.interviewer_markers
            } else {
                self.interviewer_markers
            },
            min_block_chars: self.min_block_chars,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            inputs,
            output,
            project_name,
            codebook,
            research_questions,
            rq_file,
            domain_keywords,
            domain_keyword_file,
            segmenter,
            verbose,
        } => {
            setup_logging(verbose);

            let mut rqs: Vec<String> = research_questions
                .iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .collect();
            if let Some(path) = rq_file {
                rqs.extend(
                    load_research_questions(&path)
                        .with_context(|| format!("Failed to read research questions: {:?}", path))?,
                );
            }

            let mut keyword_entries = domain_keywords;
            if let Some(path) = domain_keyword_file {
                keyword_entries.push(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read domain keywords: {:?}", path))?,
                );
            }

            let config = PipelineConfig {
                segmenter: segmenter.into_config(),
                codebook: load_codebook(codebook.as_deref()),
                coding: CodingConfig {
                    domain_keywords: parse_domain_keywords(&keyword_entries),
                    ..Default::default()
                },
                research_questions: rqs,
                ..Default::default()
            };

            process_transcripts(&inputs, &output, &project_name, &config)
        }
        Commands::Segment {
            inputs,
            segmenter,
            verbose,
        } => {
            setup_logging(verbose);
            show_segments(&inputs, &segmenter.into_config());
            Ok(())
        }
        Commands::Codebook { codebook } => {
            setup_logging(false);
            let codebook = load_codebook(codebook.as_deref());
            println!("{}", serde_json::to_string_pretty(&codebook)?);
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process_transcripts(
    inputs: &[PathBuf],
    output: &Path,
    project_name: &str,
    config: &PipelineConfig,
) -> Result<()> {
    info!(
        "Codebook: {} labels, {} research questions, {} domain keywords",
        config.codebook.len(),
        config.research_questions.len(),
        config.coding.domain_keywords.len()
    );
    if config.research_questions.is_empty() {
        warn!("No research questions given; themes will be labelled \"(No RQ)\"");
    }

    let timestamp = timestamp_now();
    let run_folder = make_output_folder(output, project_name, &timestamp)?;
    info!("Writing results to {:?}", run_folder);

    let ids = unique_document_ids(inputs);
    let mut results = Vec::with_capacity(inputs.len());
    for (i, (input, id)) in inputs.iter().zip(&ids).enumerate() {
        info!("Processing {} ({}/{})", input.display(), i + 1, inputs.len());
        let result = process_document_as(input, id, config);

        match write_document_outputs(&result, &run_folder, &timestamp) {
            Ok(written) => info!(
                "{}: {} segments, {} groups, {} theme entries -> {:?}",
                result.document_id,
                result.segments.len(),
                result.groups.len(),
                result.themes.len(),
                written.folder
            ),
            Err(e) => warn!("Failed writing results for {}: {:#}", result.document_id, e),
        }
        results.push(result);
    }

    print_summary(&BatchSummary::from_results(&results));
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("Aggregate Analytics");
    println!("===================");
    println!(
        "Documents: {} ({} with coded segments)",
        summary.documents, summary.documents_coded
    );
    println!("Total segments analyzed: {}", summary.total_segments);
    println!("Unique codes identified: {}", summary.unique_codes);
    println!("Avg segments/file: {:.1}", summary.avg_segments_per_document);

    if !summary.top_codes.is_empty() {
        println!();
        println!("Top {} Initial Codes", summary.top_codes.len());
        println!("--------------------");
        for (code, count) in &summary.top_codes {
            println!("{:>4}  {}", count, code);
        }
    }
}

fn show_segments(inputs: &[PathBuf], config: &SegmenterConfig) {
    for input in inputs {
        println!("{}", input.display());
        println!("{}", "=".repeat(input.display().to_string().chars().count()));

        let text = extract_text(input);
        if text.is_empty() {
            println!("(no text)");
            println!();
            continue;
        }

        let blocks = segment_speakers(&text, config);
        for (i, block) in blocks.iter().enumerate() {
            println!("Block {}:", i + 1);
            for sentence in split_into_sentences(block) {
                println!("  - {}", sentence);
            }
        }
        println!("{} participant blocks", blocks.len());
        println!();
    }
}
