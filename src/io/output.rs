use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::segment_label;
use crate::pipeline::DocumentResult;

/// Stage 1 table row: Initial Coding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage1Row {
    #[serde(rename = "Segment_ID")]
    pub segment_id: String,
    #[serde(rename = "Interview_Text")]
    pub interview_text: String,
    #[serde(rename = "Initial_Code")]
    pub initial_code: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Stage 2 table row: Code Grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage2Row {
    #[serde(rename = "Group_ID")]
    pub group_id: String,
    #[serde(rename = "Group_Title")]
    pub group_title: String,
    #[serde(rename = "Codes_Included")]
    pub codes_included: String,
    #[serde(rename = "Segment_IDs")]
    pub segment_ids: String,
    #[serde(rename = "Number_of_Codes")]
    pub number_of_codes: usize,
}

/// Stage 3 table row: Thematic Framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage3Row {
    #[serde(rename = "Research_Question")]
    pub research_question: String,
    #[serde(rename = "Main_Theme")]
    pub main_theme: String,
    #[serde(rename = "Sub_Theme")]
    pub sub_theme: String,
    #[serde(rename = "Supporting_Code")]
    pub supporting_code: String,
    #[serde(rename = "Supporting_Quote")]
    pub supporting_quote: String,
    #[serde(rename = "Segment_ID")]
    pub segment_id: String,
}

/// The three tables handed to the export side
#[derive(Debug, Clone, Default)]
pub struct DocumentTables {
    pub stage1: Vec<Stage1Row>,
    pub stage2: Vec<Stage2Row>,
    pub stage3: Vec<Stage3Row>,
}

impl DocumentTables {
    pub fn from_result(result: &DocumentResult) -> Self {
        let stage1 = result
            .segments
            .iter()
            .map(|s| Stage1Row {
                segment_id: s.label(),
                interview_text: s.text.clone(),
                initial_code: s.code.clone(),
                notes: s.notes(),
            })
            .collect();

        let stage2 = result
            .groups
            .iter()
            .map(|g| Stage2Row {
                group_id: g.group_id.clone(),
                group_title: g.title.clone(),
                codes_included: g.codes.join(", "),
                segment_ids: g
                    .segment_ids
                    .iter()
                    .map(|&id| segment_label(id))
                    .collect::<Vec<_>>()
                    .join(", "),
                number_of_codes: g.count(),
            })
            .collect();

        let stage3 = result
            .themes
            .iter()
            .map(|t| Stage3Row {
                research_question: t.research_question.clone(),
                main_theme: t.main_theme.clone(),
                sub_theme: t.sub_theme.clone(),
                supporting_code: t.supporting_code.clone(),
                supporting_quote: t.supporting_quote.clone(),
                segment_id: segment_label(t.segment_id),
            })
            .collect();

        Self {
            stage1,
            stage2,
            stage3,
        }
    }
}

/// Write rows to a pretty JSON file
pub fn write_json<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, rows).context("Failed to write JSON")?;
    Ok(())
}

/// Plain-text rendering of the three tables
pub struct TextReport<'a> {
    document_id: &'a str,
    tables: &'a DocumentTables,
}

impl<'a> TextReport<'a> {
    pub fn new(document_id: &'a str, tables: &'a DocumentTables) -> Self {
        Self {
            document_id,
            tables,
        }
    }

    pub fn format(&self) -> String {
        let mut output = format!("Qualitative coding report: {}\n\n", self.document_id);

        output.push_str(&format!("Stage 1: Initial Coding ({} segments)\n", self.tables.stage1.len()));
        for row in &self.tables.stage1 {
            output.push_str(&format!("[{}] {}\n", row.segment_id, row.initial_code));
            output.push_str(&indent(&wrap_text(&row.interview_text, 76)));
            if !row.notes.is_empty() {
                output.push_str(&format!("    ({})\n", row.notes));
            }
        }

        output.push_str(&format!("\nStage 2: Code Grouping ({} groups)\n", self.tables.stage2.len()));
        for row in &self.tables.stage2 {
            output.push_str(&format!(
                "{} {} [{} segments]\n",
                row.group_id, row.group_title, row.number_of_codes
            ));
            output.push_str(&indent(&wrap_text(&format!("Codes: {}", row.codes_included), 76)));
            output.push_str(&indent(&wrap_text(&format!("Segments: {}", row.segment_ids), 76)));
        }

        output.push_str(&format!("\nStage 3: Thematic Framework ({} entries)\n", self.tables.stage3.len()));
        let mut current_theme: Option<&str> = None;
        for row in &self.tables.stage3 {
            if current_theme != Some(row.main_theme.as_str()) {
                output.push_str(&format!("{}\n  RQ: {}\n", row.main_theme, row.research_question));
                current_theme = Some(row.main_theme.as_str());
            }
            output.push_str(&format!("  [{}] {}\n", row.segment_id, row.supporting_code));
            output.push_str(&indent(&wrap_text(&row.supporting_quote, 76)));
        }

        output
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("    {}\n", line)).collect()
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}

/// Timestamp used in output folder names
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Create `<base>/<name>_<timestamp>/`
pub fn make_output_folder(base: &Path, name: &str, timestamp: &str) -> Result<PathBuf> {
    let dir = base.join(format!("{}_{}", name, timestamp));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    Ok(dir)
}

/// Files written for one document
#[derive(Debug, Clone, Default)]
pub struct WrittenOutputs {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Write a document's non-empty tables and its text report into
/// `<output>/<document_id>_<timestamp>/`
pub fn write_document_outputs(
    result: &DocumentResult,
    output: &Path,
    timestamp: &str,
) -> Result<WrittenOutputs> {
    let id = result.document_id.as_str();
    let folder = make_output_folder(output, id, timestamp)?;
    let tables = DocumentTables::from_result(result);
    let mut files = Vec::new();

    if !tables.stage1.is_empty() {
        let path = folder.join(format!("{}_Stage1_Initial_Coding.json", id));
        write_json(&tables.stage1, &path)?;
        files.push(path);
    }
    if !tables.stage2.is_empty() {
        let path = folder.join(format!("{}_Stage2_Code_Grouping.json", id));
        write_json(&tables.stage2, &path)?;
        files.push(path);
    }
    if !tables.stage3.is_empty() {
        let path = folder.join(format!("{}_Stage3_Thematic_Framework.json", id));
        write_json(&tables.stage3, &path)?;
        files.push(path);
    }

    let report_path = folder.join(format!("{}_report.txt", id));
    TextReport::new(id, &tables).write_file(&report_path)?;
    files.push(report_path);

    Ok(WrittenOutputs { folder, files })
}
