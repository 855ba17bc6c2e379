use tracing::info;

use crate::heuristics::fallback_code;
use crate::models::{Codebook, Segment};

use super::stage0_segment::{segment_speakers, split_into_sentences, SegmenterConfig};

/// Configuration for Stage 1 coding
#[derive(Debug, Clone)]
pub struct CodingConfig {
    /// Project vocabulary checked before the codebook, in priority order
    pub domain_keywords: Vec<String>,
    /// Sentences shorter than this (in chars) are not coded
    pub min_sentence_chars: usize,
}

impl Default for CodingConfig {
    fn default() -> Self {
        Self {
            domain_keywords: Vec::new(),
            min_sentence_chars: 15,
        }
    }
}

/// Where a code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    DomainKeyword,
    Codebook,
    Fallback,
}

/// Code chosen for one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAssignment {
    pub code: String,
    /// Set only for domain keyword matches
    pub matched_keyword: Option<String>,
    pub source: CodeSource,
}

/// Label used for sentences matched by a domain keyword
pub fn domain_code_label(keyword: &str) -> String {
    format!("Domain-specific practice ({})", keyword)
}

/// Assign a code to a sentence.
///
/// Case-insensitive substring match, first hit wins: domain keywords in the
/// given order, then codebook entries (and their keywords) in declared
/// order, then the fallback heuristic.
pub fn code_sentence(
    sentence: &str,
    codebook: &Codebook,
    domain_keywords: &[String],
) -> CodeAssignment {
    let lower = sentence.to_lowercase();
    let contains =
        |keyword: &str| !keyword.trim().is_empty() && lower.contains(&keyword.to_lowercase());

    if let Some(kw) = domain_keywords.iter().find(|kw| contains(kw.as_str())) {
        return CodeAssignment {
            code: domain_code_label(kw),
            matched_keyword: Some(kw.clone()),
            source: CodeSource::DomainKeyword,
        };
    }

    for entry in codebook.entries() {
        if entry.keywords.iter().any(|kw| contains(kw.as_str())) {
            return CodeAssignment {
                code: entry.label.clone(),
                matched_keyword: None,
                source: CodeSource::Codebook,
            };
        }
    }

    CodeAssignment {
        code: fallback_code(&lower).to_string(),
        matched_keyword: None,
        source: CodeSource::Fallback,
    }
}

/// Result of Stage 1 coding
#[derive(Debug, Clone, Default)]
pub struct Stage1Result {
    /// Coded segments with dense ids starting at 1
    pub segments: Vec<Segment>,
    /// Number of participant blocks found
    pub blocks: usize,
    /// Sentences dropped for being too short
    pub sentences_dropped: usize,
}

/// Code participant blocks that were already segmented
pub fn code_blocks(blocks: &[String], codebook: &Codebook, config: &CodingConfig) -> Stage1Result {
    let mut segments = Vec::new();
    let mut sentences_dropped = 0;
    let mut next_id = 1u32;

    for block in blocks {
        for sentence in split_into_sentences(block) {
            if sentence.chars().count() < config.min_sentence_chars {
                sentences_dropped += 1;
                continue;
            }
            let assignment = code_sentence(&sentence, codebook, &config.domain_keywords);
            segments.push(Segment {
                id: next_id,
                text: sentence,
                code: assignment.code,
                matched_keyword: assignment.matched_keyword,
            });
            next_id += 1;
        }
    }

    Stage1Result {
        segments,
        blocks: blocks.len(),
        sentences_dropped,
    }
}

/// Execute Stage 1: initial coding
///
/// Extracts participant blocks, splits them into sentences and assigns one
/// code per sentence that passes the length filter.
pub fn execute_stage1(
    text: &str,
    segmenter: &SegmenterConfig,
    codebook: &Codebook,
    config: &CodingConfig,
) -> Stage1Result {
    let blocks = segment_speakers(text, segmenter);
    let result = code_blocks(&blocks, codebook, config);
    info!(
        "Stage 1: {} segments coded from {} blocks ({} short sentences dropped)",
        result.segments.len(),
        result.blocks,
        result.sentences_dropped
    );
    result
}
