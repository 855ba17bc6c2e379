use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::io::try_extract_text;
use crate::models::{Codebook, Group, GroupTable, Segment, ThemeEntry, ThemeTable};
use crate::stages::{
    execute_stage1, execute_stage2, execute_stage3, CodingConfig, SegmenterConfig,
};

/// Everything one pipeline run needs. Immutable during the run and safe to
/// share between documents.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub segmenter: SegmenterConfig,
    pub codebook: Codebook,
    pub coding: CodingConfig,
    pub groups: GroupTable,
    pub themes: ThemeTable,
    pub research_questions: Vec<String>,
}

/// Outcome of processing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// At least one segment was coded
    Coded,
    /// The file could not be read or has an unsupported format
    ExtractionFailed(String),
    /// Extraction produced no text
    NoText,
    /// Text was present but no participant sentence qualified
    NoSegments,
}

/// Stage 1-3 output for one document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub document_id: String,
    pub status: DocumentStatus,
    pub segments: Vec<Segment>,
    pub groups: Vec<Group>,
    pub themes: Vec<ThemeEntry>,
}

impl DocumentResult {
    fn empty(document_id: &str, status: DocumentStatus) -> Self {
        Self {
            document_id: document_id.to_string(),
            status,
            segments: Vec::new(),
            groups: Vec::new(),
            themes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Run all three stages over already-extracted text.
///
/// Stages 2 and 3 both read the Stage 1 segments and are skipped when there
/// are none.
pub fn process_text(document_id: &str, text: &str, config: &PipelineConfig) -> DocumentResult {
    if text.trim().is_empty() {
        warn!("No text for {}", document_id);
        return DocumentResult::empty(document_id, DocumentStatus::NoText);
    }

    let stage1 = execute_stage1(text, &config.segmenter, &config.codebook, &config.coding);
    if stage1.segments.is_empty() {
        warn!("No participant segments found in {}", document_id);
        return DocumentResult::empty(document_id, DocumentStatus::NoSegments);
    }

    let stage2 = execute_stage2(&stage1.segments, &config.groups);
    let stage3 = execute_stage3(&stage1.segments, &config.themes, &config.research_questions);

    DocumentResult {
        document_id: document_id.to_string(),
        status: DocumentStatus::Coded,
        segments: stage1.segments,
        groups: stage2.groups,
        themes: stage3.entries,
    }
}

/// Document id used for outputs: the file stem
pub fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Document ids for a batch, in input order. Repeated stems (same file name
/// in different directories) get `_2`, `_3`, ... so their outputs stay apart.
pub fn unique_document_ids(paths: &[PathBuf]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let base = document_id(path);
            let mut id = base.clone();
            let mut n = 2;
            while taken.contains(&id) {
                id = format!("{}_{}", base, n);
                n += 1;
            }
            if id != base {
                warn!("Document id {:?} already used; writing {:?} as {:?}", base, path, id);
            }
            taken.insert(id.clone());
            id
        })
        .collect()
}

/// Extract and process one file. Failures resolve to an empty result.
pub fn process_document(path: &Path, config: &PipelineConfig) -> DocumentResult {
    process_document_as(path, &document_id(path), config)
}

/// Like [`process_document`], with an explicit document id
pub fn process_document_as(path: &Path, id: &str, config: &PipelineConfig) -> DocumentResult {
    info!("Processing {:?}", path);

    match try_extract_text(path) {
        Ok(text) => process_text(id, &text, config),
        Err(e) => {
            warn!("Extraction failed for {:?}: {}", path, e);
            DocumentResult::empty(id, DocumentStatus::ExtractionFailed(e.to_string()))
        }
    }
}

/// Process documents independently, in order
pub fn process_batch(paths: &[PathBuf], config: &PipelineConfig) -> Vec<DocumentResult> {
    paths
        .iter()
        .zip(unique_document_ids(paths))
        .enumerate()
        .map(|(i, (path, id))| {
            info!("Document {}/{}", i + 1, paths.len());
            process_document_as(path, &id, config)
        })
        .collect()
}

/// Aggregate analytics across a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub documents_coded: usize,
    pub total_segments: usize,
    pub unique_codes: usize,
    pub avg_segments_per_document: f64,
    /// Most frequent codes, ties broken by first appearance
    pub top_codes: Vec<(String, usize)>,
}

impl BatchSummary {
    pub const TOP_CODES: usize = 10;

    pub fn from_results(results: &[DocumentResult]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for segment in results.iter().flat_map(|r| &r.segments) {
            let count = counts.entry(segment.code.as_str()).or_insert(0);
            if *count == 0 {
                order.push(segment.code.as_str());
            }
            *count += 1;
        }

        let mut top_codes: Vec<(String, usize)> = order
            .iter()
            .map(|code| (code.to_string(), counts[code]))
            .collect();
        // stable sort keeps first-appearance order among equal counts
        top_codes.sort_by(|a, b| b.1.cmp(&a.1));
        top_codes.truncate(Self::TOP_CODES);

        let total_segments: usize = results.iter().map(|r| r.segments.len()).sum();
        let avg_segments_per_document = if results.is_empty() {
            0.0
        } else {
            total_segments as f64 / results.len() as f64
        };

        Self {
            documents: results.len(),
            documents_coded: results
                .iter()
                .filter(|r| r.status == DocumentStatus::Coded)
                .count(),
            total_segments,
            unique_codes: order.len(),
            avg_segments_per_document,
            top_codes,
        }
    }
}
