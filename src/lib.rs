pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use error::{Error, Result};
pub use io::{
    extract_text, load_codebook, parse_domain_keywords, try_extract_text, write_document_outputs,
    DocumentTables, TextReport,
};
pub use models::{Codebook, CodebookEntry, Group, GroupTable, Segment, ThemeEntry, ThemeTable};
pub use pipeline::{
    process_batch, process_document, process_document_as, process_text, unique_document_ids,
    BatchSummary, DocumentResult, DocumentStatus, PipelineConfig,
};
pub use stages::{
    code_sentence, execute_stage1, execute_stage2, execute_stage3, segment_speakers,
    split_into_sentences, CodingConfig, SegmenterConfig,
};
