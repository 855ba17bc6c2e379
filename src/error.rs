use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("invalid codebook: {0}")]
    InvalidCodebook(String),
}

pub type Result<T> = std::result::Result<T, Error>;
