//! Error handling for the resume job matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The model bundle is missing, corrupt or shape-incompatible.
    #[error("Model artifact load error: {0}")]
    ArtifactLoad(String),

    /// The uploaded document is not a readable PDF.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, JobMatcherError>;

impl From<askama::Error> for JobMatcherError {
    fn from(err: askama::Error) -> Self {
        JobMatcherError::OutputFormatting(err.to_string())
    }
}
