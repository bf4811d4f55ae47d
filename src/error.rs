//! Error handling for the CV analysis toolkit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtharError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, AtharError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AtharError {
    fn from(err: anyhow::Error) -> Self {
        AtharError::AnalysisFailed(err.to_string())
    }
}
