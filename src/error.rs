//! Error handling for the resume extractor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeExtractorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeExtractorError>;

/// Invalid reference patterns surface as configuration errors at startup
impl From<regex::Error> for ResumeExtractorError {
    fn from(err: regex::Error) -> Self {
        ResumeExtractorError::Configuration(format!("Invalid pattern: {}", err))
    }
}

impl From<aho_corasick::BuildError> for ResumeExtractorError {
    fn from(err: aho_corasick::BuildError) -> Self {
        ResumeExtractorError::Configuration(format!("Failed to build skill matcher: {}", err))
    }
}

#[cfg(feature = "ner-model")]
impl From<candle_core::Error> for ResumeExtractorError {
    fn from(err: candle_core::Error) -> Self {
        ResumeExtractorError::ModelError(err.to_string())
    }
}
