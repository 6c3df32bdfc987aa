//! Extraction error types.

use prism_core::error::{ErrorCode, PrismError};
use thiserror::Error;

/// Errors that can occur during content extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Content type is not supported by any extractor.
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    /// Extraction process failed.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF-specific extraction error.
    #[cfg(feature = "pdf")]
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

impl From<ExtractError> for PrismError {
    fn from(err: ExtractError) -> Self {
        let code = match err {
            ExtractError::UnsupportedType(_) => ErrorCode::ExtUnsupportedType,
            _ => ErrorCode::ExtFailed,
        };
        PrismError::extraction(err.to_string()).with_code(code)
    }
}
