//! Factory for creating extractors.

use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::text::TextExtractor;
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a plain text extractor.
    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new())
    }

    /// Create extractor for a given MIME type.
    pub fn for_mime_type(mime_type: &str) -> ExtractResult<Arc<dyn Extractor>> {
        match mime_type {
            #[cfg(feature = "pdf")]
            "application/pdf" => Ok(Self::pdf()),

            "text/plain" | "text/markdown" => Ok(Self::text()),

            _ => Err(ExtractError::UnsupportedType(mime_type.to_string())),
        }
    }

    /// Get all available extractors.
    #[allow(clippy::vec_init_then_push)]
    pub fn all() -> Vec<Arc<dyn Extractor>> {
        let mut extractors: Vec<Arc<dyn Extractor>> = Vec::new();

        #[cfg(feature = "pdf")]
        extractors.push(Self::pdf());

        extractors.push(Self::text());

        extractors
    }
}
