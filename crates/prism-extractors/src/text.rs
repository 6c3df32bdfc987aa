//! Plain text passthrough.

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::types::ExtractedDocument;
use crate::Extractor;

/// Extractor for UTF-8 text files. Produces no images.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create new text extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedDocument> {
        let text = std::str::from_utf8(content)
            .map_err(|e| ExtractError::ExtractionFailed(format!("Invalid UTF-8: {}", e)))?;
        Ok(ExtractedDocument::new(text))
    }

    fn supported_types(&self) -> &[&str] {
        &["text/plain", "text/markdown"]
    }

    fn name(&self) -> &str {
        "text"
    }
}
