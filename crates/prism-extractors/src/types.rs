//! Core types for content extraction.

use prism_core::SourceImage;
use std::collections::HashMap;

/// Text and images pulled out of a document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    /// Full document text, pages concatenated in order.
    pub text: String,

    /// Embedded images in document order.
    pub images: Vec<SourceImage>,

    /// Number of pages, for paged formats.
    pub page_count: Option<usize>,

    /// Format-specific metadata (title, author, ...).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ExtractedDocument {
    /// Create a document holding text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attach extracted images.
    pub fn with_images(mut self, images: Vec<SourceImage>) -> Self {
        self.images = images;
        self
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Add metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check if extraction produced any text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
