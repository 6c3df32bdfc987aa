//! prism-extractors - Document extraction for prism.
//!
//! Pulls text and embedded images out of source documents so they can be
//! split into retrieval nodes.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text and image extraction via lopdf
//!
//! # Example
//!
//! ```ignore
//! use prism_extractors::ExtractionPipeline;
//!
//! let pipeline = ExtractionPipeline::with_defaults();
//! let document = pipeline.extract_path("manual.pdf").await?;
//! println!("{} chars, {} images", document.text.len(), document.images.len());
//! ```

mod error;
mod factory;
mod pipeline;
mod text;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use pipeline::{mime_type_for_path, ExtractionPipeline};
pub use text::TextExtractor;
pub use types::ExtractedDocument;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

use async_trait::async_trait;

/// Core Extractor trait - all content extractors implement this.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text and images from bytes.
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedDocument>;

    /// Supported MIME types for this extractor.
    fn supported_types(&self) -> &[&str];

    /// Check if this extractor handles the given MIME type.
    fn supports(&self, mime_type: &str) -> bool {
        self.supported_types().contains(&mime_type)
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
