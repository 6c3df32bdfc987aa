//! Extraction pipeline for processing content through appropriate extractors.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::ExtractedDocument;
use crate::Extractor;

/// Pipeline for extracting content using registered extractors.
///
/// Automatically routes content to the appropriate extractor based on MIME type.
pub struct ExtractionPipeline {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractionPipeline {
    /// Create new empty pipeline.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create pipeline with all available extractors.
    pub fn with_defaults() -> Self {
        Self {
            extractors: crate::ExtractorFactory::all(),
        }
    }

    /// Add an extractor to the pipeline.
    pub fn add_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Extract content using the appropriate extractor for the MIME type.
    pub async fn extract(
        &self,
        content: &[u8],
        mime_type: &str,
    ) -> ExtractResult<ExtractedDocument> {
        for extractor in &self.extractors {
            if extractor.supports(mime_type) {
                debug!(extractor = extractor.name(), mime_type, "Routing content");
                return extractor.extract(content).await;
            }
        }

        Err(ExtractError::UnsupportedType(mime_type.to_string()))
    }

    /// Read a file and extract it, inferring the MIME type from its extension.
    pub async fn extract_path(&self, path: impl AsRef<Path>) -> ExtractResult<ExtractedDocument> {
        let path = path.as_ref();
        let mime_type = mime_type_for_path(path)
            .ok_or_else(|| ExtractError::UnsupportedType(path.display().to_string()))?;
        let content = tokio::fs::read(path).await?;
        self.extract(&content, mime_type).await
    }

    /// Check if pipeline can handle a given MIME type.
    pub fn supports(&self, mime_type: &str) -> bool {
        self.extractors.iter().any(|e| e.supports(mime_type))
    }

    /// List all supported MIME types.
    pub fn supported_types(&self) -> Vec<&str> {
        self.extractors
            .iter()
            .flat_map(|e| e.supported_types().iter().copied())
            .collect()
    }

    /// Get the number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the pipeline has no registered extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// MIME type for a file extension, if the pipeline knows it.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" | "text" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_creation() {
        let pipeline = ExtractionPipeline::with_defaults();

        #[cfg(feature = "pdf")]
        assert!(pipeline.supports("application/pdf"));

        assert!(pipeline.supports("text/plain"));
    }

    #[test]
    fn test_pipeline_empty() {
        let pipeline = ExtractionPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
        assert!(!pipeline.supports("video/mp4"));
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("manual.PDF")), Some("application/pdf"));
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), Some("text/plain"));
        assert_eq!(mime_type_for_path(Path::new("archive.zip")), None);
        assert_eq!(mime_type_for_path(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_pipeline_unsupported_type_error() {
        let pipeline = ExtractionPipeline::new();
        let result = pipeline.extract(b"test", "video/mp4").await;
        assert!(matches!(result, Err(ExtractError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn test_extract_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Mount the fixture. Tighten the clamp.").unwrap();

        let document = ExtractionPipeline::with_defaults()
            .extract_path(&path)
            .await
            .unwrap();
        assert_eq!(document.text, "Mount the fixture. Tighten the clamp.");
    }

    #[tokio::test]
    async fn test_extract_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExtractionPipeline::with_defaults()
            .extract_path(dir.path().join("missing.txt"))
            .await;
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
