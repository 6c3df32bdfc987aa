//! Retrieval node types.

use serde::{Deserialize, Serialize};

use super::image::ImageReference;

/// A bounded span of document text, optionally paired with one image.
///
/// Nodes are created once during ingestion and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalNode {
    /// Stable identifier, `<document_id>_<sequence_index>`.
    pub id: String,
    /// Document the node was cut from.
    pub document_id: String,
    /// Trimmed, contiguous span of source text.
    pub text: String,
    /// Position among all nodes of the document.
    pub sequence_index: usize,
    /// Persisted image paired with this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
}

impl RetrievalNode {
    /// Create a node without an image.
    pub fn new(document_id: impl Into<String>, sequence_index: usize, text: impl Into<String>) -> Self {
        let document_id = document_id.into();
        Self {
            id: format!("{}_{}", document_id, sequence_index),
            document_id,
            text: text.into(),
            sequence_index,
            image_reference: None,
        }
    }

    /// Pair the node with a persisted image.
    pub fn with_image(mut self, image: ImageReference) -> Self {
        self.image_reference = Some(image);
        self
    }

    /// Whether the node carries an image.
    pub fn has_image(&self) -> bool {
        self.image_reference.is_some()
    }
}

/// A node returned by a retriever together with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub node: RetrievalNode,
    pub score: f32,
}

impl ScoredMatch {
    /// Create a new scored match.
    pub fn new(node: RetrievalNode, score: f32) -> Self {
        Self { node, score }
    }
}
