//! Greedy token-budgeted node construction.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ChunkingConfig;
use crate::error::{PrismError, PrismResult};
use crate::tokenizer::Tokenizer;
use crate::traits::ImageStore;
use crate::types::{ImageKey, RetrievalNode, SourceImage};

use super::association::{ImageAssociation, PositionalAssociation};
use super::segmenter::{LiteralSplitter, SentenceSplitter};

/// Cuts document text into retrieval nodes and pairs them with images.
///
/// Sentences are packed greedily: a sentence joins the open node while the
/// joined text, separators included, stays within `max_tokens`, otherwise it
/// opens the next node. At most `max_nodes` nodes are produced; text past the last node is
/// dropped. A sentence larger than the budget on its own becomes a node of
/// its own rather than being split.
pub struct NodeBuilder {
    tokenizer: Arc<dyn Tokenizer>,
    image_store: Arc<dyn ImageStore>,
    splitter: Arc<dyn SentenceSplitter>,
    association: Arc<dyn ImageAssociation>,
    max_tokens: usize,
    max_nodes: usize,
}

impl NodeBuilder {
    /// Create a builder with literal `". "` splitting and positional image pairing.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        image_store: Arc<dyn ImageStore>,
        max_tokens: usize,
        max_nodes: usize,
    ) -> PrismResult<Self> {
        if max_tokens == 0 {
            return Err(PrismError::validation("max_tokens must be greater than 0"));
        }
        if max_nodes == 0 {
            return Err(PrismError::validation("max_nodes must be greater than 0"));
        }

        Ok(Self {
            tokenizer,
            image_store,
            splitter: Arc::new(LiteralSplitter::default()),
            association: Arc::new(PositionalAssociation),
            max_tokens,
            max_nodes,
        })
    }

    /// Create a builder from chunking configuration.
    pub fn from_config(
        tokenizer: Arc<dyn Tokenizer>,
        image_store: Arc<dyn ImageStore>,
        config: &ChunkingConfig,
    ) -> PrismResult<Self> {
        Ok(Self::new(tokenizer, image_store, config.max_tokens, config.max_nodes)?
            .with_splitter(Arc::new(LiteralSplitter::new(config.sentence_marker.clone()))))
    }

    /// Replace the sentence splitter.
    pub fn with_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Replace the image pairing strategy.
    pub fn with_association(mut self, association: Arc<dyn ImageAssociation>) -> Self {
        self.association = association;
        self
    }

    /// Token budget per node.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Maximum nodes per document.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Split `text` into trimmed node texts, without touching images.
    pub fn segment(&self, text: &str) -> PrismResult<Vec<String>> {
        let separator = self.splitter.separator();
        let mut chunks: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for sentence in self.splitter.split(text) {
            if buffer.is_empty() {
                self.tokenizer.count_tokens(sentence)?;
                buffer.push_str(sentence);
                continue;
            }

            // Count the joined text so separator tokens are charged too.
            let candidate = format!("{}{}{}", buffer, separator, sentence);
            if self.tokenizer.count_tokens(candidate.trim())? <= self.max_tokens {
                buffer = candidate;
                continue;
            }

            // An empty buffer would close into an empty node; seed it instead.
            if !buffer.trim().is_empty() {
                chunks.push(buffer.trim().to_string());
                if chunks.len() >= self.max_nodes {
                    buffer.clear();
                    break;
                }
            }

            buffer.clear();
            buffer.push_str(sentence);
        }

        if !buffer.trim().is_empty() && chunks.len() < self.max_nodes {
            chunks.push(buffer.trim().to_string());
        }

        Ok(chunks)
    }

    /// Build the nodes for one document.
    ///
    /// Images paired with a node are saved through the image store before the
    /// node is returned. Any tokenization or save failure aborts the whole
    /// document; no partial node list is returned.
    pub fn build_nodes(
        &self,
        document_id: &str,
        text: &str,
        images: &[SourceImage],
    ) -> PrismResult<Vec<RetrievalNode>> {
        if document_id.trim().is_empty() {
            return Err(PrismError::validation("document_id must not be empty"));
        }

        info!(document_id, images = images.len(), "Creating text nodes");

        let chunks = self.segment(text)?;
        let mut nodes = Vec::with_capacity(chunks.len());

        for (sequence_index, chunk) in chunks.into_iter().enumerate() {
            let mut node = RetrievalNode::new(document_id, sequence_index, chunk);

            if let Some(image_index) = self.association.image_for(sequence_index, images.len()) {
                let key = ImageKey::new(document_id, sequence_index);
                let reference = self.image_store.save(&key, &images[image_index])?;
                node = node.with_image(reference);
            }

            debug!(
                document_id,
                sequence_index,
                chars = node.text.len(),
                has_image = node.has_image(),
                "Built node"
            );
            nodes.push(node);
        }

        info!(document_id, node_count = nodes.len(), "Created text nodes");
        Ok(nodes)
    }
}

impl std::fmt::Debug for NodeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("max_tokens", &self.max_tokens)
            .field("max_nodes", &self.max_nodes)
            .field("separator", &self.splitter.separator())
            .finish()
    }
}
