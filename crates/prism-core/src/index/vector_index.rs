use std::sync::Arc;

use tracing::info;

use crate::error::PrismResult;
use crate::traits::{Embedder, EmbeddingAction, VectorRecord, VectorStore};
use crate::types::RetrievalNode;

use super::payload::node_payload;
use super::retriever::VectorRetriever;

/// Embeds nodes into a vector store and hands out retrievers over it.
#[derive(Clone)]
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl VectorIndex {
    /// Create an index over `store`, embedding with `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed and store `nodes`. Returns the number of nodes written.
    ///
    /// Nodes are keyed by id, so re-inserting a document replaces its nodes.
    pub async fn insert_nodes(&self, nodes: &[RetrievalNode]) -> PrismResult<usize> {
        if nodes.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = nodes.iter().map(|n| n.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts, Some(EmbeddingAction::Index))
            .await?;

        let records: Vec<VectorRecord> = nodes
            .iter()
            .zip(embeddings)
            .map(|(node, vector)| VectorRecord::new(node.id.clone(), vector, node_payload(node)))
            .collect();
        let count = records.len();

        self.store.insert(records).await?;
        info!(
            collection = self.store.collection_name(),
            node_count = count,
            "Indexed nodes"
        );
        Ok(count)
    }

    /// Number of indexed nodes.
    pub async fn len(&self) -> PrismResult<usize> {
        self.store.count().await
    }

    /// Whether the index holds no nodes.
    pub async fn is_empty(&self) -> PrismResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Retriever returning the `top_k` closest nodes per query.
    pub fn as_retriever(&self, top_k: usize) -> VectorRetriever {
        VectorRetriever::new(self.embedder.clone(), self.store.clone(), top_k)
    }
}
