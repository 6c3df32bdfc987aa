use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{PrismError, PrismResult};
use crate::traits::{Embedder, EmbeddingAction, Retriever, VectorStore};
use crate::types::ScoredMatch;

use super::payload::node_from_payload;

/// Similarity-search retriever over a vector store.
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl VectorRetriever {
    /// Create a retriever returning at most `top_k` matches.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    /// Configured number of matches per query.
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str) -> PrismResult<Vec<ScoredMatch>> {
        if self.top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(query, Some(EmbeddingAction::Search))
            .await
            .map_err(|e| PrismError::retrieval(query, "Failed to embed query").with_source(e))?;

        let results = self
            .store
            .search(&query_vector, self.top_k)
            .await
            .map_err(|e| PrismError::retrieval(query, "Vector search failed").with_source(e))?;

        let mut matches = Vec::with_capacity(results.len());
        for result in results {
            let node = node_from_payload(&result.id, &result.payload).map_err(|e| match e {
                PrismError::Retrieval { message, code, source, .. } => PrismError::Retrieval {
                    message,
                    code,
                    query: query.to_string(),
                    source,
                },
                other => other,
            })?;
            matches.push(ScoredMatch::new(node, result.score));
        }

        // Stable, so equal scores keep store order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.top_k);

        debug!(query, matches = matches.len(), "Retrieved nodes");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::index::VectorIndex;
    use crate::traits::{VectorRecord, VectorSearchResult};
    use crate::types::{ImageReference, RetrievalNode};
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// Bag-of-letters embedding: deterministic and good enough to rank overlap.
    struct LetterEmbedder;

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed(&self, text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
            let mut v = vec![0.0f32; 26];
            for c in text.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
                v[(c - b'a') as usize] += 1.0;
            }
            Ok(v)
        }

        fn dimension(&self) -> usize {
            26
        }

        fn model_name(&self) -> &str {
            "letters"
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
            Err(PrismError::embedding("service unavailable"))
        }

        fn dimension(&self) -> usize {
            26
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    /// Dot-product store kept in insertion order.
    #[derive(Default)]
    struct DotStore {
        records: RwLock<Vec<VectorRecord>>,
    }

    #[async_trait]
    impl VectorStore for DotStore {
        async fn insert(&self, records: Vec<VectorRecord>) -> PrismResult<()> {
            self.records.write().await.extend(records);
            Ok(())
        }

        async fn search(&self, query: &[f32], limit: usize) -> PrismResult<Vec<VectorSearchResult>> {
            let records = self.records.read().await;
            let mut results: Vec<_> = records
                .iter()
                .map(|r| VectorSearchResult {
                    id: r.id.clone(),
                    score: r.vector.iter().zip(query).map(|(a, b)| a * b).sum(),
                    payload: r.payload.clone(),
                })
                .collect();
            results.truncate(limit);
            Ok(results)
        }

        async fn get(&self, id: &str) -> PrismResult<Option<VectorRecord>> {
            Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
        }

        async fn count(&self) -> PrismResult<usize> {
            Ok(self.records.read().await.len())
        }

        async fn reset(&self) -> PrismResult<()> {
            self.records.write().await.clear();
            Ok(())
        }

        fn collection_name(&self) -> &str {
            "test"
        }
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_score() {
        let index = VectorIndex::new(Arc::new(LetterEmbedder), Arc::new(DotStore::default()));
        let nodes = vec![
            RetrievalNode::new("doc", 0, "b"),
            RetrievalNode::new("doc", 1, "aaa")
                .with_image(ImageReference::new("img/doc/image_1.jpg")),
            RetrievalNode::new("doc", 2, "ab"),
        ];
        assert_eq!(index.insert_nodes(&nodes).await.unwrap(), 3);
        assert_eq!(index.len().await.unwrap(), 3);

        let matches = index.as_retriever(3).retrieve("a").await.unwrap();

        let ids: Vec<_> = matches.iter().map(|m| m.node.id.as_str()).collect();
        assert_eq!(ids, vec!["doc_1", "doc_2", "doc_0"]);
        assert!(matches[0].node.has_image());
        assert_eq!(matches[0].node, nodes[1]);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = VectorIndex::new(Arc::new(LetterEmbedder), Arc::new(DotStore::default()));
        assert!(index.is_empty().await.unwrap());
        assert!(index.as_retriever(9).retrieve("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_is_retrieval_error() {
        let retriever = VectorRetriever::new(Arc::new(BrokenEmbedder), Arc::new(DotStore::default()), 3);

        let err = retriever.retrieve("where is the fuse?").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::RetSearchFailed);
        assert!(err.to_string().contains("where is the fuse?"));
    }

    #[tokio::test]
    async fn test_corrupt_payload_names_query() {
        let store = Arc::new(DotStore::default());
        store
            .insert(vec![VectorRecord::new("x", vec![1.0; 26], HashMap::new())])
            .await
            .unwrap();
        let retriever = VectorRetriever::new(Arc::new(LetterEmbedder), store, 1);

        let err = retriever.retrieve("abc").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::RetInvalidPayload);
        assert!(err.to_string().contains("abc"));
    }
}
