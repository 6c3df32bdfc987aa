//! In-process vector store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use prism_core::error::PrismResult;
use prism_core::traits::{VectorRecord, VectorSearchResult, VectorStore};

/// Vector store held in memory and scored by cosine similarity.
///
/// Records keep insertion order; re-inserting an id replaces it in place.
/// Equal scores are returned in insertion order.
pub struct InMemoryVectorStore {
    records: RwLock<Vec<VectorRecord>>,
    collection_name: String,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            collection_name: collection_name.into(),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, records: Vec<VectorRecord>) -> PrismResult<()> {
        let mut stored = self.records.write().await;
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> PrismResult<Vec<VectorSearchResult>> {
        let stored = self.records.read().await;
        let mut results: Vec<VectorSearchResult> = stored
            .iter()
            .map(|r| VectorSearchResult {
                id: r.id.clone(),
                score: cosine_similarity(query_vector, &r.vector),
                payload: r.payload.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
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
        &self.collection_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        let mut payload = HashMap::new();
        payload.insert("text".to_string(), serde_json::json!(format!("text for {}", id)));
        VectorRecord::new(id, vector, payload)
    }

    #[tokio::test]
    async fn test_search_orders_by_cosine() {
        let store = InMemoryVectorStore::new("test");
        store
            .insert(vec![
                record("far", vec![0.0, 1.0]),
                record("near", vec![1.0, 0.1]),
                record("exact", vec![2.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = InMemoryVectorStore::new("test");
        store
            .insert(vec![record("a", vec![1.0, 0.0]), record("b", vec![1.0, 0.0])])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 5).await.unwrap();
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "b");
    }

    #[tokio::test]
    async fn test_reinsert_replaces() {
        let store = InMemoryVectorStore::new("test");
        store.insert(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.insert(vec![record("a", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("a").await.unwrap().unwrap();
        assert_eq!(stored.vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_reset() {
        let store = InMemoryVectorStore::new("test");
        store.insert(vec![record("a", vec![1.0])]).await.unwrap();
        store.reset().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get("a").await.unwrap().is_none());
    }
}
