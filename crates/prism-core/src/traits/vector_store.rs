//! Vector store trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::PrismResult;

/// A vector record with payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier.
    pub id: String,
    /// Vector embedding.
    pub vector: Vec<f32>,
    /// Metadata payload.
    pub payload: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    /// Create a new vector record.
    pub fn new(
        id: impl Into<String>,
        vector: Vec<f32>,
        payload: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            vector,
            payload,
        }
    }

    /// Get a payload value as a string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// Search result from vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchResult {
    /// Unique identifier.
    pub id: String,
    /// Similarity score, higher is closer.
    pub score: f32,
    /// Metadata payload.
    pub payload: HashMap<String, serde_json::Value>,
}

/// Core VectorStore trait - all vector store backends implement this.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert (or replace) vectors in the collection.
    async fn insert(&self, records: Vec<VectorRecord>) -> PrismResult<()>;

    /// Search for the `limit` most similar vectors, best first.
    async fn search(&self, query_vector: &[f32], limit: usize)
        -> PrismResult<Vec<VectorSearchResult>>;

    /// Get a vector by ID.
    async fn get(&self, id: &str) -> PrismResult<Option<VectorRecord>>;

    /// Number of stored vectors.
    async fn count(&self) -> PrismResult<usize>;

    /// Delete every vector in the collection.
    async fn reset(&self) -> PrismResult<()>;

    /// Get the collection name.
    fn collection_name(&self) -> &str;
}

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Provider type.
    pub provider: VectorStoreProvider,
    /// Collection name.
    pub collection_name: String,
    /// Embedding dimensions.
    #[serde(default = "default_embedding_dims")]
    pub embedding_model_dims: usize,
    /// Database file for embedded backends. `None` keeps the store in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_embedding_dims() -> usize {
    3072
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: VectorStoreProvider::SqliteVec,
            collection_name: "vector_index".to_string(),
            embedding_model_dims: default_embedding_dims(),
            path: None,
        }
    }
}

/// Vector store provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreProvider {
    /// Process-local store, lost on exit.
    InMemory,
    /// SQLite with sqlite-vec extension for embedded vector search.
    #[default]
    SqliteVec,
}
