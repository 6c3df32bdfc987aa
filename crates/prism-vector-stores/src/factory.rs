//! Factory for creating vector store providers.

use std::path::Path;
use std::sync::Arc;

use prism_core::error::PrismResult;
use prism_core::traits::{VectorStore, VectorStoreConfig, VectorStoreProvider};

use crate::memory::InMemoryVectorStore;

/// Factory for creating vector store providers.
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Create a vector store from the given configuration.
    pub async fn create(config: VectorStoreConfig) -> PrismResult<Arc<dyn VectorStore>> {
        match config.provider {
            VectorStoreProvider::InMemory => Ok(Self::memory(&config.collection_name)),

            #[cfg(feature = "sqlite-vec")]
            VectorStoreProvider::SqliteVec => {
                let db_path = config
                    .path
                    .as_deref()
                    .unwrap_or_else(|| Path::new(":memory:"));
                let store = crate::sqlite_vec::SqliteVecStore::new(
                    db_path,
                    &config.collection_name,
                    config.embedding_model_dims,
                )?;
                Ok(Arc::new(store))
            }

            #[allow(unreachable_patterns)]
            _ => Err(prism_core::error::PrismError::UnsupportedProvider {
                provider: format!("{:?}", config.provider),
            }),
        }
    }

    /// Create an in-process vector store.
    pub fn memory(collection_name: &str) -> Arc<dyn VectorStore> {
        Arc::new(InMemoryVectorStore::new(collection_name))
    }

    /// Create a persistent sqlite-vec vector store.
    #[cfg(feature = "sqlite-vec")]
    pub fn sqlite_vec_with_path(
        collection_name: &str,
        db_path: impl AsRef<Path>,
        dimension: usize,
    ) -> PrismResult<Arc<dyn VectorStore>> {
        let store = crate::sqlite_vec::SqliteVecStore::new(db_path, collection_name, dimension)?;
        Ok(Arc::new(store))
    }
}
