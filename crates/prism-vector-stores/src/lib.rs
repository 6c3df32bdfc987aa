//! prism-vector-stores - Vector store implementations for prism.
//!
//! # Supported Backends
//!
//! - **In-memory** (always available) - cosine similarity over a process-local list
//! - **sqlite-vec** (feature: `sqlite-vec`) - embedded SQLite with the vec0 extension,
//!   persisted to a single database file

mod factory;
mod memory;

#[cfg(feature = "sqlite-vec")]
mod sqlite_vec;

// Public exports
pub use factory::VectorStoreFactory;
pub use memory::InMemoryVectorStore;

#[cfg(feature = "sqlite-vec")]
pub use sqlite_vec::SqliteVecStore;

// Re-export core types for convenience
pub use prism_core::traits::{
    VectorRecord, VectorSearchResult, VectorStore, VectorStoreConfig, VectorStoreProvider,
};
