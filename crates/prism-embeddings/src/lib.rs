//! prism-embeddings - Embedding provider implementations for prism.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - text-embedding-3-small, text-embedding-3-large, etc.
//!
//! # Example
//!
//! ```ignore
//! use prism_embeddings::EmbedderFactory;
//!
//! let embedder = EmbedderFactory::openai_with_model("text-embedding-3-large", 3072)?;
//! let vector = embedder.embed("How do I reset the fixture?", None).await?;
//! ```

mod factory;
mod openai;

pub use factory::EmbedderFactory;
pub use openai::OpenAIEmbedder;

// Re-export core types for convenience
pub use prism_core::traits::{Embedder, EmbedderConfig, EmbedderProvider, EmbeddingAction};
