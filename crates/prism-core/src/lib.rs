//! prism-core - Core library for prism.
//!
//! This crate provides the data model, provider traits, node construction
//! and the multimodal query engine for prism, a retrieval-augmented
//! question answering system over PDF text and images.
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{FsImageStore, MultimodalQueryEngine, NodeBuilder, TiktokenTokenizer, VectorIndex};
//!
//! let builder = NodeBuilder::new(
//!     Arc::new(TiktokenTokenizer::cl100k()?),
//!     Arc::new(FsImageStore::new("./data_images")),
//!     4000,
//!     10,
//! )?;
//! let nodes = builder.build_nodes("manual", &text, &images)?;
//!
//! let index = VectorIndex::new(embedder, vector_store);
//! index.insert_nodes(&nodes).await?;
//!
//! let engine = MultimodalQueryEngine::new(Arc::new(index.as_retriever(9)), llm);
//! let answer = engine.answer("How do I set the DMX address?").await?;
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod nodes;
pub mod query;
pub mod tokenizer;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{ChunkingConfig, PrismConfig, RetrievalConfig};
pub use error::{ErrorCode, PrismError, PrismResult};
pub use index::{VectorIndex, VectorRetriever};
pub use nodes::{
    ExplicitAssociation, FsImageStore, ImageAssociation, LiteralSplitter, NodeBuilder,
    PositionalAssociation, SentenceSplitter,
};
pub use query::{AnswerResult, MultimodalContext, MultimodalQueryEngine, PromptTemplate};
pub use tokenizer::{TiktokenTokenizer, Tokenizer};
pub use traits::{
    Embedder, EmbedderConfig, EmbeddingAction, ImageStore, LlmConfig, LlmResponse,
    MultimodalLlm, Retriever, VectorStore, VectorStoreConfig,
};
pub use types::{
    ImageFormat, ImageKey, ImageReference, Message, MessageRole, RetrievalNode, ScoredMatch,
    SourceImage,
};
