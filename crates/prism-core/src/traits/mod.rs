//! Core traits for prism providers.

mod embedder;
mod image_store;
mod llm;
mod retriever;
mod vector_store;

pub use embedder::*;
pub use image_store::*;
pub use llm::*;
pub use retriever::*;
pub use vector_store::*;
