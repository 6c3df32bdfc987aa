//! Vector index over retrieval nodes.

mod payload;
mod retriever;
mod vector_index;

pub use payload::{node_from_payload, node_payload};
pub use retriever::VectorRetriever;
pub use vector_index::VectorIndex;
