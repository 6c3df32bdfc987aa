//! Multimodal question answering over retrieved nodes.

mod context;
mod engine;
mod prompt;

pub use context::{MultimodalContext, CONTEXT_SEPARATOR};
pub use engine::{AnswerResult, MultimodalQueryEngine, SYSTEM_PROMPT};
pub use prompt::{PromptTemplate, DEFAULT_QA_TEMPLATE};
