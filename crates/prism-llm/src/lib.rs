//! prism-llm - Multimodal chat model providers for prism.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - GPT-4o, GPT-4o mini and other vision-capable chat models
//!
//! # Example
//!
//! ```ignore
//! use prism_llm::LlmFactory;
//!
//! let llm = LlmFactory::openai_with_model("gpt-4o-mini")?;
//! let response = llm.chat(&messages, &images, None).await?;
//! ```

mod factory;
mod openai;

pub use factory::LlmFactory;
pub use openai::{image_data_url, OpenAIMultimodal};

// Re-export core types for convenience
pub use prism_core::traits::{GenerationOptions, LlmConfig, LlmProvider, LlmResponse, MultimodalLlm};
