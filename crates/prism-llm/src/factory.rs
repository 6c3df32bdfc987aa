//! Factory for creating multimodal chat model providers.

use std::sync::Arc;

use prism_core::config::LlmProviderConfig;
use prism_core::error::PrismResult;
use prism_core::traits::{LlmConfig, LlmProvider, MultimodalLlm};

use crate::openai::OpenAIMultimodal;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> PrismResult<Arc<dyn MultimodalLlm>> {
        match provider {
            LlmProvider::OpenAI => {
                let llm = OpenAIMultimodal::new(config)?;
                Ok(Arc::new(llm))
            }
        }
    }

    /// Create an LLM provider from the `llm` section of the configuration.
    pub fn from_config(config: &LlmProviderConfig) -> PrismResult<Arc<dyn MultimodalLlm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI LLM provider with default configuration.
    pub fn openai() -> PrismResult<Arc<dyn MultimodalLlm>> {
        Self::create(LlmProvider::OpenAI, LlmConfig::default())
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> PrismResult<Arc<dyn MultimodalLlm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenAI, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_with_explicit_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let llm = LlmFactory::create(LlmProvider::OpenAI, config).unwrap();
        assert_eq!(llm.model_name(), "gpt-4o-mini");
        assert!(llm.supports_vision());
    }
}
