//! Factory for creating embedding providers.

use std::sync::Arc;

use prism_core::config::EmbedderProviderConfig;
use prism_core::error::PrismResult;
use prism_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};

use crate::openai::OpenAIEmbedder;

/// Factory for creating embedding providers.
pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Create an embedder from the given configuration.
    pub fn create(
        provider: EmbedderProvider,
        config: EmbedderConfig,
    ) -> PrismResult<Arc<dyn Embedder>> {
        match provider {
            EmbedderProvider::OpenAI => {
                let embedder = OpenAIEmbedder::new(config)?;
                Ok(Arc::new(embedder))
            }
        }
    }

    /// Create an embedder from the `embedder` section of the configuration.
    pub fn from_config(config: &EmbedderProviderConfig) -> PrismResult<Arc<dyn Embedder>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI embedder with default configuration.
    pub fn openai() -> PrismResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, EmbedderConfig::default())
    }

    /// Create an OpenAI embedder with a specific model.
    pub fn openai_with_model(
        model: impl Into<String>,
        dims: usize,
    ) -> PrismResult<Arc<dyn Embedder>> {
        let config = EmbedderConfig {
            model: model.into(),
            embedding_dims: dims,
            ..Default::default()
        };
        Self::create(EmbedderProvider::OpenAI, config)
    }
}
