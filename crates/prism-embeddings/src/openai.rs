//! OpenAI embedding provider implementation.

use async_trait::async_trait;
use tracing::debug;

use prism_core::error::{ErrorCode, PrismError, PrismResult};
use prism_core::traits::{Embedder, EmbedderConfig, EmbeddingAction};

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};

/// OpenAI embedding provider.
pub struct OpenAIEmbedder {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: EmbedderConfig,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder.
    pub fn new(config: EmbedderConfig) -> PrismResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                PrismError::Configuration("OpenAI API key not found. Set OPENAI_API_KEY environment variable or provide api_key in config.".to_string())
            })?;

        #[cfg(feature = "openai")]
        let openai_config = if let Some(ref base_url) = config.base_url {
            OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(base_url)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        #[cfg(feature = "openai")]
        let client = Client::with_config(openai_config);

        #[cfg(not(feature = "openai"))]
        let _ = api_key;

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    /// Only the text-embedding-3 family accepts a `dimensions` override.
    fn requested_dimensions(&self) -> Option<u32> {
        self.config
            .model
            .starts_with("text-embedding-3")
            .then_some(self.config.embedding_dims as u32)
    }

    #[cfg(feature = "openai")]
    async fn request(&self, input: EmbeddingInput) -> PrismResult<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequest {
            model: self.config.model.clone(),
            input,
            dimensions: self.requested_dimensions(),
            ..Default::default()
        };

        let response = self.client.embeddings().create(request).await.map_err(|e| {
            PrismError::embedding(format!("OpenAI embedding error: {}", e))
                .with_code(ErrorCode::EmbConnectionFailed)
        })?;

        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[cfg(feature = "openai")]
    async fn embed(&self, text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
        self.request(EmbeddingInput::String(text.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PrismError::embedding("No embedding returned"))
    }

    #[cfg(not(feature = "openai"))]
    async fn embed(&self, _text: &str, _action: Option<EmbeddingAction>) -> PrismResult<Vec<f32>> {
        Err(PrismError::Configuration(
            "OpenAI feature not enabled. Enable the 'openai' feature.".to_string(),
        ))
    }

    #[cfg(feature = "openai")]
    async fn embed_batch(
        &self,
        texts: &[String],
        _action: Option<EmbeddingAction>,
    ) -> PrismResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .request(EmbeddingInput::StringArray(texts.to_vec()))
            .await?;

        if embeddings.len() != texts.len() {
            return Err(PrismError::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        debug!(model = %self.config.model, count = embeddings.len(), "Embedded batch");
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
