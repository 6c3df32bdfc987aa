//! Configuration system for prism.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PrismError, PrismResult};
use crate::traits::{
    EmbedderConfig, EmbedderProvider, LlmConfig, LlmProvider, VectorStoreConfig,
    VectorStoreProvider,
};

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmProviderConfig {
    /// Provider type.
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

/// Embedder provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmbedderProviderConfig {
    /// Provider type.
    pub provider: EmbedderProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: EmbedderConfig,
}

/// Node construction budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Token budget per node.
    pub max_tokens: usize,
    /// Maximum number of nodes per document.
    pub max_nodes: usize,
    /// Literal marker separating candidate sentences.
    pub sentence_marker: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            max_nodes: 10,
            sentence_marker: ". ".to_string(),
        }
    }
}

/// Query-time retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of matches handed to the query engine.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 9 }
    }
}

/// Main prism configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismConfig {
    /// Multimodal model configuration.
    pub llm: LlmProviderConfig,
    /// Embedder configuration.
    pub embedder: EmbedderProviderConfig,
    /// Vector store configuration.
    pub vector_store: VectorStoreConfig,
    /// Node construction budget.
    pub chunking: ChunkingConfig,
    /// Retrieval settings.
    pub retrieval: RetrievalConfig,
    /// Directory holding the persisted index.
    pub storage_dir: PathBuf,
    /// Directory extracted images are written to.
    pub image_dir: PathBuf,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            llm: LlmProviderConfig::default(),
            embedder: EmbedderProviderConfig::default(),
            vector_store: VectorStoreConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            storage_dir: PathBuf::from("./storage_nodes"),
            image_dir: PathBuf::from("./data_images"),
        }
    }
}

impl PrismConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> PrismResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| PrismError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| PrismError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| PrismError::Configuration(e.to_string())),
            _ => Err(PrismError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables on top of this configuration.
    ///
    /// Numeric variables that fail to parse are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            self.llm.config.api_key = Some(api_key.clone());
            self.embedder.config.api_key = Some(api_key);
        }
        if let Ok(model) = std::env::var("PRISM_LLM_MODEL") {
            self.llm.config.model = model;
        }
        if let Ok(model) = std::env::var("PRISM_EMBEDDING_MODEL") {
            self.embedder.config.model = model;
        }
        if let Ok(dir) = std::env::var("PRISM_STORAGE_DIR") {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("PRISM_IMAGE_DIR") {
            self.image_dir = PathBuf::from(dir);
        }
        if let Some(top_k) = env_usize("PRISM_TOP_K") {
            self.retrieval.top_k = top_k;
        }
        if let Some(max_tokens) = env_usize("PRISM_MAX_TOKENS") {
            self.chunking.max_tokens = max_tokens;
        }
        if let Some(max_nodes) = env_usize("PRISM_MAX_NODES") {
            self.chunking.max_nodes = max_nodes;
        }
    }

    /// Reject budgets that cannot produce a usable index.
    pub fn validate(&self) -> PrismResult<()> {
        if self.chunking.max_tokens == 0 {
            return Err(PrismError::validation_with_suggestion(
                "chunking.max_tokens must be greater than 0",
                "Set max_tokens to a positive token budget such as 4000",
            ));
        }
        if self.chunking.max_nodes == 0 {
            return Err(PrismError::validation_with_suggestion(
                "chunking.max_nodes must be greater than 0",
                "Set max_nodes to the number of nodes allowed per document",
            ));
        }
        if self.chunking.sentence_marker.is_empty() {
            return Err(PrismError::validation("chunking.sentence_marker must not be empty"));
        }
        if self.retrieval.top_k == 0 {
            return Err(PrismError::validation("retrieval.top_k must be greater than 0"));
        }
        Ok(())
    }

    /// Vector store configuration with the database placed under `storage_dir`
    /// when no explicit path is set.
    pub fn resolved_vector_store(&self) -> VectorStoreConfig {
        let mut config = self.vector_store.clone();
        config.embedding_model_dims = self.embedder.config.embedding_dims;
        if config.path.is_none() && config.provider == VectorStoreProvider::SqliteVec {
            config.path = Some(self.storage_dir.join("vectors.db"));
        }
        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> PrismConfigBuilder {
        PrismConfigBuilder::default()
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for PrismConfig.
#[derive(Default)]
pub struct PrismConfigBuilder {
    config: PrismConfig,
}

impl PrismConfigBuilder {
    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set embedder configuration.
    pub fn embedder(mut self, config: EmbedderProviderConfig) -> Self {
        self.config.embedder = config;
        self
    }

    /// Set vector store configuration.
    pub fn vector_store(mut self, config: VectorStoreConfig) -> Self {
        self.config.vector_store = config;
        self
    }

    /// Set the node construction budget.
    pub fn chunking(mut self, max_tokens: usize, max_nodes: usize) -> Self {
        self.config.chunking.max_tokens = max_tokens;
        self.config.chunking.max_nodes = max_nodes;
        self
    }

    /// Set the retrieval top-k.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.retrieval.top_k = top_k;
        self
    }

    /// Set the index storage directory.
    pub fn storage_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = path.into();
        self
    }

    /// Set the image directory.
    pub fn image_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.image_dir = path.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> PrismConfig {
        self.config
    }
}
