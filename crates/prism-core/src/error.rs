//! Error types for prism operations.
//!
//! Every failure carries a structured [`ErrorCode`] and enough context
//! (document id, node index, query, model) for the caller to log it and
//! abort the current document or query.

use thiserror::Error;

/// Result type alias for prism operations.
pub type PrismResult<T> = Result<T, PrismError>;

/// Main error type for all prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Text could not be tokenized.
    #[error("Tokenization error: {message}")]
    Tokenization { message: String, code: ErrorCode },

    /// An extracted image could not be written to the image store.
    #[error("Image persistence error for document '{document_id}' image {index}: {message}")]
    ImagePersistence {
        message: String,
        code: ErrorCode,
        document_id: String,
        index: usize,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The retriever failed to produce matches for a query.
    #[error("Retrieval error for query '{query}': {message}")]
    Retrieval {
        message: String,
        code: ErrorCode,
        query: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The multimodal model call failed.
    #[error("Model invocation error ({model}): {message}")]
    ModelInvocation {
        message: String,
        code: ErrorCode,
        model: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Embedding generation failed.
    #[error("Embedding error: {message}")]
    Embedding {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector store operation failed.
    #[error("Vector store error: {message}")]
    VectorStore {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document extraction failed.
    #[error("Extraction error: {message}")]
    Extraction { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Tokenization (TOK_xxx)
    TokInvalidText,
    TokVocabularyUnavailable,

    // Image persistence (IMG_xxx)
    ImgWriteFailed,
    ImgUnsupportedFormat,

    // Retrieval (RET_xxx)
    RetSearchFailed,
    RetInvalidPayload,

    // Model invocation (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmInvalidResponse,
    LlmImageLoadFailed,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidTemplate,

    // Embedding (EMB_xxx)
    EmbConnectionFailed,
    EmbGenerationFailed,

    // Vector Store (VEC_xxx)
    VecConnectionFailed,
    VecOperationFailed,

    // Extraction (EXT_xxx)
    ExtFailed,
    ExtUnsupportedType,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TokInvalidText => "TOK_001",
            ErrorCode::TokVocabularyUnavailable => "TOK_002",
            ErrorCode::ImgWriteFailed => "IMG_001",
            ErrorCode::ImgUnsupportedFormat => "IMG_002",
            ErrorCode::RetSearchFailed => "RET_001",
            ErrorCode::RetInvalidPayload => "RET_002",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::LlmImageLoadFailed => "LLM_004",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidTemplate => "VAL_002",
            ErrorCode::EmbConnectionFailed => "EMB_001",
            ErrorCode::EmbGenerationFailed => "EMB_002",
            ErrorCode::VecConnectionFailed => "VEC_001",
            ErrorCode::VecOperationFailed => "VEC_002",
            ErrorCode::ExtFailed => "EXT_001",
            ErrorCode::ExtUnsupportedType => "EXT_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl PrismError {
    /// Create a tokenization error.
    pub fn tokenization(message: impl Into<String>) -> Self {
        Self::Tokenization {
            message: message.into(),
            code: ErrorCode::TokInvalidText,
        }
    }

    /// Create an image persistence error for one image of one document.
    pub fn image_persistence(
        document_id: impl Into<String>,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::ImagePersistence {
            message: message.into(),
            code: ErrorCode::ImgWriteFailed,
            document_id: document_id.into(),
            index,
            source: None,
        }
    }

    /// Create a retrieval error for a query.
    pub fn retrieval(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
            code: ErrorCode::RetSearchFailed,
            query: query.into(),
            source: None,
        }
    }

    /// Create a model invocation error.
    pub fn model_invocation(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelInvocation {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            model: model.into(),
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            code: ErrorCode::EmbGenerationFailed,
            source: None,
        }
    }

    /// Create a vector store error.
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore {
            message: message.into(),
            code: ErrorCode::VecOperationFailed,
            source: None,
        }
    }

    /// Create an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            code: ErrorCode::ExtFailed,
        }
    }

    /// Attach an underlying cause to errors that carry one.
    pub fn with_source(mut self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            Self::ImagePersistence { source, .. }
            | Self::Retrieval { source, .. }
            | Self::ModelInvocation { source, .. }
            | Self::Embedding { source, .. }
            | Self::VectorStore { source, .. } => *source = Some(Box::new(err)),
            _ => {}
        }
        self
    }

    /// Override the error code.
    pub fn with_code(mut self, new_code: ErrorCode) -> Self {
        match &mut self {
            Self::Tokenization { code, .. }
            | Self::ImagePersistence { code, .. }
            | Self::Retrieval { code, .. }
            | Self::ModelInvocation { code, .. }
            | Self::Validation { code, .. }
            | Self::Embedding { code, .. }
            | Self::VectorStore { code, .. }
            | Self::Extraction { code, .. } => *code = new_code,
            _ => {}
        }
        self
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Tokenization { code, .. } => *code,
            Self::ImagePersistence { code, .. } => *code,
            Self::Retrieval { code, .. } => *code,
            Self::ModelInvocation { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Embedding { code, .. } => *code,
            Self::VectorStore { code, .. } => *code,
            Self::Extraction { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::ImagePersistence { .. } => {
                Some("Please check that the image directory exists and is writable")
            }
            Self::Retrieval { .. } => Some("Please check your embedding and vector store settings"),
            Self::ModelInvocation { .. } => Some("Please check your LLM provider configuration"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Embedding { .. } => Some("Please check your embedding provider configuration"),
            Self::VectorStore { .. } => Some("Please check your vector store settings"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_persistence_error_context() {
        let err = PrismError::image_persistence("manual", 3, "disk full");
        assert_eq!(err.code(), ErrorCode::ImgWriteFailed);
        let msg = err.to_string();
        assert!(msg.contains("manual"));
        assert!(msg.contains("image 3"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_retrieval_error_carries_query() {
        let err = PrismError::retrieval("what is the dmx address?", "index offline");
        assert!(err.to_string().contains("dmx address"));
        assert_eq!(err.code().as_str(), "RET_001");
    }

    #[test]
    fn test_with_code_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = PrismError::model_invocation("gpt-4o-mini", "request failed")
            .with_code(ErrorCode::LlmConnectionFailed)
            .with_source(io);
        assert_eq!(err.code(), ErrorCode::LlmConnectionFailed);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::TokInvalidText.as_str(), "TOK_001");
        assert_eq!(ErrorCode::ImgWriteFailed.as_str(), "IMG_001");
        assert_eq!(ErrorCode::Internal.as_str(), "INT_001");
    }
}
