//! Token counting for chunk budgets.

use tiktoken_rs::CoreBPE;

use crate::error::{ErrorCode, PrismError, PrismResult};

/// Counts tokens in a span of text against a fixed vocabulary.
///
/// Implementations must be deterministic and keep no state between calls.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> PrismResult<usize>;
}

/// Tokenizer backed by the `cl100k_base` BPE vocabulary.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the `cl100k_base` vocabulary.
    pub fn cl100k() -> PrismResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| {
            PrismError::tokenization(format!("Failed to load cl100k_base: {}", e))
                .with_code(ErrorCode::TokVocabularyUnavailable)
        })?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> PrismResult<usize> {
        if text.contains('\0') {
            return Err(PrismError::tokenization("Text contains NUL bytes"));
        }
        Ok(self.bpe.encode_with_special_tokens(text).len())
    }
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_is_deterministic() {
        let tokenizer = TiktokenTokenizer::cl100k().unwrap();
        let a = tokenizer.count_tokens("The quick brown fox").unwrap();
        let b = tokenizer.count_tokens("The quick brown fox").unwrap();
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        let tokenizer = TiktokenTokenizer::cl100k().unwrap();
        assert_eq!(tokenizer.count_tokens("").unwrap(), 0);
    }

    #[test]
    fn test_nul_bytes_rejected() {
        let tokenizer = TiktokenTokenizer::cl100k().unwrap();
        let err = tokenizer.count_tokens("bad\0text").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TokInvalidText);
    }
}
