//! Question-answering prompt template.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{ErrorCode, PrismError, PrismResult};

/// Default grounded-answer template.
pub const DEFAULT_QA_TEMPLATE: &str = "Context information is below.\n\
---------------------\n\
{context_str}\n\
---------------------\n\
Given the context information and not prior knowledge, answer the query.\n\
Query: {query_str}\n\
Answer: ";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(context_str|query_str)\}").unwrap());

/// A prompt with `{context_str}` and `{query_str}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template. Both placeholders must appear, context first.
    pub fn new(template: impl Into<String>) -> PrismResult<Self> {
        let template = template.into();
        let context_at = template.find("{context_str}");
        let query_at = template.find("{query_str}");

        match (context_at, query_at) {
            (Some(c), Some(q)) if c < q => Ok(Self { template }),
            (Some(_), Some(_)) => Err(invalid_template(
                "{context_str} must appear before {query_str}",
            )),
            _ => Err(invalid_template(
                "Template must contain {context_str} and {query_str}",
            )),
        }
    }

    /// Raw template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute the placeholders in one pass.
    ///
    /// Placeholder-like text inside `context` or `query` is left as is.
    pub fn format(&self, context: &str, query: &str) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "context_str" => context.to_string(),
                _ => query.to_string(),
            })
            .into_owned()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_QA_TEMPLATE.to_string(),
        }
    }
}

fn invalid_template(message: &str) -> PrismError {
    PrismError::validation(message).with_code(ErrorCode::ValInvalidTemplate)
}
