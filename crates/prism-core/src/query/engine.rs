use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ErrorCode, PrismError, PrismResult};
use crate::traits::{GenerationOptions, MultimodalLlm, Retriever};
use crate::types::{Message, ScoredMatch};

use super::context::MultimodalContext;
use super::prompt::PromptTemplate;

/// System instruction sent with every query.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Use the provided context to answer the query.";

/// Model answer plus the matches it was grounded on.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    /// Raw model output.
    pub text: String,
    /// Retriever matches, in retriever order.
    pub source_nodes: Vec<ScoredMatch>,
}

/// Answers queries from retrieved node text and images with one model call.
pub struct MultimodalQueryEngine {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn MultimodalLlm>,
    prompt: PromptTemplate,
    options: Option<GenerationOptions>,
}

impl MultimodalQueryEngine {
    /// Create an engine with the default QA prompt.
    pub fn new(retriever: Arc<dyn Retriever>, llm: Arc<dyn MultimodalLlm>) -> Self {
        Self {
            retriever,
            llm,
            prompt: PromptTemplate::default(),
            options: None,
        }
    }

    /// Replace the QA prompt.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Per-call generation overrides.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Messages sent to the model for `query` and `context`.
    pub fn build_messages(&self, query: &str, context: &MultimodalContext) -> Vec<Message> {
        vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(self.prompt.format(&context.text_block, query)),
        ]
    }

    /// Retrieve, build the grounded prompt, and ask the model.
    ///
    /// Retriever and model errors are returned as is. A query with no
    /// matches still reaches the model, with an empty context. A model reply
    /// without content is an invalid response.
    pub async fn answer(&self, query: &str) -> PrismResult<AnswerResult> {
        let source_nodes = self.retriever.retrieve(query).await?;
        let context = MultimodalContext::from_matches(&source_nodes);
        debug!(
            query,
            matches = source_nodes.len(),
            images = context.image_set.len(),
            "Built query context"
        );

        let messages = self.build_messages(query, &context);
        let response = self
            .llm
            .chat(&messages, &context.image_set, self.options.clone())
            .await?;

        let text = response.content.ok_or_else(|| {
            PrismError::model_invocation(self.llm.model_name(), "Model returned no content")
                .with_code(ErrorCode::LlmInvalidResponse)
        })?;
        info!(
            query,
            model = self.llm.model_name(),
            matches = source_nodes.len(),
            "Answered query"
        );

        Ok(AnswerResult { text, source_nodes })
    }
}
