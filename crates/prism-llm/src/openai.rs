//! OpenAI multimodal chat provider.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use prism_core::error::{ErrorCode, PrismError, PrismResult};
use prism_core::traits::{GenerationOptions, LlmConfig, LlmResponse, MultimodalLlm, TokenUsage};
use prism_core::types::{ImageFormat, ImageReference, Message, MessageRole};

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
        ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequest, ImageDetail,
        ImageUrl,
    },
    Client,
};

/// OpenAI chat completions with image inputs.
pub struct OpenAIMultimodal {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl OpenAIMultimodal {
    /// Create a new OpenAI multimodal provider.
    pub fn new(config: LlmConfig) -> PrismResult<Self> {
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

        let mut config = config;
        if config.model.is_empty() {
            config.model = "gpt-4o-mini".to_string();
        }

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    /// Read every image and encode it as a data URL, in order.
    async fn load_images(&self, images: &[ImageReference]) -> PrismResult<Vec<String>> {
        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            let bytes = tokio::fs::read(image.path()).await.map_err(|e| {
                PrismError::model_invocation(
                    &self.config.model,
                    format!("Failed to load image {}", image),
                )
                .with_code(ErrorCode::LlmImageLoadFailed)
                .with_source(e)
            })?;
            urls.push(image_data_url(&bytes, image.format()));
        }
        Ok(urls)
    }

    #[cfg(feature = "openai")]
    fn message_to_openai(msg: &Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }),
            MessageRole::Assistant => {
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    ..Default::default()
                })
            }
        }
    }

    /// Build the chat request. Images go on the last user message as image parts.
    #[cfg(feature = "openai")]
    fn build_request(
        &self,
        messages: &[Message],
        image_urls: Vec<String>,
        options: Option<GenerationOptions>,
    ) -> CreateChatCompletionRequest {
        let options = options.unwrap_or_default();
        let last_user = messages.iter().rposition(|m| m.role == MessageRole::User);

        let mut image_urls = Some(image_urls).filter(|urls| !urls.is_empty());
        let mut chat_messages = Vec::with_capacity(messages.len());
        for (i, msg) in messages.iter().enumerate() {
            let urls = if last_user == Some(i) { image_urls.take() } else { None };
            let message = match urls {
                Some(urls) => {
                    let mut parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
                        msg.content.clone().into(),
                    )];
                    parts.extend(urls.into_iter().map(|url| {
                        ChatCompletionRequestUserMessageContentPart::ImageUrl(
                            ChatCompletionRequestMessageContentPartImage {
                                image_url: ImageUrl {
                                    url,
                                    detail: Some(ImageDetail::Auto),
                                },
                            },
                        )
                    }));
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Array(parts),
                        name: None,
                    })
                }
                None => Self::message_to_openai(msg),
            };
            chat_messages.push(message);
        }

        CreateChatCompletionRequest {
            model: self.config.model.clone(),
            messages: chat_messages,
            temperature: Some(options.temperature.unwrap_or(self.config.temperature)),
            max_completion_tokens: Some(options.max_tokens.unwrap_or(self.config.max_tokens)),
            ..Default::default()
        }
    }
}

/// Encode image bytes as a `data:` URL. The format comes from the bytes when
/// recognizable, else from `hint`, else JPEG.
pub fn image_data_url(bytes: &[u8], hint: Option<ImageFormat>) -> String {
    let format = ImageFormat::detect(bytes)
        .or(hint)
        .unwrap_or(ImageFormat::Jpeg);
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

#[async_trait]
impl MultimodalLlm for OpenAIMultimodal {
    #[cfg(feature = "openai")]
    async fn chat(
        &self,
        messages: &[Message],
        images: &[ImageReference],
        options: Option<GenerationOptions>,
    ) -> PrismResult<LlmResponse> {
        let images = if self.config.enable_vision { images } else { &[] };
        let image_urls = self.load_images(images).await?;
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            images = image_urls.len(),
            "Sending chat request"
        );

        let request = self.build_request(messages, image_urls, options);

        let response = self.client.chat().create(request).await.map_err(|e| {
            PrismError::model_invocation(&self.config.model, format!("OpenAI API error: {}", e))
                .with_code(ErrorCode::LlmConnectionFailed)
        })?;

        let choice = response.choices.first().ok_or_else(|| {
            PrismError::model_invocation(&self.config.model, "No response choices returned")
                .with_code(ErrorCode::LlmInvalidResponse)
        })?;

        let content = choice.message.content.clone();

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse { content, usage })
    }

    #[cfg(not(feature = "openai"))]
    async fn chat(
        &self,
        _messages: &[Message],
        _images: &[ImageReference],
        _options: Option<GenerationOptions>,
    ) -> PrismResult<LlmResponse> {
        Err(PrismError::Configuration(
            "OpenAI feature not enabled. Enable the 'openai' feature.".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn supports_vision(&self) -> bool {
        self.config.enable_vision
    }
}
