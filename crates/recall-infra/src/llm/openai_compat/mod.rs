//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves Cerebras and any other
//! endpoint speaking the chat completions protocol, via a configurable base
//! URL. Uses [`async_openai`] for type-safe request/response handling.

pub mod config;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
};
use async_openai::Client;
use secrecy::{ExposeSecret, SecretString};

use recall_core::llm::provider::LlmProvider;
use recall_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole,
    ProviderCapabilities, StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
            capabilities: config.capabilities,
        }
    }

    /// Create a Cerebras provider.
    ///
    /// Uses `https://api.cerebras.ai/v1` as the base URL.
    pub fn cerebras(api_key: SecretString, model: &str) -> Self {
        Self::new(config::cerebras_defaults(api_key, model))
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request.messages.iter().map(to_openai_message).collect();

        // Use the model from the request if set, otherwise fall back to config default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

fn to_openai_message(msg: &Message) -> ChatCompletionRequestMessage {
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
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let stop_reason = choice
            .and_then(|c| c.finish_reason.as_ref())
            .map(|fr| match fr {
                FinishReason::Stop => StopReason::EndTurn,
                FinishReason::Length => StopReason::MaxTokens,
                FinishReason::ContentFilter => StopReason::ContentFilter,
                FinishReason::ToolCalls | FinishReason::FunctionCall => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || code == "wrong_api_key"
                || api_err.message.contains("Invalid API key")
                || api_err.message.contains("Wrong API Key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded"
                || error_type == "rate_limit_error"
                || error_type == "too_many_requests_error"
            {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded(api_err.message.clone())
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if reqwest_err.is_timeout() {
                return LlmError::Timeout(0);
            }
            match reqwest_err.status().map(|s| s.as_u16()) {
                Some(401) => LlmError::AuthenticationFailed,
                Some(429) => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                Some(503) | Some(529) => LlmError::Overloaded(err.to_string()),
                _ => LlmError::Provider {
                    message: err.to_string(),
                },
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::cerebras(
            SecretString::from("csk-test".to_string()),
            "qwen-3-235b-a22b-thinking-2507",
        )
    }

    #[test]
    fn test_cerebras_factory() {
        let provider = provider();
        assert_eq!(provider.name(), "cerebras");
        assert_eq!(provider.default_model(), "qwen-3-235b-a22b-thinking-2507");
        assert!(provider.capabilities().reasoning_trace);
    }

    #[test]
    fn test_build_request_messages() {
        let request = CompletionRequest {
            model: "llama-3.3-70b".to_string(),
            messages: vec![Message::system("Be brief"), Message::user("Hello")],
            max_tokens: 1024,
            temperature: Some(0.2),
        };

        let oai_req = provider().build_request(&request);
        assert_eq!(oai_req.model, "llama-3.3-70b");
        assert_eq!(oai_req.messages.len(), 2);
        assert!(matches!(
            oai_req.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            oai_req.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert_eq!(oai_req.max_completion_tokens, Some(1024));
        assert!(oai_req.stream.is_none());
    }

    #[test]
    fn test_build_request_empty_model_uses_default() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("Hello")],
            max_tokens: 16,
            temperature: None,
        };

        let oai_req = provider().build_request(&request);
        assert_eq!(oai_req.messages.len(), 1);
        assert_eq!(oai_req.model, "qwen-3-235b-a22b-thinking-2507");
        assert!(oai_req.temperature.is_none());
    }

    #[test]
    fn test_map_openai_error_context_length() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "This model's maximum context length is 131072 tokens".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("context_length_exceeded".to_string()),
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::ContextLengthExceeded(ref m) if m.contains("131072")));
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Wrong API Key".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("wrong_api_key".to_string()),
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("too_many_requests_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_map_openai_error_invalid_argument() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }
}
