//! Shapes exchanged with the completion backend.
//!
//! recall only ever sends a two-message conversation (instructions, then the
//! transcript prompt) and reads back one answer, so these types stay small.

use serde::{Deserialize, Serialize};

/// Who a prompt message speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Empty means the provider default.
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    /// Raw answer text, reasoning preamble included when the model emits one.
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Why generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// Cut off by `max_tokens`; the answer may be incomplete.
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::EndTurn => "end_turn",
            StopReason::MaxTokens => "max_tokens",
            StopReason::ContentFilter => "content_filter",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("prompt does not fit the model context: {0}")]
    ContextLengthExceeded(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// What the completion client needs to know about a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// The model writes its reasoning into the answer text, ended by a
    /// closing tag such as `</think>`.
    pub reasoning_trace: bool,
    /// Hard ceiling for `max_tokens`.
    pub max_output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let system = Message::system("rules");
        let user = Message::user(String::from("transcript"));
        assert_eq!(system.role, MessageRole::System);
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "transcript");
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::System).unwrap();
        assert_eq!(json, "\"system\"");
        let parsed: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, MessageRole::User);
    }

    #[test]
    fn test_stop_reason_matches_serde_name() {
        for reason in [
            StopReason::EndTurn,
            StopReason::MaxTokens,
            StopReason::ContentFilter,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn test_completion_request_skips_missing_temperature() {
        let request = CompletionRequest {
            model: "qwen-3-235b-a22b-thinking-2507".to_string(),
            messages: vec![Message::user("hi")],
            max_tokens: 100,
            temperature: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::ContextLengthExceeded("maximum context length is 131072".to_string());
        assert!(err.to_string().contains("131072"));
        assert_eq!(LlmError::Timeout(120).to_string(), "request timed out after 120s");
    }
}
