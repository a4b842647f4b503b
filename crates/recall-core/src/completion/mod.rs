//! Completion client: one grounded LLM call per command.
//!
//! `CompletionClient` builds the system + user message pair for a
//! [`CompletionMode`], issues a single completion request under a timeout,
//! and strips any reasoning preamble from the reply. It never returns an
//! error: every failure becomes the fixed [`prompts::APOLOGY`] text, which
//! callers treat like any other answer.

pub mod prompts;
pub mod reasoning;

use std::time::Duration;

use recall_types::llm::{CompletionRequest, LlmError, Message, StopReason};
use tracing::{error, info, info_span, warn, Instrument};

use crate::llm::box_provider::BoxLlmProvider;

use self::reasoning::strip_reasoning;

/// Which system prompt variant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Grounded digest of the transcript; no outside facts.
    Summarize,
    /// Answer a question, preferring the transcript but never refusing.
    Ask,
}

impl CompletionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionMode::Summarize => "summarize",
            CompletionMode::Ask => "ask",
        }
    }
}

/// Settings for [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// Model override; empty means the provider default.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 8192,
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Wrapper around an LLM provider that always yields user-presentable text.
pub struct CompletionClient {
    provider: BoxLlmProvider,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(provider: BoxLlmProvider, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    fn model(&self) -> String {
        if self.settings.model.is_empty() {
            self.provider.default_model().to_string()
        } else {
            self.settings.model.clone()
        }
    }

    /// Build the request for `prompt_body` in `mode`.
    pub fn build_request(&self, prompt_body: &str, mode: CompletionMode) -> CompletionRequest {
        CompletionRequest {
            model: self.model(),
            messages: vec![
                Message::system(prompts::system_prompt(mode)),
                Message::user(prompt_body),
            ],
            max_tokens: self
                .settings
                .max_tokens
                .min(self.provider.capabilities().max_output_tokens),
            temperature: self.settings.temperature,
        }
    }

    /// Run one completion. Failures are logged and replaced by the apology.
    pub async fn complete(&self, prompt_body: &str, mode: CompletionMode) -> String {
        match self.try_complete(prompt_body, mode).await {
            Ok(text) => text,
            Err(e) => {
                error!(
                    provider = self.provider.name(),
                    mode = mode.as_str(),
                    error = %e,
                    "Completion failed, replying with apology"
                );
                prompts::APOLOGY.to_string()
            }
        }
    }

    async fn try_complete(&self, prompt_body: &str, mode: CompletionMode) -> Result<String, LlmError> {
        let request = self.build_request(prompt_body, mode);
        info!(
            mode = mode.as_str(),
            prompt_chars = prompt_body.chars().count(),
            prompt_preview = %preview(prompt_body, 200),
            "Sending completion request"
        );

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            recall.mode = mode.as_str(),
        );

        let timeout = self.settings.timeout;
        let response = tokio::time::timeout(timeout, self.provider.complete(&request))
            .instrument(span)
            .await
            .map_err(|_| LlmError::Timeout(timeout.as_secs()))??;

        info!(
            response_id = %response.id,
            stop_reason = response.stop_reason.as_str(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            raw_preview = %preview(&response.content, 500),
            "Received completion"
        );

        if response.stop_reason == StopReason::MaxTokens {
            warn!(
                max_tokens = request.max_tokens,
                "Completion hit the output token limit, answer may be cut short"
            );
        }

        let text = if self.provider.capabilities().reasoning_trace {
            strip_reasoning(&response.content)
        } else {
            response.content.trim().to_string()
        };
        if text.is_empty() {
            return Err(LlmError::Deserialization(
                "completion contained no answer text".to_string(),
            ));
        }
        Ok(text)
    }
}

/// First `max_chars` characters of `text`, for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;
    use recall_types::llm::MessageRole;

    fn client(provider: ScriptedProvider) -> CompletionClient {
        CompletionClient::new(BoxLlmProvider::new(provider), CompletionSettings::default())
    }

    #[test]
    fn test_build_request_system_then_user() {
        let client = client(ScriptedProvider::answering("x"));
        let request = client.build_request("prompt body", CompletionMode::Summarize);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.messages[1].content, "prompt body");
        assert_eq!(request.model, "scripted-model");
        assert_eq!(request.max_tokens, 8192);
    }

    #[test]
    fn test_build_request_uses_model_override() {
        let client = CompletionClient::new(
            BoxLlmProvider::new(ScriptedProvider::answering("x")),
            CompletionSettings {
                model: "llama-3.3-70b".to_string(),
                ..Default::default()
            },
        );
        let request = client.build_request("p", CompletionMode::Ask);
        assert_eq!(request.model, "llama-3.3-70b");
    }

    #[test]
    fn test_build_request_caps_max_tokens_at_provider_limit() {
        let client = client(ScriptedProvider::answering("x").with_output_limit(4096));
        let request = client.build_request("p", CompletionMode::Summarize);
        assert_eq!(request.max_tokens, 4096);
    }

    #[tokio::test]
    async fn test_complete_keeps_sentinel_text_without_reasoning_trace() {
        let client = client(
            ScriptedProvider::answering(" use </think> literally ").without_reasoning_trace(),
        );
        let text = client.complete("p", CompletionMode::Ask).await;
        assert_eq!(text, "use </think> literally");
    }

    #[tokio::test]
    async fn test_complete_strips_reasoning() {
        let client = client(ScriptedProvider::answering(
            "  ...reasoning...</think>Final text  ",
        ));
        let text = client.complete("p", CompletionMode::Summarize).await;
        assert_eq!(text, "Final text");
    }

    #[tokio::test]
    async fn test_complete_without_sentinel_returns_trimmed() {
        let client = client(ScriptedProvider::answering("\n Just the answer \n"));
        assert_eq!(client.complete("p", CompletionMode::Ask).await, "Just the answer");
    }

    #[tokio::test]
    async fn test_complete_failure_returns_apology() {
        let client = client(ScriptedProvider::failing());
        let text = client.complete("p", CompletionMode::Ask).await;
        assert_eq!(text, prompts::APOLOGY);
    }

    #[tokio::test]
    async fn test_complete_empty_answer_returns_apology() {
        let client = client(ScriptedProvider::answering("<think>only thoughts</think>"));
        let text = client.complete("p", CompletionMode::Summarize).await;
        assert_eq!(text, prompts::APOLOGY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_timeout_returns_apology() {
        let client = CompletionClient::new(
            BoxLlmProvider::new(ScriptedProvider::hanging()),
            CompletionSettings {
                timeout: Duration::from_secs(5),
                ..Default::default()
            },
        );
        let text = client.complete("p", CompletionMode::Summarize).await;
        assert_eq!(text, prompts::APOLOGY);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("привет мир", 6), "привет...");
        assert_eq!(preview("short", 10), "short");
    }
}
