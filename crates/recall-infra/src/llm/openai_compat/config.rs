//! Configuration types and defaults for OpenAI-compatible providers.
//!
//! Cerebras serves the default reasoning model behind the OpenAI chat
//! completions protocol, so it gets a factory function here like any other
//! compatible endpoint.

use recall_types::config::LlmSettings;
use recall_types::llm::ProviderCapabilities;
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "cerebras").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.cerebras.ai/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier used when a request leaves `model` empty.
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

/// Capabilities of the thinking models served by Cerebras.
fn reasoning_capabilities() -> ProviderCapabilities {
    ProviderCapabilities {
        reasoning_trace: true,
        max_output_tokens: 32_768,
    }
}

/// Cerebras default configuration.
///
/// Base URL: `https://api.cerebras.ai/v1`
/// Capabilities: reasoning trace in the output, 32K output tokens.
pub fn cerebras_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "cerebras".into(),
        base_url: "https://api.cerebras.ai/v1".into(),
        api_key,
        model: model.into(),
        capabilities: reasoning_capabilities(),
    }
}

/// Configuration from the `[llm]` section of `config.toml`.
pub fn from_settings(settings: &LlmSettings, api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: settings.provider_name.clone(),
        base_url: settings.base_url.clone(),
        api_key,
        model: settings.model.clone(),
        capabilities: ProviderCapabilities {
            reasoning_trace: settings.reasoning_trace,
            ..reasoning_capabilities()
        },
    }
}
