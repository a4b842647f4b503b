//! Configuration types for recall.
//!
//! `RecallConfig` represents the optional `config.toml` in the data directory.
//! Every field has a default, so an empty or missing file yields a working
//! setup. Secrets (bot token, API key) are never read from this file.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecallConfig {
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub publishing: PublishingSettings,

    #[serde(default)]
    pub telegram: TelegramSettings,
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider label used in logs and spans.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Upper bound for one completion call.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// The model prefixes answers with its reasoning (`...</think>`), which
    /// is cut off before delivery.
    #[serde(default = "default_true")]
    pub reasoning_trace: bool,
}

fn default_provider_name() -> String {
    "cerebras".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.cerebras.ai/v1".to_string()
}

fn default_model() -> String {
    "qwen-3-235b-a22b-thinking-2507".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_llm_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_llm_timeout_secs(),
            reasoning_trace: true,
        }
    }
}

/// Long-form document publishing (overflow handling).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishingSettings {
    /// When disabled, oversized answers go straight to the truncation fallback.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_publishing_base_url")]
    pub base_url: String,

    /// Account short name registered with the publishing service.
    #[serde(default = "default_short_name")]
    pub short_name: String,

    #[serde(default = "default_short_name")]
    pub author_name: String,

    #[serde(default = "default_publishing_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_publishing_base_url() -> String {
    "https://api.telegra.ph".to_string()
}

fn default_short_name() -> String {
    "recall".to_string()
}

fn default_publishing_timeout_secs() -> u64 {
    30
}

impl Default for PublishingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_publishing_base_url(),
            short_name: default_short_name(),
            author_name: default_short_name(),
            timeout_secs: default_publishing_timeout_secs(),
        }
    }
}

/// Transport-side behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSettings {
    /// Archive messages from private chats too (groups are always archived).
    #[serde(default)]
    pub archive_private_chats: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = RecallConfig::default();
        assert_eq!(config.llm.provider_name, "cerebras");
        assert_eq!(config.llm.model, "qwen-3-235b-a22b-thinking-2507");
        assert_eq!(config.llm.timeout_secs, 120);
        assert!(config.llm.reasoning_trace);
        assert!(config.publishing.enabled);
        assert_eq!(config.publishing.base_url, "https://api.telegra.ph");
        assert!(!config.telegram.archive_private_chats);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: RecallConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.base_url, "https://api.cerebras.ai/v1");
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.publishing.timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_partial_sections() {
        let toml_str = r#"
[llm]
model = "llama-3.3-70b"
temperature = 0.2

[publishing]
enabled = false

[telegram]
archive_private_chats = true
"#;
        let config: RecallConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "llama-3.3-70b");
        assert_eq!(config.llm.temperature, Some(0.2));
        assert_eq!(config.llm.provider_name, "cerebras");
        assert!(!config.publishing.enabled);
        assert_eq!(config.publishing.short_name, "recall");
        assert!(config.telegram.archive_private_chats);
    }
}
