//! Configuration loader for recall.
//!
//! Reads `config.toml` from the data directory (`~/.recall/` in production)
//! and deserializes it into [`RecallConfig`]. Falls back to defaults when the
//! file is missing or malformed. Secrets come from the environment only.

use std::path::{Path, PathBuf};

use recall_types::config::RecallConfig;
use secrecy::SecretString;

/// Environment variable holding the messaging platform bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variables checked, in order, for the completion API key.
pub const LLM_API_KEY_ENVS: [&str; 2] = ["CEREBRAS_API_KEY", "RECALL_LLM_API_KEY"];

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `RECALL_DATA_DIR` environment variable
/// 2. `~/.recall`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RECALL_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".recall");
    }

    // Last resort: current directory
    PathBuf::from(".recall")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RecallConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> RecallConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RecallConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RecallConfig::default();
        }
    };

    match toml::from_str::<RecallConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RecallConfig::default()
        }
    }
}

/// Secrets resolved from the process environment.
pub struct Secrets {
    pub bot_token: Option<SecretString>,
    pub llm_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve secrets through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };

        Self {
            bot_token: get(BOT_TOKEN_ENV),
            llm_api_key: LLM_API_KEY_ENVS.iter().find_map(|key| get(*key)),
        }
    }
}
