//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `recall-core`, and a factory ([`create_provider`]) that
//! builds it from the `[llm]` configuration section.
//!
//! [`LlmProvider`]: recall_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use recall_core::llm::box_provider::BoxLlmProvider;
use recall_types::config::LlmSettings;
use recall_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[llm]` settings.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available.
pub fn create_provider(
    settings: &LlmSettings,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let config = openai_compat::config::from_settings(settings, key);
    tracing::debug!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "Creating LLM provider"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}
