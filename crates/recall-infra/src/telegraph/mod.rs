//! Telegraph document publisher.
//!
//! Implements `DocumentPublisher` from `recall-core` against the Telegraph
//! API (`createAccount` and `createPage`). An account is created lazily on
//! the first publish and its token is kept for the life of the process.

pub mod nodes;

use std::time::Duration;

use recall_core::publish::DocumentPublisher;
use recall_types::config::PublishingSettings;
use recall_types::error::PublishError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use self::nodes::html_to_nodes;

/// Telegraph limits page titles to 256 characters.
const MAX_TITLE_CHARS: usize = 256;

const USER_AGENT: &str = concat!("recall/", env!("CARGO_PKG_VERSION"));

/// Envelope shared by every Telegraph API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Account {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Page {
    url: String,
}

/// Publisher backed by the Telegraph API.
///
/// Does NOT derive Debug: it holds the account access token.
pub struct TelegraphPublisher {
    http: reqwest::Client,
    base_url: String,
    short_name: String,
    author_name: String,
    timeout: Duration,
    token: OnceCell<SecretString>,
}

impl TelegraphPublisher {
    /// Fails only when the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(settings: &PublishingSettings) -> Result<Self, PublishError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            short_name: settings.short_name.clone(),
            author_name: settings.author_name.clone(),
            timeout,
            token: OnceCell::new(),
        })
    }

    /// Use an existing access token instead of creating an account.
    pub fn with_token(self, token: SecretString) -> Self {
        Self {
            token: OnceCell::new_with(Some(token)),
            ..self
        }
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PublishError> {
        let url = format!("{}/{method}", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_http_error(e))?;
        if !status.is_success() {
            return Err(PublishError::Http(format!("{method} returned {status}: {body}")));
        }

        let parsed: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| PublishError::Deserialization(format!("{method}: {e}")))?;

        if !parsed.ok {
            return Err(PublishError::Service(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        parsed
            .result
            .ok_or_else(|| PublishError::Deserialization(format!("{method}: missing result")))
    }

    fn map_http_error(&self, err: reqwest::Error) -> PublishError {
        if err.is_timeout() {
            PublishError::Timeout(self.timeout.as_secs())
        } else {
            PublishError::Http(err.to_string())
        }
    }

    async fn access_token(&self) -> Result<&SecretString, PublishError> {
        self.token
            .get_or_try_init(|| async {
                let token = self.create_account(&self.short_name, &self.author_name).await?;
                Ok::<_, PublishError>(SecretString::from(token))
            })
            .await
    }
}

impl DocumentPublisher for TelegraphPublisher {
    async fn create_account(
        &self,
        short_name: &str,
        author_name: &str,
    ) -> Result<String, PublishError> {
        let account: Account = self
            .call(
                "createAccount",
                &[("short_name", short_name), ("author_name", author_name)],
            )
            .await?;
        info!(short_name, "Created Telegraph account");
        account
            .access_token
            .ok_or_else(|| PublishError::Deserialization("account without access_token".to_string()))
    }

    async fn publish(&self, title: &str, html: &str) -> Result<String, PublishError> {
        let token = self.access_token().await?;
        let content = serde_json::to_string(&html_to_nodes(html))
            .map_err(|e| PublishError::Deserialization(e.to_string()))?;
        let title: String = title.chars().take(MAX_TITLE_CHARS).collect();

        debug!(title = %title, content_bytes = content.len(), "Creating Telegraph page");
        let page: Page = self
            .call(
                "createPage",
                &[
                    ("access_token", token.expose_secret()),
                    ("title", title.as_str()),
                    ("author_name", self.author_name.as_str()),
                    ("content", content.as_str()),
                    ("return_content", "false"),
                ],
            )
            .await?;
        Ok(page.url)
    }
}
