//! DocumentPublisher trait definition.
//!
//! An external long-form hosting service used when an answer does not fit
//! in a single chat message.

use recall_types::error::PublishError;

/// Publishes HTML documents and returns their public URL.
///
/// Implementations live in recall-infra (e.g., `TelegraphPublisher`).
pub trait DocumentPublisher: Send + Sync {
    /// Register an account with the service and return its access token.
    fn create_account(
        &self,
        short_name: &str,
        author_name: &str,
    ) -> impl std::future::Future<Output = Result<String, PublishError>> + Send;

    /// Publish `html` under `title`; returns the document URL.
    ///
    /// Implementations create an account on first use when they hold no token.
    fn publish(
        &self,
        title: &str,
        html: &str,
    ) -> impl std::future::Future<Output = Result<String, PublishError>> + Send;
}

/// Publisher used when publishing is disabled: always fails, which routes
/// oversized answers to the truncation fallback.
pub struct DisabledPublisher;

impl DocumentPublisher for DisabledPublisher {
    async fn create_account(
        &self,
        _short_name: &str,
        _author_name: &str,
    ) -> Result<String, PublishError> {
        Err(PublishError::Service("publishing is disabled".to_string()))
    }

    async fn publish(&self, _title: &str, _html: &str) -> Result<String, PublishError> {
        Err(PublishError::Service("publishing is disabled".to_string()))
    }
}
