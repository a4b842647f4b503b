use thiserror::Error;

/// Errors from the message archive.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    /// A stored row holds a value the domain types cannot represent.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Errors from the messaging transport (send, reply, delete).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform rejected the rich markup (unbalanced entities, bad escapes).
    #[error("markup rejected: {0}")]
    Markup(String),

    #[error("message is too long")]
    TooLong,

    #[error("message not found")]
    NotFound,

    #[error("network error: {0}")]
    Network(String),

    #[error("platform api error: {0}")]
    Api(String),
}

impl TransportError {
    /// Whether a plain-text resend has a chance to succeed.
    pub fn is_markup_related(&self) -> bool {
        matches!(self, TransportError::Markup(_))
    }
}

/// Errors from the long-form document publishing service.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publishing service returned an error: {0}")]
    Service(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("publishing timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected response: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
        let err = RepositoryError::Corrupt("invalid chat kind: 'megagroup'".to_string());
        assert_eq!(err.to_string(), "corrupt row: invalid chat kind: 'megagroup'");
    }

    #[test]
    fn test_transport_error_markup_classification() {
        assert!(TransportError::Markup("can't parse entities".to_string()).is_markup_related());
        assert!(!TransportError::TooLong.is_markup_related());
        assert!(!TransportError::Network("reset".to_string()).is_markup_related());
    }

    #[test]
    fn test_publish_error_display() {
        let err = PublishError::Timeout(30);
        assert_eq!(err.to_string(), "publishing timed out after 30s");
    }
}
