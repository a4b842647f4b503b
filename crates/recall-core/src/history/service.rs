//! History service: the archive-facing half of the assistant.
//!
//! Wraps a [`HistoryRepository`] with the archiving policy (empty text is
//! never stored) and quiet variants for call sites where an archive failure
//! must not interrupt the user-visible flow.

use recall_types::chat::{HistoryWindow, NewMessage, StoredMessage};
use recall_types::error::RepositoryError;
use recall_types::transport::SentMessage;
use tracing::{debug, warn};

use super::repository::HistoryRepository;

/// Archive operations used by the transport handlers and the orchestrators.
pub struct HistoryService<H: HistoryRepository> {
    repo: H,
}

impl<H: HistoryRepository> HistoryService<H> {
    pub fn new(repo: H) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &H {
        &self.repo
    }

    /// Archive a text message. Messages with empty or whitespace-only text
    /// are skipped and yield `Ok(None)`.
    pub async fn record(
        &self,
        message: &NewMessage,
    ) -> Result<Option<StoredMessage>, RepositoryError> {
        if message.text.trim().is_empty() {
            debug!(chat_id = message.chat.id, "Skipping empty message");
            return Ok(None);
        }
        self.repo.append_message(message).await.map(Some)
    }

    /// Archive a message, logging instead of returning failures.
    pub async fn record_quietly(&self, message: &NewMessage) {
        if let Err(e) = self.record(message).await {
            warn!(chat_id = message.chat.id, error = %e, "Failed to archive message");
        }
    }

    /// Archive something the bot itself sent.
    pub async fn record_sent(&self, sent: &SentMessage) {
        self.record_quietly(&sent.to_new_message()).await;
    }

    /// The `limit` most recent messages of a chat, oldest first.
    pub async fn fetch_recent(
        &self,
        chat_id: i64,
        limit: u32,
    ) -> Result<HistoryWindow, RepositoryError> {
        let window = self.repo.fetch_recent(chat_id, limit).await?;
        debug!(chat_id, limit, fetched = window.len(), "Fetched history window");
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{group_chat, sender, InMemoryHistory};
    use chrono::{Duration, Utc};

    fn message(text: &str) -> NewMessage {
        NewMessage {
            chat: group_chat(-1001),
            sender: sender(1, "Alice", None),
            text: text.to_string(),
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_skips_empty_text() {
        let service = HistoryService::new(InMemoryHistory::default());
        assert!(service.record(&message("")).await.unwrap().is_none());
        assert!(service.record(&message("   \n")).await.unwrap().is_none());
        assert_eq!(service.repo().count_messages(-1001).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_stores_text() {
        let service = HistoryService::new(InMemoryHistory::default());
        let stored = service.record(&message("hello")).await.unwrap().unwrap();
        assert_eq!(stored.text, "hello");
        assert_eq!(stored.chat_id, -1001);
        assert_eq!(service.repo().count_messages(-1001).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_quietly_swallows_failures() {
        let repo = InMemoryHistory::default();
        repo.fail_appends();
        let service = HistoryService::new(repo);
        service.record_quietly(&message("lost")).await;
        assert_eq!(service.repo().count_messages(-1001).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_recent_is_chronological_and_bounded() {
        let service = HistoryService::new(InMemoryHistory::default());
        let base = Utc::now();
        for i in 0..5 {
            let mut msg = message(&format!("m{i}"));
            msg.sent_at = base + Duration::seconds(i);
            service.record(&msg).await.unwrap();
        }

        let window = service.fetch_recent(-1001, 3).await.unwrap();
        let texts: Vec<&str> = window.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_fetch_recent_unknown_chat_is_empty() {
        let service = HistoryService::new(InMemoryHistory::default());
        let window = service.fetch_recent(404, 10).await.unwrap();
        assert!(window.is_empty());
    }
}
