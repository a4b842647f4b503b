//! HistoryRepository trait definition.
//!
//! The append-only message archive: chat records with explicit upserts,
//! message appends, and recency-ordered range queries per chat.

use recall_types::chat::{ChatOverview, ChatRecord, HistoryWindow, NewMessage, StoredMessage};
use recall_types::error::RepositoryError;

/// Repository trait for chat and message persistence.
///
/// Implementations live in recall-infra (e.g., `SqliteHistoryRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryRepository: Send + Sync {
    /// Insert the chat if unseen, otherwise refresh its title.
    ///
    /// The stored kind is never changed by an upsert. Returns the record as
    /// persisted after the operation.
    fn upsert_chat(
        &self,
        chat: &ChatRecord,
    ) -> impl std::future::Future<Output = Result<ChatRecord, RepositoryError>> + Send;

    /// Get a chat record by its platform identifier.
    fn get_chat(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ChatRecord>, RepositoryError>> + Send;

    /// Upsert the owning chat and append the message in one transaction.
    fn append_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<StoredMessage, RepositoryError>> + Send;

    /// The `limit` most recent messages of a chat, oldest first.
    ///
    /// An unknown chat yields an empty window rather than an error.
    fn fetch_recent(
        &self,
        chat_id: i64,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<HistoryWindow, RepositoryError>> + Send;

    /// Number of archived messages for a chat.
    fn count_messages(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// All known chats with message counts, most recently active first.
    fn list_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatOverview>, RepositoryError>> + Send;
}
