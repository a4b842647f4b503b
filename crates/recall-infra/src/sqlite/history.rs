//! SQLite history repository implementation.
//!
//! Implements `HistoryRepository` from `recall-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the single
//! writer connection, reads on the reader pool.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use recall_core::history::repository::HistoryRepository;
use recall_types::chat::{
    ChatKind, ChatOverview, ChatRecord, HistoryEntry, HistoryWindow, NewMessage, SenderInfo,
    StoredMessage,
};
use recall_types::error::RepositoryError;
use sqlx::Row;
use tracing::warn;

use super::pool::DatabasePool;

/// Timestamp layouts accepted from rows written by older tooling.
const LEGACY_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: i64,
    title: Option<String>,
    kind: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            kind: row.try_get("kind")?,
        })
    }

    fn into_record(self) -> Result<ChatRecord, RepositoryError> {
        let kind: ChatKind = self
            .kind
            .parse()
            .map_err(RepositoryError::Corrupt)?;
        Ok(ChatRecord {
            id: self.id,
            title: self.title,
            kind,
        })
    }
}

struct MessageRow {
    id: i64,
    chat_id: i64,
    user_id: i64,
    username: Option<String>,
    first_name: String,
    last_name: Option<String>,
    text: String,
    sent_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            text: row.try_get("text")?,
            sent_at: row.try_get("sent_at")?,
        })
    }

    fn into_message(self) -> StoredMessage {
        let sent_at = parse_sent_at(&self.sent_at, self.id);
        StoredMessage {
            id: self.id,
            chat_id: self.chat_id,
            sender: SenderInfo {
                user_id: self.user_id,
                username: self.username,
                first_name: self.first_name,
                last_name: self.last_name,
            },
            text: self.text,
            sent_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fixed-width RFC 3339 in UTC, so lexical order matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp, tolerating legacy naive layouts (read as UTC).
///
/// An unreadable value never drops the row: it is logged and replaced by the
/// current time.
fn parse_sent_at(raw: &str, message_id: i64) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    for format in LEGACY_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }
    warn!(message_id, raw, "Unparseable message timestamp, substituting current time");
    Utc::now()
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

const UPSERT_CHAT_SQL: &str = r#"INSERT INTO chats (id, title, kind, created_at, updated_at)
       VALUES (?, ?, ?, ?, ?)
       ON CONFLICT(id) DO UPDATE SET
           title = COALESCE(excluded.title, chats.title),
           updated_at = excluded.updated_at"#;

// ---------------------------------------------------------------------------
// HistoryRepository implementation
// ---------------------------------------------------------------------------

impl HistoryRepository for SqliteHistoryRepository {
    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<ChatRecord, RepositoryError> {
        let now = format_datetime(&Utc::now());
        sqlx::query(UPSERT_CHAT_SQL)
            .bind(chat.id)
            .bind(&chat.title)
            .bind(chat.kind.to_string())
            .bind(&now)
            .bind(&now)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        // Read back through the writer so the row is visible immediately.
        let row = sqlx::query("SELECT id, title, kind FROM chats WHERE id = ?")
            .bind(chat.id)
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_err)?;
        ChatRow::from_row(&row).map_err(query_err)?.into_record()
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Option<ChatRecord>, RepositoryError> {
        let row = sqlx::query("SELECT id, title, kind FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => Ok(Some(ChatRow::from_row(&row).map_err(query_err)?.into_record()?)),
            None => Ok(None),
        }
    }

    async fn append_message(&self, message: &NewMessage) -> Result<StoredMessage, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let now = format_datetime(&Utc::now());
        sqlx::query(UPSERT_CHAT_SQL)
            .bind(message.chat.id)
            .bind(&message.chat.title)
            .bind(message.chat.kind.to_string())
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        let result = sqlx::query(
            r#"INSERT INTO chat_messages (chat_id, user_id, username, first_name, last_name, text, sent_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.chat.id)
        .bind(message.sender.user_id)
        .bind(&message.sender.username)
        .bind(&message.sender.first_name)
        .bind(&message.sender.last_name)
        .bind(&message.text)
        .bind(format_datetime(&message.sent_at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            chat_id: message.chat.id,
            sender: message.sender.clone(),
            text: message.text.clone(),
            sent_at: message.sent_at,
        })
    }

    async fn fetch_recent(&self, chat_id: i64, limit: u32) -> Result<HistoryWindow, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, chat_id, user_id, username, first_name, last_name, text, sent_at
               FROM chat_messages
               WHERE chat_id = ?
               ORDER BY sent_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(chat_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut newest_first = Vec::with_capacity(rows.len());
        for row in &rows {
            let message = MessageRow::from_row(row).map_err(query_err)?.into_message();
            newest_first.push(HistoryEntry::from(&message));
        }

        Ok(HistoryWindow::from_newest_first(newest_first))
    }

    async fn count_messages(&self, chat_id: i64) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM chat_messages WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let count: i64 = row.try_get("cnt").map_err(query_err)?;
        Ok(count as u64)
    }

    async fn list_chats(&self) -> Result<Vec<ChatOverview>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT c.id, c.title, c.kind,
                      COUNT(m.id) AS message_count,
                      MAX(m.sent_at) AS last_message_at
               FROM chats c
               LEFT JOIN chat_messages m ON m.chat_id = c.id
               GROUP BY c.id
               ORDER BY last_message_at DESC, c.id ASC"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat = ChatRow::from_row(row).map_err(query_err)?.into_record()?;
            let message_count: i64 = row.try_get("message_count").map_err(query_err)?;
            let last_message_at: Option<String> =
                row.try_get("last_message_at").map_err(query_err)?;
            chats.push(ChatOverview {
                chat,
                message_count: message_count as u64,
                last_message_at: last_message_at.map(|raw| parse_sent_at(&raw, 0)),
            });
        }

        Ok(chats)
    }
}
