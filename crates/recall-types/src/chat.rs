//! Archived chat, message, and history window types.
//!
//! These types model what the assistant observes on the messaging platform:
//! the chats it sits in, the text messages it archives, and the bounded,
//! chronological history windows handed to prompt construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Kind of conversation as reported by the platform.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('private', 'group', 'supergroup', 'channel'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Whether passive archiving applies to this kind of chat by default.
    pub fn is_group_like(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Private => write!(f, "private"),
            ChatKind::Group => write!(f, "group"),
            ChatKind::Supergroup => write!(f, "supergroup"),
            ChatKind::Channel => write!(f, "channel"),
        }
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(ChatKind::Private),
            "group" => Ok(ChatKind::Group),
            "supergroup" => Ok(ChatKind::Supergroup),
            "channel" => Ok(ChatKind::Channel),
            other => Err(format!("invalid chat kind: '{other}'")),
        }
    }
}

/// One conversation the assistant has observed.
///
/// At most one record exists per `id`. The title may change over time;
/// the kind never does once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: i64,
    pub title: Option<String>,
    pub kind: ChatKind,
}

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderInfo {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl SenderInfo {
    /// First name, followed by the last name when one is known.
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

/// A text message about to be archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub chat: ChatRecord,
    pub sender: SenderInfo,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// A text message as stored in the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub chat_id: i64,
    pub sender: SenderInfo,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Projection of a stored message used for prompt construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender_name: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Timestamp layout used in transcript lines.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Render as a transcript line: `"<sender> (<timestamp>): <text>"`.
    pub fn transcript_line(&self) -> String {
        format!(
            "{} ({}): {}",
            self.sender_name,
            self.sent_at.format(Self::TIMESTAMP_FORMAT),
            self.text
        )
    }
}

impl From<&StoredMessage> for HistoryEntry {
    fn from(msg: &StoredMessage) -> Self {
        Self {
            sender_name: msg.sender.display_name(),
            text: msg.text.clone(),
            sent_at: msg.sent_at,
        }
    }
}

/// The most recent messages of one chat, oldest first.
///
/// The only constructors sort their input, so a window is always
/// chronological no matter which order the store produced rows in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    entries: Vec<HistoryEntry>,
}

impl HistoryWindow {
    /// An empty window (unknown chat or no archived messages).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a window from rows fetched newest-first (the store's native
    /// order for a top-K query).
    pub fn from_newest_first(mut entries: Vec<HistoryEntry>) -> Self {
        entries.reverse();
        Self::from_entries(entries)
    }

    /// Build a window from rows in any order. Equal timestamps keep their
    /// relative input order.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.sort_by_key(|e| e.sent_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries as transcript lines joined with newlines.
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Summary row for operator listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOverview {
    pub chat: ChatRecord,
    pub message_count: u64,
    pub last_message_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
