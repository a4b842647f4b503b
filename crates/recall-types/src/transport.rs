//! Handles exchanged with the messaging transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::chat::{ChatRecord, NewMessage, SenderInfo};

/// Markup interpretation requested for an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Telegram MarkdownV2 (strict escaping rules).
    MarkdownV2,
    /// No markup, text is shown verbatim.
    Plain,
}

impl ParseMode {
    pub fn is_rich(&self) -> bool {
        matches!(self, ParseMode::MarkdownV2)
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::MarkdownV2 => write!(f, "markdown_v2"),
            ParseMode::Plain => write!(f, "plain"),
        }
    }
}

/// The inbound message a reply should be threaded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub chat: ChatRecord,
    pub message_id: i32,
}

/// A message the transport has delivered on our behalf.
///
/// Carries everything needed to archive it: the bot's own replies take part
/// in later history windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub chat: ChatRecord,
    pub message_id: i32,
    pub sender: SenderInfo,
    /// Text as rendered by the platform (markup entities stripped).
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl SentMessage {
    /// Convert into an archive record.
    pub fn to_new_message(&self) -> NewMessage {
        NewMessage {
            chat: self.chat.clone(),
            sender: self.sender.clone(),
            text: self.text.clone(),
            sent_at: self.sent_at,
        }
    }
}
