//! ChatTransport trait definition.
//!
//! The messaging platform as seen by the orchestrators: reply under an
//! inbound message, and delete something previously sent.

use recall_types::error::TransportError;
use recall_types::transport::{ParseMode, ReplyTarget, SentMessage};

/// Outgoing side of the messaging platform.
///
/// Implementations live in recall-bot (e.g., `TelegramTransport`).
pub trait ChatTransport: Send + Sync {
    /// Send `text` as a reply to `target`, interpreted with `mode`.
    fn reply(
        &self,
        target: &ReplyTarget,
        text: &str,
        mode: ParseMode,
    ) -> impl std::future::Future<Output = Result<SentMessage, TransportError>> + Send;

    /// Delete a message previously sent by the bot.
    fn delete(
        &self,
        message: &SentMessage,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
