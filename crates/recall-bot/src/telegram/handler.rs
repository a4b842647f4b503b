//! Update handling: passive archiving, command dispatch, and the welcome
//! greeting.

use std::sync::Arc;

use teloxide::types::{Message, UserId};
use tracing::{debug, info};

use recall_core::command::{parse_command, CommandContext, CommandKind, CommandService};
use recall_infra::sqlite::history::SqliteHistoryRepository;
use recall_types::chat::{ChatKind, NewMessage};
use recall_types::transport::ReplyTarget;

use super::transport::{chat_record, sender_info, TelegramTransport};
use crate::state::ConfiguredPublisher;

pub type BotCommands =
    CommandService<SqliteHistoryRepository, TelegramTransport, ConfiguredPublisher>;

/// Everything the message handler needs, shared across updates.
pub struct BotContext {
    pub commands: BotCommands,
    pub bot_id: UserId,
    pub bot_username: Option<String>,
    pub archive_private_chats: bool,
}

/// Whether a text message belongs in the archive.
///
/// Group and supergroup text is kept; private chats only when configured.
/// The bot's own messages and slash commands are never archived.
pub fn should_archive(
    kind: ChatKind,
    text: &str,
    from_self: bool,
    archive_private_chats: bool,
) -> bool {
    if from_self || text.trim().is_empty() || text.starts_with('/') {
        return false;
    }
    match kind {
        ChatKind::Group | ChatKind::Supergroup => true,
        ChatKind::Private => archive_private_chats,
        ChatKind::Channel => false,
    }
}

pub async fn handle_message(
    msg: Message,
    ctx: Arc<BotContext>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let chat = chat_record(&msg.chat);

    if let Some(members) = msg.new_chat_members() {
        if members.iter().any(|user| user.id == ctx.bot_id) {
            info!(chat_id = chat.id, "Added to chat, sending welcome");
            let target = ReplyTarget {
                chat,
                message_id: msg.id.0,
            };
            ctx.commands.welcome(&target).await;
        }
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    if let Some(command) = parse_command(text, ctx.bot_username.as_deref()) {
        let command_ctx = CommandContext {
            target: ReplyTarget {
                chat,
                message_id: msg.id.0,
            },
            args: command.args,
        };
        // Commands wait on the model for a long time; keep the update loop free.
        tokio::spawn(async move {
            match command.kind {
                CommandKind::History => {
                    ctx.commands.summarize(&command_ctx).await;
                }
                CommandKind::Ask => {
                    ctx.commands.ask(&command_ctx).await;
                }
            }
        });
        return Ok(());
    }

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if !should_archive(chat.kind, text, from.id == ctx.bot_id, ctx.archive_private_chats) {
        debug!(chat_id = chat.id, kind = %chat.kind, "Message not archived");
        return Ok(());
    }

    let message = NewMessage {
        chat,
        sender: sender_info(from),
        text: text.to_string(),
        sent_at: msg.date,
    };
    ctx.commands.history().record_quietly(&message).await;
    Ok(())
}
