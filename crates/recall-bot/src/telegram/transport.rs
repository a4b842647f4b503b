//! `ChatTransport` over the Telegram Bot API (teloxide).

use teloxide::prelude::*;
use teloxide::types::{Chat, MessageId, ReplyParameters, User};
use teloxide::{ApiError, RequestError};

use recall_core::transport::ChatTransport;
use recall_types::chat::{ChatKind, ChatRecord, SenderInfo};
use recall_types::error::TransportError;
use recall_types::transport::{ParseMode, ReplyTarget, SentMessage};

/// Sends replies as the bot and reports them back in archivable form.
pub struct TelegramTransport {
    bot: Bot,
    me: SenderInfo,
}

impl TelegramTransport {
    pub fn new(bot: Bot, me: SenderInfo) -> Self {
        Self { bot, me }
    }
}

impl ChatTransport for TelegramTransport {
    async fn reply(
        &self,
        target: &ReplyTarget,
        text: &str,
        mode: ParseMode,
    ) -> Result<SentMessage, TransportError> {
        let mut request = self
            .bot
            .send_message(ChatId(target.chat.id), text)
            .reply_parameters(ReplyParameters::new(MessageId(target.message_id)));
        if let Some(parse_mode) = telegram_parse_mode(mode) {
            request = request.parse_mode(parse_mode);
        }

        let sent = request.await.map_err(|e| classify_error(&e))?;
        Ok(SentMessage {
            chat: target.chat.clone(),
            message_id: sent.id.0,
            sender: self.me.clone(),
            text: sent.text().unwrap_or(text).to_string(),
            sent_at: sent.date,
        })
    }

    async fn delete(&self, message: &SentMessage) -> Result<(), TransportError> {
        self.bot
            .delete_message(ChatId(message.chat.id), MessageId(message.message_id))
            .await
            .map_err(|e| classify_error(&e))?;
        Ok(())
    }
}

fn telegram_parse_mode(mode: ParseMode) -> Option<teloxide::types::ParseMode> {
    match mode {
        ParseMode::MarkdownV2 => Some(teloxide::types::ParseMode::MarkdownV2),
        ParseMode::Plain => None,
    }
}

/// Map a Bot API failure onto the transport error taxonomy.
pub fn classify_error(err: &RequestError) -> TransportError {
    match err {
        RequestError::Api(ApiError::CantParseEntities(msg)) => TransportError::Markup(msg.clone()),
        RequestError::Api(ApiError::MessageIsTooLong) => TransportError::TooLong,
        RequestError::Api(ApiError::MessageToDeleteNotFound) => TransportError::NotFound,
        RequestError::Api(api) => classify_api_message(&api.to_string()),
        RequestError::Network(e) => TransportError::Network(e.to_string()),
        other => TransportError::Api(other.to_string()),
    }
}

/// Classify by the Bot API description for errors teloxide reports as unknown.
pub fn classify_api_message(description: &str) -> TransportError {
    let lower = description.to_lowercase();
    if lower.contains("can't parse entities") || lower.contains("can't find end of") {
        TransportError::Markup(description.to_string())
    } else if lower.contains("message is too long") {
        TransportError::TooLong
    } else if lower.contains("message to delete not found") || lower.contains("message not found")
    {
        TransportError::NotFound
    } else {
        TransportError::Api(description.to_string())
    }
}

/// Archive view of a Telegram chat.
pub fn chat_record(chat: &Chat) -> ChatRecord {
    let kind = if chat.is_private() {
        ChatKind::Private
    } else if chat.is_group() {
        ChatKind::Group
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else {
        ChatKind::Channel
    };

    ChatRecord {
        id: chat.id.0,
        title: chat.title().or_else(|| chat.first_name()).map(str::to_string),
        kind,
    }
}

/// Archive view of a Telegram user.
pub fn sender_info(user: &User) -> SenderInfo {
    SenderInfo {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}
