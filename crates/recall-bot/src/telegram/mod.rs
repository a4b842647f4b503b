//! Telegram front end: long polling with teloxide.

pub mod handler;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};

use recall_core::command::CommandService;
use recall_core::completion::{CompletionClient, CompletionSettings};
use recall_core::history::service::HistoryService;
use recall_core::markup::{DeliveryPolicy, MAX_MESSAGE_CHARS};
use recall_infra::llm::create_provider;
use recall_infra::sqlite::history::SqliteHistoryRepository;

use self::handler::{handle_message, BotContext};
use self::transport::{sender_info, TelegramTransport};
use crate::state::{AppState, ConfiguredPublisher};

/// Entries for the client-side command menu.
pub fn command_menu() -> Vec<BotCommand> {
    vec![
        BotCommand::new("history", "Сводка последних сообщений: /history [n]"),
        BotCommand::new("qwen", "Вопрос по истории чата: /qwen [n] вопрос"),
    ]
}

/// Connect to Telegram and process updates until Ctrl+C.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let AppState {
        data_dir,
        config,
        secrets,
        db_pool,
        ..
    } = state;

    let token = secrets
        .bot_token
        .context("TELEGRAM_BOT_TOKEN is not set")?;
    let provider = create_provider(&config.llm, secrets.llm_api_key)
        .context("no completion API key (set CEREBRAS_API_KEY)")?;

    let bot = Bot::new(token.expose_secret());
    let me = bot.get_me().await.context("failed to reach the Telegram Bot API")?;
    let bot_username = me.user.username.clone();
    info!(
        username = bot_username.as_deref().unwrap_or("-"),
        provider = provider.name(),
        data_dir = %data_dir.display(),
        "Starting recall"
    );

    let completion = CompletionClient::new(
        provider,
        CompletionSettings {
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        },
    );
    let delivery = DeliveryPolicy {
        max_chars: MAX_MESSAGE_CHARS,
        publish_timeout: Duration::from_secs(config.publishing.timeout_secs),
    };

    let publisher = ConfiguredPublisher::from_settings(&config.publishing)
        .context("failed to set up the document publisher")?;
    let commands = CommandService::new(
        HistoryService::new(SqliteHistoryRepository::new(db_pool)),
        TelegramTransport::new(bot.clone(), sender_info(&me.user)),
        publisher,
        completion,
        delivery,
    );

    let ctx = Arc::new(BotContext {
        commands,
        bot_id: me.user.id,
        bot_username,
        archive_private_chats: config.telegram.archive_private_chats,
    });

    if let Err(e) = bot.set_my_commands(command_menu()).await {
        warn!(error = %e, "Failed to register bot commands");
    }
    if let Err(e) = bot.delete_webhook().drop_pending_updates(true).await {
        warn!(error = %e, "Failed to drop pending updates");
    }

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Stopped");
    Ok(())
}
