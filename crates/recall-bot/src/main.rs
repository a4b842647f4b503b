//! recall entry point.
//!
//! Binary name: `recall`
//!
//! Parses CLI arguments, initializes logging and the archive, then either
//! runs the Telegram bot or answers an operator query against the archive.

mod cli;
mod state;
mod telegram;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides this default
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,recall=info",
        1 => "info,recall=debug",
        _ => "trace",
    };
    recall_observe::init_tracing(filter, cli.otel).map_err(anyhow::Error::from_boxed)?;

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Run => telegram::run(state).await,
        Commands::History {
            chat_id,
            limit,
            json,
        } => cli::history::show_history(&state, chat_id, limit, json).await,
        Commands::Chats { json } => cli::history::list_chats(&state, json).await,
    };

    recall_observe::shutdown_tracing();
    result
}
