//! CLI command definitions for the `recall` binary.

pub mod history;

use clap::{Parser, Subcommand};

/// Chat-history assistant for Telegram groups.
#[derive(Parser)]
#[command(name = "recall", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to Telegram and start answering commands.
    Run,

    /// Print the history window the bot would send to the model.
    History {
        /// Telegram chat id (group ids are negative).
        #[arg(allow_hyphen_values = true)]
        chat_id: i64,

        /// Number of recent messages (1-500).
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },

    /// List archived chats with message counts.
    #[command(alias = "ls")]
    Chats {
        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },
}
