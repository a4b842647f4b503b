//! Chat commands: argument parsing, reply texts, and the orchestrators.

pub mod args;
pub mod messages;
pub mod service;

pub use args::{parse_command, CommandKind, ParsedCommand};
pub use service::{CommandContext, CommandOutcome, CommandService};
