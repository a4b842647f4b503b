//! Operator views of the archive: `recall history` and `recall chats`.

use console::style;

use recall_core::command::args::clamp_message_count;
use recall_core::history::repository::HistoryRepository;

use crate::state::AppState;

/// Print the window `/history` would summarize for `chat_id`.
pub async fn show_history(
    state: &AppState,
    chat_id: i64,
    limit: i64,
    json: bool,
) -> anyhow::Result<()> {
    let limit = clamp_message_count(limit);
    let window = state.history.fetch_recent(chat_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(window.entries())?);
        return Ok(());
    }

    if window.is_empty() {
        println!();
        println!(
            "  {} No archived messages for chat {}.",
            style("i").blue().bold(),
            style(chat_id).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    for line in window.entries().iter().map(|e| e.transcript_line()) {
        println!("  {line}");
    }
    println!();
    println!(
        "  {} message(s), limit {}",
        style(window.len()).bold(),
        style(limit).dim()
    );
    println!();
    Ok(())
}

/// List every archived chat, most recently active first.
pub async fn list_chats(state: &AppState, json: bool) -> anyhow::Result<()> {
    let chats = state.history.repo().list_chats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!(
            "  {} Nothing archived yet. Add the bot to a group and start {}.",
            style("i").blue().bold(),
            style("recall run").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    for overview in &chats {
        let last = overview
            .last_message_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>16}  {:<10}  {:>6}  {}  {}",
            style(overview.chat.id).cyan(),
            overview.chat.kind.to_string(),
            overview.message_count,
            style(last).dim(),
            overview.chat.title.as_deref().unwrap_or("(untitled)")
        );
    }
    println!();
    println!("  {} chat(s)", style(chats.len()).bold());
    println!();
    Ok(())
}
