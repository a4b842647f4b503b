//! The `/history` and `/qwen` orchestrators.
//!
//! Both follow the same sequence: acknowledge, fetch the window, archive the
//! acknowledgement, bail out on an empty window, complete, delete the
//! acknowledgement, deliver. Every reply the bot sends along the way is
//! archived so it shows up in later windows.

use recall_types::chat::HistoryWindow;
use recall_types::transport::{ParseMode, ReplyTarget, SentMessage};
use tracing::{error, info, warn};

use crate::answer::normalize_answer;
use crate::completion::{prompts, CompletionClient, CompletionMode};
use crate::history::repository::HistoryRepository;
use crate::history::service::HistoryService;
use crate::markup::delivery::{
    deliver, send_with_fallback, DeliveryPolicy, DeliveryReport, MarkupStyle, SendOutcome,
};
use crate::publish::DocumentPublisher;
use crate::transport::ChatTransport;

use super::args::{parse_ask_args, parse_history_args, AskArgs, CommandKind};
use super::messages;

/// An invocation of a command: where it came from and its argument text.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub target: ReplyTarget,
    pub args: String,
}

/// How a command invocation ended.
#[derive(Debug)]
pub enum CommandOutcome {
    /// `/qwen` without a question; the usage hint was sent.
    Usage,
    /// The chat has no archived messages yet.
    NoHistory,
    /// A completion was delivered (or at least attempted).
    Answered(DeliveryReport),
    /// Something broke before a completion could be made.
    Failed,
}

/// Runs commands against the archive, the LLM, and the chat transport.
pub struct CommandService<H: HistoryRepository, T: ChatTransport, P: DocumentPublisher> {
    history: HistoryService<H>,
    transport: T,
    publisher: P,
    completion: CompletionClient,
    delivery: DeliveryPolicy,
}

impl<H, T, P> CommandService<H, T, P>
where
    H: HistoryRepository,
    T: ChatTransport,
    P: DocumentPublisher,
{
    pub fn new(
        history: HistoryService<H>,
        transport: T,
        publisher: P,
        completion: CompletionClient,
        delivery: DeliveryPolicy,
    ) -> Self {
        Self {
            history,
            transport,
            publisher,
            completion,
            delivery,
        }
    }

    pub fn history(&self) -> &HistoryService<H> {
        &self.history
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `/history [n]`: summarize the last `n` archived messages.
    #[tracing::instrument(
        name = "command.summarize",
        skip(self, ctx),
        fields(chat_id = ctx.target.chat.id, message_id = ctx.target.message_id)
    )]
    pub async fn summarize(&self, ctx: &CommandContext) -> CommandOutcome {
        let limit = parse_history_args(&ctx.args);
        info!(limit, "Summarize requested");

        let ack = self.acknowledge(&ctx.target, &messages::summarize_ack(limit)).await;
        let Some(window) = self
            .load_window(ctx, limit, ack.as_ref(), CommandKind::History)
            .await
        else {
            return CommandOutcome::Failed;
        };

        if window.is_empty() {
            return self
                .no_history(&ctx.target, ack, messages::NO_HISTORY_FOR_SUMMARY)
                .await;
        }

        let prompt = prompts::summary_prompt(&window.transcript());
        let summary = self.completion.complete(&prompt, CompletionMode::Summarize).await;
        self.dismiss(ack).await;

        let report = self
            .deliver_answer(
                &ctx.target,
                &summary,
                MarkupStyle::Literal,
                messages::SUMMARY_DOCUMENT_TITLE,
            )
            .await;
        CommandOutcome::Answered(report)
    }

    /// `/qwen [n] question`: answer a question against the last `n` messages.
    #[tracing::instrument(
        name = "command.ask",
        skip(self, ctx),
        fields(chat_id = ctx.target.chat.id, message_id = ctx.target.message_id)
    )]
    pub async fn ask(&self, ctx: &CommandContext) -> CommandOutcome {
        let (limit, question) = match parse_ask_args(&ctx.args) {
            AskArgs::Missing => {
                self.reply_and_archive(&ctx.target, messages::ASK_USAGE_HINT).await;
                return CommandOutcome::Usage;
            }
            AskArgs::Question { limit, question } => (limit, question),
        };
        info!(limit, question_chars = question.chars().count(), "Question received");

        let ack = self.acknowledge(&ctx.target, &messages::ask_ack(limit)).await;
        let Some(window) = self
            .load_window(ctx, limit, ack.as_ref(), CommandKind::Ask)
            .await
        else {
            return CommandOutcome::Failed;
        };

        if window.is_empty() {
            return self
                .no_history(&ctx.target, ack, messages::NO_HISTORY_FOR_QUESTION)
                .await;
        }

        let prompt = prompts::question_prompt(&window.transcript(), &question);
        let raw = self.completion.complete(&prompt, CompletionMode::Ask).await;
        let answer = normalize_answer(&raw);
        self.dismiss(ack).await;

        let report = self
            .deliver_answer(
                &ctx.target,
                &answer,
                MarkupStyle::ModelMarkdown,
                messages::ANSWER_DOCUMENT_TITLE,
            )
            .await;
        CommandOutcome::Answered(report)
    }

    /// Greeting for a group the bot was just added to.
    pub async fn welcome(&self, target: &ReplyTarget) -> SendOutcome {
        let outcome = send_with_fallback(
            &self.transport,
            target,
            &messages::welcome_markdown(),
            &messages::welcome_plain(),
            ParseMode::MarkdownV2,
        )
        .await;
        self.archive_outcome(&outcome).await;
        outcome
    }

    /// Fetch the window and archive the acknowledgement afterwards, so the
    /// acknowledgement itself never makes an empty chat look non-empty.
    async fn load_window(
        &self,
        ctx: &CommandContext,
        limit: u32,
        ack: Option<&SentMessage>,
        kind: CommandKind,
    ) -> Option<HistoryWindow> {
        match self.history.fetch_recent(ctx.target.chat.id, limit).await {
            Ok(window) => {
                if let Some(ack) = ack {
                    self.history.record_sent(ack).await;
                }
                Some(window)
            }
            Err(e) => {
                error!(
                    chat_id = ctx.target.chat.id,
                    command = kind.name(),
                    error = %e,
                    "Failed to load history window"
                );
                if let Some(ack) = ack {
                    self.history.record_sent(ack).await;
                    self.dismiss(Some(ack.clone())).await;
                }
                self.reply_and_archive(&ctx.target, &messages::command_failed(kind))
                    .await;
                None
            }
        }
    }

    async fn no_history(
        &self,
        target: &ReplyTarget,
        ack: Option<SentMessage>,
        text: &str,
    ) -> CommandOutcome {
        info!(chat_id = target.chat.id, "No archived history for chat");
        self.dismiss(ack).await;
        self.reply_and_archive(target, text).await;
        CommandOutcome::NoHistory
    }

    async fn deliver_answer(
        &self,
        target: &ReplyTarget,
        text: &str,
        style: MarkupStyle,
        title: &str,
    ) -> DeliveryReport {
        let report = deliver(
            &self.transport,
            &self.publisher,
            &self.delivery,
            target,
            text,
            style,
            title,
        )
        .await;
        info!(
            chat_id = target.chat.id,
            route = ?report.route,
            sent = report.outcome.is_sent(),
            "Answer delivered"
        );
        self.archive_outcome(&report.outcome).await;
        report
    }

    /// Post the progress message. A failure here is logged and the command
    /// carries on without one.
    async fn acknowledge(&self, target: &ReplyTarget, text: &str) -> Option<SentMessage> {
        match self.transport.reply(target, text, ParseMode::Plain).await {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(chat_id = target.chat.id, error = %e, "Failed to send acknowledgement");
                None
            }
        }
    }

    async fn dismiss(&self, ack: Option<SentMessage>) {
        if let Some(ack) = ack {
            if let Err(e) = self.transport.delete(&ack).await {
                warn!(
                    chat_id = ack.chat.id,
                    message_id = ack.message_id,
                    error = %e,
                    "Failed to delete acknowledgement"
                );
            }
        }
    }

    async fn reply_and_archive(&self, target: &ReplyTarget, text: &str) {
        let outcome = send_with_fallback(&self.transport, target, text, text, ParseMode::Plain).await;
        self.archive_outcome(&outcome).await;
    }

    async fn archive_outcome(&self, outcome: &SendOutcome) {
        if let Some(sent) = outcome.message() {
            self.history.record_sent(sent).await;
        }
    }
}
