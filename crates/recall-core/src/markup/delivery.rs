//! Getting a model answer in front of the user without losing it.
//!
//! Two failure modes are covered here. A rich-markup send that the platform
//! rejects is retried once as plain text ([`send_with_fallback`]). An answer
//! longer than one message is published as a document and linked, or
//! truncated when publishing fails ([`deliver`]).

use std::time::Duration;

use recall_types::error::TransportError;
use recall_types::transport::{ParseMode, ReplyTarget, SentMessage};
use tracing::{info, warn};

use crate::publish::DocumentPublisher;
use crate::transport::ChatTransport;

use super::escape::{escapable_prefix, escape_markdown_v2};
use super::html::markdown_v2_to_html;

/// Platform limit for a single message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// How answer text is turned into MarkdownV2 for the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupStyle {
    /// Treat the text as literal: every special character is escaped.
    Literal,
    /// Trust the model's own MarkdownV2 and send it as-is.
    ModelMarkdown,
}

/// Result of a send that may have fallen back to plain text.
#[derive(Debug)]
pub enum SendOutcome {
    SentRich(SentMessage),
    SentPlain(SentMessage),
    Failed(TransportError),
}

impl SendOutcome {
    pub fn message(&self) -> Option<&SentMessage> {
        match self {
            SendOutcome::SentRich(m) | SendOutcome::SentPlain(m) => Some(m),
            SendOutcome::Failed(_) => None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.message().is_some()
    }
}

/// Send `rich_text` with `mode`; if the transport rejects it, send
/// `plain_text` once more without markup.
///
/// A `Plain` mode request gets exactly one attempt.
pub async fn send_with_fallback<T: ChatTransport>(
    transport: &T,
    target: &ReplyTarget,
    rich_text: &str,
    plain_text: &str,
    mode: ParseMode,
) -> SendOutcome {
    if !mode.is_rich() {
        return match transport.reply(target, plain_text, ParseMode::Plain).await {
            Ok(sent) => SendOutcome::SentPlain(sent),
            Err(e) => {
                warn!(chat_id = target.chat.id, error = %e, "Failed to send message");
                SendOutcome::Failed(e)
            }
        };
    }

    match transport.reply(target, rich_text, mode).await {
        Ok(sent) => SendOutcome::SentRich(sent),
        Err(e) => {
            warn!(
                chat_id = target.chat.id,
                mode = %mode,
                markup_related = e.is_markup_related(),
                error = %e,
                "Rich send rejected, retrying as plain text"
            );
            match transport.reply(target, plain_text, ParseMode::Plain).await {
                Ok(sent) => SendOutcome::SentPlain(sent),
                Err(e) => {
                    warn!(chat_id = target.chat.id, error = %e, "Plain-text retry failed");
                    SendOutcome::Failed(e)
                }
            }
        }
    }
}

/// Limits applied by [`deliver`].
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    pub max_chars: usize,
    pub publish_timeout: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_chars: MAX_MESSAGE_CHARS,
            publish_timeout: Duration::from_secs(30),
        }
    }
}

/// The path an answer took to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryRoute {
    Inline,
    Published { url: String },
    Truncated,
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub route: DeliveryRoute,
    pub outcome: SendOutcome,
}

/// Reply text pointing at a published document.
pub fn published_link_text(url: &str) -> String {
    format!(
        "Ответ получился слишком длинным для одного сообщения, поэтому он опубликован здесь: {url}"
    )
}

/// Deliver `text` as a reply to `target`.
///
/// Length is measured in characters of `text` before any escaping. Text that
/// fits goes inline. Longer text is converted to HTML and published under
/// `title`; the user gets a link. When publishing fails or times out, the
/// text is cut to the limit and sent inline.
pub async fn deliver<T: ChatTransport, P: DocumentPublisher>(
    transport: &T,
    publisher: &P,
    policy: &DeliveryPolicy,
    target: &ReplyTarget,
    text: &str,
    style: MarkupStyle,
    title: &str,
) -> DeliveryReport {
    let chars = text.chars().count();
    if chars <= policy.max_chars {
        let outcome = send_styled(transport, target, text, style).await;
        return DeliveryReport {
            route: DeliveryRoute::Inline,
            outcome,
        };
    }

    info!(
        chat_id = target.chat.id,
        chars,
        limit = policy.max_chars,
        "Answer exceeds message limit, publishing"
    );
    let html = markdown_v2_to_html(text);
    let published =
        tokio::time::timeout(policy.publish_timeout, publisher.publish(title, &html)).await;

    match published {
        Ok(Ok(url)) => {
            info!(chat_id = target.chat.id, url = %url, "Published long answer");
            let link = published_link_text(&url);
            let outcome =
                send_with_fallback(transport, target, &link, &link, ParseMode::Plain).await;
            DeliveryReport {
                route: DeliveryRoute::Published { url },
                outcome,
            }
        }
        Ok(Err(e)) => {
            warn!(chat_id = target.chat.id, error = %e, "Publishing failed, truncating answer");
            truncated(transport, target, text, style, policy.max_chars).await
        }
        Err(_) => {
            warn!(
                chat_id = target.chat.id,
                timeout_secs = policy.publish_timeout.as_secs(),
                "Publishing timed out, truncating answer"
            );
            truncated(transport, target, text, style, policy.max_chars).await
        }
    }
}

async fn truncated<T: ChatTransport>(
    transport: &T,
    target: &ReplyTarget,
    text: &str,
    style: MarkupStyle,
    max_chars: usize,
) -> DeliveryReport {
    let plain = truncate_chars(text, max_chars);
    let outcome = match style {
        MarkupStyle::Literal => {
            let rich = escape_markdown_v2(escapable_prefix(text, max_chars));
            send_with_fallback(transport, target, &rich, plain, ParseMode::MarkdownV2).await
        }
        MarkupStyle::ModelMarkdown => {
            send_with_fallback(transport, target, plain, plain, ParseMode::MarkdownV2).await
        }
    };
    DeliveryReport {
        route: DeliveryRoute::Truncated,
        outcome,
    }
}

async fn send_styled<T: ChatTransport>(
    transport: &T,
    target: &ReplyTarget,
    text: &str,
    style: MarkupStyle,
) -> SendOutcome {
    match style {
        MarkupStyle::Literal => {
            let escaped = escape_markdown_v2(text);
            send_with_fallback(transport, target, &escaped, text, ParseMode::MarkdownV2).await
        }
        MarkupStyle::ModelMarkdown => {
            send_with_fallback(transport, target, text, text, ParseMode::MarkdownV2).await
        }
    }
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{group_chat, FakePublisher, FakeTransport};

    fn target() -> ReplyTarget {
        ReplyTarget {
            chat: group_chat(-1001),
            message_id: 10,
        }
    }

    #[tokio::test]
    async fn test_rich_send_succeeds_first_time() {
        let transport = FakeTransport::default();
        let outcome =
            send_with_fallback(&transport, &target(), "*hi*", "hi", ParseMode::MarkdownV2).await;
        assert!(matches!(outcome, SendOutcome::SentRich(_)));
        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].mode, ParseMode::MarkdownV2);
    }

    #[tokio::test]
    async fn test_rich_rejection_retries_plain_once() {
        let transport = FakeTransport::default();
        transport.reject_rich();
        let outcome =
            send_with_fallback(&transport, &target(), "*hi*", "hi", ParseMode::MarkdownV2).await;
        assert!(matches!(outcome, SendOutcome::SentPlain(_)));
        let replies = transport.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[1].mode, ParseMode::Plain);
        assert_eq!(replies[1].text, "hi");
    }

    #[tokio::test]
    async fn test_plain_failure_after_rich_failure_is_reported() {
        let transport = FakeTransport::default();
        transport.reject_all();
        let outcome =
            send_with_fallback(&transport, &target(), "*hi*", "hi", ParseMode::MarkdownV2).await;
        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert_eq!(transport.replies().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_mode_single_attempt() {
        let transport = FakeTransport::default();
        transport.reject_all();
        let outcome = send_with_fallback(&transport, &target(), "x", "x", ParseMode::Plain).await;
        assert!(!outcome.is_sent());
        assert_eq!(transport.replies().len(), 1);
    }

    #[tokio::test]
    async fn test_exactly_at_limit_goes_inline() {
        let transport = FakeTransport::default();
        let publisher = FakePublisher::publishing("https://telegra.ph/x");
        let text = "я".repeat(MAX_MESSAGE_CHARS);
        let report = deliver(
            &transport,
            &publisher,
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::ModelMarkdown,
            "t",
        )
        .await;
        assert_eq!(report.route, DeliveryRoute::Inline);
        assert_eq!(publisher.calls(), 0);
        assert_eq!(transport.replies()[0].text, text);
    }

    #[tokio::test]
    async fn test_one_over_limit_is_published_and_linked() {
        let transport = FakeTransport::default();
        let publisher = FakePublisher::publishing("https://telegra.ph/answer-01-01");
        let text = "я".repeat(MAX_MESSAGE_CHARS + 1);
        let report = deliver(
            &transport,
            &publisher,
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::ModelMarkdown,
            "Ответ",
        )
        .await;
        assert_eq!(
            report.route,
            DeliveryRoute::Published {
                url: "https://telegra.ph/answer-01-01".to_string()
            }
        );
        assert_eq!(publisher.calls(), 1);
        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].mode, ParseMode::Plain);
        assert!(replies[0].text.contains("https://telegra.ph/answer-01-01"));
    }

    #[tokio::test]
    async fn test_publish_failure_truncates_to_limit() {
        let transport = FakeTransport::default();
        let publisher = FakePublisher::failing();
        let text = "a".repeat(MAX_MESSAGE_CHARS + 500);
        let report = deliver(
            &transport,
            &publisher,
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::ModelMarkdown,
            "t",
        )
        .await;
        assert_eq!(report.route, DeliveryRoute::Truncated);
        assert!(report.outcome.is_sent());
        assert_eq!(transport.replies()[0].text.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn test_length_measured_before_escaping() {
        // 4000 dots escape to 8000 chars but the answer itself still fits, so
        // it stays inline and only the plain retry gets through.
        let transport = FakeTransport::default();
        let publisher = FakePublisher::failing();
        let text = ".".repeat(4000);
        let report = deliver(
            &transport,
            &publisher,
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::Literal,
            "t",
        )
        .await;
        assert_eq!(report.route, DeliveryRoute::Inline);
        let replies = transport.replies();
        assert_eq!(replies[0].text, "\\.".repeat(4000));
        assert_eq!(replies[1].mode, ParseMode::Plain);
        assert_eq!(replies[1].text, text);
    }

    #[tokio::test]
    async fn test_literal_style_plain_retry_uses_unescaped_text() {
        let transport = FakeTransport::default();
        transport.reject_rich();
        let report = deliver(
            &transport,
            &FakePublisher::failing(),
            &DeliveryPolicy::default(),
            &target(),
            "v1.2!",
            MarkupStyle::Literal,
            "t",
        )
        .await;
        assert!(matches!(report.outcome, SendOutcome::SentPlain(_)));
        let replies = transport.replies();
        assert_eq!(replies[0].text, r"v1\.2\!");
        assert_eq!(replies[1].text, "v1.2!");
    }

    #[tokio::test]
    async fn test_literal_truncation_fits_after_escaping() {
        let transport = FakeTransport::default();
        let text = "v1.2! ".repeat(700);
        let report = deliver(
            &transport,
            &FakePublisher::failing(),
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::Literal,
            "t",
        )
        .await;
        assert_eq!(report.route, DeliveryRoute::Truncated);
        assert!(matches!(report.outcome, SendOutcome::SentRich(_)));
        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].mode, ParseMode::MarkdownV2);
        assert!(replies[0].text.chars().count() <= MAX_MESSAGE_CHARS);
        assert!(replies[0].text.starts_with(r"v1\.2\! "));
    }

    #[tokio::test]
    async fn test_inline_literal_over_limit_once_escaped_falls_back_to_plain() {
        let transport = FakeTransport::default();
        let text = "v1.2! ".repeat(600);
        let report = deliver(
            &transport,
            &FakePublisher::failing(),
            &DeliveryPolicy::default(),
            &target(),
            &text,
            MarkupStyle::Literal,
            "t",
        )
        .await;
        assert_eq!(report.route, DeliveryRoute::Inline);
        assert!(matches!(report.outcome, SendOutcome::SentPlain(_)));
        let replies = transport.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].mode, ParseMode::MarkdownV2);
        assert_eq!(replies[1].mode, ParseMode::Plain);
        assert_eq!(replies[1].text, text);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("привет", 3), "при");
        assert_eq!(truncate_chars("ok", 5), "ok");
    }
}
