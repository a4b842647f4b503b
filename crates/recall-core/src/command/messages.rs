//! User-facing reply texts.

use crate::markup::escape::{escape_markdown_v2, escape_markdown_v2_code};

use super::args::{CommandKind, DEFAULT_MESSAGE_COUNT};

pub const SUMMARY_DOCUMENT_TITLE: &str = "Сводка чата";
pub const ANSWER_DOCUMENT_TITLE: &str = "Ответ на вопрос";

pub const NO_HISTORY_FOR_SUMMARY: &str = "В моей базе данных еще нет сохраненных сообщений из этого чата. \
Пожалуйста, подождите, пока я их соберу.";

pub const NO_HISTORY_FOR_QUESTION: &str = "В моей базе данных еще нет сохраненных сообщений из этого чата \
для ответа на ваш вопрос. Пожалуйста, подождите.";

pub const ASK_USAGE_HINT: &str =
    "Пожалуйста, задайте вопрос после команды /qwen. Например: /qwen Что было решено по проекту?";

pub fn summarize_ack(count: u32) -> String {
    format!(
        "Анализирую последние {count} сообщений из сохраненной истории... Это может занять некоторое время."
    )
}

pub fn ask_ack(count: u32) -> String {
    format!(
        "Ищу в последних {count} сохраненных сообщениях ответ на ваш вопрос... Это может занять некоторое время."
    )
}

pub fn command_failed(kind: CommandKind) -> String {
    format!(
        "Произошла ошибка при попытке обработать команду /{}.",
        kind.name()
    )
}

/// Greeting parts: `(literal text, optional inline code)`.
fn welcome_parts() -> Vec<(String, Option<&'static str>)> {
    vec![
        ("Всем привет! Я здесь, чтобы помочь.\n\nИспользуйте ".to_string(), Some("/history [n]")),
        (" для получения сводки последних ".to_string(), Some("n")),
        (
            format!(" сообщений (по умолчанию: {DEFAULT_MESSAGE_COUNT}).\nИспользуйте "),
            Some("/qwen [n] [ваш вопрос]"),
        ),
        (" чтобы задать вопрос на основе последних ".to_string(), Some("n")),
        (
            format!(
                " сообщений (по умолчанию: {DEFAULT_MESSAGE_COUNT}).\n\n\
Я начинаю сохранять сообщения с этого момента, чтобы анализировать их в будущем."
            ),
            None,
        ),
    ]
}

/// Greeting posted when the bot joins a group, as MarkdownV2.
pub fn welcome_markdown() -> String {
    welcome_parts()
        .into_iter()
        .map(|(text, code)| {
            let mut part = escape_markdown_v2(&text);
            if let Some(code) = code {
                part.push('`');
                part.push_str(&escape_markdown_v2_code(code));
                part.push('`');
            }
            part
        })
        .collect()
}

/// The same greeting without markup.
pub fn welcome_plain() -> String {
    welcome_parts()
        .into_iter()
        .map(|(text, code)| format!("{text}{}", code.unwrap_or_default()))
        .collect()
}
