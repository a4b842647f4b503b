//! Prompt texts for the two completion modes.
//!
//! The assistant speaks Russian by default; the system prompt tells the model
//! to mirror the language of the request.

use super::CompletionMode;

/// Shared preamble: tone, language, and the allowed MarkdownV2 subset.
pub const BASE_SYSTEM_PROMPT: &str = "Ты — полезный ассистент. Отвечай на русском языке, \
если в запросе используется русский язык. Будь краток, по существу. \
Используй только разметку MarkdownV2, поддерживаемую Telegram: *жирный*, _курсив_, `код`, \
~перечеркнутый~, ```блок кода```, ||скрытый текст||. \
Не используй HTML или другие форматы разметки. \
Убедись, что вся разметка корректна для MarkdownV2: экранируй специальные символы \
\\, _, *, [, ], (, ), ~, `, >, #, +, -, =, |, {, }, ., !";

/// Summaries must stay inside the supplied transcript.
pub const SUMMARIZE_SYSTEM_ADDENDUM: &str = " Предоставляй сводки, основываясь *только* на \
предоставленном контексте чата. Не добавляй информацию, отсутствующую в чате.";

/// Questions fall back to general knowledge instead of refusing.
///
/// Product decision carried over deliberately: the model is told never to
/// answer "the chat has no information about this" and to extrapolate from
/// partial context instead. This trades grounding for helpfulness, so answers
/// to `/qwen` may contain facts that never appeared in the chat.
pub const ASK_SYSTEM_ADDENDUM: &str = " Если для ответа на вопрос пользователя в предоставленных \
сообщениях чата нет информации, отвечай на вопрос самостоятельно, используя свои знания. \
Никогда не отвечай в формате «Информации о ... в предоставленных сообщениях чата нет». \
Всегда отвечай на вопрос, даже если он не связан с чатом. \
Если информация в чате неполная, дополняй её и всё равно давай ответ.";

/// Fixed reply used whenever the completion call fails.
pub const APOLOGY: &str = "Извините, произошла ошибка при обработке вашего запроса сервисом ИИ.";

/// Full system prompt for a mode.
pub fn system_prompt(mode: CompletionMode) -> String {
    let addendum = match mode {
        CompletionMode::Summarize => SUMMARIZE_SYSTEM_ADDENDUM,
        CompletionMode::Ask => ASK_SYSTEM_ADDENDUM,
    };
    format!("{BASE_SYSTEM_PROMPT}{addendum}")
}

/// User prompt asking for a digest of the transcript.
pub fn summary_prompt(transcript: &str) -> String {
    format!(
        "Проанализируй следующие сообщения чата, которые идут в хронологическом порядке \
(сначала самые старые). Предоставь краткую и информативную сводку последних новостей \
или важных обсуждений. Сосредоточься на ключевых моментах, решениях или обновлениях. \
Избегай ненужных деталей и «воды». Не упоминай, что ты суммируешь чат, просто предоставь \
сводку напрямую на русском языке.\n\n\
Сообщения чата:\n{transcript}\n\n\
Выводи только финальный ответ, без своих рассуждений."
    )
}

/// User prompt asking a question against the transcript.
pub fn question_prompt(transcript: &str, question: &str) -> String {
    format!(
        "Используя следующие сообщения чата (в хронологическом порядке, сначала самые старые), \
кратко и точно ответь на вопрос пользователя. Отвечай на русском языке. \
Начни итоговый ответ с «Ответ:».\n\n\
Сообщения чата:\n{transcript}\n\n\
Вопрос пользователя: {question}\n\n\
Выводи только финальный ответ, без своих рассуждений."
    )
}
