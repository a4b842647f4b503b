//! Extraction of the user-facing payload from `/qwen` answers.
//!
//! Models are asked to lead with "Ответ:" but often narrate ("### Final
//! Answer", "Итог:", ...). This is a best-effort heuristic, not a parse: the
//! marker table is scanned in order, the first marker found anywhere in the
//! text wins, and only the text after its first occurrence is kept.
//! Overlapping markers are resolved by table order, never by position.

/// Ordered "final answer" markers.
///
/// Colon variants precede their bare forms so the colon is consumed with the
/// marker. `###` on its own is the last resort.
pub const FINAL_ANSWER_MARKERS: &[&str] = &[
    // Russian, plain
    "Вывод:",
    "вывод:",
    "Ответ:",
    "ответ:",
    // Russian, heading
    "### Ответ:",
    "### Ответ",
    "### Вывод:",
    "### Вывод",
    "### Финальный Ответ:",
    "### Финальный Ответ",
    "### Финальный Вывод:",
    "### Финальный Вывод",
    // English, heading
    "### Final Answer:",
    "### Final Answer",
    "### Final Response:",
    "### Final Response",
    // English, plain
    "Final Answer:",
    "Final Response:",
    // Russian, plain synonyms
    "Итоговый ответ:",
    "Итоговый ответ",
    "Итог:",
    "итог:",
    "Решение:",
    "решение:",
    "Результат:",
    "результат:",
    "Заключение:",
    "заключение:",
    // English, plain synonyms
    "Summary:",
    "Summary",
    // Russian, restated question
    "Ответ на вопрос:",
    "Ответ на вопрос",
    // Any heading at all
    "###",
];

/// Keep only the text after the first matching marker.
///
/// Returns the trimmed input when no marker matches, or when the matching
/// marker has nothing after it.
pub fn normalize_answer(answer: &str) -> String {
    let trimmed = answer.trim();
    for marker in FINAL_ANSWER_MARKERS {
        if let Some((_, tail)) = trimmed.split_once(marker) {
            let tail = tail.trim();
            if tail.is_empty() {
                break;
            }
            tracing::debug!(marker, "Extracted final answer after marker");
            return tail.to_string();
        }
    }
    trimmed.to_string()
}
