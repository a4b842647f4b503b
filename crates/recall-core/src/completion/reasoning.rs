//! Removal of reasoning traces from "thinking" model output.

/// Closing tags that end a reasoning preamble, in priority order.
pub const REASONING_SENTINELS: [&str; 3] = ["</think>", "</reasoning>", "<|im_end|>"];

/// Trim `raw` and drop everything up to and including the first sentinel
/// (by priority, not by position) that occurs in it.
///
/// Text without any sentinel is returned trimmed but otherwise unchanged.
pub fn strip_reasoning(raw: &str) -> String {
    let trimmed = raw.trim();
    for sentinel in REASONING_SENTINELS {
        if let Some((_, tail)) = trimmed.split_once(sentinel) {
            tracing::debug!(sentinel, "Found reasoning sentinel, keeping the tail");
            return tail.trim().to_string();
        }
    }
    trimmed.to_string()
}
