//! Strict MarkdownV2 escaping.

/// Characters that must be backslash-escaped in MarkdownV2 literal text.
pub const MARKDOWN_V2_SPECIALS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape `text` so that MarkdownV2 renders it literally.
///
/// Backslashes are escaped as well, so text that already contains `\.`
/// becomes `\\\.` (a literal backslash followed by a literal dot) and nothing
/// is ever escaped twice.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn needs_escape(c: char) -> bool {
    c == '\\' || MARKDOWN_V2_SPECIALS.contains(&c)
}

/// Longest prefix of `text` whose escaped form is at most `max_chars` long.
pub fn escapable_prefix(text: &str, max_chars: usize) -> &str {
    let mut width = 0;
    for (idx, c) in text.char_indices() {
        width += if needs_escape(c) { 2 } else { 1 };
        if width > max_chars {
            return &text[..idx];
        }
    }
    text
}

/// Escape text placed inside a MarkdownV2 inline code or pre entity, where
/// only the backtick and the backslash are special.
pub fn escape_markdown_v2_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '`' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
