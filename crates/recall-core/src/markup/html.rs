//! Conversion of the model's MarkdownV2 dialect into a basic HTML subset.
//!
//! Used when a reply is too long for a chat message and goes out as a
//! published document instead. The output only ever contains `<b>`, `<i>`,
//! `<s>`, `<code>`, `<pre>` and `<br>`, with `&`, `<` and `>` escaped.
//! Unbalanced delimiters are kept as literal text.

/// Inline delimiters, longest first so `**` wins over `*`.
const INLINE_STYLES: &[(&str, &str, &str)] = &[
    ("**", "<b>", "</b>"),
    ("__", "<i>", "</i>"),
    ("~~", "<s>", "</s>"),
    ("||", "<i>[спойлер] ", "</i>"),
    ("*", "<b>", "</b>"),
    ("_", "<i>", "</i>"),
    ("~", "<s>", "</s>"),
];

const FENCE: &str = "```";

/// Convert MarkdownV2-flavoured text to the HTML subset.
pub fn markdown_v2_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut rest = text;

    while let Some(open) = find_unescaped(rest, FENCE) {
        render_inline(&rest[..open], &mut out);
        let body = &rest[open + FENCE.len()..];
        match find_unescaped(body, FENCE) {
            Some(close) => {
                out.push_str("<pre>");
                push_code(skip_language_line(&body[..close]), &mut out);
                out.push_str("</pre>");
                rest = &body[close + FENCE.len()..];
            }
            None => {
                // Unterminated fence: the remainder is literal.
                push_literal(&rest[open..], &mut out);
                return out;
            }
        }
    }

    render_inline(rest, &mut out);
    out
}

fn render_inline(text: &str, out: &mut String) {
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c == '\\' {
            match rest[1..].chars().next() {
                Some(next) => {
                    push_char(next, out);
                    i += 1 + next.len_utf8();
                }
                None => {
                    push_char(c, out);
                    i += 1;
                }
            }
            continue;
        }

        if c == '`' {
            if let Some(close) = find_unescaped(&rest[1..], "`") {
                out.push_str("<code>");
                push_code(&rest[1..1 + close], out);
                out.push_str("</code>");
                i += close + 2;
                continue;
            }
        }

        if let Some((delim, open_tag, close_tag)) =
            INLINE_STYLES.iter().find(|(d, _, _)| rest.starts_with(d))
        {
            let inner = &rest[delim.len()..];
            if let Some(close) = find_unescaped(inner, delim).filter(|close| *close > 0) {
                out.push_str(open_tag);
                render_inline(&inner[..close], out);
                out.push_str(close_tag);
                i += delim.len() * 2 + close;
                continue;
            }
        }

        push_char(c, out);
        i += c.len_utf8();
    }
}

/// Byte offset of the first occurrence of `pattern` not preceded by a
/// MarkdownV2 backslash escape.
fn find_unescaped(text: &str, pattern: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if text[idx..].starts_with(pattern) {
            return Some(idx);
        }
    }
    None
}

/// Drop a leading language tag such as `rust` in "```rust\n...".
fn skip_language_line(code: &str) -> &str {
    if let Some(stripped) = code.strip_prefix('\n') {
        return stripped;
    }
    match code.split_once('\n') {
        Some((first, remainder))
            if !first.is_empty() && first.len() < 25 && !first.contains(char::is_whitespace) =>
        {
            remainder
        }
        _ => code,
    }
}

/// Code bodies keep their newlines; only `\`` and `\\` are unescaped.
fn push_code(code: &str, out: &mut String) {
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '`' || next == '\\' {
                    chars.next();
                    push_escaped(next, out);
                    continue;
                }
            }
        }
        push_escaped(c, out);
    }
}

fn push_literal(text: &str, out: &mut String) {
    for c in text.chars() {
        push_char(c, out);
    }
}

fn push_char(c: char, out: &mut String) {
    if c == '\n' {
        out.push_str("<br>");
    } else {
        push_escaped(c, out);
    }
}

fn push_escaped(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}
