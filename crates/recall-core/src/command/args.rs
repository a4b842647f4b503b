//! Parsing of command text and command arguments.

/// Window size used when no usable count is given.
pub const DEFAULT_MESSAGE_COUNT: u32 = 100;

/// Largest window a user may request.
pub const MAX_MESSAGE_COUNT: u32 = 500;

/// The commands the assistant answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `/history [n]`: summarize the last `n` messages.
    History,
    /// `/qwen [n] question`: answer a question against the last `n` messages.
    Ask,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::History => "history",
            CommandKind::Ask => "qwen",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "history" => Some(CommandKind::History),
            "qwen" => Some(CommandKind::Ask),
            _ => None,
        }
    }
}

/// A recognized command and its raw argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub args: String,
}

/// Recognize `/history` and `/qwen`, with or without an `@bot_username`
/// suffix.
///
/// A suffix naming another bot means the command is not for us. Matching of
/// the username is case-insensitive, as on the platform.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<ParsedCommand> {
    let text = text.trim_start();
    let body = text.strip_prefix('/')?;
    let (head, args) = match body.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (body, ""),
    };

    let name = match head.split_once('@') {
        Some((name, addressee)) => {
            let ours = bot_username.is_some_and(|me| me.eq_ignore_ascii_case(addressee));
            if !ours {
                return None;
            }
            name
        }
        None => head,
    };

    let kind = CommandKind::from_name(name)?;
    Some(ParsedCommand {
        kind,
        args: args.to_string(),
    })
}

/// Map a requested count onto the allowed range.
///
/// Zero, negative, and over-limit requests all fall back to the default.
pub fn clamp_message_count(requested: i64) -> u32 {
    if requested <= 0 || requested > i64::from(MAX_MESSAGE_COUNT) {
        DEFAULT_MESSAGE_COUNT
    } else {
        requested as u32
    }
}

fn is_count_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn count_from_token(token: &str) -> u32 {
    // Digit strings too large for i64 are over the limit anyway.
    token
        .parse::<i64>()
        .map(clamp_message_count)
        .unwrap_or(DEFAULT_MESSAGE_COUNT)
}

/// Window size for `/history [n]`.
///
/// Only a first token made entirely of ASCII digits counts as `n`; anything
/// else means the default.
pub fn parse_history_args(args: &str) -> u32 {
    match args.split_whitespace().next() {
        Some(token) if is_count_token(token) => count_from_token(token),
        _ => DEFAULT_MESSAGE_COUNT,
    }
}

/// Parsed `/qwen` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskArgs {
    /// Nothing to ask: reply with the usage hint.
    Missing,
    Question { limit: u32, question: String },
}

/// Split `/qwen` arguments into an optional count and the question.
///
/// A leading digit token followed by more text is the count. A lone token,
/// digits included, is the question itself.
pub fn parse_ask_args(args: &str) -> AskArgs {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return AskArgs::Missing;
    }

    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if is_count_token(first) && !rest.is_empty() {
            return AskArgs::Question {
                limit: count_from_token(first),
                question: rest.to_string(),
            };
        }
    }

    AskArgs::Question {
        limit: DEFAULT_MESSAGE_COUNT,
        question: trimmed.to_string(),
    }
}
