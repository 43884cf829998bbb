//! Decides whether an inbound message deserves a courtesy notice.
//!
//! The rules are pure predicates evaluated in a fixed order; the first rule
//! that reaches a decision wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::config::DispatchConfig;
use crate::core::models::{Classification, IgnoreReason, InboundMessage, PatternKind};

/// Public channel ids start with `C`; DMs use `D` and private groups `G`.
const PUBLIC_CHANNEL_PREFIX: char = 'C';

static BARE_USER_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<@[a-zA-Z0-9_]+>$")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// `<!here>`, `<!channel>` and the labelled forms `<!here|@here>`.
static BROADCAST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!(?:here|channel)(?:\|[^>]*)?>")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// Block fences first so their backticks are not read as inline spans.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```.*?```")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// Backtick runs left after fence removal belong to an unclosed fence.
static BACKTICK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`{2,}")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

// Inline code never spans lines.
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`\n]*`")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

type Rule = fn(&InboundMessage, &DispatchConfig) -> Option<Classification>;

const RULES: &[Rule] = &[
    from_automated_actor,
    outside_public_channel,
    missing_text,
    bare_user_reference,
    broadcast_mention,
];

/// Classify one message. Total over every message shape.
#[must_use]
pub fn classify(message: &InboundMessage, config: &DispatchConfig) -> Classification {
    RULES
        .iter()
        .find_map(|rule| rule(message, config))
        .unwrap_or(Classification::Ignored(IgnoreReason::NoPatternMatch))
}

fn from_automated_actor(message: &InboundMessage, _: &DispatchConfig) -> Option<Classification> {
    let has_author = message.author_id.as_deref().is_some_and(|a| !a.is_empty());
    (message.bot_id.is_some() || !has_author)
        .then_some(Classification::Ignored(IgnoreReason::FromAutomatedActor))
}

fn outside_public_channel(message: &InboundMessage, _: &DispatchConfig) -> Option<Classification> {
    (!message.channel_id.starts_with(PUBLIC_CHANNEL_PREFIX))
        .then_some(Classification::Ignored(IgnoreReason::NotAPublicChannel))
}

fn missing_text(message: &InboundMessage, _: &DispatchConfig) -> Option<Classification> {
    message
        .text
        .as_deref()
        .is_none_or(str::is_empty)
        .then_some(Classification::Ignored(IgnoreReason::NoText))
}

fn bare_user_reference(message: &InboundMessage, config: &DispatchConfig) -> Option<Classification> {
    if !config.enable_mention_invite_rule {
        return None;
    }
    let text = message.text.as_deref()?;
    is_bare_user_reference(text).then_some(Classification::Matched(PatternKind::BareUserReference))
}

fn broadcast_mention(message: &InboundMessage, _: &DispatchConfig) -> Option<Classification> {
    let text = message.text.as_deref()?;
    contains_broadcast_outside_code(text)
        .then_some(Classification::Matched(PatternKind::BroadcastMention))
}

/// True when the trimmed text is a single `<@ID>` token and nothing else.
#[must_use]
pub fn is_bare_user_reference(text: &str) -> bool {
    BARE_USER_REFERENCE_RE.is_match(text.trim())
}

/// True when `<!here>` or `<!channel>` appears outside inline and block code.
#[must_use]
pub fn contains_broadcast_outside_code(text: &str) -> bool {
    BROADCAST_RE.is_match(&strip_code_spans(text))
}

/// Replace fenced and inline code spans with a single space.
///
/// An unmatched backtick or an unclosed fence is treated as ordinary text.
#[must_use]
pub fn strip_code_spans(text: &str) -> String {
    let without_blocks = CODE_BLOCK_RE.replace_all(text, " ");
    let without_fences = BACKTICK_RUN_RE.replace_all(&without_blocks, " ");
    INLINE_CODE_RE.replace_all(&without_fences, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_and_block_code() {
        assert_eq!(strip_code_spans("a `b` c"), "a   c");
        assert_eq!(strip_code_spans("x\n```\n<!here>\n```\ny"), "x\n \ny");
        assert_eq!(strip_code_spans("no code"), "no code");
    }

    #[test]
    fn unterminated_backtick_is_literal() {
        assert!(contains_broadcast_outside_code("oops ` <!here>"));
    }

    #[test]
    fn inline_code_does_not_cross_lines() {
        assert!(contains_broadcast_outside_code(
            "it's a `bug\n<!here> please look at `foo` asap"
        ));
        assert_eq!(strip_code_spans("a `b\nc` d"), "a `b\nc` d");
    }

    #[test]
    fn unclosed_fence_is_literal() {
        assert!(contains_broadcast_outside_code("``` oops <!here> `x`"));
        assert!(!contains_broadcast_outside_code("``` oops `<!here>`"));
    }

    #[test]
    fn labelled_broadcast_tokens_match() {
        assert!(contains_broadcast_outside_code("<!here|@here> ping"));
        assert!(contains_broadcast_outside_code("hey <!channel|@channel>"));
        assert!(!contains_broadcast_outside_code("<!everyone> hello"));
        assert!(!contains_broadcast_outside_code("here and channel"));
    }

    #[test]
    fn bare_reference_tolerates_surrounding_whitespace() {
        assert!(is_bare_user_reference("  <@U0C6SS0N9>\n"));
        assert!(!is_bare_user_reference("<@U1> <@U2>"));
        assert!(!is_bare_user_reference("<@U1|homer>"));
    }
}
