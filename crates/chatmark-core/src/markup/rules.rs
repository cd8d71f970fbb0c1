//! Pattern grammar shared by the full and the partial transform.
//!
//! Rules run in table order, so `***` is tried before `**`, and `**` before
//! `*`. Tokens claimed by earlier rules are opaque to later ones.

use std::sync::LazyLock;

use regex::Regex;

use super::token::TokenKind;

static RUBY: LazyLock<Regex> = LazyLock::new(|| compile(r"\[\[([^|\]]+?)\|([^\]]+?)\]\]"));
static BOLD_ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*\*([^*]+?)\*\*\*"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*([^*]+?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*([^*]+?)\*"));
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| compile(r"~([^~]+?)~"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markup rule patterns are valid")
}

/// A single markup rule.
///
/// Capture group 1 is the body; ruby also captures the gloss in group 2.
pub(crate) struct Rule {
    pub kind: TokenKind,
    regex: &'static LazyLock<Regex>,
}

impl Rule {
    pub fn regex(&self) -> &Regex {
        self.regex
    }
}

pub(crate) static RULES: [Rule; 5] = [
    Rule {
        kind: TokenKind::Ruby,
        regex: &RUBY,
    },
    Rule {
        kind: TokenKind::BoldItalic,
        regex: &BOLD_ITALIC,
    },
    Rule {
        kind: TokenKind::Bold,
        regex: &BOLD,
    },
    Rule {
        kind: TokenKind::Italic,
        regex: &ITALIC,
    },
    Rule {
        kind: TokenKind::Strikethrough,
        regex: &STRIKETHROUGH,
    },
];

/// Characters that can open or close a rule.
pub(crate) fn is_delimiter(ch: char) -> bool {
    matches!(ch, '[' | ']' | '|' | '*' | '~')
}
