//! Chat markup parsing.
//!
//! Supported syntax, resolved in this order:
//! - `[[BODY|GLOSS]]` ruby annotation
//! - `***TEXT***` bold italic
//! - `**TEXT**` bold
//! - `*TEXT*` italic
//! - `~TEXT~` strikethrough
//!
//! Anything that does not form a complete pattern is kept as literal text.
//! A later rule may wrap tokens of earlier ones, so `~**x**~` is struck bold
//! text, but never matches inside them.
//! There is no escape syntax, so emphasis text can never contain `*`.

mod lexer;
mod rules;
mod token;

pub(crate) use rules::is_delimiter;
pub use token::{MarkupToken, Span, TokenKind};

/// Parsed chat markup: the source plus the tokens that tile it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    source: String,
    tokens: Vec<MarkupToken>,
    display_len: usize,
}

impl Markup {
    /// Parses `source` with every markup rule enabled.
    pub fn parse(source: &str) -> Self {
        if !source.chars().any(rules::is_delimiter) {
            return Self::literal(source);
        }
        Self::from_tokens(source, lexer::tokenize(source))
    }

    /// Wraps `source` as a single plain token, with no rule applied.
    pub fn literal(source: &str) -> Self {
        let tokens = if source.is_empty() {
            Vec::new()
        } else {
            vec![MarkupToken::plain(source, Span::new(0, source.len()))]
        };
        Self::from_tokens(source, tokens)
    }

    fn from_tokens(source: &str, tokens: Vec<MarkupToken>) -> Self {
        let display_len = tokens.iter().map(MarkupToken::display_len).sum();
        Self {
            source: source.to_string(),
            tokens,
            display_len,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[MarkupToken] {
        &self.tokens
    }

    /// Number of characters a reader sees: delimiters and ruby glosses excluded.
    pub fn display_len(&self) -> usize {
        self.display_len
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Display characters in reading order.
    pub fn display_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.tokens.iter().flat_map(|token| token.body.chars())
    }

    /// Returns true when no rule matched anywhere in the source.
    pub fn is_plain(&self) -> bool {
        self.tokens
            .iter()
            .all(|token| token.kind == TokenKind::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_len_excludes_delimiters_and_gloss() {
        let markup = Markup::parse("**ab** [[日本|にほん]]");
        assert_eq!(markup.display_len(), 5);
        assert_eq!(markup.display_chars().collect::<String>(), "ab 日本");
    }

    #[test]
    fn test_plain_text_fast_path() {
        let markup = Markup::parse("no markup here");
        assert!(markup.is_plain());
        assert_eq!(markup.tokens().len(), 1);
        assert_eq!(markup.display_len(), 14);
    }

    #[test]
    fn test_literal_ignores_rules() {
        let markup = Markup::literal("**bold**");
        assert!(markup.is_plain());
        assert_eq!(markup.display_len(), 8);
    }

    #[test]
    fn test_empty() {
        let markup = Markup::parse("");
        assert!(markup.is_empty());
        assert_eq!(markup.display_len(), 0);
    }

    #[test]
    fn test_end_to_end_tokens() {
        let markup = Markup::parse("***강조***는 [[重要|じゅうよう]]합니다");
        let summary: Vec<_> = markup
            .tokens()
            .iter()
            .map(|t| (t.kind, t.body.as_str(), t.gloss.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::BoldItalic, "강조", None),
                (TokenKind::Plain, "는 ", None),
                (TokenKind::Ruby, "重要", Some("じゅうよう")),
                (TokenKind::Plain, "합니다", None),
            ]
        );
    }
}
