use serde::Serialize;

/// Byte range of the source text consumed by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Classification of a maximal span of chat markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Text that matched no rule.
    Plain,
    /// `[[BODY|GLOSS]]`
    Ruby,
    /// `***TEXT***`
    BoldItalic,
    /// `**TEXT**`
    Bold,
    /// `*TEXT*`
    Italic,
    /// `~TEXT~`
    Strikethrough,
}

impl TokenKind {
    /// Short name used in token listings.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Plain => "plain",
            TokenKind::Ruby => "ruby",
            TokenKind::BoldItalic => "bold_italic",
            TokenKind::Bold => "bold",
            TokenKind::Italic => "italic",
            TokenKind::Strikethrough => "strikethrough",
        }
    }
}

/// One token of parsed markup.
///
/// `body` is the displayed text with delimiters stripped. `gloss` is only
/// set for ruby tokens and is never scanned for further markup.
///
/// A token that wraps tokens claimed by an earlier rule (`~**x**~`) keeps
/// them in `children`, which then tile its body; `body` is their joined
/// display text. Leaf tokens have no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupToken {
    pub kind: TokenKind,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gloss: Option<String>,
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkupToken>,
}

impl MarkupToken {
    pub fn plain(text: &str, span: Span) -> Self {
        Self::leaf(TokenKind::Plain, text, span)
    }

    pub fn leaf(kind: TokenKind, body: &str, span: Span) -> Self {
        Self {
            kind,
            body: body.to_string(),
            gloss: None,
            span,
            children: Vec::new(),
        }
    }

    /// A token wrapping `children`, whose bodies form its display text.
    pub fn nested(kind: TokenKind, children: Vec<MarkupToken>, span: Span) -> Self {
        Self {
            kind,
            body: children.iter().map(|child| child.body.as_str()).collect(),
            gloss: None,
            span,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of display characters this token contributes.
    pub fn display_len(&self) -> usize {
        self.body.chars().count()
    }

    /// Number of source bytes consumed, delimiters included.
    pub fn source_len(&self) -> usize {
        self.span.len()
    }

    /// Number of source characters consumed, delimiters included.
    pub fn source_chars(&self, source: &str) -> usize {
        source[self.span.start..self.span.end].chars().count()
    }
}
