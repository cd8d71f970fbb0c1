//! Rendering parsed markup, in full or as a revealed prefix.
//!
//! [`render_units`] turns tokens into styled units, truncated to a display
//! budget for typewriter reveals. Renderers only map units to an output
//! vocabulary, so every target shares the same reveal semantics.

mod ansi;
mod html;

pub use ansi::AnsiRenderer;
pub use html::{HtmlOptions, HtmlRenderer, escape_html};

use crate::markup::{Markup, MarkupToken, TokenKind};

/// Semantic style of a rendered unit.
///
/// Renderers translate these to their own vocabulary (HTML tags, terminal
/// attributes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// No styling.
    Plain,
    /// Ruby base text with a gloss annotation.
    Ruby,
    /// Bold and italic (***text***).
    BoldItalic,
    /// Bold (**text**).
    Bold,
    /// Italic (*text*).
    Italic,
    /// Struck through (~text~).
    Strikethrough,
}

impl From<TokenKind> for StyleKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Plain => StyleKind::Plain,
            TokenKind::Ruby => StyleKind::Ruby,
            TokenKind::BoldItalic => StyleKind::BoldItalic,
            TokenKind::Bold => StyleKind::Bold,
            TokenKind::Italic => StyleKind::Italic,
            TokenKind::Strikethrough => StyleKind::Strikethrough,
        }
    }
}

/// A styled unit of output, possibly truncated by a reveal.
///
/// Units mirror the token tree: a unit with `children` wraps them and its
/// `text` is their joined text. Leaf units render `text` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub text: String,
    /// Full ruby gloss, even when `text` is only partly revealed.
    pub gloss: Option<String>,
    pub style: StyleKind,
    pub children: Vec<RenderedUnit>,
}

impl RenderedUnit {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// How much of the display text to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Full,
    /// The first `n` display characters. Values past the end mean [`Reveal::Full`].
    Prefix(usize),
}

/// Builds the styled units for `markup`, cut at the reveal budget.
///
/// Only token bodies spend the budget: delimiters and glosses are free.
/// A token cut mid-body keeps its style, its enclosing styles and its
/// complete gloss.
pub fn render_units(markup: &Markup, reveal: Reveal) -> Vec<RenderedUnit> {
    let mut budget = match reveal {
        Reveal::Full => usize::MAX,
        Reveal::Prefix(n) => n,
    };
    units_within(markup.tokens(), &mut budget)
}

fn units_within(tokens: &[MarkupToken], budget: &mut usize) -> Vec<RenderedUnit> {
    tokens
        .iter()
        .map_while(|token| unit_within(token, budget))
        .collect()
}

fn unit_within(token: &MarkupToken, budget: &mut usize) -> Option<RenderedUnit> {
    if *budget == 0 {
        return None;
    }

    let (text, children) = if token.is_leaf() {
        let len = token.display_len();
        let text = if len <= *budget {
            token.body.clone()
        } else {
            token.body.chars().take(*budget).collect()
        };
        *budget = budget.saturating_sub(len);
        (text, Vec::new())
    } else {
        let children = units_within(&token.children, budget);
        (display_text(&children), children)
    };

    Some(RenderedUnit {
        text,
        gloss: token.gloss.clone(),
        style: token.kind.into(),
        children,
    })
}

/// Concatenated display text of `units`, glosses excluded.
pub fn display_text(units: &[RenderedUnit]) -> String {
    units.iter().map(|unit| unit.text.as_str()).collect()
}

/// Maps styled units to an output string.
pub trait UnitRenderer {
    fn render_units(&self, units: &[RenderedUnit]) -> String;

    /// Renders `markup` up to `reveal`.
    fn render(&self, markup: &Markup, reveal: Reveal) -> String {
        self.render_units(&render_units(markup, reveal))
    }
}

/// Renders display text only, dropping styles and glosses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl UnitRenderer for PlainRenderer {
    fn render_units(&self, units: &[RenderedUnit]) -> String {
        display_text(units)
    }
}
