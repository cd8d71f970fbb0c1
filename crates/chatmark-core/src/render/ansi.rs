use crossterm::style::{Attribute, Color, ContentStyle};

use super::{RenderedUnit, StyleKind, UnitRenderer};
use crate::cjk::cjk_runs;

/// Renders units with terminal escape sequences.
///
/// Ruby bodies are underlined and followed by the gloss in dim parentheses,
/// since terminals cannot stack text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer {
    /// Color CJK ideograph runs so they stand out like a font change would.
    pub highlight_cjk: bool,
}

impl AnsiRenderer {
    pub fn new(highlight_cjk: bool) -> Self {
        Self { highlight_cjk }
    }

    fn push_body(&self, out: &mut String, text: &str, style: ContentStyle) {
        if !self.highlight_cjk {
            push_styled(out, text, style);
            return;
        }
        for run in cjk_runs(text) {
            let mut run_style = style;
            if run.cjk {
                run_style.foreground_color = Some(Color::Cyan);
            }
            push_styled(out, run.text, run_style);
        }
    }

    /// Nested units add their attributes to those of the enclosing units.
    fn push_unit(&self, out: &mut String, unit: &RenderedUnit, inherited: ContentStyle) {
        let style = with_style(inherited, unit.style);
        if unit.is_leaf() {
            self.push_body(out, &unit.text, style);
        } else {
            for child in &unit.children {
                self.push_unit(out, child, style);
            }
        }
        if let Some(gloss) = unit.gloss.as_deref() {
            let mut gloss_style = ContentStyle::new();
            gloss_style.attributes.set(Attribute::Dim);
            push_styled(out, &format!("({gloss})"), gloss_style);
        }
    }
}

impl UnitRenderer for AnsiRenderer {
    fn render_units(&self, units: &[RenderedUnit]) -> String {
        let mut out = String::new();
        for unit in units {
            self.push_unit(&mut out, unit, ContentStyle::new());
        }
        out
    }
}

fn with_style(mut content: ContentStyle, style: StyleKind) -> ContentStyle {
    match style {
        StyleKind::Plain => {}
        StyleKind::Ruby => content.attributes.set(Attribute::Underlined),
        StyleKind::BoldItalic => {
            content.attributes.set(Attribute::Bold);
            content.attributes.set(Attribute::Italic);
        }
        StyleKind::Bold => content.attributes.set(Attribute::Bold),
        StyleKind::Italic => content.attributes.set(Attribute::Italic),
        StyleKind::Strikethrough => content.attributes.set(Attribute::CrossedOut),
    }
    content
}

fn push_styled(out: &mut String, text: &str, style: ContentStyle) {
    if text.is_empty() {
        return;
    }
    if style == ContentStyle::new() {
        out.push_str(text);
        return;
    }
    out.push_str(&style.apply(text).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::render::Reveal;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn test_plain_text_has_no_escapes() {
        let out = AnsiRenderer::default().render(&Markup::parse("hello"), Reveal::Full);
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_bold_emits_escape_sequence() {
        let out = AnsiRenderer::default().render(&Markup::parse("**hi**"), Reveal::Full);
        assert!(out.contains('\x1b'));
        assert_eq!(strip_ansi(&out), "hi");
    }

    #[test]
    fn test_ruby_shows_gloss_in_parentheses() {
        let out = AnsiRenderer::new(true).render(&Markup::parse("[[日本|にほん]]"), Reveal::Prefix(1));
        assert_eq!(strip_ansi(&out), "日(にほん)");
    }

    #[test]
    fn test_nested_units_combine_attributes() {
        let out = AnsiRenderer::default().render(&Markup::parse("~**x**~"), Reveal::Full);
        let mut expected = ContentStyle::new();
        expected.attributes.set(Attribute::CrossedOut);
        expected.attributes.set(Attribute::Bold);
        assert_eq!(out, expected.apply("x").to_string());
    }

    #[test]
    fn test_nested_ruby_keeps_gloss() {
        let out = AnsiRenderer::default().render(&Markup::parse("**[[漢字|かんじ]]** ok"), Reveal::Full);
        assert_eq!(strip_ansi(&out), "漢字(かんじ) ok");
    }
}
