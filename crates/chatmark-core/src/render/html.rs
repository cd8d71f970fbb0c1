use std::borrow::Cow;

use super::{RenderedUnit, StyleKind, UnitRenderer};
use crate::cjk::cjk_runs;
use crate::text_nodes::{TextRewrite, encode_delimiters, rewrite_text_nodes};

/// Class attached to every `<ruby>` element.
pub const RUBY_CLASS: &str = "chatmark-ruby";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Escape text as HTML. Leave off for content that already is HTML
    /// (chat messages), turn on for raw text (narrator lines).
    pub escape_text: bool,
    /// Wrap CJK ideograph runs of body text in `<span class="...">`.
    pub cjk_class: Option<String>,
}

/// Renders units as inline HTML.
///
/// Text inside generated elements has its markup delimiters written as
/// character references, so parsing the output again never matches inside
/// an element this renderer produced. Delimiters left over in plain text
/// stay literal and can still pair up on a second parse; formatting twice
/// is prevented by [`crate::format::Formatted`], not by the output.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
}

impl HtmlRenderer {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    fn push_unit(&self, out: &mut String, unit: &RenderedUnit, in_element: bool) {
        let (open, close) = match unit.style {
            StyleKind::Plain => ("", ""),
            StyleKind::BoldItalic => ("<b><i>", "</i></b>"),
            StyleKind::Bold => ("<b>", "</b>"),
            StyleKind::Italic => ("<i>", "</i>"),
            StyleKind::Strikethrough => ("<s>", "</s>"),
            StyleKind::Ruby => {
                out.push_str("<ruby class=\"");
                out.push_str(RUBY_CLASS);
                out.push_str("\">");
                self.push_content(out, unit, true);
                out.push_str("<rt>");
                self.push_gloss(out, unit.gloss.as_deref().unwrap_or_default());
                out.push_str("</rt></ruby>");
                return;
            }
        };
        out.push_str(open);
        self.push_content(out, unit, in_element || unit.style != StyleKind::Plain);
        out.push_str(close);
    }

    fn push_content(&self, out: &mut String, unit: &RenderedUnit, in_element: bool) {
        if unit.is_leaf() {
            self.push_body(out, &unit.text, in_element);
            return;
        }
        for child in &unit.children {
            self.push_unit(out, child, in_element);
        }
    }

    fn push_body(&self, out: &mut String, text: &str, in_element: bool) {
        let cjk_class = self.options.cjk_class.as_deref();
        if !self.options.escape_text {
            let rewrite = TextRewrite {
                cjk_class,
                encode_delimiters: in_element,
            };
            out.push_str(&rewrite_text_nodes(text, &rewrite));
            return;
        }

        let Some(class) = cjk_class else {
            push_escaped(out, text, in_element);
            return;
        };
        for run in cjk_runs(text) {
            if run.cjk {
                out.push_str("<span class=\"");
                out.push_str(class);
                out.push_str("\">");
                push_escaped(out, run.text, in_element);
                out.push_str("</span>");
            } else {
                push_escaped(out, run.text, in_element);
            }
        }
    }

    fn push_gloss(&self, out: &mut String, gloss: &str) {
        if self.options.escape_text {
            push_escaped(out, gloss, true);
        } else {
            let rewrite = TextRewrite {
                cjk_class: None,
                encode_delimiters: true,
            };
            out.push_str(&rewrite_text_nodes(gloss, &rewrite));
        }
    }
}

impl UnitRenderer for HtmlRenderer {
    fn render_units(&self, units: &[RenderedUnit]) -> String {
        let mut out = String::new();
        for unit in units {
            self.push_unit(&mut out, unit, false);
        }
        out
    }
}

fn push_escaped(out: &mut String, text: &str, in_element: bool) {
    let escaped = escape_html(text);
    if in_element {
        out.push_str(&encode_delimiters(&escaped));
    } else {
        out.push_str(&escaped);
    }
}

/// Escapes `&`, `<`, `>` and `"` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markup;
    use crate::render::Reveal;

    fn html(source: &str) -> String {
        HtmlRenderer::default().render(&Markup::parse(source), Reveal::Full)
    }

    fn cjk_renderer(escape_text: bool) -> HtmlRenderer {
        HtmlRenderer::new(HtmlOptions {
            escape_text,
            cjk_class: Some("cjk".to_string()),
        })
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(html("just text, 100% plain."), "just text, 100% plain.");
    }

    #[test]
    fn test_unterminated_markup_passthrough() {
        assert_eq!(html("**oops"), "**oops");
        assert_eq!(html("[[ruby|no close"), "[[ruby|no close");
    }

    #[test]
    fn test_emphasis_tags() {
        assert_eq!(html("**bold**"), "<b>bold</b>");
        assert_eq!(html("*a* *b*"), "<i>a</i> <i>b</i>");
        assert_eq!(html("***both***"), "<b><i>both</i></b>");
        assert_eq!(html("~gone~"), "<s>gone</s>");
    }

    #[test]
    fn test_ruby_tag() {
        assert_eq!(
            html("[[日本|にほん]]"),
            r#"<ruby class="chatmark-ruby">日本<rt>にほん</rt></ruby>"#
        );
    }

    #[test]
    fn test_nested_tags() {
        assert_eq!(
            html("**[[漢字|かんじ]]**"),
            r#"<b><ruby class="chatmark-ruby">漢字<rt>かんじ</rt></ruby></b>"#
        );
        assert_eq!(html("~**x**~"), "<s><b>x</b></s>");
        assert_eq!(
            html("*a [[b|c]] d*"),
            r#"<i>a <ruby class="chatmark-ruby">b<rt>c</rt></ruby> d</i>"#
        );
    }

    #[test]
    fn test_partial_nested_keeps_outer_tags() {
        let out = HtmlRenderer::default().render(&Markup::parse("~**xy**~"), Reveal::Prefix(1));
        assert_eq!(out, "<s><b>x</b></s>");
    }

    #[test]
    fn test_delimiters_inside_elements_are_encoded() {
        assert_eq!(html("**a~b** c~"), "<b>a&#126;b</b> c~");
        assert_eq!(
            html("[[*a*|b]]"),
            r#"<ruby class="chatmark-ruby">&#42;a&#42;<rt>b</rt></ruby>"#
        );
        assert_eq!(
            html("[[a|*b*]]"),
            r#"<ruby class="chatmark-ruby">a<rt>&#42;b&#42;</rt></ruby>"#
        );
    }

    #[test]
    fn test_escaped_delimiters_inside_elements_are_encoded() {
        let renderer = HtmlRenderer::new(HtmlOptions {
            escape_text: true,
            cjk_class: None,
        });
        assert_eq!(
            renderer.render(&Markup::parse("**a~<b>** ~"), Reveal::Full),
            "<b>a&#126;&lt;b&gt;</b> ~"
        );
    }

    #[test]
    fn test_existing_html_passes_through() {
        assert_eq!(
            html(r#"<a href="x">**link**</a> &amp; more"#),
            r#"<a href="x"><b>link</b></a> &amp; more"#
        );
    }

    #[test]
    fn test_escaped_output() {
        let renderer = HtmlRenderer::new(HtmlOptions {
            escape_text: true,
            cjk_class: None,
        });
        assert_eq!(
            renderer.render(&Markup::parse("<b> & **x**"), Reveal::Full),
            "&lt;b&gt; &amp; <b>x</b>"
        );
    }

    #[test]
    fn test_output_is_stable_when_reparsed() {
        for source in [
            "**bold**",
            "*a* *b*",
            "[[日本|にほん]] ~s~",
            "***x*** y",
            "**a~b** c~",
            "[[*a*|b]]",
            "[[a|*b*]]",
            "~**x**~",
            "**[[a|b]]**",
        ] {
            let once = html(source);
            assert_eq!(html(&once), once, "{source}");
        }
    }

    #[test]
    fn test_end_to_end_with_cjk() {
        let renderer = cjk_renderer(false);
        assert_eq!(
            renderer.render(
                &Markup::parse("***강조***는 [[重要|じゅうよう]]합니다"),
                Reveal::Full
            ),
            concat!(
                "<b><i>강조</i></b>는 ",
                r#"<ruby class="chatmark-ruby"><span class="cjk">重要</span><rt>じゅうよう</rt></ruby>"#,
                "합니다"
            )
        );
    }

    #[test]
    fn test_gloss_never_cjk_wrapped() {
        for escape in [false, true] {
            let out = cjk_renderer(escape).render(&Markup::parse("[[かな|漢字]]"), Reveal::Full);
            assert_eq!(out, r#"<ruby class="chatmark-ruby">かな<rt>漢字</rt></ruby>"#);
        }
    }

    #[test]
    fn test_escaped_cjk_runs() {
        let out = cjk_renderer(true).render(&Markup::parse("a<漢>"), Reveal::Full);
        assert_eq!(out, r#"a&lt;<span class="cjk">漢</span>&gt;"#);
    }

    #[test]
    fn test_partial_ruby_html() {
        let out = HtmlRenderer::default().render(&Markup::parse("[[日本|にほん]]"), Reveal::Prefix(1));
        assert_eq!(out, r#"<ruby class="chatmark-ruby">日<rt>にほん</rt></ruby>"#);
    }

    #[test]
    fn test_partial_at_full_length_matches_full() {
        let renderer = cjk_renderer(true);
        for source in [
            "***강조***는 [[重要|じゅうよう]]합니다",
            "a **b** *c* ~d~ [[e|f]]",
            "**unclosed *mixed* text",
        ] {
            let markup = Markup::parse(source);
            assert_eq!(
                renderer.render(&markup, Reveal::Prefix(markup.display_len())),
                renderer.render(&markup, Reveal::Full),
            );
        }
    }

    #[test]
    fn test_escape_html_borrowed_when_clean() {
        assert!(matches!(escape_html("clean"), Cow::Borrowed(_)));
    }
}
