//! Formatting of chat message areas.
//!
//! A chat message has two formatted areas, the sender name and the body,
//! and the narrator line is a third. Each area has its own CJK class so a
//! separate Han font can be assigned per area.
//!
//! Text enters as [`Unformatted`] and leaves as [`Formatted`]. Only
//! `Unformatted` can be formatted, so already rendered output is never
//! run through the rules a second time.

use tracing::debug;

use crate::config::{CjkConfig, Config};
use crate::markup::Markup;
use crate::render::{HtmlOptions, HtmlRenderer, Reveal, UnitRenderer};

/// Area of the chat UI a piece of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    /// Sender name in the message header.
    Sender,
    /// Message body.
    Content,
    /// Narrator line.
    Narrator,
}

impl MessageTarget {
    /// CSS class for CJK runs in this area.
    pub fn cjk_class(self) -> &'static str {
        match self {
            MessageTarget::Sender => "chatmark-cjk-sender",
            MessageTarget::Content => "chatmark-cjk-content",
            MessageTarget::Narrator => "chatmark-cjk-narrator",
        }
    }

    /// Narrator lines are raw text; the chat areas already hold HTML.
    pub fn escapes_text(self) -> bool {
        matches!(self, MessageTarget::Narrator)
    }
}

/// Text that has not been through the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unformatted(String);

impl Unformatted {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Unformatted {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Unformatted {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Formatter output. Carries no way back into the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    target: MessageTarget,
    html: String,
    display_len: usize,
}

impl Formatted {
    pub fn target(&self) -> MessageTarget {
        self.target
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Display characters in the source the output was rendered from.
    pub fn display_len(&self) -> usize {
        self.display_len
    }
}

/// Applies markup and CJK wrapping according to configuration.
#[derive(Debug, Clone)]
pub struct Formatter {
    markup_enabled: bool,
    cjk: CjkConfig,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(true, CjkConfig::default())
    }
}

impl Formatter {
    pub fn new(markup_enabled: bool, cjk: CjkConfig) -> Self {
        Self { markup_enabled, cjk }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.formatting.enabled, config.cjk)
    }

    /// Overrides CJK wrapping for one target.
    #[must_use]
    pub fn with_cjk(mut self, target: MessageTarget, enabled: bool) -> Self {
        match target {
            MessageTarget::Sender => self.cjk.sender = enabled,
            MessageTarget::Content => self.cjk.content = enabled,
            MessageTarget::Narrator => self.cjk.narrator = enabled,
        }
        self
    }

    /// Whether CJK wrapping is active for `target`.
    pub fn cjk_enabled(&self, target: MessageTarget) -> bool {
        match target {
            MessageTarget::Sender => self.cjk.sender,
            MessageTarget::Content => self.cjk.content,
            MessageTarget::Narrator => self.cjk.narrator,
        }
    }

    /// Parses `text`, honoring the markup toggle.
    pub fn parse(&self, text: &str) -> Markup {
        if self.markup_enabled {
            Markup::parse(text)
        } else {
            Markup::literal(text)
        }
    }

    /// HTML renderer configured for `target`.
    pub fn html_renderer(&self, target: MessageTarget) -> HtmlRenderer {
        HtmlRenderer::new(HtmlOptions {
            escape_text: target.escapes_text(),
            cjk_class: self
                .cjk_enabled(target)
                .then(|| target.cjk_class().to_string()),
        })
    }

    /// Formats `text` for `target`.
    pub fn format(&self, target: MessageTarget, text: Unformatted) -> Formatted {
        let markup = self.parse(text.as_str());
        let html = self.html_renderer(target).render(&markup, Reveal::Full);
        debug!(?target, tokens = markup.tokens().len(), "formatted");
        Formatted {
            target,
            html,
            display_len: markup.display_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cjk() -> CjkConfig {
        CjkConfig {
            sender: true,
            content: true,
            narrator: true,
        }
    }

    #[test]
    fn test_format_content_keeps_host_html() {
        let formatted =
            Formatter::default().format(MessageTarget::Content, "<p>**hi** &amp;</p>".into());
        assert_eq!(formatted.html(), "<p><b>hi</b> &amp;</p>");
        assert_eq!(formatted.target(), MessageTarget::Content);
    }

    #[test]
    fn test_format_narrator_escapes() {
        let formatted = Formatter::default().format(MessageTarget::Narrator, "a < b *c*".into());
        assert_eq!(formatted.html(), "a &lt; b <i>c</i>");
        assert_eq!(formatted.display_len(), 7);
    }

    #[test]
    fn test_cjk_class_per_target() {
        let formatter = Formatter::new(true, all_cjk());
        let sender = formatter.format(MessageTarget::Sender, "王".into());
        let content = formatter.format(MessageTarget::Content, "王".into());
        assert_eq!(sender.html(), r#"<span class="chatmark-cjk-sender">王</span>"#);
        assert_eq!(content.html(), r#"<span class="chatmark-cjk-content">王</span>"#);
    }

    #[test]
    fn test_cjk_disabled_is_noop() {
        let formatter = Formatter::new(
            true,
            CjkConfig {
                content: true,
                ..CjkConfig::default()
            },
        );
        assert_eq!(
            formatter.format(MessageTarget::Sender, "王".into()).html(),
            "王"
        );
    }

    #[test]
    fn test_markup_disabled_still_wraps_cjk() {
        let formatter = Formatter::new(false, all_cjk());
        let formatted = formatter.format(MessageTarget::Content, "**漢**".into());
        assert_eq!(
            formatted.html(),
            r#"**<span class="chatmark-cjk-content">漢</span>**"#
        );
    }

    #[test]
    fn test_with_cjk_overrides_one_target() {
        let formatter = Formatter::default().with_cjk(MessageTarget::Narrator, true);
        assert!(formatter.cjk_enabled(MessageTarget::Narrator));
        assert!(!formatter.cjk_enabled(MessageTarget::Content));
    }

    #[test]
    fn test_unformatted_from_string() {
        let text = Unformatted::from(String::from("x"));
        assert_eq!(text.as_str(), "x");
        assert_eq!(Unformatted::new("y").as_str(), "y");
    }
}
