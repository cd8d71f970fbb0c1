//! Render command handler.

use anyhow::Result;
use chatmark_core::config::Config;
use chatmark_core::format::{Formatter, MessageTarget};
use chatmark_core::render::{AnsiRenderer, PlainRenderer, Reveal, UnitRenderer};

use crate::cli::OutputFormat;

pub struct RenderOptions {
    pub target: MessageTarget,
    pub format: OutputFormat,
    pub chars: Option<usize>,
    /// Overrides the configured CJK toggle for `target`.
    pub cjk: Option<bool>,
}

pub fn run(config: &Config, text: &str, options: &RenderOptions) -> Result<()> {
    println!("{}", render(config, text, options));
    Ok(())
}

pub(crate) fn render(config: &Config, text: &str, options: &RenderOptions) -> String {
    let mut formatter = Formatter::from_config(config);
    if let Some(enabled) = options.cjk {
        formatter = formatter.with_cjk(options.target, enabled);
    }

    let markup = formatter.parse(text);
    let reveal = options.chars.map_or(Reveal::Full, Reveal::Prefix);
    match options.format {
        OutputFormat::Html => formatter
            .html_renderer(options.target)
            .render(&markup, reveal),
        OutputFormat::Ansi => {
            AnsiRenderer::new(formatter.cjk_enabled(options.target)).render(&markup, reveal)
        }
        OutputFormat::Plain => PlainRenderer.render(&markup, reveal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            target: MessageTarget::Content,
            format,
            chars: None,
            cjk: None,
        }
    }

    #[test]
    fn test_render_html() {
        let out = render(&Config::default(), "**hi**", &options(OutputFormat::Html));
        assert_eq!(out, "<b>hi</b>");
    }

    #[test]
    fn test_render_plain_prefix() {
        let out = render(
            &Config::default(),
            "**hi** [[日本|にほん]]",
            &RenderOptions {
                chars: Some(4),
                ..options(OutputFormat::Plain)
            },
        );
        assert_eq!(out, "hi 日");
    }

    #[test]
    fn test_cjk_override() {
        let out = render(
            &Config::default(),
            "漢",
            &RenderOptions {
                cjk: Some(true),
                ..options(OutputFormat::Html)
            },
        );
        assert_eq!(out, r#"<span class="chatmark-cjk-content">漢</span>"#);
    }

    #[test]
    fn test_formatting_disabled() {
        let mut config = Config::default();
        config.formatting.enabled = false;
        let out = render(&config, "**hi**", &options(OutputFormat::Html));
        assert_eq!(out, "**hi**");
    }
}
