//! Tokens command handler.

use anyhow::{Context, Result};
use chatmark_core::config::Config;
use chatmark_core::format::Formatter;
use chatmark_core::markup::Markup;
use comfy_table::{ContentArrangement, Table};

pub fn run(config: &Config, text: &str, json: bool) -> Result<()> {
    let markup = Formatter::from_config(config).parse(text);
    if json {
        let out = serde_json::to_string_pretty(markup.tokens()).context("serialize tokens")?;
        println!("{out}");
    } else {
        print!("{}", table(&markup));
        println!("display length: {}", markup.display_len());
    }
    Ok(())
}

fn table(markup: &Markup) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "kind", "body", "gloss", "source chars"]);

    for (index, token) in markup.tokens().iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            token.kind.label().to_string(),
            token.body.clone(),
            token.gloss.clone().unwrap_or_default(),
            token.source_chars(markup.source()).to_string(),
        ]);
    }

    let mut out = table.to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_token() {
        let rendered = table(&Markup::parse("a **b** [[c|d]]"));
        assert!(rendered.contains("bold"));
        assert!(rendered.contains("ruby"));
        assert!(rendered.contains("plain"));
        assert!(rendered.contains("gloss"));
    }
}
