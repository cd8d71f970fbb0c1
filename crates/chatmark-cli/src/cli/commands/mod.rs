//! Command handlers.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chatmark_core::config::Config;

pub mod config;
pub mod narrate;
pub mod render;
pub mod tokens;

/// Loads config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Returns `text`, or stdin with one trailing newline removed.
pub fn read_input(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("read text from stdin")?;
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}
