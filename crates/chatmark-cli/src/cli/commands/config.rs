//! Config command handlers.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chatmark_core::config::{self, Config};

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config::paths::config_path(),
    }
}

pub fn path(path: Option<&Path>) -> Result<()> {
    println!("{}", resolve(path)?.display());
    Ok(())
}

pub fn init(path: Option<&Path>) -> Result<()> {
    let path = resolve(path)?;
    Config::init(&path)?;
    println!("Created config at {}", path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    print!("{}", Config::generate()?);
    Ok(())
}
