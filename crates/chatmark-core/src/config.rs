//! Configuration management for chatmark.
//!
//! Loads configuration from ${CHATMARK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Markup formatting toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Apply ruby and emphasis rules. When off, text is passed through.
    pub enabled: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Per-area CJK run wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CjkConfig {
    /// Sender names in message headers.
    pub sender: bool,
    /// Message bodies.
    pub content: bool,
    /// Narrator lines.
    pub narrator: bool,
}

/// Narrator reveal timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Delay between revealed characters, in milliseconds.
    pub typing_speed_ms: u64,
    /// Time the finished line stays before being cleared, in milliseconds.
    pub linger_ms: u64,
    /// Ring the terminal bell on audible reveal steps.
    pub bell: bool,
}

impl NarratorConfig {
    const DEFAULT_TYPING_SPEED_MS: u64 = 100;
    const DEFAULT_LINGER_MS: u64 = 3000;
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: Self::DEFAULT_TYPING_SPEED_MS,
            linger_ms: Self::DEFAULT_LINGER_MS,
            bell: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub formatting: FormattingConfig,
    pub cjk: CjkConfig,
    pub narrator: NarratorConfig,
}

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for chatmark configuration.
    //!
    //! CHATMARK_HOME resolution order:
    //! 1. CHATMARK_HOME environment variable (if set)
    //! 2. ~/.config/chatmark (default)

    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the chatmark home directory.
    pub fn chatmark_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("CHATMARK_HOME") {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("chatmark"))
            .context("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(chatmark_home()?.join("config.toml"))
    }
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path()?)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            debug!(path = %path.display(), "config not found, using defaults");
            Ok(Config::default())
        }
    }

    /// Writes the default template to `path`.
    ///
    /// Fails if a file already exists there.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `xtask update-default-config` to keep `default_config.toml`
    /// in sync with the defaults above: template comments are kept and
    /// values are overwritten.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());
        Ok(doc.to_string())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
