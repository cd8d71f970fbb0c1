//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::Result;
use chatmark_core::format::MessageTarget;
use clap::Parser;

mod commands;
pub mod interrupt;
mod logging;

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(version)]
#[command(about = "Chat markup formatter with ruby annotations and a narrator reveal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of $CHATMARK_HOME/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "CHATMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Formats text (read from stdin when omitted)
    Render {
        /// Text to format
        text: Option<String>,

        /// Area the text belongs to
        #[arg(short, long, value_enum, default_value_t = Target::Content)]
        target: Target,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Only reveal the first N display characters
        #[arg(long, value_name = "N")]
        chars: Option<usize>,

        /// Force CJK wrapping on for the target
        #[arg(long, conflicts_with = "no_cjk")]
        cjk: bool,

        /// Force CJK wrapping off for the target
        #[arg(long = "no-cjk")]
        no_cjk: bool,
    },

    /// Lists the markup tokens of text
    Tokens {
        /// Text to tokenize
        text: Option<String>,

        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reveals a narrator line character by character
    Narrate {
        /// Narrator line
        text: Option<String>,

        /// Delay between characters in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        speed_ms: Option<u64>,

        /// Time the finished line stays on screen in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        linger_ms: Option<u64>,

        /// Output format for frames
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,

        /// Do not ring the bell on reveal steps
        #[arg(short, long)]
        quiet: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Sender,
    Content,
    Narrator,
}

impl From<Target> for MessageTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Sender => MessageTarget::Sender,
            Target::Content => MessageTarget::Content,
            Target::Narrator => MessageTarget::Narrator,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Html,
    Ansi,
    Plain,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;
    let config_path = cli.config;

    match cli.command {
        Commands::Render {
            text,
            target,
            format,
            chars,
            cjk,
            no_cjk,
        } => {
            let config = commands::load_config(config_path.as_deref())?;
            let text = commands::read_input(text)?;
            let cjk_override = match (cjk, no_cjk) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::render::run(
                &config,
                &text,
                &commands::render::RenderOptions {
                    target: target.into(),
                    format,
                    chars,
                    cjk: cjk_override,
                },
            )
        }
        Commands::Tokens { text, json } => {
            let config = commands::load_config(config_path.as_deref())?;
            let text = commands::read_input(text)?;
            commands::tokens::run(&config, &text, json)
        }
        Commands::Narrate {
            text,
            speed_ms,
            linger_ms,
            format,
            quiet,
        } => {
            let mut config = commands::load_config(config_path.as_deref())?;
            if let Some(speed_ms) = speed_ms {
                config.narrator.typing_speed_ms = speed_ms;
            }
            if let Some(linger_ms) = linger_ms {
                config.narrator.linger_ms = linger_ms;
            }
            if quiet {
                config.narrator.bell = false;
            }
            let text = commands::read_input(text)?;
            commands::narrate::run(&config, &text, format)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(config_path.as_deref()),
            ConfigCommands::Init => commands::config::init(config_path.as_deref()),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}
