//! Narrate command handler.
//!
//! Drives a typewriter reveal in the terminal. On a TTY the line is redrawn
//! in place; otherwise each frame goes on its own line.

use std::io::{IsTerminal, Stdout, Write};

use anyhow::{Context, Result};
use chatmark_core::config::Config;
use chatmark_core::format::{Formatter, MessageTarget};
use chatmark_core::render::{AnsiRenderer, PlainRenderer, UnitRenderer};
use chatmark_narrator::{Narrator, NarratorEvent, NarratorSettings, RevealPlan};
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::cli::interrupt::{self, InterruptedError};

const BELL: &str = "\x07";

pub fn run(config: &Config, text: &str, format: OutputFormat) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    interrupt::init()?;

    let formatter = Formatter::from_config(config);
    let markup = formatter.parse(text);
    let settings = NarratorSettings::from(&config.narrator);
    let target = MessageTarget::Narrator;
    let mut out = FrameWriter::new(std::io::stdout(), config.narrator.bell);

    rt.block_on(async {
        match format {
            OutputFormat::Html => {
                let plan = RevealPlan::new(markup, formatter.html_renderer(target));
                narrate(plan, settings, &mut out).await
            }
            OutputFormat::Ansi => {
                let renderer = AnsiRenderer::new(formatter.cjk_enabled(target));
                narrate(RevealPlan::new(markup, renderer), settings, &mut out).await
            }
            OutputFormat::Plain => {
                narrate(RevealPlan::new(markup, PlainRenderer), settings, &mut out).await
            }
        }
    })
}

async fn narrate<R>(
    plan: RevealPlan<R>,
    settings: NarratorSettings,
    out: &mut FrameWriter<Stdout>,
) -> Result<()>
where
    R: UnitRenderer + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel(64);
    let mut narrator = Narrator::new(settings);
    narrator.start(plan, tx);
    let mut interrupted = std::pin::pin!(interrupt::wait_for_interrupt());
    let mut cancel_sent = false;
    let mut cancelled = false;

    loop {
        tokio::select! {
            () = &mut interrupted, if !cancel_sent => {
                debug!("interrupt received, cancelling reveal");
                narrator.stop();
                cancel_sent = true;
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                cancelled |= matches!(event, NarratorEvent::Cancelled);
                out.write_event(&event)?;
            }
        }
    }

    narrator.join().await.context("join narrator task")?;
    if cancelled {
        return Err(InterruptedError.into());
    }
    Ok(())
}

/// Writes narrator events to a terminal or a pipe.
struct FrameWriter<W: Write> {
    writer: W,
    redraw: bool,
    bell: bool,
}

impl FrameWriter<Stdout> {
    fn new(stdout: Stdout, bell: bool) -> Self {
        let redraw = stdout.is_terminal();
        Self {
            writer: stdout,
            redraw,
            bell: bell && redraw,
        }
    }
}

impl<W: Write> FrameWriter<W> {
    fn write_event(&mut self, event: &NarratorEvent) -> Result<()> {
        match event {
            NarratorEvent::Frame { html, .. } => self.show(html)?,
            NarratorEvent::Step(step) => {
                if self.bell && step.audible {
                    queue!(self.writer, Print(BELL))?;
                }
            }
            NarratorEvent::Finished { html } => {
                // Pipes already received the last frame.
                if self.redraw {
                    self.show(html)?;
                }
            }
            NarratorEvent::Cleared | NarratorEvent::Cancelled => {
                if self.redraw {
                    queue!(self.writer, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                }
            }
        }
        self.writer.flush().context("flush output")
    }

    fn show(&mut self, text: &str) -> Result<()> {
        if self.redraw {
            queue!(
                self.writer,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(text)
            )?;
        } else {
            writeln!(self.writer, "{text}")?;
        }
        Ok(())
    }
}
