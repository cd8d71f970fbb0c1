//! Tick loop that drives a reveal.
//!
//! The loop owns all timing: one display character per tick, a final tick
//! that shows the complete line, then a linger period before the line is
//! cleared. Rendering itself stays in [`RevealPlan`].

use std::time::Duration;

use chatmark_core::config::NarratorConfig;
use chatmark_core::render::UnitRenderer;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::plan::{RevealPlan, RevealStep};

/// Timing of a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarratorSettings {
    /// Delay between reveal steps. Never zero.
    pub typing_speed: Duration,
    /// How long the finished line stays before [`NarratorEvent::Cleared`].
    pub linger: Duration,
}

impl NarratorSettings {
    const MIN_TYPING_SPEED: Duration = Duration::from_millis(1);

    pub fn new(typing_speed: Duration, linger: Duration) -> Self {
        Self {
            typing_speed: typing_speed.max(Self::MIN_TYPING_SPEED),
            linger,
        }
    }
}

impl Default for NarratorSettings {
    fn default() -> Self {
        Self::from(&NarratorConfig::default())
    }
}

impl From<&NarratorConfig> for NarratorSettings {
    fn from(config: &NarratorConfig) -> Self {
        Self::new(
            Duration::from_millis(config.typing_speed_ms),
            Duration::from_millis(config.linger_ms),
        )
    }
}

/// Progress of a reveal, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarratorEvent {
    /// New output with `revealed` of `total` display characters visible.
    Frame {
        html: String,
        revealed: usize,
        total: usize,
    },
    /// The character revealed by the preceding frame.
    Step(RevealStep),
    /// The complete line, shown after the last step.
    Finished { html: String },
    /// The linger period ended; the line should be removed.
    Cleared,
    /// The reveal was cancelled before it was cleared.
    Cancelled,
}

/// A running reveal.
#[derive(Debug)]
pub struct NarrationHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl NarrationHandle {
    /// Stops the reveal. The loop emits [`NarratorEvent::Cancelled`] and exits.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the loop to exit.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.task.await
    }
}

/// Spawns a reveal on the current tokio runtime.
pub fn spawn<R>(
    plan: RevealPlan<R>,
    settings: NarratorSettings,
    events: mpsc::Sender<NarratorEvent>,
) -> NarrationHandle
where
    R: UnitRenderer + Send + 'static,
{
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(plan, settings, cancel.clone(), events));
    NarrationHandle { cancel, task }
}

/// Runs a reveal to completion, cancellation, or until `events` is closed.
pub async fn run<R: UnitRenderer>(
    plan: RevealPlan<R>,
    settings: NarratorSettings,
    cancel: CancellationToken,
    events: mpsc::Sender<NarratorEvent>,
) {
    let total = plan.len();
    debug!(total, speed_ms = settings.typing_speed.as_millis() as u64, "reveal started");

    let mut ticker = time::interval(settings.typing_speed);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    for index in 0..total {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = events.send(NarratorEvent::Cancelled).await;
                return;
            }
            _ = ticker.tick() => {}
        }

        let revealed = index + 1;
        let frame = NarratorEvent::Frame {
            html: plan.frame(revealed),
            revealed,
            total,
        };
        if events.send(frame).await.is_err() {
            return;
        }
        if let Some(step) = plan.step(index)
            && events.send(NarratorEvent::Step(step)).await.is_err()
        {
            return;
        }
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            let _ = events.send(NarratorEvent::Cancelled).await;
            return;
        }
        _ = ticker.tick() => {}
    }
    if events
        .send(NarratorEvent::Finished { html: plan.full() })
        .await
        .is_err()
    {
        return;
    }
    debug!(total, "reveal finished");

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            let _ = events.send(NarratorEvent::Cancelled).await;
        }
        () = time::sleep(settings.linger) => {
            let _ = events.send(NarratorEvent::Cleared).await;
        }
    }
}

/// Owns the narrator line: at most one reveal runs at a time.
#[derive(Debug, Default)]
pub struct Narrator {
    settings: NarratorSettings,
    current: Option<NarrationHandle>,
}

impl Narrator {
    pub fn new(settings: NarratorSettings) -> Self {
        Self {
            settings,
            current: None,
        }
    }

    pub fn settings(&self) -> NarratorSettings {
        self.settings
    }

    /// Starts revealing `plan`, cancelling any reveal still in progress.
    pub fn start<R>(
        &mut self,
        plan: RevealPlan<R>,
        events: mpsc::Sender<NarratorEvent>,
    ) -> &NarrationHandle
    where
        R: UnitRenderer + Send + 'static,
    {
        self.stop();
        self.current.insert(spawn(plan, self.settings, events))
    }

    /// Cancels the current reveal, if any. It still sends
    /// [`NarratorEvent::Cancelled`] before exiting.
    pub fn stop(&self) {
        if let Some(handle) = &self.current {
            debug!("cancelling reveal");
            handle.cancel();
        }
    }

    /// Waits for the current reveal to exit.
    pub async fn join(&mut self) -> Result<(), tokio::task::JoinError> {
        match self.current.take() {
            Some(handle) => handle.join().await,
            None => Ok(()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
