//! Narrator typewriter reveal.
//!
//! [`RevealPlan`] renders prefixes of a narrator line; [`Narrator`] and
//! [`spawn`] drive it on a tokio interval and report progress as
//! [`NarratorEvent`]s. Sound, broadcast and display are left to the
//! receiver of those events.

mod driver;
mod plan;

pub use driver::{NarrationHandle, Narrator, NarratorEvent, NarratorSettings, run, spawn};
pub use plan::{RevealPlan, RevealStep};
