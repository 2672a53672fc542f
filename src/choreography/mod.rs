//! Scripted, time-stepped choreography.
//!
//! A flow is written as a [`Script`]: a flat list of [`Cue`]s, each either
//! an instant action on the stage (add, remove, clear, present) or a wait
//! (dwell, traced paths, a service reply). The [`Director`] interprets
//! scripts against a [`Clock`], resuming every active run once per frame
//! until its next wait. Nothing here sleeps, so the frame loop is never
//! blocked by a dwell.
//!
//! Each run carries a [`RunToken`]. Launching a flow again invalidates the
//! older run's token; the director drops a stale run the next time it would
//! resume it, before it touches the stage.

mod clock;
mod director;
mod script;
mod token;
mod trace;

pub use clock::{Clock, ManualClock, SystemClock};
pub use director::Director;
pub use script::{Cue, PathSpec, Script, ScriptBuilder, Slot};
pub use token::{RunToken, RunTokens};
pub use trace::{TracePacing, TraceRamp};
