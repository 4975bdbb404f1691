//! Foreground-resume resynchronization.
//!
//! Mobile hosts freeze tick delivery while backgrounded; wall-clock time
//! keeps moving. On regaining the foreground the host calls
//! [`foreground`] once, which ticks every active timer at the resume
//! instant. Because all timers derive state from timestamps, this single
//! tick lands each display on the correct value and fires any completion
//! or interval transition crossed during the suspension exactly once.
//!
//! Going to the background needs no handling at all: timestamps carry
//! through suspension untouched.

use chrono::{DateTime, Utc};

use super::rest::RestTimer;
use super::session::SessionClock;
use crate::circuit::CircuitTimer;
use crate::events::Output;

/// Background transition signal. Nothing to do: captured timestamps are
/// the source of truth and survive suspension as-is.
pub fn background(_now: DateTime<Utc>) -> Output {
    Output::none()
}

/// Resynchronize every active timer as if a tick had occurred at `now`.
pub fn foreground(
    now: DateTime<Utc>,
    session: Option<&mut SessionClock>,
    rest: Option<&mut RestTimer>,
    circuit: Option<&mut CircuitTimer>,
) -> Output {
    let mut out = Output::none();
    if let Some(session) = session {
        out.merge(session.tick(now));
    }
    if let Some(rest) = rest {
        out.merge(rest.tick(now));
    }
    if let Some(circuit) = circuit {
        out.merge(circuit.tick(now));
    }
    out
}
