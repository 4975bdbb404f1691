//! # Circuitroom Core Library
//!
//! Workout timing and circuit-progression engine. Tracks elapsed time for
//! an in-progress workout, runs rest-period countdowns, and implements the
//! timing/scoring semantics of structured circuit formats (AMRAP, EMOM,
//! Tabata, For-Time, generic Circuit), including round advancement and
//! completion detection.
//!
//! ## Architecture
//!
//! - **Wall-clock derivation**: every displayed time is recomputed from a
//!   captured start timestamp, an injected `now`, and accumulated pause
//!   time -- never advanced by incrementing per tick. Mobile hosts freeze
//!   tick delivery during suspension; wall-clock time keeps moving.
//! - **Externally driven ticks**: nothing here owns an interval. The host
//!   calls `tick(now)` at whatever cadence it likes (1 s is typical) and
//!   once extra via [`timer::resync::foreground`] on foreground resume.
//! - **Events out, effects out**: every transition returns an [`Output`] of
//!   lifecycle [`Event`]s and requested side [`Effect`]s (haptics,
//!   notifications, wake lock). The engine performs none of them itself.
//! - **Defensive transitions**: invalid commands (double-pause, completing
//!   a completed round) are no-ops, matching mobile-UI tolerance for rapid
//!   repeated taps. Nothing in this engine is fatal.
//!
//! ## Key Components
//!
//! - [`SessionClock`]: workout + current-exercise elapsed time
//! - [`RestTimer`]: rest-period countdown with one-shot completion
//! - [`CircuitTimer`]: format-specific block timer over [`BlockFormat`]
//! - [`CircuitSession`]: round list and progression rules
//! - [`timer::resync`]: foreground-resume resynchronization

pub mod circuit;
pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use circuit::{
    BlockFormat, CircuitExerciseLog, CircuitRound, CircuitSession, CircuitTimer, ExerciseTemplate,
};
pub use config::TimerConfig;
pub use error::ConfigError;
pub use events::{Effect, Event, HapticIntensity, Output};
pub use timer::{RestTimer, SessionClock};
