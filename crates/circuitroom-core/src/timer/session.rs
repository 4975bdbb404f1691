//! Linear-workout session clock.
//!
//! Tracks total workout elapsed time plus elapsed time in the current
//! exercise. Wall-clock-based: the caller drives `tick(now)` periodically
//! and once on foreground resume; while paused, tick is a no-op and the
//! captured start timestamps are never shifted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock;
use crate::events::{Effect, Event, Output};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClock {
    is_active: bool,
    is_paused: bool,
    workout_start: Option<DateTime<Utc>>,
    exercise_start: Option<DateTime<Utc>>,
    workout_secs: u32,
    exercise_secs: u32,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn workout_secs(&self) -> u32 {
        self.workout_secs
    }

    pub fn exercise_secs(&self) -> u32 {
        self.exercise_secs
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::WorkoutSnapshot {
            active: self.is_active,
            paused: self.is_paused,
            workout_secs: self.workout_secs,
            exercise_secs: self.exercise_secs,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Output {
        self.start_with_elapsed(now, 0)
    }

    /// Start, back-dating the workout start so a session already in
    /// progress (e.g. restored from persistence) resumes at the right
    /// elapsed value.
    pub fn start_with_elapsed(&mut self, now: DateTime<Utc>, prior_secs: u32) -> Output {
        if self.is_active {
            return Output::none();
        }
        self.is_active = true;
        self.is_paused = false;
        if self.workout_start.is_none() {
            self.workout_start = Some(now - chrono::Duration::seconds(prior_secs as i64));
            self.workout_secs = prior_secs;
        }
        if self.exercise_start.is_none() {
            self.exercise_start = Some(now);
        }
        Output::event(Event::WorkoutStarted { at: now }).with_effect(Effect::AcquireWakeLock)
    }

    /// Recompute both elapsed values from timestamps. Idempotent: calling
    /// any number of times with the same `now` yields the same state.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || self.is_paused {
            return Output::none();
        }
        if let Some(start) = self.workout_start {
            self.workout_secs = clock::elapsed_secs(start, now, 0);
        }
        if let Some(start) = self.exercise_start {
            self.exercise_secs = clock::elapsed_secs(start, now, 0);
        }
        Output::none()
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || self.is_paused {
            return Output::none();
        }
        self.is_paused = true;
        Output::event(Event::WorkoutPaused {
            workout_secs: self.workout_secs,
            at: now,
        })
        .with_effect(Effect::ReleaseWakeLock)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || !self.is_paused {
            return Output::none();
        }
        self.is_paused = false;
        Output::event(Event::WorkoutResumed { at: now }).with_effect(Effect::AcquireWakeLock)
    }

    /// Move to the next exercise: exercise elapsed restarts at zero, the
    /// workout total is unaffected.
    pub fn advance_exercise(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active {
            return Output::none();
        }
        self.exercise_start = Some(now);
        self.exercise_secs = 0;
        Output::event(Event::ExerciseAdvanced {
            workout_secs: self.workout_secs,
            at: now,
        })
    }

    /// Full clear. Used when the workout is abandoned.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Output {
        *self = Self::default();
        Output::event(Event::WorkoutReset { at: now }).with_effect(Effect::ReleaseWakeLock)
    }
}
