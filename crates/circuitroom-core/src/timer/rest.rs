//! Rest-period countdown timer.
//!
//! Counts down from a target duration to zero, firing a completion event
//! exactly once. Remaining time is always derived from the captured start
//! timestamp and accumulated pause time, so an arbitrarily long host
//! suspension resolves correctly on the next tick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock;
use crate::events::{Effect, Event, HapticIntensity, Output};

pub const REST_COMPLETE_TITLE: &str = "Rest Complete!";
pub const REST_COMPLETE_BODY: &str = "Time to get back to work";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestTimer {
    target_secs: u32,
    remaining_secs: u32,
    is_active: bool,
    is_paused: bool,
    completed: bool,
    start_time: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    total_paused_secs: u32,
}

impl RestTimer {
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

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn target_secs(&self) -> u32 {
        self.target_secs
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::RestSnapshot {
            active: self.is_active,
            paused: self.is_paused,
            remaining_secs: self.remaining_secs,
            target_secs: self.target_secs,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown. A zero target means "no rest configured" and is
    /// a no-op, as is starting while already active.
    pub fn start(&mut self, target_secs: u32, now: DateTime<Utc>) -> Output {
        if target_secs == 0 || self.is_active {
            return Output::none();
        }
        self.target_secs = target_secs;
        self.remaining_secs = target_secs;
        self.is_active = true;
        self.is_paused = false;
        self.completed = false;
        self.start_time = Some(now);
        self.paused_at = None;
        self.total_paused_secs = 0;
        Output::event(Event::RestStarted {
            target_secs,
            at: now,
        })
        .with_effect(Effect::AcquireWakeLock)
    }

    /// Derive remaining time; fires `RestCompleted` exactly once when the
    /// countdown reaches zero, however many ticks were skipped in between.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || self.is_paused {
            return Output::none();
        }
        let Some(start) = self.start_time else {
            return Output::none();
        };
        let elapsed = clock::elapsed_secs(start, now, self.total_paused_secs);
        self.remaining_secs = self.target_secs.saturating_sub(elapsed);
        if self.remaining_secs == 0 && !self.completed {
            self.completed = true;
            self.is_active = false;
            return Output::event(Event::RestCompleted {
                target_secs: self.target_secs,
                at: now,
            })
            .with_effect(Effect::Haptic {
                intensity: HapticIntensity::Success,
            })
            .with_effect(Effect::Notify {
                title: REST_COMPLETE_TITLE.into(),
                body: REST_COMPLETE_BODY.into(),
                sound: "chime".into(),
            })
            .with_effect(Effect::ReleaseWakeLock);
        }
        Output::none()
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || self.is_paused {
            return Output::none();
        }
        self.is_paused = true;
        self.paused_at = Some(now);
        Output::none().with_effect(Effect::ReleaseWakeLock)
    }

    /// Folds the pause span into `total_paused_secs` from the single
    /// `paused_at` timestamp, so a pause spanning a suspend/resume cycle
    /// still accounts correctly.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Output {
        let (true, Some(paused_at)) = (self.is_paused, self.paused_at) else {
            return Output::none();
        };
        self.total_paused_secs = self
            .total_paused_secs
            .saturating_add(clock::span_secs(paused_at, now));
        self.paused_at = None;
        self.is_paused = false;
        Output::none().with_effect(Effect::AcquireWakeLock)
    }

    /// Return to the full target, inactive. Used by "reset and restart"
    /// flows which immediately call `start` again.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Output {
        if self.target_secs == 0 {
            return Output::none();
        }
        let target = self.target_secs;
        *self = Self {
            target_secs: target,
            remaining_secs: target,
            ..Self::default()
        };
        Output::event(Event::RestReset { at: now }).with_effect(Effect::ReleaseWakeLock)
    }

    /// Canonical cancel: deactivate with the display back at the target.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Output {
        self.cancel_inner(now, self.target_secs)
    }

    /// Cancel variant that zeroes the display, for call sites that show a
    /// dismissed timer rather than a ready-to-restart one.
    pub fn cancel_to_zero(&mut self, now: DateTime<Utc>) -> Output {
        self.cancel_inner(now, 0)
    }

    fn cancel_inner(&mut self, now: DateTime<Utc>, final_remaining: u32) -> Output {
        if !self.is_active && !self.is_paused {
            return Output::none();
        }
        self.is_active = false;
        self.is_paused = false;
        self.remaining_secs = final_remaining;
        self.start_time = None;
        self.paused_at = None;
        self.total_paused_secs = 0;
        Output::event(Event::RestCancelled { at: now }).with_effect(Effect::ReleaseWakeLock)
    }
}
