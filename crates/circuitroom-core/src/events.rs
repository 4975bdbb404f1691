use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the engine produces an Event.
/// The host polls timers and renders/persists events as it sees fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkoutStarted {
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        workout_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        at: DateTime<Utc>,
    },
    WorkoutReset {
        at: DateTime<Utc>,
    },
    ExerciseAdvanced {
        workout_secs: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        target_secs: u32,
        at: DateTime<Utc>,
    },
    RestCompleted {
        target_secs: u32,
        at: DateTime<Utc>,
    },
    RestCancelled {
        at: DateTime<Utc>,
    },
    RestReset {
        at: DateTime<Utc>,
    },
    CircuitStarted {
        at: DateTime<Utc>,
    },
    CircuitPaused {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    CircuitResumed {
        at: DateTime<Utc>,
    },
    CircuitReset {
        at: DateTime<Utc>,
    },
    /// The circuit timer reached its completion rule (or the user completed
    /// it explicitly for formats without one).
    CircuitCompleted {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    /// Tabata work/rest phase or interval boundary crossed.
    PhaseChanged {
        interval: u32,
        work_phase: bool,
        at: DateTime<Utc>,
    },
    /// EMOM minute rollover (fires once per minute transition).
    MinuteRolled {
        minute: u32,
        at: DateTime<Utc>,
    },
    /// One minute left before a configured time cap.
    TimeCapWarning {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A For-Time cap was reached. Not a completion -- the block still
    /// requires explicit user completion.
    TimeCapReached {
        at: DateTime<Utc>,
    },
    RoundCompleted {
        round_number: u32,
        round_time_secs: u32,
        at: DateTime<Utc>,
    },
    /// The whole circuit session was finalized by the user.
    CircuitSessionCompleted {
        rounds_completed: u32,
        at: DateTime<Utc>,
    },
    WorkoutSnapshot {
        active: bool,
        paused: bool,
        workout_secs: u32,
        exercise_secs: u32,
        at: DateTime<Utc>,
    },
    RestSnapshot {
        active: bool,
        paused: bool,
        remaining_secs: u32,
        target_secs: u32,
        at: DateTime<Utc>,
    },
    CircuitSnapshot {
        active: bool,
        paused: bool,
        completed: bool,
        elapsed_secs: u32,
        display_secs: u32,
        interval: Option<u32>,
        work_phase: Option<bool>,
        at: DateTime<Utc>,
    },
}

/// Named haptic intensity, mapped to platform patterns by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    Light,
    Medium,
    Heavy,
    Success,
}

/// A side effect the engine requests of its host. Fire-and-forget: the
/// host delivers these best-effort and never reports failures back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Haptic {
        intensity: HapticIntensity,
    },
    /// Immediate local notification, no banner.
    Notify {
        title: String,
        body: String,
        sound: String,
    },
    AcquireWakeLock,
    ReleaseWakeLock,
}

/// Result of a single state transition: lifecycle events plus requested
/// side effects. Commands that turn out to be no-ops return `Output::none()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub events: Vec<Event>,
    pub effects: Vec<Effect>,
}

impl Output {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn event(event: Event) -> Self {
        Self {
            events: vec![event],
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn merge(&mut self, other: Output) {
        self.events.extend(other.events);
        self.effects.extend(other.effects);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::RestCompleted {
            target_secs: 90,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"RestCompleted\""));
        assert!(json.contains("\"target_secs\":90"));
    }

    #[test]
    fn effect_serializes_snake_case() {
        let json = serde_json::to_string(&Effect::AcquireWakeLock).unwrap();
        assert!(json.contains("acquire_wake_lock"));
    }

    #[test]
    fn merge_concatenates_in_order() {
        let mut out = Output::event(Event::CircuitStarted { at: Utc::now() });
        out.merge(Output::none().with_effect(Effect::AcquireWakeLock));
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.effects.len(), 1);
        assert!(!out.is_empty());
    }
}
