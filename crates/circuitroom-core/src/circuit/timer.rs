//! Format-specific circuit block timer.
//!
//! One wall-clock state machine parameterized by [`BlockFormat`]. Each
//! format interprets the same raw elapsed value differently for display
//! and has its own transition/completion rules:
//!
//! - Tabata: fixed work/rest cycle, fixed interval count, phase haptics.
//! - EMOM: per-minute rollover with a clean baseline each minute.
//! - For Time: count-up (or cap countdown); cap warns, never completes.
//! - AMRAP: cap countdown; auto-completes at the cap.
//! - Circuit: plain count-up, explicit completion only.
//!
//! All display values derive from the captured start timestamp, so a tick
//! arriving after a long host suspension lands on the correct state and
//! fires any crossed transition exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{Effect, Event, HapticIntensity, Output};
use crate::timer::clock;

pub const DEFAULT_TABATA_WORK_SECS: u32 = 20;
pub const DEFAULT_TABATA_REST_SECS: u32 = 10;
pub const DEFAULT_TABATA_INTERVALS: u32 = 8;

const EMOM_MINUTE_SECS: u32 = 60;
const CAP_WARNING_SECS: u32 = 60;

/// Closed set of circuit block formats, each carrying its timing config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum BlockFormat {
    Tabata {
        work_secs: u32,
        rest_secs: u32,
        intervals: u32,
    },
    Emom {
        /// Configured minute count; unset means open-ended.
        rounds: Option<u32>,
    },
    ForTime {
        /// Optional time cap. Reaching it warns but never auto-completes.
        cap_secs: Option<u32>,
    },
    Amrap {
        /// Optional time cap. Reaching it auto-completes the block.
        cap_secs: Option<u32>,
    },
    Circuit,
}

impl BlockFormat {
    /// Standard 20s/10s x 8 Tabata.
    pub fn tabata_default() -> Self {
        BlockFormat::Tabata {
            work_secs: DEFAULT_TABATA_WORK_SECS,
            rest_secs: DEFAULT_TABATA_REST_SECS,
            intervals: DEFAULT_TABATA_INTERVALS,
        }
    }

    /// For-Time never advances rounds; completion is always explicit.
    pub fn holds_rounds(&self) -> bool {
        matches!(self, BlockFormat::ForTime { .. })
    }

    /// AMRAP rounds are uncapped: `target_rounds` is a floor, not a ceiling.
    pub fn uncapped_rounds(&self) -> bool {
        matches!(self, BlockFormat::Amrap { .. })
    }
}

/// Wall-clock timer for one circuit block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitTimer {
    format: BlockFormat,
    is_active: bool,
    is_paused: bool,
    completed: bool,
    start_time: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    total_paused_secs: u32,
    /// Raw elapsed seconds since block start, recomputed from timestamps.
    elapsed_secs: u32,
    /// Tabata interval (1..=intervals) or EMOM minute number.
    current_interval: Option<u32>,
    /// Tabata only: true during work, false during rest.
    is_work_phase: Option<bool>,
    /// Last EMOM minute that fired its rollover signals.
    last_minute: u32,
    cap_warning_fired: bool,
    cap_reached_fired: bool,
}

impl CircuitTimer {
    pub fn new(format: BlockFormat) -> Self {
        let (current_interval, is_work_phase) = match format {
            BlockFormat::Tabata { .. } => (Some(1), Some(true)),
            BlockFormat::Emom { .. } => (Some(1), None),
            _ => (None, None),
        };
        Self {
            format,
            is_active: false,
            is_paused: false,
            completed: false,
            start_time: None,
            paused_at: None,
            total_paused_secs: 0,
            elapsed_secs: 0,
            current_interval,
            is_work_phase,
            last_minute: 1,
            cap_warning_fired: false,
            cap_reached_fired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn format(&self) -> BlockFormat {
        self.format
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn current_interval(&self) -> Option<u32> {
        self.current_interval
    }

    pub fn is_work_phase(&self) -> Option<bool> {
        self.is_work_phase
    }

    /// The value a host should display, per format.
    pub fn display_secs(&self) -> u32 {
        match self.format {
            BlockFormat::Tabata {
                work_secs,
                rest_secs,
                ..
            } => {
                let cycle = work_secs + rest_secs;
                if cycle == 0 {
                    return 0;
                }
                let in_cycle = self.elapsed_secs % cycle;
                if in_cycle < work_secs {
                    work_secs - in_cycle
                } else {
                    cycle - in_cycle
                }
            }
            BlockFormat::Emom { .. } => EMOM_MINUTE_SECS - (self.elapsed_secs % EMOM_MINUTE_SECS),
            BlockFormat::ForTime {
                cap_secs: Some(cap),
            }
            | BlockFormat::Amrap {
                cap_secs: Some(cap),
            } => cap.saturating_sub(self.elapsed_secs),
            BlockFormat::ForTime { cap_secs: None }
            | BlockFormat::Amrap { cap_secs: None }
            | BlockFormat::Circuit => self.elapsed_secs,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::CircuitSnapshot {
            active: self.is_active,
            paused: self.is_paused,
            completed: self.completed,
            elapsed_secs: self.elapsed_secs,
            display_secs: self.display_secs(),
            interval: self.current_interval,
            work_phase: self.is_work_phase,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Single toggle control: not started -> running, running -> paused,
    /// paused -> running. No-op once completed.
    pub fn start_pause(&mut self, now: DateTime<Utc>) -> Output {
        if self.completed {
            return Output::none();
        }
        if !self.is_active && !self.is_paused {
            self.is_active = true;
            self.start_time = Some(now);
            return Output::event(Event::CircuitStarted { at: now })
                .with_effect(Effect::AcquireWakeLock);
        }
        if self.is_paused {
            if let Some(paused_at) = self.paused_at.take() {
                self.total_paused_secs = self
                    .total_paused_secs
                    .saturating_add(clock::span_secs(paused_at, now));
            }
            self.is_paused = false;
            return Output::event(Event::CircuitResumed { at: now })
                .with_effect(Effect::AcquireWakeLock);
        }
        self.is_paused = true;
        self.paused_at = Some(now);
        Output::event(Event::CircuitPaused {
            elapsed_secs: self.elapsed_secs,
            at: now,
        })
        .with_effect(Effect::ReleaseWakeLock)
    }

    /// Destructive: clears all progress. Hosts confirm with the user first.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Output {
        *self = Self::new(self.format);
        Output::event(Event::CircuitReset { at: now }).with_effect(Effect::ReleaseWakeLock)
    }

    /// Explicit completion for formats without an auto-complete rule (and
    /// early completion for the rest). Idempotent.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Output {
        if self.completed {
            return Output::none();
        }
        self.finish(now)
    }

    /// Recompute elapsed time and evaluate the format's transition and
    /// completion rules. Safe to call any number of times per second and
    /// after arbitrarily long gaps.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Output {
        if !self.is_active || self.is_paused || self.completed {
            return Output::none();
        }
        let Some(start) = self.start_time else {
            return Output::none();
        };
        self.elapsed_secs = clock::elapsed_secs(start, now, self.total_paused_secs);

        match self.format {
            BlockFormat::Tabata {
                work_secs,
                rest_secs,
                intervals,
            } => self.tick_tabata(now, work_secs, rest_secs, intervals),
            BlockFormat::Emom { rounds } => self.tick_emom(now, rounds),
            BlockFormat::ForTime { cap_secs } => self.tick_for_time(now, cap_secs),
            BlockFormat::Amrap { cap_secs } => self.tick_amrap(now, cap_secs),
            BlockFormat::Circuit => Output::none(),
        }
    }

    // ── Per-format tick handlers ─────────────────────────────────────

    fn tick_tabata(
        &mut self,
        now: DateTime<Utc>,
        work_secs: u32,
        rest_secs: u32,
        intervals: u32,
    ) -> Output {
        let cycle = work_secs + rest_secs;
        if cycle == 0 {
            return Output::none();
        }
        let interval = self.elapsed_secs / cycle + 1;
        if interval > intervals {
            self.current_interval = Some(intervals);
            return self.finish(now);
        }
        let work_phase = self.elapsed_secs % cycle < work_secs;
        let changed =
            self.current_interval != Some(interval) || self.is_work_phase != Some(work_phase);
        self.current_interval = Some(interval);
        self.is_work_phase = Some(work_phase);
        if !changed {
            return Output::none();
        }
        // Stronger pulse entering work, lighter entering rest. No sound.
        let intensity = if work_phase {
            HapticIntensity::Heavy
        } else {
            HapticIntensity::Light
        };
        Output::event(Event::PhaseChanged {
            interval,
            work_phase,
            at: now,
        })
        .with_effect(Effect::Haptic { intensity })
    }

    fn tick_emom(&mut self, now: DateTime<Utc>, rounds: Option<u32>) -> Output {
        let minute = self.elapsed_secs / EMOM_MINUTE_SECS + 1;
        if let Some(rounds) = rounds {
            if minute > rounds {
                self.current_interval = Some(rounds);
                return self.finish(now);
            }
        }
        self.current_interval = Some(minute);
        if minute <= 1 || minute == self.last_minute {
            return Output::none();
        }
        // Rollover: re-anchor the baseline at the top of this minute and
        // drop accumulated pause time so the minute starts clean.
        self.last_minute = minute;
        let baseline = (minute - 1) * EMOM_MINUTE_SECS;
        self.start_time = Some(now - chrono::Duration::seconds(baseline as i64));
        self.total_paused_secs = 0;
        self.elapsed_secs = baseline;
        Output::event(Event::MinuteRolled { minute, at: now })
            .with_effect(Effect::Haptic {
                intensity: HapticIntensity::Medium,
            })
            .with_effect(Effect::Notify {
                title: "New Minute".into(),
                body: format!("Minute {} -- go!", minute),
                sound: "chime".into(),
            })
    }

    fn tick_for_time(&mut self, now: DateTime<Utc>, cap_secs: Option<u32>) -> Output {
        let Some(cap) = cap_secs else {
            return Output::none();
        };
        let mut out = self.check_cap_warning(now, cap);
        if self.elapsed_secs >= cap && !self.cap_reached_fired {
            self.cap_reached_fired = true;
            out.push_event(Event::TimeCapReached { at: now });
            out.push_effect(Effect::Haptic {
                intensity: HapticIntensity::Heavy,
            });
            out.push_effect(Effect::Notify {
                title: "Time Cap Reached".into(),
                body: "Finish up and log your result".into(),
                sound: "chime".into(),
            });
        }
        out
    }

    fn tick_amrap(&mut self, now: DateTime<Utc>, cap_secs: Option<u32>) -> Output {
        let Some(cap) = cap_secs else {
            return Output::none();
        };
        let mut out = self.check_cap_warning(now, cap);
        if self.elapsed_secs >= cap {
            out.merge(self.finish(now));
        }
        out
    }

    /// One-shot warning with one minute left before the cap. `<=` rather
    /// than `==` so a crossing that happened while suspended still fires
    /// on the resume tick.
    fn check_cap_warning(&mut self, now: DateTime<Utc>, cap: u32) -> Output {
        let remaining = cap.saturating_sub(self.elapsed_secs);
        if self.cap_warning_fired
            || remaining > CAP_WARNING_SECS
            || remaining == 0
            || self.elapsed_secs == 0
        {
            return Output::none();
        }
        self.cap_warning_fired = true;
        Output::event(Event::TimeCapWarning {
            remaining_secs: remaining,
            at: now,
        })
        .with_effect(Effect::Haptic {
            intensity: HapticIntensity::Medium,
        })
        .with_effect(Effect::Notify {
            title: "One Minute Left".into(),
            body: "Push through the final minute".into(),
            sound: "chime".into(),
        })
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Output {
        self.completed = true;
        self.is_active = false;
        self.is_paused = false;
        self.paused_at = None;
        Output::event(Event::CircuitCompleted {
            elapsed_secs: self.elapsed_secs,
            at: now,
        })
        .with_effect(Effect::Haptic {
            intensity: HapticIntensity::Success,
        })
        .with_effect(Effect::Notify {
            title: "Circuit Complete".into(),
            body: "Great work -- log your rounds".into(),
            sound: "chime".into(),
        })
        .with_effect(Effect::ReleaseWakeLock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    fn started(format: BlockFormat) -> (CircuitTimer, DateTime<Utc>) {
        let start = t0();
        let mut timer = CircuitTimer::new(format);
        timer.start_pause(start);
        (timer, start)
    }

    fn count<F: Fn(&Event) -> bool>(out: &Output, pred: F) -> usize {
        out.events.iter().filter(|e| pred(e)).count()
    }

    // ── Tabata ───────────────────────────────────────────────────────

    #[test]
    fn tabata_phase_boundaries() {
        let (mut timer, start) = started(BlockFormat::tabata_default());

        timer.tick(start + Duration::seconds(19));
        assert_eq!(timer.is_work_phase(), Some(true));
        assert_eq!(timer.current_interval(), Some(1));
        assert_eq!(timer.display_secs(), 1);

        let out = timer.tick(start + Duration::seconds(20));
        assert_eq!(timer.is_work_phase(), Some(false));
        assert_eq!(count(&out, |e| matches!(e, Event::PhaseChanged { .. })), 1);
        assert!(out.effects.iter().any(|e| matches!(
            e,
            Effect::Haptic {
                intensity: HapticIntensity::Light
            }
        )));

        let out = timer.tick(start + Duration::seconds(30));
        assert_eq!(timer.current_interval(), Some(2));
        assert_eq!(timer.is_work_phase(), Some(true));
        assert!(out.effects.iter().any(|e| matches!(
            e,
            Effect::Haptic {
                intensity: HapticIntensity::Heavy
            }
        )));
    }

    #[test]
    fn tabata_completes_after_final_interval() {
        let (mut timer, start) = started(BlockFormat::tabata_default());
        // 8 intervals x 30s = 240s
        let out = timer.tick(start + Duration::seconds(240));
        assert_eq!(
            count(&out, |e| matches!(e, Event::CircuitCompleted { .. })),
            1
        );
        assert!(timer.is_completed());
        // Further ticks stay silent.
        let out = timer.tick(start + Duration::seconds(300));
        assert!(out.is_empty());
    }

    #[test]
    fn tabata_no_transition_event_within_phase() {
        let (mut timer, start) = started(BlockFormat::tabata_default());
        timer.tick(start + Duration::seconds(5));
        let out = timer.tick(start + Duration::seconds(6));
        assert!(out.is_empty());
    }

    // ── EMOM ─────────────────────────────────────────────────────────

    #[test]
    fn emom_display_counts_down_to_minute() {
        let (mut timer, start) = started(BlockFormat::Emom { rounds: Some(10) });
        timer.tick(start + Duration::seconds(59));
        assert_eq!(timer.display_secs(), 1);
        assert_eq!(timer.current_interval(), Some(1));
    }

    #[test]
    fn emom_minute_rollover_fires_once() {
        let (mut timer, start) = started(BlockFormat::Emom { rounds: Some(10) });
        let out = timer.tick(start + Duration::seconds(60));
        assert_eq!(count(&out, |e| matches!(e, Event::MinuteRolled { .. })), 1);
        assert_eq!(timer.current_interval(), Some(2));
        assert_eq!(timer.display_secs(), 60);
        // Same second, more ticks: guarded by last processed minute.
        let out = timer.tick(start + Duration::seconds(60));
        assert_eq!(count(&out, |e| matches!(e, Event::MinuteRolled { .. })), 0);
    }

    #[test]
    fn emom_rollover_clears_pause_debt() {
        let (mut timer, start) = started(BlockFormat::Emom { rounds: Some(10) });
        timer.start_pause(start + Duration::seconds(30)); // pause
        timer.start_pause(start + Duration::seconds(40)); // resume: 10s paused
        timer.tick(start + Duration::seconds(70)); // elapsed 60 -> minute 2
        assert_eq!(timer.current_interval(), Some(2));
        // Baseline re-anchored: next minute runs a clean 60 seconds.
        timer.tick(start + Duration::seconds(100));
        assert_eq!(timer.display_secs(), 30);
    }

    #[test]
    fn emom_completes_past_configured_rounds() {
        let (mut timer, start) = started(BlockFormat::Emom { rounds: Some(2) });
        timer.tick(start + Duration::seconds(60));
        assert!(!timer.is_completed());
        let out = timer.tick(start + Duration::seconds(120));
        assert_eq!(
            count(&out, |e| matches!(e, Event::CircuitCompleted { .. })),
            1
        );
        assert!(timer.is_completed());
    }

    // ── For Time ─────────────────────────────────────────────────────

    #[test]
    fn for_time_cap_warns_but_does_not_complete() {
        let cap = 5 * 60;
        let (mut timer, start) = started(BlockFormat::ForTime {
            cap_secs: Some(cap),
        });
        let out = timer.tick(start + Duration::seconds((cap - 60) as i64));
        assert_eq!(
            count(&out, |e| matches!(e, Event::TimeCapWarning { .. })),
            1
        );
        // Warning fires only once.
        let out = timer.tick(start + Duration::seconds((cap - 59) as i64));
        assert_eq!(
            count(&out, |e| matches!(e, Event::TimeCapWarning { .. })),
            0
        );
        let out = timer.tick(start + Duration::seconds(cap as i64));
        assert_eq!(count(&out, |e| matches!(e, Event::TimeCapReached { .. })), 1);
        assert!(!timer.is_completed());
        assert_eq!(timer.display_secs(), 0);
        // Cap-reached is also one-shot; elapsed keeps counting underneath.
        let out = timer.tick(start + Duration::seconds((cap + 30) as i64));
        assert_eq!(count(&out, |e| matches!(e, Event::TimeCapReached { .. })), 0);
        assert_eq!(timer.elapsed_secs(), cap + 30);
    }

    #[test]
    fn for_time_without_cap_counts_up() {
        let (mut timer, start) = started(BlockFormat::ForTime { cap_secs: None });
        let out = timer.tick(start + Duration::seconds(900));
        assert!(out.is_empty());
        assert_eq!(timer.display_secs(), 900);
    }

    #[test]
    fn for_time_explicit_complete_is_idempotent() {
        let (mut timer, start) = started(BlockFormat::ForTime { cap_secs: None });
        timer.tick(start + Duration::seconds(300));
        let out = timer.complete(start + Duration::seconds(300));
        assert_eq!(
            count(&out, |e| matches!(e, Event::CircuitCompleted { .. })),
            1
        );
        assert!(timer.complete(start + Duration::seconds(301)).is_empty());
    }

    // ── AMRAP ────────────────────────────────────────────────────────

    #[test]
    fn amrap_auto_completes_at_cap() {
        let cap = 10 * 60;
        let (mut timer, start) = started(BlockFormat::Amrap {
            cap_secs: Some(cap),
        });
        timer.tick(start + Duration::seconds((cap - 1) as i64));
        assert!(!timer.is_completed());
        let out = timer.tick(start + Duration::seconds(cap as i64));
        assert_eq!(
            count(&out, |e| matches!(e, Event::CircuitCompleted { .. })),
            1
        );
        assert!(timer.is_completed());
        assert!(timer.tick(start + Duration::seconds((cap + 5) as i64)).is_empty());
    }

    #[test]
    fn amrap_warning_at_one_minute_left() {
        let cap = 3 * 60;
        let (mut timer, start) = started(BlockFormat::Amrap {
            cap_secs: Some(cap),
        });
        let out = timer.tick(start + Duration::seconds(119));
        assert_eq!(
            count(&out, |e| matches!(e, Event::TimeCapWarning { .. })),
            0
        );
        let out = timer.tick(start + Duration::seconds(120));
        assert_eq!(
            count(&out, |e| matches!(e, Event::TimeCapWarning { .. })),
            1
        );
    }

    // ── Controls ─────────────────────────────────────────────────────

    #[test]
    fn start_pause_toggles() {
        let start = t0();
        let mut timer = CircuitTimer::new(BlockFormat::Circuit);
        let out = timer.start_pause(start);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, Event::CircuitStarted { .. })));
        timer.tick(start + Duration::seconds(10));
        timer.start_pause(start + Duration::seconds(10)); // pause
        assert!(timer.is_paused());
        timer.tick(start + Duration::seconds(100)); // frozen
        assert_eq!(timer.elapsed_secs(), 10);
        timer.start_pause(start + Duration::seconds(110)); // resume
        timer.tick(start + Duration::seconds(120));
        assert_eq!(timer.elapsed_secs(), 20);
    }

    #[test]
    fn reset_returns_to_zeroed_inactive_state() {
        let (mut timer, start) = started(BlockFormat::tabata_default());
        timer.tick(start + Duration::seconds(45));
        timer.reset(start + Duration::seconds(45));
        assert!(!timer.is_active());
        assert!(!timer.is_completed());
        assert_eq!(timer.elapsed_secs(), 0);
        assert_eq!(timer.current_interval(), Some(1));
        assert_eq!(timer.is_work_phase(), Some(true));
    }
}
