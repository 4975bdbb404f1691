//! Circuit round list and progression rules.
//!
//! A [`CircuitSession`] owns the ordered rounds for one block. The first
//! round is created eagerly; later rounds are appended lazily by cloning
//! the block's exercise template with zeroed progress. Persistence of
//! completed rounds belongs to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timer::BlockFormat;
use crate::events::{Event, Output};

/// Per-exercise prescription used to seed each new round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub exercise_id: Uuid,
    /// Foreign reference into the workout plan, owned externally.
    pub plan_day_exercise_id: Uuid,
    pub target_reps: u32,
}

/// Logged progress for one exercise within one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitExerciseLog {
    pub exercise_id: Uuid,
    pub plan_day_exercise_id: Uuid,
    pub target_reps: u32,
    pub actual_reps: u32,
    pub weight: f64,
    pub completed: bool,
    pub notes: String,
}

impl CircuitExerciseLog {
    fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            exercise_id: template.exercise_id,
            plan_day_exercise_id: template.plan_day_exercise_id,
            target_reps: template.target_reps,
            actual_reps: 0,
            weight: 0.0,
            completed: false,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitRound {
    pub round_number: u32,
    pub exercises: Vec<CircuitExerciseLog>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub round_time_secs: u32,
    pub notes: String,
}

impl CircuitRound {
    fn new(round_number: u32, template: &[ExerciseTemplate]) -> Self {
        Self {
            round_number,
            exercises: template.iter().map(CircuitExerciseLog::from_template).collect(),
            is_completed: false,
            completed_at: None,
            round_time_secs: 0,
            notes: String::new(),
        }
    }
}

/// In-flight state for one circuit block: the round list, the cursor, and
/// the advancement rules keyed by format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitSession {
    pub block_id: Uuid,
    pub format: BlockFormat,
    /// For AMRAP this is a suggested floor, never a cap on rounds.
    pub target_rounds: Option<u32>,
    /// 1-based cursor into `rounds`.
    pub current_round: u32,
    pub rounds: Vec<CircuitRound>,
    pub is_completed: bool,
    template: Vec<ExerciseTemplate>,
}

impl CircuitSession {
    pub fn new(
        block_id: Uuid,
        format: BlockFormat,
        target_rounds: Option<u32>,
        template: Vec<ExerciseTemplate>,
    ) -> Self {
        let first = CircuitRound::new(1, &template);
        Self {
            block_id,
            format,
            target_rounds,
            current_round: 1,
            rounds: vec![first],
            is_completed: false,
            template,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&CircuitRound> {
        self.rounds.get(self.current_round as usize - 1)
    }

    fn current_mut(&mut self) -> Option<&mut CircuitRound> {
        self.rounds.get_mut(self.current_round as usize - 1)
    }

    pub fn completed_rounds(&self) -> u32 {
        self.rounds.iter().filter(|r| r.is_completed).count() as u32
    }

    /// The "complete round" control applies while the session is open and
    /// the current round has not been logged yet.
    pub fn can_complete_round(&self) -> bool {
        !self.is_completed && self.current().is_some_and(|r| !r.is_completed)
    }

    /// Circuit completion needs at least one logged round.
    pub fn can_complete_circuit(&self) -> bool {
        !self.is_completed && self.completed_rounds() > 0
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Log the current round as done, stamping the circuit timer's elapsed
    /// value, then advance or hold per format:
    ///
    /// - For Time never advances (one effort, explicit completion).
    /// - AMRAP always advances; `target_rounds` is a floor.
    /// - Other formats advance while the next round is within target (or
    ///   the target is unset), creating the round lazily.
    ///
    /// Calling on an already-completed round is a no-op.
    pub fn complete_round(
        &mut self,
        now: DateTime<Utc>,
        round_time_secs: u32,
        notes: impl Into<String>,
    ) -> Output {
        if self.is_completed {
            return Output::none();
        }
        let Some(round) = self.current_mut() else {
            return Output::none();
        };
        if round.is_completed {
            return Output::none();
        }
        round.is_completed = true;
        round.completed_at = Some(now);
        round.round_time_secs = round_time_secs;
        round.notes = notes.into();
        let completed_number = round.round_number;

        let next = self.current_round + 1;
        let advance = if self.format.holds_rounds() {
            false
        } else if self.format.uncapped_rounds() {
            true
        } else {
            match self.target_rounds {
                None => true,
                Some(target) => next <= target,
            }
        };
        if advance {
            self.current_round = next;
            if self.rounds.len() < next as usize {
                let round = CircuitRound::new(next, &self.template);
                self.rounds.push(round);
            }
        }

        Output::event(Event::RoundCompleted {
            round_number: completed_number,
            round_time_secs,
            at: now,
        })
    }

    /// Explicit override for formats that hold at `target_rounds`: open
    /// one more round past the target so "complete round" stays available
    /// alongside "complete circuit". No-op while the current round is
    /// still open, after the session is finalized, and for For-Time
    /// blocks (a single effort by definition).
    pub fn start_extra_round(&mut self) {
        if self.is_completed || self.format.holds_rounds() {
            return;
        }
        if !self.current().is_some_and(|r| r.is_completed) {
            return;
        }
        let next = self.current_round + 1;
        self.current_round = next;
        if self.rounds.len() < next as usize {
            let round = CircuitRound::new(next, &self.template);
            self.rounds.push(round);
        }
    }

    /// Finalize the session. Requires at least one completed round; the
    /// caller hands the finished session to its logging collaborator.
    pub fn complete_circuit(&mut self, now: DateTime<Utc>) -> Output {
        if !self.can_complete_circuit() {
            return Output::none();
        }
        self.is_completed = true;
        Output::event(Event::CircuitSessionCompleted {
            rounds_completed: self.completed_rounds(),
            at: now,
        })
    }

    /// Update reps on the in-progress round. Reps > 0 implicitly marks the
    /// exercise completed and reps == 0 un-marks it -- a product rule that
    /// feeds round-completion eligibility, kept explicit here.
    pub fn update_exercise_reps(&mut self, exercise_id: Uuid, reps: u32) {
        if self.is_completed {
            return;
        }
        if let Some(exercise) = self.current_exercise_mut(exercise_id) {
            exercise.actual_reps = reps;
            exercise.completed = reps > 0;
        }
    }

    /// Update weight on the in-progress round, clamped to >= 0.
    pub fn update_exercise_weight(&mut self, exercise_id: Uuid, weight: f64) {
        if self.is_completed {
            return;
        }
        if let Some(exercise) = self.current_exercise_mut(exercise_id) {
            exercise.weight = weight.max(0.0);
        }
    }

    fn current_exercise_mut(&mut self, exercise_id: Uuid) -> Option<&mut CircuitExerciseLog> {
        let round = self.current_mut()?;
        if round.is_completed {
            return None;
        }
        round
            .exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
    }
}
