use chrono::Utc;
use circuitroom_core::{BlockFormat, CircuitSession, CircuitTimer, ExerciseTemplate, TimerConfig};
use clap::{Subcommand, ValueEnum};
use uuid::Uuid;

use crate::common::{self, emit};

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Amrap,
    Emom,
    Tabata,
    ForTime,
    Circuit,
}

#[derive(Subcommand)]
pub enum CircuitAction {
    /// Enter a circuit block and start its timer
    Start {
        /// Block format
        #[arg(long, value_enum)]
        format: FormatArg,
        /// Time cap in minutes (amrap / for-time)
        #[arg(long)]
        cap_min: Option<u32>,
        /// Configured EMOM minute count
        #[arg(long)]
        rounds: Option<u32>,
        /// Target round count for progression
        #[arg(long)]
        target_rounds: Option<u32>,
        /// Number of exercises in the block template
        #[arg(long, default_value = "3")]
        exercises: u32,
        /// Target reps per exercise
        #[arg(long, default_value = "10")]
        target_reps: u32,
    },
    /// Toggle the block timer: start, pause, or resume
    Toggle,
    /// Log the current round as complete
    CompleteRound {
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Open one more round past the target (explicit override)
    ExtraRound,
    /// Update actual reps for an exercise in the current round (by position)
    Reps {
        /// Zero-based exercise position within the round
        index: usize,
        reps: u32,
    },
    /// Update weight for an exercise in the current round (by position)
    Weight {
        /// Zero-based exercise position within the round
        index: usize,
        weight: f64,
    },
    /// Explicitly complete the circuit
    Complete,
    /// Clear all block progress (destructive)
    Reset,
    /// Tick and print the block state as JSON
    Status,
}

fn block_format(
    format: FormatArg,
    cap_min: Option<u32>,
    rounds: Option<u32>,
) -> Result<BlockFormat, Box<dyn std::error::Error>> {
    let cap_secs = cap_min.map(|m| m.saturating_mul(60));
    Ok(match format {
        FormatArg::Amrap => BlockFormat::Amrap { cap_secs },
        FormatArg::Emom => BlockFormat::Emom { rounds },
        FormatArg::ForTime => BlockFormat::ForTime { cap_secs },
        FormatArg::Circuit => BlockFormat::Circuit,
        FormatArg::Tabata => {
            let config = TimerConfig::load_or_default(&common::config_path())?;
            config.tabata_format()?
        }
    })
}

pub fn run(action: CircuitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = common::load_state();
    let now = Utc::now();

    match action {
        CircuitAction::Start {
            format,
            cap_min,
            rounds,
            target_rounds,
            exercises,
            target_reps,
        } => {
            let format = block_format(format, cap_min, rounds)?;
            let template: Vec<ExerciseTemplate> = (0..exercises)
                .map(|_| ExerciseTemplate {
                    exercise_id: Uuid::new_v4(),
                    plan_day_exercise_id: Uuid::new_v4(),
                    target_reps,
                })
                .collect();
            let mut timer = CircuitTimer::new(format);
            emit(&timer.start_pause(now));
            state.circuit = Some(timer);
            state.progression =
                Some(CircuitSession::new(Uuid::new_v4(), format, target_rounds, template));
        }
        CircuitAction::Toggle => {
            if let Some(timer) = state.circuit.as_mut() {
                emit(&timer.start_pause(now));
            }
        }
        CircuitAction::CompleteRound { notes } => {
            let (Some(timer), Some(progression)) =
                (state.circuit.as_mut(), state.progression.as_mut())
            else {
                eprintln!("no circuit in progress");
                return Ok(());
            };
            emit(&timer.tick(now));
            emit(&progression.complete_round(now, timer.elapsed_secs(), notes));
        }
        CircuitAction::ExtraRound => {
            if let Some(progression) = state.progression.as_mut() {
                progression.start_extra_round();
            }
        }
        CircuitAction::Reps { index, reps } => {
            if let Some(progression) = state.progression.as_mut() {
                if let Some(id) = exercise_id_at(progression, index) {
                    progression.update_exercise_reps(id, reps);
                }
            }
        }
        CircuitAction::Weight { index, weight } => {
            if let Some(progression) = state.progression.as_mut() {
                if let Some(id) = exercise_id_at(progression, index) {
                    progression.update_exercise_weight(id, weight);
                }
            }
        }
        CircuitAction::Complete => {
            if let Some(timer) = state.circuit.as_mut() {
                emit(&timer.complete(now));
            }
            if let Some(progression) = state.progression.as_mut() {
                emit(&progression.complete_circuit(now));
            }
        }
        CircuitAction::Reset => {
            if let Some(timer) = state.circuit.as_mut() {
                emit(&timer.reset(now));
            }
            state.progression = None;
        }
        CircuitAction::Status => {
            if let Some(timer) = state.circuit.as_mut() {
                emit(&timer.tick(now));
                println!("{}", serde_json::to_string_pretty(&timer.snapshot(now))?);
                println!(
                    "display> {}",
                    circuitroom_core::timer::clock::format_mmss(timer.display_secs())
                );
            }
            if let Some(progression) = state.progression.as_ref() {
                println!("{}", serde_json::to_string_pretty(progression)?);
            }
        }
    }

    common::save_state(&state)?;
    Ok(())
}

fn exercise_id_at(session: &CircuitSession, index: usize) -> Option<Uuid> {
    let id = session.current()?.exercises.get(index)?.exercise_id;
    Some(id)
}
