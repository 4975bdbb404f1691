use chrono::Utc;
use clap::Subcommand;

use crate::common::{self, emit};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the workout session clock
    Start {
        /// Already-elapsed seconds (resuming a workout in progress)
        #[arg(long, default_value = "0")]
        elapsed: u32,
    },
    /// Pause the session clock
    Pause,
    /// Resume the session clock
    Resume,
    /// Move to the next exercise (exercise timer restarts at zero)
    Advance,
    /// Abandon the workout and clear both timers
    Reset,
    /// Tick and print the current session state as JSON
    Status,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = common::load_state();
    let now = Utc::now();

    match action {
        SessionAction::Start { elapsed } => {
            emit(&state.session.start_with_elapsed(now, elapsed));
        }
        SessionAction::Pause => emit(&state.session.pause(now)),
        SessionAction::Resume => emit(&state.session.resume(now)),
        SessionAction::Advance => emit(&state.session.advance_exercise(now)),
        SessionAction::Reset => emit(&state.session.reset(now)),
        SessionAction::Status => {
            emit(&state.session.tick(now));
            println!("{}", serde_json::to_string_pretty(&state.session.snapshot(now))?);
        }
    }

    common::save_state(&state)?;
    Ok(())
}
