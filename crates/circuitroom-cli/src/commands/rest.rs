use chrono::Utc;
use clap::Subcommand;

use crate::common::{self, emit};

#[derive(Subcommand)]
pub enum RestAction {
    /// Start a rest countdown
    Start {
        /// Rest duration in seconds
        secs: u32,
    },
    /// Pause the countdown
    Pause,
    /// Resume the countdown
    Resume,
    /// Cancel the countdown (display returns to the target)
    Cancel {
        /// Zero the display instead of returning to the target
        #[arg(long)]
        zero: bool,
    },
    /// Reset to the full target, ready to restart
    Reset,
    /// Tick and print the countdown state as JSON
    Status,
}

pub fn run(action: RestAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = common::load_state();
    let now = Utc::now();

    match action {
        RestAction::Start { secs } => emit(&state.rest.start(secs, now)),
        RestAction::Pause => emit(&state.rest.pause(now)),
        RestAction::Resume => emit(&state.rest.resume(now)),
        RestAction::Cancel { zero } => {
            if zero {
                emit(&state.rest.cancel_to_zero(now));
            } else {
                emit(&state.rest.cancel(now));
            }
        }
        RestAction::Reset => emit(&state.rest.reset(now)),
        RestAction::Status => {
            emit(&state.rest.tick(now));
            println!("{}", serde_json::to_string_pretty(&state.rest.snapshot(now))?);
            println!(
                "display> {}",
                circuitroom_core::timer::clock::format_mmss(state.rest.remaining_secs())
            );
        }
    }

    common::save_state(&state)?;
    Ok(())
}
