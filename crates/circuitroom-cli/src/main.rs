use chrono::Utc;
use clap::{Parser, Subcommand};

mod commands;
mod common;

use common::emit;

#[derive(Parser)]
#[command(name = "circuitroom-cli", version, about = "Circuitroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workout session clock
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Rest countdown timer
    Rest {
        #[command(subcommand)]
        action: commands::rest::RestAction,
    },
    /// Circuit block timer and round progression
    Circuit {
        #[command(subcommand)]
        action: commands::circuit::CircuitAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Resynchronize all timers after a suspension (foreground signal)
    Resync,
}

fn resync() -> Result<(), Box<dyn std::error::Error>> {
    let mut state = common::load_state();
    let now = Utc::now();
    let out = circuitroom_core::timer::resync::foreground(
        now,
        Some(&mut state.session),
        Some(&mut state.rest),
        state.circuit.as_mut(),
    );
    emit(&out);
    common::save_state(&state)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Rest { action } => commands::rest::run(action),
        Commands::Circuit { action } => commands::circuit::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Resync => resync(),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
