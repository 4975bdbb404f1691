//! Shared CLI plumbing: the JSON state file and side-effect delivery.
//!
//! The CLI persists the engine between invocations the same way a mobile
//! host would across process restarts: serialize the whole timer state,
//! reload it, and let the next `tick` derive correct values from the
//! stored timestamps.

use std::error::Error;
use std::path::PathBuf;

use circuitroom_core::{
    CircuitSession, CircuitTimer, Effect, Output, RestTimer, SessionClock, TimerConfig,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub session: SessionClock,
    #[serde(default)]
    pub rest: RestTimer,
    #[serde(default)]
    pub circuit: Option<CircuitTimer>,
    #[serde(default)]
    pub progression: Option<CircuitSession>,
}

fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CIRCUITROOM_STATE_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("circuitroom")
}

pub fn state_path() -> PathBuf {
    state_dir().join("state.json")
}

pub fn config_path() -> PathBuf {
    state_dir().join("config.toml")
}

pub fn load_state() -> AppState {
    let path = state_path();
    match std::fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        Err(_) => AppState::default(),
    }
}

pub fn save_state(state: &AppState) -> Result<(), Box<dyn Error>> {
    let path = state_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(state)?)?;
    Ok(())
}

/// Print lifecycle events as JSON and deliver side-effect requests,
/// filtered through the user's notification preferences (disabled
/// channels are dropped, the configured sound replaces the requested
/// one). Delivery is fire-and-forget: a failed effect is reported on
/// stderr and never affects engine state or the exit code.
pub fn emit(out: &Output) {
    for event in &out.events {
        match serde_json::to_string_pretty(event) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode event: {}", e),
        }
    }
    let prefs = TimerConfig::load_or_default(&config_path())
        .unwrap_or_default()
        .notifications;
    for effect in &out.effects {
        let Some(effect) = prefs.apply(effect.clone()) else {
            continue;
        };
        if let Err(e) = deliver(&effect) {
            eprintln!("effect delivery failed: {}", e);
        }
    }
}

fn deliver(effect: &Effect) -> Result<(), Box<dyn Error>> {
    // A desktop CLI has no haptic motor or wake lock; print the request
    // the way a mobile host would forward it to the platform.
    let json = serde_json::to_string(effect)?;
    println!("effect> {}", json);
    Ok(())
}
