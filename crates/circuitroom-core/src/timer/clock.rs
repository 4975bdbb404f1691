//! Pure wall-clock arithmetic.
//!
//! Every displayed time in the engine is derived from a captured start
//! timestamp, an injected `now`, and accumulated paused seconds -- never by
//! incrementing a counter per tick. Mobile hosts suspend tick delivery but
//! not wall-clock time, so timestamps are the only source of truth.

use chrono::{DateTime, Utc};

/// Whole seconds elapsed between `start` and `now`, minus time spent
/// paused, clamped to >= 0 at both subtraction steps.
pub fn elapsed_secs(start: DateTime<Utc>, now: DateTime<Utc>, total_paused_secs: u32) -> u32 {
    let raw = (now - start).num_seconds().max(0) as u64;
    raw.saturating_sub(total_paused_secs as u64)
        .min(u32::MAX as u64) as u32
}

/// Whole seconds between two instants, clamped to >= 0. Used when folding
/// a pause span into `total_paused_secs`.
pub fn span_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    (to - from)
        .num_seconds()
        .max(0)
        .min(u32::MAX as i64) as u32
}

/// `mm:ss` display formatting. Minutes are not capped at 59.
pub fn format_mmss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
