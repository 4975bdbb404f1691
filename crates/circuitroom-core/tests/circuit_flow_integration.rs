//! Integration tests driving a circuit block end to end: timer ticks,
//! round logging, and final completion, the way a host screen would.

use chrono::{DateTime, Duration, Utc};
use circuitroom_core::{
    BlockFormat, CircuitSession, CircuitTimer, Event, ExerciseTemplate, Output,
};
use uuid::Uuid;

fn template() -> Vec<ExerciseTemplate> {
    vec![
        ExerciseTemplate {
            exercise_id: Uuid::new_v4(),
            plan_day_exercise_id: Uuid::new_v4(),
            target_reps: 10,
        },
        ExerciseTemplate {
            exercise_id: Uuid::new_v4(),
            plan_day_exercise_id: Uuid::new_v4(),
            target_reps: 15,
        },
    ]
}

fn tick_through(timer: &mut CircuitTimer, start: DateTime<Utc>, secs: u32) -> Vec<Event> {
    // Drive 1-second ticks the way a host interval would.
    let mut events = Vec::new();
    for s in 1..=secs {
        let Output { events: e, .. } = timer.tick(start + Duration::seconds(s as i64));
        events.extend(e);
    }
    events
}

#[test]
fn amrap_session_rounds_then_auto_complete() {
    let start = Utc::now();
    let cap = 4 * 60;
    let mut timer = CircuitTimer::new(BlockFormat::Amrap { cap_secs: Some(cap) });
    let mut session = CircuitSession::new(
        Uuid::new_v4(),
        BlockFormat::Amrap { cap_secs: Some(cap) },
        Some(3),
        template(),
    );
    timer.start_pause(start);

    // Athlete logs a round roughly every 70 seconds until the cap.
    let mut completions = 0;
    for s in 1..=cap {
        let out = timer.tick(start + Duration::seconds(s as i64));
        if s % 70 == 0 {
            session.complete_round(start + Duration::seconds(s as i64), timer.elapsed_secs(), "");
        }
        completions += out
            .events
            .iter()
            .filter(|e| matches!(e, Event::CircuitCompleted { .. }))
            .count();
    }

    assert_eq!(completions, 1);
    assert!(timer.is_completed());
    // 3 rounds logged at 70/140/210; cursor advanced past the target floor.
    assert_eq!(session.completed_rounds(), 3);
    assert_eq!(session.current_round, 4);
    assert!(session.can_complete_circuit());

    let out = session.complete_circuit(start + Duration::seconds(cap as i64));
    assert!(out.events.iter().any(|e| matches!(
        e,
        Event::CircuitSessionCompleted {
            rounds_completed: 3,
            ..
        }
    )));
}

#[test]
fn tabata_full_block_fires_fifteen_transitions() {
    let start = Utc::now();
    let mut timer = CircuitTimer::new(BlockFormat::tabata_default());
    timer.start_pause(start);
    let events = tick_through(&mut timer, start, 8 * 30 + 5);

    // 8 intervals of work+rest: a phase change at each boundary except the
    // initial work phase, then completion after the final rest.
    let phase_changes = events
        .iter()
        .filter(|e| matches!(e, Event::PhaseChanged { .. }))
        .count();
    assert_eq!(phase_changes, 15);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::CircuitCompleted { .. }))
            .count(),
        1
    );
}

#[test]
fn emom_ten_minutes_rolls_nine_times() {
    let start = Utc::now();
    let mut timer = CircuitTimer::new(BlockFormat::Emom { rounds: Some(10) });
    timer.start_pause(start);
    let events = tick_through(&mut timer, start, 10 * 60);

    let rolls = events
        .iter()
        .filter(|e| matches!(e, Event::MinuteRolled { .. }))
        .count();
    assert_eq!(rolls, 9);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::CircuitCompleted { .. }))
            .count(),
        1
    );
}

#[test]
fn for_time_block_is_explicit_to_the_end() {
    let start = Utc::now();
    let cap = 8 * 60;
    let format = BlockFormat::ForTime { cap_secs: Some(cap) };
    let mut timer = CircuitTimer::new(format);
    let mut session = CircuitSession::new(Uuid::new_v4(), format, None, template());
    timer.start_pause(start);

    // Work right through the cap.
    let events = tick_through(&mut timer, start, cap + 30);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimeCapWarning { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimeCapReached { .. })));
    assert!(!timer.is_completed());

    // Log the single effort and finish explicitly.
    session.complete_round(
        start + Duration::seconds((cap + 30) as i64),
        timer.elapsed_secs(),
        "finished over cap",
    );
    assert_eq!(session.current_round, 1);
    let out = timer.complete(start + Duration::seconds((cap + 31) as i64));
    assert_eq!(
        out.events
            .iter()
            .filter(|e| matches!(e, Event::CircuitCompleted { .. }))
            .count(),
        1
    );
    assert!(!session
        .complete_circuit(start + Duration::seconds((cap + 31) as i64))
        .is_empty());
}

#[test]
fn generic_circuit_counts_up_and_holds_at_target() {
    let start = Utc::now();
    let mut timer = CircuitTimer::new(BlockFormat::Circuit);
    let mut session =
        CircuitSession::new(Uuid::new_v4(), BlockFormat::Circuit, Some(3), template());
    timer.start_pause(start);

    for round in 1..=3u32 {
        let at = start + Duration::seconds((round * 90) as i64);
        timer.tick(at);
        let out = session.complete_round(at, timer.elapsed_secs(), "");
        assert!(!out.is_empty());
    }
    assert_eq!(session.rounds.len(), 3);
    assert_eq!(session.current_round, 3);
    assert!(session.rounds.iter().all(|r| r.is_completed));
    assert_eq!(session.rounds[2].round_time_secs, 270);
    assert_eq!(timer.display_secs(), 270);
}
