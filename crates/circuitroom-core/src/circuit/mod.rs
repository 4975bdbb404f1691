mod rounds;
mod timer;

pub use rounds::{CircuitExerciseLog, CircuitRound, CircuitSession, ExerciseTemplate};
pub use timer::{
    BlockFormat, CircuitTimer, DEFAULT_TABATA_INTERVALS, DEFAULT_TABATA_REST_SECS,
    DEFAULT_TABATA_WORK_SECS,
};
