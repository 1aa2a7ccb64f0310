//! DSR (Difficulty, Stability, Retrievability) memory model
//!
//! Free Spaced Repetition Scheduler style model with a fixed 17-entry weight
//! table and a 90% target retention.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core Formulas:
//! - Retrievability: R = (1 + 19/81 * t / S)^(-0.5)
//! - Interval: t = S / (19/81) * (R_target^(-2) - 1)
//! - Lapse stability never exceeds the stability it replaces
//! - Difficulty mean-reverts toward the initial "Good" difficulty

mod algorithm;
mod scheduler;

pub use algorithm::{
    initial_difficulty,
    initial_difficulty_with_weights,
    initial_stability,
    initial_stability_with_weights,
    next_difficulty,
    next_difficulty_with_weights,
    next_forget_stability,
    next_forget_stability_with_weights,
    next_interval,
    next_recall_stability,
    next_recall_stability_with_weights,
    // Core functions
    retrievability,
    DECAY,
    DEFAULT_RETENTION,
    FACTOR,
    // Constants
    FSRS_WEIGHTS,
    MAX_DIFFICULTY,
    MAX_INTERVAL_DAYS,
    MAX_STABILITY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

pub use scheduler::{
    CardMemoryState, InvalidStateError, LearningState, PreviewResults, Rating, Scheduler,
    SchedulerParameters,
};
