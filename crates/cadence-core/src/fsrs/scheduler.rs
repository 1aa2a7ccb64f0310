//! Card memory model
//!
//! Maps (previous memory state, rating, review time) to the next memory state.
//! The scheduler owns nothing but its parameters: the clock is an argument and
//! the caller writes the returned state back.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{
    clamp_difficulty, initial_difficulty_with_weights, initial_stability_with_weights,
    next_difficulty_with_weights, next_forget_stability_with_weights, next_interval,
    next_recall_stability_with_weights, retrievability, DEFAULT_RETENTION, FSRS_WEIGHTS,
    MAX_DIFFICULTY, MAX_STABILITY, MIN_DIFFICULTY,
};

// ============================================================================
// RATING
// ============================================================================

/// Learner's self-assessed quality of a single review.
///
/// The numeric encoding (1..=4) is part of the weight-table contract: initial
/// stability is read from `w[rating - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Forgot
    Again = 1,
    /// Recalled with serious effort
    Hard = 2,
    /// Recalled
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Rating {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Anything but Again counts as a successful recall
    pub fn is_success(&self) -> bool {
        !matches!(self, Rating::Again)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i32>() {
            return Rating::from_i32(n).ok_or_else(|| format!("Rating must be between 1 and 4: {}", n));
        }
        match trimmed.to_lowercase().as_str() {
            "again" | "a" => Ok(Rating::Again),
            "hard" | "h" => Ok(Rating::Hard),
            "good" | "g" => Ok(Rating::Good),
            "easy" | "e" => Ok(Rating::Easy),
            _ => Err(format!("Unknown rating: {}", s)),
        }
    }
}

// ============================================================================
// LEARNING STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningState {
    /// Never reviewed
    #[default]
    New,
    /// Failed its first review, still in short-term steps
    Learning,
    /// Graduated; scheduled by the long-term model
    Review,
    /// Lapsed out of Review
    Relearning,
}

impl LearningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::New => "new",
            LearningState::Learning => "learning",
            LearningState::Review => "review",
            LearningState::Relearning => "relearning",
        }
    }
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CARD MEMORY STATE
// ============================================================================

/// Memory-state parameters of one learnable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMemoryState {
    pub state: LearningState,
    /// 1.0 (easy) ..= 10.0 (hard)
    pub difficulty: f64,
    /// Days until retrievability decays to 90%
    pub stability: f64,
    /// Completed reviews
    pub reps: u32,
    /// Again ratings given while in Review
    pub lapses: u32,
    /// Absent only while `reps == 0`
    pub last_review: Option<DateTime<Utc>>,
    /// Next scheduled presentation
    pub due: DateTime<Utc>,
    /// Last computed interval in days (0 until the first review)
    pub scheduled_days: u32,
}

impl CardMemoryState {
    /// A never-reviewed card, due immediately.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            state: LearningState::New,
            difficulty: 5.0,
            stability: 2.5,
            reps: 0,
            lapses: 0,
            last_review: None,
            due: created_at,
            scheduled_days: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.reps == 0
    }

    /// Reviewed at least once and due at or before `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.reps > 0 && self.due <= now
    }

    /// Check the state invariants.
    ///
    /// Calling [`Scheduler::schedule`] with a state that fails this check is a
    /// contract violation on the caller's side.
    pub fn validate(&self) -> Result<(), InvalidStateError> {
        if !self.difficulty.is_finite() || !self.stability.is_finite() {
            return Err(InvalidStateError::NonFinite);
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(InvalidStateError::DifficultyOutOfRange(self.difficulty));
        }
        if self.stability <= 0.0 || self.stability > MAX_STABILITY {
            return Err(InvalidStateError::StabilityOutOfRange(self.stability));
        }
        if self.state == LearningState::New && self.reps != 0 {
            return Err(InvalidStateError::NewWithReviews(self.reps));
        }
        if self.reps > 0 && self.last_review.is_none() {
            return Err(InvalidStateError::MissingLastReview(self.reps));
        }
        if self.reps > 0 && self.scheduled_days == 0 {
            return Err(InvalidStateError::ZeroInterval);
        }
        Ok(())
    }
}

/// An externally supplied [`CardMemoryState`] breaks an invariant
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidStateError {
    #[error("difficulty or stability is not a finite number")]
    NonFinite,
    #[error("difficulty {0} outside [1, 10]")]
    DifficultyOutOfRange(f64),
    #[error("stability {0} outside (0, 36500]")]
    StabilityOutOfRange(f64),
    #[error("state is New but reps = {0}")]
    NewWithReviews(u32),
    #[error("reps = {0} but no last review timestamp")]
    MissingLastReview(u32),
    #[error("reviewed card has a zero-day interval")]
    ZeroInterval,
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Tunable scheduler inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerParameters {
    /// DSR weight table, see [`FSRS_WEIGHTS`]
    pub weights: [f64; 17],
    /// Recall probability targeted when an item comes due
    pub desired_retention: f64,
}

impl Default for SchedulerParameters {
    fn default() -> Self {
        Self {
            weights: FSRS_WEIGHTS,
            desired_retention: DEFAULT_RETENTION,
        }
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Outcome of each rating for the same starting state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResults {
    pub again: CardMemoryState,
    pub hard: CardMemoryState,
    pub good: CardMemoryState,
    pub easy: CardMemoryState,
}

impl PreviewResults {
    pub fn for_rating(&self, rating: Rating) -> &CardMemoryState {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

/// DSR scheduler.
///
/// Holds only its parameters; cloning is cheap and there is no shared state,
/// so any number of schedulers may coexist.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    params: SchedulerParameters,
}

impl Scheduler {
    pub fn new(params: SchedulerParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &SchedulerParameters {
        &self.params
    }

    /// Fractional days since the last review (0 before the first review).
    pub fn elapsed_days(&self, state: &CardMemoryState, now: DateTime<Utc>) -> f64 {
        state
            .last_review
            .map(|last| ((now - last).num_milliseconds() as f64 / 86_400_000.0).max(0.0))
            .unwrap_or(0.0)
    }

    /// Probability the learner recalls the item at `now`. New items report 1.0.
    pub fn current_retrievability(&self, state: &CardMemoryState, now: DateTime<Utc>) -> f64 {
        if state.is_new() {
            return 1.0;
        }
        retrievability(self.elapsed_days(state, now), state.stability)
    }

    /// Apply one review.
    ///
    /// Returns the next state; the input is not modified. `reps` always
    /// increments, `last_review` becomes `now`, and `due` moves to
    /// `now + interval`.
    pub fn schedule(
        &self,
        state: &CardMemoryState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> CardMemoryState {
        debug_assert!(
            state.validate().is_ok(),
            "schedule called with invalid state: {:?}",
            state.validate()
        );

        let w = &self.params.weights;
        let mut next = state.clone();

        match state.state {
            LearningState::New => {
                next.difficulty = initial_difficulty_with_weights(w, rating);
                next.stability = initial_stability_with_weights(w, rating);
                next.state = if rating == Rating::Again {
                    LearningState::Learning
                } else {
                    LearningState::Review
                };
            }
            LearningState::Learning | LearningState::Relearning => {
                next.difficulty = next_difficulty_with_weights(w, state.difficulty, rating);
                next.stability = initial_stability_with_weights(w, rating);
                if rating != Rating::Again {
                    next.state = LearningState::Review;
                }
            }
            LearningState::Review => {
                let r = retrievability(self.elapsed_days(state, now), state.stability);
                if rating == Rating::Again {
                    next.lapses += 1;
                    next.difficulty = clamp_difficulty(state.difficulty);
                    next.stability =
                        next_forget_stability_with_weights(w, state.difficulty, state.stability, r);
                    next.state = LearningState::Relearning;
                } else {
                    let difficulty = next_difficulty_with_weights(w, state.difficulty, rating);
                    next.stability = next_recall_stability_with_weights(
                        w,
                        difficulty,
                        state.stability,
                        r,
                        rating,
                    );
                    next.difficulty = difficulty;
                }
            }
        }

        let interval = next_interval(next.stability, self.params.desired_retention);
        next.scheduled_days = interval;
        next.due = now + Duration::days(interval as i64);
        next.last_review = Some(now);
        next.reps += 1;
        next
    }

    /// What each rating would produce, without committing any of them.
    pub fn preview(&self, state: &CardMemoryState, now: DateTime<Utc>) -> PreviewResults {
        PreviewResults {
            again: self.schedule(state, Rating::Again, now),
            hard: self.schedule(state, Rating::Hard, now),
            good: self.schedule(state, Rating::Good, now),
            easy: self.schedule(state, Rating::Easy, now),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
