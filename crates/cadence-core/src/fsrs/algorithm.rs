//! DSR formulas
//!
//! Closed-form Difficulty / Stability / Retrievability functions. Every function
//! here is total over its documented domain and has a `_with_weights` variant so
//! a recalibrated weight table can be injected without touching global state.

use super::scheduler::Rating;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default weight table (17 entries).
///
/// Positional contract: `w[0..4]` are the initial stabilities for
/// Again/Hard/Good/Easy and are indexed by `rating as usize - 1`. Reordering the
/// rating encoding means recalibrating this table.
pub const FSRS_WEIGHTS: [f64; 17] = [
    0.40255, // w0  initial stability (Again)
    1.18385, // w1  initial stability (Hard)
    3.173,   // w2  initial stability (Good)
    15.69105, // w3 initial stability (Easy)
    7.1949,  // w4  initial difficulty base
    0.5345,  // w5  initial difficulty exponent
    1.4604,  // w6  difficulty delta per rating step
    0.0046,  // w7  mean reversion weight
    1.54575, // w8  recall stability scale (exp)
    0.1192,  // w9  recall stability saturation
    1.01925, // w10 recall retrievability gain
    1.9395,  // w11 forget stability scale
    0.11,    // w12 forget difficulty exponent
    0.29605, // w13 forget stability exponent
    2.2698,  // w14 forget retrievability gain
    0.2315,  // w15 hard penalty
    2.9898,  // w16 easy bonus
];

/// Target probability of recall at the moment an item comes due
pub const DEFAULT_RETENTION: f64 = 0.90;

/// Exponent of the power forgetting curve
pub const DECAY: f64 = -0.5;

/// Chosen so that R(t = S) = 0.9: `0.9^(1/DECAY) - 1 = 19/81`
pub const FACTOR: f64 = 19.0 / 81.0;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Floor applied to every computed stability
pub const MIN_STABILITY: f64 = 0.1;

/// 100-year cap on stability (days)
pub const MAX_STABILITY: f64 = 36500.0;

/// Longest interval the scheduler will ever hand out (days)
pub const MAX_INTERVAL_DAYS: u32 = 36500;

// ============================================================================
// HELPERS
// ============================================================================

#[inline]
pub(crate) fn clamp_difficulty(d: f64) -> f64 {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

#[inline]
pub(crate) fn clamp_stability(s: f64) -> f64 {
    s.clamp(MIN_STABILITY, MAX_STABILITY)
}

#[inline]
fn grade(rating: Rating) -> f64 {
    rating.as_i32() as f64
}

// ============================================================================
// RETRIEVABILITY
// ============================================================================

/// Probability of recall after `elapsed_days` for an item with `stability`.
///
/// `R = (1 + FACTOR * t / S)^DECAY`. Negative elapsed time is treated as zero.
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    let t = elapsed_days.max(0.0);
    (1.0 + FACTOR * t / stability).powf(DECAY)
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty assigned on the first review.
pub fn initial_difficulty(rating: Rating) -> f64 {
    initial_difficulty_with_weights(&FSRS_WEIGHTS, rating)
}

/// `D0(G) = w4 - e^(w5 * (G - 1)) + 1`, clamped to [1, 10]
pub fn initial_difficulty_with_weights(w: &[f64; 17], rating: Rating) -> f64 {
    clamp_difficulty(w[4] - (w[5] * (grade(rating) - 1.0)).exp() + 1.0)
}

/// Difficulty after a non-first review.
pub fn next_difficulty(difficulty: f64, rating: Rating) -> f64 {
    next_difficulty_with_weights(&FSRS_WEIGHTS, difficulty, rating)
}

/// Mean reversion toward `D0(Good)`.
///
/// `D' = w7 * D0(Good) + (1 - w7) * (D - w6 * (G - 3))`, clamped to [1, 10].
/// The reversion term keeps repeated Hard ratings from pinning an item at 10.
pub fn next_difficulty_with_weights(w: &[f64; 17], difficulty: f64, rating: Rating) -> f64 {
    let anchor = initial_difficulty_with_weights(w, Rating::Good);
    let shifted = difficulty - w[6] * (grade(rating) - 3.0);
    clamp_difficulty(w[7] * anchor + (1.0 - w[7]) * shifted)
}

// ============================================================================
// STABILITY
// ============================================================================

/// Stability assigned on the first review (and on every learning step).
pub fn initial_stability(rating: Rating) -> f64 {
    initial_stability_with_weights(&FSRS_WEIGHTS, rating)
}

/// `S0(G) = max(w[G - 1], 0.1)`
pub fn initial_stability_with_weights(w: &[f64; 17], rating: Rating) -> f64 {
    let idx = (rating.as_i32() - 1) as usize;
    w[idx].max(MIN_STABILITY)
}

/// Stability after a lapse (Again while in Review).
pub fn next_forget_stability(difficulty: f64, stability: f64, retrievability: f64) -> f64 {
    next_forget_stability_with_weights(&FSRS_WEIGHTS, difficulty, stability, retrievability)
}

/// `S' = w11 * D^(-w12) * (S + 1)^w13 * e^((1 - R) * w14)`
///
/// Floored at [`MIN_STABILITY`], then capped at the prior stability: forgetting
/// never increases stability.
pub fn next_forget_stability_with_weights(
    w: &[f64; 17],
    difficulty: f64,
    stability: f64,
    retrievability: f64,
) -> f64 {
    let s = w[11]
        * difficulty.powf(-w[12])
        * (stability + 1.0).powf(w[13])
        * ((1.0 - retrievability) * w[14]).exp();
    s.max(MIN_STABILITY).min(stability)
}

/// Stability after a successful recall (Hard / Good / Easy while in Review).
pub fn next_recall_stability(
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
) -> f64 {
    next_recall_stability_with_weights(&FSRS_WEIGHTS, difficulty, stability, retrievability, rating)
}

/// `S' = S * (1 + e^w8 * (11 - D) * S^(-w9) * (e^((1 - R) * w10) - 1) * hard * easy)`
///
/// `hard = w15` for Hard, `easy = w16` for Easy, 1 otherwise. Capped at
/// [`MAX_STABILITY`].
pub fn next_recall_stability_with_weights(
    w: &[f64; 17],
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };

    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * (((1.0 - retrievability) * w[10]).exp() - 1.0)
        * hard_penalty
        * easy_bonus;

    clamp_stability(stability * (1.0 + growth))
}

// ============================================================================
// INTERVALS
// ============================================================================

/// Days until retrievability decays to `desired_retention`.
///
/// `I = round(S / FACTOR * (R^(1/DECAY) - 1))`, clamped to
/// [1, [`MAX_INTERVAL_DAYS`]]. Non-decreasing in `stability`.
pub fn next_interval(stability: f64, desired_retention: f64) -> u32 {
    let retention = if desired_retention.is_finite() {
        desired_retention.clamp(0.01, 0.99)
    } else {
        DEFAULT_RETENTION
    };
    let s = stability.max(0.0);
    let days = (s / FACTOR * (retention.powf(1.0 / DECAY) - 1.0)).round();

    if days.is_nan() || days < 1.0 {
        1
    } else if days >= MAX_INTERVAL_DAYS as f64 {
        MAX_INTERVAL_DAYS
    } else {
        days as u32
    }
}

// ============================================================================
// TESTS
// ============================================================================
