//! Progress and unlock policy
//!
//! Turns a completed review into declarative signals for collaborators
//! (review log, XP/streak bookkeeping, content unlocking) and derives the
//! read-only views used by review triage. Nothing here mutates items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{ItemId, ReviewEvent, StudyItem};
use crate::fsrs::{CardMemoryState, LearningState, Rating};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// XP credited per successful rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XpTable {
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl Default for XpTable {
    fn default() -> Self {
        Self {
            hard: 5,
            good: 10,
            easy: 15,
        }
    }
}

impl XpTable {
    pub fn for_rating(&self, rating: Rating) -> u32 {
        match rating {
            Rating::Again => 0,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressThresholds {
    /// Stability (days) above which advanced mode unlocks
    pub advanced_unlock_stability: f64,
    /// Stability (days) a Review item needs to count as healthy
    pub health_stability: f64,
    /// Difficulty above which a due item is weak
    pub weak_difficulty: f64,
    /// Stability (days) at which a due Review item is strong
    pub strong_stability: f64,
    pub xp: XpTable,
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self {
            advanced_unlock_stability: 7.0,
            health_stability: 3.0,
            weak_difficulty: 7.0,
            strong_stability: 14.0,
            xp: XpTable::default(),
        }
    }
}

// ============================================================================
// SIGNALS
// ============================================================================

/// Side effect requested after a review; performed by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ReviewSignal {
    /// Stability crossed the unlock threshold for an item still locked
    UnlockAdvancedMode { item_id: ItemId },
    /// Successful recall; `streak` counts consecutive successes
    CreditSuccess { xp: u32, streak: u32 },
    /// Always emitted
    AppendReviewLog { event: ReviewEvent },
}

// ============================================================================
// TRIAGE
// ============================================================================

/// Due items grouped for review triage.
///
/// Predicates are evaluated independently: a Review item with high
/// difficulty and high stability lands in both `weak` and `strong`, and
/// Learning items land in none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageBuckets {
    /// Relearning, or difficulty above the weak threshold
    pub weak: Vec<ItemId>,
    /// Review, moderate difficulty, stability below the strong threshold
    pub medium: Vec<ItemId>,
    /// Review with stability at or above the strong threshold
    pub strong: Vec<ItemId>,
}

// ============================================================================
// POLICY
// ============================================================================

/// Stateful only in the success streak; create one per study session.
#[derive(Debug, Clone, Default)]
pub struct ProgressPolicy {
    thresholds: ProgressThresholds,
    streak: u32,
}

impl ProgressPolicy {
    pub fn new(thresholds: ProgressThresholds) -> Self {
        Self {
            thresholds,
            streak: 0,
        }
    }

    pub fn thresholds(&self) -> &ProgressThresholds {
        &self.thresholds
    }

    /// Current run of consecutive successful answers
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Signals for one completed review.
    ///
    /// `item` is the state before the review (its advanced-mode flag is read),
    /// `new_state` what the scheduler returned.
    pub fn on_review_completed(
        &mut self,
        item: &StudyItem,
        event: &ReviewEvent,
        new_state: &CardMemoryState,
    ) -> Vec<ReviewSignal> {
        let mut signals = Vec::with_capacity(3);

        if new_state.stability > self.thresholds.advanced_unlock_stability && !item.advanced_mode {
            signals.push(ReviewSignal::UnlockAdvancedMode {
                item_id: item.id.clone(),
            });
        }

        if event.rating.is_success() {
            self.streak += 1;
            signals.push(ReviewSignal::CreditSuccess {
                xp: self.thresholds.xp.for_rating(event.rating),
                streak: self.streak,
            });
        } else {
            self.streak = 0;
        }

        signals.push(ReviewSignal::AppendReviewLog {
            event: event.clone(),
        });
        signals
    }

    /// Share of reviewed items that are in Review with healthy stability.
    ///
    /// `category` restricts the population; 0.0 when nothing was reviewed.
    pub fn category_health(&self, items: &[StudyItem], category: Option<&str>) -> f64 {
        let reviewed: Vec<&StudyItem> = items
            .iter()
            .filter(|item| category.is_none_or(|c| item.in_category(c)))
            .filter(|item| !item.is_new())
            .collect();
        if reviewed.is_empty() {
            return 0.0;
        }

        let healthy = reviewed
            .iter()
            .filter(|item| {
                item.memory.state == LearningState::Review
                    && item.memory.stability > self.thresholds.health_stability
            })
            .count();
        healthy as f64 / reviewed.len() as f64
    }

    /// Bucket the items due at `now`. Order within a bucket follows `items`.
    pub fn triage_due(&self, items: &[StudyItem], now: DateTime<Utc>) -> TriageBuckets {
        let mut buckets = TriageBuckets::default();
        let t = &self.thresholds;

        for item in items.iter().filter(|item| item.is_due(now)) {
            let m = &item.memory;
            if m.state == LearningState::Relearning || m.difficulty > t.weak_difficulty {
                buckets.weak.push(item.id.clone());
            }
            if m.state == LearningState::Review
                && m.difficulty <= t.weak_difficulty
                && m.stability < t.strong_stability
            {
                buckets.medium.push(item.id.clone());
            }
            if m.state == LearningState::Review && m.stability >= t.strong_stability {
                buckets.strong.push(item.id.clone());
            }
        }
        buckets
    }
}

// ============================================================================
// TESTS
// ============================================================================
