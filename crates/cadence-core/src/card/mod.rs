//! Card module - study items, review events, deck statistics
//!
//! - [`StudyItem`]: item identity + DSR memory state
//! - [`ReviewEvent`]: append-only analytics record, never read by the scheduler
//! - [`DeckStats`]: derived counts over a set of items

mod item;

pub use item::{ItemId, StudyItem};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fsrs::{LearningState, Rating, Scheduler};

// ============================================================================
// REVIEW EVENT
// ============================================================================

/// One answered review. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub card_id: ItemId,
    pub rating: Rating,
    pub reviewed_at: DateTime<Utc>,
    /// Time the learner spent on the item
    pub duration_ms: u64,
}

impl ReviewEvent {
    pub fn new(card_id: impl Into<ItemId>, rating: Rating, reviewed_at: DateTime<Utc>, duration_ms: u64) -> Self {
        Self {
            card_id: card_id.into(),
            rating,
            reviewed_at,
            duration_ms,
        }
    }
}

// ============================================================================
// DECK STATISTICS
// ============================================================================

/// Statistics about a set of study items
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    /// Total number of items
    pub total_items: usize,
    /// Never reviewed
    pub new_items: usize,
    pub learning_items: usize,
    pub review_items: usize,
    pub relearning_items: usize,
    /// Reviewed items whose due time has passed
    pub due_now: usize,
    /// Mean current retrievability of reviewed items (0.0 when none)
    pub average_retrievability: f64,
    /// Sum of lapses across all items
    pub total_lapses: u64,
    /// Earliest upcoming due time among reviewed items
    pub next_due: Option<DateTime<Utc>>,
}

impl DeckStats {
    pub fn compute(items: &[StudyItem], scheduler: &Scheduler, now: DateTime<Utc>) -> Self {
        let mut stats = DeckStats {
            total_items: items.len(),
            ..Default::default()
        };
        let mut retrievability_sum = 0.0;
        let mut reviewed = 0usize;

        for item in items {
            match item.memory.state {
                LearningState::New => stats.new_items += 1,
                LearningState::Learning => stats.learning_items += 1,
                LearningState::Review => stats.review_items += 1,
                LearningState::Relearning => stats.relearning_items += 1,
            }
            stats.total_lapses += item.memory.lapses as u64;

            if item.is_new() {
                continue;
            }
            reviewed += 1;
            retrievability_sum += scheduler.current_retrievability(&item.memory, now);

            if item.is_due(now) {
                stats.due_now += 1;
            } else if stats.next_due.is_none_or(|d| item.memory.due < d) {
                stats.next_due = Some(item.memory.due);
            }
        }

        if reviewed > 0 {
            stats.average_retrievability = retrievability_sum / reviewed as f64;
        }
        stats
    }
}
