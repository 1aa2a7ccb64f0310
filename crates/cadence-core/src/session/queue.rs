//! Session queue
//!
//! Front of the queue is the item being shown. Answering removes it; an Again
//! answer appends it to the back and grows the progress denominator by one.
//! Failed items are not deduplicated and there is no cap on re-queues, so a
//! card failed many times in a row keeps pushing the denominator up.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::card::ItemId;
use crate::fsrs::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// An item is waiting to be answered
    Active,
    /// Nothing left to show
    Finished,
}

/// Ordered working set for one study session.
///
/// Owned by a single session; not meant to be shared.
#[derive(Debug, Clone, Default)]
pub struct SessionQueue {
    items: VecDeque<ItemId>,
    total: usize,
    answered: usize,
    requeued: usize,
}

impl SessionQueue {
    pub fn new(items: Vec<ItemId>) -> Self {
        let total = items.len();
        Self {
            items: items.into(),
            total,
            answered: 0,
            requeued: 0,
        }
    }

    /// The item to show next
    pub fn current(&self) -> Option<&ItemId> {
        self.items.front()
    }

    pub fn status(&self) -> QueueStatus {
        if self.items.is_empty() {
            QueueStatus::Finished
        } else {
            QueueStatus::Active
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status() == QueueStatus::Finished
    }

    /// Presentations still pending, re-queued copies included
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Progress denominator
    pub fn total(&self) -> usize {
        self.total
    }

    /// Answers recorded so far
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Times an item was sent to the back after Again
    pub fn requeued(&self) -> usize {
        self.requeued
    }

    /// `(total - remaining) / total`, or 1.0 for an empty session
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.items.len()) as f64 / self.total as f64
    }

    /// Record the answer for the current item.
    ///
    /// Returns the id that was answered, or `None` when the queue is finished.
    pub fn submit(&mut self, rating: Rating) -> Option<ItemId> {
        let id = self.items.pop_front()?;
        self.answered += 1;
        if rating == Rating::Again {
            self.items.push_back(id.clone());
            self.total += 1;
            self.requeued += 1;
        }
        Some(id)
    }

    /// Pending ids, front first
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }
}
