//! Study Item - the unit the learner reviews
//!
//! Each item pairs an identity and its content grouping with:
//! - DSR memory state (owned here, rewritten after every review)
//! - The advanced-mode flag maintained from progress signals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fsrs::CardMemoryState;

/// Identifier of a study item
pub type ItemId = String;

/// A learnable item together with its scheduling state
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyItem {
    /// Unique identifier (UUID v4 unless the caller supplies one)
    pub id: ItemId,
    /// Content grouping used to restrict new-item selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Whether the advanced presentation mode has been unlocked
    #[serde(default)]
    pub advanced_mode: bool,
    /// When the item was created
    pub created_at: DateTime<Utc>,
    /// DSR scheduling state
    pub memory: CardMemoryState,
}

impl StudyItem {
    /// Create a never-reviewed item with a fresh UUID
    pub fn new(category: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), category, created_at)
    }

    /// Create a never-reviewed item with a caller-owned id
    pub fn with_id(id: impl Into<ItemId>, category: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            category,
            advanced_mode: false,
            created_at,
            memory: CardMemoryState::new(created_at),
        }
    }

    /// Replace the memory state, returning the item (builder style)
    pub fn with_memory(mut self, memory: CardMemoryState) -> Self {
        self.memory = memory;
        self
    }

    pub fn is_new(&self) -> bool {
        self.memory.is_new()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.memory.is_due(now)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}
