//! Storage Module
//!
//! The boundary between the scheduling core and whatever persists cards:
//! - [`CardStore`]: the read/write contract collaborators implement
//! - [`MemoryStore`]: in-process implementation used by the CLI and tests

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::card::{ReviewEvent, StudyItem};
use crate::fsrs::CardMemoryState;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type (fetch or persist failures)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Backend-specific failure reported by an implementation
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Read/write contract the scheduling core relies on.
///
/// Methods take `&self`; implementations provide their own interior
/// mutability. Each write is expected to succeed or fail atomically per item,
/// and the core never retries.
pub trait CardStore {
    /// Look up a single item
    fn get(&self, id: &str) -> Result<Option<StudyItem>>;

    /// Items with `reps > 0` and `due <= now`, in any order
    fn fetch_due(&self, now: DateTime<Utc>) -> Result<Vec<StudyItem>>;

    /// Up to `limit` never-reviewed items in storage order, optionally
    /// restricted to one category
    fn fetch_new(&self, category: Option<&str>, limit: usize) -> Result<Vec<StudyItem>>;

    /// Write back the state returned by the scheduler
    fn persist(&self, id: &str, state: &CardMemoryState) -> Result<()>;

    /// Append to the review log
    fn append_log(&self, event: ReviewEvent) -> Result<()>;

    /// Record that the advanced presentation mode is unlocked for an item
    fn set_advanced_mode(&self, id: &str) -> Result<()>;
}
