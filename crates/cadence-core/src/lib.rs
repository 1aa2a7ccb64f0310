//! # Cadence Core
//!
//! Spaced repetition scheduling engine:
//!
//! - **DSR memory model**: closed-form Difficulty / Stability / Retrievability
//!   updates with an injectable 17-entry weight table
//! - **Session builder**: due items first (earliest due first), then a bounded
//!   number of new items
//! - **Session queue**: failed items go to the back and grow the progress
//!   denominator
//! - **Progress policy**: unlock, XP/streak and review-log signals, category
//!   health, and review triage buckets
//!
//! The core is synchronous and never reads the clock: every operation takes
//! `now` from the caller, and storage sits behind the [`CardStore`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use cadence_core::{
//!     MemoryStore, Rating, SessionStart, StudyConfig, StudyItem, StudySession,
//! };
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let store = MemoryStore::from_items(vec![StudyItem::new(None, now)]);
//! let config = StudyConfig::default();
//!
//! if let SessionStart::Ready(mut session) =
//!     StudySession::start(&store, &config, None, now).unwrap()
//! {
//!     let outcome = session.answer(Rating::Good, now, 4_000).unwrap();
//!     assert_eq!(outcome.state.reps, 1);
//!     assert!(session.is_finished());
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod config;
pub mod fsrs;
pub mod progress;
pub mod session;
pub mod storage;
pub mod study;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card types
pub use card::{DeckStats, ItemId, ReviewEvent, StudyItem};

// Memory model
pub use fsrs::{
    next_interval,
    // Core functions for advanced usage
    retrievability,
    CardMemoryState,
    InvalidStateError,
    LearningState,
    PreviewResults,
    Rating,
    Scheduler,
    SchedulerParameters,
    FSRS_WEIGHTS,
};

// Sessions
pub use session::{build_session, build_session_from_store, QueueStatus, SessionQueue};

// Progress signals
pub use progress::{ProgressPolicy, ProgressThresholds, ReviewSignal, TriageBuckets, XpTable};

// Storage boundary
pub use storage::{CardStore, MemoryStore, Result, StorageError};

// Orchestration
pub use study::{ReviewOutcome, SessionStart, SessionSummary, StudyError, StudySession};

// Configuration
pub use config::{ConfigError, StudyConfig};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CardMemoryState, CardStore, LearningState, MemoryStore, ProgressPolicy, Rating,
        ReviewSignal, Scheduler, SessionQueue, SessionStart, StudyConfig, StudyItem,
        StudySession,
    };
}
