//! Study session orchestration
//!
//! Wires the pieces together for one sitting:
//! store → session builder → queue → scheduler → progress policy → store.
//!
//! The new card state is persisted before the queue advances, so a failed
//! write leaves the session exactly where it was and the same answer can be
//! retried. Log and unlock writes happen after that and are best effort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::card::{ItemId, ReviewEvent, StudyItem};
use crate::config::StudyConfig;
use crate::fsrs::{CardMemoryState, InvalidStateError, Rating, Scheduler};
use crate::progress::{ProgressPolicy, ReviewSignal};
use crate::session::{build_session_from_store, SessionQueue};
use crate::storage::{CardStore, StorageError};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Fetch or persist failed
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Answer submitted after the queue emptied
    #[error("Session already finished")]
    Finished,
    /// A queued id is no longer in the store
    #[error("Queued item missing from store: {0}")]
    MissingItem(ItemId),
    /// The stored state breaks the memory model's invariants
    #[error("Item {id} has invalid memory state: {source}")]
    InvalidState {
        id: ItemId,
        #[source]
        source: InvalidStateError,
    },
}

// ============================================================================
// RESULTS
// ============================================================================

/// Result of [`StudySession::start`]
pub enum SessionStart<'a, S: CardStore + ?Sized> {
    Ready(StudySession<'a, S>),
    /// Nothing due and no new items: a valid terminal state, not an error
    EmptySession,
}

/// What happened when one answer was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub item_id: ItemId,
    pub rating: Rating,
    pub previous: CardMemoryState,
    pub state: CardMemoryState,
    pub signals: Vec<ReviewSignal>,
    /// The item went back into the queue
    pub requeued: bool,
    pub progress: f64,
    /// Follow-up writes (log append, unlock) that failed after the state was saved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_errors: Vec<String>,
}

/// Running totals for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub started_at: Option<DateTime<Utc>>,
    /// Items selected at session start
    pub initial_items: usize,
    pub answered: usize,
    pub again: usize,
    pub hard: usize,
    pub good: usize,
    pub easy: usize,
    pub requeued: usize,
    pub unlocked: usize,
    pub xp_earned: u64,
    pub best_streak: u32,
    pub total_duration_ms: u64,
    pub progress: f64,
}

// ============================================================================
// STUDY SESSION
// ============================================================================

pub struct StudySession<'a, S: CardStore + ?Sized> {
    store: &'a S,
    scheduler: Scheduler,
    policy: ProgressPolicy,
    queue: SessionQueue,
    summary: SessionSummary,
}

impl<'a, S: CardStore + ?Sized> StudySession<'a, S> {
    /// Select the working set and open a session.
    pub fn start(
        store: &'a S,
        config: &StudyConfig,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionStart<'a, S>, StudyError> {
        let ids = build_session_from_store(store, category, now, config.new_cards_limit)?;
        if ids.is_empty() {
            info!(category = ?category, "Nothing to review");
            return Ok(SessionStart::EmptySession);
        }

        info!(items = ids.len(), category = ?category, "Study session started");
        let summary = SessionSummary {
            started_at: Some(now),
            initial_items: ids.len(),
            ..Default::default()
        };

        Ok(SessionStart::Ready(Self {
            store,
            scheduler: Scheduler::new(config.scheduler_parameters()),
            policy: ProgressPolicy::new(config.progress_thresholds()),
            queue: SessionQueue::new(ids),
            summary,
        }))
    }

    pub fn current_id(&self) -> Option<&ItemId> {
        self.queue.current()
    }

    /// The item at the front of the queue, read fresh from the store
    pub fn current(&self) -> Result<Option<StudyItem>, StudyError> {
        match self.queue.current() {
            Some(id) => self
                .store
                .get(id)?
                .map(Some)
                .ok_or_else(|| StudyError::MissingItem(id.clone())),
            None => Ok(None),
        }
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn progress(&self) -> f64 {
        self.queue.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_finished()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = self.summary.clone();
        summary.progress = self.queue.progress();
        summary.requeued = self.queue.requeued();
        summary
    }

    /// Record the learner's rating for the current item.
    pub fn answer(
        &mut self,
        rating: Rating,
        now: DateTime<Utc>,
        duration_ms: u64,
    ) -> Result<ReviewOutcome, StudyError> {
        let id = self.queue.current().cloned().ok_or(StudyError::Finished)?;
        let item = self
            .store
            .get(&id)?
            .ok_or_else(|| StudyError::MissingItem(id.clone()))?;
        item.memory
            .validate()
            .map_err(|source| StudyError::InvalidState {
                id: id.clone(),
                source,
            })?;

        let state = self.scheduler.schedule(&item.memory, rating, now);
        self.store.persist(&id, &state)?;
        self.queue.submit(rating);

        let event = ReviewEvent::new(id.clone(), rating, now, duration_ms);
        let signals = self.policy.on_review_completed(&item, &event, &state);
        let follow_up_errors = self.apply_signals(&signals);
        self.record(rating, duration_ms);

        let requeued = rating == Rating::Again;
        debug!(
            item = %id,
            rating = %rating,
            from = %item.memory.state,
            to = %state.state,
            stability = state.stability,
            difficulty = state.difficulty,
            interval_days = state.scheduled_days,
            requeued,
            "Review recorded"
        );

        if self.queue.is_finished() {
            info!(
                answered = self.summary.answered,
                requeued = self.queue.requeued(),
                xp = self.summary.xp_earned,
                "Study session finished"
            );
        }

        Ok(ReviewOutcome {
            item_id: id,
            rating,
            previous: item.memory,
            state,
            signals,
            requeued,
            progress: self.queue.progress(),
            follow_up_errors,
        })
    }

    fn apply_signals(&mut self, signals: &[ReviewSignal]) -> Vec<String> {
        let mut errors = Vec::new();
        for signal in signals {
            match signal {
                ReviewSignal::AppendReviewLog { event } => {
                    if let Err(e) = self.store.append_log(event.clone()) {
                        warn!("Failed to append review log for {}: {}", event.card_id, e);
                        errors.push(format!("append_log: {}", e));
                    }
                }
                ReviewSignal::UnlockAdvancedMode { item_id } => {
                    match self.store.set_advanced_mode(item_id) {
                        Ok(()) => {
                            self.summary.unlocked += 1;
                            info!(item = %item_id, "Advanced mode unlocked");
                        }
                        Err(e) => {
                            warn!("Failed to unlock advanced mode for {}: {}", item_id, e);
                            errors.push(format!("set_advanced_mode: {}", e));
                        }
                    }
                }
                ReviewSignal::CreditSuccess { xp, streak } => {
                    self.summary.xp_earned += *xp as u64;
                    self.summary.best_streak = self.summary.best_streak.max(*streak);
                }
            }
        }
        errors
    }

    fn record(&mut self, rating: Rating, duration_ms: u64) {
        self.summary.answered += 1;
        self.summary.total_duration_ms += duration_ms;
        match rating {
            Rating::Again => self.summary.again += 1,
            Rating::Hard => self.summary.hard += 1,
            Rating::Good => self.summary.good += 1,
            Rating::Easy => self.summary.easy += 1,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
