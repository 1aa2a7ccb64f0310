//! In-memory card store
//!
//! Items are kept in insertion order, which is the "storage order" new items
//! are served in.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{CardStore, Result, StorageError};
use crate::card::{ReviewEvent, StudyItem};
use crate::fsrs::CardMemoryState;

#[derive(Debug, Default)]
struct Inner {
    items: Vec<StudyItem>,
    log: Vec<ReviewEvent>,
}

/// Mutex-guarded item list plus append-only review log.
///
/// All methods take `&self`, so a store can be shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing items, keeping their order
    pub fn from_items(items: Vec<StudyItem>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items,
                log: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Insert or replace an item (replacement keeps the original position)
    pub fn insert(&self, item: StudyItem) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => inner.items.push(item),
        }
        Ok(())
    }

    /// Snapshot of every item in storage order
    pub fn all_items(&self) -> Result<Vec<StudyItem>> {
        Ok(self.lock()?.items.clone())
    }

    /// Snapshot of the review log, oldest first
    pub fn review_log(&self) -> Result<Vec<ReviewEvent>> {
        Ok(self.lock()?.log.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.items.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Consume the store, returning items in storage order
    pub fn into_items(self) -> Result<Vec<StudyItem>> {
        self.inner
            .into_inner()
            .map(|inner| inner.items)
            .map_err(|_| StorageError::LockPoisoned)
    }
}

impl CardStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<StudyItem>> {
        Ok(self.lock()?.items.iter().find(|item| item.id == id).cloned())
    }

    fn fetch_due(&self, now: DateTime<Utc>) -> Result<Vec<StudyItem>> {
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|item| item.is_due(now))
            .cloned()
            .collect())
    }

    fn fetch_new(&self, category: Option<&str>, limit: usize) -> Result<Vec<StudyItem>> {
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|item| item.is_new())
            .filter(|item| category.is_none_or(|c| item.in_category(c)))
            .take(limit)
            .cloned()
            .collect())
    }

    fn persist(&self, id: &str, state: &CardMemoryState) -> Result<()> {
        let mut inner = self.lock()?;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        item.memory = state.clone();
        Ok(())
    }

    fn append_log(&self, event: ReviewEvent) -> Result<()> {
        self.lock()?.log.push(event);
        Ok(())
    }

    fn set_advanced_mode(&self, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        item.advanced_mode = true;
        Ok(())
    }
}
