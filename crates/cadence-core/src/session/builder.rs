//! Session builder
//!
//! Selection order:
//! 1. every reviewed item with `due <= now`, earliest due first (ties by id)
//! 2. up to `new_cards_limit` never-reviewed items, optionally from one
//!    category, in storage order
//!
//! No id appears twice. An empty result means there is nothing to study.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::card::{ItemId, StudyItem};
use crate::storage::{self, CardStore};

/// Build the ordered working set from an in-memory item list.
pub fn build_session(
    items: &[StudyItem],
    category: Option<&str>,
    now: DateTime<Utc>,
    new_cards_limit: usize,
) -> Vec<ItemId> {
    let mut due: Vec<&StudyItem> = items.iter().filter(|item| item.is_due(now)).collect();
    due.sort_by(|a, b| a.memory.due.cmp(&b.memory.due).then_with(|| a.id.cmp(&b.id)));

    let fresh = items
        .iter()
        .filter(|item| item.is_new())
        .filter(|item| category.is_none_or(|c| item.in_category(c)));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut session = Vec::new();

    for item in due {
        if seen.insert(item.id.as_str()) {
            session.push(item.id.clone());
        }
    }

    let mut taken = 0;
    for item in fresh {
        if taken >= new_cards_limit {
            break;
        }
        if seen.insert(item.id.as_str()) {
            session.push(item.id.clone());
            taken += 1;
        }
    }

    session
}

/// Build the working set by querying a store for due and new items.
pub fn build_session_from_store<S: CardStore + ?Sized>(
    store: &S,
    category: Option<&str>,
    now: DateTime<Utc>,
    new_cards_limit: usize,
) -> storage::Result<Vec<ItemId>> {
    let mut candidates = store.fetch_due(now)?;
    if new_cards_limit > 0 {
        candidates.extend(store.fetch_new(category, new_cards_limit)?);
    }

    let session = build_session(&candidates, category, now, new_cards_limit);
    tracing::debug!(
        candidates = candidates.len(),
        selected = session.len(),
        "Built study session"
    );
    Ok(session)
}
