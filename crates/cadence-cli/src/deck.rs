//! Deck file handling
//!
//! A deck is a JSON array of study items. Writes go to a sibling temp file
//! first and are renamed into place. Review events are appended, one JSON
//! object per line, to `<deck stem>.reviews.jsonl` beside the deck.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use cadence_core::{ReviewEvent, StudyItem};
use directories::ProjectDirs;

/// `<platform data dir>/deck.json`
pub fn default_deck_path() -> anyhow::Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "cadence", "cli")
        .ok_or_else(|| anyhow!("Could not determine project directories"))?;
    Ok(proj_dirs.data_dir().join("deck.json"))
}

pub fn resolve_deck_path(deck: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match deck {
        Some(path) => Ok(path),
        None => default_deck_path(),
    }
}

pub fn load_deck(path: &Path) -> anyhow::Result<Vec<StudyItem>> {
    if !path.exists() {
        return Err(anyhow!(
            "No deck at {} (create one with `cadence init`)",
            path.display()
        ));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck {}", path.display()))?;
    let items: Vec<StudyItem> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse deck {}", path.display()))?;
    Ok(items)
}

pub fn save_deck(path: &Path, items: &[StudyItem]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move deck into place at {}", path.display()))?;
    Ok(())
}

/// `decks/spanish.json` -> `decks/spanish.reviews.jsonl`
pub fn review_log_path(deck: &Path) -> PathBuf {
    deck.with_extension("reviews.jsonl")
}

/// Append events to the review log beside `deck`. Returns the log path.
pub fn append_review_log(deck: &Path, events: &[ReviewEvent]) -> anyhow::Result<PathBuf> {
    let path = review_log_path(deck);
    if events.is_empty() {
        return Ok(path);
    }

    let mut lines = String::new();
    for event in events {
        lines.push_str(&serde_json::to_string(event)?);
        lines.push('\n');
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open review log {}", path.display()))?;
    file.write_all(lines.as_bytes())
        .with_context(|| format!("Failed to append to review log {}", path.display()))?;
    Ok(path)
}
