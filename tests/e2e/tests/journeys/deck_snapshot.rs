//! Journey: progress survives a save and reload of the deck

use cadence_core::{LearningState, Rating};
use cadence_e2e_tests::{SessionHarness, TestDataFactory};

#[test]
fn test_snapshot_restores_memory_state() {
    let now = TestDataFactory::epoch();
    let items = vec![
        TestDataFactory::new_item("a", Some("verbs"), now),
        TestDataFactory::new_item("b", None, now),
    ];
    let mut harness = SessionHarness::new(items, now);
    harness.run_session(None, &[Rating::Good, Rating::Again, Rating::Good]).unwrap();
    let before = harness.items();

    let path = harness.snapshot();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"scheduledDays\""));
    assert!(raw.contains("\"lastReview\""));

    harness.restore(&path);
    let after = harness.items();
    assert_eq!(after.len(), before.len());
    for (restored, original) in after.iter().zip(&before) {
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.category, original.category);
        assert_eq!(restored.memory.state, original.memory.state);
        assert_eq!(restored.memory.reps, original.memory.reps);
        assert_eq!(restored.memory.due, original.memory.due);
        assert_eq!(restored.memory.last_review, original.memory.last_review);
        assert!((restored.memory.stability - original.memory.stability).abs() < 1e-12);
        assert!((restored.memory.difficulty - original.memory.difficulty).abs() < 1e-12);
    }
    // The log lives with the store, not the deck
    assert!(harness.review_log().is_empty());
}

#[test]
fn test_sessions_continue_after_reload() {
    let now = TestDataFactory::epoch();
    let mut harness = SessionHarness::new(vec![TestDataFactory::new_item("a", None, now)], now);
    harness.run_session(None, &[Rating::Good]).unwrap();

    let path = harness.snapshot();
    harness.restore(&path);

    let outcome = harness.review_at_due("a", Rating::Good);
    assert_eq!(outcome.previous.state, LearningState::Review);
    assert_eq!(outcome.state.reps, 2);
}

#[test]
fn test_deck_json_is_readable_by_hand() {
    let now = TestDataFactory::epoch();
    let scenario = TestDataFactory::create_scheduling_scenario(now);
    let json = serde_json::to_value(&scenario.items).unwrap();

    let first = &json[0];
    assert_eq!(first["memory"]["state"], "new");
    assert_eq!(first["advancedMode"], false);
    assert!(first.get("category").is_none());
}
