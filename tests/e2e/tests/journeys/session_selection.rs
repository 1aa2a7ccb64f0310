//! Journey: choosing what a session contains

use cadence_core::{LearningState, Rating, StudyConfig};
use cadence_e2e_tests::{BatchConfig, SessionHarness, TestDataFactory};

fn limited(new_cards_limit: usize) -> StudyConfig {
    StudyConfig {
        new_cards_limit,
        ..Default::default()
    }
}

#[test]
fn test_due_items_then_new_items_in_storage_order() {
    let now = TestDataFactory::epoch();
    let scenario = TestDataFactory::create_mixed_session_scenario(now);
    let harness = SessionHarness::with_config(scenario.items, limited(2), now);

    assert_eq!(
        harness.planned_session(None),
        ["due_early", "due_mid", "due_late", "new_verb_a", "new_noun"]
    );
}

#[test]
fn test_category_filters_new_items_only() {
    let now = TestDataFactory::epoch();
    let scenario = TestDataFactory::create_mixed_session_scenario(now);
    let harness = SessionHarness::with_config(scenario.items, limited(5), now);

    assert_eq!(
        harness.planned_session(Some("verbs")),
        ["due_early", "due_mid", "due_late", "new_verb_a", "new_verb_b"]
    );
    assert_eq!(
        harness.planned_session(Some("adjectives")),
        ["due_early", "due_mid", "due_late"]
    );
}

#[test]
fn test_zero_new_limit_serves_only_due() {
    let now = TestDataFactory::epoch();
    let scenario = TestDataFactory::create_mixed_session_scenario(now);
    let harness = SessionHarness::with_config(scenario.items, limited(0), now);

    let planned = harness.planned_session(None);
    assert_eq!(planned.len(), 3);
    assert!(!planned.iter().any(|id| id == scenario.metadata["not_due"].as_str()));
}

#[test]
fn test_nothing_to_study_is_not_an_error() {
    let now = TestDataFactory::epoch();
    let future = TestDataFactory::review_item("later", now + chrono::Duration::days(4), 5.0, 5.0);
    let harness = SessionHarness::new(vec![future], now);

    let run = harness.run_session(None, &[Rating::Good]).unwrap();
    assert!(!run.started);
    assert!(run.outcomes.is_empty());
    assert!(harness.review_log().is_empty());
}

#[test]
fn test_session_runs_through_planned_order() {
    let now = TestDataFactory::epoch();
    let scenario = TestDataFactory::create_mixed_session_scenario(now);
    let harness = SessionHarness::with_config(scenario.items, limited(2), now);

    let run = harness.run_session(None, &[Rating::Good; 5]).unwrap();
    assert!(run.finished);
    assert_eq!(run.answered_ids(), run.initial_ids);
    assert_eq!(
        run.answered_ids(),
        ["due_early", "due_mid", "due_late", "new_verb_a", "new_noun"]
    );
    assert_eq!(harness.item("new_verb_b").memory.state, LearningState::New);
}

#[test]
fn test_large_batch_selection() {
    let now = TestDataFactory::epoch();
    let items = TestDataFactory::create_batch_with_config(
        BatchConfig {
            count: 100,
            reviewed_every: 5,
            ..Default::default()
        },
        now,
    );
    let harness = SessionHarness::with_config(items, limited(20), now);

    let planned = harness.planned_session(None);
    assert_eq!(planned.len(), 40);

    let mut unique = planned.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), planned.len());

    let dues: Vec<_> = planned[..20].iter().map(|id| harness.item(id).memory.due).collect();
    assert!(dues.windows(2).all(|w| w[0] <= w[1]));
    assert!(planned[20..].iter().all(|id| harness.item(id).is_new()));
}
