//! Journey: failed items come back and progress accounts for them

use cadence_core::{LearningState, Rating};
use cadence_e2e_tests::{SessionHarness, TestDataFactory};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn new_items(ids: &[&str]) -> SessionHarness {
    let now = TestDataFactory::epoch();
    let items = ids
        .iter()
        .map(|id| TestDataFactory::new_item(id, None, now))
        .collect();
    SessionHarness::new(items, now)
}

#[test]
fn test_single_item_again_then_good() {
    let harness = new_items(&["only"]);
    let run = harness.run_session(None, &[Rating::Again, Rating::Good]).unwrap();

    assert!(run.outcomes[0].requeued);
    assert!(approx_eq(run.outcomes[0].progress, 0.5));
    assert!(!run.outcomes[1].requeued);
    assert!(approx_eq(run.outcomes[1].progress, 1.0));
    assert!(run.finished);

    assert_eq!(run.summary.answered, 2);
    assert_eq!(run.summary.again, 1);
    assert_eq!(run.summary.good, 1);
    assert_eq!(run.summary.requeued, 1);
    assert!(approx_eq(run.summary.progress, 1.0));
}

#[test]
fn test_failed_item_goes_to_the_back() {
    let harness = new_items(&["a", "b", "c"]);
    let run = harness
        .run_session(None, &[Rating::Again, Rating::Good, Rating::Good, Rating::Good])
        .unwrap();

    assert_eq!(run.answered_ids(), ["a", "b", "c", "a"]);
    let progress: Vec<f64> = run.outcomes.iter().map(|o| o.progress).collect();
    for (actual, expected) in progress.iter().zip([0.25, 0.5, 0.75, 1.0]) {
        assert!(approx_eq(*actual, expected), "{actual} != {expected}");
    }
}

#[test]
fn test_progress_never_decreases_across_failures() {
    let harness = new_items(&["a", "b"]);
    let ratings = [
        Rating::Again,
        Rating::Again,
        Rating::Again,
        Rating::Good,
        Rating::Good,
        Rating::Good,
    ];
    let run = harness.run_session(None, &ratings).unwrap();

    assert!(run.finished);
    assert_eq!(run.summary.requeued, 3);
    assert!(run
        .outcomes
        .windows(2)
        .all(|w| w[0].progress <= w[1].progress + 1e-12));
}

#[test]
fn test_requeued_review_is_already_persisted() {
    let harness = new_items(&["a", "b"]);
    let run = harness.run_session(None, &[Rating::Again]).unwrap();

    assert!(!run.finished);
    let stored = harness.item("a");
    assert_eq!(stored.memory.reps, 1);
    assert_eq!(stored.memory.state, LearningState::Learning);
    assert_eq!(harness.review_log().len(), 1);
}

#[test]
fn test_stopping_early_leaves_unanswered_items_untouched() {
    let harness = new_items(&["a", "b", "c"]);
    let run = harness.run_session(None, &[Rating::Easy]).unwrap();

    assert!(!run.finished);
    assert!(approx_eq(run.summary.progress, 1.0 / 3.0));
    assert!(harness.item("b").is_new());
    assert!(harness.item("c").is_new());
}
