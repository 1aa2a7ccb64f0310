//! Journey: many reviews over years of simulated time

use cadence_core::fsrs::{
    DEFAULT_RETENTION, MAX_DIFFICULTY, MAX_INTERVAL_DAYS, MAX_STABILITY, MIN_DIFFICULTY,
};
use cadence_core::{retrievability, LearningState, Rating};
use cadence_e2e_tests::{SessionHarness, TestDataFactory};

fn single_item_harness() -> SessionHarness {
    let now = TestDataFactory::epoch();
    SessionHarness::new(vec![TestDataFactory::new_item("card", None, now)], now)
}

#[test]
fn test_repeated_easy_reaches_the_stability_cap() {
    let mut harness = single_item_harness();
    let mut previous = 0.0;
    let mut capped = false;

    for _ in 0..60 {
        let outcome = harness.review_at_due("card", Rating::Easy);
        let state = &outcome.state;

        // Reviewed at the due time, so every Easy grows stability until the cap
        assert!(state.stability > previous, "{} did not grow past {previous}", state.stability);
        assert!(state.stability <= MAX_STABILITY);
        assert!(state.scheduled_days >= 1 && state.scheduled_days <= MAX_INTERVAL_DAYS);
        assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&state.difficulty));
        previous = state.stability;

        if state.stability == MAX_STABILITY {
            assert_eq!(state.scheduled_days, MAX_INTERVAL_DAYS);
            capped = true;
            break;
        }
    }
    assert!(capped, "stability stalled at {previous}");
}

#[test]
fn test_intervals_target_desired_retention() {
    let mut harness = single_item_harness();

    for _ in 0..8 {
        let outcome = harness.review_at_due("card", Rating::Good);
        let state = &outcome.state;
        if state.stability >= 10.0 && state.scheduled_days < MAX_INTERVAL_DAYS {
            let r = retrievability(f64::from(state.scheduled_days), state.stability);
            assert!(
                (r - DEFAULT_RETENTION).abs() < 0.01,
                "R at due was {r} for S {}",
                state.stability
            );
        }
    }
}

#[test]
fn test_lapse_never_raises_stability() {
    let mut harness = single_item_harness();
    for rating in [Rating::Good, Rating::Good, Rating::Hard, Rating::Good] {
        harness.review_at_due("card", rating);
    }
    let before = harness.item("card").memory;
    assert_eq!(before.state, LearningState::Review);

    // Late: well past due
    harness.advance_to_due("card");
    harness.advance_days(90);
    let run = harness.run_session(None, &[Rating::Again]).unwrap();
    let lapse = &run.outcomes[0].state;

    assert_eq!(lapse.state, LearningState::Relearning);
    assert_eq!(lapse.lapses, before.lapses + 1);
    assert!(lapse.stability <= before.stability);
    assert!(lapse.stability >= 0.1);
}

#[test]
fn test_difficulty_drifts_with_ratings() {
    let mut easy = single_item_harness();
    let mut hard = single_item_harness();
    for _ in 0..6 {
        easy.review_at_due("card", Rating::Easy);
        hard.review_at_due("card", Rating::Hard);
    }
    let easy_d = easy.item("card").memory.difficulty;
    let hard_d = hard.item("card").memory.difficulty;
    assert!(easy_d < hard_d);
    assert!(hard.item("card").memory.stability < easy.item("card").memory.stability);
}
