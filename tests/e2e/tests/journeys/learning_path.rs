//! Journey: one item from first sight through a lapse and back
//!
//! New -> Review -> Review -> Relearning -> Review, one session per visit.

use cadence_core::{LearningState, Rating, FSRS_WEIGHTS};
use cadence_e2e_tests::{SessionHarness, TestDataFactory};
use chrono::Duration;

fn single_item_harness() -> SessionHarness {
    let now = TestDataFactory::epoch();
    SessionHarness::new(vec![TestDataFactory::new_item("card", None, now)], now)
}

#[test]
fn test_good_good_again_good_walks_every_state() {
    let mut harness = single_item_harness();

    let first = harness.run_session(None, &[Rating::Good]).unwrap();
    assert!(first.started && first.finished);
    assert_eq!(first.outcomes[0].previous.state, LearningState::New);
    assert_eq!(first.outcomes[0].state.state, LearningState::Review);

    // Nothing is due until the scheduled interval has passed
    assert!(!harness.run_session(None, &[Rating::Good]).unwrap().started);

    let second = harness.review_at_due("card", Rating::Good);
    assert_eq!(second.state.state, LearningState::Review);
    assert!(second.state.stability > second.previous.stability);

    harness.advance_to_due("card");
    let third = harness.run_session(None, &[Rating::Again, Rating::Good]).unwrap();
    let states: Vec<_> = third.outcomes.iter().map(|o| o.state.state).collect();
    assert_eq!(states, [LearningState::Relearning, LearningState::Review]);
    assert!(third.finished);
    assert_eq!(third.summary.requeued, 1);
    assert!(third.outcomes[0].state.stability <= second.state.stability);

    let card = harness.item("card");
    assert_eq!(card.memory.state, LearningState::Review);
    assert_eq!(card.memory.reps, 4);
    assert_eq!(card.memory.lapses, 1);
    assert_eq!(card.memory.last_review, Some(harness.now()));
    assert_eq!(
        card.memory.due,
        harness.now() + Duration::days(i64::from(card.memory.scheduled_days))
    );
    card.memory.validate().unwrap();

    let ratings: Vec<_> = harness.review_log().iter().map(|e| e.rating).collect();
    assert_eq!(ratings, [Rating::Good, Rating::Good, Rating::Again, Rating::Good]);
}

#[test]
fn test_first_rating_sets_initial_memory() {
    for (index, rating) in [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy]
        .into_iter()
        .enumerate()
    {
        let harness = single_item_harness();
        let run = harness.run_session(None, &[rating]).unwrap();
        let outcome = run.outcomes.last().unwrap();

        assert!((outcome.state.stability - FSRS_WEIGHTS[index]).abs() < 1e-9);
        assert_eq!(outcome.state.reps, 1);
        assert_eq!(outcome.state.lapses, 0);
        assert!(outcome.state.scheduled_days >= 1);

        let expected = if rating == Rating::Again {
            LearningState::Learning
        } else {
            LearningState::Review
        };
        assert_eq!(outcome.state.state, expected);
    }
}

#[test]
fn test_harder_first_ratings_start_harder() {
    let difficulty_after = |rating| {
        let harness = single_item_harness();
        harness.run_session(None, &[rating]).unwrap().outcomes[0].state.difficulty
    };
    let again = difficulty_after(Rating::Again);
    let hard = difficulty_after(Rating::Hard);
    let good = difficulty_after(Rating::Good);
    let easy = difficulty_after(Rating::Easy);
    assert!(again > hard && hard > good && good > easy);
}

#[test]
fn test_learning_item_graduates_on_success() {
    let mut harness = single_item_harness();
    harness.run_session(None, &[Rating::Again, Rating::Hard]).unwrap();

    let card = harness.item("card");
    assert_eq!(card.memory.state, LearningState::Review);
    assert_eq!(card.memory.reps, 2);
    // Lapses only count failures from Review
    assert_eq!(card.memory.lapses, 0);
}
