//! End-to-end test support for Cadence
//!
//! - `harness`: a session runner over an in-memory store with a movable clock
//! - `mocks`: item factories and pre-built scenarios

pub mod harness;

pub use harness::{SessionHarness, SessionRun};
pub use mocks::{BatchConfig, TestDataFactory, TestScenario};
