//! Test harness


pub use session_harness::{SessionHarness, SessionRun};
