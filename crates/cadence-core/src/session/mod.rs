//! Study sessions
//!
//! - [`build_session`]: choose the bounded working set (due first, then new)
//! - [`SessionQueue`]: walk the working set, re-queueing failed items

mod builder;
mod queue;

pub use builder::{build_session, build_session_from_store};
pub use queue::{QueueStatus, SessionQueue};
