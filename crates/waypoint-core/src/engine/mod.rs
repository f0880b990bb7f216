//! The workflow engine: pure state transitions over a single [`Process`].
//!
//! Every function here takes the process by mutable reference plus an
//! [`EngineContext`] carrying the current time, and returns the
//! notifications the transition produced. Nothing in this module touches
//! storage or the clock, which keeps the rules deterministic under test and
//! lets the [`crate::tracker`] layer decide when a mutation is committed and
//! when notifications are dispatched.
//!
//! ```text
//! complete_step ──▶ activate dependents ──▶ settle (auto-complete or
//!                   (+ relative due dates)     ready-for-approval)
//!
//! sweep_overdue ──▶ in-progress steps past due become overdue
//!
//! activate / approve / archive ──▶ process status transitions
//! ```
//!
//! Each operation validates everything it needs before its first write, so a
//! returned error always means the process was left untouched.
//!
//! [`Process`]: crate::models::Process

pub mod activation;
pub mod editing;
pub mod lifecycle;
pub mod overdue;
pub mod validation;

#[cfg(test)]
mod tests;

use jiff::Timestamp;

pub use activation::complete_step;
pub use lifecycle::{activate, approve, archive};
pub use overdue::sweep_overdue;

/// Recipient used for administrative notifications when none is configured.
pub const DEFAULT_ADMIN_RECIPIENT: &str = "admin";

/// Ambient inputs to an engine transition.
#[derive(Debug, Clone, Copy)]
pub struct EngineContext<'a> {
    /// The instant the transition happens at
    pub now: Timestamp,
    /// Who receives administrative notifications
    pub admin_recipient: &'a str,
}

impl<'a> EngineContext<'a> {
    /// Creates a context for the given instant.
    pub fn new(now: Timestamp, admin_recipient: &'a str) -> Self {
        Self {
            now,
            admin_recipient,
        }
    }
}
