//! Scenario trait implemented by iteration bodies

use std::future::Future;

use crate::VirtualUser;

/// How an iteration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Every applicable step ran
    Completed,
    /// A required step failed and the remaining steps were skipped
    Aborted,
}

/// The body each virtual user repeats
///
/// Implementations hold no per-iteration state; anything an iteration derives
/// lives in locals of [`iteration`](Scenario::iteration), and per-VU state
/// (RNG, counters) lives in [`VirtualUser`].
pub trait Scenario: Send + Sync + 'static {
    /// Scenario name for logs
    fn name(&self) -> &str;

    /// Run one iteration
    fn iteration(&self, vu: &mut VirtualUser) -> impl Future<Output = IterationOutcome> + Send;
}
