//! Progress reporting trait for the crawl loop.
//!
//! Decouples per-unit progress ticks from any rendering backend (an
//! `indicatif` bar, log-only reporting, or silence). The crawl drives these
//! as side effects only; nothing ever reads progress state back.

use std::sync::Arc;

/// Receiver for crawl progress events.
///
/// Implementations must be `Send + Sync` so one reporter can be shared
/// behind an [`Arc`].
pub trait ProgressCallback: Send + Sync {
    /// Total number of pagination units the crawl will visit.
    fn set_total(&self, total: u64);

    /// Advance by `delta` finished units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the indicator.
    fn set_message(&self, msg: String);

    /// Mark the crawl complete with a final message.
    fn finish(&self, msg: String);

    /// Mark the crawl complete and remove the indicator.
    fn finish_and_clear(&self);
}

/// A [`ProgressCallback`] that silently ignores every event.
///
/// Useful for quiet runs and tests that do not need visual progress
/// reporting.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Shared [`NullProgress`] for callers that want no reporting.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
