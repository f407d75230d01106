//! Progress notification port
//!
//! Defines the interface for reporting progress during a self-test run.

use relay_domain::DispatchOutcome;

/// Callback for progress updates during a self-test
///
/// Implementations live in the presentation layer (e.g. an indicatif bar).
/// Callbacks may arrive from several tasks at once.
pub trait SelfTestProgress: Send + Sync {
    /// Called once before any case is dispatched
    fn on_start(&self, total_cases: usize);

    /// Called when a case finishes, in completion order
    fn on_case_complete(&self, name: &str, outcome: DispatchOutcome, passed: bool);

    fn on_finish(&self, passed: usize, failed: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SelfTestProgress for NoProgress {
    fn on_start(&self, _total_cases: usize) {}
    fn on_case_complete(&self, _name: &str, _outcome: DispatchOutcome, _passed: bool) {}
    fn on_finish(&self, _passed: usize, _failed: usize) {}
}
