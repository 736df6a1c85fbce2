//! Progress notification port
//!
//! Defines the interface for reporting progress during a batch consensus run.

use triplet_domain::{ProviderResult, VerdictReport};

/// Callback for progress updates during a consensus run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called once all provider calls have been started
    fn on_dispatch_start(&self, total_providers: usize);

    /// Called as each provider finishes, in completion order
    fn on_provider_complete(&self, result: &ProviderResult);

    /// Called before the judge is invoked (not called when skipped)
    fn on_verdict_start(&self) {}

    /// Called when the verdict step resolves
    fn on_verdict_complete(&self, _report: &VerdictReport) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _total_providers: usize) {}
    fn on_provider_complete(&self, _result: &ProviderResult) {}
}
