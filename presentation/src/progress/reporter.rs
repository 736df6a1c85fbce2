//! Progress reporting for consensus runs
//!
//! Progress goes to stderr so stdout carries only the result.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use triplet_application::ProgressNotifier;
use triplet_domain::{ProviderResult, VerdictReport};

/// Reports progress with an indicatif bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn status(result: &ProviderResult) -> String {
        let name = result.provider_id().display_name();
        if result.is_error() {
            format!("{} {}", "x".red(), name)
        } else {
            format!("{} {} ({:.2}s)", "v".green(), name, result.elapsed_seconds())
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch_start(&self, total_providers: usize) {
        let pb = ProgressBar::with_draw_target(
            Some(total_providers as u64),
            ProgressDrawTarget::stderr(),
        );
        pb.set_style(Self::style());
        pb.set_prefix("Asking providers");
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_provider_complete(&self, result: &ProviderResult) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::status(result));
            pb.inc(1);
        }
    }

    fn on_verdict_start(&self) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_prefix("Judging");
            pb.set_message("waiting for the verdict...");
        }
    }

    fn on_verdict_complete(&self, _report: &VerdictReport) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_dispatch_start(&self, total_providers: usize) {
        eprintln!(
            "{} {} ({} providers)",
            "->".cyan(),
            "Asking providers".bold(),
            total_providers
        );
    }

    fn on_provider_complete(&self, result: &ProviderResult) {
        eprintln!("  {}", ProgressReporter::status(result));
    }

    fn on_verdict_start(&self) {
        eprintln!("{} {}", "->".cyan(), "Judging".bold());
    }
}
