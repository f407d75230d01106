//! Progress reporting for self-test runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use relay_application::SelfTestProgress;
use relay_domain::DispatchOutcome;
use std::sync::{Mutex, PoisonError};

/// Reports self-test progress with a progress bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn case_label(name: &str, outcome: DispatchOutcome, passed: bool) -> String {
        if passed {
            format!("{} {}", "v".green(), name)
        } else {
            format!("{} {} ({})", "x".red(), name, outcome)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTestProgress for ProgressReporter {
    fn on_start(&self, total_cases: usize) {
        let pb = ProgressBar::new(total_cases as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Self-test");
        pb.set_message("Starting...");

        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_case_complete(&self, name: &str, outcome: DispatchOutcome, passed: bool) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            if !passed {
                pb.println(Self::case_label(name, outcome, passed));
            }
            pb.set_message(Self::case_label(name, outcome, passed));
            pb.inc(1);
        }
    }

    fn on_finish(&self, passed: usize, failed: usize) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let summary = format!("{} passed, {} failed", passed, failed);
            if failed == 0 {
                pb.finish_with_message(summary.green().to_string());
            } else {
                pb.finish_with_message(summary.red().to_string());
            }
        }
    }
}

/// Simple line-per-case progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl SelfTestProgress for SimpleProgress {
    fn on_start(&self, total_cases: usize) {
        eprintln!("{} {} ({} cases)", "->".cyan(), "Self-test".bold(), total_cases);
    }

    fn on_case_complete(&self, name: &str, outcome: DispatchOutcome, passed: bool) {
        eprintln!("  {}", ProgressReporter::case_label(name, outcome, passed));
    }

    fn on_finish(&self, _passed: usize, _failed: usize) {
        eprintln!();
    }
}
