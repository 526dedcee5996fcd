//! Feedback reporting for generation and history commands
//!
//! Notifications go to stderr so stdout only carries command results.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use forge_application::ports::feedback::FeedbackNotifier;
use forge_domain::util::preview;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(80);

fn success_line(message: &str) -> String {
    format!("{} {}", "v".green(), message.green())
}

fn error_line(message: &str) -> String {
    format!("{} {}", "x".red(), message.red())
}

/// Reports feedback with a spinner while the webhook is working
pub struct SpinnerFeedback {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerFeedback {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for SpinnerFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackNotifier for SpinnerFeedback {
    fn on_generation_start(&self, prompt: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Generating...");
        pb.set_message(preview(prompt, 50));
        pb.enable_steady_tick(SPINNER_TICK);

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_generation_end(&self) {
        self.finish_spinner();
    }

    fn success(&self, message: &str) {
        self.finish_spinner();
        eprintln!("{}", success_line(message));
    }

    fn error(&self, message: &str) {
        self.finish_spinner();
        eprintln!("{}", error_line(message));
    }
}

/// Simple text-based feedback (no spinner)
pub struct PlainFeedback;

impl FeedbackNotifier for PlainFeedback {
    fn on_generation_start(&self, prompt: &str) {
        eprintln!(
            "{} {}\n{}",
            "->".cyan(),
            "Generating...".bold(),
            ConsoleFormatter::indent(&preview(prompt, 200), "   ").dimmed()
        );
    }

    fn success(&self, message: &str) {
        eprintln!("{}", success_line(message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", error_line(message));
    }
}

/// Spinner unless `quiet`
pub fn feedback_for(quiet: bool) -> Box<dyn FeedbackNotifier> {
    if quiet {
        Box::new(PlainFeedback)
    } else {
        Box::new(SpinnerFeedback::new())
    }
}
