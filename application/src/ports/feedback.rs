//! Feedback notification port
//!
//! Transient, user-visible notifications raised by use cases: a busy
//! indicator while generation runs and short success / error messages.

/// Callback for user-visible feedback
///
/// Implementations live in the presentation layer (spinner, plain lines, ...).
pub trait FeedbackNotifier: Send + Sync {
    /// Called when a generation request is about to be sent
    fn on_generation_start(&self, _prompt: &str) {}

    /// Called when the generation request finished, successfully or not
    fn on_generation_end(&self) {}

    /// An operation succeeded
    fn success(&self, message: &str);

    /// An operation failed
    fn error(&self, message: &str);
}

/// No-op notifier for when feedback is not needed
pub struct NoFeedback;

impl FeedbackNotifier for NoFeedback {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
