//! Presentation layer for content-forge
//!
//! This crate contains CLI definitions, output formatters
//! and generation feedback reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter, formatter_for};
pub use output::relative_time::time_ago;
pub use progress::reporter::{PlainFeedback, SpinnerFeedback, feedback_for};
