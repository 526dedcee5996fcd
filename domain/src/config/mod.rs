//! Configuration value objects shared by the config loader and the CLI.

mod output_format;
pub mod validation;

pub use output_format::OutputFormat;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
