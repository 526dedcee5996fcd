//! Structured configuration issues.
//!
//! The config loader reports problems as a list of [`ConfigIssue`]s rather
//! than failing on the first one, so the CLI can show all of them at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A required value is empty or absent.
    MissingValue { field: String },
    /// A URL that does not start with `http://` or `https://`.
    InvalidUrl { field: String, value: String },
    /// A numeric value outside its accepted range.
    OutOfRange { field: String, value: u64 },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check that `value` looks like an HTTP(S) URL, recording an issue if not.
pub fn check_http_url(field: &str, value: &str, issues: &mut Vec<ConfigIssue>) {
    if value.trim().is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::MissingValue {
                field: field.to_string(),
            },
            format!("{field}: value is required"),
        ));
    } else if !(value.starts_with("http://") || value.starts_with("https://")) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::InvalidUrl {
                field: field.to_string(),
                value: value.to_string(),
            },
            format!("{field}: '{value}' is not an http(s) URL"),
        ));
    }
}
