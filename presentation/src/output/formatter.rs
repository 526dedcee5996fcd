//! Output formatter trait

use crate::output::console::ConsoleFormatter;
use chrono::{DateTime, Utc};
use forge_application::HistorySnapshot;
use forge_domain::{ContentRecord, OutputFormat, UserId};
use serde_json::json;

/// Trait for rendering command results
///
/// `now` anchors relative timestamps so output is reproducible.
pub trait OutputFormatter: Send + Sync {
    /// A single record (after generate / edit)
    fn record(&self, record: &ContentRecord, now: DateTime<Utc>) -> String;

    /// The full history, newest first
    fn history(&self, records: &[ContentRecord], now: DateTime<Utc>) -> String;

    /// One refresh of `watch`
    fn snapshot(&self, snapshot: &HistorySnapshot, now: DateTime<Utc>) -> String;

    /// The signed-in user, if any
    fn user(&self, user: Option<&UserId>) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Machine-readable output, one JSON document per call
pub struct JsonFormatter;

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn record(&self, record: &ContentRecord, _now: DateTime<Utc>) -> String {
        to_json(record)
    }

    fn history(&self, records: &[ContentRecord], _now: DateTime<Utc>) -> String {
        to_json(records)
    }

    fn snapshot(&self, snapshot: &HistorySnapshot, _now: DateTime<Utc>) -> String {
        // Compact so each refresh is one line
        json!({
            "trigger": snapshot.trigger,
            "records": snapshot.records,
        })
        .to_string()
    }

    fn user(&self, user: Option<&UserId>) -> String {
        to_json(&json!({ "user_id": user }))
    }
}
