//! Console output formatter for content history

use crate::output::formatter::OutputFormatter;
use crate::output::relative_time::time_ago;
use chrono::{DateTime, Utc};
use colored::Colorize;
use forge_application::HistorySnapshot;
use forge_domain::{ChangeKind, ContentRecord, UserId};

/// Shown when the history is empty
pub const EMPTY_HISTORY: &str =
    "No content generated yet. Try generating some content with `content-forge generate`!";

/// Formats records for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn ANSI colors on or off for everything this crate prints
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Format one record as a block
    pub fn format_record(record: &ContentRecord, now: DateTime<Utc>) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            format!("#{}", record.id).yellow().bold(),
            time_ago(record.created_at, now).dimmed()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Prompt:".cyan().bold(),
            record.prompt
        ));
        output.push_str(&format!("{}\n", "Generated Content:".cyan().bold()));
        output.push_str(&Self::indent(&record.generated_content, "  "));
        output.push('\n');

        output
    }

    /// Format the whole history
    pub fn format_history(records: &[ContentRecord], now: DateTime<Utc>) -> String {
        let mut output = String::new();

        let title = format!("Content History ({} items)", records.len());
        output.push_str(&Self::header(&title));
        output.push('\n');

        if records.is_empty() {
            output.push_str(&format!("\n{}\n", EMPTY_HISTORY.dimmed()));
            return output;
        }

        for record in records {
            output.push('\n');
            output.push_str(&Self::format_record(record, now));
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn change_banner(kind: ChangeKind) -> String {
        let text = match kind {
            ChangeKind::Inserted => "New content added",
            ChangeKind::Updated => "Content updated",
            ChangeKind::Deleted => "Content deleted",
        };
        format!("{} {}", "*".green(), text.green())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn record(&self, record: &ContentRecord, now: DateTime<Utc>) -> String {
        Self::format_record(record, now)
    }

    fn history(&self, records: &[ContentRecord], now: DateTime<Utc>) -> String {
        Self::format_history(records, now)
    }

    fn snapshot(&self, snapshot: &HistorySnapshot, now: DateTime<Utc>) -> String {
        match &snapshot.trigger {
            Some(change) => format!(
                "\n{} (#{})\n{}",
                Self::change_banner(change.kind),
                change.id,
                Self::format_history(&snapshot.records, now)
            ),
            None => Self::format_history(&snapshot.records, now),
        }
    }

    fn user(&self, user: Option<&UserId>) -> String {
        match user {
            Some(user) => format!("Signed in as {}", user.as_str().bold()),
            None => "Not signed in".dimmed().to_string(),
        }
    }
}
