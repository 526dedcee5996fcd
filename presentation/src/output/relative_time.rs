//! "5 minutes ago" style timestamps

use chrono::{DateTime, Utc};

const MINUTES_IN_HOUR: i64 = 60;
const MINUTES_IN_DAY: i64 = 24 * MINUTES_IN_HOUR;
const MINUTES_IN_MONTH: i64 = 30 * MINUTES_IN_DAY;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Distance between two instants in words, without direction.
///
/// Buckets round to the nearest unit: under 45 minutes counts minutes, under
/// a day counts hours ("about 3 hours"), under 30 days counts days, then
/// months and years.
pub fn distance_in_words(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / MINUTES_IN_HOUR as f64).round() as i64;
        return format!("about {}", plural(hours.max(1), "hour"));
    }
    if minutes < 42 * MINUTES_IN_HOUR {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return plural(days, "day");
    }
    if minutes < 2 * MINUTES_IN_MONTH {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("about {}", plural(months, "month"));
    }

    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        return plural(months, "month");
    }
    let years = months / 12;
    match months % 12 {
        0..3 => format!("about {}", plural(years, "year")),
        3..9 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

/// `then` relative to `now`: "5 minutes ago", or "in 5 minutes" for the future.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let words = distance_in_words(then, now);
    if then > now {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}
