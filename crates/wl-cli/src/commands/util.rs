//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use regex::Regex;
use wl_core::TaskEvent;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());

/// Pre-compiled regex for `title:minutes` meeting arguments.
static MEETING_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+?)\s*:\s*(\d+)\s*$").unwrap());

/// Conservative bound for relative dates (~100 years).
const MAX_RELATIVE_DAYS: i64 = 100 * 366;

/// Longest meeting accepted on the command line (one day).
const MAX_MEETING_MINUTES: i64 = 24 * 60;

/// Today's date in `timezone`.
pub fn today_in(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

/// Parse a date string relative to `today`.
///
/// Supports:
/// - ISO 8601 date: "2026-01-15"
/// - "today", "yesterday"
/// - Relative: "1 day ago", "3 days ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - TimeDelta::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15), 'today', 'yesterday' or 'N days ago'"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {n} days");
    }
    Ok(today - TimeDelta::days(n))
}

/// Parse a `title:minutes` meeting argument.
pub fn parse_meeting(s: &str) -> Result<TaskEvent, String> {
    let caps = MEETING_ARG_RE
        .captures(s)
        .ok_or_else(|| format!("could not parse '{s}', expected \"title:minutes\""))?;
    let minutes: i64 = caps[2]
        .parse()
        .map_err(|_| format!("invalid minutes in '{s}'"))?;
    if minutes > MAX_MEETING_MINUTES {
        return Err(format!("meeting '{s}' is longer than a day"));
    }
    Ok(TaskEvent::meeting(&caps[1], TimeDelta::minutes(minutes)))
}

/// Formats a duration as "Xh Ym" if >= 1 hour, "Xm" otherwise.
/// Negative durations are shown as 0m.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 0 {
        return "0m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
