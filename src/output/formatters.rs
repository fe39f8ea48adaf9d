//! Reusable formatting utilities for CLI output
//!
//! Formatting for dates and timestamps as the backend sends them (ISO 8601
//! strings, sometimes date-only).

use chrono::{DateTime, Local, NaiveDate};

/// Parse a backend date into a calendar date in local time.
///
/// Accepts full RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Format a due date as `YYYY-MM-DD`.
///
/// Returns "--" when absent; unparseable values are shown as sent.
pub fn format_date(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => "--".to_string(),
        Some(v) => parse_date(v)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.to_string()),
    }
}

/// Format an ISO timestamp to local date/time.
///
/// Returns "N/A" if absent or invalid.
///
/// # Example output
/// `01/15/2025 14:30`
pub fn format_timestamp_local(value: Option<&str>) -> String {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|dt| dt.with_timezone(&Local).format("%m/%d/%Y %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// A task is overdue when it is not completed and its due date is before `today`.
pub fn is_overdue(due_date: Option<&str>, status: Option<&str>, today: NaiveDate) -> bool {
    if status.is_some_and(|s| s.eq_ignore_ascii_case("completed")) {
        return false;
    }
    due_date
        .and_then(parse_date)
        .is_some_and(|due| due < today)
}
