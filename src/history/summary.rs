//! History listing helpers
//!
//! Turns the raw collection into what a history view shows: newest
//! session first, a relative date label derived from the session id, and
//! a short preview of the last message. The store itself never sorts.

use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::history::types::ChatSession;

/// Maximum characters of the last message shown in a preview
pub const PREVIEW_CHARS: usize = 60;

/// One row of the history listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Session id
    pub id: String,
    /// Relative date label, e.g. `Today, 03:45 PM`
    pub label: String,
    /// Number of stored messages
    pub message_count: usize,
    /// Truncated text of the last message
    pub preview: String,
}

/// Builds listing rows for `sessions`, newest first.
///
/// Ids that parse as epoch milliseconds are ordered by that value,
/// descending. Other ids follow, ordered by the id string.
pub fn summarize<Tz>(sessions: &[ChatSession], now: &DateTime<Tz>) -> Vec<SessionSummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut sorted: Vec<&ChatSession> = sessions.iter().collect();
    sorted.sort_by(|a, b| compare_newest_first(&a.id, &b.id));

    sorted
        .into_iter()
        .map(|session| SessionSummary {
            id: session.id.clone(),
            label: format_session_date(&session.id, now),
            message_count: session.messages.len(),
            preview: session
                .last_message()
                .map(|m| preview(&m.text))
                .unwrap_or_default(),
        })
        .collect()
}

/// Formats a session id (epoch milliseconds) relative to `now`.
///
/// Whole elapsed days decide the shape: `Today, 03:45 PM`,
/// `Yesterday, 03:45 PM`, `3 days ago`, then `Mar 5, 03:45 PM` from a week
/// on. Ids in the future count as today. An id that is not a timestamp is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chatstore::history::format_session_date;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap();
/// let id = Utc.with_ymd_and_hms(2026, 3, 10, 15, 45, 0).unwrap().timestamp_millis();
/// assert_eq!(format_session_date(&id.to_string(), &now), "Today, 03:45 PM");
/// ```
pub fn format_session_date<Tz>(id: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(created) = session_timestamp(id) else {
        return id.to_string();
    };
    let created = created.with_timezone(&now.timezone());

    let elapsed_ms = now.timestamp_millis() - created.timestamp_millis();
    let days = elapsed_ms.div_euclid(24 * 60 * 60 * 1000).max(0);

    match days {
        0 => format!("Today, {}", created.format("%I:%M %p")),
        1 => format!("Yesterday, {}", created.format("%I:%M %p")),
        2..=6 => format!("{} days ago", days),
        _ => created.format("%b %-d, %I:%M %p").to_string(),
    }
}

fn session_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = id.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

fn compare_newest_first(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
