//! Facts derived from an issue's activity history.

use chrono::{DateTime, Utc};

use crate::models::{HistoryEvent, Issue};

/// Field whose transitions mark an issue as resolved.
pub const STATE_FIELD: &str = "State";
/// State value treated as resolved.
pub const RESOLVED_STATE: &str = "Available";
/// Returned by [`resolved_timestamp`] when the issue was never resolved.
pub const NOT_RESOLVED: i64 = -1;

fn is_resolution(event: &HistoryEvent) -> bool {
    event.field_name() == STATE_FIELD
        && event
            .added
            .first()
            .is_some_and(|value| value.name == RESOLVED_STATE)
}

/// Timestamp (epoch millis) of the latest transition of `State` to
/// `Available`.
///
/// `history` must be ordered oldest-first; it is scanned from the end so a
/// reopened and re-resolved issue reports its most recent resolution.
/// Returns [`NOT_RESOLVED`] when no event qualifies.
///
/// # Examples
/// ```
/// use ytk::{HistoryEvent, HistoryField, HistoryValue, resolved_timestamp};
///
/// let event = HistoryEvent {
///     timestamp: 200,
///     field: HistoryField { name: "State".into(), ..HistoryField::default() },
///     added: vec![HistoryValue { name: "Available".into(), ..HistoryValue::default() }],
///     ..HistoryEvent::default()
/// };
/// assert_eq!(resolved_timestamp(&[event]), 200);
/// assert_eq!(resolved_timestamp(&[]), -1);
/// ```
#[must_use]
pub fn resolved_timestamp(history: &[HistoryEvent]) -> i64 {
    history
        .iter()
        .rev()
        .find(|event| is_resolution(event))
        .map_or(NOT_RESOLVED, |event| event.timestamp)
}

/// Latest resolution time as a UTC timestamp.
///
/// Returns `None` when the issue was never resolved or the recorded
/// timestamp is out of range.
#[must_use]
pub fn resolved_at(history: &[HistoryEvent]) -> Option<DateTime<Utc>> {
    match resolved_timestamp(history) {
        NOT_RESOLVED => None,
        millis => DateTime::from_timestamp_millis(millis),
    }
}

impl Issue {
    /// See [`resolved_timestamp`].
    #[must_use]
    pub fn resolved_timestamp(&self, history: &[HistoryEvent]) -> i64 {
        resolved_timestamp(history)
    }
}
