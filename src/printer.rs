//! Terminal rendering of issues and their resolution state.

use std::io::Write;

use chrono::SecondsFormat;
use termimad::MadSkin;

use crate::custom_fields::FormattedFields;
use crate::history::{NOT_RESOLVED, resolved_at, resolved_timestamp};
use crate::models::{HistoryEvent, HistoryValue, Issue};

/// Write the heading, custom fields and description of an issue.
///
/// `fields` restricts the listed custom fields; an empty slice lists every
/// decoded field. Requested fields the issue lacks print as blank values.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_issue<W: Write>(
    mut out: W,
    skin: &MadSkin,
    issue: &Issue,
    decoded: &FormattedFields,
    fields: &[String],
) -> anyhow::Result<()> {
    writeln!(out, "\x1b[1m{}\x1b[0m {}", issue.id_readable, issue.summary)?;
    if !issue.created_by.full_name.is_empty() {
        writeln!(out, "  reported by {}", issue.created_by.full_name)?;
    }
    if fields.is_empty() {
        for field in decoded {
            writeln!(out, "  {}: {}", field.name, field.value)?;
        }
    } else {
        for name in fields {
            writeln!(out, "  {name}: {}", decoded.find_or_empty(name))?;
        }
    }
    if !issue.description.is_empty() {
        skin.write_text_on(&mut out, &issue.description)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Write when the issue was last resolved, or that it never was.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_resolution<W: Write>(
    mut out: W,
    id_readable: &str,
    history: &[HistoryEvent],
) -> std::io::Result<()> {
    let millis = resolved_timestamp(history);
    if millis == NOT_RESOLVED {
        return writeln!(out, "{id_readable}: not resolved ({NOT_RESOLVED})");
    }
    match resolved_at(history) {
        Some(at) => writeln!(
            out,
            "{id_readable}: resolved at {} ({millis})",
            at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        None => writeln!(out, "{id_readable}: resolved at {millis}"),
    }
}

/// Write one line per history event, oldest first.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_history<W: Write>(mut out: W, history: &[HistoryEvent]) -> std::io::Result<()> {
    let names = |values: &[HistoryValue]| {
        values
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    for event in history {
        writeln!(
            out,
            "{} {} [{}] -> [{}] by {}",
            event.timestamp,
            event.field_name(),
            names(&event.removed),
            names(&event.added),
            event.author.login
        )?;
    }
    Ok(())
}
