//! Command execution helpers for `ytk`.
//!
//! This module owns the runtime flow for each subcommand: token resolution,
//! client setup and rendering output to the terminal.

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use log::{error, info, warn};
use termimad::MadSkin;
use ytk::error::BoxedStr;
use ytk::printer::{write_history, write_issue, write_resolution};
use ytk::{
    AttachArgs, CreateArgs, GlobalArgs, HistoryArgs, Issue, IssuesArgs, RetryConfig,
    YouTrackClient, YtError, create_issue, create_issue_attachment, fetch_issue_history,
    list_issues, parse_issue_reference,
};

use crate::auth::resolve_token;

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Create a [`YouTrackClient`], falling back to no transcript on failure.
fn build_client(global: &GlobalArgs) -> Result<YouTrackClient, YtError> {
    let base_url = global.base_url.as_deref().ok_or_else(|| {
        YtError::Config("no YouTrack URL; pass --base-url or set YTK_BASE_URL".boxed())
    })?;
    let token = resolve_token(global);
    if token.is_empty() {
        warn!("YouTrack token not set, using anonymous API access");
    }
    let defaults = RetryConfig::default();
    let retry = RetryConfig {
        request_timeout: global
            .http_timeout
            .map_or(defaults.request_timeout, Duration::from_secs),
        ..defaults
    };
    match YouTrackClient::with_retry(token.as_str(), base_url, global.transcript.clone(), retry) {
        Err(YtError::Io(e)) if global.transcript.is_some() => {
            warn!("failed to create transcript: {e}");
            YouTrackClient::with_retry(token.as_str(), base_url, None, retry)
        }
        other => other,
    }
}

fn caused_by_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|c| {
        c.downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::BrokenPipe)
    })
}

/// Write `issue` to stdout, returning `true` once stdout has gone away.
fn print_issue(skin: &MadSkin, issue: &Issue, fields: &[String]) -> bool {
    let decoded = issue.formatted_fields();
    if let Err(e) = write_issue(std::io::stdout().lock(), skin, issue, &decoded, fields) {
        if caused_by_broken_pipe(&e) {
            return true;
        }
        error!("error printing issue {}: {e}", issue.id_readable);
    }
    false
}

fn print_line(line: &str) {
    if let Err(e) = writeln!(std::io::stdout().lock(), "{line}") {
        if e.kind() != ErrorKind::BrokenPipe {
            error!("error writing output: {e}");
        }
    }
}

pub async fn run_issues(args: IssuesArgs, global: &GlobalArgs) -> Result<(), YtError> {
    let query = args
        .query
        .as_deref()
        .ok_or_else(|| YtError::Config("missing search query".boxed()))?;
    let client = build_client(global)?;
    let issues = list_issues(&client, query).await?;
    if issues.is_empty() {
        print_line("No matching issues.");
        return Ok(());
    }
    let skin = MadSkin::default();
    for issue in &issues {
        if print_issue(&skin, issue, &args.fields) {
            return Ok(());
        }
    }
    Ok(())
}

pub async fn run_history(args: HistoryArgs, global: &GlobalArgs) -> Result<(), YtError> {
    let reference = args
        .issue
        .as_deref()
        .ok_or_else(|| YtError::InvalidRef("".boxed()))?;
    let id_readable = parse_issue_reference(reference)?;
    let client = build_client(global)?;
    let history = fetch_issue_history(&client, &id_readable).await?;
    let mut out = std::io::stdout().lock();
    let written = write_history(&mut out, &history)
        .and_then(|()| write_resolution(&mut out, &id_readable, &history));
    if let Err(e) = written {
        if e.kind() != ErrorKind::BrokenPipe {
            error!("error printing history: {e}");
        }
    }
    Ok(())
}

pub async fn run_create(args: CreateArgs, global: &GlobalArgs) -> Result<(), YtError> {
    let project = args
        .project
        .as_deref()
        .ok_or_else(|| YtError::Config("missing --project".boxed()))?;
    let summary = args
        .summary
        .as_deref()
        .ok_or_else(|| YtError::Config("missing --summary".boxed()))?;
    let client = build_client(global)?;
    let created = create_issue(
        &client,
        project,
        summary,
        args.description.as_deref().unwrap_or_default(),
    )
    .await?;
    info!("created issue {} in project {project}", created.id);
    print_line(&format!(
        "Created issue {} (number {} in project {project})",
        created.id, created.number_in_project
    ));
    Ok(())
}

pub async fn run_attach(args: AttachArgs, global: &GlobalArgs) -> Result<(), YtError> {
    let reference = args
        .issue
        .as_deref()
        .ok_or_else(|| YtError::InvalidRef("".boxed()))?;
    let issue_id = parse_issue_reference(reference)?;
    let path = args
        .file
        .as_deref()
        .ok_or_else(|| YtError::Config("missing attachment file".boxed()))?;
    let name = attachment_name(path);
    let media_type = args.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);
    let file = std::fs::File::open(path)?;
    let client = build_client(global)?;
    let id = create_issue_attachment(&client, &issue_id, file, &name, media_type).await?;
    print_line(&format!("Attached {name} to {issue_id} as {id}"));
    Ok(())
}

fn attachment_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
