//! Data-access layer for the YouTrack issue tracker.
//!
//! Decodes the polymorphic custom fields attached to issues, scans issue
//! history for the moment an issue became resolved and offers a small REST
//! facade for listing, creating and annotating issues.

pub mod api;
pub mod cli_args;
pub mod config;
pub mod custom_fields;
pub mod environment;
pub mod error;
pub mod history;
pub mod issues;
pub mod models;
pub mod printer;

pub use api::{ApiRequest, RetryConfig, YouTrackClient};
pub use cli_args::{AttachArgs, CreateArgs, GlobalArgs, HistoryArgs, IssuesArgs};
pub use custom_fields::{
    DiagnosticSink, FieldKind, FormattedField, FormattedFields, LogSink, NullSink,
    decode_custom_fields,
};
pub use error::{FieldNotFound, YtError};
pub use history::{NOT_RESOLVED, resolved_at, resolved_timestamp};
pub use issues::{
    create_issue, create_issue_attachment, fetch_issue_history, issue_url, list_issues,
    parse_issue_reference,
};
pub use models::{
    HistoryEvent, HistoryField, HistoryValue, IdResult, Issue, IssueAttachment, IssueResult,
    NewIssue, ProjectRef, RawCustomField, Reporter,
};
