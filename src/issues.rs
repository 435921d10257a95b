//! Issue retrieval and creation through the YouTrack REST API.
//!
//! These functions build the requests, hand them to [`YouTrackClient`] and
//! return the decoded structures unchanged; transport errors propagate as
//! they are. Interpretation of custom fields and history lives in
//! [`crate::custom_fields`] and [`crate::history`].

use std::io::Read;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::error;
use regex::Regex;
use url::Url;

use crate::api::{ApiRequest, YouTrackClient};
use crate::error::{BoxedStr, YtError};
use crate::models::{
    HistoryEvent, IdResult, Issue, IssueAttachment, IssueResult, NewIssue, ProjectRef,
};

/// Fields requested when listing issues.
pub const ISSUE_FIELDS: &str = "id,description,summary,idReadable,created,updated,resolved,\
reporter(fullName),updater(fullName),\
customFields(name,value(name,text,presentation,fullName,color(background,foreground)))";

/// Fields requested for each activity item.
pub const ACTIVITY_FIELDS: &str = "author(name,login),timestamp,added(name,login),\
removed(name,login),field(id,name,text)";

/// Activity category holding custom-field changes.
pub const ACTIVITY_CATEGORIES: &str = "CustomFieldCategory";

static ISSUE_ID_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-[0-9]+$"));

/// List the issues matching a YouTrack search `query`.
///
/// # Errors
///
/// Propagates any [`YtError`] from the client.
pub async fn list_issues(client: &YouTrackClient, query: &str) -> Result<Vec<Issue>, YtError> {
    let request = ApiRequest::new("issues")
        .param("fields", ISSUE_FIELDS)
        .param("query", query);
    client.get(&request).await
}

/// Fetch the custom-field activity history of an issue, oldest first.
///
/// Text-field changes are returned without their `added`/`removed` values.
///
/// # Errors
///
/// Propagates any [`YtError`] from the client.
pub async fn fetch_issue_history(
    client: &YouTrackClient,
    id_readable: &str,
) -> Result<Vec<HistoryEvent>, YtError> {
    let request = ApiRequest::new(format!("issues/{id_readable}/activities"))
        .param("categories", ACTIVITY_CATEGORIES)
        .param("fields", ACTIVITY_FIELDS);
    client.get(&request).await
}

/// Create an issue in `project_id` and return its identifiers.
///
/// # Errors
///
/// Propagates any [`YtError`] from the client.
pub async fn create_issue(
    client: &YouTrackClient,
    project_id: &str,
    summary: &str,
    description: &str,
) -> Result<IssueResult, YtError> {
    let issue = NewIssue {
        summary: summary.to_owned(),
        description: description.to_owned(),
        project: ProjectRef {
            id: project_id.to_owned(),
        },
    };
    let request = ApiRequest::new("issues").param("fields", "id,numberInProject");
    client.post(&request, &issue).await
}

/// Attach the contents of `attachment` to an issue and return the attachment id.
///
/// The bytes are sent inline as a `data:` URI.
///
/// # Errors
///
/// Returns [`YtError::Io`] if `attachment` cannot be read and propagates any
/// [`YtError`] from the client.
pub async fn create_issue_attachment(
    client: &YouTrackClient,
    issue_id: &str,
    mut attachment: impl Read,
    name: &str,
    media_type: &str,
) -> Result<String, YtError> {
    let mut data = Vec::new();
    if let Err(e) = attachment.read_to_end(&mut data) {
        error!("failed to read attachment {name}: {e}");
        return Err(e.into());
    }
    let body = IssueAttachment {
        name: name.to_owned(),
        base64_content: format!("data:{media_type};base64,{}", STANDARD.encode(&data)),
    };
    let request = ApiRequest::new(format!("issues/{issue_id}/attachments"));
    match client.post::<_, IdResult>(&request, &body).await {
        Ok(result) => Ok(result.id),
        Err(e) => {
            error!("failed to post attachment {name} to {issue_id}: {e}");
            Err(e)
        }
    }
}

/// User-facing URL of an issue, as opposed to its REST URL.
///
/// The link is built from the short project name, so it breaks if the
/// project is renamed.
///
/// # Errors
///
/// Returns [`YtError::InvalidUrl`] if the URL cannot be resolved.
pub fn issue_url(base_url: &Url, short_project: &str, number_in_project: u64) -> Result<Url, YtError> {
    Ok(base_url.join(&format!("../issue/{short_project}-{number_in_project}"))?)
}

fn is_issue_id(candidate: &str) -> bool {
    ISSUE_ID_RE
        .as_ref()
        .is_ok_and(|re| re.is_match(candidate))
}

/// Extract a readable issue id from `PROJ-12` or an issue URL such as
/// `https://example.youtrack.cloud/issue/PROJ-12/some-title`.
///
/// # Errors
///
/// Returns [`YtError::InvalidRef`] when no issue id can be found.
pub fn parse_issue_reference(input: &str) -> Result<String, YtError> {
    let input = input.trim();
    if is_issue_id(input) {
        return Ok(input.to_owned());
    }
    let invalid = || YtError::InvalidRef(input.boxed());
    let url = Url::parse(input).map_err(|_| invalid())?;
    let segments: Vec<_> = url.path_segments().ok_or_else(invalid)?.collect();
    segments
        .windows(2)
        .find_map(|pair| match pair {
            ["issue", id] if is_issue_id(id) => Some((*id).to_owned()),
            _ => None,
        })
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::{issue_url, parse_issue_reference};
    use crate::error::YtError;
    use rstest::rstest;
    use url::Url;

    #[rstest]
    #[case("https://yt.example.com/api/", "https://yt.example.com/issue/DEMO-4")]
    #[case("https://example.com/youtrack/api/", "https://example.com/youtrack/issue/DEMO-4")]
    fn issue_url_resolves_next_to_api_root(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("base url");
        let url = issue_url(&base, "DEMO", 4).expect("issue url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("DEMO-12", "DEMO-12")]
    #[case("  ab_2-7 ", "ab_2-7")]
    #[case("https://yt.example.com/issue/DEMO-12", "DEMO-12")]
    #[case("https://yt.example.com/issue/DEMO-12/crash-on-start", "DEMO-12")]
    #[case("https://example.com/youtrack/issue/OPS-1#focus=Comments", "OPS-1")]
    fn parses_issue_references(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_issue_reference(input).expect("parse"), expected);
    }

    #[rstest]
    #[case("12")]
    #[case("DEMO")]
    #[case("https://yt.example.com/issues?q=DEMO-1")]
    #[case("https://yt.example.com/issue/not-an-id")]
    fn rejects_other_references(#[case] input: &str) {
        assert!(matches!(
            parse_issue_reference(input),
            Err(YtError::InvalidRef(_))
        ));
    }
}
