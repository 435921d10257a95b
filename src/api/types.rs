//! Types used by the REST client.

use serde::Deserialize;
use url::Url;

use crate::error::{BoxedStr, YtError};

/// A YouTrack permanent token.
#[derive(Debug, Clone, Default)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Root of the REST API, e.g. `https://example.youtrack.cloud/api/`.
///
/// Always ends with `/` so request paths resolve beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse an API root URL, appending a trailing slash when missing.
    ///
    /// # Errors
    ///
    /// Returns [`YtError::InvalidUrl`] when `input` is not an absolute URL and
    /// [`YtError::Config`] when it cannot serve as a base.
    pub fn parse(input: &str) -> Result<Self, YtError> {
        let mut url = Url::parse(input.trim())?;
        if url.cannot_be_a_base() {
            return Err(YtError::Config(
                format!("API URL {input} cannot be used as a base").boxed(),
            ));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Resolve `request` against this root.
    ///
    /// # Errors
    ///
    /// Returns [`YtError::InvalidUrl`] when the path cannot be joined.
    pub fn resolve(&self, request: &ApiRequest) -> Result<Url, YtError> {
        let mut url = self.0.join(request.path.trim_start_matches('/'))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

/// Relative path plus query parameters for one REST call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Error body YouTrack sends with 4xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub(super) error: String,
    #[serde(default)]
    pub(super) error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{ApiRequest, BaseUrl};
    use rstest::rstest;

    #[rstest]
    #[case("https://yt.example.com/api", "https://yt.example.com/api/")]
    #[case("https://yt.example.com/api/", "https://yt.example.com/api/")]
    #[case(" http://127.0.0.1:8080 ", "http://127.0.0.1:8080/")]
    fn base_url_gains_trailing_slash(#[case] input: &str, #[case] expected: &str) {
        let base = BaseUrl::parse(input).expect("parse base");
        assert_eq!(base.as_url().as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn base_url_rejects_non_base(#[case] input: &str) {
        assert!(BaseUrl::parse(input).is_err());
    }

    #[test]
    fn resolve_appends_encoded_query() {
        let base = BaseUrl::parse("https://yt.example.com/api").expect("parse base");
        let url = base
            .resolve(
                &ApiRequest::new("issues/DEMO-1/activities")
                    .param("categories", "CustomFieldCategory")
                    .param("fields", "field(id,name)"),
            )
            .expect("resolve");
        assert_eq!(url.path(), "/api/issues/DEMO-1/activities");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("categories".to_owned(), "CustomFieldCategory".to_owned()),
                ("fields".to_owned(), "field(id,name)".to_owned()),
            ]
        );
    }
}
