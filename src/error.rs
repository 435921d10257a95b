//! Error types shared by the REST client, the issue facade and the CLI.
//!
//! Messages are stored as `Box<str>` so the enum stays small enough to pass
//! around by value in `Result`s.

use thiserror::Error;

/// Errors returned by library functions.
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions, reason = "exported for callers")]
pub enum YtError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request failed when running {context}: {source}")]
    RequestContext {
        context: Box<str>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid issue reference: {0}")]
    InvalidRef(Box<str>),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("bad response: {0}")]
    BadResponse(Box<str>),
    #[error("malformed response (status {status}): {message} | snippet: {snippet}")]
    BadResponseSerde {
        status: u16,
        message: Box<str>,
        snippet: Box<str>,
    },
    #[error("empty response for {operation} (status {status}) | snippet: {snippet}")]
    EmptyResponse {
        status: u16,
        operation: Box<str>,
        snippet: Box<str>,
    },
    #[error("API errors: {0}")]
    ApiErrors(Box<str>),
    #[error("io error: {0}")]
    Io(#[from] Box<std::io::Error>),
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl From<std::io::Error> for YtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Box::new(err))
    }
}

impl From<figment::Error> for YtError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string().boxed())
    }
}

impl From<ortho_config::OrthoError> for YtError {
    fn from(err: ortho_config::OrthoError) -> Self {
        Self::Config(err.to_string().boxed())
    }
}

impl From<std::sync::Arc<ortho_config::OrthoError>> for YtError {
    fn from(err: std::sync::Arc<ortho_config::OrthoError>) -> Self {
        Self::Config(err.to_string().boxed())
    }
}

/// Returned by [`crate::FormattedFields::find`] when no field carries the
/// requested name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field not found: {name}")]
pub struct FieldNotFound {
    pub name: Box<str>,
}

/// Extension trait to convert string-like types into `Box<str>` without clutter.
pub trait BoxedStr {
    /// Box this value as `Box<str>`.
    fn boxed(self) -> Box<str>;
}

impl BoxedStr for String {
    fn boxed(self) -> Box<str> {
        self.into_boxed_str()
    }
}

impl BoxedStr for &str {
    fn boxed(self) -> Box<str> {
        self.into()
    }
}
