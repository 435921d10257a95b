//! Retry configuration and policy helpers for REST requests.

use crate::error::YtError;
use backon::ExponentialBuilder;
use reqwest::Method;
use tokio::time::Duration;

/// Configuration for retrying failed requests.
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Number of retries after the initial request.
    pub attempts: usize,
    /// Base delay for the exponential backoff.
    pub base_delay: Duration,
    /// Request timeout applied to each HTTP call.
    pub request_timeout: Duration,
    /// Whether to jitter the backoff delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::from_millis(200),
            request_timeout: Duration::from_secs(30),
            jitter: true,
        }
    }
}

/// Build an exponential backoff builder from `config`.
///
/// `request_timeout` is applied by the client, not by the backoff policy.
pub fn build_retry_builder(config: RetryConfig) -> ExponentialBuilder {
    let builder = ExponentialBuilder::default()
        .with_min_delay(config.base_delay)
        .with_max_times(config.attempts);
    if config.jitter {
        builder.with_jitter()
    } else {
        builder
    }
}

/// Whether `err` looks transient.
///
/// Transport failures, 5xx/429 statuses and empty bodies are retried, as are
/// deserialisation failures caused by HTML error pages. YouTrack error bodies
/// and other client errors are final.
pub fn should_retry(err: &YtError) -> bool {
    match err {
        YtError::RequestContext { .. } | YtError::Request(_) | YtError::EmptyResponse { .. } => {
            true
        }
        YtError::BadResponseSerde {
            status, snippet, ..
        } => is_transient_serde_error(*status, snippet),
        _ => false,
    }
}

/// Whether a failed `method` request may be sent again.
///
/// Idempotent methods follow [`should_retry`]. Other methods are retried only
/// when no connection to the server was established.
pub fn should_retry_request(method: &Method, err: &YtError) -> bool {
    if method.is_idempotent() {
        should_retry(err)
    } else {
        is_connect_failure(err)
    }
}

fn is_connect_failure(err: &YtError) -> bool {
    match err {
        YtError::Request(e) => e.is_connect(),
        YtError::RequestContext { source, .. } => source
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_connect),
        _ => false,
    }
}

fn is_transient_serde_error(status: u16, snippet: &str) -> bool {
    status >= 500 || status == 429 || snippet.trim_start().starts_with('<')
}
