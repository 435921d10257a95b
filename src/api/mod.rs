//! REST client for the YouTrack API.
//!
//! [`YouTrackClient`] offers `get` and `post` over JSON. It attaches the bearer
//! token, retries transient failures with exponential backoff and can record
//! every exchange to a transcript file for troubleshooting.

mod helpers;
mod retry;
mod transcript;
mod types;

use backon::Retryable;
use log::warn;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use url::Url;

use crate::error::{BoxedStr, YtError};

use self::helpers::{BODY_SNIPPET_LEN, api_error, build_headers, payload_snippet, snippet};

pub use self::retry::{RetryConfig, build_retry_builder, should_retry, should_retry_request};
pub use self::types::{ApiRequest, BaseUrl, Token};

#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

/// Client for the YouTrack REST API.
pub struct YouTrackClient {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: BaseUrl,
    transcript: Option<std::sync::Mutex<std::io::BufWriter<std::fs::File>>>,
    retry: RetryConfig,
}

impl YouTrackClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The optional `transcript` path records each request and response.
    ///
    /// # Errors
    ///
    /// Returns a [`YtError`] if the URL is invalid, the transcript file cannot
    /// be opened or the authorization header cannot be constructed.
    pub fn new(
        token: impl Into<Token>,
        base_url: &str,
        transcript: Option<std::path::PathBuf>,
    ) -> Result<Self, YtError> {
        Self::with_retry(token, base_url, transcript, RetryConfig::default())
    }

    /// Create a client with custom retry settings.
    ///
    /// # Errors
    ///
    /// See [`YouTrackClient::new`].
    pub fn with_retry(
        token: impl Into<Token>,
        base_url: &str,
        transcript: Option<std::path::PathBuf>,
        retry: RetryConfig,
    ) -> Result<Self, YtError> {
        let base_url = BaseUrl::parse(base_url)?;
        let transcript = transcript
            .map(|p| {
                std::fs::File::create(p)
                    .map(|file| std::sync::Mutex::new(std::io::BufWriter::new(file)))
            })
            .transpose()?;
        let headers = build_headers(&token.into())?;
        Ok(Self {
            client: reqwest::Client::new(),
            headers,
            base_url,
            transcript,
            retry,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Fetch `request` and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns a [`YtError`] if the request fails after retries, the service
    /// reports an error or the body cannot be decoded as `T`.
    pub async fn get<T>(&self, request: &ApiRequest) -> Result<T, YtError>
    where
        T: DeserializeOwned,
    {
        let url = self.base_url.resolve(request)?;
        self.send_with_retry(Method::GET, &url, None).await
    }

    /// Post `body` as JSON to `request` and decode the JSON reply.
    ///
    /// The request is repeated only when the connection could not be
    /// established; any reply from the server is final.
    ///
    /// # Errors
    ///
    /// As for [`YouTrackClient::get`]; also fails if `body` cannot be
    /// serialised.
    pub async fn post<B, T>(&self, request: &ApiRequest, body: &B) -> Result<T, YtError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base_url.resolve(request)?;
        let payload = serde_json::to_value(body).map_err(|e| {
            YtError::BadResponse(format!("serialising request body: {e}").boxed())
        })?;
        self.send_with_retry(Method::POST, &url, Some(&payload)).await
    }

    async fn send_with_retry<T>(
        &self,
        method: Method,
        url: &Url,
        payload: Option<&Value>,
    ) -> Result<T, YtError>
    where
        T: DeserializeOwned,
    {
        let operation = format!("{method} {}", url.path());
        let builder = build_retry_builder(self.retry);
        (|| async {
            let resp = self
                .execute_single_request(method.clone(), url, payload, &operation)
                .await?;
            Self::process_response::<T>(&resp, &operation)
        })
        .retry(builder)
        .sleep(sleep)
        .when(|err: &YtError| should_retry_request(&method, err))
        .notify(|err: &YtError, dur| warn!("retrying {operation} after {dur:?}: {err}"))
        .await
    }

    /// Execute one HTTP request and return the status code and body.
    ///
    /// # Errors
    ///
    /// Returns [`YtError::RequestContext`] for transport failures and
    /// retryable statuses, [`YtError::ApiErrors`] for YouTrack error bodies and
    /// [`YtError::BadResponse`] for any other unsuccessful status.
    async fn execute_single_request(
        &self,
        method: Method,
        url: &Url,
        payload: Option<&Value>,
        operation: &str,
    ) -> Result<HttpResponse, YtError> {
        let make_ctx = |status: Option<u16>| {
            let base = match payload {
                Some(p) => format!("{operation}; {}", payload_snippet(p)),
                None => operation.to_owned(),
            };
            match status {
                Some(s) => format!("{base}; status {s}"),
                None => base,
            }
            .boxed()
        };

        let mut builder = self
            .client
            .request(method, url.clone())
            .headers(self.headers.clone())
            .timeout(self.retry.request_timeout);
        if let Some(p) = payload {
            builder = builder.json(p);
        }
        let response = builder.send().await.map_err(|e| YtError::RequestContext {
            context: make_ctx(None),
            source: e.into(),
        })?;
        let status = response.status().as_u16();
        let status_err = response.error_for_status_ref().err();
        let body = response.text().await.map_err(|e| YtError::RequestContext {
            context: make_ctx(Some(status)),
            source: e.into(),
        })?;
        let resp = HttpResponse { status, body };
        self.log_transcript(operation, payload, &resp);
        if (200..300).contains(&status) {
            return Ok(resp);
        }
        if status >= 500 || status == 429 {
            let source: Box<dyn std::error::Error + Send + Sync> = match status_err {
                Some(e) => Box::new(e),
                None => Box::new(std::io::Error::other(format!("unexpected status {status}"))),
            };
            return Err(YtError::RequestContext {
                context: format!(
                    "HTTP status {status} | body snippet: {}",
                    snippet(&resp.body, BODY_SNIPPET_LEN)
                )
                .boxed(),
                source,
            });
        }
        Err(api_error(&resp.body).unwrap_or_else(|| {
            YtError::BadResponse(
                format!(
                    "{operation} returned HTTP status {status} | body snippet: {}",
                    snippet(&resp.body, BODY_SNIPPET_LEN)
                )
                .boxed(),
            )
        }))
    }

    /// Decode a successful response body.
    ///
    /// # Errors
    ///
    /// Returns [`YtError::EmptyResponse`] for a blank body and
    /// [`YtError::BadResponseSerde`] naming the failing JSON path otherwise.
    fn process_response<T>(resp: &HttpResponse, operation: &str) -> Result<T, YtError>
    where
        T: DeserializeOwned,
    {
        let body = resp.body.trim();
        if body.is_empty() {
            return Err(YtError::EmptyResponse {
                status: resp.status,
                operation: operation.boxed(),
                snippet: "".boxed(),
            });
        }
        let de = &mut serde_json::Deserializer::from_str(body);
        serde_path_to_error::deserialize::<_, T>(de).map_err(|e| {
            let path = e.path().to_string();
            let inner = e.into_inner();
            YtError::BadResponseSerde {
                status: resp.status,
                message: format!("{inner} at {path}").boxed(),
                snippet: snippet(body, BODY_SNIPPET_LEN).boxed(),
            }
        })
    }

    /// User-facing URL of an issue; see [`crate::issue_url`].
    ///
    /// # Errors
    ///
    /// Returns [`YtError::InvalidUrl`] if the URL cannot be built.
    pub fn issue_url(&self, short_project: &str, number_in_project: u64) -> Result<Url, YtError> {
        crate::issues::issue_url(self.base_url.as_url(), short_project, number_in_project)
    }
}
