//! Test utilities for standing in for a YouTrack server.
//!
//! The server buffers each request body, hands the request to a shared
//! handler and records it for later assertions.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::io::ErrorKind;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Shared handler type invoked for each buffered request.
pub type Handler = Arc<Mutex<Box<dyn FnMut(&Request<Bytes>) -> Response<Full<Bytes>> + Send>>>;

/// A request as the server saw it.
#[allow(dead_code, reason = "fields are read only in some tests")]
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    /// First value of query parameter `key`.
    #[allow(dead_code, reason = "used only in some tests")]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Requests received so far, oldest first.
pub type Recorder = Arc<Mutex<Vec<Recorded>>>;

/// The first request received.
///
/// # Panics
///
/// Panics if no request has arrived.
#[allow(dead_code, reason = "used only in some tests")]
pub fn first_request(recorder: &Recorder) -> Recorded {
    recorder
        .lock()
        .expect("lock recorder")
        .first()
        .cloned()
        .expect("at least one request")
}

/// Handle returned by [`start_mitm`] for shutting down the server.
pub struct ShutdownHandle {
    join: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl ShutdownHandle {
    /// Signal the server to stop and await shutdown.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

/// Build a JSON response with the given status.
///
/// # Panics
///
/// Panics if the response cannot be constructed.
pub fn json_response(status: u16, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::from_u16(status).expect("valid status"))
        .header("Content-Type", "application/json")
        .body(Full::new(body.into()))
        .expect("build response")
}

/// Handler answering every request with the same JSON reply.
pub fn respond<B>(
    status: u16,
    body: B,
) -> Box<dyn FnMut(&Request<Bytes>) -> Response<Full<Bytes>> + Send>
where
    B: Into<Bytes> + Clone + Send + 'static,
{
    Box::new(move |_req: &Request<Bytes>| json_response(status, body.clone()))
}

fn record(req: &Request<Bytes>) -> Recorded {
    let query = req
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    Recorded {
        method: req.method().to_string(),
        path: req.uri().path().to_owned(),
        query,
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: req.body().clone(),
    }
}

/// Start an HTTP server forwarding requests to a shared handler.
///
/// # Errors
///
/// Returns an error if the server fails to bind to a local port.
///
/// # Panics
///
/// Panics if the default response cannot be constructed.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
pub async fn start_mitm() -> Result<(SocketAddr, Handler, Recorder, ShutdownHandle), std::io::Error>
{
    let handler: Handler = Arc::new(Mutex::new(respond(404, "No handler")));
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let (handler_srv, recorder_srv) = (handler.clone(), recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, mut rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                res = listener.accept() => match res {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        let h = handler_srv.clone();
                        let r = recorder_srv.clone();
                        let service = service_fn(move |req: Request<Incoming>| {
                            let h = h.clone();
                            let r = r.clone();
                            async move {
                                let (parts, body) = req.into_parts();
                                let bytes = body
                                    .collect()
                                    .await
                                    .map(http_body_util::Collected::to_bytes)
                                    .unwrap_or_default();
                                let req = Request::from_parts(parts, bytes);
                                r.lock().expect("lock recorder").push(record(&req));
                                let resp = {
                                    let mut f = h.lock().expect("lock handler in service");
                                    (f)(&req)
                                };
                                Ok::<_, std::convert::Infallible>(resp)
                            }
                        });
                        tokio::spawn(async move {
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("accept error: {e}");
                        match e.kind() {
                            ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                            | ErrorKind::Interrupted
                            | ErrorKind::WouldBlock => {}
                            _ => break,
                        }
                    }
                },
                _ = &mut rx => break,
            }
        }
    });

    Ok((addr, handler, recorder, ShutdownHandle { join, stop: tx }))
}
