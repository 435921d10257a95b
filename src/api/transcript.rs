//! Transcript logging for REST exchanges.

use log::warn;
use serde_json::{Value, json};

use super::helpers::{BODY_SNIPPET_LEN, redact_sensitive, snippet};
use super::{HttpResponse, YouTrackClient};

impl YouTrackClient {
    /// Append one JSON line describing the exchange, if a transcript is open.
    pub(super) fn log_transcript(
        &self,
        operation: &str,
        payload: Option<&Value>,
        resp: &HttpResponse,
    ) {
        let Some(t) = &self.transcript else {
            return;
        };
        let request = payload.map(|p| {
            let mut redacted = p.clone();
            redact_sensitive(&mut redacted);
            redacted
        });
        let line = json!({
            "operation": operation,
            "status": resp.status,
            "request": request,
            "response": snippet(&resp.body, BODY_SNIPPET_LEN)
        });
        use std::io::Write as _;
        match t.lock() {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{line}") {
                    warn!("failed to write transcript for {operation}: {e}");
                    return;
                }
                if let Err(e) = f.flush() {
                    warn!("failed to flush transcript for {operation}: {e}");
                }
            }
            Err(e) => warn!("failed to lock transcript for {operation}: {e}"),
        }
    }
}
