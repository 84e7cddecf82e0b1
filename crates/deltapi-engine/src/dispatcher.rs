//! Dual-client dispatcher
//!
//! Sends one action to a server and turns whatever happens into an
//! [`ActionResult`]. Transport and decoding failures never escape: they become
//! a result with no status code and an error envelope as content.

use crate::client::{ClientError, HttpClient, HttpResponse};
use deltapi_core::{Action, ActionResult, ErrorEnvelope, ErrorKind, Value, Verb};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Dispatch `action` to `client` and time the call
///
/// The clock starts right before the request and stops once the response body
/// has been fully received (or the call failed). Decoding happens afterwards.
pub async fn dispatch(client: &dyn HttpClient, action: &Action) -> ActionResult {
    trace!(client = client.name(), %action, "Dispatching");

    let started = Instant::now();
    let outcome = send(client, action).await;
    let duration = started.elapsed();

    match outcome {
        Ok(response) => match decode(&response.body) {
            Ok(content) => {
                debug!(
                    client = client.name(),
                    %action,
                    status = response.status,
                    elapsed_ms = duration.as_millis() as u64,
                    "Call completed"
                );
                ActionResult::new(duration, response.status, content)
            }
            Err(e) => {
                warn!(client = client.name(), %action, error = %e, "Response is not valid JSON");
                ActionResult::failed(
                    duration,
                    ErrorEnvelope::new(ErrorKind::Deserialization, e.to_string())
                        .with_response(response.status, response.body),
                )
            }
        },
        Err(e) => {
            warn!(client = client.name(), %action, error = %e, "Call failed");
            ActionResult::failed(duration, ErrorEnvelope::new(e.kind(), e.to_string()))
        }
    }
}

/// Dispatch `action` to A, then to B once A's call has fully completed
pub async fn dispatch_pair(
    client_a: &dyn HttpClient,
    client_b: &dyn HttpClient,
    action: &Action,
) -> (ActionResult, ActionResult) {
    let result_a = dispatch(client_a, action).await;
    let result_b = dispatch(client_b, action).await;
    (result_a, result_b)
}

async fn send(client: &dyn HttpClient, action: &Action) -> Result<HttpResponse, ClientError> {
    let url = action.url();
    let body = || action.body().unwrap_or_default().to_string();

    match action.verb() {
        Verb::Get => client.get(url).await,
        Verb::Put => client.put(url, body()).await,
        Verb::Post => client.post(url, body()).await,
        Verb::Delete => client.delete(url).await,
        Verb::Patch => client.patch(url, body()).await,
    }
}

/// Decode a response body; an empty body has no content
fn decode(body: &str) -> Result<Option<Value>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some)
}
