use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::CoachError;
use crate::Result;

pub(crate) fn client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CoachError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send `request` and return the JSON body of a successful response.
pub(crate) async fn send_json(request: RequestBuilder, timeout_secs: u64) -> Result<Value> {
    let resp = request
        .send()
        .await
        .map_err(|e| map_transport(e, timeout_secs))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| map_transport(e, timeout_secs))?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "coaching API error");
        return Err(CoachError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| CoachError::UnexpectedResponse(e.to_string()))
}

fn map_transport(e: reqwest::Error, timeout_secs: u64) -> CoachError {
    if e.is_timeout() {
        CoachError::Timeout(timeout_secs)
    } else {
        CoachError::Http(e.to_string())
    }
}
