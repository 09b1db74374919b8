//! Rollup host transport over the rollup HTTP server API, using reqwest.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::domain::{AppError, FinishStatus, RollupConfig, RollupRequest, encode_payload};
use crate::ports::RollupTransport;

const DEFAULT_STATUS_MESSAGE: &str = "Rollup server request failed";

/// HTTP transport for the rollup server.
///
/// This transport performs a single request per call. Retry behavior is implemented
/// by a dedicated retry wrapper adapter.
///
/// `/finish` is a long poll and carries no response timeout; `/notice` and `/report`
/// are bounded by `timeout_secs`. Connecting is bounded by `timeout_secs` on every call.
#[derive(Debug, Clone)]
pub struct HttpRollupTransport {
    server_url: Url,
    client: Client,
    request_timeout: Duration,
}

impl HttpRollupTransport {
    /// Create a new HTTP transport for the configured rollup server.
    pub fn new(config: &RollupConfig) -> Result<Self, AppError> {
        let request_timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(None::<Duration>)
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| {
                AppError::transport(format!("Failed to create HTTP client: {}", e), None)
            })?;

        Ok(Self { server_url: config.server_url.clone(), client, request_timeout })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, AppError> {
        let mut url = self.server_url.clone();
        let base = &self.server_url;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InvalidConfig(format!("server_url must be a base URL: {}", base))
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    fn post<B: Serialize>(
        &self,
        name: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<Response, AppError> {
        let url = self.endpoint(name)?;
        debug!(%url, "POST");
        let mut request = self.client.post(url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        request.send().map_err(send_error)
    }

    fn post_payload(&self, name: &str, payload: &str) -> Result<(), AppError> {
        let body = PayloadBody { payload: encode_payload(payload) };
        let response = self.post(name, &body, Some(self.request_timeout))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(status_error(status, &response.text().unwrap_or_default()))
    }
}

#[derive(Debug, Serialize)]
struct FinishBody {
    status: FinishStatus,
}

#[derive(Debug, Serialize)]
struct PayloadBody {
    payload: String,
}

fn send_error(error: reqwest::Error) -> AppError {
    let message = format!("HTTP request failed: {}", describe_chain(&error));
    if error.is_connect() {
        AppError::Connection(message)
    } else if error.is_timeout() {
        AppError::Timeout(message)
    } else {
        AppError::transport(message, None)
    }
}

fn describe_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = extract_error_message(body).unwrap_or_else(|| {
        if !body.trim().is_empty() {
            body.trim().to_string()
        } else if status.is_server_error() {
            "Server error".to_string()
        } else {
            DEFAULT_STATUS_MESSAGE.to_string()
        }
    });
    AppError::transport(message, Some(status.as_u16()))
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

impl RollupTransport for HttpRollupTransport {
    fn finish(&self, status: FinishStatus) -> Result<Option<RollupRequest>, AppError> {
        let response = self.post("finish", &FinishBody { status }, None)?;
        let code = response.status();

        if code == StatusCode::ACCEPTED {
            return Ok(None);
        }

        let body_text = response.text().unwrap_or_default();
        if !code.is_success() {
            return Err(status_error(code, &body_text));
        }

        serde_json::from_str::<RollupRequest>(&body_text)
            .map(Some)
            .map_err(|e| AppError::Protocol(format!("Failed to parse finish response: {}", e)))
    }

    fn notice(&self, payload: &str) -> Result<(), AppError> {
        self.post_payload("notice", payload)
    }

    fn report(&self, payload: &str) -> Result<(), AppError> {
        self.post_payload("report", payload)
    }
}
