//! Shared HTTP client and fetch primitive.
//!
//! Classifies failures the way the pipeline needs them: a non-200 status is a
//! skippable "no data" outcome for one field, while a transport-level failure
//! (connect, TLS, timeout) is fatal for the whole run.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::budget::FetchBudget;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Broad class of a transport failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

/// Transport-level failure — connection reset, TLS handshake, request timeout.
#[derive(Debug)]
pub struct TransportError {
    pub kind: TransportKind,
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TransportKind::Timeout => write!(f, "transport timeout: {}", self.message),
            TransportKind::Connect => write!(f, "connect failure: {}", self.message),
            TransportKind::Other => write!(f, "transport error: {}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

impl TransportError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportKind::Timeout
        } else if e.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

/// Build the pooled HTTP client shared by every task in a run.
///
/// `default_headers` carries the full session header set including the
/// cookie string read once at startup. `request_timeout` bounds the whole
/// round trip; exceeding it surfaces as a `Timeout` transport error.
pub fn build_client(
    default_headers: HeaderMap,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .default_headers(default_headers)
        .timeout(request_timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(8)
        .build()
}

/// One HTTP GET under the fetch budget.
///
/// Returns `Ok(Some(body))` for HTTP 200, `Ok(None)` for any other status
/// (logged, skippable), and `Err` for a transport failure. The budget
/// permits are released when the request completes, whatever the outcome.
pub async fn fetch_text(
    client: &Client,
    budget: &FetchBudget,
    url: &str,
    label: Option<&str>,
) -> Result<Option<String>, TransportError> {
    match label {
        Some(label) => log::info!("fetching {url} for {label}"),
        None => log::info!("fetching {url}"),
    }

    let _permit = budget.acquire().await;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TransportError::from_reqwest(&e))?;

    let status = response.status();
    log::debug!("{url}: HTTP {status}");
    if status != StatusCode::OK {
        log::warn!("fetch of {url} failed with status {status}");
        return Ok(None);
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::from_reqwest(&e))?;
    Ok(Some(body))
}
