use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RedactConfig;
use crate::errors::{FailureKind, RedactError, RedactResult, RedactionFailure, RequestOutcome};
use crate::types::{RedactionRequest, RedactionResponse};

/// Header identifying this client to the redaction service
pub const CLIENT_HEADER: &str = "x-redact-client";
/// Per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Pause before retrying a refused connection
pub const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Anything that can turn text into redacted text.
///
/// The coordinator only depends on this seam, so tests and alternative
/// transports can stand in for [`RedactionClient`].
#[async_trait]
pub trait Redactor: Send + Sync {
    async fn redact(&self, text: &str) -> RequestOutcome;
}

/// Async client for the `/redact` endpoint
#[derive(Debug, Clone)]
pub struct RedactionClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
    connect_retries: u32,
}

impl RedactionClient {
    /// Create a new client from configuration
    pub fn new(config: &RedactConfig) -> RedactResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| RedactError::ClientError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            timeout: config.timeout(),
            connect_retries: config.connect_retries(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Redact `text`, resolving every failure into the returned outcome
    pub async fn redact(&self, text: &str) -> RequestOutcome {
        if text.trim().is_empty() {
            return Err(RedactionFailure::invalid_input());
        }

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let request = RedactionRequest::new(text);

        let outcome = match tokio::time::timeout(self.timeout, self.send(&request, request_id)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(RedactionFailure::new(
                FailureKind::NetworkTimeout,
                format!("request timed out after {} ms", self.timeout.as_millis()),
            )),
        };

        log_outcome(&request_id, started, &outcome);
        outcome
    }

    /// Start a redaction in the background and hand the outcome to `on_complete`.
    ///
    /// `on_complete` runs exactly once, on a tokio worker, with exactly one
    /// outcome. Must be called from within a tokio runtime.
    pub fn redact_with<F>(&self, text: impl Into<String>, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let client = self.clone();
        let text = text.into();
        tokio::spawn(async move {
            let outcome = client.redact(&text).await;
            on_complete(outcome);
        })
    }

    async fn send(&self, request: &RedactionRequest, request_id: Uuid) -> RequestOutcome {
        let mut attempt = 0;
        loop {
            debug!(%request_id, attempt, endpoint = %self.endpoint, "Sending redaction request");

            let result = self
                .client
                .post(&self.endpoint)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .json(request)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(http_failure(status));
                    }
                    return parse_body(response.text().await);
                }
                Err(e) if should_retry(&e, attempt, self.connect_retries) => {
                    warn!(%request_id, attempt, error = %e, "Connection failed, retrying in {:?}", RETRY_DELAY);
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(e) => return Err(RedactionFailure::from_transport(&e)),
            }
        }
    }
}

#[async_trait]
impl Redactor for RedactionClient {
    async fn redact(&self, text: &str) -> RequestOutcome {
        RedactionClient::redact(self, text).await
    }
}

/// Blocking client with the same semantics as [`RedactionClient`].
///
/// Meant for diagnostics and other call sites that are not driving the
/// keyboard. It must not be used from inside an async context.
#[derive(Debug, Clone)]
pub struct BlockingRedactionClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    connect_retries: u32,
}

impl BlockingRedactionClient {
    pub fn new(config: &RedactConfig) -> RedactResult<Self> {
        config.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| RedactError::ClientError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            connect_retries: config.connect_retries(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn redact(&self, text: &str) -> RequestOutcome {
        if text.trim().is_empty() {
            return Err(RedactionFailure::invalid_input());
        }

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let request = RedactionRequest::new(text);

        let mut attempt = 0;
        let outcome = loop {
            debug!(%request_id, attempt, endpoint = %self.endpoint, "Sending redaction request");

            let result = self
                .client
                .post(&self.endpoint)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .json(&request)
                .send();

            match result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        break Err(http_failure(status));
                    }
                    break parse_body(response.text());
                }
                Err(e) if should_retry(&e, attempt, self.connect_retries) => {
                    warn!(%request_id, attempt, error = %e, "Connection failed, retrying in {:?}", RETRY_DELAY);
                    std::thread::sleep(RETRY_DELAY);
                    attempt += 1;
                }
                Err(e) => break Err(RedactionFailure::from_transport(&e)),
            }
        };

        log_outcome(&request_id, started, &outcome);
        outcome
    }
}

fn default_headers(config: &RedactConfig) -> RedactResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client_name = HeaderValue::from_str(config.client_name()).map_err(|e| {
        RedactError::ConfigError(format!("Invalid client_name '{}': {}", config.client_name(), e))
    })?;
    headers.insert(HeaderName::from_static(CLIENT_HEADER), client_name);

    Ok(headers)
}

fn should_retry(error: &reqwest::Error, attempt: u32, connect_retries: u32) -> bool {
    is_retryable(error.is_connect(), error.is_timeout()) && attempt < connect_retries
}

/// Only refused/unreachable connections are retried; a timed out connect already spent the budget
fn is_retryable(is_connect: bool, is_timeout: bool) -> bool {
    is_connect && !is_timeout
}

fn http_failure(status: StatusCode) -> RedactionFailure {
    RedactionFailure::new(
        FailureKind::HttpError,
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    )
}

/// Interpret the body of a 2xx response
fn parse_body(body: Result<String, reqwest::Error>) -> RequestOutcome {
    let body = body.map_err(|e| RedactionFailure::from_transport(&e))?;
    if body.trim().is_empty() {
        return Err(RedactionFailure::new(
            FailureKind::EmptyBody,
            "response body was empty",
        ));
    }

    let response: RedactionResponse = serde_json::from_str(&body)
        .map_err(|e| RedactionFailure::new(FailureKind::ParseError, e.to_string()))?;

    response
        .into_text()
        .ok_or_else(RedactionFailure::invalid_response)
}

fn log_outcome(request_id: &Uuid, started: Instant, outcome: &RequestOutcome) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(text) => info!(%request_id, elapsed_ms, redacted_len = text.len(), "Redaction succeeded"),
        Err(failure) => warn!(
            %request_id,
            elapsed_ms,
            kind = %failure.kind,
            message = %failure.message,
            "Redaction failed"
        ),
    }
}
