use std::fmt;

use thiserror::Error;

/// Errors raised while setting up the redaction pipeline
#[derive(Error, Debug)]
pub enum RedactError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Client Error: {0}")]
    ClientError(String),
}

/// Result type for setup operations
pub type RedactResult<T> = Result<T, RedactError>;

/// Classification of a failed redaction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Empty or whitespace-only text; never sent
    InvalidInput,
    NetworkTimeout,
    /// Transport failure, no response obtained
    NetworkError,
    /// Non-2xx status
    HttpError,
    EmptyBody,
    /// Body was not the expected JSON shape
    ParseError,
    /// Well-formed JSON without usable redacted text
    InvalidResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::NetworkTimeout => "network_timeout",
            FailureKind::NetworkError => "network_error",
            FailureKind::HttpError => "http_error",
            FailureKind::EmptyBody => "empty_body",
            FailureKind::ParseError => "parse_error",
            FailureKind::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A redaction request that did not produce redacted text.
///
/// Every transport, protocol and parsing problem is folded into this value
/// before it leaves the client, so callers only ever match on `kind`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RedactionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RedactionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input() -> Self {
        Self::new(FailureKind::InvalidInput, "text cannot be empty")
    }

    pub fn invalid_response() -> Self {
        Self::new(FailureKind::InvalidResponse, "redacted text missing")
    }

    /// Classify a transport error that prevented a response from arriving
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::new(
                FailureKind::NetworkTimeout,
                format!("request timed out: {}", error),
            )
        } else {
            Self::new(FailureKind::NetworkError, error.to_string())
        }
    }
}

/// Outcome of a single redaction request: the redacted text or a classified failure
pub type RequestOutcome = Result<String, RedactionFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let failure = RedactionFailure::invalid_input();
        assert_eq!(failure.kind, FailureKind::InvalidInput);
        assert_eq!(failure.message, "text cannot be empty");
        assert_eq!(failure.to_string(), "invalid_input: text cannot be empty");
    }

    #[test]
    fn test_invalid_response_message() {
        let failure = RedactionFailure::invalid_response();
        assert_eq!(failure.kind, FailureKind::InvalidResponse);
        assert_eq!(failure.message, "redacted text missing");
    }
}
