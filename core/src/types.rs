use serde::{Deserialize, Serialize};

/// Body of `POST /redact`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRequest {
    pub text: String,
}

impl RedactionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Successful body returned by the redaction service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResponse {
    #[serde(rename = "redacted", default)]
    pub redacted_text: Option<String>,
}

impl RedactionResponse {
    /// The redacted text, if present and not blank
    pub fn into_text(self) -> Option<String> {
        self.redacted_text.filter(|text| !text.trim().is_empty())
    }
}
