use std::fmt;

use redact_core::FailureKind;

/// User-visible state of the redaction pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    NothingToRedact,
    Processing,
    AlreadyProcessing,
    Complete,
    Failed(FailureKind),
    /// The message was edited while the request was in flight
    BufferChanged,
    /// The host refused the edit or no editor was attached
    EditRejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Status::NothingToRedact => "No text to redact",
            Status::Processing => "Processing...",
            Status::AlreadyProcessing => "Already processing...",
            Status::Complete => "Redaction complete",
            Status::Failed(_) => "Redaction failed. Try again.",
            Status::BufferChanged => "Text changed while redacting. Try again.",
            Status::EditRejected => "Could not update the text. Try again.",
        };
        f.write_str(message)
    }
}

/// Where the coordinator reports progress: a status line and the enabled
/// state of the redact key
pub trait StatusIndicator: Send {
    fn show(&mut self, status: Status);
    fn set_trigger_enabled(&mut self, enabled: bool);
}

/// Keeps every status it was shown, for tests and headless sessions
#[derive(Debug, Clone)]
pub struct RecordingStatus {
    history: Vec<Status>,
    trigger_enabled: bool,
}

impl Default for RecordingStatus {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            trigger_enabled: true,
        }
    }
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Status> {
        self.history.last()
    }

    pub fn history(&self) -> &[Status] {
        &self.history
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }
}

impl StatusIndicator for RecordingStatus {
    fn show(&mut self, status: Status) {
        self.history.push(status);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }
}
