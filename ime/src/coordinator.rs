use std::sync::Arc;

use redact_core::{Redactor, RequestOutcome};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::adapter::{ReplaceError, TextAdapter};
use crate::connection::InputConnection;
use crate::status::{Status, StatusIndicator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    /// One request is in flight for `original`
    Pending { request_id: u64, original: String },
}

/// What a trigger did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    Started(u64),
    AlreadyPending,
    NothingToRedact,
}

/// Outcome of a background request, delivered back to the coordinator's owner
#[derive(Debug)]
pub struct Completion {
    request_id: u64,
    outcome: RequestOutcome,
}

impl Completion {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }
}

/// Single-flight controller between the redact key and the redaction service.
///
/// All state changes happen through `&mut self` on the task that owns the
/// coordinator; network calls run on spawned tasks and report back through
/// an internal channel, drained with [`RequestCoordinator::next_completion`].
pub struct RequestCoordinator<S: StatusIndicator> {
    redactor: Arc<dyn Redactor>,
    status: S,
    state: CoordinatorState,
    next_request_id: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: StatusIndicator> RequestCoordinator<S> {
    pub fn new(redactor: Arc<dyn Redactor>, status: S) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            redactor,
            status,
            state: CoordinatorState::Idle,
            next_request_id: 1,
            completion_tx,
            completion_rx,
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CoordinatorState::Pending { .. })
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    /// Handle one press of the redact key. Must be called within a tokio runtime.
    pub fn on_trigger<C: InputConnection>(&mut self, adapter: &TextAdapter<C>) -> TriggerResult {
        if self.is_pending() {
            debug!("Redaction already in flight, ignoring trigger");
            self.status.show(Status::AlreadyProcessing);
            return TriggerResult::AlreadyPending;
        }

        let text = adapter.capture_text();
        if text.trim().is_empty() {
            self.status.show(Status::NothingToRedact);
            return TriggerResult::NothingToRedact;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.state = CoordinatorState::Pending {
            request_id,
            original: text.clone(),
        };
        self.status.show(Status::Processing);
        self.status.set_trigger_enabled(false);
        info!(request_id, len = text.chars().count(), "Starting redaction");

        let redactor = self.redactor.clone();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = redactor.redact(&text).await;
            if completion_tx
                .send(Completion {
                    request_id,
                    outcome,
                })
                .is_err()
            {
                warn!(request_id, "Coordinator dropped before redaction completed");
            }
        });

        TriggerResult::Started(request_id)
    }

    /// Wait for the next background request to finish
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completion_rx.recv().await
    }

    /// Apply a finished request to the buffer and the status indicator
    pub fn on_complete<C: InputConnection>(
        &mut self,
        completion: Completion,
        adapter: &mut TextAdapter<C>,
    ) {
        let original = match &self.state {
            CoordinatorState::Pending {
                request_id,
                original,
            } if *request_id == completion.request_id => original.clone(),
            _ => {
                warn!(
                    request_id = completion.request_id,
                    "Ignoring completion with no matching pending request"
                );
                return;
            }
        };
        self.state = CoordinatorState::Idle;

        let status = match completion.outcome {
            Ok(redacted) => match adapter.replace(&original, &redacted) {
                Ok(()) => {
                    info!(request_id = completion.request_id, "Redaction applied");
                    Status::Complete
                }
                Err(e) => {
                    warn!(request_id = completion.request_id, error = %e, "Could not apply redaction");
                    match e {
                        ReplaceError::BufferChanged => Status::BufferChanged,
                        ReplaceError::NoConnection | ReplaceError::Rejected => Status::EditRejected,
                    }
                }
            },
            Err(failure) => {
                warn!(
                    request_id = completion.request_id,
                    kind = %failure.kind,
                    message = %failure.message,
                    "Redaction failed, leaving text untouched"
                );
                Status::Failed(failure.kind)
            }
        };

        self.status.show(status);
        self.status.set_trigger_enabled(true);
    }

    /// Block until no request is pending, applying completions as they arrive
    pub async fn settle<C: InputConnection>(&mut self, adapter: &mut TextAdapter<C>) {
        while self.is_pending() {
            match self.completion_rx.recv().await {
                Some(completion) => self.on_complete(completion, adapter),
                None => break,
            }
        }
    }
}
