use std::sync::Arc;

use redact_core::Redactor;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::adapter::TextAdapter;
use crate::connection::InputConnection;
use crate::coordinator::{RequestCoordinator, TriggerResult};
use crate::keyboard::{KeyAction, KeyCode, Keyboard};
use crate::status::StatusIndicator;

/// Everything owned by one keyboard session.
///
/// The session is the single owner of buffer edits and pipeline state;
/// [`KeyboardSession::run`] plays the role of the UI thread.
pub struct KeyboardSession<C: InputConnection, S: StatusIndicator> {
    adapter: TextAdapter<C>,
    keyboard: Keyboard,
    coordinator: RequestCoordinator<S>,
}

impl<C: InputConnection, S: StatusIndicator> KeyboardSession<C, S> {
    pub fn new(adapter: TextAdapter<C>, redactor: Arc<dyn Redactor>, status: S) -> Self {
        Self {
            adapter,
            keyboard: Keyboard::new(),
            coordinator: RequestCoordinator::new(redactor, status),
        }
    }

    pub fn adapter(&self) -> &TextAdapter<C> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut TextAdapter<C> {
        &mut self.adapter
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn coordinator(&self) -> &RequestCoordinator<S> {
        &self.coordinator
    }

    pub fn status(&self) -> &S {
        self.coordinator.status()
    }

    /// Apply one key press. The redact key returns what the coordinator did.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<TriggerResult> {
        let action = self.keyboard.press(key);
        debug!(?key, ?action, "Key pressed");

        if action == KeyAction::Redact {
            return Some(self.coordinator.on_trigger(&self.adapter));
        }

        let Some(conn) = self.adapter.connection_mut() else {
            warn!(?key, "No input connection, dropping key");
            return None;
        };
        let accepted = match action {
            KeyAction::None | KeyAction::Redact => true,
            KeyAction::DeleteBackward => conn.delete_before_cursor(1),
            KeyAction::Commit(text) => conn.commit_text(&text),
            KeyAction::Enter => conn.perform_enter(),
        };
        if !accepted {
            warn!(?key, "Host rejected key edit");
        }
        None
    }

    /// Apply a raw primary code from the keyboard view. Unknown codes are dropped.
    pub fn handle_primary(&mut self, code: i32) -> Option<TriggerResult> {
        match KeyCode::from_primary(code) {
            Some(key) => self.handle_key(key),
            None => {
                debug!(code, "Ignoring unknown primary code");
                None
            }
        }
    }

    /// Type `text` character by character
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let key = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            self.handle_key(key);
        }
    }

    /// Wait for the next finished request and apply it
    pub async fn apply_next_completion(&mut self) -> bool {
        match self.coordinator.next_completion().await {
            Some(completion) => {
                self.coordinator.on_complete(completion, &mut self.adapter);
                true
            }
            None => false,
        }
    }

    /// Wait for any in-flight redaction and apply it
    pub async fn settle(&mut self) {
        self.coordinator.settle(&mut self.adapter).await;
    }

    /// Drive the session from a stream of key presses until the stream ends.
    ///
    /// Completions are applied on this task as they arrive. When the key
    /// stream closes, any in-flight request is awaited before returning.
    pub async fn run(mut self, mut keys: mpsc::Receiver<KeyCode>) -> Self {
        info!("Keyboard session started");
        loop {
            tokio::select! {
                key = keys.recv() => match key {
                    Some(key) => {
                        self.handle_key(key);
                    }
                    None => break,
                },
                true = self.apply_next_completion() => {}
            }
        }

        self.settle().await;
        info!("Keyboard session finished");
        self
    }
}
