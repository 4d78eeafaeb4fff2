//! Keyboard-side half of the redaction pipeline.
//!
//! A [`KeyboardSession`] owns everything one keyboard session needs: the
//! [`TextAdapter`] over the host's input connection, the [`Keyboard`] key
//! state and the [`RequestCoordinator`] that keeps at most one redaction
//! request in flight.

pub mod adapter;
pub mod connection;
pub mod coordinator;
pub mod keyboard;
pub mod session;
pub mod status;

pub use adapter::{ReplaceError, TextAdapter};
pub use connection::{InMemoryConnection, InputConnection};
pub use coordinator::{Completion, CoordinatorState, RequestCoordinator, TriggerResult};
pub use keyboard::{KeyAction, KeyCode, Keyboard, Layout, ShiftState};
pub use session::KeyboardSession;
pub use status::{RecordingStatus, Status, StatusIndicator};
