//! Host text connection
//!
//! The keyboard never owns the text being edited; it talks to whatever
//! editor has focus through an [`InputConnection`]. The in-memory adapter
//! stands in for a real editor in tests and in the CLI simulator.

pub mod adapters;
pub mod input;

pub use adapters::InMemoryConnection;
pub use input::InputConnection;
