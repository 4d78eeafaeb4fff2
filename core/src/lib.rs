// Core redaction pipeline functionality:
// - Wire types for the /redact endpoint
// - Per-request outcome and failure taxonomy
// - Configuration loading
// - HTTP client (async and blocking)

// Export client module - HTTP client for the redaction service
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
