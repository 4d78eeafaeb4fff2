use thiserror::Error;
use tracing::{debug, error, warn};

use crate::connection::InputConnection;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    #[error("no input connection attached")]
    NoConnection,

    /// The text before the cursor no longer matches what was captured
    #[error("text before the cursor changed since it was captured")]
    BufferChanged,

    #[error("host rejected the edit")]
    Rejected,
}

/// Reads the pending message from the host editor and swaps in redacted text
#[derive(Debug)]
pub struct TextAdapter<C: InputConnection> {
    connection: Option<C>,
    lookback: usize,
}

impl<C: InputConnection> TextAdapter<C> {
    /// Adapter with no connection attached yet
    pub fn new(lookback: usize) -> Self {
        Self {
            connection: None,
            lookback,
        }
    }

    pub fn with_connection(connection: C, lookback: usize) -> Self {
        Self {
            connection: Some(connection),
            lookback,
        }
    }

    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.connection.as_mut()
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Text immediately before the cursor, at most `lookback` characters.
    /// Empty when no connection is attached or the host cannot answer.
    pub fn capture_text(&self) -> String {
        self.connection
            .as_ref()
            .and_then(|conn| conn.text_before_cursor(self.lookback))
            .unwrap_or_default()
    }

    /// Replace `original`, which must sit immediately before the cursor, with `replacement`.
    ///
    /// The buffer is checked first and left untouched if `original` is no
    /// longer there. If the host accepts the delete but rejects the insert,
    /// `original` is committed back before returning.
    pub fn replace(&mut self, original: &str, replacement: &str) -> Result<(), ReplaceError> {
        let conn = self.connection.as_mut().ok_or(ReplaceError::NoConnection)?;
        let len = original.chars().count();

        let current = conn.text_before_cursor(len).unwrap_or_default();
        if current != original {
            warn!(
                expected_len = len,
                found_len = current.chars().count(),
                "Buffer changed while redaction was pending, skipping replace"
            );
            return Err(ReplaceError::BufferChanged);
        }

        if !conn.delete_before_cursor(len) {
            return Err(ReplaceError::Rejected);
        }
        if !conn.commit_text(replacement) {
            if conn.commit_text(original) {
                warn!(len, "Host rejected redacted text, original restored");
            } else {
                error!(len, "Host rejected redacted text and the restore of the original");
            }
            return Err(ReplaceError::Rejected);
        }

        debug!(
            deleted = len,
            inserted = replacement.chars().count(),
            "Replaced captured text"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::InMemoryConnection;

    #[test]
    fn test_capture_without_connection_is_empty() {
        let adapter: TextAdapter<InMemoryConnection> = TextAdapter::new(1000);
        assert_eq!(adapter.capture_text(), "");
    }

    #[test]
    fn test_capture_is_bounded_by_lookback() {
        let long = "x".repeat(1500);
        let adapter = TextAdapter::with_connection(InMemoryConnection::with_text(long), 1000);
        assert_eq!(adapter.capture_text().chars().count(), 1000);
    }

    #[test]
    fn test_replace_swaps_span_before_cursor() {
        let mut adapter = TextAdapter::with_connection(
            InMemoryConnection::with_text("call me at 555-123-4567"),
            1000,
        );
        let original = adapter.capture_text();

        adapter.replace(&original, "call me at [PHONE]").unwrap();

        let conn = adapter.connection().unwrap();
        assert_eq!(conn.text(), "call me at [PHONE]");
        assert_eq!(conn.cursor(), "call me at [PHONE]".len());
    }

    #[test]
    fn test_replace_only_touches_captured_window() {
        let mut adapter = TextAdapter::with_connection(InMemoryConnection::with_text("keep|a@b.io"), 6);
        let original = adapter.capture_text();
        assert_eq!(original, "a@b.io");

        adapter.replace(&original, "[EMAIL]").unwrap();
        assert_eq!(adapter.connection().unwrap().text(), "keep|[EMAIL]");
    }

    #[test]
    fn test_replace_refuses_changed_buffer() {
        let mut adapter = TextAdapter::with_connection(InMemoryConnection::with_text("hello"), 1000);
        let original = adapter.capture_text();

        adapter.connection_mut().unwrap().commit_text(" there");

        assert_eq!(
            adapter.replace(&original, "[REDACTED]"),
            Err(ReplaceError::BufferChanged)
        );
        assert_eq!(adapter.connection().unwrap().text(), "hello there");
    }

    /// Wraps an in-memory editor and refuses the next `reject_commits` inserts
    #[derive(Debug)]
    struct StubbornConnection {
        inner: InMemoryConnection,
        reject_commits: usize,
    }

    impl InputConnection for StubbornConnection {
        fn text_before_cursor(&self, n: usize) -> Option<String> {
            self.inner.text_before_cursor(n)
        }

        fn delete_before_cursor(&mut self, n: usize) -> bool {
            self.inner.delete_before_cursor(n)
        }

        fn commit_text(&mut self, text: &str) -> bool {
            if self.reject_commits > 0 {
                self.reject_commits -= 1;
                return false;
            }
            self.inner.commit_text(text)
        }

        fn perform_enter(&mut self) -> bool {
            self.inner.perform_enter()
        }
    }

    #[test]
    fn test_rejected_insert_restores_original() {
        let mut adapter = TextAdapter::with_connection(
            StubbornConnection {
                inner: InMemoryConnection::with_text("hello"),
                reject_commits: 1,
            },
            1000,
        );

        assert_eq!(adapter.replace("hello", "[X]"), Err(ReplaceError::Rejected));

        let conn = &adapter.connection().unwrap().inner;
        assert_eq!(conn.text(), "hello");
        assert_eq!(conn.cursor(), 5);
    }

    #[test]
    fn test_replace_without_connection() {
        let mut adapter: TextAdapter<InMemoryConnection> = TextAdapter::new(1000);
        assert_eq!(adapter.replace("a", "b"), Err(ReplaceError::NoConnection));
    }
}
