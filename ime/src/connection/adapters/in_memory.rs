use tracing::debug;

use crate::connection::input::InputConnection;

/// In-memory editor with a single cursor.
///
/// Enter behaves like a chat box: the whole buffer is recorded as a sent
/// message and the field is cleared.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConnection {
    text: String,
    /// Cursor position in characters
    cursor: usize,
    sent: Vec<String>,
}

impl InMemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor pre-filled with `text`, cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            sent: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the buffer length
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.text.chars().count());
    }

    /// Messages submitted with Enter, oldest first
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }
}

impl InputConnection for InMemoryConnection {
    fn text_before_cursor(&self, n: usize) -> Option<String> {
        let start = self.cursor.saturating_sub(n);
        let from = self.byte_offset(start);
        let to = self.byte_offset(self.cursor);
        Some(self.text[from..to].to_string())
    }

    fn delete_before_cursor(&mut self, n: usize) -> bool {
        let start = self.cursor.saturating_sub(n);
        let from = self.byte_offset(start);
        let to = self.byte_offset(self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
        true
    }

    fn commit_text(&mut self, text: &str) -> bool {
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
        true
    }

    fn perform_enter(&mut self) -> bool {
        let message = std::mem::take(&mut self.text);
        debug!(len = message.chars().count(), "Submitting message");
        self.sent.push(message);
        self.cursor = 0;
        true
    }
}
