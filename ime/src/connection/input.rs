use std::fmt::Debug;

/// Editing operations the focused editor exposes to the keyboard.
///
/// Counts are in characters, not bytes. Every mutating call reports whether
/// the host accepted it; a host may refuse edits once its field loses focus.
pub trait InputConnection: Send + Debug {
    /// Up to `n` characters immediately before the cursor, or `None` if the
    /// host cannot answer
    fn text_before_cursor(&self, n: usize) -> Option<String>;

    /// Delete up to `n` characters immediately before the cursor
    fn delete_before_cursor(&mut self, n: usize) -> bool;

    /// Insert `text` at the cursor and move the cursor after it
    fn commit_text(&mut self, text: &str) -> bool;

    /// Run the editor's Enter / send action
    fn perform_enter(&mut self) -> bool;
}
