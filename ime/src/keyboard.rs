/// Primary code of the delete key
pub const CODE_DELETE: i32 = -5;
/// Primary code of the shift key
pub const CODE_SHIFT: i32 = -1;
/// Primary code of the letters/symbols switch
pub const CODE_MODE_CHANGE: i32 = -2;
/// Primary code of the redact key
pub const CODE_REDACT: i32 = -100;
/// Primary code of Enter (line feed)
pub const CODE_ENTER: i32 = 10;

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Delete,
    Shift,
    ModeChange,
    Enter,
    Redact,
    Char(char),
}

impl KeyCode {
    /// Decode a primary key code as emitted by the keyboard view
    pub fn from_primary(code: i32) -> Option<Self> {
        match code {
            CODE_DELETE => Some(KeyCode::Delete),
            CODE_SHIFT => Some(KeyCode::Shift),
            CODE_MODE_CHANGE => Some(KeyCode::ModeChange),
            CODE_REDACT => Some(KeyCode::Redact),
            CODE_ENTER => Some(KeyCode::Enter),
            code if code > 0 => u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .filter(|c| !c.is_control())
                .map(KeyCode::Char),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Letters,
    Symbols,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    Off,
    /// Uppercase the next character only
    Once,
    Locked,
}

/// What the session should do in response to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    DeleteBackward,
    Commit(String),
    Enter,
    Redact,
}

/// Shift and layout state of the on-screen keyboard
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    shift: ShiftState,
    layout: Layout,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    /// Which key set the renderer should draw
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn press(&mut self, key: KeyCode) -> KeyAction {
        match key {
            KeyCode::Delete => KeyAction::DeleteBackward,
            KeyCode::Shift => {
                self.shift = match self.shift {
                    ShiftState::Off => ShiftState::Once,
                    ShiftState::Once => ShiftState::Locked,
                    ShiftState::Locked => ShiftState::Off,
                };
                KeyAction::None
            }
            KeyCode::ModeChange => {
                self.layout = match self.layout {
                    Layout::Letters => Layout::Symbols,
                    Layout::Symbols => Layout::Letters,
                };
                self.shift = ShiftState::Off;
                KeyAction::None
            }
            KeyCode::Enter => KeyAction::Enter,
            KeyCode::Redact => KeyAction::Redact,
            KeyCode::Char(c) => {
                let text = match self.shift {
                    ShiftState::Off => c.to_string(),
                    ShiftState::Once | ShiftState::Locked => c.to_uppercase().collect(),
                };
                if self.shift == ShiftState::Once {
                    self.shift = ShiftState::Off;
                }
                KeyAction::Commit(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_primary_codes() {
        assert_eq!(KeyCode::from_primary(-5), Some(KeyCode::Delete));
        assert_eq!(KeyCode::from_primary(-1), Some(KeyCode::Shift));
        assert_eq!(KeyCode::from_primary(-2), Some(KeyCode::ModeChange));
        assert_eq!(KeyCode::from_primary(-100), Some(KeyCode::Redact));
        assert_eq!(KeyCode::from_primary(10), Some(KeyCode::Enter));
        assert_eq!(KeyCode::from_primary('a' as i32), Some(KeyCode::Char('a')));
        assert_eq!(KeyCode::from_primary('@' as i32), Some(KeyCode::Char('@')));
        assert_eq!(KeyCode::from_primary(-42), None);
        assert_eq!(KeyCode::from_primary(7), None);
    }

    #[test]
    fn test_shift_applies_once() {
        let mut keyboard = Keyboard::new();
        keyboard.press(KeyCode::Shift);
        assert_eq!(keyboard.press(KeyCode::Char('h')), KeyAction::Commit("H".to_string()));
        assert_eq!(keyboard.press(KeyCode::Char('i')), KeyAction::Commit("i".to_string()));
        assert_eq!(keyboard.shift(), ShiftState::Off);
    }

    #[test]
    fn test_double_shift_locks_caps() {
        let mut keyboard = Keyboard::new();
        keyboard.press(KeyCode::Shift);
        keyboard.press(KeyCode::Shift);
        assert_eq!(keyboard.shift(), ShiftState::Locked);
        assert_eq!(keyboard.press(KeyCode::Char('o')), KeyAction::Commit("O".to_string()));
        assert_eq!(keyboard.press(KeyCode::Char('k')), KeyAction::Commit("K".to_string()));

        keyboard.press(KeyCode::Shift);
        assert_eq!(keyboard.shift(), ShiftState::Off);
    }

    #[test]
    fn test_mode_change_toggles_layout_and_clears_shift() {
        let mut keyboard = Keyboard::new();
        keyboard.press(KeyCode::Shift);
        assert_eq!(keyboard.press(KeyCode::ModeChange), KeyAction::None);
        assert_eq!(keyboard.layout(), Layout::Symbols);
        assert_eq!(keyboard.shift(), ShiftState::Off);

        keyboard.press(KeyCode::ModeChange);
        assert_eq!(keyboard.layout(), Layout::Letters);
    }

    #[test]
    fn test_action_keys() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.press(KeyCode::Delete), KeyAction::DeleteBackward);
        assert_eq!(keyboard.press(KeyCode::Enter), KeyAction::Enter);
        assert_eq!(keyboard.press(KeyCode::Redact), KeyAction::Redact);
    }
}
