//! Keyboard shortcuts for selection history

use super::types::SelectionCommand;

/// A key press as reported by the host UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key name, e.g. "z", "Y", "Escape"
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    /// Focus is inside a text-editing control
    pub in_text_input: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }
}

/// Map a key press to a selection command.
///
/// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo, Escape clears.
/// Nothing is mapped while a text control has focus.
pub fn command_for_key(event: &KeyEvent) -> Option<SelectionCommand> {
    if event.in_text_input {
        return None;
    }
    if event.key == "Escape" {
        return Some(SelectionCommand::Clear);
    }
    if !(event.ctrl || event.meta) {
        return None;
    }
    match event.key.to_ascii_lowercase().as_str() {
        "z" if event.shift => Some(SelectionCommand::Redo),
        "z" => Some(SelectionCommand::Undo),
        "y" => Some(SelectionCommand::Redo),
        _ => None,
    }
}
