//! Keyboard shortcuts for the editor canvas.
//!
//! | keys                              | action            |
//! |-----------------------------------|-------------------|
//! | Ctrl/Cmd+Z                        | undo              |
//! | Ctrl/Cmd+Shift+Z, Ctrl/Cmd+Y      | redo              |
//! | Delete, Backspace                 | delete selected   |
//! | Ctrl/Cmd+D                        | duplicate selected|
//! | Ctrl/Cmd+ArrowUp / ArrowDown      | move selected     |
//!
//! Nothing fires while focus sits in a text input or an editable region;
//! those keys belong to the field.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What had keyboard focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Canvas,
    TextInput,
    ContentEditable,
}

impl FocusTarget {
    pub fn is_editable(&self) -> bool {
        matches!(self, FocusTarget::TextInput | FocusTarget::ContentEditable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub focus: FocusTarget,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            focus: FocusTarget::Canvas,
        }
    }

    pub fn command(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn focused(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelected,
    DuplicateSelected,
    MoveSelectedUp,
    MoveSelectedDown,
}

impl Shortcut {
    pub fn from_input(input: &KeyInput) -> Option<Shortcut> {
        if input.focus.is_editable() {
            return None;
        }

        let mods = input.modifiers;
        match input.key {
            Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
                'z' if mods.shift => Some(Shortcut::Redo),
                'z' => Some(Shortcut::Undo),
                'y' => Some(Shortcut::Redo),
                'd' => Some(Shortcut::DuplicateSelected),
                _ => None,
            },
            Key::Delete | Key::Backspace if !mods.command() => Some(Shortcut::DeleteSelected),
            Key::ArrowUp if mods.command() => Some(Shortcut::MoveSelectedUp),
            Key::ArrowDown if mods.command() => Some(Shortcut::MoveSelectedDown),
            _ => None,
        }
    }
}
