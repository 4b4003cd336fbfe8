//! Keyboard shortcut mapping.

use serde::{Deserialize, Serialize};

use crate::event::KeyEvent;

/// Platform family, which decides the primary shortcut modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS: Command is the primary modifier.
    Mac,
    /// Everything else: Control is the primary modifier.
    #[default]
    Other,
}

impl Platform {
    /// Platform of the running binary.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Other
        }
    }
}

/// An editor command bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum EditorCommand {
    Copy,
    Paste,
    Cut,
    Delete,
    Undo,
    Redo,
    SelectAll,
    Duplicate,
    Group,
    Ungroup,
    BringForward,
    SendBackward,
}

impl EditorCommand {
    /// Map a key press to a command.
    ///
    /// Returns `None` for keys that are not shortcuts.
    #[must_use]
    pub fn from_key(event: &KeyEvent, platform: Platform) -> Option<Self> {
        let modifiers = event.modifiers;
        let primary = match platform {
            Platform::Mac => modifiers.meta,
            Platform::Other => modifiers.ctrl,
        };
        let shift = modifiers.shift;

        if matches!(event.key.as_str(), "Delete" | "Backspace") {
            return Some(Self::Delete);
        }
        if !primary {
            return None;
        }

        // Shift turns letters upper case on most platforms.
        let key = event.key.to_ascii_lowercase();
        let command = match (key.as_str(), shift) {
            ("c", false) => Self::Copy,
            ("v", false) => Self::Paste,
            ("x", false) => Self::Cut,
            ("z", false) => Self::Undo,
            ("y", _) | ("z", true) => Self::Redo,
            ("a", _) => Self::SelectAll,
            ("d", _) => Self::Duplicate,
            ("g", false) => Self::Group,
            ("g", true) => Self::Ungroup,
            ("]", _) => Self::BringForward,
            ("[", _) => Self::SendBackward,
            _ => return None,
        };
        Some(command)
    }
}
