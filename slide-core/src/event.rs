//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released.
    Up,
    /// Double click.
    DoubleClick,
}

/// A pointer (mouse or pen) event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position relative to the canvas viewport.
    pub x: f32,
    /// Y position relative to the canvas viewport.
    pub y: f32,
    /// Active modifier keys.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    /// Create a pointer event without modifiers.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Attach modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Screen position as a point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the platform (`"c"`, `"Delete"`, `"Escape"`, ...).
    pub key: String,
    /// Active modifier keys.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key event.
    #[must_use]
    pub fn new(key: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer event.
    Pointer(PointerEvent),

    /// Key press.
    Key(KeyEvent),

    /// The canvas lost focus.
    Blur,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only Control held.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Only Meta held.
    pub const META: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: true,
    };

    /// Whether a click should toggle selection membership instead of replacing it.
    #[must_use]
    pub const fn toggles_selection(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Add Shift to these modifiers.
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_modifiers() {
        assert!(KeyModifiers::SHIFT.toggles_selection());
        assert!(KeyModifiers::CTRL.toggles_selection());
        assert!(KeyModifiers::META.toggles_selection());
        let alt = KeyModifiers {
            alt: true,
            ..KeyModifiers::default()
        };
        assert!(!alt.toggles_selection());
    }

    #[test]
    fn test_event_json_shape() {
        let event = InputEvent::Pointer(PointerEvent::new(PointerPhase::Down, 4.0, 5.0));
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "Pointer");
        assert_eq!(json["data"]["phase"], "down");

        let back: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }
}
