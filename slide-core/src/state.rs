//! Canvas state: viewport, selection, clipboard and grid settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ShapeKind};
use crate::geometry::Point;
use crate::slide::{Slide, SlideId};

/// Active tool mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Select, move, resize and rotate existing elements.
    #[default]
    Select,
    /// Draw a text box.
    Text,
    /// Draw a shape of the given kind.
    Shape(ShapeKind),
}

impl Tool {
    /// Creation tool for a shape kind.
    ///
    /// Lines and arrows have no drawing tool and yield `None`.
    #[must_use]
    pub fn shape(kind: ShapeKind) -> Option<Self> {
        match kind {
            ShapeKind::Line | ShapeKind::Arrow => None,
            _ => Some(Self::Shape(kind)),
        }
    }

    /// Whether this tool creates elements.
    #[must_use]
    pub const fn is_creation(self) -> bool {
        !matches!(self, Self::Select)
    }

    /// Tool name, as used by toolbars and the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Text => "text",
            Self::Shape(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "text" => Ok(Self::Text),
            other => other
                .parse::<ShapeKind>()
                .ok()
                .and_then(Self::shape)
                .ok_or_else(|| format!("unknown tool: {other}")),
        }
    }
}

/// Viewport, selection, clipboard and grid settings of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    /// Zoom factor, kept within the configured range.
    pub zoom: f32,
    /// Screen-space offset of the canvas origin.
    pub pan: Point,
    /// Selected top-level elements; the first entry is the primary selection.
    pub selected_elements: Vec<ElementId>,
    /// Copied elements.
    pub clipboard: Vec<Element>,
    /// Group members of copied groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clipboard_members: Vec<Element>,
    /// Whether the grid is drawn.
    pub grid_enabled: bool,
    /// Whether dragged elements snap to the grid.
    pub snap_to_grid: bool,
    /// Grid spacing in document units.
    pub grid_size: f32,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::with_grid_size(20.0)
    }
}

impl CanvasState {
    /// Fresh state with the given grid spacing.
    #[must_use]
    pub fn with_grid_size(grid_size: f32) -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
            selected_elements: Vec::new(),
            clipboard: Vec::new(),
            clipboard_members: Vec::new(),
            grid_enabled: true,
            snap_to_grid: true,
            grid_size,
        }
    }

    /// Whether an element is selected.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_elements.contains(id)
    }

    /// Convert a screen position to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Convert a canvas position to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan.x,
            canvas.y * self.zoom + self.pan.y,
        )
    }

    pub(crate) fn reset_viewport(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::ORIGIN;
    }
}

/// An independent copy of everything undo/redo restores.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// All slides.
    pub slides: Vec<Slide>,
    /// The current slide.
    pub current_slide_id: SlideId,
    /// Viewport, selection and clipboard.
    pub canvas_state: CanvasState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for name in ["select", "text", "rectangle", "sticky-note", "shield"] {
            let tool: Tool = name.parse().expect("known tool");
            assert_eq!(tool.to_string(), name);
        }
        assert!("line".parse::<Tool>().is_err());
        assert!("eraser".parse::<Tool>().is_err());
        assert!(!Tool::Select.is_creation());
        assert!(Tool::Text.is_creation());
    }

    #[test]
    fn test_screen_canvas_conversion() {
        let state = CanvasState {
            zoom: 2.0,
            pan: Point::new(100.0, 50.0),
            ..CanvasState::default()
        };
        let canvas = state.screen_to_canvas(Point::new(300.0, 250.0));
        assert!((canvas.x - 100.0).abs() < f32::EPSILON);
        assert!((canvas.y - 100.0).abs() < f32::EPSILON);
        assert_eq!(state.canvas_to_screen(canvas), Point::new(300.0, 250.0));
    }

    #[test]
    fn test_default_state() {
        let state = CanvasState::default();
        assert!((state.zoom - 1.0).abs() < f32::EPSILON);
        assert!(state.grid_enabled);
        assert!(state.snap_to_grid);
        assert!(state.selected_elements.is_empty());
    }
}
