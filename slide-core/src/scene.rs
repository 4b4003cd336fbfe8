//! Render description of the current slide.
//!
//! A [`SceneDescription`] is everything a rendering layer needs to paint the
//! canvas for one frame: elements in paint order, selection decorations and
//! the overlays of the gesture in progress. It is derived from the editor and
//! never mutated.

use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::element::{Element, ElementId};
use crate::geometry::{Bounds, Point};
use crate::guides::Guide;
use crate::handles::HandleLayout;
use crate::slide::{Background, SlideId};

/// An element to paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    /// The element.
    pub element: Element,
    /// Members of a group element, for renderers that draw them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Element>,
    /// Whether the element is selected.
    pub selected: bool,
}

/// Selection decoration for one selected element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutline {
    /// The selected element.
    pub id: ElementId,
    /// Element box.
    pub bounds: Bounds,
    /// Element rotation in degrees.
    pub rotation: f32,
    /// Whether this is part of a multi-selection.
    pub multi: bool,
    /// Handles, absent for locked elements.
    pub handles: Option<HandleLayout>,
}

/// Box of an element being drawn with a creation tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationPreview {
    /// Tool name.
    pub tool: String,
    /// Current extent.
    pub bounds: Bounds,
}

/// Gesture overlays supplied by the interaction controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    /// Marquee of a box selection.
    pub marquee: Option<Bounds>,
    /// Alignment guides of a drag.
    pub guides: Vec<Guide>,
    /// Element being drawn.
    pub creation: Option<CreationPreview>,
    /// Text element in inline editing, with its draft content.
    pub editing_text: Option<(ElementId, String)>,
}

/// Everything needed to paint one frame of the current slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    /// Slide shown.
    pub slide_id: SlideId,
    /// Slide background.
    pub background: Background,
    /// Zoom factor.
    pub zoom: f32,
    /// Pan offset.
    pub pan: Point,
    /// Grid spacing when the grid is shown.
    pub grid: Option<f32>,
    /// Visible elements in paint order.
    pub items: Vec<RenderItem>,
    /// Decorations of selected elements.
    pub selection: Vec<SelectionOutline>,
    /// Union box of a multi-selection.
    pub selection_bounds: Option<Bounds>,
    /// Number of selected elements.
    pub selection_count: usize,
    /// Marquee rectangle.
    pub marquee: Option<Bounds>,
    /// Alignment guides.
    pub guides: Vec<Guide>,
    /// Creation preview.
    pub creation_preview: Option<CreationPreview>,
    /// Inline text editor: element and draft content.
    pub editing_text: Option<(ElementId, String)>,
}

impl SceneDescription {
    /// Derive the description of the editor's current slide.
    ///
    /// Returns `None` if the editor has no current slide.
    #[must_use]
    pub fn build(editor: &Editor, overlays: Overlays) -> Option<Self> {
        let slide = editor.current_slide()?;
        let state = editor.canvas_state();
        let selected = &state.selected_elements;
        let multi = selected.len() > 1;

        let items = slide
            .paint_order()
            .into_iter()
            .filter(|e| e.visible)
            .map(|e| RenderItem {
                element: e.clone(),
                members: slide.collect_members(e),
                selected: state.is_selected(&e.id),
            })
            .collect();

        let selection = slide
            .paint_order()
            .into_iter()
            .filter(|e| state.is_selected(&e.id))
            .map(|e| SelectionOutline {
                id: e.id.clone(),
                bounds: e.bounds(),
                rotation: e.transform.rotation,
                multi,
                handles: (!e.locked)
                    .then(|| HandleLayout::new(&e.transform, state.zoom, editor.config())),
            })
            .collect();

        Some(Self {
            slide_id: slide.id.clone(),
            background: slide.background.clone(),
            zoom: state.zoom,
            pan: state.pan,
            grid: state.grid_enabled.then_some(state.grid_size),
            items,
            selection,
            selection_bounds: if multi {
                slide.selection_bounds(selected)
            } else {
                None
            },
            selection_count: selected.len(),
            marquee: overlays.marquee,
            guides: overlays.guides,
            creation_preview: overlays.creation,
            editing_text: overlays.editing_text,
        })
    }
}
