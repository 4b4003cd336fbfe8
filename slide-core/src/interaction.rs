//! Canvas interaction controller.
//!
//! Translates pointer and keyboard input into [`Editor`] calls. The
//! controller holds only gesture state; the editor is passed in with every
//! event, so no component keeps a writable alias to the document.
//!
//! ```text
//!                 ┌──────────── pointer-down on handle ──────────┐
//!                 │                                              ▼
//!   Idle ── pointer-down on element ──► Dragging          Resizing / Rotating
//!    │  ── pointer-down on empty ─────► BoxSelecting            │
//!    │  ── pointer-down (creation tool) ► Creating              │
//!    ▲                                                          │
//!    └────────────── pointer-up / Escape / blur ◄───────────────┘
//! ```
//!
//! Drags, resizes and rotations record one history step when they end,
//! provided they changed something.

use crate::editor::{Editor, ElementUpdate, LayerDirection};
use crate::element::{Element, ElementId, ElementKind, Transform};
use crate::event::{InputEvent, KeyEvent, KeyModifiers, PointerEvent, PointerPhase};
use crate::geometry::{snap_point_to_grid, Bounds, Point};
use crate::guides::compute_guides;
use crate::handles::{resize_transform, rotation_angle, HandleKind, HandleLayout, ResizeHandle};
use crate::keyboard::{EditorCommand, Platform};
use crate::scene::{CreationPreview, Overlays, SceneDescription};
use crate::state::Tool;

/// Content of a text box drawn with the text tool.
pub const DEFAULT_TEXT_CONTENT: &str = "Double-click to edit";

/// The gesture in progress. Points are in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// No button held.
    Idle,
    /// Moving the selection.
    Dragging {
        /// Element the drag started on.
        primary: ElementId,
        /// Pointer position of the previous sample.
        last: Point,
        /// Unsnapped position of every moving element.
        positions: Vec<(ElementId, Point)>,
        /// Whether any element moved.
        changed: bool,
    },
    /// Dragging a selection marquee.
    BoxSelecting {
        /// Marquee anchor.
        start: Point,
        /// Current pointer position.
        current: Point,
    },
    /// Drawing a new element.
    Creating {
        /// Creation tool.
        tool: Tool,
        /// Pointer-down position.
        origin: Point,
        /// Current pointer position.
        current: Point,
    },
    /// Dragging a resize handle.
    Resizing {
        /// Element being resized.
        id: ElementId,
        /// Handle being dragged.
        handle: ResizeHandle,
        /// Pointer position at drag start.
        origin: Point,
        /// Transform at drag start.
        start: Transform,
        /// Whether the transform changed.
        changed: bool,
    },
    /// Dragging the rotation handle.
    Rotating {
        /// Element being rotated.
        id: ElementId,
        /// Rotation center.
        center: Point,
        /// Whether the rotation changed.
        changed: bool,
    },
}

/// An inline text edit. The draft is only written on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSession {
    element_id: ElementId,
    draft: String,
}

impl TextEditSession {
    /// Element being edited.
    #[must_use]
    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    /// Current draft content.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// Pointer/keyboard gesture state machine.
#[derive(Debug, Clone)]
pub struct CanvasController {
    gesture: Gesture,
    text_session: Option<TextEditSession>,
    platform: Platform,
    text_input_focused: bool,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl CanvasController {
    /// Create an idle controller for a platform.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            gesture: Gesture::Idle,
            text_session: None,
            platform,
            text_input_focused: false,
        }
    }

    /// The gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// The inline text edit, if any.
    #[must_use]
    pub fn text_session(&self) -> Option<&TextEditSession> {
        self.text_session.as_ref()
    }

    /// Tell the controller that an external text field has focus.
    ///
    /// Keyboard shortcuts are suppressed while it does.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Dispatch any input event.
    pub fn handle_event(&mut self, editor: &mut Editor, event: &InputEvent) {
        match event {
            InputEvent::Pointer(pointer) => match pointer.phase {
                PointerPhase::Down => self.pointer_down(editor, *pointer),
                PointerPhase::Move => self.pointer_move(editor, *pointer),
                PointerPhase::Up => self.pointer_up(editor, *pointer),
                PointerPhase::DoubleClick => {
                    self.double_click(editor, *pointer);
                }
            },
            InputEvent::Key(key) => {
                self.key_down(editor, key);
            }
            InputEvent::Blur => self.blur(editor),
        }
    }

    // ----- Pointer -----

    /// Button pressed.
    pub fn pointer_down(&mut self, editor: &mut Editor, event: PointerEvent) {
        let point = editor.screen_to_canvas(event.position());

        if let Some(session) = &self.text_session {
            let inside = editor
                .element(&session.element_id)
                .is_some_and(|e| e.contains_point(point));
            if inside {
                return;
            }
            self.commit_text_edit(editor);
        }
        if self.gesture != Gesture::Idle {
            self.finish_gesture(editor);
        }

        match editor.tool() {
            Tool::Select => self.begin_select(editor, point, event.modifiers),
            tool => {
                tracing::debug!("Creating with {tool} at ({}, {})", point.x, point.y);
                self.gesture = Gesture::Creating {
                    tool,
                    origin: point,
                    current: point,
                };
                editor.set_drawing(true);
            }
        }
    }

    fn begin_select(&mut self, editor: &mut Editor, point: Point, modifiers: KeyModifiers) {
        if let Some(gesture) = Self::hit_handles(editor, point) {
            tracing::debug!("Handle gesture: {gesture:?}");
            self.gesture = gesture;
            return;
        }

        let Some(hit) = editor
            .current_slide()
            .and_then(|s| s.element_at(point))
            .map(|e| e.id.clone())
        else {
            if !modifiers.toggles_selection() {
                editor.clear_selection();
            }
            self.gesture = Gesture::BoxSelecting {
                start: point,
                current: point,
            };
            return;
        };

        let mut selection = editor.selected_elements().to_vec();
        if modifiers.toggles_selection() {
            if let Some(pos) = selection.iter().position(|id| id == &hit) {
                selection.remove(pos);
            } else {
                selection.push(hit.clone());
            }
            editor.set_selected_elements(selection);
        } else if !selection.contains(&hit) {
            editor.set_selected_elements(vec![hit.clone()]);
        }
        if !editor.canvas_state().is_selected(&hit) {
            return;
        }

        let positions = editor
            .selected_elements()
            .iter()
            .filter_map(|id| editor.element(id))
            .filter(|e| !e.locked)
            .map(|e| (e.id.clone(), Point::new(e.transform.x, e.transform.y)))
            .collect();
        tracing::debug!("Dragging from {hit}");
        self.gesture = Gesture::Dragging {
            primary: hit,
            last: point,
            positions,
            changed: false,
        };
    }

    fn hit_handles(editor: &Editor, point: Point) -> Option<Gesture> {
        let slide = editor.current_slide()?;
        let state = editor.canvas_state();
        slide
            .paint_order()
            .into_iter()
            .rev()
            .filter(|e| state.is_selected(&e.id) && !e.locked)
            .find_map(|e| {
                let layout = HandleLayout::new(&e.transform, state.zoom, editor.config());
                match layout.hit(point)? {
                    HandleKind::Resize(handle) => Some(Gesture::Resizing {
                        id: e.id.clone(),
                        handle,
                        origin: point,
                        start: e.transform,
                        changed: false,
                    }),
                    HandleKind::Rotate => Some(Gesture::Rotating {
                        id: e.id.clone(),
                        center: e.bounds().center(),
                        changed: false,
                    }),
                }
            })
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, editor: &mut Editor, event: PointerEvent) {
        let point = editor.screen_to_canvas(event.position());
        let state = editor.canvas_state();
        let grid = state.snap_to_grid.then_some(state.grid_size);
        let min_size = editor.config().min_element_size;
        let rotation_step = editor.config().rotation_snap_degrees;

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging {
                last,
                positions,
                changed,
                ..
            } => {
                let delta = point.delta_from(*last);
                *last = point;
                for (id, position) in positions.iter_mut() {
                    position.x += delta.x;
                    position.y += delta.y;
                    let target = grid.map_or(*position, |size| snap_point_to_grid(*position, size));
                    let Some(current) = editor.element(id).map(|e| e.transform) else {
                        continue;
                    };
                    if (current.x - target.x).abs() > f32::EPSILON
                        || (current.y - target.y).abs() > f32::EPSILON
                    {
                        let moved = Transform {
                            x: target.x,
                            y: target.y,
                            ..current
                        };
                        *changed |= editor.update_element(id, ElementUpdate::transform(moved));
                    }
                }
                tracing::trace!("Drag sample ({}, {})", point.x, point.y);
            }
            Gesture::BoxSelecting { start, current } => {
                *current = point;
                let area = Bounds::from_corners(*start, point);
                let ids = editor
                    .current_slide()
                    .map(|s| s.elements_within(&area))
                    .unwrap_or_default();
                editor.set_selected_elements(ids);
            }
            Gesture::Creating { current, .. } => *current = point,
            Gesture::Resizing {
                id,
                handle,
                origin,
                start,
                changed,
            } => {
                let next = resize_transform(start, *handle, point.delta_from(*origin), min_size);
                if editor.element(id).is_some_and(|e| e.transform != next) {
                    *changed |= editor.update_element(id, ElementUpdate::transform(next));
                }
            }
            Gesture::Rotating {
                id,
                center,
                changed,
            } => {
                let snap = event.modifiers.shift.then_some(rotation_step);
                let angle = rotation_angle(*center, point, snap);
                let Some(current) = editor.element(id).map(|e| e.transform) else {
                    return;
                };
                if (current.rotation - angle).abs() > f32::EPSILON {
                    let rotated = Transform {
                        rotation: angle,
                        ..current
                    };
                    *changed |= editor.update_element(id, ElementUpdate::transform(rotated));
                }
            }
        }
    }

    /// Button released.
    pub fn pointer_up(&mut self, editor: &mut Editor, event: PointerEvent) {
        if let Gesture::Creating { tool, origin, .. } = self.gesture {
            self.gesture = Gesture::Idle;
            editor.set_drawing(false);
            let end = editor.screen_to_canvas(event.position());
            Self::create_element(editor, tool, origin, end);
            return;
        }
        self.finish_gesture(editor);
    }

    /// End the current gesture, recording history if it changed the document.
    ///
    /// Creation gestures end without creating anything.
    pub fn finish_gesture(&mut self, editor: &mut Editor) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Dragging { changed: true, .. }
            | Gesture::Resizing { changed: true, .. }
            | Gesture::Rotating { changed: true, .. } => {
                tracing::debug!("Gesture finished with changes");
                editor.save_to_history();
            }
            Gesture::Creating { .. } => editor.set_drawing(false),
            _ => {}
        }
    }

    fn create_element(
        editor: &mut Editor,
        tool: Tool,
        origin: Point,
        end: Point,
    ) -> Option<ElementId> {
        let bounds = Bounds::from_corners(origin, end);
        let min_size = editor.config().min_element_size;
        if bounds.width <= min_size || bounds.height <= min_size {
            tracing::debug!(
                "Creation box {}x{} below minimum, nothing created",
                bounds.width,
                bounds.height
            );
            return None;
        }
        let base = match tool {
            Tool::Text => Element::text(DEFAULT_TEXT_CONTENT),
            Tool::Shape(kind) => Element::shape(kind),
            Tool::Select => return None,
        };
        let z_index = editor.current_slide()?.next_z_index();
        let id = editor.add_element(base.with_bounds(bounds).with_z_index(z_index))?;
        editor.set_selected_elements(vec![id.clone()]);
        Some(id)
    }

    /// Double click: start editing a text element.
    pub fn double_click(&mut self, editor: &mut Editor, event: PointerEvent) -> bool {
        if editor.tool() != Tool::Select {
            return false;
        }
        let point = editor.screen_to_canvas(event.position());
        let Some((id, content)) = editor
            .current_slide()
            .and_then(|s| s.element_at(point))
            .and_then(|e| match &e.kind {
                ElementKind::Text(text) => Some((e.id.clone(), text.content.clone())),
                _ => None,
            })
        else {
            return false;
        };
        self.finish_gesture(editor);
        editor.set_selected_elements(vec![id.clone()]);
        tracing::debug!("Editing text {id}");
        self.text_session = Some(TextEditSession {
            element_id: id,
            draft: content,
        });
        true
    }

    // ----- Text editing -----

    /// Replace the draft of the inline text edit.
    pub fn update_text_draft(&mut self, draft: impl Into<String>) -> bool {
        match &mut self.text_session {
            Some(session) => {
                session.draft = draft.into();
                true
            }
            None => false,
        }
    }

    /// Write the draft to the element and end the edit.
    ///
    /// Returns `true` if the content changed.
    pub fn commit_text_edit(&mut self, editor: &mut Editor) -> bool {
        let Some(session) = self.text_session.take() else {
            return false;
        };
        editor.commit_text(&session.element_id, &session.draft)
    }

    /// End the edit without writing the draft.
    pub fn cancel_text_edit(&mut self) -> bool {
        self.text_session.take().is_some()
    }

    /// The canvas lost focus.
    pub fn blur(&mut self, editor: &mut Editor) {
        self.commit_text_edit(editor);
        self.finish_gesture(editor);
    }

    // ----- Keyboard -----

    /// Key pressed. Returns `true` if the key was consumed.
    pub fn key_down(&mut self, editor: &mut Editor, event: &KeyEvent) -> bool {
        if self.text_session.is_some() {
            return match event.key.as_str() {
                "Enter" if !event.modifiers.shift => {
                    self.commit_text_edit(editor);
                    true
                }
                "Escape" => self.cancel_text_edit(),
                _ => false,
            };
        }
        if event.key == "Escape" && self.gesture != Gesture::Idle {
            self.finish_gesture(editor);
            return true;
        }
        if self.text_input_focused {
            return false;
        }
        let Some(command) = EditorCommand::from_key(event, self.platform) else {
            return false;
        };
        tracing::debug!("Shortcut {command:?}");
        self.execute(editor, command);
        true
    }

    /// Run a command against the current selection.
    ///
    /// Returns `true` if the document, selection or clipboard changed.
    pub fn execute(&mut self, editor: &mut Editor, command: EditorCommand) -> bool {
        let selected = editor.selected_elements().to_vec();
        match command {
            EditorCommand::Copy => editor.copy_elements() > 0,
            EditorCommand::Paste => !editor.paste_elements().is_empty(),
            EditorCommand::Cut => editor.cut_elements() > 0,
            EditorCommand::Delete => editor.delete_elements(&selected) > 0,
            EditorCommand::Undo => editor.undo(),
            EditorCommand::Redo => editor.redo(),
            EditorCommand::SelectAll => editor.select_all() > 0,
            EditorCommand::Duplicate => !editor.duplicate_elements(&selected).is_empty(),
            EditorCommand::Group => editor.group_elements().is_some(),
            EditorCommand::Ungroup => !editor.ungroup_elements().is_empty(),
            EditorCommand::BringForward => selected
                .first()
                .is_some_and(|id| editor.move_element_layer(id, LayerDirection::Up)),
            EditorCommand::SendBackward => selected
                .first()
                .is_some_and(|id| editor.move_element_layer(id, LayerDirection::Down)),
        }
    }

    // ----- Rendering -----

    /// Render description of the current slide with this controller's overlays.
    #[must_use]
    pub fn scene(&self, editor: &Editor) -> Option<SceneDescription> {
        let mut overlays = Overlays {
            editing_text: self
                .text_session
                .as_ref()
                .map(|s| (s.element_id.clone(), s.draft.clone())),
            ..Overlays::default()
        };
        match &self.gesture {
            Gesture::BoxSelecting { start, current } => {
                overlays.marquee = Some(Bounds::from_corners(*start, *current));
            }
            Gesture::Creating {
                tool,
                origin,
                current,
            } => {
                overlays.creation = Some(CreationPreview {
                    tool: tool.name().to_string(),
                    bounds: Bounds::from_corners(*origin, *current),
                });
            }
            Gesture::Dragging { primary, .. } => {
                if let (Some(slide), Some(dragged)) = (editor.current_slide(), editor.element(primary)) {
                    overlays.guides = compute_guides(
                        dragged,
                        slide.elements(),
                        editor.selected_elements(),
                        editor.config(),
                    );
                }
            }
            Gesture::Idle | Gesture::Resizing { .. } | Gesture::Rotating { .. } => {}
        }
        SceneDescription::build(editor, overlays)
    }
}
