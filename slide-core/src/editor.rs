//! The editor state machine.
//!
//! [`Editor`] owns the slides, the canvas state (viewport, selection,
//! clipboard, grid) and the undo history. Every mutation is a method; an
//! operation whose precondition fails does nothing and reports that through
//! its return value instead of an error.
//!
//! ## History
//!
//! Undoable operations record a snapshot *after* they mutate. The first
//! undoable operation on an empty history also records the state it started
//! from, so it can be undone. [`Editor::update_element`] never records; the
//! caller calls [`Editor::save_to_history`] once a continuous gesture ends.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, GroupContent, Transform};
use crate::geometry::{Bounds, Point};
use crate::history::History;
use crate::slide::{duplicate_with_members, Slide, SlideId};
use crate::state::{CanvasState, HistorySnapshot, Tool};

/// Direction of a layer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerDirection {
    /// Toward the viewer.
    Up,
    /// Away from the viewer.
    Down,
}

/// A partial update merged into an element.
///
/// Unset fields are left untouched. A replacement `kind` must have the same
/// element type as the element it is merged into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    /// New transform.
    pub transform: Option<Transform>,
    /// New z-index.
    pub z_index: Option<i32>,
    /// New lock state.
    pub locked: Option<bool>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New opacity, clamped to `[0, 1]`.
    pub opacity: Option<f32>,
    /// New type-specific content.
    pub kind: Option<ElementKind>,
}

impl ElementUpdate {
    /// Update only the transform.
    #[must_use]
    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    /// Also set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Also set the lock state.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    /// Also set the visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Also replace the content.
    #[must_use]
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn apply(self, element: &mut Element) {
        if let Some(transform) = self.transform {
            element.transform = transform;
        }
        if let Some(z_index) = self.z_index {
            element.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(opacity) = self.opacity {
            element.set_opacity(opacity);
        }
        if let Some(kind) = self.kind {
            if kind.type_tag() == element.kind.type_tag() {
                element.kind = kind;
            } else {
                tracing::warn!(
                    "Ignoring {} content for {} element {}",
                    kind.type_tag(),
                    element.kind.type_tag(),
                    element.id
                );
            }
        }
    }
}

/// The editor: document, canvas state, tool and history.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    slides: Vec<Slide>,
    current_slide_id: SlideId,
    canvas_state: CanvasState,
    history: History,
    tool: Tool,
    is_drawing: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor holding one empty slide.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an editor with custom configuration.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let slide = Slide::new("Slide 1");
        Self {
            current_slide_id: slide.id.clone(),
            slides: vec![slide],
            canvas_state: CanvasState::with_grid_size(config.default_grid_size),
            history: History::new(),
            tool: Tool::Select,
            is_drawing: false,
            config,
        }
    }

    /// Create an editor over existing slides; the first becomes current.
    ///
    /// Returns `None` when `slides` is empty.
    #[must_use]
    pub fn with_slides(config: EditorConfig, slides: Vec<Slide>) -> Option<Self> {
        let mut editor = Self::with_config(config);
        editor.replace_slides(slides).then_some(editor)
    }

    // ----- Accessors -----

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// All slides in presentation order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Find a slide.
    #[must_use]
    pub fn slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| &s.id == id)
    }

    /// Position of a slide.
    #[must_use]
    pub fn slide_index(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }

    /// ID of the current slide.
    #[must_use]
    pub fn current_slide_id(&self) -> &SlideId {
        &self.current_slide_id
    }

    /// The current slide.
    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        self.slide(&self.current_slide_id)
    }

    fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.id == self.current_slide_id)
    }

    /// Top-level element of the current slide.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.current_slide()?.element(id)
    }

    /// Viewport, selection, clipboard and grid settings.
    #[must_use]
    pub fn canvas_state(&self) -> &CanvasState {
        &self.canvas_state
    }

    /// Selected element IDs; the first is the primary selection.
    #[must_use]
    pub fn selected_elements(&self) -> &[ElementId] {
        &self.canvas_state.selected_elements
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Whether a creation gesture is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// History cursor, `None` while the history is empty.
    #[must_use]
    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    /// Number of stored history snapshots.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether [`Editor::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Editor::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Independent copy of everything undo/redo restores.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            slides: self.slides.clone(),
            current_slide_id: self.current_slide_id.clone(),
            canvas_state: self.canvas_state.clone(),
        }
    }

    // ----- Tool -----

    /// Switch tools.
    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!("Tool: {tool}");
        self.tool = tool;
    }

    /// Mark a creation gesture as started or finished.
    pub fn set_drawing(&mut self, drawing: bool) {
        self.is_drawing = drawing;
    }

    // ----- History -----

    /// Record the live state as a new history step.
    pub fn save_to_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
        tracing::trace!("History step {:?}", self.history.index());
    }

    /// Record the state before the first change so that change can be undone.
    pub(crate) fn ensure_baseline(&mut self) {
        if self.history.is_empty() {
            self.save_to_history();
        }
    }

    /// Restore the previous history step.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!("Undo to step {:?}", self.history.index());
        true
    }

    /// Restore the next history step.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!("Redo to step {:?}", self.history.index());
        true
    }

    fn restore(&mut self, snapshot: HistorySnapshot) {
        self.slides = snapshot.slides;
        self.current_slide_id = snapshot.current_slide_id;
        self.canvas_state = snapshot.canvas_state;
    }

    /// Replace the whole deck; the first slide becomes current.
    ///
    /// Clears selection and history. Returns `false` (leaving everything
    /// unchanged) when `slides` is empty.
    pub(crate) fn replace_slides(&mut self, slides: Vec<Slide>) -> bool {
        let Some(first) = slides.first() else {
            return false;
        };
        self.current_slide_id = first.id.clone();
        self.slides = slides;
        self.canvas_state.selected_elements.clear();
        self.history.clear();
        true
    }

    pub(crate) fn reset_viewport(&mut self) {
        self.canvas_state.reset_viewport();
    }

    // ----- Slides -----

    /// Append an empty slide and make it current.
    pub fn add_slide(&mut self) -> SlideId {
        self.ensure_baseline();
        let slide = Slide::new(format!("Slide {}", self.slides.len() + 1));
        let id = slide.id.clone();
        self.slides.push(slide);
        self.current_slide_id = id.clone();
        tracing::debug!("Added slide {id}");
        self.save_to_history();
        id
    }

    /// Delete a slide. The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self, id: &SlideId) -> bool {
        if self.slides.len() <= 1 {
            return false;
        }
        let Some(index) = self.slide_index(id) else {
            return false;
        };
        self.ensure_baseline();
        self.slides.remove(index);
        if &self.current_slide_id == id {
            let next = index.min(self.slides.len() - 1);
            self.current_slide_id = self.slides[next].id.clone();
        }
        tracing::debug!("Deleted slide {id}");
        self.save_to_history();
        true
    }

    /// Copy a slide with fresh IDs, insert it after the source and make it current.
    pub fn duplicate_slide(&mut self, id: &SlideId) -> Option<SlideId> {
        let index = self.slide_index(id)?;
        self.ensure_baseline();
        let mut copy = self.slides[index].deep_copy_with_fresh_ids();
        copy.title = format!("{} (Copy)", copy.title);
        let new_id = copy.id.clone();
        self.slides.insert(index + 1, copy);
        self.current_slide_id = new_id.clone();
        tracing::debug!("Duplicated slide {id} as {new_id}");
        self.save_to_history();
        Some(new_id)
    }

    /// Change a slide title.
    pub fn rename_slide(&mut self, id: &SlideId, title: impl Into<String>) -> bool {
        if self.slide_index(id).is_none() {
            return false;
        }
        self.ensure_baseline();
        if let Some(slide) = self.slides.iter_mut().find(|s| &s.id == id) {
            slide.title = title.into();
            slide.touch();
        }
        self.save_to_history();
        true
    }

    /// Switch slides. Resets selection and viewport; not undoable.
    pub fn set_current_slide(&mut self, id: &SlideId) -> bool {
        if self.slide_index(id).is_none() {
            return false;
        }
        self.current_slide_id = id.clone();
        self.canvas_state.selected_elements.clear();
        self.canvas_state.reset_viewport();
        tracing::debug!("Current slide {id}");
        true
    }

    /// Go to the next slide, wrapping around.
    pub fn next_slide(&mut self) -> bool {
        self.step_slide(1)
    }

    /// Go to the previous slide, wrapping around.
    pub fn previous_slide(&mut self) -> bool {
        self.step_slide(self.slides.len().saturating_sub(1))
    }

    fn step_slide(&mut self, step: usize) -> bool {
        let Some(index) = self.slide_index(&self.current_slide_id) else {
            return false;
        };
        let target = self.slides[(index + step) % self.slides.len()].id.clone();
        self.set_current_slide(&target)
    }

    // ----- Elements -----

    /// Append an element to the current slide.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        self.current_slide()?;
        self.ensure_baseline();
        let id = element.id.clone();
        let slide = self.current_slide_mut()?;
        slide.elements.push(element);
        slide.touch();
        tracing::debug!("Added element {id}");
        self.save_to_history();
        Some(id)
    }

    /// Merge a partial update into an element. Records no history.
    ///
    /// Moving or resizing a group carries its members along, scaled to keep
    /// their place inside the group box.
    pub fn update_element(&mut self, id: &ElementId, update: ElementUpdate) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.ensure_baseline();
        let Some(slide) = self.current_slide_mut() else {
            return false;
        };
        let Some(element) = slide.element_mut(id) else {
            return false;
        };
        let before = element.bounds();
        update.apply(element);
        let after = element.clone();
        if after.group_children().is_some() && after.bounds() != before {
            slide.refit_members(&after, &before, &after.bounds());
        }
        slide.touch();
        true
    }

    /// Apply `f` to an element. Records no history.
    pub fn modify_element<F>(&mut self, id: &ElementId, f: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        let Some(mut element) = self.element(id).cloned() else {
            return false;
        };
        f(&mut element);
        element.id = id.clone();
        let update = ElementUpdate {
            transform: Some(element.transform),
            z_index: Some(element.z_index),
            locked: Some(element.locked),
            visible: Some(element.visible),
            opacity: Some(element.opacity),
            kind: Some(element.kind),
        };
        self.update_element(id, update)
    }

    /// Replace a text element's content and record one history step.
    ///
    /// Returns `false` when the element is not text or the content is unchanged.
    pub fn commit_text(&mut self, id: &ElementId, content: &str) -> bool {
        let changed = matches!(
            self.element(id).map(|e| &e.kind),
            Some(ElementKind::Text(text)) if text.content != content
        );
        if !changed {
            return false;
        }
        self.modify_element(id, |element| {
            if let ElementKind::Text(text) = &mut element.kind {
                text.content = content.to_string();
            }
        });
        self.save_to_history();
        true
    }

    /// Delete top-level elements of the current slide and deselect them.
    ///
    /// Returns the number of elements removed.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> usize {
        let count = self
            .current_slide()
            .map_or(0, |s| s.elements.iter().filter(|e| ids.contains(&e.id)).count());
        if count == 0 {
            return 0;
        }
        self.ensure_baseline();
        if let Some(slide) = self.current_slide_mut() {
            slide.elements.retain(|e| !ids.contains(&e.id));
            slide.prune_group_members();
            slide.touch();
        }
        self.canvas_state
            .selected_elements
            .retain(|id| !ids.contains(id));
        tracing::debug!("Deleted {count} element(s)");
        self.save_to_history();
        count
    }

    /// Duplicate top-level elements, offset them and select the copies.
    ///
    /// Copies receive z-indices above the current maximum, in slide order.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let offset = self.config.duplicate_offset;
        let Some(slide) = self.current_slide() else {
            return Vec::new();
        };
        let sources: Vec<&Element> = slide.elements.iter().filter(|e| ids.contains(&e.id)).collect();
        if sources.is_empty() {
            return Vec::new();
        }
        let mut copies = Vec::with_capacity(sources.len());
        let mut members = Vec::new();
        let mut z_index = slide.next_z_index();
        for source in sources {
            let (mut copy, nested) = slide.duplicate_element(source, offset);
            copy.z_index = z_index;
            z_index = z_index.saturating_add(1);
            copies.push(copy);
            members.extend(nested);
        }
        self.insert_copies(copies, members)
    }

    fn insert_copies(&mut self, copies: Vec<Element>, members: Vec<Element>) -> Vec<ElementId> {
        self.ensure_baseline();
        let new_ids: Vec<ElementId> = copies.iter().map(|e| e.id.clone()).collect();
        if let Some(slide) = self.current_slide_mut() {
            slide.elements.extend(copies);
            slide.group_members.extend(members);
            slide.touch();
        }
        self.canvas_state.selected_elements.clone_from(&new_ids);
        tracing::debug!("Inserted {} copied element(s)", new_ids.len());
        self.save_to_history();
        new_ids
    }

    /// Swap z-index with the nearest element above or below.
    ///
    /// Ties between equal z-indices are broken by slide order. An element
    /// already at the extreme is left alone.
    pub fn move_element_layer(&mut self, id: &ElementId, direction: LayerDirection) -> bool {
        let Some(slide) = self.current_slide() else {
            return false;
        };
        let Some(element) = slide.element(id) else {
            return false;
        };
        let z = element.z_index;
        let candidates = slide.elements.iter().filter(|e| &e.id != id);
        let neighbor = match direction {
            LayerDirection::Up => candidates
                .filter(|e| e.z_index > z)
                .fold(None::<&Element>, |best, e| match best {
                    Some(b) if b.z_index <= e.z_index => Some(b),
                    _ => Some(e),
                }),
            LayerDirection::Down => candidates
                .filter(|e| e.z_index < z)
                .fold(None::<&Element>, |best, e| match best {
                    Some(b) if b.z_index >= e.z_index => Some(b),
                    _ => Some(e),
                }),
        };
        let Some(neighbor) = neighbor else {
            return false;
        };
        let (neighbor_id, neighbor_z) = (neighbor.id.clone(), neighbor.z_index);

        self.ensure_baseline();
        if let Some(slide) = self.current_slide_mut() {
            if let Some(other) = slide.element_mut(&neighbor_id) {
                other.z_index = z;
            }
            if let Some(element) = slide.element_mut(id) {
                element.z_index = neighbor_z;
            }
            slide.touch();
        }
        tracing::debug!("Moved {id} {direction:?} to z {neighbor_z}");
        self.save_to_history();
        true
    }

    // ----- Clipboard -----

    /// Copy the selected elements to the clipboard. Not undoable.
    ///
    /// Returns the number of elements copied; with nothing selected the
    /// clipboard is kept.
    pub fn copy_elements(&mut self) -> usize {
        let Some(slide) = self.current_slide() else {
            return 0;
        };
        let selected = &self.canvas_state.selected_elements;
        let copied: Vec<Element> = slide
            .elements
            .iter()
            .filter(|e| selected.contains(&e.id))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        let members: Vec<Element> = copied.iter().flat_map(|e| slide.collect_members(e)).collect();
        let count = copied.len();
        self.canvas_state.clipboard = copied;
        self.canvas_state.clipboard_members = members;
        tracing::debug!("Copied {count} element(s)");
        count
    }

    /// Paste the clipboard onto the current slide and select the pasted elements.
    pub fn paste_elements(&mut self) -> Vec<ElementId> {
        let offset = self.config.duplicate_offset;
        let Some(slide) = self.current_slide() else {
            return Vec::new();
        };
        if self.canvas_state.clipboard.is_empty() {
            return Vec::new();
        }
        let pool = &self.canvas_state.clipboard_members;
        let mut copies = Vec::with_capacity(self.canvas_state.clipboard.len());
        let mut members = Vec::new();
        let mut z_index = slide.next_z_index();
        for source in &self.canvas_state.clipboard {
            let (mut copy, nested) = duplicate_with_members(source, pool, offset);
            copy.z_index = z_index;
            z_index = z_index.saturating_add(1);
            copies.push(copy);
            members.extend(nested);
        }
        self.insert_copies(copies, members)
    }

    /// Copy then delete the selection.
    pub fn cut_elements(&mut self) -> usize {
        if self.copy_elements() == 0 {
            return 0;
        }
        let selected = self.canvas_state.selected_elements.clone();
        self.delete_elements(&selected)
    }

    // ----- Selection -----

    /// Replace the selection. Unknown and repeated IDs are dropped.
    pub fn set_selected_elements(&mut self, ids: Vec<ElementId>) {
        let mut selection: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.element(&id).is_some() && !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.canvas_state.selected_elements = selection;
    }

    /// Select every top-level element of the current slide.
    pub fn select_all(&mut self) -> usize {
        let ids: Vec<ElementId> = self
            .current_slide()
            .map(|s| s.elements.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default();
        let count = ids.len();
        self.canvas_state.selected_elements = ids;
        count
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.canvas_state.selected_elements.clear();
    }

    /// Union bounds of the selected elements.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        self.current_slide()?
            .selection_bounds(&self.canvas_state.selected_elements)
    }

    // ----- Groups -----

    /// Replace the selected elements (at least two) with one group.
    pub fn group_elements(&mut self) -> Option<ElementId> {
        let slide = self.current_slide()?;
        let selected = &self.canvas_state.selected_elements;
        let members: Vec<Element> = slide
            .elements
            .iter()
            .filter(|e| selected.contains(&e.id))
            .cloned()
            .collect();
        if members.len() < 2 {
            return None;
        }
        let bounds = slide.selection_bounds(selected)?;
        let z_index = members.iter().map(|e| e.z_index).max().unwrap_or_default();
        let group = Element::new(ElementKind::Group(GroupContent {
            children: members.iter().map(|e| e.id.clone()).collect(),
        }))
        .with_bounds(bounds)
        .with_z_index(z_index);
        let group_id = group.id.clone();

        self.ensure_baseline();
        let slide = self.current_slide_mut()?;
        slide.elements.retain(|e| !members.iter().any(|m| m.id == e.id));
        tracing::debug!("Grouped {} element(s) into {group_id}", members.len());
        slide.group_members.extend(members);
        slide.elements.push(group);
        slide.touch();
        self.canvas_state.selected_elements = vec![group_id.clone()];
        self.save_to_history();
        Some(group_id)
    }

    /// Dissolve the selected groups and select their restored members.
    pub fn ungroup_elements(&mut self) -> Vec<ElementId> {
        let selected = self.canvas_state.selected_elements.clone();
        let Some(slide) = self.current_slide() else {
            return Vec::new();
        };
        let groups: Vec<Element> = slide
            .elements
            .iter()
            .filter(|e| selected.contains(&e.id) && e.group_children().is_some())
            .cloned()
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        self.ensure_baseline();
        let mut restored_ids = Vec::new();
        if let Some(slide) = self.current_slide_mut() {
            for group in &groups {
                slide.elements.retain(|e| e.id != group.id);
                for child in group.group_children().unwrap_or_default() {
                    let Some(pos) = slide.group_members.iter().position(|m| &m.id == child) else {
                        continue;
                    };
                    let member = slide.group_members.remove(pos);
                    restored_ids.push(member.id.clone());
                    slide.elements.push(member);
                }
            }
            slide.prune_group_members();
            slide.touch();
        }
        tracing::debug!(
            "Ungrouped {} group(s), restored {} element(s)",
            groups.len(),
            restored_ids.len()
        );
        self.canvas_state.selected_elements.clone_from(&restored_ids);
        self.save_to_history();
        restored_ids
    }

    // ----- Viewport and grid -----

    /// Set the zoom factor, clamped to the configured range. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let Some(zoom) = self.config.clamp_zoom(zoom) else {
            return false;
        };
        self.canvas_state.zoom = zoom;
        true
    }

    /// Multiply the zoom factor.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        self.set_zoom(self.canvas_state.zoom * factor)
    }

    /// Set the pan offset.
    pub fn set_pan(&mut self, pan: Point) {
        self.canvas_state.pan = pan;
    }

    /// Convert a screen position to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.canvas_state.screen_to_canvas(screen)
    }

    /// Show or hide the grid.
    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.canvas_state.grid_enabled = enabled;
    }

    /// Enable or disable grid snapping for drags.
    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.canvas_state.snap_to_grid = snap;
    }

    /// Set the grid spacing. Non-positive and non-finite sizes are ignored.
    pub fn set_grid_size(&mut self, size: f32) -> bool {
        if !size.is_finite() || size <= 0.0 {
            return false;
        }
        self.canvas_state.grid_size = size;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    fn rect(id: &str, x: f32, y: f32, z: i32) -> Element {
        Element::shape(ShapeKind::Rectangle)
            .with_id(id)
            .with_bounds(Bounds::new(x, y, 10.0, 10.0))
            .with_z_index(z)
    }

    fn z_of(editor: &Editor, id: &str) -> Option<i32> {
        editor.element(&id.into()).map(|e| e.z_index)
    }

    #[test]
    fn test_first_change_is_undoable() {
        let mut editor = Editor::new();
        assert_eq!(editor.history_index(), None);

        editor.add_element(rect("a", 0.0, 0.0, 0));
        assert_eq!(editor.history_index(), Some(1));
        assert!(editor.undo());
        assert!(editor.current_slide().expect("slide").elements().is_empty());
        assert!(!editor.undo());
        assert!(editor.redo());
        assert!(editor.element(&"a".into()).is_some());
    }

    #[test]
    fn test_update_element_records_no_history() {
        let mut editor = Editor::new();
        editor.add_element(rect("a", 0.0, 0.0, 0));
        let len = editor.history_len();
        let moved = Transform::from_bounds(Bounds::new(40.0, 40.0, 10.0, 10.0));
        assert!(editor.update_element(&"a".into(), ElementUpdate::transform(moved)));
        assert_eq!(editor.history_len(), len);
        assert!(!editor.update_element(&"missing".into(), ElementUpdate::default()));
    }

    #[test]
    fn test_update_rejects_foreign_content() {
        let mut editor = Editor::new();
        editor.add_element(rect("a", 0.0, 0.0, 0));
        let text = Element::text("x").kind;
        editor.update_element(&"a".into(), ElementUpdate::default().with_kind(text));
        assert!(!editor.element(&"a".into()).expect("a").is_text());
    }

    #[test]
    fn test_layer_moves_swap_with_nearest_neighbor() {
        let mut editor = Editor::new();
        editor.add_element(rect("a", 0.0, 0.0, 0));
        editor.add_element(rect("b", 0.0, 0.0, 5));
        editor.add_element(rect("c", 0.0, 0.0, 9));

        assert!(editor.move_element_layer(&"a".into(), LayerDirection::Up));
        assert_eq!(z_of(&editor, "a"), Some(5));
        assert_eq!(z_of(&editor, "b"), Some(0));

        assert!(!editor.move_element_layer(&"c".into(), LayerDirection::Up));
        assert!(!editor.move_element_layer(&"b".into(), LayerDirection::Down));
        assert!(editor.move_element_layer(&"c".into(), LayerDirection::Down));
        assert_eq!(z_of(&editor, "c"), Some(5));
        assert_eq!(z_of(&editor, "a"), Some(9));
    }

    #[test]
    fn test_slide_navigation_wraps() {
        let mut editor = Editor::new();
        let first = editor.current_slide_id().clone();
        let second = editor.add_slide();
        assert_eq!(editor.current_slide_id(), &second);
        assert!(editor.next_slide());
        assert_eq!(editor.current_slide_id(), &first);
        assert!(editor.previous_slide());
        assert_eq!(editor.current_slide_id(), &second);
    }

    #[test]
    fn test_set_current_slide_resets_viewport_without_history() {
        let mut editor = Editor::new();
        let first = editor.current_slide_id().clone();
        editor.add_slide();
        let steps = editor.history_len();
        editor.set_zoom(3.0);
        editor.set_pan(Point::new(10.0, 10.0));

        assert!(editor.set_current_slide(&first));
        assert!((editor.canvas_state().zoom - 1.0).abs() < f32::EPSILON);
        assert_eq!(editor.canvas_state().pan, Point::ORIGIN);
        assert_eq!(editor.history_len(), steps);
        assert!(!editor.set_current_slide(&SlideId::new("nope")));
    }

    #[test]
    fn test_grid_size_must_be_positive() {
        let mut editor = Editor::new();
        assert!(!editor.set_grid_size(0.0));
        assert!(!editor.set_grid_size(f32::INFINITY));
        assert!(editor.set_grid_size(25.0));
        assert!((editor.canvas_state().grid_size - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_moving_a_group_moves_its_members() {
        let mut editor = Editor::new();
        editor.add_element(rect("a", 0.0, 0.0, 0));
        editor.add_element(rect("b", 50.0, 50.0, 1));
        editor.select_all();
        let group = editor.group_elements().expect("grouped");

        let moved = editor.element(&group).expect("group").transform.translated(5.0, 0.0);
        editor.update_element(&group, ElementUpdate::transform(moved));
        editor.ungroup_elements();

        let a = editor.element(&"a".into()).expect("a");
        assert!((a.transform.x - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_commit_text_records_only_real_changes() {
        let mut editor = Editor::new();
        let id = editor
            .add_element(Element::text("Hello"))
            .expect("added");
        let steps = editor.history_len();
        assert!(!editor.commit_text(&id, "Hello"));
        assert!(editor.commit_text(&id, "World"));
        assert_eq!(editor.history_len(), steps + 1);
        assert!(editor.undo());
        let restored = editor.element(&id).expect("text");
        assert!(matches!(&restored.kind, ElementKind::Text(t) if t.content == "Hello"));
    }
}
