//! Slides: ordered element lists plus the pool of grouped members.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{generate_id, Element, ElementId, ElementKind};
use crate::geometry::{union_all, Bounds, Point};

/// Unique identifier for a slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    /// Create a fresh slide identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id("slide"))
    }

    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How the slide background is painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum BackgroundKind {
    #[default]
    Color,
    Image,
    Gradient,
}

/// Slide background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    /// Background type.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Color, image reference or gradient definition depending on `kind`.
    pub value: String,
}

impl Default for Background {
    fn default() -> Self {
        Self::color("#ffffff")
    }
}

impl Background {
    /// A solid color background.
    #[must_use]
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.into(),
        }
    }
}

/// A slide of positioned elements.
///
/// `elements` is the top-level render list in creation order (paint order is
/// given by `z_index`). Elements absorbed into a group live in
/// `group_members` until the group is dissolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique identifier.
    pub id: SlideId,
    /// Display title.
    pub title: String,
    pub(crate) elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) group_members: Vec<Element>,
    /// Background fill.
    #[serde(default)]
    pub background: Background,
    /// Optional thumbnail reference, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Slide {
    /// Create an empty slide with a white background.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SlideId::generate(),
            title: title.into(),
            elements: Vec::new(),
            group_members: Vec::new(),
            background: Background::default(),
            thumbnail: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the top-level elements.
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Replace the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<SlideId>) -> Self {
        self.id = id.into();
        self
    }

    /// Top-level elements in creation order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements currently absorbed into groups.
    #[must_use]
    pub fn group_members(&self) -> &[Element] {
        &self.group_members
    }

    /// Find a top-level element.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Find an element absorbed into a group.
    #[must_use]
    pub fn group_member(&self, id: &ElementId) -> Option<&Element> {
        self.group_members.iter().find(|e| &e.id == id)
    }

    /// Check whether an ID is used anywhere on the slide.
    #[must_use]
    pub fn contains_id(&self, id: &ElementId) -> bool {
        self.element(id).is_some() || self.group_member(id).is_some()
    }

    /// Highest z-index among top-level elements.
    #[must_use]
    pub fn max_z_index(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    /// The z-index a newly added element should receive to paint on top.
    #[must_use]
    pub fn next_z_index(&self) -> i32 {
        self.max_z_index().map_or(0, |z| z.saturating_add(1))
    }

    /// Top-level elements sorted by z-index; ties keep creation order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Topmost visible element under `point`.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<&Element> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.visible && e.contains_point(point))
    }

    /// Visible elements lying entirely inside `area`, in creation order.
    /// Rotated elements must fit with their painted footprint.
    #[must_use]
    pub fn elements_within(&self, area: &Bounds) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.visible && area.contains_bounds(&e.visual_bounds()))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Union bounds of the listed top-level elements.
    #[must_use]
    pub fn selection_bounds(&self, ids: &[ElementId]) -> Option<Bounds> {
        union_all(
            self.elements
                .iter()
                .filter(|e| ids.contains(&e.id))
                .map(Element::bounds),
        )
    }

    /// Refresh the modification time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Deep copy of `element` with fresh IDs, moved by `offset`.
    ///
    /// For groups the members are copied as well; the returned vector holds
    /// the new members, to be placed into the member pool alongside the copy.
    #[must_use]
    pub fn duplicate_element(&self, element: &Element, offset: f32) -> (Element, Vec<Element>) {
        duplicate_with_members(element, &self.group_members, offset)
    }

    /// Members reachable from `element`, depth first.
    #[must_use]
    pub fn collect_members(&self, element: &Element) -> Vec<Element> {
        let mut collected = Vec::new();
        let mut pending: Vec<ElementId> = element
            .group_children()
            .map(<[ElementId]>::to_vec)
            .unwrap_or_default();
        while let Some(id) = pending.pop() {
            if collected.iter().any(|m: &Element| m.id == id) {
                continue;
            }
            if let Some(member) = self.group_member(&id) {
                if let Some(children) = member.group_children() {
                    pending.extend(children.iter().cloned());
                }
                collected.push(member.clone());
            }
        }
        collected
    }

    /// Deep copy with a new slide ID and fresh IDs for every element.
    ///
    /// Group references are remapped consistently to the new member IDs.
    #[must_use]
    pub fn deep_copy_with_fresh_ids(&self) -> Self {
        let mut copy = self.clone();
        copy.id = SlideId::generate();
        copy.restamp_element_ids();
        let now = Utc::now();
        copy.created_at = now;
        copy.updated_at = now;
        copy
    }

    /// Give every element a fresh ID, remapping group references.
    pub(crate) fn restamp_element_ids(&mut self) {
        let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
        for element in self.elements.iter_mut().chain(self.group_members.iter_mut()) {
            let fresh = ElementId::generate(element.kind.type_tag());
            remap.insert(std::mem::replace(&mut element.id, fresh.clone()), fresh);
        }
        for element in self.elements.iter_mut().chain(self.group_members.iter_mut()) {
            if let ElementKind::Group(group) = &mut element.kind {
                for child in &mut group.children {
                    if let Some(fresh) = remap.get(child) {
                        *child = fresh.clone();
                    }
                }
            }
        }
    }

    /// Map every member reachable from `group` from the box `from` onto the
    /// box `to`, so members keep their relative place when a group is moved
    /// or resized.
    pub(crate) fn refit_members(&mut self, group: &Element, from: &Bounds, to: &Bounds) {
        let ids: Vec<ElementId> = self.collect_members(group).into_iter().map(|m| m.id).collect();
        for member in &mut self.group_members {
            if ids.contains(&member.id) {
                member.transform = member.transform.remapped(from, to);
            }
        }
    }

    /// Drop members no longer reachable from a top-level group.
    pub(crate) fn prune_group_members(&mut self) {
        let mut reachable: HashSet<ElementId> = HashSet::new();
        let mut pending: Vec<ElementId> = self
            .elements
            .iter()
            .filter_map(Element::group_children)
            .flatten()
            .cloned()
            .collect();
        while let Some(id) = pending.pop() {
            if !reachable.insert(id.clone()) {
                continue;
            }
            if let Some(children) = self.group_member(&id).and_then(Element::group_children) {
                pending.extend(children.iter().cloned());
            }
        }
        self.group_members.retain(|m| reachable.contains(&m.id));
    }

    /// Move top-level elements referenced by a group into the member pool.
    ///
    /// Documents may list group children as sibling elements of the group;
    /// the editor keeps them in `group_members`. A member already in the
    /// pool wins over a top-level element with the same ID. Returns the
    /// number of elements moved.
    pub(crate) fn absorb_group_children(&mut self) -> usize {
        let referenced: HashSet<ElementId> = self
            .elements
            .iter()
            .chain(self.group_members.iter())
            .filter_map(|e| {
                e.group_children()
                    .map(|children| children.iter().filter(move |c| **c != e.id))
            })
            .flatten()
            .cloned()
            .collect();
        if referenced.is_empty() {
            return 0;
        }

        let pooled: HashSet<ElementId> = self.group_members.iter().map(|m| m.id.clone()).collect();
        let (absorbed, kept): (Vec<Element>, Vec<Element>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| referenced.contains(&e.id));
        self.elements = kept;
        let moved = absorbed.len();
        self.group_members.extend(
            absorbed
                .into_iter()
                .filter(|e| !pooled.contains(&e.id)),
        );
        moved
    }

    /// Remove group references to members that do not exist.
    ///
    /// Returns the number of references removed.
    pub(crate) fn drop_dangling_children(&mut self) -> usize {
        let known: HashSet<ElementId> = self.group_members.iter().map(|m| m.id.clone()).collect();
        let mut removed = 0;
        for element in self.elements.iter_mut().chain(self.group_members.iter_mut()) {
            if let ElementKind::Group(group) = &mut element.kind {
                let before = group.children.len();
                group.children.retain(|c| known.contains(c));
                removed += before - group.children.len();
            }
        }
        removed
    }
}

/// Deep copy of `element` with fresh IDs, resolving group members from `pool`.
///
/// Returns the copy and the copied members (with remapped references).
#[must_use]
pub fn duplicate_with_members(
    element: &Element,
    pool: &[Element],
    offset: f32,
) -> (Element, Vec<Element>) {
    let mut copy = element.duplicate(offset);
    let mut members = Vec::new();
    if let ElementKind::Group(group) = &mut copy.kind {
        for child in &mut group.children {
            if let Some(member) = pool.iter().find(|m| &m.id == child) {
                let (member_copy, nested) = duplicate_with_members(member, pool, offset);
                *child = member_copy.id.clone();
                members.push(member_copy);
                members.extend(nested);
            }
        }
    }
    (copy, members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{GroupContent, ShapeKind};

    fn rect(id: &str, x: f32, y: f32, z: i32) -> Element {
        Element::shape(ShapeKind::Rectangle)
            .with_id(id)
            .with_bounds(Bounds::new(x, y, 10.0, 10.0))
            .with_z_index(z)
    }

    fn grouped_slide() -> Slide {
        let group = Element::new(ElementKind::Group(GroupContent {
            children: vec!["a".into(), "b".into()],
        }))
        .with_id("g");
        let mut slide = Slide::new("Grouped").with_elements(vec![group]);
        slide.group_members = vec![rect("a", 0.0, 0.0, 0), rect("b", 50.0, 50.0, 1)];
        slide
    }

    #[test]
    fn test_paint_order_is_stable_for_equal_z() {
        let slide = Slide::new("S").with_elements(vec![
            rect("top", 0.0, 0.0, 5),
            rect("first", 0.0, 0.0, 1),
            rect("second", 0.0, 0.0, 1),
        ]);
        let ids: Vec<&str> = slide.paint_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "top"]);
        assert_eq!(slide.next_z_index(), 6);
        assert_eq!(Slide::new("Empty").next_z_index(), 0);
    }

    #[test]
    fn test_hit_testing_prefers_topmost_visible() {
        let mut hidden = rect("hidden", 0.0, 0.0, 9);
        hidden.visible = false;
        let slide = Slide::new("S").with_elements(vec![
            rect("high", 0.0, 0.0, 3),
            rect("low", 0.0, 0.0, 1),
            hidden,
        ]);
        let hit = slide.element_at(Point::new(5.0, 5.0)).map(|e| e.id.as_str());
        assert_eq!(hit, Some("high"));
        assert!(slide.element_at(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_elements_within_requires_containment() {
        let slide = Slide::new("S").with_elements(vec![
            rect("inside", 10.0, 10.0, 0),
            rect("partial", 95.0, 95.0, 0),
        ]);
        let ids = slide.elements_within(&Bounds::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(ids, vec![ElementId::from("inside")]);
    }

    /// A 200x20 bar turned upright: painted over x 90..110, y 0..200.
    fn upright_bar() -> Element {
        let mut bar = Element::shape(ShapeKind::Rectangle)
            .with_id("bar")
            .with_bounds(Bounds::new(0.0, 90.0, 200.0, 20.0));
        bar.transform.rotation = 90.0;
        bar
    }

    #[test]
    fn test_hit_test_honors_rotation() {
        let slide = Slide::new("S").with_elements(vec![upright_bar()]);
        let hit = slide.element_at(Point::new(100.0, 10.0)).map(|e| e.id.as_str());
        assert_eq!(hit, Some("bar"));
        assert!(slide.element_at(Point::new(5.0, 100.0)).is_none());
    }

    #[test]
    fn test_box_select_uses_painted_footprint() {
        let slide = Slide::new("S").with_elements(vec![upright_bar()]);
        assert!(slide
            .elements_within(&Bounds::new(-10.0, 80.0, 220.0, 40.0))
            .is_empty());
        let ids = slide.elements_within(&Bounds::new(85.0, -5.0, 30.0, 210.0));
        assert_eq!(ids, vec![ElementId::from("bar")]);
    }

    #[test]
    fn test_sibling_children_move_into_pool() {
        let group = Element::new(ElementKind::Group(GroupContent {
            children: vec![ElementId::from("a"), ElementId::from("b"), ElementId::from("gone")],
        }))
        .with_id("g");
        let mut slide = Slide::new("S").with_elements(vec![
            rect("a", 0.0, 0.0, 0),
            group,
            rect("b", 50.0, 50.0, 1),
            rect("loose", 80.0, 80.0, 2),
        ]);

        assert_eq!(slide.absorb_group_children(), 2);
        assert_eq!(slide.drop_dangling_children(), 1);
        let top: Vec<&str> = slide.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(top, ["g", "loose"]);
        assert!(slide.group_member(&ElementId::from("a")).is_some());
        assert!(slide.group_member(&ElementId::from("b")).is_some());
    }

    #[test]
    fn test_selection_bounds() {
        let slide = Slide::new("S").with_elements(vec![
            rect("a", 0.0, 0.0, 0),
            rect("b", 50.0, 50.0, 1),
        ]);
        let bounds = slide.selection_bounds(&["a".into(), "b".into()]);
        assert_eq!(bounds, Some(Bounds::new(0.0, 0.0, 60.0, 60.0)));
        assert_eq!(slide.selection_bounds(&[]), None);
    }

    #[test]
    fn test_duplicate_group_remaps_members() {
        let slide = grouped_slide();
        let group = slide.element(&"g".into()).expect("group").clone();
        let (copy, members) = slide.duplicate_element(&group, 20.0);

        let children = copy.group_children().expect("group copy");
        assert_eq!(children.len(), 2);
        assert_eq!(members.len(), 2);
        for (child, member) in children.iter().zip(&members) {
            assert_eq!(child, &member.id);
            assert_ne!(child.as_str(), "a");
            assert_ne!(child.as_str(), "b");
        }
        assert!((members[1].transform.x - 70.0).abs() < f32::EPSILON);
        assert_eq!(slide.collect_members(&group).len(), 2);
    }

    #[test]
    fn test_deep_copy_restamps_every_id() {
        let slide = grouped_slide();
        let copy = slide.deep_copy_with_fresh_ids();
        assert_ne!(copy.id, slide.id);
        let children = copy.elements()[0].group_children().expect("group");
        for child in children {
            assert!(copy.group_member(child).is_some());
            assert!(!slide.contains_id(child));
        }
    }

    #[test]
    fn test_prune_and_dangling_children() {
        let mut slide = grouped_slide();
        slide.group_members.push(rect("orphan", 0.0, 0.0, 0));
        slide.prune_group_members();
        assert_eq!(slide.group_members().len(), 2);

        slide.group_members.retain(|m| m.id.as_str() != "b");
        assert_eq!(slide.drop_dangling_children(), 1);
        assert_eq!(slide.elements()[0].group_children().map(<[_]>::len), Some(1));
    }
}
