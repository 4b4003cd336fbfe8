//! Alignment guides shown while dragging.
//!
//! Guides are advisory: they are drawn but never move anything.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId};
use crate::geometry::Bounds;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at a fixed x.
    Vertical,
    /// A horizontal line at a fixed y.
    Horizontal,
}

/// Which edges of the dragged element and the sibling line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuideAlignment {
    /// Left/left or top/top.
    Start,
    /// Right/right or bottom/bottom.
    End,
    /// Center/center.
    Center,
    /// Dragged left/top touches sibling right/bottom.
    StartToEnd,
    /// Dragged right/bottom touches sibling left/top.
    EndToStart,
}

impl GuideAlignment {
    /// Edge-touching alignments get the shorter padding.
    #[must_use]
    pub const fn is_edge_touching(self) -> bool {
        matches!(self, Self::StartToEnd | Self::EndToStart)
    }
}

/// A guide line segment in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Line orientation.
    pub orientation: GuideOrientation,
    /// The relationship that produced the guide.
    pub alignment: GuideAlignment,
    /// x of a vertical guide, y of a horizontal one.
    pub position: f32,
    /// Start of the segment along the line.
    pub start: f32,
    /// End of the segment along the line.
    pub end: f32,
}

impl Guide {
    /// Endpoints as `(x1, y1, x2, y2)`.
    #[must_use]
    pub fn endpoints(&self) -> (f32, f32, f32, f32) {
        match self.orientation {
            GuideOrientation::Vertical => (self.position, self.start, self.position, self.end),
            GuideOrientation::Horizontal => (self.start, self.position, self.end, self.position),
        }
    }
}

/// Guides between `dragged` and every element not in `selected`.
#[must_use]
pub fn compute_guides(
    dragged: &Element,
    elements: &[Element],
    selected: &[ElementId],
    config: &EditorConfig,
) -> Vec<Guide> {
    let moving = dragged.bounds();
    elements
        .iter()
        .filter(|e| !selected.contains(&e.id) && e.id != dragged.id)
        .flat_map(|other| guides_between(&moving, &other.bounds(), config))
        .collect()
}

/// Guides between two boxes.
#[must_use]
pub fn guides_between(moving: &Bounds, other: &Bounds, config: &EditorConfig) -> Vec<Guide> {
    use GuideAlignment::{Center, End, EndToStart, Start, StartToEnd};

    let vertical = [
        (moving.x, other.x, Start),
        (moving.right(), other.right(), End),
        (moving.center_x(), other.center_x(), Center),
        (moving.x, other.right(), StartToEnd),
        (moving.right(), other.x, EndToStart),
    ];
    let horizontal = [
        (moving.y, other.y, Start),
        (moving.bottom(), other.bottom(), End),
        (moving.center_y(), other.center_y(), Center),
        (moving.y, other.bottom(), StartToEnd),
        (moving.bottom(), other.y, EndToStart),
    ];

    let padding = |alignment: GuideAlignment| {
        if alignment.is_edge_touching() {
            config.edge_guide_padding
        } else {
            config.primary_guide_padding
        }
    };

    let mut guides = Vec::new();
    for (mine, theirs, alignment) in vertical {
        if (mine - theirs).abs() < config.snap_threshold {
            let pad = padding(alignment);
            guides.push(Guide {
                orientation: GuideOrientation::Vertical,
                alignment,
                position: theirs,
                start: moving.y.min(other.y) - pad,
                end: moving.bottom().max(other.bottom()) + pad,
            });
        }
    }
    for (mine, theirs, alignment) in horizontal {
        if (mine - theirs).abs() < config.snap_threshold {
            let pad = padding(alignment);
            guides.push(Guide {
                orientation: GuideOrientation::Horizontal,
                alignment,
                position: theirs,
                start: moving.x.min(other.x) - pad,
                end: moving.right().max(other.right()) + pad,
            });
        }
    }
    guides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    #[test]
    fn test_left_alignment_within_threshold() {
        let config = EditorConfig::default();
        let moving = Bounds::new(103.0, 200.0, 50.0, 50.0);
        let other = Bounds::new(100.0, 0.0, 80.0, 40.0);
        let guides = guides_between(&moving, &other, &config);

        let left = guides
            .iter()
            .find(|g| g.alignment == GuideAlignment::Start)
            .expect("left guide");
        assert_eq!(left.orientation, GuideOrientation::Vertical);
        assert!((left.position - 100.0).abs() < f32::EPSILON);
        assert!((left.start - (-30.0)).abs() < f32::EPSILON);
        assert!((left.end - 280.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = EditorConfig::default();
        let moving = Bounds::new(108.0, 500.0, 10.0, 10.0);
        let other = Bounds::new(100.0, 0.0, 200.0, 10.0);
        assert!(guides_between(&moving, &other, &config).is_empty());
    }

    #[test]
    fn test_edge_touching_uses_short_padding() {
        let config = EditorConfig::default();
        let moving = Bounds::new(0.0, 100.0, 50.0, 50.0);
        let other = Bounds::new(500.0, 151.0, 50.0, 50.0);
        let guides = guides_between(&moving, &other, &config);
        assert_eq!(guides.len(), 1);
        let guide = guides[0];
        assert_eq!(guide.alignment, GuideAlignment::EndToStart);
        assert_eq!(guide.endpoints(), (-20.0, 151.0, 570.0, 151.0));
    }

    #[test]
    fn test_selected_elements_are_ignored() {
        let config = EditorConfig::default();
        let dragged = Element::shape(ShapeKind::Rectangle).with_id("drag");
        let twin = Element::shape(ShapeKind::Rectangle).with_id("twin");
        let elements = vec![dragged.clone(), twin.clone()];

        assert!(!compute_guides(&dragged, &elements, &["drag".into()], &config).is_empty());
        let selected = ["drag".into(), "twin".into()];
        assert!(compute_guides(&dragged, &elements, &selected, &config).is_empty());
    }
}
