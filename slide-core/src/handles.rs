//! Resize and rotation handles of a single selected element.
//!
//! Handle geometry is expressed in document units but scaled by `1 / zoom`,
//! so handles keep a constant size on screen.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::Transform;
use crate::geometry::{rotate_point, Bounds, Point};

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top-left corner.
    #[serde(rename = "nw")]
    NorthWest,
    /// Top edge midpoint.
    #[serde(rename = "n")]
    North,
    /// Top-right corner.
    #[serde(rename = "ne")]
    NorthEast,
    /// Right edge midpoint.
    #[serde(rename = "e")]
    East,
    /// Bottom-right corner.
    #[serde(rename = "se")]
    SouthEast,
    /// Bottom edge midpoint.
    #[serde(rename = "s")]
    South,
    /// Bottom-left corner.
    #[serde(rename = "sw")]
    SouthWest,
    /// Left edge midpoint.
    #[serde(rename = "w")]
    West,
}

impl ResizeHandle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [Self; 8] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
    ];

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub const fn moves_north(self) -> bool {
        matches!(self, Self::NorthWest | Self::North | Self::NorthEast)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub const fn moves_south(self) -> bool {
        matches!(self, Self::SouthWest | Self::South | Self::SouthEast)
    }

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub const fn moves_west(self) -> bool {
        matches!(self, Self::NorthWest | Self::West | Self::SouthWest)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub const fn moves_east(self) -> bool {
        matches!(self, Self::NorthEast | Self::East | Self::SouthEast)
    }

    /// CSS cursor name shown over the handle.
    #[must_use]
    pub const fn cursor(self) -> &'static str {
        match self {
            Self::NorthWest => "nw-resize",
            Self::North => "n-resize",
            Self::NorthEast => "ne-resize",
            Self::East => "e-resize",
            Self::SouthEast => "se-resize",
            Self::South => "s-resize",
            Self::SouthWest => "sw-resize",
            Self::West => "w-resize",
        }
    }

    /// Anchor point of the handle on the element box.
    #[must_use]
    pub fn anchor(self, bounds: &Bounds) -> Point {
        let x = if self.moves_west() {
            bounds.x
        } else if self.moves_east() {
            bounds.right()
        } else {
            bounds.center_x()
        };
        let y = if self.moves_north() {
            bounds.y
        } else if self.moves_south() {
            bounds.bottom()
        } else {
            bounds.center_y()
        };
        Point::new(x, y)
    }
}

/// A handle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// A resize handle.
    Resize(ResizeHandle),
    /// The rotation handle.
    Rotate,
}

/// The rotation knob above the element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationHandle {
    /// Knob center.
    pub center: Point,
    /// Knob radius.
    pub radius: f32,
    /// Start of the stem, on the element's top edge.
    pub stem_start: Point,
    /// End of the stem, just below the knob.
    pub stem_end: Point,
}

/// Handle positions for one element at one zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleLayout {
    /// Resize handle squares.
    pub resize: Vec<(ResizeHandle, Bounds)>,
    /// Rotation knob.
    pub rotation: RotationHandle,
}

impl HandleLayout {
    /// Lay out the handles for `transform`. Anchors follow the element's
    /// rotation; the squares themselves stay axis-aligned.
    #[must_use]
    pub fn new(transform: &Transform, zoom: f32, config: &EditorConfig) -> Self {
        let bounds = transform.bounds();
        let size = config.handle_size / zoom;
        let resize = ResizeHandle::ALL
            .into_iter()
            .map(|handle| {
                let anchor = transform.to_canvas(handle.anchor(&bounds));
                let square = Bounds::new(anchor.x - size / 2.0, anchor.y - size / 2.0, size, size);
                (handle, square)
            })
            .collect();

        let radius = size / 2.0;
        let offset = config.rotation_handle_offset / zoom;
        let top = bounds.center_x();
        let rotation = RotationHandle {
            center: transform.to_canvas(Point::new(top, bounds.y - offset)),
            radius,
            stem_start: transform.to_canvas(Point::new(top, bounds.y)),
            stem_end: transform.to_canvas(Point::new(top, bounds.y - (offset - radius))),
        };
        Self { resize, rotation }
    }

    /// Handle under `point`, rotation knob first.
    #[must_use]
    pub fn hit(&self, point: Point) -> Option<HandleKind> {
        let knob = self.rotation.center;
        let (dx, dy) = (point.x - knob.x, point.y - knob.y);
        if dx.hypot(dy) <= self.rotation.radius {
            return Some(HandleKind::Rotate);
        }
        self.resize
            .iter()
            .find(|(_, square)| square.contains_point(point))
            .map(|(handle, _)| HandleKind::Resize(*handle))
    }
}

/// New transform after dragging `handle` by `delta` from `start`.
///
/// `delta` is measured from the pointer position at drag start, in document
/// units, and is taken along the element's own rotated axes. Each axis is clamped to `min_size`; when a left or top edge hits
/// the floor, the opposite edge stays put.
#[must_use]
pub fn resize_transform(
    start: &Transform,
    handle: ResizeHandle,
    delta: Point,
    min_size: f32,
) -> Transform {
    let delta = rotate_point(delta, Point::ORIGIN, -start.rotation_radians());
    let mut next = *start;
    if handle.moves_west() {
        next.x = start.x + delta.x;
        next.width = start.width - delta.x;
    } else if handle.moves_east() {
        next.width = start.width + delta.x;
    }
    if handle.moves_north() {
        next.y = start.y + delta.y;
        next.height = start.height - delta.y;
    } else if handle.moves_south() {
        next.height = start.height + delta.y;
    }

    if next.width < min_size {
        next.width = min_size;
        if handle.moves_west() {
            next.x = start.x + start.width - min_size;
        }
    }
    if next.height < min_size {
        next.height = min_size;
        if handle.moves_north() {
            next.y = start.y + start.height - min_size;
        }
    }
    next
}

/// Rotation in degrees `[0, 360)` that points the handle at `pointer`.
///
/// 0° means the handle is straight above `center`. With `snap`, the angle is
/// rounded to the nearest multiple of that many degrees.
#[must_use]
pub fn rotation_angle(center: Point, pointer: Point, snap: Option<f32>) -> f32 {
    let raw = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    let angle = match snap {
        Some(step) if step > 0.0 => (raw / step).round() * step,
        _ => raw,
    };
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Transform {
        Transform::from_bounds(Bounds::new(100.0, 100.0, 50.0, 40.0))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_corner_handle_changes_both_axes() {
        let next = resize_transform(&start(), ResizeHandle::NorthWest, Point::new(10.0, 5.0), 10.0);
        assert_eq!(next.bounds(), Bounds::new(110.0, 105.0, 40.0, 35.0));
    }

    #[test]
    fn test_edge_handle_changes_one_axis() {
        let next = resize_transform(&start(), ResizeHandle::East, Point::new(25.0, 99.0), 10.0);
        assert_eq!(next.bounds(), Bounds::new(100.0, 100.0, 75.0, 40.0));
    }

    #[test]
    fn test_clamp_keeps_opposite_edge() {
        let next = resize_transform(&start(), ResizeHandle::West, Point::new(200.0, 0.0), 10.0);
        assert!(close(next.width, 10.0));
        assert!(close(next.x, 140.0));

        let next = resize_transform(&start(), ResizeHandle::South, Point::new(0.0, -100.0), 10.0);
        assert!(close(next.height, 10.0));
        assert!(close(next.y, 100.0));
    }

    #[test]
    fn test_layout_scales_with_zoom() {
        let config = EditorConfig::default();
        let layout = HandleLayout::new(&start(), 2.0, &config);
        let (_, nw) = layout.resize[0];
        assert_eq!(nw, Bounds::new(98.0, 98.0, 4.0, 4.0));
        assert!(close(layout.rotation.center.y, 90.0));
        assert!(close(layout.rotation.radius, 2.0));
        assert!(close(layout.rotation.stem_end.y, 92.0));

        assert_eq!(
            layout.hit(Point::new(150.0, 140.0)),
            Some(HandleKind::Resize(ResizeHandle::SouthEast))
        );
        assert_eq!(layout.hit(Point::new(125.0, 90.0)), Some(HandleKind::Rotate));
        assert_eq!(layout.hit(Point::new(125.0, 120.0)), None);
    }

    #[test]
    fn test_layout_follows_rotation() {
        let config = EditorConfig::default();
        let mut transform = Transform::from_bounds(Bounds::new(0.0, 0.0, 100.0, 20.0));
        transform.rotation = 90.0;
        let layout = HandleLayout::new(&transform, 1.0, &config);

        // Quarter turn about (50, 10): the top edge now faces +x.
        let knob = layout.rotation.center;
        assert!(close(knob.x, 80.0));
        assert!(close(knob.y, 10.0));
        assert_eq!(layout.hit(Point::new(80.0, 10.0)), Some(HandleKind::Rotate));
        assert_eq!(
            layout.hit(Point::new(60.0, -40.0)),
            Some(HandleKind::Resize(ResizeHandle::NorthWest))
        );
        assert_eq!(layout.hit(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_resize_delta_follows_rotation() {
        let mut rotated = start();
        rotated.rotation = 90.0;
        // Pointer moving down the canvas pushes the rotated east edge outward.
        let next = resize_transform(&rotated, ResizeHandle::East, Point::new(0.0, 30.0), 10.0);
        assert!(close(next.width, 80.0));
        assert!(close(next.height, 40.0));
    }

    #[test]
    fn test_rotation_angle() {
        let c = Point::new(0.0, 0.0);
        assert!(close(rotation_angle(c, Point::new(0.0, -10.0), None), 0.0));
        assert!(close(rotation_angle(c, Point::new(10.0, 0.0), None), 90.0));
        assert!(close(rotation_angle(c, Point::new(-10.0, 0.0), None), 270.0));
        assert!(close(rotation_angle(c, Point::new(10.0, -9.0), Some(15.0)), 45.0));
        assert!(close(rotation_angle(c, Point::new(-0.5, -10.0), Some(15.0)), 0.0));
    }
}
