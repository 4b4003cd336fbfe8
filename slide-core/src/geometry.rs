//! Geometry helpers shared by hit testing, selection and snapping.
//!
//! Everything here is a pure function over plain values.

use serde::{Deserialize, Serialize};

/// A point in document (canvas) or screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Bounds {
    /// Create a box from its left/top edge and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Check whether a point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check whether `other` lies entirely inside this box (edges inclusive).
    #[must_use]
    pub fn contains_bounds(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Union of a set of boxes. Returns `None` for an empty set.
pub fn union_all<I>(boxes: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Bounds>,
{
    boxes.into_iter().reduce(|acc, b| acc.union(&b))
}

/// Round a value to the nearest multiple of `grid_size`.
///
/// A non-positive grid size leaves the value untouched.
#[must_use]
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
#[must_use]
pub fn snap_point_to_grid(point: Point, grid_size: f32) -> Point {
    Point::new(
        snap_to_grid(point.x, grid_size),
        snap_to_grid(point.y, grid_size),
    )
}

/// Rotate `point` around `center` by `angle` radians (clockwise in a y-down space).
#[must_use]
pub fn rotate_point(point: Point, center: Point, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_union_of_two_boxes() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(union_all([a, b]), Some(Bounds::new(0.0, 0.0, 60.0, 60.0)));
        assert_eq!(union_all(std::iter::empty()), None);
    }

    #[test]
    fn test_contains_point_is_edge_inclusive() {
        let b = Bounds::new(10.0, 10.0, 20.0, 20.0);
        assert!(b.contains_point(Point::new(10.0, 30.0)));
        assert!(b.contains_point(Point::new(20.0, 20.0)));
        assert!(!b.contains_point(Point::new(9.9, 20.0)));
    }

    #[test]
    fn test_contains_bounds_requires_full_containment() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_bounds(&Bounds::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_bounds(&Bounds::new(90.0, 90.0, 20.0, 20.0)));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let b = Bounds::from_corners(Point::new(40.0, 5.0), Point::new(10.0, 25.0));
        assert_eq!(b, Bounds::new(10.0, 5.0, 30.0, 20.0));
    }

    #[test]
    fn test_snap_to_grid() {
        assert!(close(snap_to_grid(29.0, 20.0), 20.0));
        assert!(close(snap_to_grid(31.0, 20.0), 40.0));
        assert!(close(snap_to_grid(-11.0, 20.0), -20.0));
        assert!(close(snap_to_grid(13.3, 0.0), 13.3));
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(
            Point::new(10.0, 0.0),
            Point::ORIGIN,
            std::f32::consts::FRAC_PI_2,
        );
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 10.0));
    }
}
