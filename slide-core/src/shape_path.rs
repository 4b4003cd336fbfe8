//! Vector outlines for the non-primitive shape kinds.
//!
//! Outlines are expressed in the element's local space: `(0, 0)` is the
//! top-left corner of its box and `(width, height)` the bottom-right.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt::Write;

use crate::element::ShapeKind;
use crate::geometry::Point;

/// A single outline command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight segment.
    LineTo(Point),
    /// Quadratic Bezier segment.
    QuadTo {
        /// Control point.
        ctrl: Point,
        /// End point.
        to: Point,
    },
    /// Cubic Bezier segment.
    CubicTo {
        /// First control point.
        ctrl1: Point,
        /// Second control point.
        ctrl2: Point,
        /// End point.
        to: Point,
    },
    /// Close the current subpath.
    Close,
}

/// An outline made of one or more closed subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    commands: Vec<PathCommand>,
}

impl ShapePath {
    /// The outline commands in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Render as SVG path data (`d` attribute).
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let mut d = String::with_capacity(self.commands.len() * 16);
        for (idx, cmd) in self.commands.iter().enumerate() {
            if idx > 0 {
                d.push(' ');
            }
            let _ = match cmd {
                PathCommand::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
                PathCommand::QuadTo { ctrl, to } => {
                    write!(d, "Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                    d,
                    "C {} {} {} {} {} {}",
                    ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::QuadTo {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            ctrl1: Point::new(c1x, c1y),
            ctrl2: Point::new(c2x, c2y),
            to: Point::new(x, y),
        });
        self
    }

    fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        let mut path = Self::default();
        for (idx, p) in points.into_iter().enumerate() {
            if idx == 0 {
                path.move_to(p.x, p.y);
            } else {
                path.line_to(p.x, p.y);
            }
        }
        path.close();
        path
    }

    /// Copy with every coordinate multiplied by `factor`.
    fn scaled(mut self, factor: f32) -> Self {
        let s = |p: Point| Point::new(p.x * factor, p.y * factor);
        for cmd in &mut self.commands {
            *cmd = match *cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(s(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(s(p)),
                PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                    ctrl: s(ctrl),
                    to: s(to),
                },
                PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                    ctrl1: s(ctrl1),
                    ctrl2: s(ctrl2),
                    to: s(to),
                },
                PathCommand::Close => PathCommand::Close,
            };
        }
        self
    }
}

/// Generate the outline for a custom shape kind at the given size.
///
/// Returns `None` for primitive kinds (rectangle, circle, line, arrow,
/// sticky note), which renderers draw directly.
#[must_use]
pub fn shape_path(kind: ShapeKind, width: f32, height: f32) -> Option<ShapePath> {
    let cx = width / 2.0;
    let cy = height / 2.0;

    let path = match kind {
        ShapeKind::Rectangle
        | ShapeKind::Circle
        | ShapeKind::Line
        | ShapeKind::Arrow
        | ShapeKind::StickyNote => return None,

        ShapeKind::Triangle => ShapePath::polygon([
            Point::new(cx, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ]),

        ShapeKind::Diamond => ShapePath::polygon([
            Point::new(cx, 0.0),
            Point::new(width, cy),
            Point::new(cx, height),
            Point::new(0.0, cy),
        ]),

        ShapeKind::Pentagon => regular_polygon(cx, cy, 5, -FRAC_PI_2),
        ShapeKind::Hexagon => regular_polygon(cx, cy, 6, 0.0),

        ShapeKind::Star => ShapePath::polygon((0..10u8).map(|i| {
            let angle = f32::from(i) * PI / 5.0 - FRAC_PI_2;
            let radius = if i % 2 == 0 { cx * 0.9 } else { cx * 0.4 };
            Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })),

        ShapeKind::Heart => {
            let mut p = ShapePath::default();
            p.move_to(50.0, 25.0)
                .cubic_to(50.0, 15.0, 35.0, 5.0, 25.0, 15.0)
                .cubic_to(15.0, 5.0, 0.0, 15.0, 0.0, 25.0)
                .cubic_to(0.0, 35.0, 25.0, 60.0, 50.0, 85.0)
                .cubic_to(75.0, 60.0, 100.0, 35.0, 100.0, 25.0)
                .cubic_to(100.0, 15.0, 85.0, 5.0, 75.0, 15.0)
                .cubic_to(65.0, 5.0, 50.0, 15.0, 50.0, 25.0)
                .close();
            p.scaled(width.min(height) / 100.0)
        }

        ShapeKind::Cloud => {
            let mut p = ShapePath::default();
            p.move_to(25.0, 60.0)
                .cubic_to(10.0, 60.0, 0.0, 45.0, 0.0, 30.0)
                .cubic_to(0.0, 15.0, 15.0, 0.0, 30.0, 0.0)
                .cubic_to(40.0, 0.0, 50.0, 5.0, 55.0, 15.0)
                .cubic_to(65.0, 5.0, 80.0, 10.0, 85.0, 25.0)
                .cubic_to(95.0, 25.0, 100.0, 35.0, 95.0, 45.0)
                .cubic_to(100.0, 55.0, 90.0, 65.0, 80.0, 60.0)
                .close();
            p.scaled(width.min(height) / 100.0)
        }

        ShapeKind::SpeechBubble => {
            let bw = width - 20.0;
            let bh = height - 20.0;
            let mut p = ShapePath::default();
            p.move_to(10.0, 10.0)
                .line_to(bw, 10.0)
                .quad_to(bw + 10.0, 10.0, bw + 10.0, 20.0)
                .line_to(bw + 10.0, bh - 10.0)
                .quad_to(bw + 10.0, bh, bw, bh)
                .line_to(30.0, bh)
                .line_to(20.0, height)
                .line_to(25.0, bh)
                .line_to(20.0, bh)
                .quad_to(10.0, bh, 10.0, bh - 10.0)
                .line_to(10.0, 20.0)
                .quad_to(10.0, 10.0, 20.0, 10.0)
                .close();
            p
        }

        ShapeKind::ThoughtBubble => {
            let mut p = ShapePath::default();
            // Main cloud followed by two trailing puffs.
            for (ox, oy, rx, ry) in [
                (0.0, 0.0, 20.0, 15.0),
                (-10.0, 30.0, 5.0, 5.0),
                (-20.0, 42.5, 3.0, 2.5),
            ] {
                let (x, y) = (cx + ox, cy + oy);
                p.move_to(x, y - ry)
                    .cubic_to(x + rx, y - ry, x + rx, y + ry, x, y + ry)
                    .cubic_to(x - rx, y + ry, x - rx, y - ry, x, y - ry)
                    .close();
            }
            p
        }

        ShapeKind::Callout => {
            let mut p = ShapePath::default();
            p.move_to(10.0, 10.0)
                .line_to(width - 10.0, 10.0)
                .quad_to(width, 10.0, width, 20.0)
                .line_to(width, height - 30.0)
                .quad_to(width, height - 20.0, width - 10.0, height - 20.0)
                .line_to(cx + 10.0, height - 20.0)
                .line_to(cx, height)
                .line_to(cx - 10.0, height - 20.0)
                .line_to(20.0, height - 20.0)
                .quad_to(10.0, height - 20.0, 10.0, height - 30.0)
                .line_to(10.0, 20.0)
                .quad_to(10.0, 10.0, 20.0, 10.0)
                .close();
            p
        }

        ShapeKind::Banner => ShapePath::polygon([
            Point::new(0.0, cy - 15.0),
            Point::new(width - 20.0, cy - 15.0),
            Point::new(width, cy),
            Point::new(width - 20.0, cy + 15.0),
            Point::new(0.0, cy + 15.0),
        ]),

        ShapeKind::Shield => {
            let mut p = ShapePath::default();
            p.move_to(cx, 0.0)
                .cubic_to(width * 0.8, 0.0, width, height * 0.3, width, height * 0.6)
                .cubic_to(width, height * 0.9, cx, height, cx, height)
                .cubic_to(cx, height, 0.0, height * 0.9, 0.0, height * 0.6)
                .cubic_to(0.0, height * 0.3, width * 0.2, 0.0, cx, 0.0)
                .close();
            p
        }
    };

    Some(path)
}

/// Regular polygon inscribed in 90% of the box, starting at `phase` radians.
fn regular_polygon(cx: f32, cy: f32, sides: u8, phase: f32) -> ShapePath {
    ShapePath::polygon((0..sides).map(|i| {
        let angle = f32::from(i) * 2.0 * PI / f32::from(sides) + phase;
        Point::new(cx + cx * 0.9 * angle.cos(), cy + cy * 0.9 * angle.sin())
    }))
}
