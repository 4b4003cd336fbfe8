//! Slide elements - the building blocks of a slide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{rotate_point, union_all, Bounds, Point};

/// Length of the random suffix appended to generated identifiers.
const ID_SUFFIX_LEN: usize = 9;

/// Generate a type-tagged, collision-resistant identifier.
///
/// The format is `{tag}-{unix_millis}-{random}`, e.g. `shape-1718000000000-3f9a0c2e1`.
#[must_use]
pub fn generate_id(tag: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{tag}-{millis}-{random}")
}

/// Unique identifier for an element within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a fresh identifier tagged with the element type.
    #[must_use]
    pub fn generate(tag: &str) -> Self {
        Self(generate_id(tag))
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

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Position, size and rotation of an element in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, always positive.
    pub width: f32,
    /// Height, always positive.
    pub height: f32,
    /// Rotation in degrees about the element's own center.
    #[serde(default)]
    pub rotation: f32,
    /// Horizontal scale. Carried through untouched.
    #[serde(default = "default_scale")]
    pub scale_x: f32,
    /// Vertical scale. Carried through untouched.
    #[serde(default = "default_scale")]
    pub scale_y: f32,
}

const fn default_scale() -> f32 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_bounds(Bounds::new(0.0, 0.0, 100.0, 100.0))
    }
}

impl Transform {
    /// An unrotated, unscaled transform covering `bounds`.
    #[must_use]
    pub const fn from_bounds(bounds: Bounds) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Axis-aligned box of the unrotated element.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Rotation in radians; zero for unrotated or non-finite rotations.
    #[must_use]
    pub fn rotation_radians(&self) -> f32 {
        if self.rotation.is_finite() {
            self.rotation.rem_euclid(360.0).to_radians()
        } else {
            0.0
        }
    }

    /// Map a canvas point into the unrotated frame of this transform.
    #[must_use]
    pub fn to_local(&self, point: Point) -> Point {
        let angle = self.rotation_radians();
        if angle.abs() < f32::EPSILON {
            return point;
        }
        rotate_point(point, self.bounds().center(), -angle)
    }

    /// Map a point of the unrotated frame onto the canvas.
    #[must_use]
    pub fn to_canvas(&self, point: Point) -> Point {
        let angle = self.rotation_radians();
        if angle.abs() < f32::EPSILON {
            return point;
        }
        rotate_point(point, self.bounds().center(), angle)
    }

    /// Axis-aligned box around the rotated element as painted.
    #[must_use]
    pub fn visual_bounds(&self) -> Bounds {
        let bounds = self.bounds();
        if self.rotation_radians().abs() < f32::EPSILON {
            return bounds;
        }
        let corners = [
            Point::new(bounds.x, bounds.y),
            Point::new(bounds.right(), bounds.y),
            Point::new(bounds.right(), bounds.bottom()),
            Point::new(bounds.x, bounds.bottom()),
        ];
        union_all(
            corners
                .into_iter()
                .map(|c| self.to_canvas(c))
                .map(|p| Bounds::new(p.x, p.y, 0.0, 0.0)),
        )
        .unwrap_or(bounds)
    }

    /// Copy of this transform carried from the box `from` onto the box `to`,
    /// scaling position and size along each axis. A degenerate axis of
    /// `from` only translates.
    #[must_use]
    pub fn remapped(self, from: &Bounds, to: &Bounds) -> Self {
        let scale = |target: f32, source: f32| {
            if source > f32::EPSILON {
                target / source
            } else {
                1.0
            }
        };
        let sx = scale(to.width, from.width);
        let sy = scale(to.height, from.height);
        Self {
            x: to.x + (self.x - from.x) * sx,
            y: to.y + (self.y - from.y) * sy,
            width: self.width * sx,
            height: self.height * sy,
            ..self
        }
    }

    /// Copy of this transform moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Font weight of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font style of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Text decoration of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Line-end marker for shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Marker {
    #[default]
    None,
    Arrow,
    Circle,
    Square,
}

/// The kind of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
    StickyNote,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
    Heart,
    Cloud,
    SpeechBubble,
    ThoughtBubble,
    Callout,
    Banner,
    Shield,
}

impl ShapeKind {
    /// The twelve shapes drawn from a generated outline rather than a primitive.
    pub const CUSTOM: [Self; 12] = [
        Self::Triangle,
        Self::Diamond,
        Self::Pentagon,
        Self::Hexagon,
        Self::Star,
        Self::Heart,
        Self::Cloud,
        Self::SpeechBubble,
        Self::ThoughtBubble,
        Self::Callout,
        Self::Banner,
        Self::Shield,
    ];

    /// Whether the shape is drawn from a generated outline.
    #[must_use]
    pub fn is_custom(self) -> bool {
        Self::CUSTOM.contains(&self)
    }

    /// Kebab-case name, as used in documents and tool names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::StickyNote => "sticky-note",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Pentagon => "pentagon",
            Self::Hexagon => "hexagon",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Cloud => "cloud",
            Self::SpeechBubble => "speech-bubble",
            Self::ThoughtBubble => "thought-bubble",
            Self::Callout => "callout",
            Self::Banner => "banner",
            Self::Shield => "shield",
        }
    }

    /// Default styling applied when a shape is drawn with a creation tool.
    #[must_use]
    pub const fn default_style(self) -> ShapeStyle {
        let (fill, stroke) = match self {
            Self::Circle => ("#10b981", "#059669"),
            Self::StickyNote | Self::Callout => ("#fef3c7", "#f59e0b"),
            Self::Triangle => ("#ef4444", "#dc2626"),
            Self::Diamond => ("#8b5cf6", "#7c3aed"),
            Self::Pentagon => ("#f59e0b", "#d97706"),
            Self::Hexagon => ("#06b6d4", "#0891b2"),
            Self::Star => ("#eab308", "#ca8a04"),
            Self::Heart => ("#ec4899", "#db2777"),
            Self::Cloud => ("#94a3b8", "#64748b"),
            Self::SpeechBubble => ("#ffffff", "#374151"),
            Self::ThoughtBubble => ("#f3f4f6", "#6b7280"),
            Self::Banner => ("#ddd6fe", "#8b5cf6"),
            Self::Shield => ("#bbf7d0", "#16a34a"),
            Self::Rectangle | Self::Line | Self::Arrow => ("#3b82f6", "#1e40af"),
        };
        let (stroke_width, corner_radius) = match self {
            Self::Rectangle => (2.0, Some(4.0)),
            Self::StickyNote => (1.0, Some(4.0)),
            _ => (2.0, None),
        };
        ShapeStyle {
            fill,
            stroke,
            stroke_width,
            corner_radius,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [ShapeKind; 17] = [
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Line,
            ShapeKind::Arrow,
            ShapeKind::StickyNote,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
            ShapeKind::Pentagon,
            ShapeKind::Hexagon,
            ShapeKind::Star,
            ShapeKind::Heart,
            ShapeKind::Cloud,
            ShapeKind::SpeechBubble,
            ShapeKind::ThoughtBubble,
            ShapeKind::Callout,
            ShapeKind::Banner,
            ShapeKind::Shield,
        ];
        ALL.into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown shape kind: {s}"))
    }
}

/// Fixed colors and stroke for a newly drawn shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Fill color.
    pub fill: &'static str,
    /// Stroke color.
    pub stroke: &'static str,
    /// Stroke width.
    pub stroke_width: f32,
    /// Corner radius for rectangular shapes.
    pub corner_radius: Option<f32>,
}

/// Content of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// The text itself.
    pub content: String,
    /// Font size in document units.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font style.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Text decoration.
    #[serde(default)]
    pub text_decoration: TextDecoration,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Text color.
    pub color: String,
    /// Optional box background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl TextContent {
    /// Text with the default editor styling.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: 16.0,
            font_family: "Inter".to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            text_align: TextAlign::Left,
            color: "#1f2937".to_string(),
            background_color: None,
        }
    }
}

/// Content of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Source reference (URL, path or data URI).
    pub src: String,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Fit mode.
    #[serde(default)]
    pub fit: ImageFit,
}

/// Content of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    /// Shape kind.
    pub shape_type: ShapeKind,
    /// Fill color.
    pub fill: String,
    /// Stroke color.
    pub stroke: String,
    /// Stroke width in document units.
    pub stroke_width: f32,
    /// Corner radius for rectangular shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    /// SVG-style dash pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    /// Marker at the start of open shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<Marker>,
    /// Marker at the end of open shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<Marker>,
}

impl ShapeContent {
    /// Shape content with the kind's default style.
    #[must_use]
    pub fn styled(shape_type: ShapeKind) -> Self {
        let style = shape_type.default_style();
        Self {
            shape_type,
            fill: style.fill.to_string(),
            stroke: style.stroke.to_string(),
            stroke_width: style.stroke_width,
            corner_radius: style.corner_radius,
            dash_array: None,
            start_marker: None,
            end_marker: None,
        }
    }
}

/// Content of a group element: references to member elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupContent {
    /// Member element IDs, in the order they were grouped.
    pub children: Vec<ElementId>,
}

/// The type-specific part of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text box.
    Text(TextContent),
    /// A raster or vector image.
    Image(ImageContent),
    /// A vector shape.
    Shape(ShapeContent),
    /// A group of other elements.
    Group(GroupContent),
}

impl ElementKind {
    /// Type tag used in documents and generated IDs.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Shape(_) => "shape",
            Self::Group(_) => "group",
        }
    }
}

/// A slide element: shared attributes plus type-specific content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Type-specific content.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Position and size.
    pub transform: Transform,
    /// Paint and selection order. Not necessarily contiguous.
    #[serde(default)]
    pub z_index: i32,
    /// Locked elements can be selected but not moved or resized.
    #[serde(default)]
    pub locked: bool,
    /// Hidden elements are neither painted nor hit.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

const fn default_visible() -> bool {
    true
}

const fn default_opacity() -> f32 {
    1.0
}

impl Element {
    /// Create a new element with a freshly generated ID.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::generate(kind.type_tag()),
            kind,
            transform: Transform::default(),
            z_index: 0,
            locked: false,
            visible: true,
            opacity: 1.0,
        }
    }

    /// Create a text element with default styling.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(TextContent::new(content)))
    }

    /// Create a shape element with the kind's default style.
    #[must_use]
    pub fn shape(kind: ShapeKind) -> Self {
        Self::new(ElementKind::Shape(ShapeContent::styled(kind)))
    }

    /// Create an image element.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::new(ElementKind::Image(ImageContent {
            src: src.into(),
            alt: None,
            fit: ImageFit::default(),
        }))
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set position and size, keeping rotation and scale.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.transform.x = bounds.x;
        self.transform.y = bounds.y;
        self.transform.width = bounds.width;
        self.transform.height = bounds.height;
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Replace the ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Axis-aligned bounds of the element.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.transform.bounds()
    }

    /// Axis-aligned box around the element as painted, rotation included.
    #[must_use]
    pub fn visual_bounds(&self) -> Bounds {
        self.transform.visual_bounds()
    }

    /// Check if a point (in canvas coordinates) is within this element,
    /// honoring its rotation.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.bounds().contains_point(self.transform.to_local(point))
    }

    /// Whether this element is a text box.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    /// Member IDs if this element is a group.
    #[must_use]
    pub fn group_children(&self) -> Option<&[ElementId]> {
        match &self.kind {
            ElementKind::Group(group) => Some(&group.children),
            _ => None,
        }
    }

    /// Deep copy with a fresh ID, moved by `offset` on both axes.
    ///
    /// Group member references are copied verbatim; remapping them is the
    /// slide's job because the members live in the slide.
    #[must_use]
    pub fn duplicate(&self, offset: f32) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::generate(self.kind.type_tag());
        copy.transform = copy.transform.translated(offset, offset);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_tagged_and_distinct() {
        let a = ElementId::generate("shape");
        let b = ElementId::generate("shape");
        assert!(a.as_str().starts_with("shape-"));
        assert_eq!(a.as_str().rsplit('-').next().map(str::len), Some(9));
        assert_ne!(a, b);
    }

    #[test]
    fn test_element_json_is_flat_and_tagged() {
        let element = Element::shape(ShapeKind::StickyNote).with_id("shape-1");
        let json = serde_json::to_value(&element).expect("serialize");
        assert_eq!(json["type"], "shape");
        assert_eq!(json["shapeType"], "sticky-note");
        assert_eq!(json["zIndex"], 0);
        assert_eq!(json["transform"]["scaleX"], 1.0);

        let back: Element = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, element);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r##"{
            "id": "text-1",
            "type": "text",
            "transform": {"x": 1, "y": 2, "width": 30, "height": 40},
            "content": "Hi",
            "fontSize": 20,
            "fontFamily": "Inter",
            "color": "#000"
        }"##;
        let element: Element = serde_json::from_str(json).expect("deserialize");
        assert!(element.visible);
        assert!((element.opacity - 1.0).abs() < f32::EPSILON);
        assert!((element.transform.scale_y - 1.0).abs() < f32::EPSILON);
        assert!(element.is_text());
    }

    #[test]
    fn test_duplicate_offsets_and_renames() {
        let original = Element::text("copy me").with_bounds(Bounds::new(5.0, 7.0, 50.0, 20.0));
        let copy = original.duplicate(20.0);
        assert_ne!(copy.id, original.id);
        assert!(copy.id.as_str().starts_with("text-"));
        assert!((copy.transform.x - 25.0).abs() < f32::EPSILON);
        assert!((copy.transform.y - 27.0).abs() < f32::EPSILON);
        assert_eq!(copy.kind, original.kind);
    }

    #[test]
    fn test_shape_kind_parse_and_style_table() {
        assert_eq!("speech-bubble".parse::<ShapeKind>(), Ok(ShapeKind::SpeechBubble));
        assert!("hexagonal".parse::<ShapeKind>().is_err());
        assert_eq!(ShapeKind::Heart.default_style().fill, "#ec4899");
        assert_eq!(ShapeKind::Rectangle.default_style().corner_radius, Some(4.0));
        assert!(ShapeKind::Shield.is_custom());
        assert!(!ShapeKind::Circle.is_custom());
    }

    #[test]
    fn test_set_opacity_clamps() {
        let mut element = Element::image("a.png");
        element.set_opacity(3.0);
        assert!((element.opacity - 1.0).abs() < f32::EPSILON);
        element.set_opacity(-1.0);
        assert!(element.opacity.abs() < f32::EPSILON);
    }
}
