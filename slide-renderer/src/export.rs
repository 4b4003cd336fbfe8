//! Slide export to SVG, PNG and JPEG.
//!
//! A slide is written as SVG at its logical canvas size, then rasterized
//! with the resvg/tiny-skia pipeline at `scale` and encoded. Elements are
//! painted in z-index order; hidden elements are skipped. Image elements
//! whose source cannot be loaded are drawn as a labelled placeholder box
//! instead of failing the export.

use std::fmt::{self, Write};
use std::str::FromStr;

use image::ImageEncoder;
use slide_core::element::{
    Element, ElementKind, FontStyle, FontWeight, ImageContent, ImageFit, Marker, ShapeContent,
    ShapeKind, TextAlign, TextContent, TextDecoration,
};
use slide_core::geometry::Bounds;
use slide_core::shape_path::shape_path;
use slide_core::slide::{Background, BackgroundKind, Slide};

use crate::error::{RenderError, RenderResult};
use crate::image::embed_image;

/// Nesting limit for groups inside groups.
const MAX_GROUP_DEPTH: usize = 32;

const PLACEHOLDER_FILL: &str = "#f3f4f6";
const PLACEHOLDER_STROKE: &str = "#d1d5db";
const PLACEHOLDER_LABEL: &str = "#6b7280";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }

    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown export format: {s}"))
    }
}

/// Configuration for slide export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Logical canvas width in document units (default: 1920).
    pub canvas_width: f32,
    /// Logical canvas height in document units (default: 1080).
    pub canvas_height: f32,
    /// Output pixels per document unit (default: 2.0).
    pub scale: f32,
    /// Paint the slide background (default: true).
    pub include_background: bool,
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
    /// Color behind transparent pixels in JPEG output, as RGBA bytes.
    pub matte: [u8; 4],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            scale: 2.0,
            include_background: true,
            jpeg_quality: 90,
            matte: [255, 255, 255, 255],
        }
    }
}

/// Exports a [`Slide`] to image formats.
#[derive(Debug, Clone)]
pub struct SlideExporter {
    config: ExportConfig,
}

impl SlideExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a slide to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide cannot be rendered or encoded.
    pub fn export(&self, slide: &Slide, format: ExportFormat) -> RenderResult<Vec<u8>> {
        tracing::debug!("Exporting slide {} as {format}", slide.id);
        match format {
            ExportFormat::Png => self.render_to_png(slide),
            ExportFormat::Jpeg => self.render_to_jpeg(slide),
            ExportFormat::Svg => Ok(self.render_to_svg(slide)?.into_bytes()),
        }
    }

    /// Export the slide to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(slide)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the slide to JPEG bytes, composited over the matte color.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(slide)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let matte = &self.config.matte;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // tiny-skia pixels are premultiplied
        for pixel in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            for (&background, &channel) in matte.iter().zip(&pixel[..3]) {
                let value = f32::from(background).mul_add(inv, f32::from(channel));
                rgb_data.push(value.round().min(255.0) as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let quality = self.config.jpeg_quality.clamp(1, 100);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the slide to an SVG string at its logical canvas size.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide cannot be represented as SVG.
    pub fn render_to_svg(&self, slide: &Slide) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions();
        let (view_w, view_h) = (self.config.canvas_width, self.config.canvas_height);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        if self.config.include_background {
            write_background(&mut svg, &slide.background, view_w, view_h);
        }

        let mut painted = 0usize;
        for element in slide.paint_order().into_iter().filter(|e| e.visible) {
            write_element(&mut svg, element, slide, 0);
            painted += 1;
        }
        tracing::trace!("Slide {} painted {painted} element(s)", slide.id);

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Output dimensions (width, height) in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn output_dimensions(&self) -> (u32, u32) {
        let scale = self.config.scale.max(f32::EPSILON);
        let out_w = (self.config.canvas_width * scale).round().max(1.0) as u32;
        let out_h = (self.config.canvas_height * scale).round().max(1.0) as u32;
        (out_w, out_h)
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

// ----- Background -----

fn write_background(svg: &mut String, background: &Background, width: f32, height: f32) {
    match background.kind {
        BackgroundKind::Color => {
            let _ = write!(
                svg,
                "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
                escape_xml(&background.value),
            );
        }
        BackgroundKind::Gradient => match LinearGradient::parse(&background.value) {
            Some(gradient) => {
                gradient.write_def(svg, "slide-background");
                let _ = write!(
                    svg,
                    "<rect width=\"{width}\" height=\"{height}\" fill=\"url(#slide-background)\"/>",
                );
            }
            None => {
                tracing::warn!("Unsupported gradient background, painting none");
            }
        },
        BackgroundKind::Image => match embed_image(&background.value) {
            Ok(image) => {
                let _ = write!(
                    svg,
                    "<image width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"xMidYMid slice\" href=\"{}\"/>",
                    image.href,
                );
            }
            Err(e) => {
                tracing::warn!("Background image unavailable: {e}");
            }
        },
    }
}

/// A CSS `linear-gradient(...)` reduced to an angle and evenly spaced stops.
#[derive(Debug, Clone, PartialEq)]
struct LinearGradient {
    /// CSS angle in degrees: 0 points up, 90 points right.
    angle: f32,
    colors: Vec<String>,
}

impl LinearGradient {
    fn parse(value: &str) -> Option<Self> {
        let inner = value
            .trim()
            .strip_prefix("linear-gradient(")?
            .strip_suffix(')')?;
        let mut parts = split_top_level(inner).into_iter().peekable();

        let angle = match parts.peek() {
            Some(first) if first.ends_with("deg") => {
                let angle = first.trim_end_matches("deg").trim().parse().ok()?;
                parts.next();
                angle
            }
            Some(first) if first.starts_with("to ") => {
                let angle = direction_angle(first)?;
                parts.next();
                angle
            }
            _ => 180.0,
        };

        let colors: Vec<String> = parts.map(|stop| stop_color(stop).to_string()).collect();
        (colors.len() >= 2).then_some(Self { angle, colors })
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_def(&self, svg: &mut String, id: &str) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let _ = write!(
            svg,
            "<defs><linearGradient id=\"{id}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
            unit(0.5 - sin / 2.0),
            unit(0.5 + cos / 2.0),
            unit(0.5 + sin / 2.0),
            unit(0.5 - cos / 2.0),
        );
        let last = (self.colors.len() - 1).max(1) as f32;
        for (i, color) in self.colors.iter().enumerate() {
            let _ = write!(
                svg,
                "<stop offset=\"{}\" stop-color=\"{}\"/>",
                i as f32 / last,
                escape_xml(color),
            );
        }
        svg.push_str("</linearGradient></defs>");
    }
}

/// Round a bounding-box coordinate so trigonometry noise does not leak into the SVG.
fn unit(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0 + 0.0
}

/// Split on commas that are not inside parentheses.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn direction_angle(direction: &str) -> Option<f32> {
    let angle = match direction.trim_start_matches("to ").trim() {
        "top" => 0.0,
        "top right" | "right top" => 45.0,
        "right" => 90.0,
        "bottom right" | "right bottom" => 135.0,
        "bottom" => 180.0,
        "bottom left" | "left bottom" => 225.0,
        "left" => 270.0,
        "top left" | "left top" => 315.0,
        _ => return None,
    };
    Some(angle)
}

/// Color part of a gradient stop such as `#fff 40%`.
fn stop_color(stop: &str) -> &str {
    match stop.rsplit_once(char::is_whitespace) {
        Some((color, position)) if position.ends_with('%') || position.ends_with("px") => {
            color.trim()
        }
        _ => stop,
    }
}

// ----- Elements -----

fn write_element(svg: &mut String, element: &Element, slide: &Slide, depth: usize) {
    let bounds = element.bounds();
    let rotation = element.transform.rotation;

    svg.push_str("<g");
    if element.opacity < 1.0 {
        let _ = write!(svg, " opacity=\"{}\"", element.opacity.max(0.0));
    }
    if rotation.abs() > f32::EPSILON {
        let _ = write!(
            svg,
            " transform=\"rotate({rotation} {} {})\"",
            bounds.center_x(),
            bounds.center_y(),
        );
    }
    svg.push('>');

    match &element.kind {
        ElementKind::Text(text) => write_text(svg, text, &bounds),
        ElementKind::Image(image) => write_image(svg, element, image, &bounds),
        ElementKind::Shape(shape) => write_shape(svg, shape, &bounds),
        ElementKind::Group(group) => {
            if depth >= MAX_GROUP_DEPTH {
                tracing::warn!("Group {} nested too deeply, members skipped", element.id);
            } else {
                let mut members = Vec::with_capacity(group.children.len());
                for child in &group.children {
                    match slide.group_member(child) {
                        Some(member) => members.push(member),
                        None => tracing::warn!("Group {} references missing member {child}", element.id),
                    }
                }
                // Equal z-indices keep member order.
                members.sort_by_key(|m| m.z_index);
                for member in members.into_iter().filter(|m| m.visible) {
                    write_element(svg, member, slide, depth + 1);
                }
            }
        }
    }

    svg.push_str("</g>");
}

fn write_text(svg: &mut String, text: &TextContent, b: &Bounds) {
    if let Some(background) = text
        .background_color
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "transparent")
    {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            b.x,
            b.y,
            b.width,
            b.height,
            escape_xml(background),
        );
    }

    let (anchor, x) = match text.text_align {
        TextAlign::Left => ("start", b.x),
        TextAlign::Center => ("middle", b.center_x()),
        TextAlign::Right => ("end", b.right()),
    };
    let _ = write!(
        svg,
        "<text font-family=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\"",
        escape_xml(&text.font_family),
        text.font_size,
        escape_xml(&text.color),
    );
    if text.font_weight == FontWeight::Bold {
        svg.push_str(" font-weight=\"bold\"");
    }
    if text.font_style == FontStyle::Italic {
        svg.push_str(" font-style=\"italic\"");
    }
    if text.text_decoration == TextDecoration::Underline {
        svg.push_str(" text-decoration=\"underline\"");
    }
    svg.push('>');

    let line_height = text.font_size * 1.2;
    let mut y = b.y + text.font_size;
    for line in text.content.split('\n') {
        let _ = write!(svg, "<tspan x=\"{x}\" y=\"{y}\">{}</tspan>", escape_xml(line));
        y += line_height;
    }
    svg.push_str("</text>");
}

fn write_image(svg: &mut String, element: &Element, image: &ImageContent, b: &Bounds) {
    match embed_image(&image.src) {
        Ok(embedded) => {
            let aspect = match image.fit {
                ImageFit::Contain => "xMidYMid meet",
                ImageFit::Cover => "xMidYMid slice",
                ImageFit::Fill => "none",
            };
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"{aspect}\" href=\"{}\"/>",
                b.x, b.y, b.width, b.height, embedded.href,
            );
        }
        Err(e) => {
            tracing::warn!("Image {} unavailable, drawing placeholder: {e}", element.id);
            write_image_placeholder(svg, b);
        }
    }
}

fn write_image_placeholder(svg: &mut String, b: &Bounds) {
    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{PLACEHOLDER_FILL}\" stroke=\"{PLACEHOLDER_STROKE}\" stroke-width=\"1\"/>",
        b.x, b.y, b.width, b.height,
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{}\" font-family=\"Inter\" font-size=\"16\" fill=\"{PLACEHOLDER_LABEL}\" text-anchor=\"middle\" dominant-baseline=\"central\">Image</text>",
        b.center_x(),
        b.center_y(),
    );
}

fn write_shape(svg: &mut String, shape: &ShapeContent, b: &Bounds) {
    match shape.shape_type {
        ShapeKind::Rectangle | ShapeKind::StickyNote => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                b.x, b.y, b.width, b.height,
            );
            let radius = shape
                .corner_radius
                .unwrap_or_default()
                .min(b.width / 2.0)
                .min(b.height / 2.0);
            if radius > 0.0 {
                let _ = write!(svg, " rx=\"{radius}\" ry=\"{radius}\"");
            }
            write_paint(svg, shape);
            svg.push_str("/>");
        }
        ShapeKind::Circle => {
            let _ = write!(
                svg,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                b.center_x(),
                b.center_y(),
                b.width / 2.0,
                b.height / 2.0,
            );
            write_paint(svg, shape);
            svg.push_str("/>");
        }
        ShapeKind::Line | ShapeKind::Arrow => write_connector(svg, shape, b),
        kind => {
            if let Some(path) = shape_path(kind, b.width, b.height) {
                let _ = write!(
                    svg,
                    "<path transform=\"translate({} {})\" d=\"{}\"",
                    b.x,
                    b.y,
                    path.to_svg_data(),
                );
            } else {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    b.x, b.y, b.width, b.height,
                );
            }
            write_paint(svg, shape);
            svg.push_str("/>");
        }
    }
}

fn write_paint(svg: &mut String, shape: &ShapeContent) {
    let _ = write!(svg, " fill=\"{}\"", escape_xml(&shape.fill));
    if shape.stroke_width > 0.0 {
        let _ = write!(
            svg,
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape_xml(&shape.stroke),
            shape.stroke_width,
        );
        if let Some(dash) = &shape.dash_array {
            let _ = write!(svg, " stroke-dasharray=\"{}\"", escape_xml(dash));
        }
    }
}

/// Horizontal line through the box center, with optional end markers.
fn write_connector(svg: &mut String, shape: &ShapeContent, b: &Bounds) {
    let width = shape.stroke_width.max(1.0);
    let stroke = escape_xml(&shape.stroke);
    let y = b.center_y();
    let _ = write!(
        svg,
        "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{stroke}\" stroke-width=\"{width}\"",
        b.x,
        b.right(),
    );
    if let Some(dash) = &shape.dash_array {
        let _ = write!(svg, " stroke-dasharray=\"{}\"", escape_xml(dash));
    }
    svg.push_str("/>");

    let default_end = if shape.shape_type == ShapeKind::Arrow {
        Marker::Arrow
    } else {
        Marker::None
    };
    let start = shape.start_marker.unwrap_or_default();
    let end = shape.end_marker.unwrap_or(default_end);
    let size = (width * 3.0).max(8.0);
    write_marker(svg, start, b.x, y, -1.0, size, &stroke);
    write_marker(svg, end, b.right(), y, 1.0, size, &stroke);
}

/// Marker at `(x, y)` facing `direction` (+1 right, -1 left).
fn write_marker(svg: &mut String, marker: Marker, x: f32, y: f32, direction: f32, size: f32, color: &str) {
    let half = size / 2.0;
    match marker {
        Marker::None => {}
        Marker::Arrow => {
            let base = x - direction * size;
            let _ = write!(
                svg,
                "<polygon points=\"{x},{y} {base},{} {base},{}\" fill=\"{color}\"/>",
                y - half,
                y + half,
            );
        }
        Marker::Circle => {
            let _ = write!(svg, "<circle cx=\"{x}\" cy=\"{y}\" r=\"{half}\" fill=\"{color}\"/>");
        }
        Marker::Square => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\" fill=\"{color}\"/>",
                x - half,
                y - half,
            );
        }
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
