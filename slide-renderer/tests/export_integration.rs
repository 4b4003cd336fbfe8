//! Integration tests for slide export (slide-renderer).
//!
//! Tests export of editor-built slides across formats, custom
//! configurations, image fallbacks and edge cases.

use slide_core::{Bounds, Editor, Element, ElementKind, ShapeKind, Slide};
use slide_renderer::export::{ExportConfig, ExportFormat, SlideExporter};

const PNG_MAGIC: [u8; 4] = [137, 80, 78, 71];

// 1x1 red pixel
const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Exporter for a 200x100 canvas at 1x.
fn small_exporter() -> SlideExporter {
    SlideExporter::new(ExportConfig {
        canvas_width: 200.0,
        canvas_height: 100.0,
        scale: 1.0,
        ..ExportConfig::default()
    })
}

/// Create a text element at a given position.
fn text_element(content: &str, x: f32, y: f32) -> Element {
    Element::text(content).with_bounds(Bounds::new(x, y, 150.0, 30.0))
}

/// The current slide of an editor after adding `elements`.
fn slide_with(elements: Vec<Element>) -> Slide {
    let mut editor = Editor::new();
    for element in elements {
        editor.add_element(element);
    }
    editor.current_slide().expect("current slide").clone()
}

// ==========================================================================
// Large slides
// ==========================================================================

#[test]
fn test_many_elements_svg_export() {
    let elements = (0..100)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let y = (i as f32) * 10.0;
            text_element(&format!("Element {i}"), 10.0, y).with_z_index(i)
        })
        .collect();
    let slide = slide_with(elements);

    let exporter = SlideExporter::with_defaults();
    let svg_bytes = exporter.export(&slide, ExportFormat::Svg).expect("svg");
    let svg = String::from_utf8(svg_bytes).expect("utf8");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Element 0"));
    assert!(svg.contains("Element 99"));
    assert!(svg.find("Element 0<").expect("first") < svg.find("Element 99<").expect("last"));
}

#[test]
fn test_shapes_png_export() {
    let slide = slide_with(vec![
        Element::shape(ShapeKind::Rectangle).with_bounds(Bounds::new(10.0, 10.0, 60.0, 40.0)),
        Element::shape(ShapeKind::Heart).with_bounds(Bounds::new(80.0, 10.0, 40.0, 40.0)),
        Element::shape(ShapeKind::Arrow).with_bounds(Bounds::new(10.0, 70.0, 150.0, 20.0)),
    ]);

    let png = small_exporter()
        .export(&slide, ExportFormat::Png)
        .expect("png");
    assert_eq!(&png[0..4], &PNG_MAGIC);
    assert!(png.len() > 100, "Expected a real image, got {} bytes", png.len());
}

// ==========================================================================
// Editor round trip
// ==========================================================================

#[test]
fn test_grouped_elements_export_through_members() {
    let mut editor = Editor::new();
    editor.add_element(text_element("Left", 0.0, 0.0));
    editor.add_element(text_element("Right", 50.0, 50.0));
    editor.select_all();
    editor.group_elements().expect("grouped");

    let slide = editor.current_slide().expect("slide");
    assert!(matches!(slide.elements()[0].kind, ElementKind::Group(_)));

    let svg = small_exporter().render_to_svg(slide).expect("svg");
    assert!(svg.contains(">Left</tspan>"));
    assert!(svg.contains(">Right</tspan>"));
}

#[test]
fn test_group_members_paint_in_z_order() {
    let member = |id: &str, content: &str, z: i32| {
        format!(
            r##"{{"id": "{id}", "type": "text", "content": "{content}", "fontSize": 20,
                "fontFamily": "Inter", "color": "#000000", "zIndex": {z},
                "transform": {{"x": 0, "y": 0, "width": 100, "height": 30}}}}"##
        )
    };
    let json = format!(
        r#"{{"slides": [{{
            "id": "s", "title": "Stack",
            "elements": [
                {}, {},
                {{"id": "g", "type": "group", "children": ["front", "back"],
                  "transform": {{"x": 0, "y": 0, "width": 100, "height": 30}}, "zIndex": 9}}
            ],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }}]}}"#,
        member("front", "Front", 5),
        member("back", "Back", 1),
    );
    let mut editor = Editor::new();
    editor.import_json(&json).expect("import");

    let svg = small_exporter()
        .render_to_svg(editor.current_slide().expect("slide"))
        .expect("svg");
    let back = svg.find(">Back</tspan>").expect("back painted");
    let front = svg.find(">Front</tspan>").expect("front painted");
    assert!(back < front, "lower z-index must paint first");
}

#[test]
fn test_imported_document_renders() {
    let json = r##"{
        "slides": [{
            "id": "cover",
            "title": "Cover",
            "background": {"type": "color", "value": "#1e293b"},
            "elements": [{
                "id": "headline",
                "type": "text",
                "content": "Quarterly Review",
                "fontSize": 48,
                "fontFamily": "Inter",
                "textAlign": "center",
                "color": "#ffffff",
                "transform": {"x": 0, "y": 20, "width": 200, "height": 60},
                "zIndex": 0,
                "opacity": 0.8
            }],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }]
    }"##;
    let mut editor = Editor::new();
    editor.import_json(json).expect("import");

    let svg = small_exporter()
        .render_to_svg(editor.current_slide().expect("slide"))
        .expect("svg");
    assert!(svg.contains("fill=\"#1e293b\""));
    assert!(svg.contains("text-anchor=\"middle\""));
    assert!(svg.contains("<tspan x=\"100\" y=\"68\">Quarterly Review</tspan>"));
    assert!(svg.contains("opacity=\"0.8\""));
}

// ==========================================================================
// Images
// ==========================================================================

#[test]
fn test_data_uri_image_is_embedded() {
    let src = format!("data:image/png;base64,{PNG_BASE64}");
    let slide = slide_with(vec![
        Element::image(src.clone()).with_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0))
    ]);

    let svg = small_exporter().render_to_svg(&slide).expect("svg");
    assert!(svg.contains(&format!("href=\"{src}\"")));
    assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
    assert!(!svg.contains(">Image</text>"));
}

#[test]
fn test_broken_image_does_not_fail_export() {
    let slide = slide_with(vec![
        Element::image("data:image/png;base64,not-an-image")
            .with_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0)),
        Element::image("https://example.com/remote.png")
            .with_bounds(Bounds::new(100.0, 0.0, 50.0, 50.0)),
    ]);

    let exporter = small_exporter();
    let svg = exporter.render_to_svg(&slide).expect("svg");
    assert_eq!(svg.matches(">Image</text>").count(), 2);

    let png = exporter.export(&slide, ExportFormat::Png).expect("png");
    assert_eq!(&png[0..4], &PNG_MAGIC);
}

#[test]
fn test_image_background_from_file() {
    use base64::Engine;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("background.png");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(PNG_BASE64)
        .expect("base64");
    std::fs::write(&path, bytes).expect("write");

    let mut slide = Slide::new("Photo");
    slide.background = serde_json::from_value(serde_json::json!({
        "type": "image",
        "value": path.to_str().expect("utf8 path"),
    }))
    .expect("background");

    let svg = small_exporter().render_to_svg(&slide).expect("svg");
    assert!(svg.contains("preserveAspectRatio=\"xMidYMid slice\""));
    assert!(svg.contains("data:image/png;base64,"));
}

// ==========================================================================
// Custom configuration
// ==========================================================================

#[test]
fn test_jpeg_quality_affects_size() {
    let slide = slide_with(vec![
        Element::shape(ShapeKind::Star).with_bounds(Bounds::new(10.0, 10.0, 80.0, 80.0)),
        Element::shape(ShapeKind::Cloud).with_bounds(Bounds::new(100.0, 10.0, 90.0, 80.0)),
    ]);

    let low_q = SlideExporter::new(ExportConfig {
        jpeg_quality: 10,
        ..small_exporter().config().clone()
    })
    .export(&slide, ExportFormat::Jpeg)
    .expect("jpeg");
    let high_q = SlideExporter::new(ExportConfig {
        jpeg_quality: 100,
        ..small_exporter().config().clone()
    })
    .export(&slide, ExportFormat::Jpeg)
    .expect("jpeg");

    assert_eq!(&low_q[0..2], &[0xFF, 0xD8]);
    assert!(
        high_q.len() >= low_q.len(),
        "Expected high-quality ({}) >= low-quality ({})",
        high_q.len(),
        low_q.len()
    );
}

#[test]
fn test_scale_changes_pixels_not_view_box() {
    let exporter = SlideExporter::new(ExportConfig {
        scale: 0.5,
        ..ExportConfig::default()
    });
    assert_eq!(exporter.output_dimensions(), (960, 540));
    let svg = exporter.render_to_svg(&Slide::new("Half")).expect("svg");
    assert!(svg.contains("width=\"960\""));
    assert!(svg.contains("viewBox=\"0 0 1920 1080\""));
}

// ==========================================================================
// Edge cases
// ==========================================================================

#[test]
fn test_empty_slide_all_formats() {
    let slide = Slide::new("Empty");
    let exporter = small_exporter();

    for format in [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Svg] {
        let bytes = exporter.export(&slide, format).expect("export");
        assert!(!bytes.is_empty(), "{format} output is empty");
    }
}

#[test]
fn test_tiny_canvas() {
    let exporter = SlideExporter::new(ExportConfig {
        canvas_width: 1.0,
        canvas_height: 1.0,
        scale: 1.0,
        ..ExportConfig::default()
    });
    let slide = slide_with(vec![text_element("Tiny", 0.0, 0.0)]);
    let png = exporter.export(&slide, ExportFormat::Png).expect("png");
    assert_eq!(&png[0..4], &PNG_MAGIC);
}

#[test]
fn test_special_characters_in_text() {
    let slide = slide_with(vec![text_element("Hello <world> & \"friends\"", 10.0, 20.0)]);
    let exporter = small_exporter();

    let svg = exporter.render_to_svg(&slide).expect("svg");
    assert!(svg.contains("&lt;world&gt;"));
    assert!(svg.contains("&amp;"));
    assert!(svg.contains("&quot;friends&quot;"));

    let png = exporter.export(&slide, ExportFormat::Png).expect("png");
    assert_eq!(&png[0..4], &PNG_MAGIC);
}
