//! # Saorsa Slides CLI
//!
//! Command-line host for the slide editing engine. All file I/O of the
//! workspace lives here; `slide-core` and `slide-renderer` stay pure.
//!
//! ## Usage
//!
//! ```bash
//! slide-cli info deck.json
//! slide-cli normalize deck.json -o clean.json
//! slide-cli apply-template pitch.json -o deck.json
//! slide-cli render deck.json --slide 2 -o slide2.png --scale 1
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `RenderArgs` - Export options, converted into an `ExportConfig`
//! - `run` - Executes one command, writing reports to the given sink

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use slide_core::{BackgroundKind, Document, Editor, ElementKind, Slide, Template};
use slide_renderer::{ExportConfig, ExportFormat, SlideExporter};

/// Command-line arguments for slide-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "slide-cli")]
#[command(about = "Inspect, normalize and render Saorsa Slides documents")]
#[command(version)]
pub struct CliArgs {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a summary of a document.
    Info {
        /// Document to inspect.
        input: PathBuf,
    },
    /// Import a document and export it again in canonical form.
    Normalize {
        /// Document to read.
        input: PathBuf,
        /// Destination file (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start a new document from a template.
    ApplyTemplate {
        /// Template to instantiate.
        template: PathBuf,
        /// Destination file (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one slide as PNG, JPEG or SVG.
    Render(RenderArgs),
}

/// Options for the `render` command.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Document to read.
    pub input: PathBuf,

    /// Slide number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub slide: usize,

    /// Output file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format (inferred from the output extension when omitted).
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Output pixels per canvas unit.
    #[arg(long, env = "SLIDE_EXPORT_SCALE", default_value_t = 2.0)]
    pub scale: f32,

    /// Logical canvas width.
    #[arg(long, default_value_t = 1920.0)]
    pub width: f32,

    /// Logical canvas height.
    #[arg(long, default_value_t = 1080.0)]
    pub height: f32,

    /// JPEG quality.
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Skip the slide background.
    #[arg(long)]
    pub no_background: bool,
}

impl RenderArgs {
    /// The export format: `--format`, else the output file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if neither names a supported format.
    pub fn resolved_format(&self) -> anyhow::Result<ExportFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        self.output
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ExportFormat::from_extension)
            .with_context(|| {
                format!(
                    "Cannot infer export format from {}; pass --format",
                    self.output.display()
                )
            })
    }
}

impl From<&RenderArgs> for ExportConfig {
    fn from(args: &RenderArgs) -> Self {
        Self {
            canvas_width: args.width,
            canvas_height: args.height,
            scale: args.scale,
            include_background: !args.no_background,
            jpeg_quality: args.quality,
            ..Self::default()
        }
    }
}

/// Execute a command. Reports and documents without an output path go to
/// `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, a document or
/// template is invalid, or export fails.
pub fn run(args: &CliArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    match &args.command {
        Command::Info { input } => {
            let document = read_document(input)?;
            out.write_all(summarize(&document).as_bytes())?;
        }
        Command::Normalize { input, output } => {
            let document = read_document(input)?;
            let mut editor = Editor::new();
            editor.import_document(document)?;
            write_output(output.as_deref(), &editor.export_json()?, out)?;
        }
        Command::ApplyTemplate { template: path, output } => {
            let json = read_file(path)?;
            let template = Template::from_json(&json)
                .with_context(|| format!("Invalid template {}", path.display()))?;
            let mut editor = Editor::new();
            editor.apply_template(&template)?;
            write_output(output.as_deref(), &editor.export_json()?, out)?;
        }
        Command::Render(render) => render_slide(render)?,
    }
    Ok(())
}

/// A human-readable summary of a document.
#[must_use]
pub fn summarize(document: &Document) -> String {
    let mut report = String::new();
    let _ = writeln!(
        report,
        "Document v{} created {}",
        document.version,
        document.created_at.to_rfc3339()
    );
    let _ = writeln!(report, "{} slide(s)", document.slides.len());
    for (index, slide) in document.slides.iter().enumerate() {
        let _ = writeln!(
            report,
            "{:>3}. {} [{}] {} element(s){}, {} background",
            index + 1,
            slide.title,
            slide.id,
            slide.elements().len(),
            kind_breakdown(slide),
            background_name(slide.background.kind),
        );
    }
    report
}

fn kind_breakdown(slide: &Slide) -> String {
    let mut counts = [0usize; 4];
    for element in slide.elements() {
        let slot = match element.kind {
            ElementKind::Text(_) => 0,
            ElementKind::Image(_) => 1,
            ElementKind::Shape(_) => 2,
            ElementKind::Group(_) => 3,
        };
        counts[slot] += 1;
    }
    let parts: Vec<String> = ["text", "image", "shape", "group"]
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| format!("{count} {name}"))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

const fn background_name(kind: BackgroundKind) -> &'static str {
    match kind {
        BackgroundKind::Color => "color",
        BackgroundKind::Image => "image",
        BackgroundKind::Gradient => "gradient",
    }
}

fn render_slide(args: &RenderArgs) -> anyhow::Result<()> {
    let format = args.resolved_format()?;
    let document = read_document(&args.input)?;
    let count = document.slides.len();
    if args.slide == 0 || args.slide > count {
        bail!("Slide {} out of range (document has {count})", args.slide);
    }
    let slide = &document.slides[args.slide - 1];

    let exporter = SlideExporter::new(ExportConfig::from(args));
    let (width, height) = exporter.output_dimensions();
    tracing::info!(
        "Rendering slide {} '{}' as {format} ({width}x{height})",
        args.slide,
        slide.title
    );
    let bytes = exporter
        .export(slide, format)
        .with_context(|| format!("Failed to export slide {}", args.slide))?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::debug!("Wrote {} bytes to {}", bytes.len(), args.output.display());
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let json = read_file(path)?;
    let document = Document::from_json(&json)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    tracing::debug!(
        "Loaded {} slide(s) from {}",
        document.slides.len(),
        path.display()
    );
    Ok(document)
}

fn write_output(path: Option<&Path>, json: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("valid arguments")
    }

    fn render_args(args: &[&str]) -> RenderArgs {
        let mut full = vec!["slide-cli", "render"];
        full.extend_from_slice(args);
        match parse(&full).command {
            Command::Render(render) => render,
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn test_render_defaults() {
        let args = render_args(&["deck.json", "-o", "out.png"]);
        assert_eq!(args.slide, 1);
        assert_eq!(args.quality, 90);
        assert!(!args.no_background);
        assert_eq!(args.resolved_format().expect("format"), ExportFormat::Png);
    }

    #[test]
    fn test_export_config_from_args() {
        let args = render_args(&[
            "deck.json",
            "-o",
            "out.bin",
            "--format",
            "jpeg",
            "--scale",
            "0.5",
            "--quality",
            "40",
            "--no-background",
        ]);
        assert_eq!(args.resolved_format().expect("format"), ExportFormat::Jpeg);

        let config = ExportConfig::from(&args);
        assert!((config.scale - 0.5).abs() < f32::EPSILON);
        assert!((config.canvas_width - 1920.0).abs() < f32::EPSILON);
        assert_eq!(config.jpeg_quality, 40);
        assert!(!config.include_background);
    }

    #[test]
    fn test_unknown_extension_needs_format() {
        let args = render_args(&["deck.json", "-o", "out.bmp"]);
        assert!(args.resolved_format().is_err());
    }

    #[test]
    fn test_quality_range_enforced() {
        assert!(
            CliArgs::try_parse_from(["slide-cli", "render", "d.json", "-o", "o.jpg", "--quality", "0"])
                .is_err()
        );
        assert!(CliArgs::try_parse_from(["slide-cli", "render", "d.json"]).is_err());
    }

    #[test]
    fn test_summary_lists_slides() {
        let document = Document::from_json(
            r##"{
                "version": "1.0",
                "createdAt": "2024-01-01T00:00:00Z",
                "slides": [{
                    "id": "intro",
                    "title": "Intro",
                    "background": {"type": "gradient", "value": "linear-gradient(90deg, #000, #fff)"},
                    "elements": [
                        {"id": "a", "type": "text", "content": "Hi",
                         "fontSize": 16, "fontFamily": "Inter", "color": "#000000",
                         "transform": {"x": 0, "y": 0, "width": 10, "height": 10}},
                        {"id": "b", "type": "shape", "shapeType": "star",
                         "fill": "#fbbf24", "stroke": "#000000", "strokeWidth": 1,
                         "transform": {"x": 0, "y": 0, "width": 10, "height": 10}}
                    ],
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-01-01T00:00:00Z"
                }]
            }"##,
        )
        .expect("document");

        let report = summarize(&document);
        assert!(report.starts_with("Document v1.0 created 2024-01-01T00:00:00+00:00\n"));
        assert!(report.contains("1 slide(s)"));
        assert!(report.contains("  1. Intro [intro] 2 element(s) (1 text, 1 shape), gradient background"));
    }
}
