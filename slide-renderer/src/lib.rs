//! # Saorsa Slides Renderer
//!
//! Exports a single slide as SVG, PNG or JPEG.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌───────────────┐    ┌───────────┐
//! │  Slide   │───►│  SVG writer  │───►│ resvg / skia  │───►│ PNG, JPEG │
//! │ (z-order)│    │ + image embed│    │  rasterizer   │    │  encoder  │
//! └──────────┘    └──────────────┘    └───────────────┘    └───────────┘
//! ```
//!
//! Images that cannot be loaded are replaced by a placeholder box; they
//! never fail an export.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod image;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SlideExporter};
pub use image::{embed_image, load_image_bytes, EmbeddedImage, ImageFormat};
