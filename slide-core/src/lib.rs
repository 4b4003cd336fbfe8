//! # Saorsa Slides Core
//!
//! Editing engine for slide canvases: the document model, an editor state
//! machine with undo/redo, and the gesture controller that turns pointer
//! and keyboard input into edits.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 slide-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Interaction      │  Render description     │
//! │  - Gestures       │  - Paint order          │
//! │  - Handles        │  - Selection + handles  │
//! │  - Shortcuts      │  - Guides, marquee      │
//! ├─────────────────────────────────────────────┤
//! │  Editor           │  Document               │
//! │  - Slides         │  - Elements, groups     │
//! │  - Selection      │  - JSON import/export   │
//! │  - History        │  - Templates            │
//! ├─────────────────────────────────────────────┤
//! │  Geometry, shape paths, alignment guides    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod guides;
pub mod handles;
pub mod history;
pub mod interaction;
pub mod keyboard;
pub mod scene;
pub mod shape_path;
pub mod slide;
pub mod state;
pub mod template;

pub use config::EditorConfig;
pub use document::{Document, DOCUMENT_VERSION};
pub use editor::{Editor, ElementUpdate, LayerDirection};
pub use element::{
    generate_id, Element, ElementId, ElementKind, FontStyle, FontWeight, GroupContent, ImageContent,
    ImageFit, Marker, ShapeContent, ShapeKind, TextAlign, TextContent, TextDecoration, Transform,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{InputEvent, KeyEvent, KeyModifiers, PointerEvent, PointerPhase};
pub use geometry::{Bounds, Point};
pub use guides::{compute_guides, Guide, GuideAlignment, GuideOrientation};
pub use handles::{HandleKind, HandleLayout, ResizeHandle};
pub use history::History;
pub use interaction::{CanvasController, Gesture, TextEditSession, DEFAULT_TEXT_CONTENT};
pub use keyboard::{EditorCommand, Platform};
pub use scene::{RenderItem, SceneDescription, SelectionOutline};
pub use shape_path::{shape_path, PathCommand, ShapePath};
pub use slide::{Background, BackgroundKind, Slide, SlideId};
pub use state::{CanvasState, HistorySnapshot, Tool};
pub use template::{SlideTemplate, Template};

/// Slides core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
