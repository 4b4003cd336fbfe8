//! JSON document import and export.
//!
//! The document format is `{version, createdAt, slides}` with ISO-8601
//! dates. Importing replaces the whole deck and clears history; a failed
//! import leaves the editor untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::error::{CanvasError, CanvasResult};
use crate::slide::Slide;

/// Format version written on export.
pub const DOCUMENT_VERSION: &str = "1.0";

/// A serialized deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Export time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

impl Document {
    /// Wrap slides in a document stamped with the current time.
    #[must_use]
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            version: default_version(),
            created_at: Utc::now(),
            slides,
        }
    }

    /// Parse and validate a document.
    ///
    /// Group children listed as top-level siblings of their group are moved
    /// into the slide's member pool. References to members that do not
    /// exist are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDocument`] when there is no `slides`
    /// array, [`CanvasError::EmptyDocument`] when it is empty and
    /// [`CanvasError::Serialization`] for malformed JSON or slides.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value.get("slides") {
            Some(serde_json::Value::Array(slides)) if slides.is_empty() => {
                return Err(CanvasError::EmptyDocument);
            }
            Some(serde_json::Value::Array(_)) => {}
            _ => {
                return Err(CanvasError::InvalidDocument(
                    "missing slides array".to_string(),
                ));
            }
        }

        let mut document: Self = serde_json::from_value(value)?;
        for slide in &mut document.slides {
            let absorbed = slide.absorb_group_children();
            if absorbed > 0 {
                tracing::debug!(
                    "Slide {}: moved {absorbed} sibling group child(ren) into the member pool",
                    slide.id
                );
            }
            let dropped = slide.drop_dangling_children();
            if dropped > 0 {
                tracing::warn!(
                    "Slide {} referenced {dropped} missing group member(s); dropped",
                    slide.id
                );
            }
        }
        Ok(document)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] if serialization fails.
    pub fn to_json_pretty(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Editor {
    /// Replace the deck with an imported document.
    ///
    /// The first slide becomes current; selection and history are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::EmptyDocument`] if the document has no slides.
    pub fn import_document(&mut self, document: Document) -> CanvasResult<()> {
        let count = document.slides.len();
        if !self.replace_slides(document.slides) {
            return Err(CanvasError::EmptyDocument);
        }
        tracing::info!("Imported {count} slide(s)");
        Ok(())
    }

    /// Parse and import a JSON document.
    ///
    /// # Errors
    ///
    /// See [`Document::from_json`]. The editor is unchanged on error.
    pub fn import_json(&mut self, json: &str) -> CanvasResult<()> {
        let document = Document::from_json(json)?;
        self.import_document(document)
    }

    /// The deck as a document.
    #[must_use]
    pub fn export_document(&self) -> Document {
        Document::new(self.slides().to_vec())
    }

    /// The deck as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] if serialization fails.
    pub fn export_json(&self) -> CanvasResult<String> {
        self.export_document().to_json_pretty()
    }
}
