//! Slide templates.

use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::element::Element;
use crate::error::{CanvasError, CanvasResult};
use crate::slide::{Background, Slide};

/// One slide of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTemplate {
    /// Slide title.
    #[serde(default)]
    pub title: String,
    /// Background.
    #[serde(default)]
    pub background: Background,
    /// Top-level elements.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Members of grouped elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_members: Vec<Element>,
}

impl SlideTemplate {
    /// Build a slide with fresh slide and element IDs.
    #[must_use]
    pub fn instantiate(&self) -> Slide {
        let mut slide = Slide::new(self.title.clone()).with_elements(self.elements.clone());
        slide.background = self.background.clone();
        slide.group_members.clone_from(&self.group_members);
        slide.absorb_group_children();
        slide.restamp_element_ids();
        slide.drop_dangling_children();
        slide
    }
}

/// A named set of slides to start a deck from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Gallery category.
    #[serde(default)]
    pub category: String,
    /// Slides in order.
    pub slides: Vec<SlideTemplate>,
}

impl Template {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] for malformed JSON and
    /// [`CanvasError::InvalidTemplate`] for a template without slides.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    fn validate(&self) -> CanvasResult<()> {
        if self.slides.is_empty() {
            return Err(CanvasError::InvalidTemplate(format!(
                "template '{}' has no slides",
                self.name
            )));
        }
        Ok(())
    }
}

impl Editor {
    /// Replace the deck with fresh copies of a template's slides.
    ///
    /// Every slide and element gets a new ID. The viewport is reset, the
    /// selection and history are cleared and the first slide becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidTemplate`] for a template without
    /// slides; the editor is unchanged.
    pub fn apply_template(&mut self, template: &Template) -> CanvasResult<()> {
        template.validate()?;
        let slides: Vec<Slide> = template.slides.iter().map(SlideTemplate::instantiate).collect();
        if !self.replace_slides(slides) {
            return Err(CanvasError::InvalidTemplate(template.name.clone()));
        }
        self.reset_viewport();
        tracing::info!(
            "Applied template '{}' ({} slide(s))",
            template.name,
            template.slides.len()
        );
        Ok(())
    }
}
