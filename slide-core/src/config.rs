//! Tunable constants of the editing engine.

use serde::{Deserialize, Serialize};

/// Configuration for the editor and its interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest width/height an element may be created or resized to.
    pub min_element_size: f32,
    /// Offset applied on both axes to duplicated and pasted elements.
    pub duplicate_offset: f32,
    /// Maximum distance (document units) at which an alignment guide appears.
    pub snap_threshold: f32,
    /// Guide extension past the elements for same-edge and center alignments.
    pub primary_guide_padding: f32,
    /// Guide extension past the elements for edge-touching alignments.
    pub edge_guide_padding: f32,
    /// Resize handle size in screen pixels.
    pub handle_size: f32,
    /// Distance of the rotation handle above the element, in screen pixels.
    pub rotation_handle_offset: f32,
    /// Smallest allowed zoom factor.
    pub min_zoom: f32,
    /// Largest allowed zoom factor.
    pub max_zoom: f32,
    /// Grid size of a fresh editor.
    pub default_grid_size: f32,
    /// Rotation increment when rotating with Shift held.
    pub rotation_snap_degrees: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_element_size: 10.0,
            duplicate_offset: 20.0,
            snap_threshold: 8.0,
            primary_guide_padding: 30.0,
            edge_guide_padding: 20.0,
            handle_size: 8.0,
            rotation_handle_offset: 20.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            default_grid_size: 20.0,
            rotation_snap_degrees: 15.0,
        }
    }
}

impl EditorConfig {
    /// The allowed zoom range. A range that is not finite, not positive or
    /// inverted falls back to the default `0.1..=5`.
    #[must_use]
    pub fn zoom_range(&self) -> (f32, f32) {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            (min, max)
        } else {
            tracing::warn!("Invalid zoom range {min}..={max}; using defaults");
            let defaults = Self::default();
            (defaults.min_zoom, defaults.max_zoom)
        }
    }

    /// Clamp a requested zoom factor into the allowed range.
    ///
    /// Returns `None` for NaN, which callers treat as "ignore the request".
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f32) -> Option<f32> {
        if zoom.is_nan() {
            return None;
        }
        let (min, max) = self.zoom_range();
        Some(zoom.clamp(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_zoom() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_zoom(999.0), Some(5.0));
        assert_eq!(config.clamp_zoom(-3.0), Some(0.1));
        assert_eq!(config.clamp_zoom(1.5), Some(1.5));
        assert_eq!(config.clamp_zoom(f32::NAN), None);
    }

    #[test]
    fn test_bad_zoom_range_falls_back_to_defaults() {
        let inverted: EditorConfig =
            serde_json::from_str(r#"{"min_zoom": 4, "max_zoom": 2}"#).expect("deserialize");
        assert_eq!(inverted.clamp_zoom(999.0), Some(5.0));
        assert_eq!(inverted.clamp_zoom(0.0), Some(0.1));

        let unbounded = EditorConfig {
            max_zoom: f32::NAN,
            ..EditorConfig::default()
        };
        assert_eq!(unbounded.zoom_range(), (0.1, 5.0));
        assert_eq!(unbounded.clamp_zoom(2.0), Some(2.0));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"snap_threshold": 4}"#).expect("deserialize");
        assert!((config.snap_threshold - 4.0).abs() < f32::EPSILON);
        assert!((config.min_element_size - 10.0).abs() < f32::EPSILON);
    }
}
