//! Editor configuration: the tunable constants of the editing engine.

use crate::color::Rgba;
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable constants. All distances are world units and do not scale with zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid pitch; drawing snaps to half of it.
    pub grid_size: f64,
    /// Hit radius around the midpoint of line-like elements.
    pub line_hit_radius: f64,
    /// Hit radius around the anchor of point-anchored elements.
    pub point_hit_radius: f64,
    /// Drags shorter than this are discarded as accidental clicks.
    pub drag_threshold: f64,
    pub default_wall_thickness: f64,
    pub default_wall_height: f64,
    /// Footprint of newly placed elements.
    pub default_place_size: f64,
    pub default_place_color: Rgba,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per wheel delta unit.
    pub wheel_zoom_step: f64,
    /// Zoom factor applied by the zoom-in and zoom-out tools.
    pub zoom_tool_factor: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            line_hit_radius: 40.0,
            point_hit_radius: 30.0,
            drag_threshold: 5.0,
            default_wall_thickness: 12.0,
            default_wall_height: 120.0,
            default_place_size: 40.0,
            default_place_color: Rgba::from_u32(0x6366f1),
            min_zoom: 0.1,
            max_zoom: 5.0,
            wheel_zoom_step: 0.001,
            zoom_tool_factor: 1.2,
        }
    }
}

impl EditorConfig {
    /// Load a (possibly partial) JSON override on top of the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "grid_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid {
                field: "min_zoom",
                reason: format!("must be in (0, {}]", self.max_zoom),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.grid_size - 50.0).abs() < f64::EPSILON);
        assert!((config.point_hit_radius - 30.0).abs() < f64::EPSILON);
        assert!((config.line_hit_radius - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.default_place_color.to_string(), "#6366f1");
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json_str(r#"{"drag_threshold": 8.0}"#).unwrap();
        assert!((config.drag_threshold - 8.0).abs() < f64::EPSILON);
        assert!((config.grid_size - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            EditorConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json_str(r#"{"grid_size": 0}"#),
            Err(ConfigError::Invalid { field: "grid_size", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json_str(r#"{"min_zoom": 6}"#),
            Err(ConfigError::Invalid { field: "min_zoom", .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json_str(&json).unwrap(), config);
    }
}
