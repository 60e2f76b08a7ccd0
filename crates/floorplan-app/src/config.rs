//! Application configuration.

use floorplan_core::{ConfigError, EditorConfig, RenderSettings};
use floorplan_render::GridStyle;
use peniko::Color;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Viewport size in pixels, shared by the plan view and the 3D view.
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub background_color: Color,
    pub editor: EditorConfig,
    /// Initial 3D render settings.
    pub render_settings: RenderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Floor Plan".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            background_color: floorplan_render::palette::BACKGROUND,
            editor: EditorConfig::default(),
            render_settings: RenderSettings::default(),
        }
    }
}

impl AppConfig {
    /// Replace the editor constants with a JSON override.
    pub fn with_editor_json(mut self, json: &str) -> Result<Self, ConfigError> {
        self.editor = EditorConfig::from_json_str(json)?;
        Ok(self)
    }

    /// Read the editor override named by `FLOORPLAN_CONFIG`, if set.
    ///
    /// A missing variable keeps the defaults. An unreadable or malformed file
    /// is logged and ignored.
    pub fn from_env() -> Self {
        let config = Self::default();
        let Ok(path) = std::env::var("FLOORPLAN_CONFIG") else {
            return config;
        };
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read config {}: {}", path, e);
                return config;
            }
        };
        match config.clone().with_editor_json(&json) {
            Ok(config) => {
                log::info!("Loaded editor config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.grid_style, GridStyle::Lines);
        assert!((config.editor.grid_size - 50.0).abs() < f64::EPSILON);
        assert!(config.render_settings.pbr);
    }

    #[test]
    fn test_editor_override() {
        let config = AppConfig::default()
            .with_editor_json(r#"{"point_hit_radius": 12.0}"#)
            .unwrap();
        assert!((config.editor.point_hit_radius - 12.0).abs() < f64::EPSILON);
        assert!((config.editor.line_hit_radius - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_override_is_error() {
        assert!(AppConfig::default().with_editor_json("not json").is_err());
    }
}
