//! Per-session UI state: camera, active tool, units, toggles and render settings.
//!
//! Nothing here is undo-tracked.

use crate::camera::Camera;
use crate::tools::{ToolCategory, ToolKind};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Texture resolution for procedural 3D materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureResolution {
    #[default]
    #[serde(rename = "2k")]
    K2,
    #[serde(rename = "4k")]
    K4,
}

impl TextureResolution {
    /// Edge length in pixels of a generated texture.
    pub fn pixels(self) -> u32 {
        match self {
            TextureResolution::K2 => 1024,
            TextureResolution::K4 => 2048,
        }
    }
}

/// 3D render-quality toggles. Changing any of them reinitializes the 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Physically based materials.
    pub pbr: bool,
    pub shadows: bool,
    /// Environment (image based) lighting.
    pub environment: bool,
    pub bloom: bool,
    pub ambient_occlusion: bool,
    pub texture_resolution: TextureResolution,
    pub glass_transparency: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            pbr: true,
            shadows: true,
            environment: true,
            bloom: false,
            ambient_occlusion: true,
            texture_resolution: TextureResolution::K2,
            glass_transparency: true,
        }
    }
}

/// Measurement unit for displayed lengths. One world unit is one inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "in")]
    Inches,
}

impl Unit {
    const INCHES_PER_FOOT: f64 = 12.0;
    const INCHES_PER_METER: f64 = 39.370_078_740_157_48;

    /// Convert a world length into this unit.
    pub fn from_world(self, length: f64) -> f64 {
        match self {
            Unit::Feet => length / Self::INCHES_PER_FOOT,
            Unit::Meters => length / Self::INCHES_PER_METER,
            Unit::Inches => length,
        }
    }

    /// Convert a length in this unit into world units.
    pub fn to_world(self, length: f64) -> f64 {
        match self {
            Unit::Feet => length * Self::INCHES_PER_FOOT,
            Unit::Meters => length * Self::INCHES_PER_METER,
            Unit::Inches => length,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Feet => "ft",
            Unit::Meters => "m",
            Unit::Inches => "in",
        }
    }
}

/// Which projection is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Plan2d,
    Model3d,
}

/// UI session state shared by both views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub camera: Camera,
    pub active_tool: ToolKind,
    pub active_category: ToolCategory,
    pub unit: Unit,
    pub grid_enabled: bool,
    pub snap_enabled: bool,
    pub view_mode: ViewMode,
    pub render_settings: RenderSettings,
    pub project_name: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            active_tool: ToolKind::Select,
            active_category: ToolCategory::Structure,
            unit: Unit::Feet,
            grid_enabled: true,
            snap_enabled: true,
            view_mode: ViewMode::Plan2d,
            render_settings: RenderSettings::default(),
            project_name: "Untitled Project".to_string(),
        }
    }
}

/// A change to the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPatch {
    /// Pan by a screen-space delta.
    PanBy(Vec2),
    /// Set an absolute zoom, keeping `screen` fixed.
    ZoomAt { screen: Point, zoom: f64 },
    SetTool(ToolKind),
    SetCategory(ToolCategory),
    ToggleGrid,
    ToggleSnap,
    SetUnit(Unit),
    SetViewMode(ViewMode),
    SetRenderSettings(RenderSettings),
    SetProjectName(String),
}

impl ViewState {
    /// Apply a patch. Returns whether anything changed.
    pub fn apply(&mut self, patch: ViewPatch) -> bool {
        let before = self.clone();
        match patch {
            ViewPatch::PanBy(delta) => self.camera.pan(delta),
            ViewPatch::ZoomAt { screen, zoom } => self.camera.set_zoom_at(screen, zoom),
            ViewPatch::SetTool(tool) => {
                if let Some(category) = tool.category() {
                    self.active_category = category;
                }
                self.active_tool = tool;
            }
            ViewPatch::SetCategory(category) => self.active_category = category,
            ViewPatch::ToggleGrid => self.grid_enabled = !self.grid_enabled,
            ViewPatch::ToggleSnap => self.snap_enabled = !self.snap_enabled,
            ViewPatch::SetUnit(unit) => self.unit = unit,
            ViewPatch::SetViewMode(mode) => self.view_mode = mode,
            ViewPatch::SetRenderSettings(settings) => self.render_settings = settings,
            ViewPatch::SetProjectName(name) => self.project_name = name,
        }
        *self != before
    }
}
