//! Renderer trait abstraction.

use floorplan_core::controller::DragPreview;
use floorplan_core::element::Element;
use floorplan_core::layer::LayerSet;
use floorplan_core::view_state::ViewState;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

use crate::palette;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    /// No drawing target is available; the frame is skipped.
    #[error("No drawing context available")]
    NoContext,
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only intersection dots.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Elements in model order.
    pub elements: &'a [Element],
    pub layers: &'a LayerSet,
    /// Camera, grid toggle and active tool.
    pub view: &'a ViewState,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// In-progress drag of a drawing tool.
    pub preview: Option<DragPreview>,
    pub background_color: Color,
    /// Grid display style when the grid is enabled.
    pub grid_style: GridStyle,
    /// Grid pitch in world units.
    pub grid_size: f64,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(
        elements: &'a [Element],
        layers: &'a LayerSet,
        view: &'a ViewState,
        viewport_size: Size,
    ) -> Self {
        Self {
            elements,
            layers,
            view,
            viewport_size,
            preview: None,
            background_color: palette::BACKGROUND,
            grid_style: GridStyle::Lines,
            grid_size: floorplan_core::snap::GRID_SIZE,
            selection_color: palette::SELECTED,
        }
    }

    /// Set the drag preview.
    pub fn with_preview(mut self, preview: Option<DragPreview>) -> Self {
        self.preview = preview;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the grid pitch.
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the selection highlight color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame. Called once per frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
