//! Camera module for pan/zoom transforms of the plan view.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%" in the UI.
pub const BASE_ZOOM: f64 = 1.0;

/// Smallest zoom the plan view allows.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom the plan view allows.
pub const MAX_ZOOM: f64 = 5.0;

/// Convert a screen point to world coordinates: `world = (screen - pan) / zoom`.
pub fn screen_to_world(screen: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new((screen.x - pan.x) / zoom, (screen.y - pan.y) / zoom)
}

/// Convert a world point to screen coordinates: `screen = world * zoom + pan`.
pub fn world_to_screen(world: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new(world.x * zoom + pan.x, world.y * zoom + pan.y)
}

/// Camera manages the view transform for the plan canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan) in screen pixels.
    pub offset: Vec2,
    /// Current zoom level.
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with explicit zoom bounds.
    pub fn with_zoom_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom: BASE_ZOOM.clamp(min_zoom, max_zoom),
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling (screen to world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        screen_to_world(screen_point, self.offset, self.zoom)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        world_to_screen(world_point, self.offset, self.zoom)
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera by a factor, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.set_zoom_at(screen_point, self.zoom * factor);
    }

    /// Set an absolute zoom level (clamped), keeping the given screen point fixed.
    pub fn set_zoom_at(&mut self, screen_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = BASE_ZOOM.clamp(self.min_zoom, self.max_zoom);
    }

    /// The world-space rectangle visible through a viewport of the given size.
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        let top_left = self.screen_to_world(Point::ZERO);
        let bottom_right = self.screen_to_world(Point::new(viewport.width, viewport.height));
        Rect::from_points(top_left, bottom_right)
    }
}
