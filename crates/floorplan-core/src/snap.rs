//! Snap functionality for aligning points to the plan grid.

use kurbo::Point;

/// Grid pitch in world units (matches the visual grid).
pub const GRID_SIZE: f64 = 50.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether snapping was applied.
    pub snapped: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped: false,
        }
    }
}

/// Snap a point to the nearest multiple of `step` on both axes.
pub fn snap_to_grid(point: Point, step: f64) -> SnapResult {
    if step <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new((point.x / step).round() * step, (point.y / step).round() * step),
        snapped: true,
    }
}

/// Snap a point to half the grid pitch when snapping is enabled.
///
/// Drawing snaps to `grid_size / 2`, so a 50-unit grid yields 25-unit steps.
pub fn snap(point: Point, grid_size: f64, enabled: bool) -> Point {
    if enabled {
        snap_to_grid(point, grid_size / 2.0).point
    } else {
        point
    }
}
