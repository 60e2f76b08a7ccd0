//! Door swings and sliding panels, drawn in the door's local frame.
//!
//! The hinge sits at the anchor and the door opens along +x.

use super::{PaintStyle, ShapeRenderer};
use crate::palette;
use crate::scene::Scene2d;
use floorplan_core::element::Element;
use kurbo::{Arc, BezPath, Point, Rect, Stroke, Vec2};
use std::f64::consts::FRAC_PI_2;

/// Door width when none is set.
pub const DEFAULT_DOOR_WIDTH: f64 = 40.0;
const ARC_TOLERANCE: f64 = 0.1;

/// Leaf from `hinge` plus a quarter swing of `radius` sweeping `sweep` radians.
fn swing(hinge: Point, radius: f64, sweep: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(hinge);
    path.line_to(hinge + Vec2::new(0.0, radius));
    let arc = Arc::new(hinge, (radius, radius), FRAC_PI_2, sweep, 0.0);
    path.extend(arc.append_iter(ARC_TOLERANCE));
    path
}

pub struct DoorRenderer;

impl ShapeRenderer for DoorRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let Some(anchor) = element.anchor() else {
            return;
        };
        let size = element.props.width.unwrap_or(DEFAULT_DOOR_WIDTH);
        let t = style.anchored(anchor, element.rotation_degrees());
        let color = style.tint(palette::DOOR);
        let stroke = Stroke::new(style.line_width());

        // Jambs at both ends of the opening.
        scene.stroke(&stroke, t, color, &Rect::new(-2.0, -5.0, 2.0, 5.0));
        scene.stroke(&stroke, t, color, &Rect::new(size - 2.0, -5.0, size + 2.0, 5.0));

        if element.has("double") || element.has("bifold") {
            let half = size / 2.0;
            scene.stroke(&stroke, t, color, &swing(Point::ZERO, half, -FRAC_PI_2));
            scene.stroke(&stroke, t, color, &swing(Point::new(size, 0.0), half, FRAC_PI_2));
        } else if element.has("sliding") || element.has("glass") {
            let panel = if element.has("glass") {
                palette::WALL_GLASS
            } else {
                color
            };
            let half = size / 2.0;
            let panels = [
                Rect::new(0.0, -2.0, half, 2.0),
                Rect::new(half, 2.0, size, 6.0),
            ];
            for rect in &panels {
                scene.fill(t, panel, rect);
                scene.stroke(&stroke, t, color, rect);
            }
        } else {
            scene.stroke(&stroke, t, color, &swing(Point::ZERO, size, -FRAC_PI_2));
        }
    }
}
