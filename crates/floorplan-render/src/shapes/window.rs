//! Window openings, drawn centered on the anchor.

use super::{PaintStyle, ShapeRenderer, polyline};
use crate::palette;
use crate::scene::Scene2d;
use floorplan_core::element::Element;
use kurbo::{Line, Point, Rect, Stroke};

/// Window width when none is set.
pub const DEFAULT_WINDOW_WIDTH: f64 = 50.0;
/// Depth of the wall cut.
const THICKNESS: f64 = 8.0;
/// How far a bay window projects out of the wall.
const BAY_DEPTH: f64 = 20.0;
const BAY_FLARE: f64 = 10.0;

pub struct WindowRenderer;

impl ShapeRenderer for WindowRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let Some(anchor) = element.anchor() else {
            return;
        };
        let w = element.props.width.unwrap_or(DEFAULT_WINDOW_WIDTH);
        let t = style.anchored(anchor, element.rotation_degrees());
        let stroke = Stroke::new(style.line_width());
        let half = w / 2.0;
        let cut = Rect::new(-half, -THICKNESS / 2.0, half, THICKNESS / 2.0);

        scene.fill(t, palette::WINDOW_CUT, &cut);
        scene.stroke(&stroke, t, style.tint(palette::WINDOW), &cut);

        if element.has("bay") {
            let glass = polyline(&[
                Point::new(-half, 0.0),
                Point::new(-half - BAY_FLARE, -BAY_DEPTH),
                Point::new(half + BAY_FLARE, -BAY_DEPTH),
                Point::new(half, 0.0),
            ]);
            scene.stroke(&stroke, t, palette::WINDOW_GLASS, &glass);
        } else {
            let glass = Line::new((-half, 0.0), (half, 0.0));
            scene.stroke(&stroke, t, palette::WINDOW_GLASS, &glass);
        }

        if element.has("casement") || element.has("sliding") {
            let mullion = Line::new((0.0, -THICKNESS / 2.0), (0.0, THICKNESS / 2.0));
            scene.stroke(&stroke, t, palette::WINDOW_GLASS, &mullion);
        }
    }
}
