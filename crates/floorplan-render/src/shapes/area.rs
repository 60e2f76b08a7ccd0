//! Rooms, floors, roofs, exterior areas, rectangles and circles.

use super::{PaintStyle, ShapeRenderer, element_color};
use crate::palette;
use crate::scene::{Scene2d, TextAlign};
use floorplan_core::element::{Element, ElementKind};
use kurbo::{Circle, Rect, Stroke};
use peniko::Color;

/// Size of room and roof labels.
pub const LABEL_SIZE: f64 = 14.0;

pub struct AreaRenderer;

impl AreaRenderer {
    fn fill_color(element: &Element, selected: bool) -> Color {
        if selected {
            return palette::AREA_SELECTED;
        }
        match element.kind() {
            ElementKind::Floor => palette::FLOOR_FILL,
            ElementKind::Exterior if element.has("pool") => palette::POOL_FILL,
            ElementKind::Exterior if element.has("road") || element.has("pave") => {
                palette::ROAD_FILL
            }
            ElementKind::Exterior => palette::GARDEN_FILL,
            _ => palette::AREA_FILL,
        }
    }

    /// Uppercased label, falling back to the first word of the subtype.
    fn label(element: &Element) -> String {
        let text = match element.props.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => element.subtype.split('_').next().unwrap_or_default(),
        };
        text.to_uppercase()
    }
}

impl ShapeRenderer for AreaRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let Some((a, b)) = element.segment() else {
            return;
        };
        let rect = Rect::from_points(a, b);
        let t = style.camera;

        scene.fill(t, Self::fill_color(element, style.selected), &rect);
        scene.stroke(&Stroke::new(1.0), t, style.tint(palette::WHITE), &rect);

        if matches!(element.kind(), ElementKind::Room | ElementKind::Roof) {
            let label = Self::label(element);
            if !label.is_empty() {
                scene.text(
                    label,
                    rect.center(),
                    LABEL_SIZE,
                    palette::WHITE,
                    TextAlign::Center,
                    t,
                );
            }
        }
    }
}

/// Circles store their center and a rim point.
pub struct CircleRenderer;

impl ShapeRenderer for CircleRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let Some((center, rim)) = element.segment() else {
            return;
        };
        let circle = Circle::new(center, center.distance(rim));
        let t = style.camera;
        let fill = if style.selected {
            palette::AREA_SELECTED
        } else {
            palette::AREA_FILL
        };
        scene.fill(t, fill, &circle);
        let color = element_color(element, palette::WHITE);
        scene.stroke(&Stroke::new(style.line_width()), t, style.tint(color), &circle);
    }
}
