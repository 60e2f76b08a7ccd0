//! Walls, lines, wires, pipes and boundaries.

use super::{PaintStyle, ShapeRenderer, element_color, polyline};
use crate::palette;
use crate::scene::Scene2d;
use floorplan_core::element::{Element, ElementKind, FixtureClass};
use kurbo::Stroke;

/// Default wall thickness in world units.
pub const DEFAULT_WALL_THICKNESS: f64 = 12.0;
/// Pipe stroke width.
const PIPE_WIDTH: f64 = 4.0;
/// The wall core is this much narrower than the wall.
const CORE_INSET: f64 = 4.0;

pub struct LinearRenderer;

impl ShapeRenderer for LinearRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let points = element.points();
        if points.len() < 2 {
            return;
        }
        let path = polyline(points);
        let t = style.camera;

        if element.kind() == ElementKind::Wall {
            let thickness = element.props.width.unwrap_or(DEFAULT_WALL_THICKNESS);
            let brick = element.has("brick");
            let glass = element.has("glass");
            let base = if brick {
                palette::WALL_BRICK
            } else if glass {
                palette::WALL_GLASS
            } else {
                element_color(element, palette::WALL)
            };
            scene.stroke(&Stroke::new(thickness), t, style.tint(base), &path);

            if !style.selected && !glass && thickness > CORE_INSET {
                let core = if brick {
                    palette::WALL_BRICK_CORE
                } else {
                    palette::WALL_CORE
                };
                scene.stroke(&Stroke::new(thickness - CORE_INSET), t, core, &path);
            }
            return;
        }

        let width = style.line_width();
        if element.has("wire") || element.has("strip") {
            let stroke = Stroke::new(width).with_dashes(0.0, [5.0, 5.0]);
            scene.stroke(&stroke, t, style.tint(palette::ELECTRICAL), &path);
        } else if element.has("pipe")
            || element.kind() == ElementKind::Fixture(FixtureClass::Plumbing)
        {
            scene.stroke(&Stroke::new(PIPE_WIDTH), t, style.tint(palette::PLUMBING), &path);
        } else if element.kind() == ElementKind::Exterior {
            let stroke = Stroke::new(width).with_dashes(0.0, [10.0, 4.0]);
            scene.stroke(&stroke, t, style.tint(palette::EXTERIOR), &path);
        } else {
            let color = element_color(element, palette::WHITE);
            scene.stroke(&Stroke::new(width), t, style.tint(color), &path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::layer::LayerId;
    use kurbo::{Affine, Point};

    fn style(selected: bool) -> PaintStyle {
        PaintStyle {
            camera: Affine::IDENTITY,
            selected,
            highlight: palette::SELECTED,
        }
    }

    fn path(kind: ElementKind, subtype: &str) -> Element {
        Element::path(
            kind,
            subtype,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default_layer(),
        )
    }

    fn widths(scene: &Scene2d, element: &Element) -> Vec<f64> {
        scene
            .strokes_for(element.id())
            .iter()
            .map(|(s, _)| s.width)
            .collect()
    }

    fn render(element: &Element, selected: bool) -> Scene2d {
        let mut scene = Scene2d::new();
        scene.set_owner(Some(element.id()));
        LinearRenderer.render(&mut scene, element, &style(selected));
        scene
    }

    #[test]
    fn test_wall_draws_body_then_core() {
        let wall = path(ElementKind::Wall, "ext");
        let scene = render(&wall, false);
        assert_eq!(widths(&scene, &wall), vec![12.0, 8.0]);
        let strokes = scene.strokes_for(wall.id());
        assert_eq!(strokes[0].1, palette::WALL);
        assert_eq!(strokes[1].1, palette::WALL_CORE);
    }

    #[test]
    fn test_selected_wall_has_no_core() {
        let wall = path(ElementKind::Wall, "ext");
        let scene = render(&wall, true);
        let strokes = scene.strokes_for(wall.id());
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].1, palette::SELECTED);
    }

    #[test]
    fn test_glass_wall_has_no_core() {
        let wall = path(ElementKind::Wall, "glass");
        let scene = render(&wall, false);
        let strokes = scene.strokes_for(wall.id());
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].1, palette::WALL_GLASS);
    }

    #[test]
    fn test_brick_wall_colors() {
        let wall = path(ElementKind::Wall, "brick");
        let scene = render(&wall, false);
        let strokes = scene.strokes_for(wall.id());
        assert_eq!(strokes[0].1, palette::WALL_BRICK);
        assert_eq!(strokes[1].1, palette::WALL_BRICK_CORE);
    }

    #[test]
    fn test_custom_wall_thickness() {
        let mut wall = path(ElementKind::Wall, "int");
        wall.props.width = Some(20.0);
        let scene = render(&wall, false);
        assert_eq!(widths(&scene, &wall), vec![20.0, 16.0]);
    }

    #[test]
    fn test_wire_is_dashed() {
        let wire = path(ElementKind::Fixture(FixtureClass::Electrical), "wire");
        let scene = render(&wire, false);
        let strokes = scene.strokes_for(wire.id());
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].0.dash_pattern.as_slice(), &[5.0, 5.0]);
        assert_eq!(strokes[0].1, palette::ELECTRICAL);
    }

    #[test]
    fn test_pipe_width() {
        let pipe = path(ElementKind::Fixture(FixtureClass::Plumbing), "pipe_water");
        let scene = render(&pipe, false);
        assert_eq!(widths(&scene, &pipe), vec![4.0]);
    }

    #[test]
    fn test_line_thickens_when_selected() {
        let line = path(ElementKind::Annotation, "line");
        assert_eq!(widths(&render(&line, false), &line), vec![2.0]);
        assert_eq!(widths(&render(&line, true), &line), vec![3.0]);
    }

    #[test]
    fn test_single_point_draws_nothing() {
        let stub = Element::path(
            ElementKind::Wall,
            "ext",
            vec![Point::new(1.0, 1.0)],
            LayerId::default_layer(),
        );
        assert!(render(&stub, false).is_empty());
    }
}
