//! Plan projector: turns the element collection into a 2D display list.

use crate::palette;
use crate::renderer::{GridStyle, RenderContext, Renderer};
use crate::scene::Scene2d;
use crate::shapes::{PaintStyle, render_element};
use floorplan_core::controller::DragPreview;
use floorplan_core::element::{Element, ElementKind};
use floorplan_core::tools::DrawShape;
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Stroke};

/// Paint order bucket; lower values are drawn first.
pub fn paint_priority(element: &Element) -> u8 {
    match element.kind() {
        ElementKind::Floor => 0,
        ElementKind::Exterior => 1,
        ElementKind::Room => 2,
        ElementKind::Wall => 3,
        ElementKind::Window => 4,
        ElementKind::Door => 5,
        ElementKind::Stair => 6,
        ElementKind::Furniture => 7,
        ElementKind::Decor => 8,
        ElementKind::Fixture(_) => 9,
        ElementKind::Roof | ElementKind::Column | ElementKind::Annotation => 10,
    }
}

/// Visible elements in paint order. The sort is stable, so elements of the
/// same priority keep their model order.
pub fn paint_list<'a>(ctx: &RenderContext<'a>) -> Vec<&'a Element> {
    let mut visible: Vec<&Element> = ctx
        .elements
        .iter()
        .filter(|e| ctx.layers.is_visible(&e.layer_id))
        .collect();
    visible.sort_by_key(|e| paint_priority(e));
    visible
}

/// Draws the plan view into a [`Scene2d`].
pub struct PlanRenderer {
    scene: Scene2d,
    zoom: f64,
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene2d::new(),
            zoom: 1.0,
        }
    }

    /// The last built frame.
    pub fn scene(&self) -> &Scene2d {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene2d {
        std::mem::take(&mut self.scene)
    }

    fn grid_bounds(&self, viewport: Rect, transform: Affine, grid_size: f64) -> (f64, f64, f64, f64) {
        let inv = transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);

        let start_x = (world_tl.x / grid_size).floor() * grid_size;
        let start_y = (world_tl.y / grid_size).floor() * grid_size;
        let end_x = (world_br.x / grid_size).ceil() * grid_size;
        let end_y = (world_br.y / grid_size).ceil() * grid_size;

        (start_x, start_y, end_x, end_y)
    }

    /// Grid lines stay one pixel wide at any zoom.
    fn render_grid_lines(&mut self, viewport: Rect, transform: Affine, grid_size: f64) {
        let stroke = Stroke::new(1.0 / self.zoom);
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += grid_size;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += grid_size;
        }
        self.scene.stroke(&stroke, transform, palette::GRID, &path);
    }

    fn render_grid_dots(&mut self, viewport: Rect, transform: Affine, grid_size: f64) {
        let dot = 1.5 / self.zoom;
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                path.move_to(Point::new(x - dot, y - dot));
                path.line_to(Point::new(x + dot, y - dot));
                path.line_to(Point::new(x + dot, y + dot));
                path.line_to(Point::new(x - dot, y + dot));
                path.close_path();
                y += grid_size;
            }
            x += grid_size;
        }
        self.scene.fill(transform, palette::GRID, &path);
    }

    /// Dashed outline of an in-progress drag.
    fn render_preview(&mut self, preview: &DragPreview, transform: Affine) {
        let stroke = Stroke::new(1.0 / self.zoom).with_dashes(0.0, [5.0 / self.zoom, 5.0 / self.zoom]);
        let color = palette::PREVIEW;
        match preview.shape {
            DrawShape::Segment => {
                let line = Line::new(preview.start, preview.current);
                self.scene.stroke(&stroke, transform, color, &line);
            }
            DrawShape::Circle => {
                let circle = Circle::new(preview.start, preview.start.distance(preview.current));
                self.scene.stroke(&stroke, transform, color, &circle);
            }
            DrawShape::Rectangle => {
                let rect = Rect::from_points(preview.start, preview.current);
                self.scene.stroke(&stroke, transform, color, &rect);
            }
        }
    }
}

impl Renderer for PlanRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.scene.set_background(ctx.background_color);
        self.zoom = ctx.view.camera.zoom;

        let camera_transform = ctx.view.camera.transform();
        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);

        if ctx.view.grid_enabled && ctx.grid_size > 0.0 {
            match ctx.grid_style {
                GridStyle::None => {}
                GridStyle::Lines => self.render_grid_lines(viewport, camera_transform, ctx.grid_size),
                GridStyle::Dots => self.render_grid_dots(viewport, camera_transform, ctx.grid_size),
            }
        }

        for element in paint_list(ctx) {
            let style = PaintStyle {
                camera: camera_transform,
                selected: element.selected,
                highlight: ctx.selection_color,
            };
            render_element(&mut self.scene, element, &style);
        }

        if let Some(preview) = &ctx.preview {
            self.render_preview(preview, camera_transform);
        }
        log::trace!("plan frame built with {} commands", self.scene.commands().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCommand;
    use floorplan_core::layer::{LayerId, LayerPatch, LayerSet};
    use floorplan_core::view_state::ViewState;
    use kurbo::Size;

    fn wall(layer: LayerId) -> Element {
        Element::path(
            ElementKind::Wall,
            "ext",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            layer,
        )
    }

    fn room() -> Element {
        Element::path(
            ElementKind::Room,
            "living",
            vec![Point::new(0.0, 0.0), Point::new(200.0, 150.0)],
            LayerId::default_layer(),
        )
    }

    fn sofa() -> Element {
        Element::anchored(
            ElementKind::Furniture,
            "sofa_l",
            Point::new(50.0, 50.0),
            0.0,
            LayerId::default_layer(),
        )
    }

    fn build(elements: &[Element], layers: &LayerSet, view: &ViewState) -> Scene2d {
        let mut renderer = PlanRenderer::new();
        let ctx = RenderContext::new(elements, layers, view, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        renderer.take_scene()
    }

    #[test]
    fn test_build_empty_scene_draws_grid() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let scene = build(&[], &layers, &view);
        assert_eq!(scene.commands().len(), 1);
        assert!(scene.paint_order().is_empty());
    }

    #[test]
    fn test_grid_disabled() {
        let layers = LayerSet::new();
        let view = ViewState {
            grid_enabled: false,
            ..ViewState::default()
        };
        assert!(build(&[], &layers, &view).is_empty());
    }

    #[test]
    fn test_grid_line_width_tracks_zoom() {
        let layers = LayerSet::new();
        let mut view = ViewState::default();
        view.camera.zoom = 2.0;
        let scene = build(&[], &layers, &view);
        let DrawCommand::Stroke { stroke, .. } = &scene.commands()[0] else {
            panic!("expected grid stroke");
        };
        assert!((stroke.width - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_paint_order_by_priority() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let (s, w, r) = (sofa(), wall(LayerId::default_layer()), room());
        let elements = vec![s.clone(), w.clone(), r.clone()];
        let scene = build(&elements, &layers, &view);
        assert_eq!(scene.paint_order(), vec![r.id(), w.id(), s.id()]);
    }

    #[test]
    fn test_equal_priority_keeps_model_order() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let a = wall(LayerId::default_layer());
        let b = wall(LayerId::default_layer());
        let scene = build(&[a.clone(), b.clone()], &layers, &view);
        assert_eq!(scene.paint_order(), vec![a.id(), b.id()]);
    }

    #[test]
    fn test_wall_and_room_output() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let w = wall(LayerId::default_layer());
        let scene = build(&[w.clone(), room()], &layers, &view);

        let widths: Vec<f64> = scene.strokes_for(w.id()).iter().map(|(s, _)| s.width).collect();
        assert_eq!(widths, vec![12.0, 8.0]);

        let texts = scene.texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "LIVING");
        assert_eq!(texts[0].1, Point::new(100.0, 75.0));
    }

    #[test]
    fn test_hidden_layer_not_drawn() {
        let mut layers = LayerSet::new();
        let hidden = layers.add();
        let _ = layers.update(&hidden, LayerPatch::visible(false));
        let view = ViewState::default();
        let w = wall(hidden);
        let scene = build(&[w.clone()], &layers, &view);
        assert_eq!(scene.commands_for(w.id()).count(), 0);
    }

    #[test]
    fn test_selected_wall_uses_highlight() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let mut w = wall(LayerId::default_layer());
        w.selected = true;
        let scene = build(&[w.clone()], &layers, &view);
        let strokes = scene.strokes_for(w.id());
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].1, palette::SELECTED);
    }

    #[test]
    fn test_preview_is_dashed() {
        let layers = LayerSet::new();
        let view = ViewState::default();
        let mut renderer = PlanRenderer::new();
        let ctx = RenderContext::new(&[], &layers, &view, Size::new(800.0, 600.0)).with_preview(
            Some(DragPreview {
                start: Point::ZERO,
                current: Point::new(100.0, 50.0),
                shape: DrawShape::Rectangle,
            }),
        );
        renderer.build_scene(&ctx);
        let last = renderer.scene().commands().last().cloned();
        let Some(DrawCommand::Stroke { stroke, color, .. }) = last else {
            panic!("expected preview stroke");
        };
        assert_eq!(color, palette::PREVIEW);
        assert_eq!(stroke.dash_pattern.as_slice(), &[5.0, 5.0]);
    }
}
