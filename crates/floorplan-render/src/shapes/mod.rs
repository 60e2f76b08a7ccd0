//! Per-family shape renderers for plan elements.

mod area;
mod door;
mod furniture;
mod linear;
mod window;

pub use furniture::{BedSize, Glyph};

use crate::scene::Scene2d;
use floorplan_core::element::{Element, ElementKind, Geometry};
use kurbo::{Affine, BezPath, Point};
use peniko::Color;

/// Styling shared by all shape renderers for one element.
#[derive(Debug, Clone, Copy)]
pub struct PaintStyle {
    /// World-to-screen transform of the frame.
    pub camera: Affine,
    pub selected: bool,
    pub highlight: Color,
}

impl PaintStyle {
    /// Primary stroke width: thicker when selected.
    pub fn line_width(&self) -> f64 {
        if self.selected { 3.0 } else { 2.0 }
    }

    /// `base` unless selected.
    pub fn tint(&self, base: Color) -> Color {
        if self.selected { self.highlight } else { base }
    }

    /// Local transform of a point-anchored element.
    pub fn anchored(&self, anchor: Point, rotation_degrees: f64) -> Affine {
        self.camera * Affine::translate(anchor.to_vec2()) * Affine::rotate(rotation_degrees.to_radians())
    }
}

/// Draws one family of elements.
pub trait ShapeRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle);
}

/// Which renderer draws an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFamily {
    /// Walls, lines, wires, pipes, boundaries.
    Linear,
    /// Rect-like fills: rooms, floors, roofs, exterior areas.
    Area,
    Circle,
    Door,
    Window,
    /// Anchored glyphs.
    Furniture,
}

impl ShapeFamily {
    pub fn of(element: &Element) -> Self {
        match element.geometry {
            Geometry::Anchored { .. } => match element.kind() {
                ElementKind::Door => ShapeFamily::Door,
                ElementKind::Window => ShapeFamily::Window,
                _ => ShapeFamily::Furniture,
            },
            Geometry::Path { .. } => match element.kind() {
                ElementKind::Room | ElementKind::Floor | ElementKind::Roof => ShapeFamily::Area,
                ElementKind::Exterior if !element.has("bound") => ShapeFamily::Area,
                ElementKind::Annotation if element.subtype == "rect" => ShapeFamily::Area,
                ElementKind::Annotation if element.subtype == "circle" => ShapeFamily::Circle,
                _ => ShapeFamily::Linear,
            },
        }
    }

    fn renderer(self) -> &'static dyn ShapeRenderer {
        match self {
            ShapeFamily::Linear => &linear::LinearRenderer,
            ShapeFamily::Area => &area::AreaRenderer,
            ShapeFamily::Circle => &area::CircleRenderer,
            ShapeFamily::Door => &door::DoorRenderer,
            ShapeFamily::Window => &window::WindowRenderer,
            ShapeFamily::Furniture => &furniture::FurnitureRenderer,
        }
    }
}

/// Draw one element with the renderer for its family.
pub fn render_element(scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
    scene.set_owner(Some(element.id()));
    ShapeFamily::of(element).renderer().render(scene, element, style);
    scene.set_owner(None);
}

/// Open polyline through `points`.
pub(crate) fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// Element color from its properties, or `fallback`.
pub(crate) fn element_color(element: &Element, fallback: Color) -> Color {
    element.props.color.map(Color::from).unwrap_or(fallback)
}
