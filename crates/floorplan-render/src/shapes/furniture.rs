//! Top-down glyphs for furniture, fixtures and other anchored items.

use super::{PaintStyle, ShapeRenderer, element_color};
use crate::palette;
use crate::scene::{Scene2d, TextAlign};
use floorplan_core::element::Element;
use kurbo::{Affine, BezPath, Circle, Ellipse, Line, Point, Rect, RoundedRect, Stroke};
use peniko::Color;
use std::f64::consts::TAU;

/// Footprint used when an element has no size.
pub const DEFAULT_SIZE: f64 = 40.0;
/// Size of the fallback box caption.
const CAPTION_SIZE: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedSize {
    King,
    Queen,
    Single,
}

impl BedSize {
    fn width(self) -> f64 {
        match self {
            BedSize::King => 76.0,
            BedSize::Queen => 60.0,
            BedSize::Single => 40.0,
        }
    }
}

/// Recognised top-down glyphs. Anything else is drawn as a labelled box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Bed(BedSize),
    LSofa,
    Sofa,
    Table { round: bool, glass: bool },
    Toilet,
    Basin,
    KitchenSink,
    Stove,
    Fridge,
    Wardrobe,
    TvCabinet,
    Bathtub,
    Tree,
    Car,
    Bike,
    Lamp { fan: bool },
    Rug,
    Chair,
    Fallback,
}

impl Glyph {
    /// Resolve a glyph from a tool identifier such as `"furn_bed_king"`.
    /// The first matching keyword wins.
    pub fn from_type_id(type_id: &str) -> Self {
        let has = |k: &str| type_id.contains(k);
        if has("bed") {
            let size = if has("king") {
                BedSize::King
            } else if has("queen") {
                BedSize::Queen
            } else {
                BedSize::Single
            };
            Glyph::Bed(size)
        } else if has("sofa_l") {
            Glyph::LSofa
        } else if has("sofa") {
            Glyph::Sofa
        } else if has("table") || has("coffee") || has("desk") || has("dining") || has("tbl") {
            Glyph::Table {
                round: has("round") || has("coffee"),
                glass: has("glass"),
            }
        } else if has("toilet") || has("wc") {
            Glyph::Toilet
        } else if has("sink") || has("basin") {
            if has("kitchen") {
                Glyph::KitchenSink
            } else {
                Glyph::Basin
            }
        } else if has("stove") || has("gas") {
            Glyph::Stove
        } else if has("tree") || has("plant") {
            Glyph::Tree
        } else if has("car") {
            Glyph::Car
        } else if has("light") || has("fan") {
            Glyph::Lamp { fan: has("fan") }
        } else if has("fridge") {
            Glyph::Fridge
        } else if has("wardrobe") {
            Glyph::Wardrobe
        } else if has("tv_cab") {
            Glyph::TvCabinet
        } else if has("bath") {
            Glyph::Bathtub
        } else if has("bike") {
            Glyph::Bike
        } else if has("rug") {
            Glyph::Rug
        } else if has("chair") || has("recliner") {
            Glyph::Chair
        } else if has("mattress") {
            Glyph::Bed(BedSize::Single)
        } else {
            Glyph::Fallback
        }
    }
}

/// Rect from its top-left corner and size.
fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

struct GlyphPainter<'a> {
    scene: &'a mut Scene2d,
    transform: Affine,
    outline: Color,
    stroke: Stroke,
}

impl GlyphPainter<'_> {
    fn fill(&mut self, color: Color, shape: &impl kurbo::Shape) {
        self.scene.fill(self.transform, color, shape);
    }

    fn outline(&mut self, shape: &impl kurbo::Shape) {
        self.scene.stroke(&self.stroke, self.transform, self.outline, shape);
    }

    fn filled(&mut self, color: Color, shape: &impl kurbo::Shape) {
        self.fill(color, shape);
        self.outline(shape);
    }
}

pub struct FurnitureRenderer;

impl FurnitureRenderer {
    fn tree(w: f64, h: f64) -> BezPath {
        let mut path = BezPath::new();
        for i in 0..8 {
            let angle = i as f64 / 8.0 * TAU;
            let ctrl = Point::new(angle.cos() * (w / 2.0 + 10.0), angle.sin() * (h / 2.0 + 10.0));
            let end = Point::new(
                (angle + 0.5).cos() * w / 2.0,
                (angle + 0.5).sin() * h / 2.0,
            );
            if i == 0 {
                path.move_to(ctrl);
            }
            path.quad_to(ctrl, end);
        }
        path.close_path();
        path
    }
}

impl ShapeRenderer for FurnitureRenderer {
    fn render(&self, scene: &mut Scene2d, element: &Element, style: &PaintStyle) {
        let Some(anchor) = element.anchor() else {
            return;
        };
        let w = element.props.width.unwrap_or(DEFAULT_SIZE);
        let h = element.props.height.unwrap_or(DEFAULT_SIZE);
        let base = element_color(element, palette::WHITE);
        let transform = style.anchored(anchor, element.rotation_degrees());
        let glyph = Glyph::from_type_id(&element.type_id());
        let mut p = GlyphPainter {
            scene,
            transform,
            outline: style.tint(base),
            stroke: Stroke::new(style.line_width()),
        };

        match glyph {
            Glyph::Bed(size) => {
                let (w, h) = (size.width(), 80.0);
                p.filled(palette::BED, &rect(-w / 2.0, -h / 2.0, w, h));
                p.fill(palette::WHITE, &rect(-w / 2.0 + 5.0, -h / 2.0 + 5.0, w / 2.0 - 10.0, 15.0));
                p.fill(palette::WHITE, &rect(5.0, -h / 2.0 + 5.0, w / 2.0 - 10.0, 15.0));
                p.fill(palette::BED_COVER, &rect(-w / 2.0, 0.0, w, h / 2.0));
            }
            Glyph::LSofa => {
                p.filled(palette::FURNITURE, &rect(-40.0, -40.0, 80.0, 25.0));
                p.filled(palette::FURNITURE, &rect(-40.0, -40.0, 25.0, 80.0));
                p.fill(palette::FURNITURE_LIGHT, &rect(-35.0, -15.0, 20.0, 50.0));
                p.fill(palette::FURNITURE_LIGHT, &rect(-15.0, -35.0, 50.0, 20.0));
            }
            Glyph::Sofa => {
                p.filled(palette::FURNITURE, &rect(-40.0, -15.0, 80.0, 8.0));
                p.filled(palette::FURNITURE, &rect(-40.0, -15.0, 10.0, 30.0));
                p.filled(palette::FURNITURE, &rect(30.0, -15.0, 10.0, 30.0));
                p.fill(palette::FURNITURE_LIGHT, &rect(-30.0, -7.0, 60.0, 22.0));
            }
            Glyph::Table { round, glass } => {
                let top = if glass {
                    palette::TABLE_GLASS
                } else {
                    palette::TABLE
                };
                if round {
                    p.filled(top, &Circle::new(Point::ZERO, w / 2.0));
                } else {
                    p.filled(top, &rect(-w / 2.0, -h / 2.0, w, h));
                }
            }
            Glyph::Toilet => {
                p.filled(palette::WHITE, &rect(-15.0, -20.0, 30.0, 10.0));
                p.filled(palette::WHITE, &Ellipse::new((0.0, 10.0), (12.0, 18.0), 0.0));
            }
            Glyph::KitchenSink => {
                p.filled(palette::WHITE, &rect(-25.0, -15.0, 50.0, 30.0));
                p.outline(&rect(-20.0, -10.0, 40.0, 20.0));
                p.fill(palette::FIXTURE_METAL, &Circle::new((0.0, -10.0), 3.0));
            }
            Glyph::Basin => {
                p.filled(palette::WHITE, &Ellipse::new((0.0, 0.0), (15.0, 10.0), 0.0));
                p.fill(palette::FIXTURE_METAL, &Circle::new((0.0, -10.0), 3.0));
            }
            Glyph::Stove => {
                p.filled(palette::TABLE, &rect(-25.0, -15.0, 50.0, 30.0));
                p.fill(palette::BURNER, &Circle::new((-12.0, 0.0), 8.0));
                p.fill(palette::BURNER, &Circle::new((12.0, 0.0), 8.0));
            }
            Glyph::Fridge => {
                p.filled(palette::TABLE, &rect(-15.0, -15.0, 30.0, 30.0));
                p.outline(&Line::new((-15.0, -5.0), (15.0, -5.0)));
            }
            Glyph::Wardrobe => {
                p.filled(palette::FURNITURE, &rect(-30.0, -12.0, 60.0, 24.0));
                p.outline(&Line::new((0.0, -12.0), (0.0, 12.0)));
            }
            Glyph::TvCabinet => {
                p.filled(palette::FURNITURE, &rect(-30.0, -8.0, 60.0, 16.0));
                p.scene.stroke(
                    &Stroke::new(3.0),
                    transform,
                    palette::BURNER,
                    &Line::new((-20.0, -10.0), (20.0, -10.0)),
                );
            }
            Glyph::Bathtub => {
                p.filled(palette::WHITE, &rect(-20.0, -35.0, 40.0, 70.0));
                p.outline(&RoundedRect::new(-15.0, -30.0, 15.0, 30.0, 10.0));
                p.fill(palette::FIXTURE_METAL, &Circle::new((0.0, -22.0), 3.0));
            }
            Glyph::Tree => {
                p.fill(element_color(element, palette::EXTERIOR), &Self::tree(w, h));
                p.fill(palette::FOLIAGE_DARK, &Circle::new(Point::ZERO, w / 6.0));
            }
            Glyph::Car => {
                p.fill(palette::CAR_BODY, &rect(-35.0, -60.0, 70.0, 120.0));
                p.fill(palette::CAR_ROOF, &rect(-30.0, -30.0, 60.0, 50.0));
            }
            Glyph::Bike => {
                let frame = Stroke::new(2.0);
                let color = style.tint(palette::CAR_BODY);
                p.scene.stroke(&frame, transform, color, &Circle::new((0.0, -15.0), 8.0));
                p.scene.stroke(&frame, transform, color, &Circle::new((0.0, 15.0), 8.0));
                p.scene.stroke(&frame, transform, color, &Line::new((0.0, -15.0), (0.0, 15.0)));
            }
            Glyph::Lamp { fan } => {
                let thin = Stroke::new(1.0);
                let color = style.tint(palette::LAMP);
                p.scene.stroke(&thin, transform, color, &Line::new((-10.0, -10.0), (10.0, 10.0)));
                p.scene.stroke(&thin, transform, color, &Line::new((10.0, -10.0), (-10.0, 10.0)));
                p.scene.stroke(&thin, transform, color, &Circle::new(Point::ZERO, 5.0));
                if fan {
                    let dashed = Stroke::new(1.0).with_dashes(0.0, [2.0, 4.0]);
                    p.scene.stroke(&dashed, transform, color, &Circle::new(Point::ZERO, 25.0));
                }
            }
            Glyph::Rug => {
                p.fill(palette::FURNITURE_LIGHT.with_alpha(0.5), &rect(-w / 2.0, -h / 2.0, w, h));
                p.outline(&rect(-w / 2.0 + 4.0, -h / 2.0 + 4.0, w - 8.0, h - 8.0));
            }
            Glyph::Chair => {
                p.filled(palette::FURNITURE, &rect(-12.0, -12.0, 24.0, 24.0));
                p.fill(palette::FURNITURE_LIGHT, &rect(-12.0, -12.0, 24.0, 6.0));
            }
            Glyph::Fallback => {
                let body = style.tint(element_color(element, palette::PLACE_DEFAULT));
                p.fill(body, &rect(-w / 2.0, -h / 2.0, w, h));
                let caption: String = element.subtype.chars().take(4).collect();
                p.scene.text(
                    caption,
                    Point::new(0.0, 3.0),
                    CAPTION_SIZE,
                    palette::WHITE,
                    TextAlign::Center,
                    transform,
                );
            }
        }
    }
}
