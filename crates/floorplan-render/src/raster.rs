//! CPU rasterizer for [`Scene2d`] frames.
//!
//! Paths are flattened to line segments in device space and filled with a
//! nonzero scanline sampled at pixel centers. Strokes are expanded to fill
//! outlines with `kurbo::stroke` first. There is no antialiasing; exported
//! plans are meant to be read, not printed.

use crate::renderer::{RenderResult, RendererError};
use crate::scene::{DrawCommand, Scene2d, TextAlign};
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape, Stroke, StrokeOpts};
use peniko::Color;

const FLATTEN_TOLERANCE: f64 = 0.25;

/// Width of one character block relative to the font size.
const GLYPH_ADVANCE: f64 = 0.6;
/// Height of a character block relative to the font size.
const GLYPH_HEIGHT: f64 = 0.7;

/// An owned RGBA8 image, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// A fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA of one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Overwrite every pixel.
    pub fn clear(&mut self, color: Color) {
        let c = color.to_rgba8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    /// Source-over blend of `color` onto one pixel.
    fn blend(&mut self, x: usize, y: usize, src: [u8; 4]) {
        let i = (y * self.width as usize + x) * 4;
        let sa = src[3] as u32;
        if sa == 0 {
            return;
        }
        if sa == 255 {
            self.data[i..i + 4].copy_from_slice(&src);
            return;
        }
        let inv = 255 - sa;
        for c in 0..3 {
            let d = self.data[i + c] as u32;
            self.data[i + c] = ((src[c] as u32 * sa + d * inv) / 255) as u8;
        }
        let da = self.data[i + 3] as u32;
        self.data[i + 3] = (sa + da * inv / 255).min(255) as u8;
    }
}

/// One directed edge of a flattened outline.
#[derive(Debug, Clone, Copy)]
struct Edge {
    p0: Point,
    p1: Point,
}

fn flatten_edges(path: &BezPath) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    kurbo::flatten(path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if last != start {
                edges.push(Edge { p0: last, p1: start });
            }
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            edges.push(Edge { p0: last, p1: p });
            last = p;
        }
        PathEl::ClosePath => {
            if last != start {
                edges.push(Edge { p0: last, p1: start });
            }
            last = start;
        }
        // flatten only emits lines
        _ => {}
    });
    // Fills are implicitly closed.
    if last != start {
        edges.push(Edge { p0: last, p1: start });
    }
    edges
}

/// Uniform scale factor of an affine map.
fn transform_scale(transform: Affine) -> f64 {
    transform.determinant().abs().sqrt()
}

/// Replays display lists onto a [`Pixmap`].
#[derive(Debug, Default)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Render a frame at the given pixel size.
    pub fn render(&self, scene: &Scene2d, width: u32, height: u32) -> RenderResult<Pixmap> {
        if width == 0 || height == 0 {
            return Err(RendererError::NoContext);
        }
        let mut pixmap = Pixmap::new(width, height);
        pixmap.clear(scene.background());
        for command in scene.commands() {
            match command {
                DrawCommand::Fill {
                    path,
                    color,
                    transform,
                    ..
                } => self.fill_path(&mut pixmap, &(*transform * path.clone()), *color),
                DrawCommand::Stroke {
                    path,
                    stroke,
                    color,
                    transform,
                    ..
                } => self.stroke_path(&mut pixmap, path, stroke, *transform, *color),
                DrawCommand::Text {
                    content,
                    position,
                    size,
                    color,
                    align,
                    transform,
                    ..
                } => {
                    let block = text_block(content, *position, *size, *align);
                    if block.area() > 0.0 {
                        let path = *transform * block.to_path(FLATTEN_TOLERANCE);
                        self.fill_path(&mut pixmap, &path, color.multiply_alpha(0.6));
                    }
                }
            }
        }
        Ok(pixmap)
    }

    fn stroke_path(
        &self,
        pixmap: &mut Pixmap,
        path: &BezPath,
        stroke: &Stroke,
        transform: Affine,
        color: Color,
    ) {
        let scale = transform_scale(transform);
        let device = transform * path.clone();
        let mut style = stroke.clone();
        style.width = (stroke.width * scale).max(1.0);
        style.dash_offset *= scale;
        for d in style.dash_pattern.iter_mut() {
            *d *= scale;
        }
        let outline = kurbo::stroke(device, &style, &StrokeOpts::default(), FLATTEN_TOLERANCE);
        self.fill_path(pixmap, &outline, color);
    }

    /// Nonzero fill sampled at pixel centers.
    fn fill_path(&self, pixmap: &mut Pixmap, path: &BezPath, color: Color) {
        let edges = flatten_edges(path);
        if edges.is_empty() {
            return;
        }
        let (min_y, max_y) = edges.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.p0.y.min(e.p1.y)), hi.max(e.p0.y.max(e.p1.y)))
        });
        let height = pixmap.height as f64;
        let width = pixmap.width as f64;
        let row_start = min_y.floor().max(0.0) as usize;
        let row_end = max_y.ceil().min(height).max(0.0) as usize;
        let c = color.to_rgba8();
        let src = [c.r, c.g, c.b, c.a];

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for row in row_start..row_end {
            let sy = row as f64 + 0.5;
            crossings.clear();
            for e in &edges {
                let (y0, y1) = (e.p0.y, e.p1.y);
                if y0 == y1 {
                    continue;
                }
                let (lo, hi, dir) = if y0 < y1 { (y0, y1, 1) } else { (y1, y0, -1) };
                if sy < lo || sy >= hi {
                    continue;
                }
                let t = (sy - y0) / (y1 - y0);
                crossings.push((e.p0.x + t * (e.p1.x - e.p0.x), dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                // Pixel centers inside [x0, x1).
                let x0 = (pair[0].0 - 0.5).ceil().max(0.0);
                let x1 = (pair[1].0 - 0.5).ceil().min(width);
                let mut x = x0;
                while x < x1 {
                    pixmap.blend(x as usize, row, src);
                    x += 1.0;
                }
            }
        }
    }
}

/// Local-space block a label occupies, sitting on the baseline.
fn text_block(content: &str, position: Point, size: f64, align: TextAlign) -> Rect {
    let chars = content.chars().filter(|c| !c.is_whitespace()).count();
    if chars == 0 {
        return Rect::ZERO;
    }
    let width = content.chars().count() as f64 * size * GLYPH_ADVANCE;
    let x0 = match align {
        TextAlign::Start => position.x,
        TextAlign::Center => position.x - width / 2.0,
    };
    Rect::new(x0, position.y - size * GLYPH_HEIGHT, x0 + width, position.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use kurbo::{Circle, Line};

    const RED: Color = Color::from_rgba8(255, 0, 0, 255);

    #[test]
    fn test_zero_size_has_no_context() {
        let scene = Scene2d::new();
        assert!(matches!(
            Rasterizer::new().render(&scene, 0, 10),
            Err(RendererError::NoContext)
        ));
    }

    #[test]
    fn test_background_clear() {
        let mut scene = Scene2d::new();
        scene.set_background(RED);
        let pixmap = Rasterizer::new().render(&scene, 4, 3).unwrap();
        assert_eq!(pixmap.data().len(), 4 * 3 * 4);
        assert_eq!(pixmap.pixel(3, 2), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect() {
        let mut scene = Scene2d::new();
        scene.fill(Affine::IDENTITY, palette::WHITE, &Rect::new(2.0, 2.0, 6.0, 6.0));
        let pixmap = Rasterizer::new().render(&scene, 8, 8).unwrap();
        assert_eq!(pixmap.pixel(3, 3), Some([255, 255, 255, 255]));
        assert_eq!(pixmap.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_ne!(pixmap.pixel(6, 6), Some([255, 255, 255, 255]));
        assert_ne!(pixmap.pixel(1, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_curved_outline() {
        let mut scene = Scene2d::new();
        scene.fill(Affine::IDENTITY, RED, &Circle::new((8.0, 8.0), 6.0));
        let pixmap = Rasterizer::new().render(&scene, 16, 16).unwrap();
        assert_eq!(pixmap.pixel(8, 8), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(12, 8), Some([255, 0, 0, 255]));
        assert_ne!(pixmap.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_ne!(pixmap.pixel(15, 8), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_fill_respects_transform() {
        let mut scene = Scene2d::new();
        scene.fill(
            Affine::scale(2.0),
            RED,
            &Rect::new(0.0, 0.0, 2.0, 2.0),
        );
        let pixmap = Rasterizer::new().render(&scene, 8, 8).unwrap();
        assert_eq!(pixmap.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_ne!(pixmap.pixel(4, 4), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_stroke_covers_line() {
        let mut scene = Scene2d::new();
        scene.stroke(
            &Stroke::new(4.0),
            Affine::IDENTITY,
            RED,
            &Line::new((0.0, 5.0), (10.0, 5.0)),
        );
        let pixmap = Rasterizer::new().render(&scene, 10, 10).unwrap();
        assert_eq!(pixmap.pixel(5, 4), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_ne!(pixmap.pixel(5, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_dashes_leave_gaps() {
        let mut scene = Scene2d::new();
        scene.stroke(
            &Stroke::new(2.0).with_dashes(0.0, [4.0, 4.0]),
            Affine::IDENTITY,
            RED,
            &Line::new((0.0, 5.0), (16.0, 5.0)),
        );
        let pixmap = Rasterizer::new().render(&scene, 16, 10).unwrap();
        assert_eq!(pixmap.pixel(1, 4), Some([255, 0, 0, 255]));
        assert_ne!(pixmap.pixel(6, 4), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(9, 4), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_text_block_alignment() {
        let centered = text_block("ABCD", Point::new(100.0, 75.0), 10.0, TextAlign::Center);
        assert!((centered.center().x - 100.0).abs() < 1e-9);
        assert!((centered.y1 - 75.0).abs() < 1e-9);
        assert_eq!(text_block("  ", Point::ZERO, 10.0, TextAlign::Start), Rect::ZERO);
        assert!(text_block("A", Point::ZERO, 10.0, TextAlign::Start).to_path(0.1).elements().len() > 1);
    }

    #[test]
    fn test_translucent_blend() {
        let mut pixmap = Pixmap::new(1, 1);
        pixmap.clear(Color::from_rgba8(0, 0, 0, 255));
        pixmap.blend(0, 0, [255, 255, 255, 128]);
        let [r, _, _, a] = pixmap.pixel(0, 0).unwrap();
        assert!((127..=129).contains(&r));
        assert_eq!(a, 255);
    }
}
