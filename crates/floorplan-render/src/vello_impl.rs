//! Vello-based renderer implementation.
//!
//! Builds the plan display list with [`PlanRenderer`] and replays it into a
//! `vello::Scene` for GPU presentation.

use crate::projector::PlanRenderer;
use crate::renderer::{RenderContext, Renderer};
use crate::scene::{DrawCommand, Scene2d, TextAlign};
use kurbo::{Affine, Point, Rect};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Vello-based renderer for GPU-accelerated plan drawing.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    plan: PlanRenderer,
    /// Font context for labels. Empty until fonts are registered.
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            plan: PlanRenderer::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Register a font (TTF/OTF bytes) for labels.
    pub fn register_font(&mut self, data: Vec<u8>) {
        self.font_cx
            .collection
            .register_fonts(vello::peniko::Blob::new(std::sync::Arc::new(data)), None);
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Replay a recorded plan frame.
    pub fn replay(&mut self, frame: &Scene2d) {
        self.scene.reset();
        for command in frame.commands() {
            match command {
                DrawCommand::Fill {
                    path,
                    color,
                    transform,
                    ..
                } => {
                    self.scene.fill(Fill::NonZero, *transform, *color, None, path);
                }
                DrawCommand::Stroke {
                    path,
                    stroke,
                    color,
                    transform,
                    ..
                } => {
                    self.scene.stroke(stroke, *transform, *color, None, path);
                }
                DrawCommand::Text {
                    content,
                    position,
                    size,
                    color,
                    align,
                    transform,
                    ..
                } => self.render_text(content, *position, *size, *color, *align, *transform),
            }
        }
    }

    fn render_text(
        &mut self,
        content: &str,
        position: Point,
        size: f64,
        color: Color,
        align: TextAlign,
        transform: Affine,
    ) {
        if content.is_empty() {
            return;
        }
        let brush = Brush::Solid(color);
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let x0 = match align {
            TextAlign::Start => position.x,
            TextAlign::Center => position.x - width / 2.0,
        };
        // Position is the baseline; parley lays out from the top of the first line.
        let ascent = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline as f64)
            .unwrap_or(size);
        let text_transform = transform * Affine::translate((x0, position.y - ascent));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No font registered: draw the label's block instead.
        if glyph_count == 0 {
            let block_width = content.chars().count() as f64 * size * 0.6;
            let x0 = match align {
                TextAlign::Start => position.x,
                TextAlign::Center => position.x - block_width / 2.0,
            };
            let rect = Rect::new(x0, position.y - size * 0.7, x0 + block_width, position.y);
            self.scene
                .fill(Fill::NonZero, transform, color.multiply_alpha(0.6), None, &rect);
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.plan.build_scene(ctx);
        let frame = self.plan.take_scene();
        self.replay(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::element::{Element, ElementKind};
    use floorplan_core::layer::{LayerId, LayerSet};
    use floorplan_core::view_state::ViewState;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_room() {
        let mut renderer = VelloRenderer::new();
        let layers = LayerSet::new();
        let view = ViewState::default();
        let room = Element::path(
            ElementKind::Room,
            "living",
            vec![Point::new(0.0, 0.0), Point::new(200.0, 150.0)],
            LayerId::default_layer(),
        );
        let elements = [room];
        let ctx = RenderContext::new(&elements, &layers, &view, kurbo::Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }
}
