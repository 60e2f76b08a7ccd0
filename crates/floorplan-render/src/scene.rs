//! Retained display list of one plan frame.
//!
//! The projector records commands here; backends (the CPU rasterizer or the
//! optional Vello replay) consume them in order.

use floorplan_core::element::ElementId;
use kurbo::{Affine, BezPath, Point, Shape, Stroke};
use peniko::Color;

/// Flattening tolerance used when converting shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Horizontal text alignment relative to the anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

/// One drawing command.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        color: Color,
        transform: Affine,
        owner: Option<ElementId>,
    },
    Stroke {
        path: BezPath,
        stroke: Stroke,
        color: Color,
        transform: Affine,
        owner: Option<ElementId>,
    },
    Text {
        content: String,
        /// Baseline anchor in local coordinates.
        position: Point,
        size: f64,
        color: Color,
        align: TextAlign,
        transform: Affine,
        owner: Option<ElementId>,
    },
}

impl DrawCommand {
    pub fn owner(&self) -> Option<ElementId> {
        match self {
            DrawCommand::Fill { owner, .. }
            | DrawCommand::Stroke { owner, .. }
            | DrawCommand::Text { owner, .. } => *owner,
        }
    }
}

/// A recorded frame.
#[derive(Debug, Clone)]
pub struct Scene2d {
    commands: Vec<DrawCommand>,
    background: Color,
    owner: Option<ElementId>,
}

impl Default for Scene2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene2d {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            background: crate::palette::BACKGROUND,
            owner: None,
        }
    }

    /// Clear all commands.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.owner = None;
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Tag subsequent commands with the element they draw.
    pub fn set_owner(&mut self, owner: Option<ElementId>) {
        self.owner = owner;
    }

    pub fn fill(&mut self, transform: Affine, color: Color, shape: &impl Shape) {
        self.commands.push(DrawCommand::Fill {
            path: shape.to_path(PATH_TOLERANCE),
            color,
            transform,
            owner: self.owner,
        });
    }

    pub fn stroke(&mut self, stroke: &Stroke, transform: Affine, color: Color, shape: &impl Shape) {
        self.commands.push(DrawCommand::Stroke {
            path: shape.to_path(PATH_TOLERANCE),
            stroke: stroke.clone(),
            color,
            transform,
            owner: self.owner,
        });
    }

    pub fn text(
        &mut self,
        content: impl Into<String>,
        position: Point,
        size: f64,
        color: Color,
        align: TextAlign,
        transform: Affine,
    ) {
        self.commands.push(DrawCommand::Text {
            content: content.into(),
            position,
            size,
            color,
            align,
            transform,
            owner: self.owner,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands drawn for one element, in paint order.
    pub fn commands_for(&self, id: ElementId) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.owner() == Some(id))
    }

    /// Stroke styles drawn for one element, in paint order.
    pub fn strokes_for(&self, id: ElementId) -> Vec<(&Stroke, Color)> {
        self.commands_for(id)
            .filter_map(|c| match c {
                DrawCommand::Stroke { stroke, color, .. } => Some((stroke, *color)),
                _ => None,
            })
            .collect()
    }

    /// All text commands as `(content, position, size)`.
    pub fn texts(&self) -> Vec<(&str, Point, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    content,
                    position,
                    size,
                    ..
                } => Some((content.as_str(), *position, *size)),
                _ => None,
            })
            .collect()
    }

    /// Element ids in the order they were first drawn.
    pub fn paint_order(&self) -> Vec<ElementId> {
        let mut order: Vec<ElementId> = Vec::new();
        for id in self.commands.iter().filter_map(DrawCommand::owner) {
            if order.last() != Some(&id) && !order.contains(&id) {
                order.push(id);
            }
        }
        order
    }
}
