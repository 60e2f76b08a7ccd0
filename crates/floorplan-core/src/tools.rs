//! Tool catalog: parses tool identifiers into a closed tool model.

use crate::element::{ElementKind, FixtureClass};
use serde::{Deserialize, Serialize};

/// Toolbar category a tool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Project,
    View,
    Draw,
    Structure,
    Flooring,
    Rooms,
    Furniture,
    Lighting,
    Electrical,
    Plumbing,
    Exterior,
    Decoration,
    Render,
    Export,
}

/// Shape produced by a drag tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawShape {
    /// Two endpoints.
    Segment,
    /// Two opposite corners.
    Rectangle,
    /// Center and a rim point.
    Circle,
}

/// The element an element-creating tool produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementTool {
    pub kind: ElementKind,
    pub subtype: String,
    pub shape: DrawShape,
}

/// Available tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    ZoomIn,
    ZoomOut,
    /// Press-drag-release creates a path element.
    Draw(ElementTool),
    /// A single press places an anchored element.
    Place(ElementTool),
}

/// Subtype keywords that make a prefixed tool a drag tool, with the shape drawn.
const DRAG_KEYWORDS: &[(&str, DrawShape)] = &[
    ("pipe", DrawShape::Segment),
    ("strip", DrawShape::Segment),
    ("wire", DrawShape::Segment),
    ("bound", DrawShape::Segment),
    ("pool", DrawShape::Rectangle),
    ("road", DrawShape::Rectangle),
    ("pave", DrawShape::Rectangle),
];

impl ToolKind {
    /// Parse a tool identifier such as `"wall_brick"` or `"furn_bed_king"`.
    ///
    /// Returns `None` for identifiers that do not create elements or navigate,
    /// such as settings, render or export actions.
    pub fn from_id(id: &str) -> Option<Self> {
        let tool = match id {
            "select" => ToolKind::Select,
            "pan" => ToolKind::Pan,
            "zoom_in" => ToolKind::ZoomIn,
            "zoom_out" => ToolKind::ZoomOut,
            "line" | "polyline" => Self::draw(ElementKind::Annotation, id, DrawShape::Segment),
            "rect" => Self::draw(ElementKind::Annotation, id, DrawShape::Rectangle),
            "circle" => Self::draw(ElementKind::Annotation, id, DrawShape::Circle),
            _ => {
                let (prefix, subtype) = id.split_once('_')?;
                if subtype.is_empty() {
                    return None;
                }
                let kind = ElementKind::from_prefix(prefix)?;
                // Beams share the column kind; keep their prefix in the subtype.
                let subtype = if prefix == "beam" { id } else { subtype };
                match kind {
                    ElementKind::Wall => Self::draw(kind, subtype, DrawShape::Segment),
                    ElementKind::Room | ElementKind::Floor | ElementKind::Roof => {
                        Self::draw(kind, subtype, DrawShape::Rectangle)
                    }
                    ElementKind::Fixture(_) | ElementKind::Exterior => {
                        match DRAG_KEYWORDS.iter().find(|(k, _)| subtype.contains(k)) {
                            Some((_, shape)) => Self::draw(kind, subtype, *shape),
                            None => Self::place(kind, subtype),
                        }
                    }
                    _ => Self::place(kind, subtype),
                }
            }
        };
        Some(tool)
    }

    fn draw(kind: ElementKind, subtype: &str, shape: DrawShape) -> Self {
        ToolKind::Draw(ElementTool {
            kind,
            subtype: subtype.to_string(),
            shape,
        })
    }

    fn place(kind: ElementKind, subtype: &str) -> Self {
        ToolKind::Place(ElementTool {
            kind,
            subtype: subtype.to_string(),
            shape: DrawShape::Segment,
        })
    }

    /// Format back into a tool identifier.
    pub fn id(&self) -> String {
        match self {
            ToolKind::Select => "select".to_string(),
            ToolKind::Pan => "pan".to_string(),
            ToolKind::ZoomIn => "zoom_in".to_string(),
            ToolKind::ZoomOut => "zoom_out".to_string(),
            ToolKind::Draw(tool) | ToolKind::Place(tool) => match tool.kind {
                ElementKind::Annotation => tool.subtype.clone(),
                ElementKind::Column if tool.subtype.starts_with("beam_") => tool.subtype.clone(),
                kind => format!("{}_{}", kind.prefix(), tool.subtype),
            },
        }
    }

    /// The element tool, if this tool creates elements.
    pub fn element_tool(&self) -> Option<&ElementTool> {
        match self {
            ToolKind::Draw(tool) | ToolKind::Place(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            ToolKind::Select | ToolKind::Pan | ToolKind::ZoomIn | ToolKind::ZoomOut
        )
    }

    /// Toolbar category, derived from the element kind.
    pub fn category(&self) -> Option<ToolCategory> {
        let Some(tool) = self.element_tool() else {
            return Some(ToolCategory::View);
        };
        let category = match tool.kind {
            ElementKind::Annotation => ToolCategory::Draw,
            ElementKind::Wall
            | ElementKind::Door
            | ElementKind::Window
            | ElementKind::Roof
            | ElementKind::Column
            | ElementKind::Stair => ToolCategory::Structure,
            ElementKind::Floor => ToolCategory::Flooring,
            ElementKind::Room => ToolCategory::Rooms,
            ElementKind::Furniture => ToolCategory::Furniture,
            ElementKind::Fixture(FixtureClass::Lighting) => ToolCategory::Lighting,
            ElementKind::Fixture(FixtureClass::Electrical) => ToolCategory::Electrical,
            ElementKind::Fixture(FixtureClass::Plumbing) => ToolCategory::Plumbing,
            ElementKind::Exterior => ToolCategory::Exterior,
            ElementKind::Decor => ToolCategory::Decoration,
        };
        Some(category)
    }
}
