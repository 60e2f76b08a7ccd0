//! Elements: the canonical drawing units of a floor plan.

use crate::color::Rgba;
use crate::layer::LayerId;
use crate::view_state::TextureResolution;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element. Assigned at creation, never reused.
pub type ElementId = Uuid;

/// Class of a service fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureClass {
    Lighting,
    Electrical,
    Plumbing,
}

/// Closed set of element kinds. Cosmetic variation lives in the subtype string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Wall,
    Door,
    Window,
    Room,
    Floor,
    Roof,
    /// Columns and beams.
    Column,
    Stair,
    Furniture,
    Fixture(FixtureClass),
    Exterior,
    Decor,
    /// Plain drafting marks: lines, polylines, rectangles, circles.
    Annotation,
}

impl ElementKind {
    /// Tool-identifier prefix for this kind (`"wall"`, `"furn"`, ...).
    pub fn prefix(self) -> &'static str {
        match self {
            ElementKind::Wall => "wall",
            ElementKind::Door => "door",
            ElementKind::Window => "win",
            ElementKind::Room => "room",
            ElementKind::Floor => "floor",
            ElementKind::Roof => "roof",
            ElementKind::Column => "col",
            ElementKind::Stair => "stair",
            ElementKind::Furniture => "furn",
            ElementKind::Fixture(FixtureClass::Lighting) => "light",
            ElementKind::Fixture(FixtureClass::Electrical) => "elec",
            ElementKind::Fixture(FixtureClass::Plumbing) => "plum",
            ElementKind::Exterior => "ext",
            ElementKind::Decor => "decor",
            ElementKind::Annotation => "",
        }
    }

    /// Parse a tool-identifier prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let kind = match prefix {
            "wall" => ElementKind::Wall,
            "door" => ElementKind::Door,
            "win" => ElementKind::Window,
            "room" => ElementKind::Room,
            "floor" => ElementKind::Floor,
            "roof" => ElementKind::Roof,
            "col" | "beam" => ElementKind::Column,
            "stair" => ElementKind::Stair,
            "furn" => ElementKind::Furniture,
            "light" => ElementKind::Fixture(FixtureClass::Lighting),
            "elec" => ElementKind::Fixture(FixtureClass::Electrical),
            "plum" => ElementKind::Fixture(FixtureClass::Plumbing),
            "ext" => ElementKind::Exterior,
            "decor" => ElementKind::Decor,
            _ => return None,
        };
        Some(kind)
    }
}

/// Surface material hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Concrete,
    Brick,
    AacBlock,
    Stone,
    Gypsum,
    Glass,
    WoodTeak,
    WoodOak,
    Plywood,
    TileVitrified,
    MarbleItalian,
    Granite,
    Ceramic,
    FabricVelvet,
    FabricCotton,
    Leather,
    MetalSteel,
    MetalAlum,
    MetalBrass,
    PlasticPvc,
    PlasticUpvc,
    Water,
    Grass,
    Asphalt,
    Soil,
}

/// Geometry of an element: either a point path or a single rotated anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Line, polyline or rect-like geometry. Rectangles store two opposite
    /// corners; circles store the center and a rim point.
    Path { points: Vec<Point> },
    /// Point-anchored geometry (furniture, fixtures, doors, windows).
    Anchored {
        anchor: Point,
        /// Degrees in `[0, 360)`.
        rotation_degrees: f64,
    },
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}

/// Typed optional attributes of an element.
///
/// Per kind:
/// - walls: `width` is the thickness, `height` the wall height.
/// - anchored elements: `width`/`height` are the footprint, `depth` optional.
/// - rooms and roofs: `label` is drawn at the centroid.
/// - `elevation` lifts anchored elements and roofs in the 3D view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureResolution>,
}

/// Partial update of [`ElementProps`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub elevation: Option<f64>,
    pub color: Option<Rgba>,
    pub label: Option<String>,
    pub material: Option<Material>,
    pub texture: Option<TextureResolution>,
}

impl PropsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, props: &mut ElementProps) {
        if let Some(v) = self.width {
            props.width = Some(v);
        }
        if let Some(v) = self.height {
            props.height = Some(v);
        }
        if let Some(v) = self.depth {
            props.depth = Some(v);
        }
        if let Some(v) = self.elevation {
            props.elevation = Some(v);
        }
        if let Some(v) = self.color {
            props.color = Some(v);
        }
        if let Some(v) = self.label {
            props.label = Some(v);
        }
        if let Some(v) = self.material {
            props.material = Some(v);
        }
        if let Some(v) = self.texture {
            props.texture = Some(v);
        }
    }
}

/// Partial update of an element. Never changes `id` or `kind`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// Replacement points; ignored for anchored elements.
    pub points: Option<Vec<Point>>,
    /// New anchor; ignored for path elements.
    pub anchor: Option<Point>,
    /// New rotation; ignored for path elements.
    pub rotation_degrees: Option<f64>,
    pub props: PropsPatch,
    pub layer_id: Option<LayerId>,
}

impl ElementPatch {
    pub fn layer(layer_id: LayerId) -> Self {
        Self {
            layer_id: Some(layer_id),
            ..Self::default()
        }
    }

    pub fn props(props: PropsPatch) -> Self {
        Self {
            props,
            ..Self::default()
        }
    }
}

/// One drawable, editable entity in a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    /// Open cosmetic variation, e.g. `"brick"` or `"sofa_l"`.
    pub subtype: String,
    pub geometry: Geometry,
    pub props: ElementProps,
    pub layer_id: LayerId,
    /// Transient UI flag, excluded from equality and serialization.
    #[serde(skip)]
    pub selected: bool,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.subtype == other.subtype
            && self.geometry == other.geometry
            && self.props == other.props
            && self.layer_id == other.layer_id
    }
}

impl Element {
    /// Create a path element (wall, room, line, ...).
    pub fn path(
        kind: ElementKind,
        subtype: impl Into<String>,
        points: Vec<Point>,
        layer_id: LayerId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            subtype: subtype.into(),
            geometry: Geometry::Path { points },
            props: ElementProps::default(),
            layer_id,
            selected: false,
        }
    }

    /// Create a point-anchored element (furniture, fixture, door, ...).
    pub fn anchored(
        kind: ElementKind,
        subtype: impl Into<String>,
        anchor: Point,
        rotation_degrees: f64,
        layer_id: LayerId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            subtype: subtype.into(),
            geometry: Geometry::Anchored {
                anchor,
                rotation_degrees: normalize_degrees(rotation_degrees),
            },
            props: ElementProps::default(),
            layer_id,
            selected: false,
        }
    }

    pub fn with_props(mut self, props: ElementProps) -> Self {
        self.props = props;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Tool identifier this element was created with (`"wall_brick"`, `"rect"`).
    pub fn type_id(&self) -> String {
        match self.kind {
            ElementKind::Annotation => self.subtype.clone(),
            ElementKind::Column if self.subtype.starts_with("beam_") => self.subtype.clone(),
            kind => format!("{}_{}", kind.prefix(), self.subtype),
        }
    }

    /// Whether the subtype contains a keyword, e.g. `"glass"`.
    pub fn has(&self, keyword: &str) -> bool {
        self.subtype.contains(keyword)
    }

    pub fn points(&self) -> &[Point] {
        match &self.geometry {
            Geometry::Path { points } => points,
            Geometry::Anchored { .. } => &[],
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        match self.geometry {
            Geometry::Anchored { anchor, .. } => Some(anchor),
            Geometry::Path { .. } => None,
        }
    }

    /// Rotation in degrees; zero for path elements.
    pub fn rotation_degrees(&self) -> f64 {
        match self.geometry {
            Geometry::Anchored {
                rotation_degrees, ..
            } => rotation_degrees,
            Geometry::Path { .. } => 0.0,
        }
    }

    /// Line-like elements carry at least two points.
    pub fn is_line_like(&self) -> bool {
        self.points().len() >= 2
    }

    /// First two points of a path element.
    pub fn segment(&self) -> Option<(Point, Point)> {
        match self.points() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Point used for hit-testing: segment midpoint, anchor, or lone point.
    pub fn reference_point(&self) -> Option<Point> {
        if let Some((a, b)) = self.segment() {
            return Some(a.midpoint(b));
        }
        self.anchor().or_else(|| self.points().first().copied())
    }

    /// Axis-aligned bounds of the path points, or a footprint around the anchor.
    pub fn bounds(&self) -> Option<Rect> {
        match &self.geometry {
            Geometry::Path { points } => {
                let first = points.first()?;
                Some(
                    points
                        .iter()
                        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
                )
            }
            Geometry::Anchored { anchor, .. } => {
                let w = self.props.width.unwrap_or(40.0);
                let h = self.props.height.unwrap_or(40.0);
                Some(Rect::from_center_size(*anchor, (w, h)))
            }
        }
    }

    /// Move the element by a world-space offset.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.geometry {
            Geometry::Path { points } => points.iter_mut().for_each(|p| *p += delta),
            Geometry::Anchored { anchor, .. } => *anchor += delta,
        }
    }

    /// Apply a partial update. Returns whether anything changed.
    pub fn apply(&mut self, patch: ElementPatch) -> bool {
        let before = self.clone();
        match &mut self.geometry {
            Geometry::Path { points } => {
                if let Some(new_points) = patch.points {
                    *points = new_points;
                }
            }
            Geometry::Anchored {
                anchor,
                rotation_degrees,
            } => {
                if let Some(a) = patch.anchor {
                    *anchor = a;
                }
                if let Some(r) = patch.rotation_degrees {
                    *rotation_degrees = normalize_degrees(r);
                }
            }
        }
        patch.props.apply(&mut self.props);
        if let Some(layer_id) = patch.layer_id {
            self.layer_id = layer_id;
        }
        *self != before
    }
}
