//! Builds 3D nodes for elements.
//!
//! Plan coordinates map to the model as `(x, y) -> (x, elevation, y)`. Path
//! elements get a root group at their reference point (segment midpoint or
//! lone point) on the ground; their meshes are laid out in world space and
//! offset back into the root's frame. Anchored elements get a root group at
//! their anchor, yawed by the negated plan rotation, with template meshes laid
//! out in local space around it.

use crate::geometry::Primitive;
use crate::graph::{GraphError, NodeId, NodeRole, SceneGraph, Transform};
use crate::material::MaterialKind;
use floorplan_core::{Element, ElementKind, FixtureClass, RenderSettings};
use glam::{Quat, Vec3, vec3};
use kurbo::Point;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

pub const DEFAULT_WALL_HEIGHT: f32 = 120.0;
pub const DEFAULT_WALL_THICKNESS: f32 = 12.0;
pub const DEFAULT_ROOF_ELEVATION: f32 = 120.0;
/// Height of floor and room planes, just above the ground grid.
pub const FLOOR_LIFT: f32 = 0.5;

const FENCE_HEIGHT: f32 = 60.0;
const FENCE_THICKNESS: f32 = 6.0;
const GROUND_LIFT: f32 = 0.3;
const MARKER_LIFT: f32 = 0.2;

/// Hand-authored model for an anchored element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Template {
    LSofa,
    Sofa,
    Recliner,
    TvCabinet,
    CoffeeTable,
    Bookshelf,
    /// Bed of the given width.
    Bed(f32),
    Wardrobe,
    KitchenModule,
    Chimney,
    GasStove,
    Fridge,
    Toilet,
    Basin,
    Bathtub,
    Workstation,
    ExecChair,
    Door,
    Window,
    Column { round: bool },
    Beam,
    Stair,
    CeilingLight,
    Fan,
    Switchboard,
    Tree,
    Car,
    PottedPlant,
    /// Single box in the element's color.
    Fallback,
}

impl Template {
    /// Pick the template for an anchored element.
    pub fn resolve(element: &Element) -> Self {
        let has = |k: &str| element.has(k);
        match element.kind() {
            ElementKind::Door => return Template::Door,
            ElementKind::Window => return Template::Window,
            ElementKind::Column if element.subtype.starts_with("beam") => return Template::Beam,
            ElementKind::Column => {
                return Template::Column {
                    round: has("rnd") || has("round") || has("pillar"),
                };
            }
            ElementKind::Stair => return Template::Stair,
            ElementKind::Fixture(FixtureClass::Lighting) => return Template::CeilingLight,
            ElementKind::Fixture(FixtureClass::Electrical) if has("fan") => return Template::Fan,
            ElementKind::Fixture(FixtureClass::Electrical) => return Template::Switchboard,
            _ => {}
        }

        if element.subtype == "sofa_l" {
            Template::LSofa
        } else if has("sofa") {
            Template::Sofa
        } else if has("recliner") {
            Template::Recliner
        } else if has("tv_cab") {
            Template::TvCabinet
        } else if has("coffee") {
            Template::CoffeeTable
        } else if has("book") || has("showcase") {
            Template::Bookshelf
        } else if has("bed") || has("mattress") {
            let width = if has("king") {
                76.0
            } else if has("queen") {
                60.0
            } else {
                40.0
            };
            Template::Bed(width)
        } else if has("wardrobe") {
            Template::Wardrobe
        } else if has("kitchen_mod") || has("sink") {
            Template::KitchenModule
        } else if has("chimney") {
            Template::Chimney
        } else if has("gas") || has("stove") {
            Template::GasStove
        } else if has("fridge") {
            Template::Fridge
        } else if has("wc") || has("toilet") {
            Template::Toilet
        } else if has("basin") {
            Template::Basin
        } else if has("bath") {
            Template::Bathtub
        } else if has("workstation") || has("study") {
            Template::Workstation
        } else if has("exec_chair") || has("chair") {
            Template::ExecChair
        } else if has("tree") {
            Template::Tree
        } else if has("car") {
            Template::Car
        } else if has("plant") || has("pot") {
            Template::PottedPlant
        } else {
            Template::Fallback
        }
    }
}

/// Adds meshes to one root group.
struct GroupBuilder<'g> {
    graph: &'g mut SceneGraph,
    root: NodeId,
    /// Subtracted from every mesh position.
    origin: Vec3,
    cast_shadow: bool,
}

impl GroupBuilder<'_> {
    fn add(
        &mut self,
        primitive: Primitive,
        material: MaterialKind,
        at: Vec3,
    ) -> Result<NodeId, GraphError> {
        self.add_rotated(primitive, material, at, Quat::IDENTITY)
    }

    fn add_rotated(
        &mut self,
        primitive: Primitive,
        material: MaterialKind,
        at: Vec3,
        rotation: Quat,
    ) -> Result<NodeId, GraphError> {
        let transform = Transform::from_translation(at - self.origin).with_rotation(rotation);
        let id = self.graph.add_mesh(self.root, primitive, material, transform)?;
        if let Some(node) = self.graph.get_mut(id) {
            node.cast_shadow = self.cast_shadow;
        }
        Ok(id)
    }

    /// Box spanning a plan segment, standing on `base`.
    fn segment_box(
        &mut self,
        a: Point,
        b: Point,
        height: f32,
        thickness: f32,
        base: f32,
        material: MaterialKind,
    ) -> Result<NodeId, GraphError> {
        let (mid, len, yaw) = segment_frame(a, b);
        self.add_rotated(
            Primitive::cuboid(len, height, thickness),
            material,
            vec3(mid.x, base + height / 2.0, mid.z),
            Quat::from_rotation_y(yaw),
        )
    }

    /// Horizontal rod along a plan segment.
    fn segment_rod(
        &mut self,
        a: Point,
        b: Point,
        radius: f32,
        y: f32,
        material: MaterialKind,
    ) -> Result<NodeId, GraphError> {
        let (mid, len, yaw) = segment_frame(a, b);
        self.add_rotated(
            Primitive::cylinder(radius, radius, len),
            material,
            vec3(mid.x, y, mid.z),
            Quat::from_rotation_y(yaw) * Quat::from_rotation_z(FRAC_PI_2),
        )
    }

    /// Flat rectangle covering the plan bounds of the element.
    fn ground_plane(
        &mut self,
        element: &Element,
        y: f32,
        material: MaterialKind,
    ) -> Result<NodeId, GraphError> {
        let (a, b) = element.segment().unwrap_or_default();
        let w = (b.x - a.x).abs() as f32;
        let h = (b.y - a.y).abs() as f32;
        let cx = a.x.min(b.x) as f32 + w / 2.0;
        let cz = a.y.min(b.y) as f32 + h / 2.0;
        self.add_rotated(
            Primitive::plane(w, h),
            material,
            vec3(cx, y, cz),
            Quat::from_rotation_x(-FRAC_PI_2),
        )
    }
}

/// Midpoint, length and yaw of a plan segment.
fn segment_frame(a: Point, b: Point) -> (Vec3, f32, f32) {
    let dx = (b.x - a.x) as f32;
    let dz = (b.y - a.y) as f32;
    let mid = vec3(((a.x + b.x) / 2.0) as f32, 0.0, ((a.y + b.y) / 2.0) as f32);
    (mid, (dx * dx + dz * dz).sqrt(), -dz.atan2(dx))
}

/// Root transform of an anchored element.
pub fn anchored_transform(element: &Element) -> Option<Transform> {
    let anchor = element.anchor()?;
    let elevation = element.props.elevation.unwrap_or(0.0) as f32;
    Some(
        Transform::from_translation(vec3(anchor.x as f32, elevation, anchor.y as f32))
            .with_yaw(-(element.rotation_degrees() as f32).to_radians()),
    )
}

/// Root transform of a path element: its reference point on the ground.
pub fn path_transform(element: &Element) -> Option<Transform> {
    if element.anchor().is_some() {
        return None;
    }
    let p = element.reference_point().unwrap_or_default();
    Some(Transform::from_translation(vec3(p.x as f32, 0.0, p.y as f32)))
}

/// Root transform the element's node should have when no drag is active.
pub fn root_transform(element: &Element) -> Transform {
    anchored_transform(element)
        .or_else(|| path_transform(element))
        .unwrap_or_default()
}

/// Build the node for an element and return its root group.
///
/// Always yields a node, even for degenerate geometry, so every visible
/// element has exactly one root in the graph.
pub fn build_element(
    graph: &mut SceneGraph,
    element: &Element,
    settings: &RenderSettings,
) -> NodeId {
    let transform = root_transform(element);
    let root = graph.create_group(NodeRole::Content, transform);
    let origin = if element.anchor().is_some() {
        Vec3::ZERO
    } else {
        transform.translation
    };
    if let Some(node) = graph.get_mut(root) {
        node.owner = Some(element.id());
    }

    let mut builder = GroupBuilder {
        graph,
        root,
        origin,
        cast_shadow: settings.shadows,
    };
    let result = if element.anchor().is_some() {
        build_template(&mut builder, element, Template::resolve(element))
    } else {
        build_path(&mut builder, element)
    };
    if let Err(err) = result {
        log::warn!("Failed to build meshes for {}: {err}", element.type_id());
    }
    root
}

fn path_material(element: &Element, fallback: MaterialKind) -> MaterialKind {
    element
        .props
        .material
        .map(MaterialKind::from_hint)
        .unwrap_or(fallback)
}

fn build_path(b: &mut GroupBuilder<'_>, element: &Element) -> Result<(), GraphError> {
    let Some((p0, p1)) = element.segment() else {
        // Degenerate path: keep a small marker so the element stays pickable.
        let p = element.points().first().copied().unwrap_or_default();
        b.add(
            Primitive::cuboid(4.0, 1.0, 4.0),
            MaterialKind::solid(element.props.color),
            vec3(p.x as f32, MARKER_LIFT, p.y as f32),
        )?;
        return Ok(());
    };
    let props = &element.props;
    let color = MaterialKind::solid(props.color);

    match element.kind() {
        ElementKind::Wall => {
            let height = props.height.map_or(DEFAULT_WALL_HEIGHT, |h| h as f32);
            let thickness = props.width.map_or(DEFAULT_WALL_THICKNESS, |t| t as f32);
            let material = if element.has("glass") {
                MaterialKind::Glass
            } else if element.has("brick") {
                path_material(element, MaterialKind::Brick)
            } else {
                path_material(element, MaterialKind::Concrete)
            };
            b.segment_box(p0, p1, height, thickness, 0.0, material)?;
        }
        ElementKind::Room | ElementKind::Floor => {
            let material = if element.has("wood") {
                MaterialKind::Wood
            } else if element.has("marble") || element.has("granite") {
                MaterialKind::Marble
            } else if element.has("vitrified") || element.has("tile") {
                MaterialKind::Tile
            } else {
                path_material(element, MaterialKind::Concrete)
            };
            b.ground_plane(element, FLOOR_LIFT, material)?;
        }
        ElementKind::Roof => {
            let y = props
                .elevation
                .map_or(DEFAULT_ROOF_ELEVATION, |e| e as f32);
            let material = if element.has("tile") {
                MaterialKind::RoofTile
            } else if element.has("metal") {
                MaterialKind::Metal
            } else if element.has("false_ceiling") {
                MaterialKind::White
            } else {
                path_material(element, MaterialKind::Concrete)
            };
            b.ground_plane(element, y, material)?;
        }
        ElementKind::Exterior if element.has("bound") => {
            let height = props.height.map_or(FENCE_HEIGHT, |h| h as f32);
            let material = path_material(element, MaterialKind::Brick);
            b.segment_box(p0, p1, height, FENCE_THICKNESS, 0.0, material)?;
        }
        ElementKind::Exterior => {
            let material = if element.has("pool") {
                MaterialKind::Water
            } else if element.has("road") {
                MaterialKind::Asphalt
            } else if element.has("pave") {
                MaterialKind::Tile
            } else {
                MaterialKind::Grass
            };
            b.ground_plane(element, GROUND_LIFT, material)?;
        }
        ElementKind::Fixture(FixtureClass::Plumbing) => {
            let material = if element.has("gi") {
                MaterialKind::Metal
            } else {
                MaterialKind::White
            };
            b.segment_rod(p0, p1, 1.5, 2.0, path_material(element, material))?;
        }
        ElementKind::Fixture(_) => {
            let y = props.elevation.map_or(100.0, |e| e as f32);
            b.segment_rod(p0, p1, 0.5, y, color)?;
        }
        ElementKind::Annotation if element.subtype == "rect" => {
            b.ground_plane(element, MARKER_LIFT, color)?;
        }
        ElementKind::Annotation if element.subtype == "circle" => {
            let radius = p0.distance(p1) as f32;
            b.add(
                Primitive::cylinder(radius, radius, 0.5),
                color,
                vec3(p0.x as f32, MARKER_LIFT, p0.y as f32),
            )?;
        }
        _ => {
            for pair in element.points().windows(2) {
                b.segment_box(pair[0], pair[1], 0.5, 1.0, MARKER_LIFT, color)?;
            }
        }
    }
    Ok(())
}

fn build_template(
    b: &mut GroupBuilder<'_>,
    element: &Element,
    template: Template,
) -> Result<(), GraphError> {
    use MaterialKind as M;
    use Primitive as P;

    match template {
        Template::LSofa => {
            let mat = M::Fabric;
            b.add(P::cuboid(80.0, 15.0, 30.0), mat, vec3(0.0, 7.5, 0.0))?;
            b.add(P::cuboid(30.0, 15.0, 50.0), mat, vec3(-25.0, 7.5, 40.0))?;
            b.add(P::cuboid(80.0, 25.0, 5.0), mat, vec3(0.0, 12.5, -12.5))?;
            b.add(P::cuboid(5.0, 25.0, 50.0), mat, vec3(-37.5, 12.5, 40.0))?;
            for x in [-25.0, 0.0, 25.0] {
                b.add(P::cuboid(25.0, 5.0, 25.0), M::White, vec3(x, 17.5, 0.0))?;
            }
        }
        Template::Sofa => {
            let mat = M::Leather;
            b.add(P::cuboid(70.0, 12.0, 25.0), mat, vec3(0.0, 6.0, 0.0))?;
            b.add(P::cuboid(70.0, 20.0, 5.0), mat, vec3(0.0, 10.0, -10.0))?;
            b.add(P::cuboid(8.0, 15.0, 25.0), mat, vec3(-31.0, 7.5, 0.0))?;
            b.add(P::cuboid(8.0, 15.0, 25.0), mat, vec3(31.0, 7.5, 0.0))?;
        }
        Template::Recliner => {
            b.add(P::cuboid(30.0, 15.0, 30.0), M::Leather, vec3(0.0, 7.5, 0.0))?;
            b.add(P::cuboid(30.0, 30.0, 5.0), M::Leather, vec3(0.0, 15.0, -12.5))?;
            b.add(P::cuboid(25.0, 5.0, 10.0), M::Metal, vec3(0.0, 5.0, 20.0))?;
        }
        Template::TvCabinet => {
            b.add(P::cuboid(60.0, 15.0, 15.0), M::Wood, vec3(0.0, 7.5, 0.0))?;
            b.add(P::cuboid(50.0, 25.0, 2.0), M::White, vec3(0.0, 27.5, 0.0))?;
            b.add(P::cuboid(52.0, 27.0, 1.0), M::Metal, vec3(0.0, 27.5, -1.0))?;
        }
        Template::CoffeeTable => {
            b.add(P::cuboid(30.0, 2.0, 20.0), M::Glass, vec3(0.0, 10.0, 0.0))?;
            for (x, z) in [(-10.0, -7.0), (10.0, -7.0), (-10.0, 7.0), (10.0, 7.0)] {
                b.add(P::cylinder(1.0, 1.0, 10.0), M::Metal, vec3(x, 5.0, z))?;
            }
        }
        Template::Bookshelf => {
            b.add(P::cuboid(30.0, 60.0, 10.0), M::Wood, vec3(0.0, 30.0, 0.0))?;
            for y in (10..60).step_by(12) {
                b.add(P::cuboid(28.0, 1.0, 9.0), M::WoodDark, vec3(0.0, y as f32, 0.0))?;
            }
        }
        Template::Bed(w) => {
            b.add(P::cuboid(w, 8.0, 80.0), M::Wood, vec3(0.0, 4.0, 0.0))?;
            b.add(P::cuboid(w - 2.0, 6.0, 78.0), M::White, vec3(0.0, 11.0, 0.0))?;
            b.add(P::cuboid(w, 30.0, 4.0), M::Wood, vec3(0.0, 15.0, -38.0))?;
            b.add(P::cuboid(18.0, 4.0, 10.0), M::Fabric, vec3(-w / 4.0, 14.0, -30.0))?;
            b.add(P::cuboid(18.0, 4.0, 10.0), M::Fabric, vec3(w / 4.0, 14.0, -30.0))?;
        }
        Template::Wardrobe => {
            b.add(P::cuboid(40.0, 70.0, 20.0), M::Wood, vec3(0.0, 35.0, 0.0))?;
            b.add(P::cuboid(18.0, 68.0, 1.0), M::WoodDark, vec3(-10.0, 35.0, 10.0))?;
            b.add(P::cuboid(18.0, 68.0, 1.0), M::WoodDark, vec3(10.0, 35.0, 10.0))?;
            b.add(P::sphere(1.0), M::Metal, vec3(-2.0, 35.0, 11.0))?;
        }
        Template::KitchenModule => {
            b.add(P::cuboid(20.0, 30.0, 20.0), M::Wood, vec3(0.0, 15.0, 0.0))?;
            b.add(P::cuboid(22.0, 2.0, 22.0), M::Marble, vec3(0.0, 31.0, 1.0))?;
        }
        Template::Chimney => {
            let hood = P::Cone {
                radius: 10.0,
                height: 15.0,
                segments: 4,
            };
            b.add(hood, M::Metal, vec3(0.0, 60.0, 0.0))?;
            b.add(P::cuboid(20.0, 2.0, 15.0), M::Metal, vec3(0.0, 52.0, 0.0))?;
        }
        Template::GasStove => {
            b.add(P::cuboid(20.0, 5.0, 12.0), M::Metal, vec3(0.0, 2.5, 0.0))?;
            b.add(P::cylinder(3.0, 3.0, 1.0), M::White, vec3(-5.0, 5.0, 0.0))?;
            b.add(P::cylinder(3.0, 3.0, 1.0), M::White, vec3(5.0, 5.0, 0.0))?;
        }
        Template::Fridge => {
            b.add(P::cuboid(25.0, 60.0, 25.0), M::Metal, vec3(0.0, 30.0, 0.0))?;
            b.add(P::cuboid(1.0, 20.0, 1.0), M::Chrome, vec3(12.0, 40.0, 13.0))?;
        }
        Template::Toilet => {
            b.add(P::cuboid(15.0, 20.0, 10.0), M::Ceramic, vec3(0.0, 10.0, -10.0))?;
            b.add(P::cylinder(10.0, 8.0, 12.0), M::Ceramic, vec3(0.0, 6.0, 5.0))?;
        }
        Template::Basin => {
            b.add(P::cylinder(2.0, 2.0, 30.0), M::Metal, vec3(0.0, 15.0, 0.0))?;
            b.add_rotated(
                P::dome(10.0),
                M::Ceramic,
                vec3(0.0, 30.0, 0.0),
                Quat::from_rotation_x(PI),
            )?;
            b.add(P::cylinder(1.0, 1.0, 5.0), M::Chrome, vec3(0.0, 35.0, -8.0))?;
        }
        Template::Bathtub => {
            b.add(P::cuboid(60.0, 15.0, 25.0), M::Ceramic, vec3(0.0, 7.5, 0.0))?;
            b.add_rotated(
                P::plane(55.0, 20.0),
                M::Water,
                vec3(0.0, 12.0, 0.0),
                Quat::from_rotation_x(-FRAC_PI_2),
            )?;
        }
        Template::Workstation => {
            b.add(P::cuboid(50.0, 2.0, 25.0), M::Wood, vec3(0.0, 29.0, 0.0))?;
            b.add(P::cuboid(2.0, 28.0, 25.0), M::Metal, vec3(-24.0, 14.0, 0.0))?;
            b.add(P::cuboid(2.0, 28.0, 25.0), M::Metal, vec3(24.0, 14.0, 0.0))?;
        }
        Template::ExecChair => {
            b.add(P::cylinder(10.0, 10.0, 2.0), M::Metal, vec3(0.0, 2.0, 0.0))?;
            b.add(P::cylinder(2.0, 2.0, 15.0), M::Metal, vec3(0.0, 10.0, 0.0))?;
            b.add(P::cuboid(18.0, 2.0, 18.0), M::Leather, vec3(0.0, 18.0, 0.0))?;
            b.add(P::cuboid(18.0, 25.0, 2.0), M::Leather, vec3(0.0, 30.0, -8.0))?;
        }
        Template::Door => {
            let w = element.props.width.map_or(40.0, |w| w as f32);
            let h = element.props.height.map_or(84.0, |h| h as f32);
            let leaf = if element.has("glass") {
                M::Glass
            } else if element.has("upvc") {
                M::White
            } else {
                M::Wood
            };
            b.add(P::cuboid(2.0, h, 6.0), M::WoodDark, vec3(0.0, h / 2.0, 0.0))?;
            b.add(P::cuboid(2.0, h, 6.0), M::WoodDark, vec3(w, h / 2.0, 0.0))?;
            b.add(P::cuboid(w + 2.0, 2.0, 6.0), M::WoodDark, vec3(w / 2.0, h + 1.0, 0.0))?;
            b.add(P::cuboid(w - 2.0, h - 2.0, 2.0), leaf, vec3(w / 2.0, h / 2.0, 0.0))?;
        }
        Template::Window => {
            let w = element.props.width.map_or(50.0, |w| w as f32);
            let frame = if element.has("alum") { M::Metal } else { M::White };
            b.add(P::cuboid(w, 2.0, 8.0), frame, vec3(0.0, 36.0, 0.0))?;
            b.add(P::cuboid(w - 4.0, 44.0, 1.0), M::Glass, vec3(0.0, 60.0, 0.0))?;
            b.add(P::cuboid(w, 2.0, 8.0), frame, vec3(0.0, 84.0, 0.0))?;
            if element.has("sliding") || element.has("casement") {
                b.add(P::cuboid(2.0, 44.0, 2.0), frame, vec3(0.0, 60.0, 0.0))?;
            }
        }
        Template::Column { round } => {
            let h = element.props.height.map_or(DEFAULT_WALL_HEIGHT, |h| h as f32);
            let at = vec3(0.0, h / 2.0, 0.0);
            if round {
                b.add(P::cylinder(6.0, 6.0, h), M::Concrete, at)?;
            } else if element.has("steel") {
                b.add(P::cuboid(8.0, h, 8.0), M::Metal, at)?;
            } else {
                b.add(P::cuboid(12.0, h, 12.0), M::Concrete, at)?;
            }
        }
        Template::Beam => {
            let len = element.props.width.map_or(120.0, |w| w as f32);
            let mat = if element.has("steel") { M::Metal } else { M::Concrete };
            b.add(P::cuboid(len, 12.0, 8.0), mat, vec3(0.0, DEFAULT_WALL_HEIGHT - 6.0, 0.0))?;
        }
        Template::Stair => {
            let mat = if element.has("glass") {
                M::Glass
            } else if element.has("float") {
                M::Wood
            } else {
                M::Concrete
            };
            for i in 0..10 {
                let rise = 7.0 * (i + 1) as f32;
                b.add(
                    P::cuboid(36.0, rise, 10.0),
                    mat,
                    vec3(0.0, rise / 2.0, -45.0 + 10.0 * i as f32),
                )?;
            }
        }
        Template::CeilingLight => {
            b.add(P::cylinder(6.0, 6.0, 1.0), M::White, vec3(0.0, 118.5, 0.0))?;
            b.add(P::sphere(3.0), M::Chrome, vec3(0.0, 115.0, 0.0))?;
        }
        Template::Fan => {
            b.add(P::cylinder(3.0, 3.0, 4.0), M::Metal, vec3(0.0, 112.0, 0.0))?;
            for i in 0..3 {
                let yaw = i as f32 * TAU / 3.0;
                let rot = Quat::from_rotation_y(yaw);
                b.add_rotated(
                    P::cuboid(24.0, 0.5, 4.0),
                    M::WoodDark,
                    rot * vec3(14.0, 0.0, 0.0) + vec3(0.0, 110.0, 0.0),
                    rot,
                )?;
            }
        }
        Template::Switchboard => {
            b.add(P::cuboid(8.0, 12.0, 1.0), M::White, vec3(0.0, 48.0, 0.0))?;
        }
        Template::Tree => {
            b.add(P::cylinder(2.0, 3.0, 40.0), M::WoodDark, vec3(0.0, 20.0, 0.0))?;
            b.add(P::sphere(20.0), M::Grass, vec3(0.0, 55.0, 0.0))?;
        }
        Template::Car => {
            let body = MaterialKind::Solid(
                element
                    .props
                    .color
                    .unwrap_or(floorplan_core::Rgba::from_u32(0x3b82f6)),
            );
            b.add(P::cuboid(70.0, 20.0, 120.0), body, vec3(0.0, 18.0, 0.0))?;
            b.add(P::cuboid(60.0, 16.0, 50.0), M::Glass, vec3(0.0, 36.0, -5.0))?;
            for (x, z) in [(-33.0, -40.0), (33.0, -40.0), (-33.0, 40.0), (33.0, 40.0)] {
                b.add_rotated(
                    P::cylinder(10.0, 10.0, 6.0),
                    M::Asphalt,
                    vec3(x, 10.0, z),
                    Quat::from_rotation_z(FRAC_PI_2),
                )?;
            }
        }
        Template::PottedPlant => {
            b.add(P::cylinder(6.0, 5.0, 12.0), M::Ceramic, vec3(0.0, 6.0, 0.0))?;
            b.add(P::sphere(9.0), M::Grass, vec3(0.0, 20.0, 0.0))?;
        }
        Template::Fallback => {
            let mat = element
                .props
                .material
                .map(MaterialKind::from_hint)
                .unwrap_or_else(|| MaterialKind::solid(element.props.color));
            b.add(P::cuboid(20.0, 20.0, 20.0), mat, vec3(0.0, 10.0, 0.0))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeContent;
    use floorplan_core::{LayerId, Rgba};

    fn anchored(kind: ElementKind, subtype: &str) -> Element {
        Element::anchored(kind, subtype, Point::new(100.0, 200.0), 90.0, LayerId::default())
    }

    fn mesh_count(graph: &SceneGraph, root: NodeId) -> usize {
        graph.get(root).unwrap().children().len()
    }

    fn first_mesh(graph: &SceneGraph, root: NodeId) -> (Primitive, MaterialKind, Transform) {
        let child = graph.get(root).unwrap().children()[0];
        let node = graph.get(child).unwrap();
        match &node.content {
            NodeContent::Mesh {
                primitive,
                material,
            } => (*primitive, *material, node.transform),
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn test_wall_box_spans_segment() {
        let mut graph = SceneGraph::new();
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(0.0, 100.0)],
            LayerId::default(),
        );
        let root = build_element(&mut graph, &wall, &RenderSettings::default());
        assert_eq!(graph.get(root).unwrap().owner, Some(wall.id()));

        let (prim, mat, t) = first_mesh(&graph, root);
        assert_eq!(prim, Primitive::cuboid(100.0, 120.0, 12.0));
        assert_eq!(mat, MaterialKind::Concrete);
        assert_eq!(t.translation, vec3(0.0, 60.0, 0.0));
        assert!((t.yaw() + FRAC_PI_2).abs() < 1e-5);

        let root_t = graph.get(root).unwrap().transform;
        assert_eq!(root_t.translation, vec3(0.0, 0.0, 50.0));
        let bounds = graph.world_bounds(root).unwrap();
        assert!((bounds.center() - vec3(0.0, 60.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_glass_and_brick_walls() {
        let mut graph = SceneGraph::new();
        let pts = vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
        let glass = Element::path(ElementKind::Wall, "glass_part", pts.clone(), LayerId::default());
        let brick = Element::path(ElementKind::Wall, "brick", pts, LayerId::default());
        let s = RenderSettings::default();
        let g = build_element(&mut graph, &glass, &s);
        let b = build_element(&mut graph, &brick, &s);
        assert_eq!(first_mesh(&graph, g).1, MaterialKind::Glass);
        assert_eq!(first_mesh(&graph, b).1, MaterialKind::Brick);
    }

    #[test]
    fn test_floor_plane_lies_flat() {
        let mut graph = SceneGraph::new();
        let floor = Element::path(
            ElementKind::Floor,
            "wood",
            vec![Point::new(100.0, 0.0), Point::new(0.0, 50.0)],
            LayerId::default(),
        );
        let root = build_element(&mut graph, &floor, &RenderSettings::default());
        let (prim, mat, t) = first_mesh(&graph, root);
        assert_eq!(prim, Primitive::plane(100.0, 50.0));
        assert_eq!(mat, MaterialKind::Wood);
        assert_eq!(t.translation, vec3(0.0, FLOOR_LIFT, 0.0));
        assert_eq!(graph.get(root).unwrap().transform.translation, vec3(50.0, 0.0, 25.0));
        let bounds = graph.world_bounds(root).unwrap();
        assert!(bounds.size().y.abs() < 1e-4);
    }

    #[test]
    fn test_anchored_root_transform() {
        let mut graph = SceneGraph::new();
        let mut bed = anchored(ElementKind::Furniture, "bed_king");
        bed.props.elevation = Some(10.0);
        let root = build_element(&mut graph, &bed, &RenderSettings::default());
        let t = graph.get(root).unwrap().transform;
        assert_eq!(t.translation, vec3(100.0, 10.0, 200.0));
        assert!((t.yaw() + FRAC_PI_2).abs() < 1e-5);
        assert_eq!(mesh_count(&graph, root), 5);
        assert_eq!(first_mesh(&graph, root).0, Primitive::cuboid(76.0, 8.0, 80.0));
    }

    #[test]
    fn test_template_resolution() {
        let t = |kind, sub| Template::resolve(&anchored(kind, sub));
        assert_eq!(t(ElementKind::Furniture, "sofa_l"), Template::LSofa);
        assert_eq!(t(ElementKind::Furniture, "bed_queen"), Template::Bed(60.0));
        assert_eq!(t(ElementKind::Furniture, "wc"), Template::Toilet);
        assert_eq!(t(ElementKind::Door, "flush"), Template::Door);
        assert_eq!(t(ElementKind::Column, "rcc_rnd"), Template::Column { round: true });
        assert_eq!(t(ElementKind::Column, "beam_steel"), Template::Beam);
        assert_eq!(
            t(ElementKind::Fixture(FixtureClass::Electrical), "fan_ceil"),
            Template::Fan
        );
        assert_eq!(t(ElementKind::Exterior, "tree"), Template::Tree);
        assert_eq!(t(ElementKind::Furniture, "piano"), Template::Fallback);
    }

    #[test]
    fn test_template_mesh_counts() {
        let mut graph = SceneGraph::new();
        let s = RenderSettings::default();
        for (sub, count) in [("sofa_l", 7), ("coffee", 5), ("book", 6), ("basin", 3)] {
            let root = build_element(&mut graph, &anchored(ElementKind::Furniture, sub), &s);
            assert_eq!(mesh_count(&graph, root), count, "{sub}");
        }
    }

    #[test]
    fn test_fallback_uses_element_color() {
        let mut graph = SceneGraph::new();
        let mut el = anchored(ElementKind::Decor, "vase");
        el.props.color = Some(Rgba::rgb(255, 0, 0));
        let root = build_element(&mut graph, &el, &RenderSettings::default());
        let (prim, mat, t) = first_mesh(&graph, root);
        assert_eq!(prim, Primitive::cuboid(20.0, 20.0, 20.0));
        assert_eq!(mat, MaterialKind::Solid(Rgba::rgb(255, 0, 0)));
        assert_eq!(t.translation, vec3(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_every_element_gets_a_node() {
        let mut graph = SceneGraph::new();
        let s = RenderSettings::default();
        let line = Element::path(
            ElementKind::Annotation,
            "line",
            vec![Point::new(0.0, 0.0)],
            LayerId::default(),
        );
        let root = build_element(&mut graph, &line, &s);
        assert_eq!(mesh_count(&graph, root), 1);

        let pipe = Element::path(
            ElementKind::Fixture(FixtureClass::Plumbing),
            "pipe_pvc",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default(),
        );
        let root = build_element(&mut graph, &pipe, &s);
        let bounds = graph.world_bounds(root).unwrap();
        assert!((bounds.size().x - 100.0).abs() < 1e-3);
        assert!((bounds.size().y - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_shadow_flag_follows_settings() {
        let mut graph = SceneGraph::new();
        let el = anchored(ElementKind::Furniture, "fridge");
        let off = RenderSettings {
            shadows: false,
            ..RenderSettings::default()
        };
        let root = build_element(&mut graph, &el, &off);
        let child = graph.get(root).unwrap().children()[0];
        assert!(!graph.get(child).unwrap().cast_shadow);

        let root = build_element(&mut graph, &el, &RenderSettings::default());
        let child = graph.get(root).unwrap().children()[0];
        assert!(graph.get(child).unwrap().cast_shadow);
    }
}
