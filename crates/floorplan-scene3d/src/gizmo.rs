//! Interactive transform gizmo and selection outline.

use crate::geometry::Aabb;
use crate::graph::{NodeId, SceneGraph, Transform};
use crate::registry::NodeRegistry;
use floorplan_core::{Element, ElementId, ElementPatch, PropsPatch, Rgba};
use glam::{Quat, Vec3};
use kurbo::{Affine, Point, Vec2};

/// Which transform a gizmo drag applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    /// Mode for a keyboard shortcut (`t`, `r`, `s`, any case).
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            't' => Some(GizmoMode::Translate),
            'r' => Some(GizmoMode::Rotate),
            's' => Some(GizmoMode::Scale),
            _ => None,
        }
    }
}

/// Moves, rotates or scales one attached node.
///
/// Only the end of a drag produces a model change; while dragging, the node
/// is edited directly in the graph.
#[derive(Debug, Clone, Default)]
pub struct TransformGizmo {
    mode: GizmoMode,
    attached: Option<NodeId>,
    dragging: bool,
    origin: Option<Transform>,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    /// Switch mode from a key press. Returns whether the key was a mode key.
    pub fn set_mode_from_key(&mut self, key: char) -> bool {
        match GizmoMode::from_key(key) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => false,
        }
    }

    pub fn attach(&mut self, node: NodeId) {
        if self.attached != Some(node) {
            self.attached = Some(node);
            self.dragging = false;
            self.origin = None;
        }
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = false;
        self.origin = None;
    }

    pub fn target(&self) -> Option<NodeId> {
        self.attached
    }

    pub fn is_target(&self, node: NodeId) -> bool {
        self.attached == Some(node)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag on the attached node.
    pub fn begin_drag(&mut self, graph: &SceneGraph) -> bool {
        let Some(node) = self.attached.and_then(|id| graph.get(id)) else {
            return false;
        };
        self.origin = Some(node.transform);
        self.dragging = true;
        true
    }

    fn target_mut<'g>(
        &self,
        graph: &'g mut SceneGraph,
        mode: GizmoMode,
    ) -> Option<&'g mut Transform> {
        if !self.dragging || self.mode != mode {
            return None;
        }
        graph.get_mut(self.attached?).map(|n| &mut n.transform)
    }

    /// Offset the node from where the drag began.
    pub fn drag_translate(&self, graph: &mut SceneGraph, offset: Vec3) -> bool {
        let origin = self.origin.unwrap_or_default();
        match self.target_mut(graph, GizmoMode::Translate) {
            Some(t) => {
                t.translation = origin.translation + offset;
                true
            }
            None => false,
        }
    }

    /// Rotate the node about the vertical axis, relative to the drag start.
    pub fn drag_rotate(&self, graph: &mut SceneGraph, yaw: f32) -> bool {
        let origin = self.origin.unwrap_or_default();
        match self.target_mut(graph, GizmoMode::Rotate) {
            Some(t) => {
                t.rotation = Quat::from_rotation_y(yaw) * origin.rotation;
                true
            }
            None => false,
        }
    }

    /// Scale the node relative to the drag start. Scale is not written back
    /// to the element.
    pub fn drag_scale(&self, graph: &mut SceneGraph, factor: Vec3) -> bool {
        let origin = self.origin.unwrap_or_default();
        match self.target_mut(graph, GizmoMode::Scale) {
            Some(t) => {
                t.scale = origin.scale * factor;
                true
            }
            None => false,
        }
    }

    /// Finish the drag and build the element update it implies.
    ///
    /// The node is put back where the drag began; only a committed update
    /// moves it again, through reconciliation. Anchored elements take the
    /// node's ground position as their anchor, its height as elevation and
    /// its negated yaw (in degrees) as rotation. Path elements have their
    /// points moved and turned with the node about its origin. Scale drags
    /// commit nothing.
    pub fn end_drag(
        &mut self,
        graph: &mut SceneGraph,
        registry: &NodeRegistry,
        elements: &[Element],
    ) -> Option<(ElementId, ElementPatch)> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        let node_id = self.attached?;
        let node = graph.get_mut(node_id)?;
        let t = node.transform;
        let origin = self.origin.take().unwrap_or(t);
        node.transform = origin;

        if self.mode == GizmoMode::Scale {
            return None;
        }
        let id = registry.element_of(node_id)?;
        let element = elements.iter().find(|e| e.id() == id)?;

        let patch = if element.anchor().is_some() {
            ElementPatch {
                anchor: Some(Point::new(t.translation.x as f64, t.translation.z as f64)),
                rotation_degrees: Some(-(t.yaw().to_degrees() as f64)),
                props: PropsPatch {
                    elevation: Some(t.translation.y as f64),
                    ..PropsPatch::default()
                },
                ..ElementPatch::default()
            }
        } else {
            let moved = ground_motion(&origin, &t);
            let points: Vec<Point> = element.points().iter().map(|p| moved * *p).collect();
            let unchanged = points
                .iter()
                .zip(element.points())
                .all(|(a, b)| a.distance(*b) < MOTION_EPSILON);
            if unchanged {
                return None;
            }
            ElementPatch {
                points: Some(points),
                ..ElementPatch::default()
            }
        };
        Some((id, patch))
    }
}

/// Plan-space distance below which a drag counts as no motion.
const MOTION_EPSILON: f64 = 1e-6;

/// Plan-space map taking a node from `from` to `to` on the ground.
///
/// A node yaw of `θ` turns plan coordinates by `-θ`.
fn ground_motion(from: &Transform, to: &Transform) -> Affine {
    let pivot = |t: &Transform| Vec2::new(t.translation.x as f64, t.translation.z as f64);
    let turn = -((to.yaw() - from.yaw()) as f64);
    Affine::translate(pivot(to)) * Affine::rotate(turn) * Affine::translate(-pivot(from))
}

/// Highlight color of the selection outline.
pub const OUTLINE_COLOR: Rgba = Rgba::from_u32(0xffff00);

/// Box drawn around the selected element's node.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutline {
    target: Option<NodeId>,
    bounds: Aabb,
    visible: bool,
    pub color: Rgba,
}

impl Default for SelectionOutline {
    fn default() -> Self {
        Self {
            target: None,
            bounds: Aabb::EMPTY,
            visible: false,
            color: OUTLINE_COLOR,
        }
    }
}

impl SelectionOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline `node`, fitting the box to its current world bounds.
    pub fn set_target(&mut self, graph: &SceneGraph, node: NodeId) {
        self.target = Some(node);
        self.refresh(graph);
    }

    /// Refit to the target; hides the outline if the target is gone.
    pub fn refresh(&mut self, graph: &SceneGraph) {
        match self.target.and_then(|n| graph.world_bounds(n)) {
            Some(bounds) => {
                self.bounds = bounds;
                self.visible = true;
            }
            None if self.target.is_some_and(|n| graph.contains(n)) => {
                self.bounds = Aabb::EMPTY;
                self.visible = true;
            }
            None => self.hide(),
        }
    }

    pub fn hide(&mut self) {
        self.target = None;
        self.visible = false;
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::build_element;
    use crate::registry::shape_key;
    use floorplan_core::{ElementKind, LayerId, RenderSettings};
    use glam::vec3;

    fn setup(element: &Element) -> (SceneGraph, NodeRegistry, NodeId) {
        let settings = RenderSettings::default();
        let mut graph = SceneGraph::new();
        let mut registry = NodeRegistry::new();
        let node = build_element(&mut graph, element, &settings);
        registry.insert(element.id(), node, shape_key(element, &settings));
        (graph, registry, node)
    }

    #[test]
    fn test_mode_keys() {
        let mut gizmo = TransformGizmo::new();
        assert_eq!(gizmo.mode(), GizmoMode::Translate);
        assert!(gizmo.set_mode_from_key('R'));
        assert_eq!(gizmo.mode(), GizmoMode::Rotate);
        assert!(!gizmo.set_mode_from_key('x'));
        assert_eq!(gizmo.mode(), GizmoMode::Rotate);
    }

    #[test]
    fn test_translate_commit_for_anchored() {
        let chair = Element::anchored(
            ElementKind::Furniture,
            "exec_chair",
            Point::new(100.0, 50.0),
            30.0,
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&chair);
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(node);
        assert!(gizmo.begin_drag(&graph));
        assert!(gizmo.drag_translate(&mut graph, vec3(20.0, 5.0, -10.0)));

        let (id, patch) = gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&chair))
            .unwrap();
        assert_eq!(id, chair.id());
        assert_eq!(patch.anchor, Some(Point::new(120.0, 40.0)));
        assert_eq!(patch.props.elevation, Some(5.0));
        assert!((patch.rotation_degrees.unwrap() - 30.0).abs() < 1e-3);
        assert!(!gizmo.is_dragging());
        assert!(gizmo.is_target(node));
    }

    #[test]
    fn test_rotate_commit_inverts_yaw() {
        let chair = Element::anchored(
            ElementKind::Furniture,
            "exec_chair",
            Point::new(0.0, 0.0),
            0.0,
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&chair);
        let mut gizmo = TransformGizmo::new();
        gizmo.set_mode(GizmoMode::Rotate);
        gizmo.attach(node);
        gizmo.begin_drag(&graph);
        // Translation is ignored in rotate mode.
        assert!(!gizmo.drag_translate(&mut graph, vec3(10.0, 0.0, 0.0)));
        assert!(gizmo.drag_rotate(&mut graph, -std::f32::consts::FRAC_PI_2));

        let (_, patch) = gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&chair))
            .unwrap();
        assert!((patch.rotation_degrees.unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(patch.anchor, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_path_element_commit_shifts_points() {
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&wall);
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(node);
        gizmo.begin_drag(&graph);
        gizmo.drag_translate(&mut graph, vec3(10.0, 0.0, 20.0));
        let (_, patch) = gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&wall))
            .unwrap();
        assert_eq!(
            patch.points,
            Some(vec![Point::new(10.0, 20.0), Point::new(110.0, 20.0)])
        );
        assert_eq!(patch.anchor, None);
    }

    #[test]
    fn test_path_rotate_turns_points_about_midpoint() {
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&wall);
        let mut gizmo = TransformGizmo::new();
        gizmo.set_mode(GizmoMode::Rotate);
        gizmo.attach(node);
        gizmo.begin_drag(&graph);
        assert!(gizmo.drag_rotate(&mut graph, std::f32::consts::FRAC_PI_2));

        let (_, patch) = gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&wall))
            .unwrap();
        let points = patch.points.unwrap();
        assert!(points[0].distance(Point::new(50.0, 50.0)) < 1e-4);
        assert!(points[1].distance(Point::new(50.0, -50.0)) < 1e-4);
        // The node waits for the commit to come back through reconcile.
        let t = graph.get(node).unwrap().transform;
        assert!(t.yaw().abs() < 1e-6);
        assert_eq!(t.translation, vec3(50.0, 0.0, 0.0));
    }

    #[test]
    fn test_scale_drag_is_restored() {
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&wall);
        let before = graph.world_bounds(node).unwrap();
        let mut gizmo = TransformGizmo::new();
        gizmo.set_mode(GizmoMode::Scale);
        gizmo.attach(node);
        gizmo.begin_drag(&graph);
        assert!(gizmo.drag_scale(&mut graph, vec3(2.0, 1.0, 1.0)));
        assert!((graph.world_bounds(node).unwrap().size().x - 200.0).abs() < 1e-3);

        assert!(gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&wall))
            .is_none());
        assert_eq!(graph.get(node).unwrap().transform.scale, Vec3::ONE);
        assert_eq!(graph.world_bounds(node).unwrap(), before);
    }

    #[test]
    fn test_zero_motion_commits_nothing() {
        let wall = Element::path(
            ElementKind::Wall,
            "rcc",
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            LayerId::default(),
        );
        let (mut graph, registry, node) = setup(&wall);
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(node);
        gizmo.begin_drag(&graph);
        assert!(gizmo
            .end_drag(&mut graph, &registry, std::slice::from_ref(&wall))
            .is_none());
    }

    #[test]
    fn test_end_without_drag_is_noop() {
        let mut gizmo = TransformGizmo::new();
        let mut graph = SceneGraph::new();
        assert!(!gizmo.begin_drag(&graph));
        assert!(gizmo.end_drag(&mut graph, &NodeRegistry::new(), &[]).is_none());
    }

    #[test]
    fn test_outline_tracks_target() {
        let bed = Element::anchored(
            ElementKind::Furniture,
            "bed_single",
            Point::new(0.0, 0.0),
            0.0,
            LayerId::default(),
        );
        let (mut graph, _, node) = setup(&bed);
        let mut outline = SelectionOutline::new();
        outline.set_target(&graph, node);
        assert!(outline.is_visible());
        assert_eq!(outline.color, OUTLINE_COLOR);
        assert!((outline.bounds().size().x - 40.0).abs() < 1e-3);

        graph.remove_subtree(node);
        outline.refresh(&graph);
        assert!(!outline.is_visible());
        assert_eq!(outline.target(), None);
    }
}
