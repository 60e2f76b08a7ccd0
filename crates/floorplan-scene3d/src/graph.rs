//! Arena-backed scene graph.
//!
//! Nodes live in generational slots: removing a node bumps its slot's
//! generation, so a stale [`NodeId`] never aliases a newer node.

use crate::geometry::{Aabb, Primitive};
use crate::material::MaterialKind;
use floorplan_core::element::ElementId;
use glam::{EulerRot, Mat4, Quat, Vec3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0:?} does not exist")]
    StaleNode(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Local transform: scale, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_yaw(self, yaw: f32) -> Self {
        self.with_rotation(Quat::from_rotation_y(yaw))
    }

    /// Rotation about the vertical axis, in radians.
    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Group,
    Mesh {
        primitive: Primitive,
        material: MaterialKind,
    },
    /// Ground grid: `size` world units split into `divisions` cells.
    Grid { size: f32, divisions: u32 },
}

/// Content nodes are pickable; helpers (grid, gizmo handles) are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Content,
    Helper,
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub transform: Transform,
    pub content: NodeContent,
    pub role: NodeRole,
    /// Element this node was built for; set on root groups.
    pub owner: Option<ElementId>,
    pub visible: bool,
    pub cast_shadow: bool,
}

impl Node {
    fn new(content: NodeContent, role: NodeRole, transform: Transform) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform,
            content,
            role,
            owner: None,
            visible: true,
            cast_shadow: false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owns every 3D node of a viewport.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// New top-level group.
    pub fn create_group(&mut self, role: NodeRole, transform: Transform) -> NodeId {
        let id = self.insert(Node::new(NodeContent::Group, role, transform));
        self.roots.push(id);
        id
    }

    /// New top-level node with arbitrary content.
    pub fn create_root(&mut self, content: NodeContent, role: NodeRole) -> NodeId {
        let id = self.insert(Node::new(content, role, Transform::IDENTITY));
        self.roots.push(id);
        id
    }

    /// New mesh under `parent`, inheriting its role.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        primitive: Primitive,
        material: MaterialKind,
        transform: Transform,
    ) -> Result<NodeId, GraphError> {
        let role = self.get(parent).ok_or(GraphError::StaleNode(parent))?.role;
        let id = self.insert(Node::new(
            NodeContent::Mesh {
                primitive,
                material,
            },
            role,
            transform,
        ));
        self.link(id, parent);
        Ok(id)
    }

    fn link(&mut self, child: NodeId, parent: NodeId) {
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = self.get(child).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(node) = self.get_mut(parent) {
                    node.children.retain(|c| *c != child);
                }
            }
            None => self.roots.retain(|r| *r != child),
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Move `child` (and its subtree) under `parent`.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        if !self.contains(child) {
            return Err(GraphError::StaleNode(child));
        }
        if !self.contains(parent) {
            return Err(GraphError::StaleNode(parent));
        }
        if self.ancestors(parent).contains(&child) {
            return Err(GraphError::Cycle { child, parent });
        }
        self.unlink(child);
        self.link(child, parent);
        Ok(())
    }

    /// Dispose a node and all its descendants. Returns how many were removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.unlink(id);
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                removed += 1;
            }
        }
        removed
    }

    /// Dispose every node.
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            self.remove_subtree(root);
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// `id` followed by its parent chain up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            chain.push(node_id);
            current = node.parent;
        }
        chain
    }

    /// `id` and every node below it, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Local-to-world matrix.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let chain = self.ancestors(id);
        if chain.is_empty() {
            return None;
        }
        Some(
            chain
                .iter()
                .rev()
                .filter_map(|n| self.get(*n))
                .fold(Mat4::IDENTITY, |m, node| m * node.transform.matrix()),
        )
    }

    /// Whether the node and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let chain = self.ancestors(id);
        !chain.is_empty() && chain.iter().all(|n| self.get(*n).is_some_and(|node| node.visible))
    }

    /// World bounds of every mesh in the subtree.
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let bounds = self
            .descendants(id)
            .into_iter()
            .filter_map(|n| {
                let node = self.get(n)?;
                let NodeContent::Mesh { primitive, .. } = &node.content else {
                    return None;
                };
                let m = self.world_matrix(n)?;
                Some(primitive.local_bounds().transformed(&m))
            })
            .fold(Aabb::EMPTY, |acc, b| acc.union(&b));
        (!bounds.is_empty()).then_some(bounds)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Top-level nodes that represent elements.
    pub fn content_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|n| n.role == NodeRole::Content))
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Every live mesh node.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let node = slot.node.as_ref()?;
            matches!(node.content, NodeContent::Mesh { .. }).then_some((
                NodeId {
                    index: index as u32,
                    generation: slot.generation,
                },
                node,
            ))
        })
    }
}
