//! Two-way map between elements and their root nodes.

use crate::graph::{NodeId, SceneGraph};
use floorplan_core::{Element, ElementId, Geometry, RenderSettings};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: NodeId,
    shape_key: u64,
}

/// Element id <-> root node bookkeeping.
///
/// Both directions are updated together, so the registry is always a
/// bijection over its entries.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    by_element: HashMap<ElementId, Entry>,
    by_node: HashMap<NodeId, ElementId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns the node previously registered for `id`.
    pub fn insert(&mut self, id: ElementId, node: NodeId, shape_key: u64) -> Option<NodeId> {
        let previous = self.remove(&id);
        self.by_element.insert(id, Entry { node, shape_key });
        self.by_node.insert(node, id);
        previous
    }

    pub fn node_of(&self, id: &ElementId) -> Option<NodeId> {
        self.by_element.get(id).map(|e| e.node)
    }

    pub fn element_of(&self, node: NodeId) -> Option<ElementId> {
        self.by_node.get(&node).copied()
    }

    pub fn shape_key_of(&self, id: &ElementId) -> Option<u64> {
        self.by_element.get(id).map(|e| e.shape_key)
    }

    /// Unregister an element. Returns its node.
    pub fn remove(&mut self, id: &ElementId) -> Option<NodeId> {
        let entry = self.by_element.remove(id)?;
        self.by_node.remove(&entry.node);
        Some(entry.node)
    }

    /// Keep only entries whose element passes `keep`; returns the dropped nodes.
    pub fn retain(&mut self, mut keep: impl FnMut(&ElementId) -> bool) -> Vec<NodeId> {
        let dropped: Vec<ElementId> = self
            .by_element
            .keys()
            .filter(|id| !keep(id))
            .copied()
            .collect();
        dropped.iter().filter_map(|id| self.remove(id)).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.by_element.keys()
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_element.clear();
        self.by_node.clear();
    }

    /// Whether both directions agree, every node is live, and every live
    /// content root is registered.
    pub fn check_bijection(&self, graph: &SceneGraph) -> bool {
        let forward = self.by_element.iter().all(|(id, entry)| {
            self.by_node.get(&entry.node) == Some(id) && graph.contains(entry.node)
        });
        forward
            && self.by_node.len() == self.by_element.len()
            && graph.content_roots().all(|n| self.by_node.contains_key(&n))
    }
}

/// Hash of everything that decides an element's meshes.
///
/// The anchor, rotation and elevation are left out: changing them only moves
/// the root node.
pub fn shape_key(element: &Element, settings: &RenderSettings) -> u64 {
    let mut h = DefaultHasher::new();
    element.kind().hash(&mut h);
    element.subtype.hash(&mut h);
    if let Geometry::Path { points } = &element.geometry {
        for p in points {
            p.x.to_bits().hash(&mut h);
            p.y.to_bits().hash(&mut h);
        }
    }
    let props = &element.props;
    for v in [props.width, props.height, props.depth] {
        v.map(f64::to_bits).hash(&mut h);
    }
    if element.anchor().is_none() {
        // Roofs and path fixtures use their elevation for geometry.
        props.elevation.map(f64::to_bits).hash(&mut h);
    }
    props.color.hash(&mut h);
    props.material.hash(&mut h);
    settings.hash(&mut h);
    h.finish()
}
