//! Keeps the 3D scene graph in step with the element model.

use crate::factory::{build_element, root_transform};
use crate::gizmo::{SelectionOutline, TransformGizmo};
use crate::graph::{NodeId, SceneGraph};
use crate::registry::{NodeRegistry, shape_key};
use floorplan_core::{Element, ElementId, LayerId, LayerSet, RenderSettings};
use std::collections::HashSet;

/// Everything one reconcile pass reads from the session.
#[derive(Debug, Clone, Copy)]
pub struct SyncInput<'a> {
    pub elements: &'a [Element],
    pub layers: &'a LayerSet,
    pub selection: Option<ElementId>,
    /// Element-list revision; bumped on every model change.
    pub revision: u64,
    pub settings: &'a RenderSettings,
}

impl SyncInput<'_> {
    fn key(&self) -> SyncKey {
        SyncKey {
            revision: self.revision,
            layers_revision: self.layers.revision(),
            selection: self.selection,
            settings: *self.settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncKey {
    revision: u64,
    layers_revision: u64,
    selection: Option<ElementId>,
    settings: RenderSettings,
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Nodes built for elements that had none.
    pub created: usize,
    /// Nodes rebuilt because the element's shape changed.
    pub rebuilt: usize,
    /// Nodes moved to a new anchor, rotation or elevation.
    pub updated: usize,
    /// Nodes disposed for deleted or hidden elements.
    pub removed: usize,
    /// Elements left out because their layer is hidden.
    pub skipped: usize,
}

impl ReconcileStats {
    pub fn changed(&self) -> bool {
        self.created + self.rebuilt + self.updated + self.removed > 0
    }
}

/// Diffs the element list against the registry and patches the graph.
#[derive(Debug, Clone, Default)]
pub struct SceneSynchronizer {
    last: Option<SyncKey>,
}

impl SceneSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next [`reconcile`](Self::reconcile) to run.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Whether `input` differs from the last reconciled input.
    pub fn is_stale(&self, input: &SyncInput<'_>) -> bool {
        self.last != Some(input.key())
    }

    /// Bring the graph in line with `input`.
    ///
    /// Afterwards every element on a visible layer has exactly one root node,
    /// nothing else is registered, and the outline and gizmo follow the
    /// selection. An input identical to the previous one does no work.
    pub fn reconcile(
        &mut self,
        graph: &mut SceneGraph,
        registry: &mut NodeRegistry,
        gizmo: &mut TransformGizmo,
        outline: &mut SelectionOutline,
        input: &SyncInput<'_>,
    ) -> ReconcileStats {
        let key = input.key();
        if self.last == Some(key) {
            log::trace!("Scene unchanged, skipping reconcile");
            return ReconcileStats::default();
        }

        let mut stats = ReconcileStats::default();
        let visible = input.layers.visible_ids();
        let locked = input.layers.locked_ids();
        let mut present: HashSet<ElementId> = HashSet::with_capacity(input.elements.len());

        for element in input.elements {
            let id = element.id();
            if !visible.contains(&element.layer_id) {
                if let Some(node) = registry.remove(&id) {
                    dispose(graph, gizmo, outline, node);
                    stats.removed += 1;
                }
                stats.skipped += 1;
                continue;
            }
            present.insert(id);

            let key = shape_key(element, input.settings);
            match registry.node_of(&id) {
                None => {
                    let node = build_element(graph, element, input.settings);
                    registry.insert(id, node, key);
                    stats.created += 1;
                }
                Some(node) if registry.shape_key_of(&id) != Some(key) => {
                    let was_target = gizmo.is_target(node);
                    graph.remove_subtree(node);
                    let rebuilt = build_element(graph, element, input.settings);
                    registry.insert(id, rebuilt, key);
                    if was_target {
                        gizmo.attach(rebuilt);
                    }
                    stats.rebuilt += 1;
                }
                Some(node) => {
                    if gizmo.is_dragging() && gizmo.is_target(node) {
                        continue;
                    }
                    let Some(n) = graph.get_mut(node) else {
                        continue;
                    };
                    let target = root_transform(element);
                    if n.transform != target {
                        n.transform = target;
                        stats.updated += 1;
                    }
                }
            }
        }

        for node in registry.retain(|id| present.contains(id)) {
            dispose(graph, gizmo, outline, node);
            stats.removed += 1;
        }

        resolve_selection(graph, registry, gizmo, outline, input, &locked);

        if stats.changed() {
            log::debug!(
                "Reconciled scene: {} created, {} rebuilt, {} updated, {} removed, {} hidden",
                stats.created,
                stats.rebuilt,
                stats.updated,
                stats.removed,
                stats.skipped
            );
        }
        self.last = Some(key);
        stats
    }
}

/// Detach helpers from a node and free it.
fn dispose(
    graph: &mut SceneGraph,
    gizmo: &mut TransformGizmo,
    outline: &mut SelectionOutline,
    node: NodeId,
) {
    if gizmo.is_target(node) {
        gizmo.detach();
    }
    if outline.target() == Some(node) {
        outline.hide();
    }
    graph.remove_subtree(node);
}

fn resolve_selection(
    graph: &SceneGraph,
    registry: &NodeRegistry,
    gizmo: &mut TransformGizmo,
    outline: &mut SelectionOutline,
    input: &SyncInput<'_>,
    locked: &HashSet<LayerId>,
) {
    let selected = input
        .selection
        .and_then(|id| input.elements.iter().find(|e| e.id() == id))
        .and_then(|e| registry.node_of(&e.id()).map(|node| (e, node)));

    match selected {
        Some((element, node)) => {
            outline.set_target(graph, node);
            if locked.contains(&element.layer_id) {
                gizmo.detach();
            } else {
                gizmo.attach(node);
            }
        }
        None => {
            outline.hide();
            gizmo.detach();
        }
    }
}
