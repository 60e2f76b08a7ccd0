//! The plan document: element history plus layers.

use crate::edit::{Edit, IgnoreReason};
use crate::element::{Element, ElementId, ElementPatch};
use crate::history::{History, Snapshot};
use crate::layer::{LayerId, LayerPatch, LayerSet};

/// Who is asking for a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Interactive edits; rejected on locked layers.
    User,
    /// Internal edits such as transform-gizmo commits; bypass layer locks.
    System,
}

/// The authoritative element collection with undo history and layers.
#[derive(Debug, Clone, Default)]
pub struct Document {
    history: History,
    layers: LayerSet,
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial element collection.
    pub fn with_elements(elements: Snapshot) -> Self {
        Self {
            history: History::new(elements),
            ..Self::default()
        }
    }

    /// Elements of the active snapshot, in creation order.
    pub fn elements(&self) -> &[Element] {
        self.history.current()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements().iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Bumped whenever the active snapshot changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Push a new snapshot.
    pub fn commit(&mut self, next: Snapshot) {
        self.history.commit(next);
        self.revision += 1;
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo().is_some();
        if undone {
            self.revision += 1;
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo().is_some();
        if redone {
            self.revision += 1;
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn check_layer(&self, layer_id: &LayerId, origin: EditOrigin) -> Result<(), IgnoreReason> {
        if !self.layers.contains(layer_id) {
            return Err(IgnoreReason::LayerNotFound);
        }
        if origin == EditOrigin::User && self.layers.is_locked(layer_id) {
            return Err(IgnoreReason::LayerLocked);
        }
        Ok(())
    }

    /// Append an element to its layer.
    pub fn add_element(&mut self, element: Element, origin: EditOrigin) -> Edit {
        if let Err(reason) = self.check_layer(&element.layer_id, origin) {
            return Edit::Ignored(reason).logged("add_element");
        }
        let mut next = self.elements().to_vec();
        next.push(element);
        self.commit(next);
        Edit::Applied
    }

    /// Apply a partial update to one element.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch, origin: EditOrigin) -> Edit {
        let Some(index) = self.elements().iter().position(|e| e.id() == id) else {
            return Edit::Ignored(IgnoreReason::ElementNotFound).logged("update_element");
        };
        let current_layer = self.elements()[index].layer_id.clone();
        if let Err(reason) = self.check_layer(&current_layer, origin) {
            return Edit::Ignored(reason).logged("update_element");
        }
        if let Some(target) = &patch.layer_id {
            if let Err(reason) = self.check_layer(target, origin) {
                return Edit::Ignored(reason).logged("update_element");
            }
        }
        let mut next = self.elements().to_vec();
        if !next[index].apply(patch) {
            return Edit::Ignored(IgnoreReason::Unchanged);
        }
        self.commit(next);
        Edit::Applied
    }

    /// Remove one element.
    pub fn delete_element(&mut self, id: ElementId, origin: EditOrigin) -> Edit {
        let Some(element) = self.element(id) else {
            return Edit::Ignored(IgnoreReason::ElementNotFound).logged("delete_element");
        };
        if let Err(reason) = self.check_layer(&element.layer_id, origin) {
            return Edit::Ignored(reason).logged("delete_element");
        }
        let next = self.elements().iter().filter(|e| e.id() != id).cloned().collect();
        self.commit(next);
        Edit::Applied
    }

    pub fn add_layer(&mut self) -> LayerId {
        self.layers.add()
    }

    /// Remove a layer, moving its elements to the default layer in one commit.
    ///
    /// The reassignment ignores locks.
    pub fn remove_layer(&mut self, id: &LayerId) -> Edit {
        let edit = self.layers.remove(id).logged("remove_layer");
        if !edit.is_applied() {
            return edit;
        }
        if self.elements().iter().any(|e| &e.layer_id == id) {
            let next = self
                .elements()
                .iter()
                .cloned()
                .map(|mut e| {
                    if &e.layer_id == id {
                        e.layer_id = LayerId::default_layer();
                    }
                    e
                })
                .collect();
            self.commit(next);
        }
        Edit::Applied
    }

    pub fn update_layer(&mut self, id: &LayerId, patch: LayerPatch) -> Edit {
        self.layers.update(id, patch).logged("update_layer")
    }

    pub fn set_active_layer(&mut self, id: &LayerId) -> Edit {
        self.layers.set_active(id).logged("set_active_layer")
    }

    /// Flag exactly `selection` as selected in the active snapshot.
    ///
    /// Selection is transient and never creates a history entry.
    pub fn normalize_selection(&mut self, selection: Option<ElementId>) {
        for element in self.history.current_mut().iter_mut() {
            element.selected = Some(element.id()) == selection;
        }
    }
}
