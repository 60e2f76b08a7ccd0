//! Layers: named, independently visible and lockable groupings of elements.

use crate::color::Rgba;
use crate::edit::{Edit, IgnoreReason};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of a layer. The `"default"` layer always exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(String);

impl LayerId {
    const DEFAULT: &'static str = "default";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The protected layer every element falls back to.
    pub fn default_layer() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::default_layer()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub color: Rgba,
}

impl Layer {
    fn default_layer() -> Self {
        Self {
            id: LayerId::default_layer(),
            name: "Default Layer".to_string(),
            visible: true,
            locked: false,
            color: Rgba::white(),
        }
    }
}

/// Partial update for a layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub color: Option<Rgba>,
}

impl LayerPatch {
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }
}

/// Ordered set of layers plus the active layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSet {
    layers: Vec<Layer>,
    active: LayerId,
    #[serde(skip)]
    revision: u64,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSet {
    /// A set containing only the default layer, which is active.
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::default_layer()],
            active: LayerId::default_layer(),
            revision: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn active(&self) -> &LayerId {
        &self.active
    }

    /// Bumped on every applied change; used for change detection by the views.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the layer is locked. Unknown layers are treated as unlocked.
    pub fn is_locked(&self, id: &LayerId) -> bool {
        self.get(id).is_some_and(|layer| layer.locked)
    }

    /// Whether the layer is visible. Unknown layers are treated as hidden.
    pub fn is_visible(&self, id: &LayerId) -> bool {
        self.get(id).is_some_and(|layer| layer.visible)
    }

    pub fn visible_ids(&self) -> HashSet<LayerId> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .map(|layer| layer.id.clone())
            .collect()
    }

    pub fn locked_ids(&self) -> HashSet<LayerId> {
        self.layers
            .iter()
            .filter(|layer| layer.locked)
            .map(|layer| layer.id.clone())
            .collect()
    }

    /// Create a new visible, unlocked layer with a random color and make it active.
    pub fn add(&mut self) -> LayerId {
        let uuid = Uuid::new_v4();
        let bytes = uuid.as_bytes();
        let layer = Layer {
            id: LayerId::new(format!("layer_{}", uuid.simple())),
            name: format!("Layer {}", self.layers.len() + 1),
            visible: true,
            locked: false,
            color: Rgba::rgb(bytes[0], bytes[1], bytes[2]),
        };
        let id = layer.id.clone();
        log::info!("Added layer {} ({})", layer.name, id);
        self.layers.push(layer);
        self.active = id.clone();
        self.revision += 1;
        id
    }

    /// Remove a layer. The default layer is protected; an unknown id is a no-op.
    ///
    /// Reassigning the layer's elements is the document's job.
    pub fn remove(&mut self, id: &LayerId) -> Edit {
        if id.is_default() {
            return Edit::Ignored(IgnoreReason::ProtectedLayer);
        }
        let Some(index) = self.layers.iter().position(|layer| &layer.id == id) else {
            return Edit::Ignored(IgnoreReason::LayerNotFound);
        };
        let removed = self.layers.remove(index);
        log::info!("Removed layer {} ({})", removed.name, removed.id);
        if &self.active == id {
            self.active = LayerId::default_layer();
        }
        self.revision += 1;
        Edit::Applied
    }

    /// Apply a partial update to a layer.
    pub fn update(&mut self, id: &LayerId, patch: LayerPatch) -> Edit {
        let Some(layer) = self.layers.iter_mut().find(|layer| &layer.id == id) else {
            return Edit::Ignored(IgnoreReason::LayerNotFound);
        };
        let before = layer.clone();
        if let Some(name) = patch.name {
            layer.name = name;
        }
        if let Some(visible) = patch.visible {
            layer.visible = visible;
        }
        if let Some(locked) = patch.locked {
            layer.locked = locked;
        }
        if let Some(color) = patch.color {
            layer.color = color;
        }
        if *layer == before {
            return Edit::Ignored(IgnoreReason::Unchanged);
        }
        self.revision += 1;
        Edit::Applied
    }

    /// Make a layer the target for newly created elements.
    pub fn set_active(&mut self, id: &LayerId) -> Edit {
        if !self.contains(id) {
            return Edit::Ignored(IgnoreReason::LayerNotFound);
        }
        if &self.active == id {
            return Edit::Ignored(IgnoreReason::Unchanged);
        }
        self.active = id.clone();
        self.revision += 1;
        Edit::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_has_default_layer() {
        let layers = LayerSet::new();
        assert_eq!(layers.len(), 1);
        assert!(layers.active().is_default());
        assert!(layers.is_visible(&LayerId::default_layer()));
    }

    #[test]
    fn test_add_layer_becomes_active() {
        let mut layers = LayerSet::new();
        let id = layers.add();
        assert_eq!(layers.active(), &id);
        let layer = layers.get(&id).unwrap();
        assert_eq!(layer.name, "Layer 2");
        assert!(layer.visible);
        assert!(!layer.locked);
        assert!(id.as_str().starts_with("layer_"));
    }

    #[test]
    fn test_default_layer_is_protected() {
        let mut layers = LayerSet::new();
        let before = layers.revision();
        assert_eq!(
            layers.remove(&LayerId::default_layer()),
            Edit::Ignored(IgnoreReason::ProtectedLayer)
        );
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.revision(), before);
    }

    #[test]
    fn test_remove_active_layer_resets_active() {
        let mut layers = LayerSet::new();
        let id = layers.add();
        assert!(layers.remove(&id).is_applied());
        assert!(layers.active().is_default());
        assert!(!layers.contains(&id));
    }

    #[test]
    fn test_remove_unknown_layer_is_noop() {
        let mut layers = LayerSet::new();
        assert_eq!(
            layers.remove(&LayerId::new("missing")),
            Edit::Ignored(IgnoreReason::LayerNotFound)
        );
    }

    #[test]
    fn test_update_and_visibility_sets() {
        let mut layers = LayerSet::new();
        let id = layers.add();
        assert!(layers.update(&id, LayerPatch::visible(false)).is_applied());
        assert!(layers.update(&id, LayerPatch::locked(true)).is_applied());
        assert!(!layers.visible_ids().contains(&id));
        assert!(layers.locked_ids().contains(&id));
        assert_eq!(
            layers.update(&id, LayerPatch::locked(true)),
            Edit::Ignored(IgnoreReason::Unchanged)
        );
    }

    #[test]
    fn test_set_active_unknown_is_ignored() {
        let mut layers = LayerSet::new();
        assert_eq!(
            layers.set_active(&LayerId::new("nope")),
            Edit::Ignored(IgnoreReason::LayerNotFound)
        );
        assert!(layers.active().is_default());
    }
}
