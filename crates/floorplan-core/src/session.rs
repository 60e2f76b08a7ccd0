//! The editing session: single owner of the document, view state,
//! interaction controller and global selection.

use crate::config::EditorConfig;
use crate::controller::{ControllerAction, ControllerContext, DragPreview, InteractionController};
use crate::document::{Document, EditOrigin};
use crate::edit::{Edit, IgnoreReason};
use crate::element::{Element, ElementId, ElementPatch};
use crate::events::{EditorEvent, EventBus};
use crate::input::{KeyEvent, PointerEvent};
use crate::layer::{LayerId, LayerPatch, LayerSet};
use crate::tools::ToolKind;
use crate::view_state::{ViewPatch, ViewState};

/// Application state owned by one controller and lent to the views.
#[derive(Debug)]
pub struct Session {
    document: Document,
    view: ViewState,
    controller: InteractionController,
    selection: Option<ElementId>,
    events: EventBus,
    config: EditorConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        let mut view = ViewState::default();
        view.camera.min_zoom = config.min_zoom;
        view.camera.max_zoom = config.max_zoom;
        Self {
            document: Document::new(),
            view,
            controller: InteractionController::new(),
            selection: None,
            events: EventBus::new(),
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    pub fn layers(&self) -> &LayerSet {
        self.document.layers()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn preview(&self) -> Option<DragPreview> {
        self.controller.preview()
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Route a pointer event from the plan view through the controller.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let ctx = ControllerContext {
            elements: self.document.elements(),
            layers: self.document.layers(),
            view: &self.view,
            config: &self.config,
        };
        let actions = self.controller.handle_pointer(event, &ctx);
        for action in actions {
            match action {
                ControllerAction::Commit(next) => {
                    self.document.commit(next);
                    self.after_elements_changed();
                }
                ControllerAction::PatchView(patch) => self.patch_view(patch),
                ControllerAction::Select(id) => self.select(id),
            }
        }
    }

    /// Handle an editing shortcut. Returns whether the key was consumed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed { key, modifiers } = event else {
            return false;
        };
        let key = key.to_lowercase();
        match key.as_str() {
            "z" if modifiers.command() && modifiers.shift => self.redo(),
            "z" if modifiers.command() => self.undo(),
            "y" if modifiers.command() => self.redo(),
            "delete" | "backspace" => {
                let _ = self.delete_selection();
                true
            }
            "escape" => {
                self.controller.cancel();
                self.select(None);
                true
            }
            _ => false,
        }
    }

    /// Replace the global selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ElementId>) {
        let id = id.filter(|id| self.document.contains(*id));
        self.document.normalize_selection(id);
        if self.selection != id {
            self.selection = id;
            self.events.emit(EditorEvent::SelectionChanged(id));
        }
    }

    fn after_elements_changed(&mut self) {
        if self.selection.is_some_and(|id| !self.document.contains(id)) {
            self.select(None);
        } else {
            self.document.normalize_selection(self.selection);
        }
        self.events.emit(EditorEvent::ElementsChanged {
            revision: self.document.revision(),
        });
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.document.undo();
        if undone {
            self.after_elements_changed();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.document.redo();
        if redone {
            self.after_elements_changed();
        }
        redone
    }

    /// Update one element from the property editor or the 3D view.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch, origin: EditOrigin) -> Edit {
        let edit = self.document.update_element(id, patch, origin);
        if edit.is_applied() {
            self.after_elements_changed();
        }
        edit
    }

    pub fn add_element(&mut self, element: Element) -> Edit {
        let edit = self.document.add_element(element, EditOrigin::User);
        if edit.is_applied() {
            self.after_elements_changed();
        }
        edit
    }

    pub fn delete_element(&mut self, id: ElementId) -> Edit {
        let edit = self.document.delete_element(id, EditOrigin::User);
        if edit.is_applied() {
            self.after_elements_changed();
        }
        edit
    }

    pub fn delete_selection(&mut self) -> Edit {
        match self.selection {
            Some(id) => self.delete_element(id),
            None => Edit::Ignored(IgnoreReason::ElementNotFound),
        }
    }

    fn after_layers_changed(&mut self, elements_before: u64) {
        self.events.emit(EditorEvent::LayersChanged {
            revision: self.document.layers().revision(),
        });
        if self.document.revision() != elements_before {
            self.after_elements_changed();
        }
    }

    pub fn add_layer(&mut self) -> LayerId {
        let revision = self.document.revision();
        let id = self.document.add_layer();
        self.after_layers_changed(revision);
        id
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> Edit {
        let revision = self.document.revision();
        let edit = self.document.remove_layer(id);
        if edit.is_applied() {
            self.after_layers_changed(revision);
        }
        edit
    }

    pub fn update_layer(&mut self, id: &LayerId, patch: LayerPatch) -> Edit {
        let revision = self.document.revision();
        let edit = self.document.update_layer(id, patch);
        if edit.is_applied() {
            self.after_layers_changed(revision);
        }
        edit
    }

    pub fn set_active_layer(&mut self, id: &LayerId) -> Edit {
        let revision = self.document.revision();
        let edit = self.document.set_active_layer(id);
        if edit.is_applied() {
            self.after_layers_changed(revision);
        }
        edit
    }

    /// Switch tools. Refused while a drag is in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> Edit {
        if self.controller.is_busy() {
            return Edit::Ignored(IgnoreReason::InteractionInProgress).logged("set_tool");
        }
        self.patch_view(ViewPatch::SetTool(tool));
        Edit::Applied
    }

    pub fn patch_view(&mut self, patch: ViewPatch) {
        if let ViewPatch::SetTool(_) = patch {
            if self.controller.is_busy() {
                log::debug!("Tool change ignored: interaction in progress");
                return;
            }
        }
        if self.view.apply(patch) {
            self.events.emit(EditorEvent::ViewChanged);
        }
    }
}
