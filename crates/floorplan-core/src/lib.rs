//! Floor-plan Core Library
//!
//! Platform-agnostic element model, history, layers, geometry helpers and the
//! interaction controller shared by the plan and model views.

pub mod camera;
pub mod color;
pub mod config;
pub mod controller;
pub mod document;
pub mod edit;
pub mod element;
pub mod events;
pub mod hit_test;
pub mod history;
pub mod input;
pub mod layer;
pub mod session;
pub mod snap;
pub mod tools;
pub mod view_state;

pub use camera::{Camera, screen_to_world, world_to_screen};
pub use color::Rgba;
pub use config::{ConfigError, EditorConfig};
pub use controller::{ControllerAction, DragPreview, InteractionController, InteractionState};
pub use document::{Document, EditOrigin};
pub use edit::{Edit, IgnoreReason};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ElementProps, FixtureClass, Geometry, Material,
    PropsPatch,
};
pub use events::{EditorEvent, EventBus, Observer, SelectionObserver};
pub use hit_test::{HitRadii, hit_test};
pub use history::{History, Snapshot};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use layer::{Layer, LayerId, LayerPatch, LayerSet};
pub use session::Session;
pub use snap::{GRID_SIZE, snap, snap_to_grid};
pub use tools::{DrawShape, ElementTool, ToolCategory, ToolKind};
pub use view_state::{RenderSettings, TextureResolution, Unit, ViewMode, ViewPatch, ViewState};
