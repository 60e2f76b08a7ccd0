//! Floor-plan 3D Library
//!
//! Mirrors the element model into a 3D scene graph: per-element mesh
//! synthesis, incremental reconciliation, a transform gizmo whose drags flow
//! back as element updates, and ray picking for selection.

pub mod camera;
pub mod factory;
pub mod geometry;
pub mod gizmo;
pub mod graph;
pub mod material;
pub mod pipeline;
pub mod registry;
pub mod synchronizer;
pub mod textures;
pub mod viewport;

pub use camera::{OrbitControls, PerspectiveCamera, ndc_from_screen, pick};
pub use factory::{Template, build_element};
pub use geometry::{Aabb, Primitive, Ray};
pub use gizmo::{GizmoMode, SelectionOutline, TransformGizmo};
pub use graph::{GraphError, Node, NodeContent, NodeId, NodeRole, SceneGraph, Transform};
pub use material::{MaterialKind, MaterialParams};
pub use pipeline::{Light, RenderPass, RenderPipeline, ToneMapping};
pub use registry::{NodeRegistry, shape_key};
pub use synchronizer::{ReconcileStats, SceneSynchronizer, SyncInput};
pub use textures::{ProceduralTexture, TextureCache, TextureKind};
pub use viewport::{
    FrameView, GizmoDrag, HeadlessBackend, HeadlessStats, Scene3dError, Scene3dResult,
    SceneBackend, Viewport3d,
};
