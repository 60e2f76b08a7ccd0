//! The 3D view: scene state, camera, gizmo and a pluggable backend.

use crate::camera::{OrbitControls, PerspectiveCamera, ndc_from_screen, pick};
use crate::gizmo::{GizmoMode, SelectionOutline, TransformGizmo};
use crate::graph::{NodeContent, NodeId, NodeRole, SceneGraph};
use crate::material::MaterialKind;
use crate::pipeline::RenderPipeline;
use crate::registry::NodeRegistry;
use crate::synchronizer::{ReconcileStats, SceneSynchronizer, SyncInput};
use crate::textures::TextureCache;
use floorplan_core::{Element, ElementId, ElementPatch, RenderSettings};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

/// Ground grid: 5000 units across, 100 divisions.
pub const GRID_SIZE: f32 = 5000.0;
pub const GRID_DIVISIONS: u32 = 100;

/// 3D view errors.
#[derive(Debug, Error)]
pub enum Scene3dError {
    #[error("Backend initialization failed: {0}")]
    Init(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for 3D view operations.
pub type Scene3dResult<T> = Result<T, Scene3dError>;

/// Everything a backend needs to draw one frame.
pub struct FrameView<'a> {
    pub graph: &'a SceneGraph,
    pub camera: &'a PerspectiveCamera,
    pub pipeline: &'a RenderPipeline,
    pub settings: &'a RenderSettings,
    pub textures: &'a TextureCache,
    pub outline: &'a SelectionOutline,
    /// Node the transform gizmo is attached to, and its mode.
    pub gizmo: Option<(NodeId, GizmoMode)>,
}

/// Draws frames for a [`Viewport3d`].
pub trait SceneBackend {
    /// Prepare GPU (or other) resources for a pipeline.
    fn initialize(
        &mut self,
        pipeline: &RenderPipeline,
        width: u32,
        height: u32,
    ) -> Scene3dResult<()>;

    fn render(&mut self, frame: &FrameView<'_>) -> Scene3dResult<()>;

    fn resize(&mut self, width: u32, height: u32);

    /// Release everything created by `initialize`.
    fn dispose(&mut self);
}

/// Counters recorded by [`HeadlessBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub initialized: usize,
    pub frames: usize,
    pub disposed: usize,
    pub size: (u32, u32),
    /// Visible content meshes in the last frame.
    pub last_mesh_count: usize,
    /// Make every render fail, for exercising error paths.
    pub fail_renders: bool,
}

/// Backend that draws nothing and records what it was asked to do.
///
/// Clones share their counters, so a test can keep a handle after boxing
/// one into a viewport.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    stats: Rc<RefCell<HeadlessStats>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> HeadlessStats {
        self.stats.borrow().clone()
    }

    pub fn set_fail_renders(&self, fail: bool) {
        self.stats.borrow_mut().fail_renders = fail;
    }
}

impl SceneBackend for HeadlessBackend {
    fn initialize(
        &mut self,
        _pipeline: &RenderPipeline,
        width: u32,
        height: u32,
    ) -> Scene3dResult<()> {
        let mut stats = self.stats.borrow_mut();
        stats.initialized += 1;
        stats.size = (width, height);
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Scene3dResult<()> {
        let mut stats = self.stats.borrow_mut();
        if stats.fail_renders {
            return Err(Scene3dError::RenderFailed("headless failure".to_string()));
        }
        stats.frames += 1;
        stats.last_mesh_count = frame
            .graph
            .meshes()
            .filter(|(id, node)| {
                node.role == NodeRole::Content && frame.graph.is_effectively_visible(*id)
            })
            .count();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.stats.borrow_mut().size = (width, height);
    }

    fn dispose(&mut self) {
        self.stats.borrow_mut().disposed += 1;
    }
}

/// Incremental gizmo drag input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoDrag {
    Translate(Vec3),
    /// Yaw in radians.
    Rotate(f32),
    Scale(Vec3),
}

/// Interactive 3D view of the plan.
pub struct Viewport3d {
    graph: SceneGraph,
    registry: NodeRegistry,
    sync: SceneSynchronizer,
    gizmo: TransformGizmo,
    outline: SelectionOutline,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    textures: TextureCache,
    pipeline: RenderPipeline,
    settings: RenderSettings,
    backend: Box<dyn SceneBackend>,
    size: (u32, u32),
    grid: NodeId,
}

impl std::fmt::Debug for Viewport3d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport3d")
            .field("nodes", &self.graph.live_count())
            .field("registered", &self.registry.len())
            .field("size", &self.size)
            .finish()
    }
}

fn create_grid(graph: &mut SceneGraph) -> NodeId {
    graph.create_root(
        NodeContent::Grid {
            size: GRID_SIZE,
            divisions: GRID_DIVISIONS,
        },
        NodeRole::Helper,
    )
}

impl Viewport3d {
    pub fn new(
        settings: RenderSettings,
        mut backend: Box<dyn SceneBackend>,
        width: u32,
        height: u32,
    ) -> Scene3dResult<Self> {
        let pipeline = RenderPipeline::from_settings(&settings);
        backend.initialize(&pipeline, width, height)?;
        let mut graph = SceneGraph::new();
        let grid = create_grid(&mut graph);
        let mut camera = PerspectiveCamera::default();
        camera.set_viewport(width, height);
        log::info!("3D view initialized at {width}x{height}");
        Ok(Self {
            graph,
            registry: NodeRegistry::new(),
            sync: SceneSynchronizer::new(),
            gizmo: TransformGizmo::new(),
            outline: SelectionOutline::new(),
            camera,
            controls: OrbitControls::new(),
            textures: TextureCache::new(settings.texture_resolution),
            pipeline,
            settings,
            backend,
            size: (width, height),
            grid,
        })
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn outline(&self) -> &SelectionOutline {
        &self.outline
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn grid(&self) -> NodeId {
        self.grid
    }

    /// Reconcile the scene with the session. Settings changes reinitialize
    /// the view first.
    pub fn sync(&mut self, input: &SyncInput<'_>) -> Scene3dResult<ReconcileStats> {
        self.apply_settings(*input.settings)?;
        Ok(self.sync.reconcile(
            &mut self.graph,
            &mut self.registry,
            &mut self.gizmo,
            &mut self.outline,
            input,
        ))
    }

    /// Element under a screen position, if any.
    pub fn click(&self, screen: Vec2) -> Option<ElementId> {
        let size = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let ray = self.camera.ray_from_ndc(ndc_from_screen(screen, size));
        pick(&self.graph, &self.registry, &ray)
    }

    /// Handle a key press. Returns whether it changed the gizmo mode.
    pub fn key(&mut self, key: char) -> bool {
        self.gizmo.set_mode_from_key(key)
    }

    /// Start dragging the gizmo. Orbiting is disabled until the drag ends.
    pub fn begin_gizmo_drag(&mut self) -> bool {
        let started = self.gizmo.begin_drag(&self.graph);
        if started {
            self.controls.enabled = false;
        }
        started
    }

    pub fn drag_gizmo(&mut self, drag: GizmoDrag) -> bool {
        let moved = match drag {
            GizmoDrag::Translate(offset) => self.gizmo.drag_translate(&mut self.graph, offset),
            GizmoDrag::Rotate(yaw) => self.gizmo.drag_rotate(&mut self.graph, yaw),
            GizmoDrag::Scale(factor) => self.gizmo.drag_scale(&mut self.graph, factor),
        };
        if moved {
            self.outline.refresh(&self.graph);
        }
        moved
    }

    /// Finish a gizmo drag, returning the element update to commit.
    pub fn end_gizmo_drag(&mut self, elements: &[Element]) -> Option<(ElementId, ElementPatch)> {
        let commit = self.gizmo.end_drag(&mut self.graph, &self.registry, elements);
        self.outline.refresh(&self.graph);
        self.controls.enabled = true;
        commit
    }

    /// Orbit the camera by pointer movement in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let height = self.size.1.max(1) as f32;
        let per_pixel = std::f32::consts::TAU / height;
        self.controls.rotate(-dx * per_pixel, -dy * per_pixel);
    }

    /// Zoom by wheel delta; positive moves away from the target.
    pub fn zoom(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        self.controls.dolly(0.95_f32.powf(-delta.signum()));
    }

    /// Draw one frame. A failed render is logged and the frame skipped.
    pub fn frame(&mut self) -> bool {
        self.controls.update(&mut self.camera);
        if self.outline.target().is_some() {
            self.outline.refresh(&self.graph);
        }
        self.prepare_textures();

        let frame = FrameView {
            graph: &self.graph,
            camera: &self.camera,
            pipeline: &self.pipeline,
            settings: &self.settings,
            textures: &self.textures,
            outline: &self.outline,
            gizmo: self.gizmo.target().map(|n| (n, self.gizmo.mode())),
        };
        match self.backend.render(&frame) {
            Ok(()) => true,
            Err(err) => {
                log::error!("3D frame skipped: {err}");
                false
            }
        }
    }

    /// Generate textures used by meshes in the scene that are still missing.
    fn prepare_textures(&mut self) {
        let needed: HashSet<_> = self
            .graph
            .meshes()
            .filter_map(|(_, node)| match node.content {
                NodeContent::Mesh { material, .. } => material.params(&self.settings).texture,
                _ => None,
            })
            .collect();
        for kind in needed {
            if self.textures.peek(kind).is_none() {
                self.textures.get(kind);
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.camera.set_viewport(width, height);
        self.backend.resize(width, height);
    }

    /// Switch render settings. Any change tears the view down and rebuilds it.
    /// Returns whether a rebuild happened.
    pub fn apply_settings(&mut self, settings: RenderSettings) -> Scene3dResult<bool> {
        if settings == self.settings {
            return Ok(false);
        }
        log::info!("Render settings changed, reinitializing 3D view");
        self.teardown();
        self.settings = settings;
        self.pipeline = RenderPipeline::from_settings(&settings);
        self.textures.set_resolution(settings.texture_resolution);
        self.grid = create_grid(&mut self.graph);
        self.sync.invalidate();
        self.backend
            .initialize(&self.pipeline, self.size.0, self.size.1)?;
        Ok(true)
    }

    fn teardown(&mut self) {
        self.gizmo.detach();
        self.outline.hide();
        self.controls.enabled = true;
        self.registry.clear();
        self.graph.clear();
        self.backend.dispose();
    }

    /// Material of every visible content mesh, for inspection.
    pub fn materials(&self) -> Vec<MaterialKind> {
        self.graph
            .meshes()
            .filter(|(id, node)| {
                node.role == NodeRole::Content && self.graph.is_effectively_visible(*id)
            })
            .filter_map(|(_, node)| match node.content {
                NodeContent::Mesh { material, .. } => Some(material),
                _ => None,
            })
            .collect()
    }
}

impl Drop for Viewport3d {
    fn drop(&mut self) {
        self.teardown();
        log::debug!("3D view disposed");
    }
}
