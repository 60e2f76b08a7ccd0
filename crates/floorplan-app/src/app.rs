//! Application shell wiring one editing session to both views.

use crate::advice::AdviceClient;
use crate::config::AppConfig;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use floorplan_core::{
    Edit, EditOrigin, IgnoreReason, KeyEvent, MouseButton, PointerEvent, RenderSettings, Session,
    ViewMode, ViewPatch,
};
use floorplan_render::{ExportError, PlanRenderer, RenderContext, Renderer, Scene2d, file_name_for, write_png};
use floorplan_scene3d::{
    GizmoDrag, HeadlessBackend, ReconcileStats, Scene3dError, SceneBackend, SyncInput, Viewport3d,
};
use glam::Vec2;
use kurbo::{Point, Size};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("3D view: {0}")]
    Scene(#[from] Scene3dError),
    #[error("export: {0}")]
    Export(#[from] ExportError),
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// The host should pick a path and call [`App::export_png`].
    ExportRequested,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    session: Session,
    plan: PlanRenderer,
    viewport: Viewport3d,
    advice: AdviceClient,
    /// Press position and last position of a left drag in the 3D view.
    orbit: Option<(Point, Point)>,
    plan_dirty: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("title", &self.config.title)
            .field("view_mode", &self.session.view().view_mode)
            .field("elements", &self.session.elements().len())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an application with the default configuration and a headless 3D backend.
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Result<Self, AppError> {
        Self::with_backend(config, Box::new(HeadlessBackend::new()))
    }

    /// Create an application drawing the 3D view through `backend`.
    pub fn with_backend(config: AppConfig, backend: Box<dyn SceneBackend>) -> Result<Self, AppError> {
        let mut session = Session::new(config.editor.clone());
        session.patch_view(ViewPatch::SetRenderSettings(config.render_settings));
        let viewport = Viewport3d::new(config.render_settings, backend, config.width, config.height)?;
        log::info!("{} ready ({}x{})", config.title, config.width, config.height);
        Ok(Self {
            config,
            session,
            plan: PlanRenderer::new(),
            viewport,
            advice: AdviceClient::default(),
            orbit: None,
            plan_dirty: true,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn viewport(&self) -> &Viewport3d {
        &self.viewport
    }

    /// The last plan frame.
    pub fn plan_scene(&self) -> &Scene2d {
        self.plan.scene()
    }

    pub fn advice(&self) -> &AdviceClient {
        &self.advice
    }

    pub fn set_advice(&mut self, advice: AdviceClient) {
        self.advice = advice;
    }

    /// Ask the design assistant. Failures come back as placeholder replies.
    pub fn ask_advice(&mut self, prompt: &str) -> Option<String> {
        self.advice.send(prompt).map(str::to_string)
    }

    /// Route a pointer event to the active view.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match self.session.view().view_mode {
            ViewMode::Plan2d => self.session.handle_pointer(event),
            ViewMode::Model3d => self.handle_model_pointer(event),
        }
    }

    /// Left drags orbit; a left click without movement picks.
    fn handle_model_pointer(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.orbit = Some((position, position)),
            PointerEvent::Move { position } => {
                if let Some((start, last)) = self.orbit {
                    let delta = position - last;
                    self.viewport.orbit(delta.x as f32, delta.y as f32);
                    self.orbit = Some((start, position));
                }
            }
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => {
                if let Some((start, _)) = self.orbit.take() {
                    if start.distance(position) < self.session.config().drag_threshold {
                        self.pick(position);
                    }
                }
            }
            PointerEvent::Leave => self.orbit = None,
            PointerEvent::Scroll { delta, .. } => self.viewport.zoom(delta.y as f32),
            _ => {}
        }
    }

    /// Select the element under a 3D view position, or clear the selection.
    pub fn pick(&mut self, screen: Point) -> Option<floorplan_core::ElementId> {
        let picked = self
            .viewport
            .click(Vec2::new(screen.x as f32, screen.y as f32));
        self.session.select(picked);
        if let Err(e) = self.sync_model() {
            log::error!("3D sync failed: {}", e);
        }
        picked
    }

    /// Dispatch a key press through the shortcut registry.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let Some(action) = ShortcutRegistry::lookup(event) else {
            return KeyOutcome::Ignored;
        };
        let model = self.session.view().view_mode == ViewMode::Model3d;
        if action.is_model_only() && !model {
            return KeyOutcome::Ignored;
        }
        let handled = match action {
            ShortcutAction::Undo
            | ShortcutAction::Redo
            | ShortcutAction::Delete
            | ShortcutAction::Cancel => self.session.handle_key(event),
            ShortcutAction::ToggleGrid => {
                self.session.patch_view(ViewPatch::ToggleGrid);
                true
            }
            ShortcutAction::ToggleSnap => {
                self.session.patch_view(ViewPatch::ToggleSnap);
                true
            }
            ShortcutAction::ToggleViewMode => {
                let next = if model { ViewMode::Plan2d } else { ViewMode::Model3d };
                self.set_view_mode(next);
                true
            }
            ShortcutAction::GizmoTranslate => self.viewport.key('t'),
            ShortcutAction::GizmoRotate => self.viewport.key('r'),
            ShortcutAction::GizmoScale => self.viewport.key('s'),
            ShortcutAction::Export => return KeyOutcome::ExportRequested,
        };
        if handled {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.session.patch_view(ViewPatch::SetViewMode(mode));
        self.orbit = None;
        if mode == ViewMode::Model3d {
            if let Err(e) = self.sync_model() {
                log::error!("3D sync failed: {}", e);
            }
        }
    }

    pub fn set_render_settings(&mut self, settings: RenderSettings) {
        self.session.patch_view(ViewPatch::SetRenderSettings(settings));
    }

    pub fn begin_gizmo_drag(&mut self) -> bool {
        self.viewport.begin_gizmo_drag()
    }

    pub fn drag_gizmo(&mut self, drag: GizmoDrag) -> bool {
        self.viewport.drag_gizmo(drag)
    }

    /// Commit the gizmo drag back to the element model.
    ///
    /// Gizmo commits bypass layer locks like any other system edit.
    pub fn end_gizmo_drag(&mut self) -> Edit {
        let Some((id, patch)) = self.viewport.end_gizmo_drag(self.session.elements()) else {
            return Edit::Ignored(IgnoreReason::Unchanged);
        };
        let edit = self.session.update_element(id, patch, EditOrigin::System);
        if let Err(e) = self.sync_model() {
            log::error!("3D sync failed: {}", e);
        }
        edit
    }

    /// Reconcile the 3D scene with the session.
    pub fn sync_model(&mut self) -> Result<ReconcileStats, AppError> {
        let input = SyncInput {
            elements: self.session.elements(),
            layers: self.session.layers(),
            selection: self.session.selection(),
            revision: self.session.document().revision(),
            settings: &self.session.view().render_settings,
        };
        Ok(self.viewport.sync(&input)?)
    }

    fn build_plan(&mut self, width: u32, height: u32) {
        let ctx = RenderContext::new(
            self.session.elements(),
            self.session.layers(),
            self.session.view(),
            Size::new(f64::from(width), f64::from(height)),
        )
        .with_preview(self.session.preview())
        .with_background(self.config.background_color)
        .with_grid(self.config.grid_style)
        .with_grid_size(self.session.config().grid_size);
        self.plan.build_scene(&ctx);
    }

    /// Produce one frame of the active view. Returns whether anything was drawn.
    pub fn frame(&mut self) -> bool {
        let events = self.session.events_mut().drain();
        if !events.is_empty() {
            log::trace!("frame: {} pending editor events", events.len());
            self.plan_dirty = true;
        }
        match self.session.view().view_mode {
            ViewMode::Plan2d => {
                if !self.plan_dirty && !self.session.is_busy() {
                    return false;
                }
                self.build_plan(self.config.width, self.config.height);
                self.plan_dirty = false;
                true
            }
            ViewMode::Model3d => {
                if let Err(e) = self.sync_model() {
                    log::error!("3D sync failed: {}", e);
                    return false;
                }
                self.viewport.frame()
            }
        }
    }

    /// Default export path for the current project.
    pub fn export_file_name(&self) -> String {
        file_name_for(&self.session.view().project_name)
    }

    /// Render the plan at the configured size and write it as PNG.
    ///
    /// Without a path the file is named after the project.
    pub fn export_png(&mut self, path: Option<&Path>) -> Result<PathBuf, AppError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(self.export_file_name()),
        };
        self.build_plan(self.config.width, self.config.height);
        self.plan_dirty = false;
        write_png(self.plan.scene(), self.config.width, self.config.height, &path)?;
        Ok(path)
    }
}
