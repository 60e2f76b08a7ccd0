//! Pointer state machine turning raw input into model and view mutations.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ElementProps};
use crate::hit_test::{HitRadii, hit_test};
use crate::history::Snapshot;
use crate::input::{MouseButton, PointerEvent};
use crate::layer::LayerSet;
use crate::snap::snap;
use crate::tools::{DrawShape, ElementTool, ToolKind};
use crate::view_state::{ViewPatch, ViewState};
use kurbo::Point;

/// Read-only inputs the controller needs for one event.
#[derive(Debug, Clone, Copy)]
pub struct ControllerContext<'a> {
    pub elements: &'a [Element],
    pub layers: &'a LayerSet,
    pub view: &'a ViewState,
    pub config: &'a EditorConfig,
}

/// What the controller asks its owner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerAction {
    /// Push this element collection as a new snapshot.
    Commit(Snapshot),
    PatchView(ViewPatch),
    /// Replace the global selection.
    Select(Option<ElementId>),
}

/// Current interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        /// Last pointer position in screen space.
        last: Point,
    },
    Drawing {
        tool: ElementTool,
        /// World-space start, snapped when snapping is on.
        start: Point,
        current: Point,
    },
    /// A placement was committed on press; waiting for the release.
    PlacingPoint,
}

/// Live preview of a drag tool, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub start: Point,
    pub current: Point,
    pub shape: DrawShape,
}

/// Per-view pointer state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// A drag is in progress; tool changes must wait.
    pub fn is_busy(&self) -> bool {
        self.state != InteractionState::Idle
    }

    /// Drop any in-progress interaction without committing.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    pub fn preview(&self) -> Option<DragPreview> {
        match &self.state {
            InteractionState::Drawing {
                tool,
                start,
                current,
            } => Some(DragPreview {
                start: *start,
                current: *current,
                shape: tool.shape,
            }),
            _ => None,
        }
    }

    /// Feed one pointer event through the state machine.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        ctx: &ControllerContext<'_>,
    ) -> Vec<ControllerAction> {
        match *event {
            PointerEvent::Down { position, button } => self.press(position, button, ctx),
            PointerEvent::Move { position } => self.motion(position, ctx),
            PointerEvent::Up { position, button } => self.release(Some((position, button)), ctx),
            PointerEvent::Leave => self.release(None, ctx),
            PointerEvent::Scroll { position, delta } => {
                let camera = &ctx.view.camera;
                let zoom = (camera.zoom - delta.y * ctx.config.wheel_zoom_step)
                    .clamp(ctx.config.min_zoom, ctx.config.max_zoom);
                vec![ControllerAction::PatchView(ViewPatch::ZoomAt {
                    screen: position,
                    zoom,
                })]
            }
        }
    }

    fn to_world(position: Point, ctx: &ControllerContext<'_>) -> Point {
        ctx.view.camera.screen_to_world(position)
    }

    fn snapped(position: Point, ctx: &ControllerContext<'_>) -> Point {
        snap(
            Self::to_world(position, ctx),
            ctx.config.grid_size,
            ctx.view.snap_enabled,
        )
    }

    fn press(
        &mut self,
        position: Point,
        button: MouseButton,
        ctx: &ControllerContext<'_>,
    ) -> Vec<ControllerAction> {
        if self.is_busy() {
            return Vec::new();
        }
        let tool = &ctx.view.active_tool;
        if button == MouseButton::Middle || *tool == ToolKind::Pan {
            self.state = InteractionState::Panning { last: position };
            return Vec::new();
        }
        if button != MouseButton::Left {
            return Vec::new();
        }

        match tool {
            ToolKind::Pan => Vec::new(),
            ToolKind::ZoomIn | ToolKind::ZoomOut => {
                let factor = if *tool == ToolKind::ZoomIn {
                    ctx.config.zoom_tool_factor
                } else {
                    1.0 / ctx.config.zoom_tool_factor
                };
                let zoom = (ctx.view.camera.zoom * factor)
                    .clamp(ctx.config.min_zoom, ctx.config.max_zoom);
                vec![ControllerAction::PatchView(ViewPatch::ZoomAt {
                    screen: position,
                    zoom,
                })]
            }
            ToolKind::Select => {
                let world = Self::to_world(position, ctx);
                let radii = HitRadii {
                    line: ctx.config.line_hit_radius,
                    point: ctx.config.point_hit_radius,
                };
                let visible = ctx
                    .elements
                    .iter()
                    .filter(|e| ctx.layers.is_visible(&e.layer_id));
                vec![ControllerAction::Select(hit_test(world, visible, radii))]
            }
            ToolKind::Draw(element_tool) => {
                if ctx.layers.is_locked(ctx.layers.active()) {
                    log::debug!("Drawing ignored: active layer is locked");
                    return Vec::new();
                }
                let start = Self::snapped(position, ctx);
                self.state = InteractionState::Drawing {
                    tool: element_tool.clone(),
                    start,
                    current: start,
                };
                Vec::new()
            }
            ToolKind::Place(element_tool) => {
                if ctx.layers.is_locked(ctx.layers.active()) {
                    log::debug!("Placement ignored: active layer is locked");
                    return Vec::new();
                }
                let world = Self::to_world(position, ctx);
                let element = Self::placed_element(element_tool, world, ctx);
                self.state = InteractionState::PlacingPoint;
                let mut next = ctx.elements.to_vec();
                next.push(element);
                vec![ControllerAction::Commit(next)]
            }
        }
    }

    fn motion(&mut self, position: Point, ctx: &ControllerContext<'_>) -> Vec<ControllerAction> {
        let snapped = Self::snapped(position, ctx);
        match &mut self.state {
            InteractionState::Panning { last } => {
                let delta = position - *last;
                *last = position;
                vec![ControllerAction::PatchView(ViewPatch::PanBy(delta))]
            }
            InteractionState::Drawing { current, .. } => {
                *current = snapped;
                Vec::new()
            }
            InteractionState::Idle | InteractionState::PlacingPoint => Vec::new(),
        }
    }

    /// End the active interaction. `None` is a pointer leave.
    ///
    /// Drawing and placement belong to the left button; other releases
    /// leave them running. Panning ends on any release.
    fn release(
        &mut self,
        up: Option<(Point, MouseButton)>,
        ctx: &ControllerContext<'_>,
    ) -> Vec<ControllerAction> {
        let left_owned = matches!(
            self.state,
            InteractionState::Drawing { .. } | InteractionState::PlacingPoint
        );
        if left_owned && up.is_some_and(|(_, button)| button != MouseButton::Left) {
            return Vec::new();
        }
        let state = std::mem::take(&mut self.state);
        let InteractionState::Drawing {
            tool,
            start,
            mut current,
        } = state
        else {
            return Vec::new();
        };
        if let Some((position, _)) = up {
            current = Self::snapped(position, ctx);
        }
        if start.distance(current) <= ctx.config.drag_threshold {
            log::debug!("Drag below threshold discarded");
            return Vec::new();
        }
        let element = Self::drawn_element(&tool, start, current, ctx);
        let mut next = ctx.elements.to_vec();
        next.push(element);
        vec![ControllerAction::Commit(next)]
    }

    fn drawn_element(
        tool: &ElementTool,
        start: Point,
        end: Point,
        ctx: &ControllerContext<'_>,
    ) -> Element {
        let mut props = ElementProps::default();
        match tool.kind {
            ElementKind::Wall => props.width = Some(ctx.config.default_wall_thickness),
            ElementKind::Room => props.label = Some(tool.subtype.clone()),
            _ => {}
        }
        Element::path(
            tool.kind,
            tool.subtype.clone(),
            vec![start, end],
            ctx.layers.active().clone(),
        )
        .with_props(props)
    }

    fn placed_element(tool: &ElementTool, at: Point, ctx: &ControllerContext<'_>) -> Element {
        let size = ctx.config.default_place_size;
        let props = ElementProps {
            width: Some(size),
            height: Some(size),
            color: Some(ctx.config.default_place_color),
            label: Some(ToolKind::Place(tool.clone()).id()),
            ..ElementProps::default()
        };
        Element::anchored(tool.kind, tool.subtype.clone(), at, 0.0, ctx.layers.active().clone())
            .with_props(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerPatch;
    use kurbo::Vec2;

    struct Fixture {
        elements: Vec<Element>,
        layers: LayerSet,
        view: ViewState,
        config: EditorConfig,
    }

    impl Fixture {
        fn with_tool(id: &str) -> Self {
            let mut view = ViewState::default();
            view.active_tool = ToolKind::from_id(id).unwrap();
            Self {
                elements: Vec::new(),
                layers: LayerSet::new(),
                view,
                config: EditorConfig::default(),
            }
        }

        fn ctx(&self) -> ControllerContext<'_> {
            ControllerContext {
                elements: &self.elements,
                layers: &self.layers,
                view: &self.view,
                config: &self.config,
            }
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn committed(actions: &[ControllerAction]) -> Option<&Snapshot> {
        actions.iter().find_map(|a| match a {
            ControllerAction::Commit(next) => Some(next),
            _ => None,
        })
    }

    #[test]
    fn test_draw_wall_commits_on_release() {
        let fx = Fixture::with_tool("wall_rcc");
        let mut controller = InteractionController::new();
        assert!(controller.handle_pointer(&down(0.0, 0.0), &fx.ctx()).is_empty());
        controller.handle_pointer(&moved(100.0, 0.0), &fx.ctx());
        let preview = controller.preview().unwrap();
        assert_eq!(preview.current, Point::new(100.0, 0.0));
        assert_eq!(preview.shape, DrawShape::Segment);

        let actions = controller.handle_pointer(&up(100.0, 0.0), &fx.ctx());
        let next = committed(&actions).unwrap();
        assert_eq!(next.len(), 1);
        let wall = &next[0];
        assert_eq!(wall.kind(), ElementKind::Wall);
        assert_eq!(wall.points(), &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert_eq!(wall.props.width, Some(12.0));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_short_drag_is_discarded() {
        let mut fx = Fixture::with_tool("line");
        fx.view.snap_enabled = false;
        let mut controller = InteractionController::new();
        controller.handle_pointer(&down(10.0, 10.0), &fx.ctx());
        controller.handle_pointer(&moved(14.0, 13.0), &fx.ctx());
        // Distance 5 is not above the threshold.
        assert!(controller.handle_pointer(&up(14.0, 13.0), &fx.ctx()).is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_drawing_snaps_to_half_grid() {
        let fx = Fixture::with_tool("wall_brick");
        let mut controller = InteractionController::new();
        controller.handle_pointer(&down(3.0, 4.0), &fx.ctx());
        controller.handle_pointer(&moved(61.0, 2.0), &fx.ctx());
        let preview = controller.preview().unwrap();
        assert_eq!(preview.start, Point::ZERO);
        assert_eq!(preview.current, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_room_gets_label() {
        let fx = Fixture::with_tool("room_living");
        let mut controller = InteractionController::new();
        controller.handle_pointer(&down(0.0, 0.0), &fx.ctx());
        let actions = controller.handle_pointer(&up(200.0, 150.0), &fx.ctx());
        let room = &committed(&actions).unwrap()[0];
        assert_eq!(room.props.label.as_deref(), Some("living"));
        assert_eq!(room.points(), &[Point::ZERO, Point::new(200.0, 150.0)]);
    }

    #[test]
    fn test_placement_commits_on_press() {
        let fx = Fixture::with_tool("furn_sofa_l");
        let mut controller = InteractionController::new();
        let actions = controller.handle_pointer(&down(33.0, 47.0), &fx.ctx());
        let sofa = &committed(&actions).unwrap()[0];
        assert_eq!(sofa.anchor(), Some(Point::new(33.0, 47.0)));
        assert_eq!(sofa.props.width, Some(40.0));
        assert_eq!(sofa.props.height, Some(40.0));
        assert_eq!(sofa.props.label.as_deref(), Some("furn_sofa_l"));
        assert_eq!(sofa.props.color.map(|c| c.to_string()).as_deref(), Some("#6366f1"));
        assert_eq!(controller.state(), &InteractionState::PlacingPoint);
        assert!(controller.handle_pointer(&up(33.0, 47.0), &fx.ctx()).is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_locked_active_layer_blocks_creation() {
        let mut fx = Fixture::with_tool("furn_bed_king");
        let _ = fx.layers.update(&crate::layer::LayerId::default_layer(), LayerPatch::locked(true));
        let mut controller = InteractionController::new();
        assert!(controller.handle_pointer(&down(0.0, 0.0), &fx.ctx()).is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_select_hit_and_miss() {
        let mut fx = Fixture::with_tool("select");
        let chair = Element::anchored(
            ElementKind::Furniture,
            "chair",
            Point::new(100.0, 100.0),
            0.0,
            crate::layer::LayerId::default_layer(),
        );
        let id = chair.id();
        fx.elements.push(chair);
        let mut controller = InteractionController::new();
        assert_eq!(
            controller.handle_pointer(&down(110.0, 100.0), &fx.ctx()),
            vec![ControllerAction::Select(Some(id))]
        );
        assert_eq!(
            controller.handle_pointer(&down(400.0, 400.0), &fx.ctx()),
            vec![ControllerAction::Select(None)]
        );
    }

    #[test]
    fn test_panning_applies_delta_continuously() {
        let fx = Fixture::with_tool("select");
        let mut controller = InteractionController::new();
        let press = PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Middle,
        };
        controller.handle_pointer(&press, &fx.ctx());
        assert_eq!(
            controller.handle_pointer(&moved(15.0, 7.0), &fx.ctx()),
            vec![ControllerAction::PatchView(ViewPatch::PanBy(Vec2::new(5.0, -3.0)))]
        );
        assert_eq!(
            controller.handle_pointer(&moved(16.0, 7.0), &fx.ctx()),
            vec![ControllerAction::PatchView(ViewPatch::PanBy(Vec2::new(1.0, 0.0)))]
        );
        controller.handle_pointer(&PointerEvent::Leave, &fx.ctx());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_other_button_release_keeps_drawing() {
        let fx = Fixture::with_tool("wall_rcc");
        let mut controller = InteractionController::new();
        controller.handle_pointer(&down(0.0, 0.0), &fx.ctx());
        controller.handle_pointer(&moved(100.0, 0.0), &fx.ctx());
        let middle_up = PointerEvent::Up {
            position: Point::new(50.0, 0.0),
            button: MouseButton::Middle,
        };
        assert!(controller.handle_pointer(&middle_up, &fx.ctx()).is_empty());
        assert!(controller.is_busy());
        assert_eq!(controller.preview().unwrap().current, Point::new(100.0, 0.0));

        let actions = controller.handle_pointer(&up(100.0, 0.0), &fx.ctx());
        let next = committed(&actions).unwrap();
        assert_eq!(next[0].points(), &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_leave_commits_like_release() {
        let fx = Fixture::with_tool("wall_rcc");
        let mut controller = InteractionController::new();
        controller.handle_pointer(&down(0.0, 0.0), &fx.ctx());
        controller.handle_pointer(&moved(100.0, 0.0), &fx.ctx());
        let actions = controller.handle_pointer(&PointerEvent::Leave, &fx.ctx());
        assert_eq!(committed(&actions).map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_wheel_zoom_is_clamped() {
        let fx = Fixture::with_tool("select");
        let mut controller = InteractionController::new();
        let actions = controller.handle_pointer(
            &PointerEvent::Scroll {
                position: Point::ZERO,
                delta: Vec2::new(0.0, 10_000.0),
            },
            &fx.ctx(),
        );
        assert_eq!(
            actions,
            vec![ControllerAction::PatchView(ViewPatch::ZoomAt {
                screen: Point::ZERO,
                zoom: 0.1
            })]
        );
    }
}
