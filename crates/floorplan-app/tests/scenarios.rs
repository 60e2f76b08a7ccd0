//! End-to-end editing scenarios across the session, the plan view and the 3D view.

use floorplan_app::{App, KeyOutcome};
use floorplan_core::{
    Edit, Element, ElementId, ElementKind, IgnoreReason, KeyEvent, LayerId, LayerPatch,
    MouseButton, PointerEvent, ToolKind, ViewMode,
};
use floorplan_scene3d::{GizmoDrag, NodeContent};
use kurbo::Point;

fn drag(app: &mut App, tool: &str, from: (f64, f64), to: (f64, f64)) -> ElementId {
    let _ = app.session_mut().set_tool(ToolKind::from_id(tool).unwrap());
    app.handle_pointer(&PointerEvent::Down {
        position: Point::new(from.0, from.1),
        button: MouseButton::Left,
    });
    app.handle_pointer(&PointerEvent::Move {
        position: Point::new(to.0, to.1),
    });
    app.handle_pointer(&PointerEvent::Up {
        position: Point::new(to.0, to.1),
        button: MouseButton::Left,
    });
    app.session().elements().last().unwrap().id()
}

fn element(app: &App, id: ElementId) -> &Element {
    app.session()
        .elements()
        .iter()
        .find(|e| e.id() == id)
        .unwrap()
}

#[test]
fn test_wall_in_both_views() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "wall_rcc", (0.0, 0.0), (100.0, 0.0));
    assert_eq!(app.session().elements().len(), 1);
    let wall = element(&app, id);
    assert_eq!(wall.kind(), ElementKind::Wall);
    assert_eq!(wall.points(), &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    assert_eq!(wall.props.width, Some(12.0));

    // Plan view: full-width body plus a narrower core.
    assert!(app.frame());
    let strokes = app.plan_scene().strokes_for(id);
    assert_eq!(strokes.len(), 2);
    assert!((strokes[0].0.width - 12.0).abs() < f64::EPSILON);
    assert!(strokes[1].0.width < strokes[0].0.width);

    // 3D view: one box spanning the wall, standing on the floor.
    app.set_view_mode(ViewMode::Model3d);
    let viewport = app.viewport();
    let node = viewport.registry().node_of(&id).unwrap();
    let graph = viewport.graph();
    let boxes: Vec<_> = graph
        .descendants(node)
        .into_iter()
        .filter(|n| matches!(graph.get(*n).map(|n| &n.content), Some(NodeContent::Mesh { .. })))
        .collect();
    assert_eq!(boxes.len(), 1);
    let mesh = graph.get(boxes[0]).unwrap();
    assert!(mesh.transform.yaw().abs() < 1e-5);
    let bounds = graph.world_bounds(node).unwrap();
    let center = bounds.center();
    assert!((center.x - 50.0).abs() < 1e-3);
    assert!((center.y - 60.0).abs() < 1e-3);
    assert!(center.z.abs() < 1e-3);
    assert!((bounds.size().x - 100.0).abs() < 1e-3);
}

#[test]
fn test_room_label_centered() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "room_living", (0.0, 0.0), (200.0, 150.0));
    let room = element(&app, id);
    assert_eq!(room.points(), &[Point::new(0.0, 0.0), Point::new(200.0, 150.0)]);

    assert!(app.frame());
    let texts = app.plan_scene().texts();
    let (label, position, _) = texts.iter().find(|(t, _, _)| *t == "LIVING").unwrap();
    assert_eq!(*label, "LIVING");
    assert!((position.x - 100.0).abs() < 1e-9);
    assert!((position.y - 75.0).abs() < 1e-9);
}

#[test]
fn test_hiding_layer_releases_3d_selection() {
    let mut app = App::new().unwrap();
    let layer = app.session_mut().add_layer();
    let _ = app.session_mut().set_active_layer(&layer);
    let id = drag(&mut app, "furn_sofa_321", (100.0, 100.0), (100.0, 100.0));
    assert_eq!(element(&app, id).layer_id, layer);

    app.session_mut().select(Some(id));
    app.set_view_mode(ViewMode::Model3d);
    assert!(app.viewport().gizmo().target().is_some());
    assert!(app.viewport().outline().is_visible());

    let _ = app.session_mut().update_layer(&layer, LayerPatch::visible(false));
    assert!(app.frame());
    let viewport = app.viewport();
    assert_eq!(viewport.gizmo().target(), None);
    assert!(!viewport.outline().is_visible());
    assert_eq!(viewport.registry().node_of(&id), None);
    assert!(app.session().document().contains(id));
}

#[test]
fn test_removing_layer_moves_elements_to_default() {
    let mut app = App::new().unwrap();
    let layer = app.session_mut().add_layer();
    let _ = app.session_mut().set_active_layer(&layer);
    let id = drag(&mut app, "furn_sofa_321", (50.0, 50.0), (50.0, 50.0));

    assert!(app.session_mut().remove_layer(&layer).is_applied());
    assert_eq!(element(&app, id).layer_id, LayerId::default());
    assert!(!app.session_mut().remove_layer(&LayerId::default()).is_applied());
    assert_eq!(app.session().layers().len(), 1);
}

#[test]
fn test_3d_pick_selects_in_plan() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "wall_rcc", (-200.0, 0.0), (200.0, 0.0));
    app.set_view_mode(ViewMode::Model3d);

    // The default camera looks at the origin from the screen center.
    let center = Point::new(640.0, 400.0);
    assert_eq!(app.pick(center), Some(id));
    assert_eq!(app.session().selection(), Some(id));
    assert!(element(&app, id).selected);
    assert!(app.viewport().gizmo().target().is_some());

    assert_eq!(app.pick(Point::new(5.0, 5.0)), None);
    assert_eq!(app.session().selection(), None);
}

#[test]
fn test_rotating_wall_in_3d_updates_plan() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "wall_rcc", (0.0, 0.0), (100.0, 0.0));
    app.session_mut().select(Some(id));
    app.set_view_mode(ViewMode::Model3d);
    assert_eq!(app.handle_key(&KeyEvent::pressed("r")), KeyOutcome::Handled);

    assert!(app.begin_gizmo_drag());
    assert!(app.drag_gizmo(GizmoDrag::Rotate(std::f32::consts::FRAC_PI_2)));
    assert!(app.end_gizmo_drag().is_applied());
    app.frame();

    // The wall turned a quarter about its midpoint.
    let points = element(&app, id).points();
    assert!(points[0].distance(Point::new(50.0, 50.0)) < 1e-4);
    assert!(points[1].distance(Point::new(50.0, -50.0)) < 1e-4);

    let viewport = app.viewport();
    let node = viewport.registry().node_of(&id).unwrap();
    assert_eq!(viewport.gizmo().target(), Some(node));
    let bounds = viewport.graph().world_bounds(node).unwrap();
    assert!((bounds.center() - glam::Vec3::new(50.0, 60.0, 0.0)).length() < 1e-3);
    assert!((bounds.size().z - 100.0).abs() < 1e-3);
    assert!((bounds.size().x - 12.0).abs() < 1e-3);
}

#[test]
fn test_scaling_wall_in_3d_is_not_kept() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "wall_rcc", (0.0, 0.0), (100.0, 0.0));
    app.session_mut().select(Some(id));
    app.set_view_mode(ViewMode::Model3d);
    assert_eq!(app.handle_key(&KeyEvent::pressed("s")), KeyOutcome::Handled);

    assert!(app.begin_gizmo_drag());
    assert!(app.drag_gizmo(GizmoDrag::Scale(glam::Vec3::new(3.0, 1.0, 1.0))));
    assert_eq!(app.end_gizmo_drag(), Edit::Ignored(IgnoreReason::Unchanged));
    app.frame();

    assert_eq!(element(&app, id).points(), &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let viewport = app.viewport();
    let node = viewport.registry().node_of(&id).unwrap();
    let bounds = viewport.graph().world_bounds(node).unwrap();
    assert!((bounds.size().x - 100.0).abs() < 1e-3);
    assert!((bounds.center() - glam::Vec3::new(50.0, 60.0, 0.0)).length() < 1e-3);
}

#[test]
fn test_undo_through_shortcuts_resyncs_3d() {
    let mut app = App::new().unwrap();
    let id = drag(&mut app, "wall_rcc", (0.0, 0.0), (100.0, 0.0));
    app.set_view_mode(ViewMode::Model3d);
    assert!(app.viewport().registry().node_of(&id).is_some());

    let undo = KeyEvent::Pressed {
        key: "z".to_string(),
        modifiers: floorplan_core::Modifiers::CTRL,
    };
    assert_eq!(app.handle_key(&undo), KeyOutcome::Handled);
    assert!(app.frame());
    assert!(app.session().elements().is_empty());
    assert!(app.viewport().registry().is_empty());
}

#[test]
fn test_export_png_named_after_project() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new().unwrap();
    drag(&mut app, "wall_rcc", (0.0, 0.0), (100.0, 0.0));
    assert_eq!(app.export_file_name(), "untitled_project.png");

    let path = dir.path().join(app.export_file_name());
    let written = app.export_png(Some(&path)).unwrap();
    let bytes = std::fs::read(&written).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
