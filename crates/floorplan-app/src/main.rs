//! Main application entry point (headless).
//!
//! Sketches a small demo plan through the same pointer path a user would take
//! and exports it as PNG. The first argument overrides the output path.

use floorplan_app::{App, AppConfig, ShortcutRegistry};
use floorplan_core::{MouseButton, PointerEvent, ToolKind, ViewMode};
use kurbo::Point;
use std::path::PathBuf;
use std::process::ExitCode;

fn use_tool(app: &mut App, id: &str) {
    match ToolKind::from_id(id) {
        Some(tool) => {
            let _ = app.session_mut().set_tool(tool);
        }
        None => log::warn!("Unknown tool {}", id),
    }
}

fn drag(app: &mut App, tool: &str, from: (f64, f64), to: (f64, f64)) {
    use_tool(app, tool);
    let from = Point::new(from.0, from.1);
    let to = Point::new(to.0, to.1);
    app.handle_pointer(&PointerEvent::Down {
        position: from,
        button: MouseButton::Left,
    });
    app.handle_pointer(&PointerEvent::Move { position: to });
    app.handle_pointer(&PointerEvent::Up {
        position: to,
        button: MouseButton::Left,
    });
}

fn place(app: &mut App, tool: &str, at: (f64, f64)) {
    drag(app, tool, at, at);
}

fn sketch_demo(app: &mut App) {
    drag(app, "room_living", (200.0, 150.0), (700.0, 500.0));
    drag(app, "wall_rcc", (200.0, 150.0), (700.0, 150.0));
    drag(app, "wall_rcc", (700.0, 150.0), (700.0, 500.0));
    drag(app, "wall_brick", (700.0, 500.0), (200.0, 500.0));
    drag(app, "wall_glass", (200.0, 500.0), (200.0, 150.0));
    place(app, "door_single", (450.0, 500.0));
    place(app, "win_sliding", (700.0, 300.0));
    place(app, "furn_sofa_321", (320.0, 250.0));
    place(app, "furn_coffee_table", (320.0, 340.0));
    place(app, "furn_bed_king", (580.0, 300.0));
    place(app, "light_ceiling", (450.0, 320.0));
    use_tool(app, "select");
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting floor-plan editor");

    let mut app = match App::with_config(AppConfig::from_env()) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if log::log_enabled!(log::Level::Debug) {
        ShortcutRegistry::print_all();
    }

    sketch_demo(&mut app);
    log::info!("Demo plan has {} elements", app.session().elements().len());

    // Tick the 3D view once so the model is built and rendered headlessly.
    app.set_view_mode(ViewMode::Model3d);
    app.frame();
    app.set_view_mode(ViewMode::Plan2d);

    let path = std::env::args().nth(1).map(PathBuf::from);
    match app.export_png(path.as_deref()) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
