//! Keyboard shortcut registry and documentation.

use floorplan_core::{KeyEvent, Modifiers};

/// What a shortcut does once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Delete,
    Cancel,
    ToggleGrid,
    ToggleSnap,
    ToggleViewMode,
    GizmoTranslate,
    GizmoRotate,
    GizmoScale,
    Export,
}

impl ShortcutAction {
    /// Whether the action only applies in the 3D view.
    pub fn is_model_only(self) -> bool {
        matches!(
            self,
            ShortcutAction::GizmoTranslate | ShortcutAction::GizmoRotate | ShortcutAction::GizmoScale
        )
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+E").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Case-insensitive key match with exact Ctrl/Shift state. Cmd counts as Ctrl.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("E", true, false, Export, "Export plan to PNG"),
            Shortcut::new("Delete", false, false, Delete, "Delete selected element"),
            Shortcut::new("Backspace", false, false, Delete, "Delete selected element"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel drag and clear selection"),
            Shortcut::new("G", false, false, ToggleGrid, "Toggle grid"),
            Shortcut::new("G", false, true, ToggleSnap, "Toggle snapping"),
            Shortcut::new("Tab", false, false, ToggleViewMode, "Switch between 2D and 3D"),
            Shortcut::new("T", false, false, GizmoTranslate, "Gizmo: move (3D)"),
            Shortcut::new("R", false, false, GizmoRotate, "Gizmo: rotate (3D)"),
            Shortcut::new("S", false, false, GizmoScale, "Gizmo: scale (3D)"),
        ]
    }

    /// First shortcut bound to a key press.
    pub fn lookup(event: &KeyEvent) -> Option<ShortcutAction> {
        let KeyEvent::Pressed { key, modifiers } = event else {
            return None;
        };
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, *modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, modifiers: Modifiers) -> KeyEvent {
        KeyEvent::Pressed {
            key: key.to_string(),
            modifiers,
        }
    }

    #[test]
    fn test_format() {
        let redo = Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
        let grid = Shortcut::new("G", false, false, ShortcutAction::ToggleGrid, "Toggle grid");
        assert_eq!(grid.format(), "G");
    }

    #[test]
    fn test_lookup_respects_modifiers() {
        let shift_ctrl = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert_eq!(ShortcutRegistry::lookup(&press("z", Modifiers::CTRL)), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutRegistry::lookup(&press("Z", shift_ctrl)), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutRegistry::lookup(&press("z", Modifiers::NONE)), None);
        assert_eq!(ShortcutRegistry::lookup(&press("r", Modifiers::NONE)), Some(ShortcutAction::GizmoRotate));
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutRegistry::lookup(&press("e", meta)), Some(ShortcutAction::Export));
    }

    #[test]
    fn test_released_keys_ignored() {
        let event = KeyEvent::Released { key: "g".to_string() };
        assert_eq!(ShortcutRegistry::lookup(&event), None);
    }

    #[test]
    fn test_every_action_documented() {
        let all = ShortcutRegistry::all();
        assert!(all.iter().all(|s| !s.description.is_empty()));
        for action in [ShortcutAction::Undo, ShortcutAction::Export, ShortcutAction::GizmoScale] {
            assert!(all.iter().any(|s| s.action == action));
        }
    }
}
