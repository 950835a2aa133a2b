//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native tests resolve keys identically.
//!
//! While focus is inside a text-editing control only Escape resolves;
//! everything else, ⌘D included (forward-delete on macOS), belongs to the
//! control.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Delete,
    Duplicate,
    SelectAll,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    ZoomToFit,

    // ── UI ──
    /// Clear the selection and blur the focused control.
    Deselect,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::Delete => "delete",
            ShortcutAction::Duplicate => "duplicate",
            ShortcutAction::SelectAll => "select-all",
            ShortcutAction::ZoomIn => "zoom-in",
            ShortcutAction::ZoomOut => "zoom-out",
            ShortcutAction::ResetView => "reset-view",
            ShortcutAction::ZoomToFit => "zoom-to-fit",
            ShortcutAction::Deselect => "deselect",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"d"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers, editing: bool) -> Option<ShortcutAction> {
        let cmd = modifiers.cmd();

        if key == "Escape" {
            return Some(ShortcutAction::Deselect);
        }

        if editing {
            return None;
        }

        if cmd {
            return match key {
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" | "_" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        if modifiers.shift {
            // Shift+1 reports "!" on most layouts.
            return match key {
                "!" | "1" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            _ => None,
        }
    }
}
