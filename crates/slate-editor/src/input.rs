//! Input abstraction layer.
//!
//! Normalizes mouse, wheel, touch, and keyboard events into a unified
//! `InputEvent` consumed by the workspace. Positions are screen pixels
//! relative to the canvas container's top-left corner; the host subtracts
//! the container's bounding box before building events.

use kurbo::Point;
use slate_render::target::PointerTarget;
use smallvec::SmallVec;

/// Modifier key state at the time of an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on Linux/Windows, ⌘ on macOS.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map `MouseEvent.button`.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Active touch points, container-relative.
pub type Touches = SmallVec<[Point; 2]>;

/// A normalized input event.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
        target: PointerTarget,
    },

    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f64,
        y: f64,
    },

    DoubleClick {
        x: f64,
        y: f64,
        target: PointerTarget,
    },

    /// Wheel or trackpad scroll. `dx`/`dy` follow `WheelEvent.deltaX/Y`
    /// in pixels (positive `dy` scrolls down / zooms out).
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
        target: PointerTarget,
    },

    TouchStart {
        touches: Touches,
        target: PointerTarget,
    },

    TouchMove {
        touches: Touches,
    },

    /// Touches still down after the change.
    TouchEnd {
        touches: Touches,
    },

    /// `key` is the `KeyboardEvent.key` value. `editing` is set when focus
    /// sits in a text-editing control (input, textarea, math field).
    Key {
        key: String,
        modifiers: Modifiers,
        editing: bool,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            target,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
            editing: false,
        }
    }
}
