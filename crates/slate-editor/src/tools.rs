//! Gesture state machine for canvas interactions.
//!
//! Exactly one [`Gesture`] is active at a time. The workspace starts a
//! gesture on pointer/touch down, feeds it moves, and drops back to
//! [`Gesture::Idle`] on release, which also resets the store's
//! [`InteractionMode`] and the cursor.
//!
//! ## Button behaviors
//!
//! | Target | Primary | Middle | Secondary |
//! |--------|---------|--------|-----------|
//! | **Background** | Box select | Pan | Pan |
//! | **Node surface** | Drag selection | Pan | — |
//! | **Resize handle** | Resize | Pan | — |
//! | **Interactive child** | Select only | Pan | — |

use kurbo::{Point, Rect, Size, Vec2};
use slate_core::id::NodeId;
use slate_core::model::{InteractionMode, ResizeMode};
use slate_core::store::Store;
use slate_render::surface::Surface;
use smallvec::SmallVec;

use crate::viewport::PinchState;

/// The active gesture and everything it captured at its start.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    BoxSelecting {
        start: Point,
        current: Point,
    },
    Pinching(PinchState),
    DraggingNodes {
        last: Point,
        ids: SmallVec<[NodeId; 4]>,
        moved: bool,
    },
    Resizing(ResizeState),
}

impl Gesture {
    pub fn mode(&self) -> InteractionMode {
        match self {
            Gesture::Idle => InteractionMode::Idle,
            Gesture::Panning { .. } => InteractionMode::Panning,
            Gesture::BoxSelecting { .. } => InteractionMode::BoxSelecting,
            Gesture::Pinching(_) => InteractionMode::Pinching,
            Gesture::DraggingNodes { .. } => InteractionMode::Dragging,
            Gesture::Resizing(_) => InteractionMode::Resizing,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Screen-space marquee while box selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Gesture::BoxSelecting { start, current } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }
}

// ─── Drag ────────────────────────────────────────────────────────────────

/// Move every listed node by a screen delta. The world delta is the screen
/// delta divided by the current scale, identical for all nodes.
pub fn drag_nodes(store: &mut Store, ids: &[NodeId], screen_delta: Vec2) -> usize {
    if screen_delta == Vec2::ZERO {
        return 0;
    }
    let delta = store.view().screen_delta_to_world(screen_delta);
    store.move_nodes(ids, delta)
}

// ─── Resize ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    pub id: NodeId,
    /// Pointer position at mousedown (screen).
    pub start: Point,
    pub start_size: Size,
    /// width / height at the start.
    pub aspect: f64,
    pub mode: ResizeMode,
}

impl ResizeState {
    /// Capture the starting size of a resizable node. Uses the stored size,
    /// or the rendered size converted to world units if none is stored yet.
    pub fn begin<S: Surface + ?Sized>(
        store: &Store,
        surface: &S,
        id: NodeId,
        start: Point,
    ) -> Option<Self> {
        let node = store.node(id)?;
        let mode = node.kind.resize_mode()?;
        let start_size = node.size().or_else(|| {
            surface
                .rendered_size(id)
                .map(|s| Size::new(s.width / store.scale(), s.height / store.scale()))
        })?;
        if start_size.width <= 0.0 || start_size.height <= 0.0 {
            return None;
        }
        Some(Self {
            id,
            start,
            start_size,
            aspect: start_size.width / start_size.height,
            mode,
        })
    }

    /// Size for the current pointer position. Only horizontal motion
    /// drives the resize.
    pub fn size_at(&self, pointer: Point, scale: f64, min_width: f64) -> Size {
        let dx = (pointer.x - self.start.x) / scale;
        let width = (self.start_size.width + dx).max(min_width);
        let height = match self.mode {
            ResizeMode::AspectLocked => width / self.aspect,
            ResizeMode::Free => self.start_size.height,
        };
        Size::new(width, height)
    }

    pub fn apply(&self, store: &mut Store, pointer: Point) -> bool {
        let size = self.size_at(pointer, store.scale(), store.config().min_node_width);
        store.update_node(self.id, |n| n.set_size(size))
    }
}
