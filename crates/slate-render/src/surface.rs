//! The rendering-adapter boundary.
//!
//! Interaction logic never touches the DOM (or any other UI toolkit)
//! directly. It reads rendered sizes and writes placements through the
//! [`Surface`] trait; the browser bridge implements it over `web-sys`, and
//! [`MemorySurface`] implements it in memory for headless use and tests.

use kurbo::{Rect, Size};
use slate_core::id::NodeId;
use slate_core::model::InteractionMode;
use std::collections::HashMap;

/// Where and how one node should appear. Coordinates are world units; the
/// world layer's transform takes care of pan and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: u64,
    pub selected: bool,
    /// Transient flag while the node is part of a drag.
    pub dragging: bool,
    /// Matches the current search query.
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Grabbing,
    Move,
    Crosshair,
    EwResize,
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grabbing => "grabbing",
            Cursor::Move => "move",
            Cursor::Crosshair => "crosshair",
            Cursor::EwResize => "ew-resize",
        }
    }

    pub fn for_mode(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::Idle => Cursor::Default,
            InteractionMode::Panning | InteractionMode::Pinching => Cursor::Grabbing,
            InteractionMode::BoxSelecting => Cursor::Crosshair,
            InteractionMode::Dragging => Cursor::Move,
            InteractionMode::Resizing => Cursor::EwResize,
        }
    }
}

/// A UI surface that can show canvas nodes.
pub trait Surface {
    /// Size of the node's element on screen (pixels, after the world
    /// transform). `None` if the node has not been rendered yet.
    fn rendered_size(&self, id: NodeId) -> Option<Size>;

    fn place_node(&mut self, id: NodeId, placement: &Placement);

    /// The node left the canvas; drop its element.
    fn unmount_node(&mut self, id: NodeId);

    /// Apply the world layer transform (CSS transform syntax).
    fn set_world_transform(&mut self, css: &str);

    fn set_cursor(&mut self, cursor: Cursor);

    /// Show or hide the box-selection rectangle (screen space).
    fn set_marquee(&mut self, rect: Option<Rect>);
}

/// In-memory surface. Rendered sizes are seeded by the caller; every write
/// is recorded so callers can inspect what a real surface would show.
#[derive(Debug, Default)]
pub struct MemorySurface {
    rendered: HashMap<NodeId, Size>,
    pub placements: HashMap<NodeId, Placement>,
    pub transform: String,
    pub cursor: Cursor,
    pub marquee: Option<Rect>,
    /// Total `place_node` calls, for checking that repaints stay incremental.
    pub place_calls: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the node's element measures `size` screen pixels.
    pub fn set_rendered_size(&mut self, id: NodeId, size: Size) {
        self.rendered.insert(id, size);
    }

    pub fn placement(&self, id: NodeId) -> Option<&Placement> {
        self.placements.get(&id)
    }
}

impl Surface for MemorySurface {
    fn rendered_size(&self, id: NodeId) -> Option<Size> {
        self.rendered.get(&id).copied()
    }

    fn place_node(&mut self, id: NodeId, placement: &Placement) {
        self.place_calls += 1;
        self.placements.insert(id, *placement);
    }

    fn unmount_node(&mut self, id: NodeId) {
        self.placements.remove(&id);
        self.rendered.remove(&id);
    }

    fn set_world_transform(&mut self, css: &str) {
        self.transform = css.to_string();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_marquee(&mut self, rect: Option<Rect>) {
        self.marquee = rect;
    }
}
