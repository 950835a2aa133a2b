//! Store → surface painting.
//!
//! The [`Painter`] remembers what it last wrote and only pushes the
//! difference: the world transform when pan/scale changed, placements for
//! nodes whose position, size, stacking, or flags changed, unmounts for
//! nodes that disappeared. Call [`Painter::paint`] after every handled
//! event or animation frame.

use kurbo::Rect;
use slate_core::id::NodeId;
use slate_core::model::InteractionMode;
use slate_core::store::Store;
use std::collections::{HashMap, HashSet};

use crate::surface::{Cursor, Placement, Surface};

/// Counts of surface writes made by one paint pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub placed: usize,
    pub unmounted: usize,
    pub transform_changed: bool,
}

#[derive(Debug, Default)]
pub struct Painter {
    placed: HashMap<NodeId, Placement>,
    transform: Option<String>,
    cursor: Option<Cursor>,
    marquee: Option<Option<Rect>>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything written so far; the next paint rewrites it all.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub fn paint<S: Surface + ?Sized>(
        &mut self,
        store: &Store,
        marquee: Option<Rect>,
        surface: &mut S,
    ) -> PaintStats {
        let mut stats = PaintStats::default();

        let css = store.transform_css();
        if self.transform.as_deref() != Some(css.as_str()) {
            surface.set_world_transform(&css);
            self.transform = Some(css);
            stats.transform_changed = true;
        }

        let mode = store.mode();
        let cursor = Cursor::for_mode(mode);
        if self.cursor != Some(cursor) {
            surface.set_cursor(cursor);
            self.cursor = Some(cursor);
        }

        if self.marquee != Some(marquee) {
            surface.set_marquee(marquee);
            self.marquee = Some(marquee);
        }

        let highlighted = store.search_matches();
        let mut live = HashSet::with_capacity(store.nodes().len());
        for node in store.nodes() {
            live.insert(node.id);
            let selected = store.is_selected(node.id);
            let placement = Placement {
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                z_index: node.z_index,
                selected,
                dragging: selected && mode == InteractionMode::Dragging,
                highlighted: highlighted.contains(&node.id),
            };
            if self.placed.get(&node.id) != Some(&placement) {
                surface.place_node(node.id, &placement);
                self.placed.insert(node.id, placement);
                stats.placed += 1;
            }
        }

        let gone: Vec<NodeId> = self
            .placed
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in gone {
            surface.unmount_node(id);
            self.placed.remove(&id);
            stats.unmounted += 1;
        }

        if stats.placed > 0 || stats.unmounted > 0 {
            log::trace!(
                "paint: {} placed, {} unmounted",
                stats.placed,
                stats.unmounted
            );
        }
        stats
    }
}
