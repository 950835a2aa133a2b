//! Selection and box-select engine.
//!
//! Group operations snapshot the affected ids first and mutate after, so a
//! node vanishing mid-operation only shortens the list.

use kurbo::Rect;
use slate_core::id::NodeId;
use slate_core::model::Node;
use slate_core::store::Store;
use slate_render::hit::hit_test_rect;
use slate_render::surface::Surface;

/// Click-style selection.
///
/// `None` clears (unless `add`); `Some(id)` selects only `id`, or adds it
/// when `add` is set. A selected node is raised to the next z value.
/// Unknown ids are ignored. Returns whether the store changed.
pub fn select_node(store: &mut Store, id: Option<NodeId>, add: bool) -> bool {
    let Some(id) = id else {
        if add {
            return false;
        }
        return store.update_selection(|s| {
            s.clear();
        });
    };
    if !store.contains(id) {
        log::trace!("select on missing node {id} ignored");
        return false;
    }
    store.batch(|s| {
        s.update_selection(|sel| {
            if add {
                sel.insert(id);
            } else {
                sel.select_only(id);
            }
        });
        s.bring_to_front(id)
    })
}

/// Replace the selection with every rendered node overlapping the screen
/// rectangle. Returns the new selection.
pub fn box_select<S: Surface + ?Sized>(
    store: &mut Store,
    surface: &S,
    screen_rect: Rect,
) -> Vec<NodeId> {
    let view = store.view();
    let world = view.screen_rect_to_world(screen_rect.abs());
    let hits = hit_test_rect(store.nodes(), surface, view.scale, world);
    log::debug!("box select {:?} hit {} node(s)", world, hits.len());
    store.update_selection(|s| s.replace_with(hits.iter().copied()));
    hits
}

pub fn select_all(store: &mut Store) -> bool {
    let ids: Vec<NodeId> = store.nodes().iter().map(|n| n.id).collect();
    store.update_selection(|s| s.replace_with(ids))
}

/// Remove every selected node. Returns how many were removed.
pub fn delete_selected(store: &mut Store) -> usize {
    let ids = store.selected_ids();
    if ids.is_empty() {
        return 0;
    }
    let removed = store.remove_nodes(&ids);
    log::debug!("deleted {removed} node(s)");
    removed
}

/// Copy every selected node with a fresh id, shifted by the configured
/// offset and stacked on top. The copies become the selection.
pub fn duplicate_selected(store: &mut Store) -> Vec<NodeId> {
    let originals: Vec<Node> = store
        .selected_ids()
        .into_iter()
        .filter_map(|id| store.node(id).cloned())
        .collect();
    if originals.is_empty() {
        return Vec::new();
    }
    let offset = store.config().duplicate_offset;
    store.batch(|s| {
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let mut copy = original;
            copy.id = NodeId::with_prefix(copy.kind.id_prefix());
            copy.x += offset.x;
            copy.y += offset.y;
            copy.z_index = s.next_z();
            if s.insert_node(copy.clone()) {
                copies.push(copy.id);
            }
        }
        s.update_selection(|sel| sel.replace_with(copies.iter().copied()));
        copies
    })
}
