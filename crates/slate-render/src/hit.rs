//! Hit testing against rendered node sizes.
//!
//! Node sizes vary with content, so bounds come from the surface: a node's
//! world box is its position plus its rendered size divided by the scale.
//! Nodes that have no rendered element yet are skipped.

use kurbo::Rect;
use slate_core::id::NodeId;
use slate_core::model::Node;
use slate_core::transform::rects_overlap;

use crate::surface::Surface;

/// World-space bounding box of a rendered node.
pub fn world_bounds<S: Surface + ?Sized>(node: &Node, surface: &S, scale: f64) -> Option<Rect> {
    let size = surface.rendered_size(node.id)?;
    Some(Rect::new(
        node.x,
        node.y,
        node.x + size.width / scale,
        node.y + size.height / scale,
    ))
}

/// All rendered nodes whose world box overlaps `world_rect`, in list order.
/// Used for box selection.
pub fn hit_test_rect<S: Surface + ?Sized>(
    nodes: &[Node],
    surface: &S,
    scale: f64,
    world_rect: Rect,
) -> Vec<NodeId> {
    nodes
        .iter()
        .filter_map(|n| {
            let Some(b) = world_bounds(n, surface, scale) else {
                log::trace!("box select skipped unrendered node {}", n.id);
                return None;
            };
            rects_overlap(b, world_rect).then_some(n.id)
        })
        .collect()
}

/// Union of all node boxes, for zoom-to-fit. Falls back to the stored size
/// (or a point) for nodes without a rendered element.
pub fn content_bounds<S: Surface + ?Sized>(nodes: &[Node], surface: &S, scale: f64) -> Option<Rect> {
    nodes
        .iter()
        .map(|n| {
            world_bounds(n, surface, scale).unwrap_or_else(|| {
                let (w, h) = (n.width.unwrap_or(0.0), n.height.unwrap_or(0.0));
                Rect::new(n.x, n.y, n.x + w, n.y + h)
            })
        })
        .reduce(|a, b| a.union(b))
}
