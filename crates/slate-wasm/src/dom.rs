//! DOM rendering adapter.
//!
//! Node elements are created by the host's content renderers and carry
//! `data-node-id`; this surface only positions them, toggles state classes,
//! and measures them. Placements for nodes with no element yet are queued so
//! the host can mount them and ask for a repaint.

use slate_core::id::NodeId;
use slate_core::{Rect, Size};
use slate_render::surface::{Cursor, Placement, Surface};
use slate_render::target::{ElementInfo, NODE_ID_ATTR};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

pub const SELECTED_CLASS: &str = "selected";
pub const DRAGGING_CLASS: &str = "dragging";
pub const HIGHLIGHT_CLASS: &str = "search-match";

pub struct DomSurface {
    container: HtmlElement,
    world: HtmlElement,
    marquee: HtmlElement,
    missing: Vec<NodeId>,
}

impl DomSurface {
    pub fn new(container: HtmlElement, world: HtmlElement, marquee: HtmlElement) -> Self {
        set_style(&world, "transform-origin", "0 0");
        set_style(&marquee, "display", "none");
        Self {
            container,
            world,
            marquee,
            missing: Vec::new(),
        }
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Nodes placed since the last call that had no element to place.
    pub fn take_missing(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.missing)
    }

    /// Container-relative position of a client (viewport) coordinate.
    pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        (client_x - rect.left(), client_y - rect.top())
    }

    pub fn container_size(&self) -> Size {
        let rect = self.container.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn node_element(&self, id: NodeId) -> Option<HtmlElement> {
        let selector = format!("[{NODE_ID_ATTR}={}]", css_string(id.as_str()));
        self.world
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl Surface for DomSurface {
    fn rendered_size(&self, id: NodeId) -> Option<Size> {
        let rect = self.node_element(id)?.get_bounding_client_rect();
        Some(Size::new(rect.width(), rect.height()))
    }

    fn place_node(&mut self, id: NodeId, placement: &Placement) {
        let Some(el) = self.node_element(id) else {
            if !self.missing.contains(&id) {
                self.missing.push(id);
            }
            return;
        };
        set_style(&el, "left", &px(placement.x));
        set_style(&el, "top", &px(placement.y));
        match placement.width {
            Some(w) => set_style(&el, "width", &px(w)),
            None => remove_style(&el, "width"),
        }
        match placement.height {
            Some(h) => set_style(&el, "height", &px(h)),
            None => remove_style(&el, "height"),
        }
        set_style(&el, "z-index", &placement.z_index.to_string());

        let classes = el.class_list();
        for (class, on) in [
            (SELECTED_CLASS, placement.selected),
            (DRAGGING_CLASS, placement.dragging),
            (HIGHLIGHT_CLASS, placement.highlighted),
        ] {
            if classes.toggle_with_force(class, on).is_err() {
                log::warn!("failed to toggle class {class} on node {id}");
            }
        }
    }

    fn unmount_node(&mut self, id: NodeId) {
        if let Some(el) = self.node_element(id) {
            el.remove();
        }
        self.missing.retain(|m| *m != id);
    }

    fn set_world_transform(&mut self, css: &str) {
        set_style(&self.world, "transform", css);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        set_style(&self.container, "cursor", cursor.css());
    }

    fn set_marquee(&mut self, rect: Option<Rect>) {
        let Some(r) = rect else {
            set_style(&self.marquee, "display", "none");
            return;
        };
        set_style(&self.marquee, "display", "block");
        set_style(&self.marquee, "left", &px(r.x0));
        set_style(&self.marquee, "top", &px(r.y0));
        set_style(&self.marquee, "width", &px(r.width()));
        set_style(&self.marquee, "height", &px(r.height()));
    }
}

// ─── Element chains ──────────────────────────────────────────────────────

/// Describe `target` and its ancestors, innermost first, stopping before
/// `stop` (the canvas container).
pub fn element_chain(target: &Element, stop: Option<&Element>) -> Vec<ElementInfo> {
    let mut chain = Vec::new();
    let mut current = Some(target.clone());
    while let Some(el) = current {
        if stop.is_some_and(|s| *s == el) {
            break;
        }
        chain.push(describe(&el));
        current = el.parent_element();
    }
    chain
}

fn describe(el: &Element) -> ElementInfo {
    let mut info = ElementInfo::new(&el.tag_name());
    let classes = el.class_list();
    for i in 0..classes.length() {
        if let Some(class) = classes.item(i) {
            info = info.with_class(&class);
        }
    }
    if let Some(id) = el.get_attribute(NODE_ID_ATTR) {
        info = info.with_node_id(&id);
    }
    if el
        .get_attribute("contenteditable")
        .is_some_and(|v| v != "false")
    {
        info = info.editable();
    }
    info
}

// ─── Style helpers ───────────────────────────────────────────────────────

fn px(v: f64) -> String {
    format!("{v}px")
}

fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    if el.style().set_property(prop, value).is_err() {
        log::warn!("failed to set style {prop}: {value}");
    }
}

fn remove_style(el: &HtmlElement, prop: &str) {
    if el.style().remove_property(prop).is_err() {
        log::warn!("failed to remove style {prop}");
    }
}

/// Quote `value` as a CSS string so any id can sit inside a selector.
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
