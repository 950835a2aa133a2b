//! Node creation and the content-renderer registry.
//!
//! The core never looks inside a node's content. Hosts register one
//! [`ContentRenderer`] per [`NodeKind`]; the renderer builds the element
//! (whatever `E` is for that host), calls `on_select` when an embedded
//! control gains focus, and writes content/size back through the store.

use kurbo::Point;
use slate_core::id::NodeId;
use slate_core::model::{Node, NodeKind};
use slate_core::store::Store;
use std::collections::HashMap;
use std::rc::Rc;

/// Create a node of `kind` at a world position with a fresh id, the next
/// z value, default content, and a default size for resizable kinds.
pub fn create_node(store: &mut Store, kind: NodeKind, at: Point) -> NodeId {
    let id = NodeId::with_prefix(kind.id_prefix());
    let mut node = Node::new(id, kind, at.x, at.y);
    node.content = default_content(kind).to_string();
    if let Some(size) = store.config().default_size(kind) {
        node.set_size(size);
    }
    node.z_index = store.next_z();
    log::debug!("created {} node {id} at ({}, {})", kind.name(), at.x, at.y);
    store.insert_node(node);
    id
}

pub fn default_content(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::FunctionGraph => "y = x",
        NodeKind::Script => "// script\n",
        NodeKind::Table | NodeKind::Spreadsheet => "[]",
        _ => "",
    }
}

/// Called by a renderer when the user focuses something inside its node.
pub type SelectCallback = Rc<dyn Fn(NodeId)>;

pub trait ContentRenderer<E> {
    fn render(&self, node: &Node, on_select: SelectCallback) -> E;
}

impl<E, F> ContentRenderer<E> for F
where
    F: Fn(&Node, SelectCallback) -> E,
{
    fn render(&self, node: &Node, on_select: SelectCallback) -> E {
        self(node, on_select)
    }
}

pub struct RendererRegistry<E> {
    renderers: HashMap<NodeKind, Box<dyn ContentRenderer<E>>>,
}

impl<E> Default for RendererRegistry<E> {
    fn default() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }
}

impl<E> RendererRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the renderer for a kind.
    pub fn register(&mut self, kind: NodeKind, renderer: impl ContentRenderer<E> + 'static) {
        self.renderers.insert(kind, Box::new(renderer));
    }

    pub fn has(&self, kind: NodeKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Render a node. Kinds without a renderer are logged and skipped.
    pub fn render(&self, node: &Node, on_select: SelectCallback) -> Option<E> {
        let Some(renderer) = self.renderers.get(&node.kind) else {
            log::warn!("no renderer registered for {} node {}", node.kind.name(), node.id);
            return None;
        };
        Some(renderer.render(node, on_select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[test]
    fn created_nodes_get_fresh_ids_and_rising_z() {
        let mut store = Store::default();
        let a = create_node(&mut store, NodeKind::Math, Point::new(1.0, 2.0));
        let b = create_node(&mut store, NodeKind::Math, Point::ZERO);
        assert_ne!(a, b);
        assert!(store.node(b).unwrap().z_index > store.node(a).unwrap().z_index);
        assert_eq!(store.node(a).unwrap().position(), Point::new(1.0, 2.0));
        assert_eq!(store.node(a).unwrap().size(), None);
    }

    #[test]
    fn resizable_kinds_get_default_size() {
        let mut store = Store::default();
        let id = create_node(&mut store, NodeKind::Video, Point::ZERO);
        assert_eq!(store.node(id).unwrap().size(), Some(Size::new(480.0, 270.0)));
    }

    #[test]
    fn fresh_ids_skip_loaded_ones() {
        // Reserve whatever the generator would hand out next.
        let probe = NodeId::with_prefix("table");
        let n: u64 = probe.as_str()["table_".len()..].parse().unwrap();
        let taken = NodeId::intern(&format!("table_{}", n + 1));

        let mut store = Store::default();
        let id = create_node(&mut store, NodeKind::Table, Point::ZERO);
        assert_ne!(id, taken);
    }

    #[test]
    fn registry_dispatches_by_kind() {
        let mut registry: RendererRegistry<String> = RendererRegistry::new();
        registry.register(NodeKind::Math, |node: &Node, _: SelectCallback| {
            format!("<math-field>{}</math-field>", node.content)
        });
        assert!(registry.has(NodeKind::Math));
        assert!(!registry.has(NodeKind::Image));

        let mut node = Node::new(NodeId::intern("reg_math"), NodeKind::Math, 0.0, 0.0);
        node.content = "x".into();
        let noop: SelectCallback = Rc::new(|_| {});
        assert_eq!(
            registry.render(&node, noop.clone()).as_deref(),
            Some("<math-field>x</math-field>")
        );

        let img = Node::new(NodeId::intern("reg_img"), NodeKind::Image, 0.0, 0.0);
        assert_eq!(registry.render(&img, noop), None);
    }

    #[test]
    fn renderer_can_report_focus() {
        let focused = Rc::new(RefCell::new(None));
        let sink = focused.clone();
        let on_select: SelectCallback = Rc::new(move |id| *sink.borrow_mut() = Some(id));

        let mut registry: RendererRegistry<()> = RendererRegistry::new();
        registry.register(NodeKind::RichText, |node: &Node, cb: SelectCallback| cb(node.id));
        let node = Node::new(NodeId::intern("reg_text"), NodeKind::RichText, 0.0, 0.0);
        registry.render(&node, on_select);
        assert_eq!(*focused.borrow(), Some(node.id));
    }
}
