//! Pointer-target classification.
//!
//! A mousedown inside a node either belongs to the canvas (drag the node),
//! to the node's resize handle, or to an embedded widget that handles its
//! own input (a text field, a formula cell, a spreadsheet grid). The surface
//! reports the element chain under the pointer, innermost first, stopping
//! at the canvas container; [`classify`] turns it into a [`PointerTarget`]
//! using a tag allow-list and a closed set of marker classes.

use slate_core::id::NodeId;

/// Attribute carrying the node id on each node's root element.
pub const NODE_ID_ATTR: &str = "data-node-id";

/// Class of the resize affordance on resizable nodes.
pub const RESIZE_HANDLE_CLASS: &str = "resize-handle";

/// Tags whose elements always take their own pointer input.
pub const INTERACTIVE_TAGS: &[&str] = &[
    "input",
    "textarea",
    "select",
    "button",
    "option",
    "a",
    "audio",
    "iframe",
    "math-field",
];

/// Marker classes meaning "this subtree handles its own mouse/keyboard".
pub const INTERACTIVE_MARKERS: &[&str] = &[
    "no-drag",
    "interactive",
    "mq-editable-field",
    "mq-root-block",
    "handsontable",
    "htCore",
    "cm-editor",
    "ql-editor",
    "table-cell",
    "graph-controls",
    "script-editor",
];

/// Tags that take keyboard text input.
pub const TEXT_EDITING_TAGS: &[&str] = &["input", "textarea", "math-field"];

/// What the surface knows about one element in the chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementInfo {
    /// Lower-case tag name.
    pub tag: String,
    pub classes: Vec<String>,
    /// Value of [`NODE_ID_ATTR`], on node root elements only.
    pub node_id: Option<String>,
    /// `contenteditable` is set and not `false`.
    pub editable: bool,
}

impl ElementInfo {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_node_id(mut self, id: &str) -> Self {
        self.node_id = Some(id.to_string());
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_interactive(&self) -> bool {
        self.editable
            || INTERACTIVE_TAGS.contains(&self.tag.as_str())
            || INTERACTIVE_MARKERS.iter().any(|m| self.has_class(m))
    }

    pub fn is_resize_handle(&self) -> bool {
        self.has_class(RESIZE_HANDLE_CLASS)
    }
}

/// Whether keyboard focus inside this chain (innermost first) is in a
/// text-editing control, so Delete and friends belong to the control.
pub fn is_text_editing(chain: &[ElementInfo]) -> bool {
    chain
        .iter()
        .any(|el| el.editable || TEXT_EDITING_TAGS.contains(&el.tag.as_str()))
}

/// Which part of a node was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePart {
    /// Plain node surface: drags the node.
    Surface,
    ResizeHandle,
    /// Embedded widget: the event belongs to the widget.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Background,
    Node { id: NodeId, part: NodePart },
    /// Could not be resolved (chrome inside the container, stale node id).
    /// Treated as a no-op.
    Unknown,
}

impl PointerTarget {
    pub fn node(id: NodeId) -> Self {
        Self::Node {
            id,
            part: NodePart::Surface,
        }
    }

    pub fn handle(id: NodeId) -> Self {
        Self::Node {
            id,
            part: NodePart::ResizeHandle,
        }
    }

    pub fn interactive(id: NodeId) -> Self {
        Self::Node {
            id,
            part: NodePart::Interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::Node {
                part: NodePart::Interactive,
                ..
            }
        )
    }
}

/// Classify an element chain (innermost first, container excluded).
pub fn classify(chain: &[ElementInfo]) -> PointerTarget {
    let mut interactive = false;
    let mut handle = false;

    for el in chain {
        interactive |= el.is_interactive();
        handle |= el.is_resize_handle();

        if let Some(raw) = &el.node_id {
            let Some(id) = NodeId::lookup(raw) else {
                log::trace!("pointer on unknown node id {raw:?}");
                return PointerTarget::Unknown;
            };
            let part = if interactive {
                NodePart::Interactive
            } else if handle {
                NodePart::ResizeHandle
            } else {
                NodePart::Surface
            };
            return PointerTarget::Node { id, part };
        }
    }

    if interactive || handle {
        PointerTarget::Unknown
    } else {
        PointerTarget::Background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node_root(id: &str) -> ElementInfo {
        NodeId::intern(id);
        ElementInfo::new("div")
            .with_class("canvas-node")
            .with_node_id(id)
    }

    #[test]
    fn empty_chain_is_background() {
        assert_eq!(classify(&[]), PointerTarget::Background);
        let world = ElementInfo::new("div").with_class("world-layer");
        assert_eq!(classify(&[world]), PointerTarget::Background);
    }

    #[test]
    fn node_body_is_surface() {
        let chain = [ElementInfo::new("span"), node_root("tgt_body")];
        assert_eq!(
            classify(&chain),
            PointerTarget::node(NodeId::intern("tgt_body"))
        );
    }

    #[test]
    fn input_inside_node_is_interactive() {
        let chain = [
            ElementInfo::new("INPUT"),
            ElementInfo::new("div"),
            node_root("tgt_input"),
        ];
        assert_eq!(
            classify(&chain),
            PointerTarget::interactive(NodeId::intern("tgt_input"))
        );
    }

    #[test]
    fn marker_on_ancestor_is_interactive() {
        let chain = [
            ElementInfo::new("span"),
            ElementInfo::new("div").with_class("mq-editable-field"),
            node_root("tgt_marker"),
        ];
        assert!(classify(&chain).is_interactive());
    }

    #[test]
    fn contenteditable_is_interactive() {
        let chain = [ElementInfo::new("div").editable(), node_root("tgt_edit")];
        assert!(classify(&chain).is_interactive());
    }

    #[test]
    fn resize_handle_detected() {
        let chain = [
            ElementInfo::new("div").with_class(RESIZE_HANDLE_CLASS),
            node_root("tgt_handle"),
        ];
        assert_eq!(
            classify(&chain),
            PointerTarget::handle(NodeId::intern("tgt_handle"))
        );
    }

    #[test]
    fn interactive_outside_nodes_is_unknown() {
        let chain = [ElementInfo::new("button"), ElementInfo::new("div")];
        assert_eq!(classify(&chain), PointerTarget::Unknown);
    }

    #[test]
    fn stale_node_id_is_unknown() {
        let chain = [ElementInfo::new("div").with_node_id("tgt_never_interned_zz")];
        assert_eq!(classify(&chain), PointerTarget::Unknown);
    }

    #[test]
    fn editing_focus() {
        assert!(is_text_editing(&[ElementInfo::new("TEXTAREA")]));
        assert!(is_text_editing(&[
            ElementInfo::new("span"),
            ElementInfo::new("div").editable(),
        ]));
        assert!(!is_text_editing(&[ElementInfo::new("button")]));
        assert!(!is_text_editing(&[]));
    }
}
