//! Canvas data model.
//!
//! A canvas is a flat list of [`Node`]s placed in world space. Stacking is
//! decided by `z_index` alone; there is no containment hierarchy. The core
//! never looks inside `content`; that belongs to the content renderers.

use crate::id::NodeId;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The closed set of content kinds a node can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Math,
    RichText,
    FunctionGraph,
    Image,
    Video,
    Table,
    Spreadsheet,
    Script,
    EnhancedMath,
}

/// How a resizable node derives its height while the width is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Height follows the aspect ratio captured at resize start.
    AspectLocked,
    /// Height is left alone; only width changes.
    Free,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Math,
        NodeKind::RichText,
        NodeKind::FunctionGraph,
        NodeKind::Image,
        NodeKind::Video,
        NodeKind::Table,
        NodeKind::Spreadsheet,
        NodeKind::Script,
        NodeKind::EnhancedMath,
    ];

    /// Stable name, identical to the serialized `type` tag.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Math => "math",
            NodeKind::RichText => "rich-text",
            NodeKind::FunctionGraph => "function-graph",
            NodeKind::Image => "image",
            NodeKind::Video => "video",
            NodeKind::Table => "table",
            NodeKind::Spreadsheet => "spreadsheet",
            NodeKind::Script => "script",
            NodeKind::EnhancedMath => "enhanced-math",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Prefix used for freshly generated ids (`image_4`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Math => "math",
            NodeKind::RichText => "text",
            NodeKind::FunctionGraph => "graph",
            NodeKind::Image => "image",
            NodeKind::Video => "video",
            NodeKind::Table => "table",
            NodeKind::Spreadsheet => "sheet",
            NodeKind::Script => "script",
            NodeKind::EnhancedMath => "emath",
        }
    }

    /// Only resizable kinds carry explicit width/height and a resize handle.
    pub fn resize_mode(self) -> Option<ResizeMode> {
        match self {
            NodeKind::Image | NodeKind::Video => Some(ResizeMode::AspectLocked),
            NodeKind::Script | NodeKind::EnhancedMath => Some(ResizeMode::Free),
            _ => None,
        }
    }

    pub fn is_resizable(self) -> bool {
        self.resize_mode().is_some()
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

/// One placed item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// World-space top-left corner.
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Opaque, kind-specific payload.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub z_index: u64,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, x: f64, y: f64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width: None,
            height: None,
            content: String::new(),
            z_index: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Explicit size, if both dimensions are set.
    pub fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            _ => None,
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = Some(size.width);
        self.height = Some(size.height);
    }
}

// ─── Selection ───────────────────────────────────────────────────────────

/// Ordered set of selected node ids plus a primary id.
///
/// The primary is the most recently selected id. Removing the primary
/// promotes the most recent remaining id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: SmallVec<[NodeId; 4]>,
    primary: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    /// Returns `true` if anything was selected before.
    pub fn clear(&mut self) -> bool {
        let was_empty = self.ids.is_empty();
        self.ids.clear();
        self.primary = None;
        !was_empty
    }

    pub fn select_only(&mut self, id: NodeId) {
        self.ids.clear();
        self.ids.push(id);
        self.primary = Some(id);
    }

    /// Add `id` if absent. It becomes the primary either way.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.primary = Some(id);
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(pos) = self.ids.iter().position(|x| *x == id) else {
            return false;
        };
        self.ids.remove(pos);
        if self.primary == Some(id) {
            self.primary = self.ids.last().copied();
        }
        true
    }

    /// Replace the selection with a batch; the last id becomes primary.
    pub fn replace_with(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        self.primary = self.ids.last().copied();
    }

    /// Keep only ids matching `keep`, promoting a new primary if needed.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| keep(*id));
        if let Some(p) = self.primary
            && !self.ids.contains(&p)
        {
            self.primary = self.ids.last().copied();
        }
        before != self.ids.len()
    }
}

// ─── Interaction mode ────────────────────────────────────────────────────

/// The gesture currently in progress, mirrored into the store so the
/// surface can pick cursors and visual flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
    BoxSelecting,
    Dragging,
    Resizing,
    Pinching,
}

impl InteractionMode {
    pub fn name(self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Panning => "panning",
            InteractionMode::BoxSelecting => "box-selecting",
            InteractionMode::Dragging => "dragging",
            InteractionMode::Resizing => "resizing",
            InteractionMode::Pinching => "pinching",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_names_roundtrip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("rect"), None);
    }

    #[test]
    fn kind_serializes_as_type_tag() {
        let mut node = Node::new(NodeId::intern("n1"), NodeKind::EnhancedMath, 1.0, 2.0);
        node.z_index = 3;
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "enhanced-math");
        assert_eq!(json["zIndex"], 3);
        assert!(json.get("width").is_none());
    }

    #[test]
    fn only_sized_kinds_are_resizable() {
        assert!(NodeKind::Image.is_resizable());
        assert!(NodeKind::Script.is_resizable());
        assert!(!NodeKind::Math.is_resizable());
        assert_eq!(
            NodeKind::Video.resize_mode(),
            Some(ResizeMode::AspectLocked)
        );
        assert_eq!(NodeKind::EnhancedMath.resize_mode(), Some(ResizeMode::Free));
    }

    #[test]
    fn selection_primary_promotion() {
        let a = NodeId::intern("sel_a");
        let b = NodeId::intern("sel_b");
        let c = NodeId::intern("sel_c");
        let mut sel = Selection::new();
        sel.select_only(a);
        sel.insert(b);
        sel.insert(c);
        assert_eq!(sel.primary(), Some(c));

        sel.remove(c);
        assert_eq!(sel.primary(), Some(b));
        sel.remove(a);
        assert_eq!(sel.primary(), Some(b));
        sel.remove(b);
        assert_eq!(sel.primary(), None);
        assert!(sel.is_empty());
    }

    #[test]
    fn selection_insert_is_idempotent() {
        let a = NodeId::intern("sel_idem");
        let mut sel = Selection::new();
        assert!(sel.insert(a));
        assert!(!sel.insert(a));
        assert_eq!(sel.len(), 1);
    }
}
