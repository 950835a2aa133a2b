//! Reactive application state.
//!
//! The [`Store`] is the single source of truth for the active canvas: pan,
//! scale, interaction mode, node list, selection, search query, and the
//! active creation tool. Each piece lives in a versioned [`Signal`]; derived
//! values are [`Memo`]s keyed on the versions they read, so they recompute
//! only when an input actually changed.
//!
//! Writers call the typed setters. Listeners subscribe to [`Topic`]s and are
//! notified synchronously after the write, or once at the end of the
//! outermost [`Store::batch`] when several writes belong together (an
//! animation frame touching both pan and scale notifies exactly once).
//!
//! The store is an explicit value: construct it at startup, hand `&mut` to
//! whoever handles input, and [`Store::dispose`] it on teardown.

use crate::config::CanvasConfig;
use crate::id::NodeId;
use crate::model::{InteractionMode, Node, NodeKind, Selection};
use crate::transform::ViewTransform;
use kurbo::Vec2;
use smallvec::SmallVec;
use std::cell::RefCell;

/// What changed. Subscribers filter on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Pan,
    Scale,
    Mode,
    Nodes,
    Selection,
    Search,
    Tool,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Pan,
        Topic::Scale,
        Topic::Mode,
        Topic::Nodes,
        Topic::Selection,
        Topic::Search,
        Topic::Tool,
    ];

    /// Topics whose state is part of a saved canvas.
    pub const PERSISTED: [Topic; 3] = [Topic::Pan, Topic::Scale, Topic::Nodes];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A value plus a version that bumps on every effective write.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    value: T,
    version: u64,
}

impl<T> Signal<T> {
    fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn replace(&mut self, value: T) {
        self.value = value;
        self.version += 1;
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

impl<T: PartialEq> Signal<T> {
    /// Write only if the value differs. Returns whether it changed.
    fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.replace(value);
        true
    }
}

/// Cached derivation keyed on the versions of its dependencies.
#[derive(Debug)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: Option<V>,
    evaluations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
            evaluations: 0,
        }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn get(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let (Some(k), Some(v)) = (&self.key, &self.value)
            && *k == key
        {
            return v.clone();
        }
        let v = compute();
        self.key = Some(key);
        self.value = Some(v.clone());
        self.evaluations += 1;
        v
    }

    /// How many times the derivation actually ran.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

type Callback = Box<dyn FnMut(&Store, &[Topic])>;

struct Subscriber {
    id: SubscriptionId,
    topics: SmallVec<[Topic; 4]>,
    callback: Callback,
}

/// The reactive state container for one active canvas.
pub struct Store {
    config: CanvasConfig,
    pan: Signal<Vec2>,
    scale: Signal<f64>,
    mode: Signal<InteractionMode>,
    nodes: Signal<Vec<Node>>,
    selection: Signal<Selection>,
    search: Signal<String>,
    tool: Signal<NodeKind>,
    z_counter: u64,

    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    batch_depth: usize,
    pending: SmallVec<[Topic; 8]>,

    transform_css: RefCell<Memo<(u64, u64), String>>,
    search_matches: RefCell<Memo<(u64, u64), Vec<NodeId>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Store {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            pan: Signal::new(Vec2::ZERO),
            scale: Signal::new(1.0),
            mode: Signal::new(InteractionMode::Idle),
            nodes: Signal::new(Vec::new()),
            selection: Signal::new(Selection::new()),
            search: Signal::new(String::new()),
            tool: Signal::new(NodeKind::Math),
            z_counter: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
            batch_depth: 0,
            pending: SmallVec::new(),
            transform_css: RefCell::new(Memo::default()),
            search_matches: RefCell::new(Memo::default()),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn version(&self, topic: Topic) -> u64 {
        match topic {
            Topic::Pan => self.pan.version(),
            Topic::Scale => self.scale.version(),
            Topic::Mode => self.mode.version(),
            Topic::Nodes => self.nodes.version(),
            Topic::Selection => self.selection.version(),
            Topic::Search => self.search.version(),
            Topic::Tool => self.tool.version(),
        }
    }

    /// Sum of the versions of `topics`; changes whenever any of them does.
    pub fn revision(&self, topics: &[Topic]) -> u64 {
        topics.iter().map(|t| self.version(*t)).sum()
    }

    // ─── Subscriptions & batching ────────────────────────────────────────

    /// Register `callback` for any of `topics`. It receives the store and
    /// the full list of topics that changed in the triggering write/batch.
    pub fn subscribe(
        &mut self,
        topics: &[Topic],
        callback: impl FnMut(&Store, &[Topic]) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            topics: topics.iter().copied().collect(),
            callback: Box::new(callback),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Run `f` with notifications deferred until the outermost batch ends.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Store) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.flush();
        }
        result
    }

    /// Drop all subscribers and pending notifications.
    pub fn dispose(&mut self) {
        log::debug!("store disposed ({} subscribers)", self.subscribers.len());
        self.subscribers.clear();
        self.pending.clear();
    }

    fn notify(&mut self, topic: Topic) {
        if !self.pending.contains(&topic) {
            self.pending.push(topic);
        }
        if self.batch_depth == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let changed = std::mem::take(&mut self.pending);
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for sub in &mut subscribers {
            if sub.topics.iter().any(|t| changed.contains(t)) {
                (sub.callback)(self, &changed);
            }
        }
        self.subscribers = subscribers;
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn pan(&self) -> Vec2 {
        *self.pan.get()
    }

    pub fn scale(&self) -> f64 {
        *self.scale.get()
    }

    pub fn view(&self) -> ViewTransform {
        ViewTransform::new(self.pan(), self.scale())
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        if self.pan.set(pan) {
            self.notify(Topic::Pan);
        }
    }

    /// Scale is always clamped into the configured range.
    pub fn set_scale(&mut self, scale: f64) {
        let scale = self.config.clamp_scale(scale);
        if self.scale.set(scale) {
            self.notify(Topic::Scale);
        }
    }

    /// Write pan and scale as one batched update.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.batch(|s| {
            s.set_pan(view.pan);
            s.set_scale(view.scale);
        });
    }

    /// CSS transform string for the world layer, recomputed only when pan
    /// or scale changed.
    pub fn transform_css(&self) -> String {
        let key = (self.pan.version(), self.scale.version());
        let view = self.view();
        self.transform_css.borrow_mut().get(key, || view.css())
    }

    pub fn transform_evaluations(&self) -> u64 {
        self.transform_css.borrow().evaluations()
    }

    // ─── Mode & tool ─────────────────────────────────────────────────────

    pub fn mode(&self) -> InteractionMode {
        *self.mode.get()
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode.set(mode) {
            self.notify(Topic::Mode);
        }
    }

    pub fn tool(&self) -> NodeKind {
        *self.tool.get()
    }

    pub fn set_tool(&mut self, kind: NodeKind) {
        if self.tool.set(kind) {
            self.notify(Topic::Tool);
        }
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        self.nodes.get()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get().iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn z_counter(&self) -> u64 {
        self.z_counter
    }

    /// Advance and return the global z counter.
    pub fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    /// Add a node. Rejects duplicate ids.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.contains(node.id) {
            log::warn!("refusing to insert duplicate node {}", node.id);
            return false;
        }
        self.z_counter = self.z_counter.max(node.z_index);
        self.nodes.value.push(node);
        self.nodes.touch();
        self.notify(Topic::Nodes);
        true
    }

    /// Mutate one node in place. Silent no-op (returns `false`) if the node
    /// no longer exists.
    pub fn update_node(&mut self, id: NodeId, f: impl FnOnce(&mut Node)) -> bool {
        let Some(node) = self.nodes.value.iter_mut().find(|n| n.id == id) else {
            log::trace!("update on missing node {id} ignored");
            return false;
        };
        f(node);
        self.nodes.touch();
        self.notify(Topic::Nodes);
        true
    }

    /// Translate every listed node by the same world delta. Missing ids are
    /// skipped. Returns the number of nodes moved.
    pub fn move_nodes(&mut self, ids: &[NodeId], delta: Vec2) -> usize {
        let mut moved = 0;
        for node in self.nodes.value.iter_mut() {
            if ids.contains(&node.id) {
                node.x += delta.x;
                node.y += delta.y;
                moved += 1;
            }
        }
        if moved > 0 {
            self.nodes.touch();
            self.notify(Topic::Nodes);
        }
        moved
    }

    /// Give the node the next z value so it stacks above everything else.
    pub fn bring_to_front(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let z = self.next_z();
        self.update_node(id, |n| n.z_index = z)
    }

    /// Remove a node and drop it from the selection.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let pos = self.nodes.value.iter().position(|n| n.id == id)?;
        let node = self.batch(|s| {
            let node = s.nodes.value.remove(pos);
            s.nodes.touch();
            s.notify(Topic::Nodes);
            if s.selection.value.remove(id) {
                s.selection.touch();
                s.notify(Topic::Selection);
            }
            node
        });
        Some(node)
    }

    /// Remove several nodes in one batch. Returns how many existed.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> usize {
        self.batch(|s| {
            ids.iter()
                .filter(|id| s.remove_node(**id).is_some())
                .count()
        })
    }

    /// Atomically swap in another canvas: viewport, node list, z counter.
    /// Selection is cleared and duplicate ids are dropped.
    pub fn replace_canvas(&mut self, view: ViewTransform, nodes: Vec<Node>, z_counter: u64) {
        let mut unique: Vec<Node> = Vec::with_capacity(nodes.len());
        for node in nodes {
            if unique.iter().any(|n| n.id == node.id) {
                log::warn!("dropping duplicate node {} while loading canvas", node.id);
                continue;
            }
            unique.push(node);
        }
        let max_z = unique.iter().map(|n| n.z_index).max().unwrap_or(0);
        self.batch(|s| {
            s.set_view(view);
            s.nodes.replace(unique);
            s.notify(Topic::Nodes);
            s.z_counter = z_counter.max(max_z);
            if s.selection.value.clear() {
                s.selection.touch();
                s.notify(Topic::Selection);
            }
            s.set_mode(InteractionMode::Idle);
        });
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        self.selection.get()
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selection.get().ids().to_vec()
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.get().contains(id)
    }

    /// Edit the selection. Ids that do not reference an existing node are
    /// dropped afterwards, so the selection never dangles.
    pub fn update_selection(&mut self, f: impl FnOnce(&mut Selection)) -> bool {
        let mut next = self.selection.get().clone();
        f(&mut next);
        let nodes = self.nodes.get();
        next.retain(|id| nodes.iter().any(|n| n.id == id));
        if self.selection.set(next) {
            self.notify(Topic::Selection);
            true
        } else {
            false
        }
    }

    // ─── Search ──────────────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        self.search.get()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        if self.search.set(query.into()) {
            self.notify(Topic::Search);
        }
    }

    /// Ids of nodes whose content contains the search query
    /// (case-insensitive). Empty query matches nothing.
    pub fn search_matches(&self) -> Vec<NodeId> {
        let key = (self.nodes.version(), self.search.version());
        self.search_matches.borrow_mut().get(key, || {
            let query = self.search.get().trim().to_lowercase();
            if query.is_empty() {
                return Vec::new();
            }
            self.nodes
                .get()
                .iter()
                .filter(|n| n.content.to_lowercase().contains(&query))
                .map(|n| n.id)
                .collect()
        })
    }
}
