//! The workspace controller.
//!
//! Owns the store and every piece of ephemeral interaction state, routes
//! each [`InputEvent`] to the viewport controller, the gesture machine, the
//! selection engine, or the shortcut map, and repaints the surface after
//! every event. Hosts forward raw events and act on the returned
//! [`Outcome`] (prevent default, blur, schedule a save).

use kurbo::{Point, Rect, Size, Vec2};
use slate_core::config::CanvasConfig;
use slate_core::id::NodeId;
use slate_core::model::{InteractionMode, NodeKind};
use slate_core::persist::CanvasRecord;
use slate_core::store::{Store, Topic};
use slate_core::transform::ViewTransform;
use slate_render::hit::content_bounds;
use slate_render::paint::{PaintStats, Painter};
use slate_render::surface::Surface;
use slate_render::target::{NodePart, PointerTarget};
use smallvec::SmallVec;

use crate::animation::CameraAnimator;
use crate::factory;
use crate::input::{InputEvent, Modifiers, PointerButton, Touches};
use crate::selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{ZoomSync, ZoomTransform};
use crate::tools::{Gesture, ResizeState, drag_nodes};
use crate::viewport;

/// Marquees this small in both dimensions count as a click.
const CLICK_SLOP: f64 = 2.0;

/// Current time in milliseconds, on the same time base as the timestamps
/// passed to [`Workspace::tick`].
pub type Clock = Box<dyn Fn() -> f64>;

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Store state changed.
    pub changed: bool,
    /// Saved state changed; schedule a save.
    pub persist: bool,
    pub prevent_default: bool,
    /// Blur the focused control.
    pub blur: bool,
    pub action: Option<ShortcutAction>,
}

impl Outcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            prevent_default: true,
            ..Self::default()
        }
    }
}

pub struct Workspace {
    store: Store,
    gesture: Gesture,
    /// Persisted revision before the event that started the current gesture.
    gesture_revision: u64,
    animator: CameraAnimator,
    clock: Clock,
    painter: Painter,
    zoom_sync: ZoomSync,
    view_size: Size,
    persist_pending: bool,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Workspace {
    pub fn new(config: CanvasConfig) -> Self {
        let zoom_sync = ZoomSync::new(&config);
        Self {
            store: Store::new(config),
            gesture: Gesture::Idle,
            gesture_revision: 0,
            animator: CameraAnimator::new(),
            clock: Box::new(|| 0.0),
            painter: Painter::new(),
            zoom_sync,
            view_size: Size::ZERO,
            persist_pending: false,
        }
    }

    pub fn with_animator(mut self, animator: CameraAnimator) -> Self {
        self.animator = animator;
        self
    }

    /// Time source for stamping camera flights. The default clock always
    /// reads zero, which suits hosts whose frame timestamps start at zero.
    pub fn with_clock(mut self, clock: impl Fn() -> f64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Container size in screen pixels, for centered zoom and fit.
    pub fn resize(&mut self, size: Size) {
        self.view_size = size;
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    pub fn handle<S: Surface + ?Sized>(&mut self, event: InputEvent, surface: &mut S) -> Outcome {
        let revision = self.store.revision(&Topic::ALL);
        let persisted = self.store.revision(&Topic::PERSISTED);
        if self.gesture.is_idle() {
            self.gesture_revision = persisted;
        }

        let mut outcome = match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
                target,
            } => self.pointer_down(Point::new(x, y), button, modifiers, target, surface),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(x, y), surface),
            InputEvent::DoubleClick { x, y, target } => self.double_click(Point::new(x, y), target),
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
                target,
            } => self.wheel(Point::new(x, y), Vec2::new(dx, dy), modifiers, target),
            InputEvent::TouchStart { touches, target } => self.touch_start(&touches, target),
            InputEvent::TouchMove { touches } => self.touch_move(&touches),
            InputEvent::TouchEnd { touches } => self.touch_end(&touches),
            InputEvent::Key {
                key,
                modifiers,
                editing,
            } => self.key(&key, modifiers, editing, surface),
        };

        outcome.changed = self.store.revision(&Topic::ALL) != revision;
        // Mid-gesture changes are saved once, on release.
        if self.gesture.is_idle() && self.store.revision(&Topic::PERSISTED) != persisted {
            outcome.persist = true;
        }
        if outcome.persist {
            self.persist_pending = true;
        }
        self.paint(surface);
        outcome
    }

    fn begin(&mut self, gesture: Gesture) {
        log::debug!("gesture start: {}", gesture.mode().name());
        self.gesture = gesture;
        self.store.set_mode(self.gesture.mode());
    }

    /// Drop back to idle. Returns whether the finished gesture changed
    /// saved state.
    fn end(&mut self) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        log::debug!("gesture end: {}", self.gesture.mode().name());
        self.gesture = Gesture::Idle;
        self.store.set_mode(InteractionMode::Idle);
        self.store.revision(&Topic::PERSISTED) != self.gesture_revision
    }

    fn pointer_down<S: Surface + ?Sized>(
        &mut self,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        target: PointerTarget,
        surface: &S,
    ) -> Outcome {
        if matches!(target, PointerTarget::Unknown) {
            return Outcome::ignored();
        }
        self.animator.cancel();
        // A stale gesture (release outside the window) is discarded.
        self.end();

        match (button, target) {
            (PointerButton::Middle, _) | (PointerButton::Secondary, PointerTarget::Background) => {
                self.begin(Gesture::Panning { last: pos });
                Outcome::consumed()
            }
            (PointerButton::Secondary, _) => Outcome::ignored(),
            (PointerButton::Primary, PointerTarget::Background) => {
                if !modifiers.shift {
                    selection::select_node(&mut self.store, None, false);
                }
                self.begin(Gesture::BoxSelecting {
                    start: pos,
                    current: pos,
                });
                Outcome::consumed()
            }
            (PointerButton::Primary, PointerTarget::Node { id, part }) => {
                self.node_down(id, part, pos, modifiers, surface)
            }
            (PointerButton::Primary, PointerTarget::Unknown) => Outcome::ignored(),
        }
    }

    fn node_down<S: Surface + ?Sized>(
        &mut self,
        id: NodeId,
        part: NodePart,
        pos: Point,
        modifiers: Modifiers,
        surface: &S,
    ) -> Outcome {
        if !self.store.contains(id) {
            return Outcome::ignored();
        }
        match part {
            NodePart::Interactive => {
                // The embedded control keeps the event.
                selection::select_node(&mut self.store, Some(id), modifiers.shift);
                Outcome::ignored()
            }
            NodePart::ResizeHandle => {
                selection::select_node(&mut self.store, Some(id), false);
                match ResizeState::begin(&self.store, surface, id, pos) {
                    Some(rs) => {
                        self.begin(Gesture::Resizing(rs));
                        Outcome::consumed()
                    }
                    None => self.start_drag(id, pos, modifiers),
                }
            }
            NodePart::Surface => self.start_drag(id, pos, modifiers),
        }
    }

    fn start_drag(&mut self, id: NodeId, pos: Point, modifiers: Modifiers) -> Outcome {
        if modifiers.shift || !self.store.is_selected(id) {
            selection::select_node(&mut self.store, Some(id), modifiers.shift);
        } else {
            // Keep the group for dragging; just raise the grabbed node.
            self.store.bring_to_front(id);
        }
        let ids: SmallVec<[NodeId; 4]> = self.store.selection().iter().collect();
        self.begin(Gesture::DraggingNodes {
            last: pos,
            ids,
            moved: false,
        });
        Outcome::consumed()
    }

    fn pointer_move(&mut self, pos: Point) -> Outcome {
        match &mut self.gesture {
            Gesture::Panning { last } => {
                let delta = pos - *last;
                *last = pos;
                viewport::pan_by(&mut self.store, delta);
            }
            Gesture::BoxSelecting { current, .. } => *current = pos,
            Gesture::DraggingNodes { last, ids, moved } => {
                let delta = pos - *last;
                *last = pos;
                if drag_nodes(&mut self.store, &ids[..], delta) > 0 {
                    *moved = true;
                }
            }
            Gesture::Resizing(rs) => {
                let rs = *rs;
                rs.apply(&mut self.store, pos);
            }
            Gesture::Idle | Gesture::Pinching(_) => return Outcome::ignored(),
        }
        Outcome::consumed()
    }

    fn pointer_up<S: Surface + ?Sized>(&mut self, pos: Point, surface: &S) -> Outcome {
        if let Gesture::BoxSelecting { start, .. } = self.gesture {
            let rect = Rect::from_points(start, pos);
            if rect.width() > CLICK_SLOP || rect.height() > CLICK_SLOP {
                selection::box_select(&mut self.store, surface, rect);
            }
        }
        let persist = self.end();
        Outcome {
            persist,
            ..Outcome::ignored()
        }
    }

    fn double_click(&mut self, pos: Point, target: PointerTarget) -> Outcome {
        if target != PointerTarget::Background {
            return Outcome::ignored();
        }
        let at = self.store.view().screen_to_world(pos);
        let kind = self.store.tool();
        self.create_node(kind, at);
        Outcome::consumed()
    }

    fn wheel(&mut self, pos: Point, delta: Vec2, modifiers: Modifiers, target: PointerTarget) -> Outcome {
        // Widgets scroll themselves.
        if target.is_interactive() || matches!(target, PointerTarget::Unknown) {
            return Outcome::ignored();
        }
        self.animator.cancel();
        viewport::wheel(&mut self.store, pos, delta, modifiers);
        Outcome::consumed()
    }

    fn touch_start(&mut self, touches: &Touches, target: PointerTarget) -> Outcome {
        match touches.as_slice() {
            [a, b, ..] => {
                self.animator.cancel();
                self.end();
                match viewport::begin_pinch(&self.store, *a, *b) {
                    Some(pinch) => {
                        self.begin(Gesture::Pinching(pinch));
                        Outcome::consumed()
                    }
                    None => Outcome::ignored(),
                }
            }
            [p] if target == PointerTarget::Background => {
                self.animator.cancel();
                self.end();
                self.begin(Gesture::Panning { last: *p });
                Outcome::consumed()
            }
            _ => Outcome::ignored(),
        }
    }

    fn touch_move(&mut self, touches: &Touches) -> Outcome {
        match (&mut self.gesture, touches.as_slice()) {
            (Gesture::Pinching(pinch), [a, b, ..]) => {
                let pinch = *pinch;
                viewport::update_pinch(&mut self.store, &pinch, *a, *b);
            }
            (Gesture::Panning { last }, [p, ..]) => {
                let delta = *p - *last;
                *last = *p;
                viewport::pan_by(&mut self.store, delta);
            }
            _ => return Outcome::ignored(),
        }
        Outcome::consumed()
    }

    fn touch_end(&mut self, touches: &Touches) -> Outcome {
        // Lifting one finger of a pinch continues as a one-finger pan.
        if matches!(self.gesture, Gesture::Pinching(_)) && touches.len() == 1 {
            self.gesture = Gesture::Panning { last: touches[0] };
            self.store.set_mode(InteractionMode::Panning);
            return Outcome::consumed();
        }
        if !touches.is_empty() {
            return Outcome::ignored();
        }
        let persist = self.end();
        Outcome {
            persist,
            ..Outcome::ignored()
        }
    }

    fn key<S: Surface + ?Sized>(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        editing: bool,
        surface: &S,
    ) -> Outcome {
        let Some(action) = ShortcutMap::resolve(key, modifiers, editing) else {
            return Outcome::ignored();
        };
        log::trace!("shortcut {}", action.name());
        let mut outcome = Outcome {
            action: Some(action),
            ..Outcome::consumed()
        };
        match action {
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::Duplicate => {
                self.duplicate_selected();
            }
            ShortcutAction::SelectAll => {
                selection::select_all(&mut self.store);
            }
            ShortcutAction::Deselect => {
                selection::select_node(&mut self.store, None, false);
                outcome.blur = true;
                outcome.prevent_default = false;
            }
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::ZoomToFit => self.zoom_to_fit(surface),
        }
        outcome
    }

    // ─── Frames & painting ───────────────────────────────────────────────

    /// Advance the camera animation; call once per animation frame.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> bool {
        let was_active = self.animator.is_active();
        let changed = self.animator.tick(&mut self.store, now_ms);
        if was_active && !self.animator.is_active() {
            self.persist_pending = true;
        }
        if changed {
            self.paint(surface);
        }
        changed
    }

    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) -> PaintStats {
        self.painter.paint(&self.store, self.gesture.marquee(), surface)
    }

    /// Force a full repaint next time (e.g. the surface was re-created).
    pub fn invalidate(&mut self) {
        self.painter.invalidate();
    }

    // ─── Camera ──────────────────────────────────────────────────────────

    /// Animate to a view, starting now. `None` uses the configured duration.
    pub fn animate_to(&mut self, scale: f64, pan: Vec2, duration_ms: Option<f64>) {
        let duration = duration_ms.unwrap_or(self.store.config().animation_duration_ms);
        let now = (self.clock)();
        if self
            .animator
            .animate_to(&mut self.store, scale, pan, duration, now)
        {
            self.persist_pending = true;
        }
    }

    fn animate_to_view(&mut self, view: ViewTransform) {
        self.animate_to(view.scale, view.pan, None);
    }

    pub fn zoom_in(&mut self) {
        let factor = self.store.config().button_zoom_factor;
        let target = viewport::zoom_target(&self.store, self.view_size, factor);
        self.animate_to_view(target);
    }

    pub fn zoom_out(&mut self) {
        let factor = 1.0 / self.store.config().button_zoom_factor;
        let target = viewport::zoom_target(&self.store, self.view_size, factor);
        self.animate_to_view(target);
    }

    pub fn reset_view(&mut self) {
        self.animate_to_view(ViewTransform::IDENTITY);
    }

    /// Frame all nodes. No-op on an empty canvas or before [`Self::resize`].
    pub fn zoom_to_fit<S: Surface + ?Sized>(&mut self, surface: &S) {
        let Some(bounds) = content_bounds(self.store.nodes(), surface, self.store.scale()) else {
            return;
        };
        let config = self.store.config();
        let Some(target) = ViewTransform::fit(bounds, self.view_size, config.fit_padding, |s| {
            config.clamp_scale(s)
        }) else {
            return;
        };
        self.animate_to_view(target);
    }

    // ─── Programmatic edits ──────────────────────────────────────────────

    pub fn select_node(&mut self, id: Option<NodeId>, add: bool) -> bool {
        let changed = selection::select_node(&mut self.store, id, add);
        if changed && id.is_some() {
            self.persist_pending = true;
        }
        changed
    }

    pub fn delete_selected(&mut self) -> usize {
        let removed = selection::delete_selected(&mut self.store);
        if removed > 0 {
            self.persist_pending = true;
        }
        removed
    }

    pub fn duplicate_selected(&mut self) -> Vec<NodeId> {
        let copies = selection::duplicate_selected(&mut self.store);
        if !copies.is_empty() {
            self.persist_pending = true;
        }
        copies
    }

    /// Create a node at a world position and select it.
    pub fn create_node(&mut self, kind: NodeKind, at: Point) -> NodeId {
        let id = factory::create_node(&mut self.store, kind, at);
        self.store.update_selection(|s| s.select_only(id));
        self.persist_pending = true;
        id
    }

    /// Renderer write-back of a node's content.
    pub fn set_node_content(&mut self, id: NodeId, content: &str) -> bool {
        let changed = self.store.update_node(id, |n| n.content = content.to_string());
        self.persist_pending |= changed;
        changed
    }

    /// Renderer write-back of a node's size.
    pub fn set_node_size(&mut self, id: NodeId, size: Size) -> bool {
        let changed = self.store.update_node(id, |n| n.set_size(size));
        self.persist_pending |= changed;
        changed
    }

    pub fn set_tool(&mut self, kind: NodeKind) {
        self.store.set_tool(kind);
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Returns `true` once per batch of saved-state changes.
    pub fn take_persist_request(&mut self) -> bool {
        std::mem::take(&mut self.persist_pending)
    }

    /// Swap in a saved canvas. Any gesture or flight in progress is dropped.
    pub fn load(&mut self, record: &CanvasRecord) {
        self.animator.cancel();
        self.gesture = Gesture::Idle;
        record.restore_into(&mut self.store);
        self.persist_pending = false;
        log::debug!("loaded canvas {:?} ({} nodes)", record.name, record.fields.len());
    }

    pub fn snapshot(&self, name: &str, now_ms: u64) -> CanvasRecord {
        CanvasRecord::capture(name, &self.store, now_ms)
    }

    // ─── Gesture-library sync ────────────────────────────────────────────

    pub fn push_zoom(&mut self) -> Option<ZoomTransform> {
        self.zoom_sync.push(&self.store)
    }

    /// Apply a transform reported by the gesture library. Library-driven
    /// motion is a user gesture, so it cancels any flight.
    pub fn pull_zoom<S: Surface + ?Sized>(&mut self, transform: ZoomTransform, surface: &mut S) -> bool {
        if !self.zoom_sync.pull(transform, &mut self.store) {
            return false;
        }
        self.animator.cancel();
        self.persist_pending = true;
        self.paint(surface);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slate_core::model::Node;
    use slate_render::surface::{Cursor, MemorySurface};

    fn workspace_with(nodes: &[(&str, f64, f64)]) -> (Workspace, MemorySurface, Vec<NodeId>) {
        let mut ws = Workspace::default();
        ws.resize(Size::new(800.0, 600.0));
        let mut surface = MemorySurface::new();
        let mut ids = Vec::new();
        for (name, x, y) in nodes {
            let id = NodeId::intern(name);
            let mut node = Node::new(id, NodeKind::Math, *x, *y);
            node.z_index = ws.store_mut().next_z();
            ws.store_mut().insert_node(node);
            surface.set_rendered_size(id, Size::new(100.0, 100.0));
            ids.push(id);
        }
        (ws, surface, ids)
    }

    #[test]
    fn background_press_clears_and_box_selects() {
        let (mut ws, mut surface, ids) = workspace_with(&[("ws_box_a", 0.0, 0.0)]);
        ws.select_node(Some(ids[0]), false);

        let out = ws.handle(
            InputEvent::pointer_down(300.0, 300.0, PointerTarget::Background),
            &mut surface,
        );
        assert!(out.prevent_default);
        assert!(ws.store().selection().is_empty());
        assert_eq!(ws.store().mode(), InteractionMode::BoxSelecting);
        assert_eq!(surface.cursor, Cursor::Crosshair);

        ws.handle(InputEvent::pointer_move(50.0, 50.0), &mut surface);
        assert_eq!(surface.marquee, Some(Rect::new(50.0, 50.0, 300.0, 300.0)));
        ws.handle(InputEvent::pointer_up(50.0, 50.0), &mut surface);
        assert_eq!(ws.store().selected_ids(), ids);
        assert_eq!(ws.store().mode(), InteractionMode::Idle);
        assert_eq!(surface.marquee, None);
        assert_eq!(surface.cursor, Cursor::Default);
    }

    #[test]
    fn click_on_background_is_not_a_box_select() {
        let (mut ws, mut surface, _) = workspace_with(&[("ws_click_a", 0.0, 0.0)]);
        ws.handle(
            InputEvent::pointer_down(10.0, 10.0, PointerTarget::Background),
            &mut surface,
        );
        ws.handle(InputEvent::pointer_up(11.0, 11.0), &mut surface);
        assert!(ws.store().selection().is_empty());
    }

    #[test]
    fn secondary_button_pans_background() {
        let (mut ws, mut surface, _) = workspace_with(&[]);
        ws.handle(
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
                target: PointerTarget::Background,
            },
            &mut surface,
        );
        assert_eq!(surface.cursor, Cursor::Grabbing);
        ws.handle(InputEvent::pointer_move(15.0, -5.0), &mut surface);
        let out = ws.handle(InputEvent::pointer_up(15.0, -5.0), &mut surface);
        assert_eq!(ws.store().pan(), Vec2::new(15.0, -5.0));
        assert!(out.persist);
        assert!(ws.take_persist_request());
        assert!(!ws.take_persist_request());
    }

    #[test]
    fn interactive_child_selects_without_drag() {
        let (mut ws, mut surface, ids) = workspace_with(&[("ws_inter_a", 0.0, 0.0)]);
        let out = ws.handle(
            InputEvent::pointer_down(10.0, 10.0, PointerTarget::interactive(ids[0])),
            &mut surface,
        );
        assert!(!out.prevent_default);
        assert!(ws.gesture().is_idle());
        assert_eq!(ws.store().selected_ids(), vec![ids[0]]);
    }

    #[test]
    fn unknown_target_is_ignored() {
        let (mut ws, mut surface, _) = workspace_with(&[]);
        let out = ws.handle(
            InputEvent::pointer_down(0.0, 0.0, PointerTarget::Unknown),
            &mut surface,
        );
        assert_eq!(out, Outcome::default());
        assert!(ws.gesture().is_idle());
    }

    #[test]
    fn double_click_creates_active_tool_kind() {
        let (mut ws, mut surface, _) = workspace_with(&[]);
        ws.set_tool(NodeKind::Image);
        ws.store_mut().set_view(ViewTransform::new(Vec2::new(100.0, 0.0), 2.0));
        ws.handle(
            InputEvent::DoubleClick {
                x: 300.0,
                y: 40.0,
                target: PointerTarget::Background,
            },
            &mut surface,
        );
        let node = &ws.store().nodes()[0];
        assert_eq!(node.kind, NodeKind::Image);
        assert_eq!(node.position(), Point::new(100.0, 20.0));
        assert_eq!(ws.store().selected_ids(), vec![node.id]);
        assert!(surface.placement(node.id).is_some());
    }

    #[test]
    fn escape_clears_and_blurs() {
        let (mut ws, mut surface, ids) = workspace_with(&[("ws_esc_a", 0.0, 0.0)]);
        ws.select_node(Some(ids[0]), false);
        let out = ws.handle(
            InputEvent::Key {
                key: "Escape".into(),
                modifiers: Modifiers::NONE,
                editing: true,
            },
            &mut surface,
        );
        assert!(out.blur);
        assert_eq!(out.action, Some(ShortcutAction::Deselect));
        assert!(ws.store().selection().is_empty());
    }

    #[test]
    fn wheel_over_widget_is_left_alone() {
        let (mut ws, mut surface, ids) = workspace_with(&[("ws_wheel_a", 0.0, 0.0)]);
        let out = ws.handle(
            InputEvent::Wheel {
                x: 10.0,
                y: 10.0,
                dx: 0.0,
                dy: 40.0,
                modifiers: Modifiers::NONE,
                target: PointerTarget::interactive(ids[0]),
            },
            &mut surface,
        );
        assert!(!out.prevent_default);
        assert_eq!(ws.store().pan(), Vec2::ZERO);
    }

    #[test]
    fn zoom_buttons_animate_about_center() {
        let (mut ws, mut surface, _) = workspace_with(&[]);
        ws.zoom_in();
        assert!(ws.is_animating());
        ws.tick(0.0, &mut surface);
        ws.tick(10_000.0, &mut surface);
        assert!((ws.store().scale() - 1.2).abs() < 1e-12);
        let center = ws.store().view().screen_to_world(Point::new(400.0, 300.0));
        assert!((center.x - 400.0).abs() < 1e-9 && (center.y - 300.0).abs() < 1e-9);
        assert!(ws.take_persist_request());
    }

    #[test]
    fn pointer_down_cancels_flight() {
        let (mut ws, mut surface, _) = workspace_with(&[]);
        ws.animate_to(3.0, Vec2::ZERO, Some(100.0));
        ws.handle(
            InputEvent::pointer_down(0.0, 0.0, PointerTarget::Background),
            &mut surface,
        );
        assert!(!ws.is_animating());
        assert!(!ws.tick(50.0, &mut surface));
        assert_eq!(ws.store().scale(), 1.0);
    }

    #[test]
    fn inverted_scale_range_never_panics() {
        let config = CanvasConfig {
            min_scale: 10.0,
            max_scale: 5.0,
            ..CanvasConfig::default()
        };
        let mut ws = Workspace::new(config);
        ws.store_mut().set_scale(1.0);
        assert_eq!(ws.store().scale(), 5.0);
    }
}
