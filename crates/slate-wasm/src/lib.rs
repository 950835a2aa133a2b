//! WASM bridge for Slate: exposes the canvas engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the DOM
//! (container, world layer, marquee, node elements built by its content
//! renderers) and forwards raw events; every handler returns an outcome JSON
//! string telling the host whether to `preventDefault`, blur, or save.

mod console;
mod dom;

use dom::{DomSurface, element_chain};
use slate_core::config::CanvasConfig;
use slate_core::id::NodeId;
use slate_core::model::{Node, NodeKind};
use slate_core::persist::CanvasRecord;
use slate_core::{Point, Size, Vec2};
use slate_editor::input::{InputEvent, Modifiers, PointerButton, Touches};
use slate_editor::sync::ZoomTransform;
use slate_editor::workspace::{Outcome, Workspace};
use slate_render::target::{PointerTarget, classify, is_text_editing};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct SlateCanvas {
    workspace: Workspace,
    surface: DomSurface,
}

#[wasm_bindgen]
impl SlateCanvas {
    /// `config_json` may be empty or a partial `CanvasConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        world: HtmlElement,
        marquee: HtmlElement,
        config_json: &str,
    ) -> SlateCanvas {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            CanvasConfig::default()
        } else {
            CanvasConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("invalid canvas config, using defaults: {e}");
                CanvasConfig::default()
            })
        };
        let surface = DomSurface::new(container, world, marquee);
        let mut workspace = Workspace::new(config).with_clock(frame_clock);
        workspace.resize(surface.container_size());
        let mut canvas = Self { workspace, surface };
        canvas.workspace.paint(&mut canvas.surface);
        canvas
    }

    /// Route `log` output to the browser console (`error`..`trace`).
    pub fn set_log_level(&self, level: &str) {
        console::init(console::parse_level(level));
    }

    /// Re-measure the container after a layout change.
    pub fn resize(&mut self) {
        let size = self.surface.container_size();
        self.workspace.resize(size);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        client_x: f64,
        client_y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        target: Option<Element>,
    ) -> String {
        let Some(button) = PointerButton::from_dom(button) else {
            return outcome_json(&Outcome::default());
        };
        let (x, y) = self.surface.to_local(client_x, client_y);
        let event = InputEvent::PointerDown {
            x,
            y,
            button,
            modifiers: modifiers(shift, ctrl, alt, meta),
            target: self.classify(target.as_ref()),
        };
        self.dispatch(event)
    }

    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let (x, y) = self.surface.to_local(client_x, client_y);
        self.dispatch(InputEvent::PointerMove {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) -> String {
        let (x, y) = self.surface.to_local(client_x, client_y);
        self.dispatch(InputEvent::PointerUp { x, y })
    }

    pub fn double_click(&mut self, client_x: f64, client_y: f64, target: Option<Element>) -> String {
        let (x, y) = self.surface.to_local(client_x, client_y);
        let target = self.classify(target.as_ref());
        self.dispatch(InputEvent::DoubleClick { x, y, target })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn wheel(
        &mut self,
        client_x: f64,
        client_y: f64,
        dx: f64,
        dy: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        target: Option<Element>,
    ) -> String {
        let (x, y) = self.surface.to_local(client_x, client_y);
        let event = InputEvent::Wheel {
            x,
            y,
            dx,
            dy,
            modifiers: modifiers(shift, ctrl, alt, meta),
            target: self.classify(target.as_ref()),
        };
        self.dispatch(event)
    }

    /// `coords` is a flat `[x0, y0, x1, y1, …]` list of client coordinates.
    pub fn touch_start(&mut self, coords: &[f64], target: Option<Element>) -> String {
        let touches = self.touches(coords);
        let target = self.classify(target.as_ref());
        self.dispatch(InputEvent::TouchStart { touches, target })
    }

    pub fn touch_move(&mut self, coords: &[f64]) -> String {
        let touches = self.touches(coords);
        self.dispatch(InputEvent::TouchMove { touches })
    }

    /// `coords` lists the touches still down.
    pub fn touch_end(&mut self, coords: &[f64]) -> String {
        let touches = self.touches(coords);
        self.dispatch(InputEvent::TouchEnd { touches })
    }

    /// `focused` is `document.activeElement`.
    pub fn key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        focused: Option<Element>,
    ) -> String {
        let editing = focused
            .as_ref()
            .is_some_and(|el| is_text_editing(&element_chain(el, None)));
        self.dispatch(InputEvent::Key {
            key: key.to_string(),
            modifiers: modifiers(shift, ctrl, alt, meta),
            editing,
        })
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Advance the camera animation with a `requestAnimationFrame`
    /// timestamp. Returns `true` while a flight is running, so the host
    /// knows to request another frame.
    pub fn tick(&mut self, time_ms: f64) -> bool {
        self.workspace.tick(time_ms, &mut self.surface);
        self.workspace.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.workspace.is_animating()
    }

    /// Repaint everything (e.g. after mounting node elements).
    pub fn repaint(&mut self) {
        self.workspace.invalidate();
        self.workspace.paint(&mut self.surface);
    }

    // ─── Camera ──────────────────────────────────────────────────────────

    /// Fly to a view. `duration_ms` defaults to the configured duration.
    pub fn animate_to(&mut self, scale: f64, pan_x: f64, pan_y: f64, duration_ms: Option<f64>) {
        self.workspace
            .animate_to(scale, Vec2::new(pan_x, pan_y), duration_ms);
    }

    pub fn zoom_in(&mut self) {
        self.workspace.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.workspace.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.workspace.reset_view();
    }

    pub fn zoom_to_fit(&mut self) {
        self.workspace.zoom_to_fit(&self.surface);
    }

    /// Current view as `{"scale":…,"panX":…,"panY":…}`.
    pub fn get_view(&self) -> String {
        let view = self.workspace.store().view();
        serde_json::json!({
            "scale": view.scale,
            "panX": view.pan.x,
            "panY": view.pan.y,
        })
        .to_string()
    }

    /// Store → gesture library. Empty string if the library is current,
    /// else `{"k":…,"x":…,"y":…}`.
    pub fn push_zoom(&mut self) -> String {
        match self.workspace.push_zoom() {
            Some(t) => serde_json::json!({ "k": t.k, "x": t.x, "y": t.y }).to_string(),
            None => String::new(),
        }
    }

    /// Gesture library → store. Returns `true` if the store changed.
    pub fn pull_zoom(&mut self, k: f64, x: f64, y: f64) -> bool {
        self.workspace
            .pull_zoom(ZoomTransform { k, x, y }, &mut self.surface)
    }

    // ─── Nodes & selection ───────────────────────────────────────────────

    /// Create a node of `kind` (e.g. `"math"`, `"rich-text"`) at a client
    /// position. Returns the new id, or an empty string for unknown kinds.
    pub fn create_node_at(&mut self, kind: &str, client_x: f64, client_y: f64) -> String {
        let Some(kind) = NodeKind::from_name(kind) else {
            log::warn!("unknown node kind {kind:?}");
            return String::new();
        };
        let (x, y) = self.surface.to_local(client_x, client_y);
        let at = self.workspace.store().view().screen_to_world(Point::new(x, y));
        let id = self.workspace.create_node(kind, at);
        self.workspace.paint(&mut self.surface);
        id.as_str().to_string()
    }

    /// Active kind for double-click creation.
    pub fn set_tool(&mut self, kind: &str) -> bool {
        let Some(kind) = NodeKind::from_name(kind) else {
            return false;
        };
        self.workspace.set_tool(kind);
        true
    }

    pub fn get_tool_name(&self) -> String {
        self.workspace.store().tool().name().to_string()
    }

    /// Renderer callback: something inside the node gained focus.
    pub fn select_node(&mut self, node_id: Option<String>, add: bool) -> bool {
        let id = match node_id.as_deref() {
            Some(raw) => match NodeId::lookup(raw) {
                Some(id) => Some(id),
                None => return false,
            },
            None => None,
        };
        let changed = self.workspace.select_node(id, add);
        self.workspace.paint(&mut self.surface);
        changed
    }

    /// Selected ids as a JSON array, primary last.
    pub fn get_selected_ids(&self) -> String {
        let ids: Vec<String> = self
            .workspace
            .store()
            .selection()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn delete_selected(&mut self) -> u32 {
        let removed = self.workspace.delete_selected();
        self.workspace.paint(&mut self.surface);
        removed as u32
    }

    /// Returns the new ids as a JSON array.
    pub fn duplicate_selected(&mut self) -> String {
        let copies: Vec<String> = self
            .workspace
            .duplicate_selected()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        self.workspace.paint(&mut self.surface);
        serde_json::to_string(&copies).unwrap_or_else(|_| "[]".to_string())
    }

    /// Renderer write-back of content.
    pub fn set_node_content(&mut self, node_id: &str, content: &str) -> bool {
        NodeId::lookup(node_id).is_some_and(|id| self.workspace.set_node_content(id, content))
    }

    /// Renderer write-back of an explicit size (world units).
    pub fn set_node_size(&mut self, node_id: &str, width: f64, height: f64) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        let changed = self
            .workspace
            .set_node_size(id, Size::new(width, height));
        self.workspace.paint(&mut self.surface);
        changed
    }

    pub fn set_search(&mut self, query: &str) {
        self.workspace.store_mut().set_search(query);
        self.workspace.paint(&mut self.surface);
    }

    /// Nodes the surface could not place because their element does not
    /// exist yet, as a JSON array of node objects. Mount them, then call
    /// [`SlateCanvas::repaint`].
    pub fn take_mount_requests(&mut self) -> String {
        let store = self.workspace.store();
        let nodes: Vec<&Node> = self
            .surface
            .take_missing()
            .into_iter()
            .filter_map(|id| store.node(id))
            .collect();
        serde_json::to_string(&nodes).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn get_nodes_json(&self) -> String {
        serde_json::to_string(self.workspace.store().nodes()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// `true` once after saved state changed; the host then saves
    /// [`SlateCanvas::snapshot_json`].
    pub fn take_persist_request(&mut self) -> bool {
        self.workspace.take_persist_request()
    }

    /// Swap in a canvas record. Returns `false` on malformed JSON.
    pub fn load_json(&mut self, json: &str) -> bool {
        match CanvasRecord::from_json(json) {
            Ok(record) => {
                self.workspace.load(&record);
                self.workspace.paint(&mut self.surface);
                true
            }
            Err(e) => {
                log::warn!("failed to load canvas: {e}");
                false
            }
        }
    }

    pub fn snapshot_json(&self, name: &str) -> String {
        let now = js_sys::Date::now() as u64;
        self.workspace
            .snapshot(name, now)
            .to_json()
            .unwrap_or_else(|e| {
                log::error!("failed to encode canvas: {e}");
                String::new()
            })
    }

    /// Tear down store subscriptions.
    pub fn dispose(&mut self) {
        self.workspace.store_mut().dispose();
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl SlateCanvas {
    fn dispatch(&mut self, event: InputEvent) -> String {
        let outcome = self.workspace.handle(event, &mut self.surface);
        outcome_json(&outcome)
    }

    fn classify(&self, target: Option<&Element>) -> PointerTarget {
        match target {
            Some(el) => classify(&element_chain(el, Some(self.surface.container()))),
            None => PointerTarget::Background,
        }
    }

    fn touches(&self, coords: &[f64]) -> Touches {
        parse_touches(coords)
            .into_iter()
            .map(|p| {
                let (x, y) = self.surface.to_local(p.x, p.y);
                Point::new(x, y)
            })
            .collect()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

/// Pair up a flat coordinate list; a trailing odd value is dropped.
fn parse_touches(coords: &[f64]) -> Touches {
    coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

fn outcome_json(outcome: &Outcome) -> String {
    serde_json::json!({
        "changed": outcome.changed,
        "persist": outcome.persist,
        "preventDefault": outcome.prevent_default,
        "blur": outcome.blur,
        "action": outcome.action.map(|a| a.name()),
    })
    .to_string()
}

/// `performance.now()`, the time base of animation-frame timestamps.
fn frame_clock() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Set up a panic hook that logs to console.error.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Slate WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
