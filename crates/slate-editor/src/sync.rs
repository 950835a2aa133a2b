//! Store ↔ gesture-library transform sync.
//!
//! Hosts that drive zoom/pan with an external gesture library (a d3-zoom
//! style `{k, x, y}` transform) need both directions: programmatic changes
//! (animations, canvas switches) must reach the library, and library-driven
//! changes must reach the store. Writing both ways unguarded loops forever,
//! because each side echoes the other's update back.
//!
//! [`ZoomSync`] tracks the transform it believes the library holds. A push
//! is emitted only when the store drifted from that belief by more than the
//! epsilon; a pull writes the store only when the library drifted from the
//! store by more than the epsilon. An echo therefore dies after one hop.

use kurbo::Vec2;
use slate_core::config::CanvasConfig;
use slate_core::store::Store;
use slate_core::transform::ViewTransform;

/// The gesture library's transform: scale `k`, translation `x`, `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ZoomTransform {
    pub fn from_view(view: ViewTransform) -> Self {
        Self {
            k: view.scale,
            x: view.pan.x,
            y: view.pan.y,
        }
    }

    pub fn to_view(self) -> ViewTransform {
        ViewTransform::new(Vec2::new(self.x, self.y), self.k)
    }
}

#[derive(Debug, Clone)]
pub struct ZoomSync {
    library: Option<ZoomTransform>,
    scale_epsilon: f64,
    pan_epsilon: f64,
}

impl ZoomSync {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            library: None,
            scale_epsilon: config.scale_epsilon,
            pan_epsilon: config.pan_epsilon,
        }
    }

    fn differs(&self, a: ZoomTransform, b: ZoomTransform) -> bool {
        (a.k - b.k).abs() > self.scale_epsilon
            || (a.x - b.x).abs() > self.pan_epsilon
            || (a.y - b.y).abs() > self.pan_epsilon
    }

    /// Store → library. Returns the transform to apply to the library, or
    /// `None` if it is already close enough.
    pub fn push(&mut self, store: &Store) -> Option<ZoomTransform> {
        let current = ZoomTransform::from_view(store.view());
        if let Some(lib) = self.library
            && !self.differs(current, lib)
        {
            return None;
        }
        self.library = Some(current);
        log::trace!("zoom sync push k={} x={} y={}", current.k, current.x, current.y);
        Some(current)
    }

    /// Library → store. Returns whether the store was written.
    pub fn pull(&mut self, incoming: ZoomTransform, store: &mut Store) -> bool {
        self.library = Some(incoming);
        let current = ZoomTransform::from_view(store.view());
        if !self.differs(incoming, current) {
            return false;
        }
        store.set_view(incoming.to_view());
        true
    }

    /// Forget the library state (e.g. the library was re-created).
    pub fn reset(&mut self) {
        self.library = None;
    }
}
