//! Viewport controller: wheel zoom, drag panning, and pinch gestures.
//!
//! All writes go through the store, which clamps the scale. Every function
//! here returns whether the viewport actually changed.

use kurbo::{Point, Size, Vec2};
use slate_core::store::Store;
use slate_core::transform::ViewTransform;

use crate::input::Modifiers;

/// Snapshot taken when a second finger lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    pub start_distance: f64,
    pub start_scale: f64,
    pub start_center: Point,
    /// World point under the start midpoint; stays under the midpoint.
    pub world_center: Point,
}

/// Multiply the scale by `factor`, keeping the world point under `anchor`
/// (screen space) fixed.
pub fn zoom_about(store: &mut Store, anchor: Point, factor: f64) -> bool {
    if !(factor.is_finite() && factor > 0.0) {
        return false;
    }
    let view = store.view();
    let new_scale = store.config().clamp_scale(view.scale * factor);
    if new_scale == view.scale {
        return false;
    }
    store.set_view(view.zoomed_about(anchor, new_scale));
    true
}

pub fn pan_by(store: &mut Store, delta: Vec2) -> bool {
    if delta == Vec2::ZERO {
        return false;
    }
    let pan = store.pan();
    store.set_pan(pan + delta);
    true
}

/// Handle a wheel event.
///
/// With the precision-zoom modifier (Ctrl/⌘, which is also what trackpad
/// pinch reports) each event scales by `e^±step` about the cursor; scrolling
/// up zooms in. Without it the wheel pans the canvas.
pub fn wheel(store: &mut Store, pos: Point, delta: Vec2, modifiers: Modifiers) -> bool {
    if modifiers.cmd() {
        let step = store.config().wheel_zoom_step;
        let factor = if delta.y < 0.0 {
            step.exp()
        } else if delta.y > 0.0 {
            (-step).exp()
        } else {
            return false;
        };
        zoom_about(store, pos, factor)
    } else if modifiers.shift && delta.x == 0.0 {
        // Shift+wheel scrolls horizontally.
        pan_by(store, Vec2::new(-delta.y, 0.0))
    } else {
        pan_by(store, -delta)
    }
}

/// Start a two-finger pinch. `None` if the fingers coincide.
pub fn begin_pinch(store: &Store, a: Point, b: Point) -> Option<PinchState> {
    let start_distance = a.distance(b);
    if start_distance < f64::EPSILON {
        return None;
    }
    let start_center = a.midpoint(b);
    Some(PinchState {
        start_distance,
        start_scale: store.scale(),
        start_center,
        world_center: store.view().screen_to_world(start_center),
    })
}

/// Apply the current finger positions: scale follows the distance ratio,
/// pan keeps the starting world midpoint under the current midpoint.
pub fn update_pinch(store: &mut Store, pinch: &PinchState, a: Point, b: Point) -> bool {
    let distance = a.distance(b);
    if distance < f64::EPSILON {
        return false;
    }
    let scale = store
        .config()
        .clamp_scale(pinch.start_scale * distance / pinch.start_distance);
    let center = a.midpoint(b);
    let pan = center.to_vec2() - pinch.world_center.to_vec2() * scale;
    let before = store.view();
    store.set_view(ViewTransform::new(pan, scale));
    store.view() != before
}

/// Target for zooming by `factor` about the middle of the view.
pub fn zoom_target(store: &Store, view_size: Size, factor: f64) -> ViewTransform {
    let view = store.view();
    let center = Point::new(view_size.width / 2.0, view_size.height / 2.0);
    view.zoomed_about(center, store.config().clamp_scale(view.scale * factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_wheel_pans() {
        let mut store = Store::default();
        assert!(wheel(
            &mut store,
            Point::ZERO,
            Vec2::new(10.0, 20.0),
            Modifiers::NONE
        ));
        assert_eq!(store.pan(), Vec2::new(-10.0, -20.0));
        assert_eq!(store.scale(), 1.0);
    }

    #[test]
    fn precision_wheel_zooms_in_on_scroll_up() {
        let mut store = Store::default();
        wheel(
            &mut store,
            Point::new(50.0, 50.0),
            Vec2::new(0.0, -3.0),
            Modifiers::CTRL,
        );
        assert!((store.scale() - 0.1f64.exp()).abs() < 1e-12);
        wheel(
            &mut store,
            Point::new(50.0, 50.0),
            Vec2::new(0.0, 3.0),
            Modifiers::CTRL,
        );
        assert!((store.scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_at_limit_reports_no_change() {
        let mut store = Store::default();
        store.set_scale(5.0);
        assert!(!zoom_about(&mut store, Point::ZERO, 2.0));
    }

    #[test]
    fn pinch_scales_by_distance_ratio() {
        let mut store = Store::default();
        let pinch = begin_pinch(&store, Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        update_pinch(&mut store, &pinch, Point::new(-50.0, 0.0), Point::new(150.0, 0.0));
        assert_eq!(store.scale(), 2.0);
        // Start midpoint (50, 0) stays under the unchanged midpoint.
        let world = store.view().screen_to_world(Point::new(50.0, 0.0));
        assert!((world.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_midpoint_translation_pans() {
        let mut store = Store::default();
        let pinch = begin_pinch(&store, Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        update_pinch(&mut store, &pinch, Point::new(30.0, 40.0), Point::new(130.0, 40.0));
        assert_eq!(store.scale(), 1.0);
        assert_eq!(store.pan(), Vec2::new(30.0, 40.0));
    }

    #[test]
    fn pinch_is_clamped() {
        let mut store = Store::default();
        let pinch = begin_pinch(&store, Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        update_pinch(&mut store, &pinch, Point::new(0.0, 0.0), Point::new(10_000.0, 0.0));
        assert_eq!(store.scale(), 5.0);
        update_pinch(&mut store, &pinch, Point::new(0.0, 0.0), Point::new(0.01, 0.0));
        assert_eq!(store.scale(), 0.1);
    }

    #[test]
    fn coincident_fingers_do_not_pinch() {
        let store = Store::default();
        assert!(begin_pinch(&store, Point::new(5.0, 5.0), Point::new(5.0, 5.0)).is_none());
    }
}
