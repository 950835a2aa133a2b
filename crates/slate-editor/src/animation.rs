//! Camera animation.
//!
//! One flight at a time; starting a new one or any user gesture cancels the
//! current one. The host drives it with [`CameraAnimator::tick`] from its
//! frame callback. A flight's clock starts at the `now_ms` passed to
//! `animate_to`, which must share a time base with the frame timestamps.

use kurbo::Vec2;
use slate_core::store::Store;
use slate_core::transform::ViewTransform;

pub type Easing = fn(f64) -> f64;

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from: ViewTransform,
    to: ViewTransform,
    duration_ms: f64,
    started_at: f64,
}

#[derive(Debug, Clone)]
pub struct CameraAnimator {
    easing: Option<Easing>,
    flight: Option<Flight>,
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self {
            easing: Some(ease_out_cubic),
            flight: None,
        }
    }

    /// An animator for hosts without frame callbacks: every target is
    /// applied immediately.
    pub fn without_easing() -> Self {
        Self {
            easing: None,
            flight: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.flight.is_some()
    }

    /// Stop the current flight where it is.
    pub fn cancel(&mut self) -> bool {
        let was = self.flight.take().is_some();
        if was {
            log::trace!("camera animation cancelled");
        }
        was
    }

    /// Fly to `scale`/`pan` over `duration_ms`, starting at `now_ms`. The
    /// target scale is clamped. Returns `true` if the store was written
    /// immediately.
    pub fn animate_to(
        &mut self,
        store: &mut Store,
        scale: f64,
        pan: Vec2,
        duration_ms: f64,
        now_ms: f64,
    ) -> bool {
        self.cancel();
        let to = ViewTransform::new(pan, store.config().clamp_scale(scale));
        let from = store.view();
        if from == to {
            return false;
        }
        if self.easing.is_none() || duration_ms <= 0.0 {
            if self.easing.is_none() {
                log::warn!("camera animation unavailable; applying view change instantly");
            }
            store.set_view(to);
            return true;
        }
        log::debug!(
            "camera flight scale {} -> {} over {duration_ms}ms",
            from.scale,
            to.scale
        );
        self.flight = Some(Flight {
            from,
            to,
            duration_ms,
            started_at: now_ms,
        });
        false
    }

    /// Advance the flight to `now_ms`. Returns whether the store changed.
    pub fn tick(&mut self, store: &mut Store, now_ms: f64) -> bool {
        let Some(flight) = self.flight.as_ref() else {
            return false;
        };
        let Some(easing) = self.easing else {
            return false;
        };
        let flight = *flight;
        let progress = ((now_ms - flight.started_at) / flight.duration_ms).clamp(0.0, 1.0);
        let t = easing(progress).clamp(0.0, 1.0);

        let view = if progress >= 1.0 || t >= 1.0 {
            self.flight = None;
            flight.to
        } else {
            ViewTransform::new(
                flight.from.pan + (flight.to.pan - flight.from.pan) * t,
                flight.from.scale + (flight.to.scale - flight.from.scale) * t,
            )
        };

        let before = store.view();
        store.batch(|s| s.set_view(view));
        store.view() != before
    }
}
