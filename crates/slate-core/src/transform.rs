//! World ↔ screen coordinate mapping.
//!
//! The visual transform is applied as `translate(pan) scale(scale)` with a
//! `0 0` origin, so a world point `w` lands on screen at `w * scale + pan`.
//! Everything here is a pure function of the three viewport numbers.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan offset and uniform scale of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pan: Vec2,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        pan: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn new(pan: Vec2, scale: f64) -> Self {
        Self { pan, scale }
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        ((p.to_vec2() - self.pan) / self.scale).to_point()
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        (p.to_vec2() * self.scale + self.pan).to_point()
    }

    /// Pointer deltas shrink by the scale when moved into world space.
    pub fn screen_delta_to_world(&self, d: Vec2) -> Vec2 {
        d / self.scale
    }

    pub fn screen_rect_to_world(&self, r: Rect) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::new(r.x0, r.y0)),
            self.screen_to_world(Point::new(r.x1, r.y1)),
        )
    }

    /// The same mapping as an affine matrix (translate after scale).
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// CSS `transform` value for the world layer (`transform-origin: 0 0`).
    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan.x, self.pan.y, self.scale
        )
    }

    /// Change the scale while keeping the world point under `anchor` fixed.
    pub fn zoomed_about(&self, anchor: Point, new_scale: f64) -> Self {
        let world = self.screen_to_world(anchor);
        Self {
            pan: anchor.to_vec2() - world.to_vec2() * new_scale,
            scale: new_scale,
        }
    }

    /// Transform that centers `world` inside a view of `view` size, leaving
    /// `padding` screen pixels on each side. `clamp` bounds the scale.
    pub fn fit(world: Rect, view: Size, padding: f64, clamp: impl Fn(f64) -> f64) -> Option<Self> {
        let avail_w = view.width - padding * 2.0;
        let avail_h = view.height - padding * 2.0;
        if world.width() <= 0.0 || world.height() <= 0.0 || avail_w <= 0.0 || avail_h <= 0.0 {
            return None;
        }
        let scale = clamp((avail_w / world.width()).min(avail_h / world.height()));
        let center = world.center();
        let pan = Vec2::new(view.width / 2.0, view.height / 2.0) - center.to_vec2() * scale;
        Some(Self { pan, scale })
    }
}

/// AABB overlap: true unless `a` lies fully left, right, above, or below `b`.
/// Touching edges count as overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 > b.x1 || a.y1 < b.y0 || a.y0 > b.y1)
}
