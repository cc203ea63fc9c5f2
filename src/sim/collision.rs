//! Collision detection for axis-aligned rectangles and circles
//!
//! All obstacle geometry is rectangular: the vehicle is tested as an inset
//! hit-box against every solid of every obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Vehicle};
use crate::tuning::Tuning;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            w: (self.w - 2.0 * dx).max(0.0),
            h: (self.h - 2.0 * dy).max(0.0),
        }
    }

    /// Strict overlap: rectangles sharing only an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Visual bounds of the vehicle
pub fn vehicle_rect(vehicle: &Vehicle, tuning: &Tuning) -> Rect {
    Rect::new(
        vehicle.x,
        vehicle.y - tuning.vehicle_height * 0.5,
        tuning.vehicle_width,
        tuning.vehicle_height,
    )
}

/// Forgiving hit-box, inset from the visual bounds
pub fn vehicle_hitbox(vehicle: &Vehicle, tuning: &Tuning) -> Rect {
    vehicle_rect(vehicle, tuning).inset(tuning.hitbox_inset_x, tuning.hitbox_inset_y)
}

/// Vehicle has left the playfield through the top or bottom
pub fn out_of_bounds(rect: &Rect, viewport_height: f32, tolerance: f32) -> bool {
    rect.y < -tolerance || rect.bottom() > viewport_height + tolerance
}

/// First solid of `obstacle` that the hit-box overlaps
pub fn hits_obstacle(hitbox: &Rect, obstacle: &Obstacle) -> Option<Rect> {
    obstacle.solid_rects().find(|solid| hitbox.overlaps(solid))
}

/// Circles at `a` and `b` are closer than `radius_sum`
#[inline]
pub fn circle_contact(a: Vec2, b: Vec2, radius_sum: f32) -> bool {
    a.distance_squared(b) < radius_sum * radius_sum
}
