//! Read-only view of the simulation for renderers and HUDs

use serde::Serialize;

use super::clock;
use super::collision::{Rect, vehicle_rect};
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub x: f32,
    pub width: f32,
    pub solids: Vec<Rect>,
    pub is_double: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectibleView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alive: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub vehicle: Rect,
    pub vehicle_vy: f32,
    pub obstacles: Vec<ObstacleView>,
    pub collectible: Option<CollectibleView>,
    pub score: u32,
    pub combo: u32,
    pub best_score: u32,
    /// Slow-motion time left, 0..1
    pub slow_motion_remaining: f32,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        Self {
            phase: state.phase,
            vehicle: vehicle_rect(&state.vehicle, &state.tuning),
            vehicle_vy: state.vehicle.vy,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    width: o.width,
                    solids: o.solid_rects().collect(),
                    is_double: o.is_double,
                })
                .collect(),
            collectible: state.collectible.map(|c| CollectibleView {
                x: c.pos.x,
                y: c.pos.y,
                radius: c.radius,
                alive: c.alive,
            }),
            score: state.run.score,
            combo: state.run.combo,
            best_score: state.best_score,
            slow_motion_remaining: clock::slow_motion_remaining(
                &state.tuning,
                now_ms,
                state.run.slow_motion_until,
            ),
        }
    }

    /// JSON for hosts that render outside Rust
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
