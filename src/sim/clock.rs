//! Frame clock and slow-motion timescale
//!
//! Converts host timestamps into a clamped simulation delta. Slow motion is
//! a wall-clock window: while `now < until` every simulated quantity runs at
//! `slow_motion_scale`.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Timing for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Host timestamp (ms)
    pub now_ms: f64,
    /// Wall-clock delta after clamping (seconds)
    pub raw_dt: f32,
    /// Multiplier applied to `raw_dt`
    pub time_scale: f32,
    /// Simulation delta (seconds)
    pub dt: f32,
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    last_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock delta since the previous call, clamped to `[0, max_frame_dt_ms]` (seconds)
    ///
    /// The first call yields zero.
    pub fn advance(&mut self, now_ms: f64, max_frame_dt_ms: f64) -> f32 {
        let delta_ms = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, max_frame_dt_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        (delta_ms / 1000.0) as f32
    }

    /// Advance and apply the slow-motion timescale
    pub fn frame(&mut self, now_ms: f64, tuning: &Tuning, slow_until: Option<f64>) -> FrameTime {
        let raw_dt = self.advance(now_ms, tuning.max_frame_dt_ms);
        let time_scale = time_scale(tuning, now_ms, slow_until);
        FrameTime {
            now_ms,
            raw_dt,
            time_scale,
            dt: raw_dt * time_scale,
        }
    }
}

/// Whether slow motion is in effect at `now_ms`
#[inline]
pub fn slow_motion_active(now_ms: f64, until: Option<f64>) -> bool {
    until.is_some_and(|until| now_ms < until)
}

/// Current timescale multiplier
pub fn time_scale(tuning: &Tuning, now_ms: f64, until: Option<f64>) -> f32 {
    if slow_motion_active(now_ms, until) {
        tuning.slow_motion_scale
    } else {
        1.0
    }
}

/// Fraction of the slow-motion window left, in `[0, 1]`
pub fn slow_motion_remaining(tuning: &Tuning, now_ms: f64, until: Option<f64>) -> f32 {
    match until {
        Some(until) if now_ms < until => {
            ((until - now_ms) / tuning.slow_motion_ms).clamp(0.0, 1.0) as f32
        }
        _ => 0.0,
    }
}
