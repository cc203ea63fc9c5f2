//! Data-driven game balance
//!
//! Every constant the simulation uses lives in [`Tuning`]. Values can be
//! overridden from a JSON document; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::TuningError;

/// Playfield size in CSS pixels, supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ===
    /// Obstacle scroll speed at score 0 (px/s)
    pub base_speed: f32,
    /// Extra scroll speed per point (px/s)
    pub speed_per_score: f32,
    /// Gap height at score 0 (px)
    pub gap_base: f32,
    /// Gap height floor (px)
    pub gap_min: f32,
    /// Gap shrink per point (px)
    pub gap_shrink_per_score: f32,

    // === Spawning ===
    /// Wall-clock time between obstacle spawns (ms)
    pub spawn_interval_ms: f64,
    pub obstacle_width: f32,
    /// Spawn position past the right edge of the viewport
    pub spawn_offset_x: f32,
    /// Gap centers stay this far from the top and bottom edges
    pub margin: f32,
    /// Minimum thickness of the top and bottom solids
    pub min_solid: f32,

    // === Gap smoothing ===
    /// Blend weight toward the new random center (0 = stay, 1 = jump)
    pub smoothing_factor: f32,
    pub jitter: f32,
    pub spike_chance: f32,
    pub spike: f32,

    // === Double gaps ===
    pub double_gap_min_score: u32,
    pub double_gap_chance: f32,
    /// Spawns that must pass before another double gap
    pub double_gap_cooldown: u32,
    pub double_gap_sep_extra_min: f32,
    pub double_gap_sep_extra_max: f32,
    /// Minimum thickness of the solid between two gaps
    pub min_middle_solid: f32,

    // === Physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Velocity set by a flap (px/s, negative is up)
    pub flap_velocity: f32,
    /// Flap impulse multiplier while slow motion is active
    pub slow_motion_flap_factor: f32,

    // === Vehicle ===
    /// Fixed horizontal position as a fraction of viewport width
    pub vehicle_x_fraction: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    /// Hit-box inset from the visual bounds
    pub hitbox_inset_x: f32,
    pub hitbox_inset_y: f32,
    /// How far past the top/bottom edge the vehicle may go before crashing
    pub bounds_tolerance: f32,

    // === Collectible ===
    pub collectible_radius: f32,
    /// Vehicle pickup radius added to the collectible radius
    pub pickup_radius: f32,
    /// A collectible is armed every N consecutive clears
    pub collectible_every: u32,
    pub collectible_jitter_max: f32,
    pub collectible_jitter_frac: f32,
    /// Keep the collectible this far inside its gap
    pub collectible_gap_margin: f32,
    /// Horizontal placement inside the obstacle, as a fraction of its width
    pub collectible_offset_frac: f32,

    // === Time ===
    /// Timescale while slow motion is active
    pub slow_motion_scale: f32,
    pub slow_motion_ms: f64,
    /// Upper bound on a single frame delta (ms)
    pub max_frame_dt_ms: f64,

    // === Cleanup ===
    /// Obstacles are dropped once `x + width` falls below this
    pub obstacle_despawn_x: f32,
    pub collectible_despawn_x: f32,

    // === Phases ===
    /// A flap after a crash restarts only after this delay (ms)
    pub crash_ack_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 195.0,
            speed_per_score: 2.6,
            gap_base: 235.0,
            gap_min: 185.0,
            gap_shrink_per_score: 0.38,

            spawn_interval_ms: 1450.0,
            obstacle_width: 86.0,
            spawn_offset_x: 80.0,
            margin: 110.0,
            min_solid: 40.0,

            smoothing_factor: 0.55,
            jitter: 42.0,
            spike_chance: 0.22,
            spike: 85.0,

            double_gap_min_score: 6,
            double_gap_chance: 0.14,
            double_gap_cooldown: 2,
            double_gap_sep_extra_min: 80.0,
            double_gap_sep_extra_max: 140.0,
            min_middle_solid: 55.0,

            gravity: 1500.0,
            flap_velocity: -520.0,
            slow_motion_flap_factor: 0.88,

            vehicle_x_fraction: 0.22,
            vehicle_width: 56.0,
            vehicle_height: 40.0,
            hitbox_inset_x: 8.0,
            hitbox_inset_y: 6.0,
            bounds_tolerance: 50.0,

            collectible_radius: 14.0,
            pickup_radius: 16.0,
            collectible_every: 10,
            collectible_jitter_max: 70.0,
            collectible_jitter_frac: 0.20,
            collectible_gap_margin: 22.0,
            collectible_offset_frac: 0.55,

            slow_motion_scale: 0.62,
            slow_motion_ms: 5000.0,
            max_frame_dt_ms: 33.0,

            obstacle_despawn_x: -160.0,
            collectible_despawn_x: -80.0,

            crash_ack_ms: 500.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Smallest viewport height that fits every obstacle layout
    pub fn required_height(&self) -> f32 {
        let double_stack = 2.0 * self.min_solid + 2.0 * self.gap_base + self.min_middle_solid;
        let margin_band = 2.0 * self.margin + self.gap_base + 2.0 * self.min_solid;
        double_stack.max(margin_band)
    }

    /// Check the tuning against a viewport
    ///
    /// Anything rejected here would otherwise produce degenerate layouts.
    pub fn validate(&self, viewport: Viewport) -> Result<(), TuningError> {
        if self.gap_min > self.gap_base {
            return Err(TuningError::GapFloorAboveBase {
                min: self.gap_min,
                base: self.gap_base,
            });
        }

        let positive: [(&'static str, f64); 12] = [
            ("base_speed", self.base_speed as f64),
            ("gap_min", self.gap_min as f64),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("obstacle_width", self.obstacle_width as f64),
            ("min_solid", self.min_solid as f64),
            ("min_middle_solid", self.min_middle_solid as f64),
            ("vehicle_width", self.vehicle_width as f64),
            ("vehicle_height", self.vehicle_height as f64),
            ("collectible_radius", self.collectible_radius as f64),
            ("slow_motion_ms", self.slow_motion_ms),
            ("max_frame_dt_ms", self.max_frame_dt_ms),
            ("viewport.width", viewport.width as f64),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let probabilities = [
            ("smoothing_factor", self.smoothing_factor),
            ("spike_chance", self.spike_chance),
            ("double_gap_chance", self.double_gap_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::NotProbability { field, value });
            }
        }

        if !(self.slow_motion_scale > 0.0 && self.slow_motion_scale <= 1.0) {
            return Err(TuningError::SlowMotionScale(self.slow_motion_scale));
        }

        if self.double_gap_sep_extra_min > self.double_gap_sep_extra_max {
            return Err(TuningError::SeparationRange {
                min: self.double_gap_sep_extra_min,
                max: self.double_gap_sep_extra_max,
            });
        }

        // Gap centers never fall inside a floored solid
        if self.margin < self.min_solid {
            return Err(TuningError::MarginBelowSolid {
                margin: self.margin,
                min_solid: self.min_solid,
            });
        }

        let required = self.required_height();
        if viewport.height < required {
            return Err(TuningError::ViewportTooSmall {
                height: viewport.height,
                required,
            });
        }

        if self.gap_min <= 2.0 * self.collectible_gap_margin {
            return Err(TuningError::GapTooSmallForCollectible {
                gap: self.gap_min,
                margin: self.collectible_gap_margin,
            });
        }

        if self.collectible_every == 0 {
            return Err(TuningError::CollectibleEvery);
        }

        Ok(())
    }
}
