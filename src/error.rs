//! Error types
//!
//! Configuration errors fail fast at startup. Storage errors belong to the
//! host and never reach the tick routine.

use thiserror::Error;

use crate::sim::state::{GamePhase, PhaseTrigger};

/// Invalid tuning or viewport
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("gap_min ({min}) must not exceed gap_base ({base})")]
    GapFloorAboveBase { min: f32, base: f32 },

    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be a probability in [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f32 },

    #[error("slow_motion_scale must be in (0, 1] (got {0})")]
    SlowMotionScale(f32),

    #[error("double gap separation range is inverted ({min} > {max})")]
    SeparationRange { min: f32, max: f32 },

    #[error("margin ({margin}) must be at least min_solid ({min_solid})")]
    MarginBelowSolid { margin: f32, min_solid: f32 },

    #[error("viewport height {height} is too small, need at least {required}")]
    ViewportTooSmall { height: f32, required: f32 },

    #[error("smallest gap ({gap}) cannot hold a collectible with margin {margin}")]
    GapTooSmallForCollectible { gap: f32, margin: f32 },

    #[error("collectible_every must be at least 1")]
    CollectibleEvery,

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read tuning file: {0}")]
    Read(#[from] std::io::Error),
}

/// A phase change that the state machine does not allow
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("illegal transition from {from:?} on {trigger:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub trigger: PhaseTrigger,
}

/// Key-value store failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Leaderboard service failure
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
