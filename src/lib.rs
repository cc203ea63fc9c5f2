//! Rocket Gap - a one-button arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle generation, scoring, game phase)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Key-value storage for best score and settings
//! - `highscores`: Leaderboard seam and local top-N table
//! - `audio`: Event to sound cue mapping
//! - `game`: Host shell wiring the simulation to its collaborators

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LeaderboardError, StorageError, TransitionError, TuningError};
pub use game::Game;
pub use highscores::{Leaderboard, LocalLeaderboard, ScoreEntry};
pub use settings::Settings;
pub use tuning::{Tuning, Viewport};

/// Game configuration constants
pub mod consts {
    /// Default viewport (landscape, CSS pixels)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Nominal frame length used by the headless runner (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Vehicle start height as a fraction of viewport height
    pub const VEHICLE_START_FRACTION: f32 = 0.45;

    /// Idle bob: amplitude (px) and angular rate (radians per ms)
    pub const IDLE_BOB_AMPLITUDE: f32 = 12.0;
    pub const IDLE_BOB_RATE: f64 = 0.003;

    /// Leaderboard size shown on the menu
    pub const LEADERBOARD_SIZE: usize = 5;
}

/// Clamp `value` into `[lo, hi]` without panicking when the band is inverted.
///
/// An inverted band collapses to its midpoint.
#[inline]
pub fn clamp_band(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) * 0.5;
    }
    value.max(lo).min(hi)
}
