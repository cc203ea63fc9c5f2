//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep, clamped per frame
//! - Injected or seeded random source only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collectible;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::{Clock, FrameTime};
pub use collision::Rect;
pub use generator::{Spawn, spawn_obstacle};
pub use rng::{RandomSource, SequenceRng};
pub use snapshot::{CollectibleView, ObstacleView, Snapshot};
pub use state::{
    Collectible, GameEvent, GamePhase, GameState, Gap, Obstacle, PhaseTrigger, RunState, Solid,
    Vehicle,
};
pub use tick::{TickInput, tick};
