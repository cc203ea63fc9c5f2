//! Game state and core simulation types
//!
//! Everything the tick routine touches lives in [`GameState`]. There are no
//! globals: hosts own a `GameState` and feed it input and timestamps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::{self, Clock};
use super::collision::Rect;
use super::rng::{self, RandomSource};
use super::snapshot::Snapshot;
use crate::consts::VEHICLE_START_FRACTION;
use crate::error::{TransitionError, TuningError};
use crate::tuning::{Tuning, Viewport};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu: vehicle bobs in place, nothing simulated
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen
    Crashed,
}

/// What caused a phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseTrigger {
    Flap,
    Retry,
    Collision,
    OutOfBounds,
    Menu,
}

impl GamePhase {
    /// Resolve a transition, rejecting anything the state machine does not allow
    pub fn next(self, trigger: PhaseTrigger) -> Result<GamePhase, TransitionError> {
        use GamePhase::*;
        use PhaseTrigger::*;

        match (self, trigger) {
            (Idle, Flap) => Ok(Playing),
            (Playing, Collision | OutOfBounds) => Ok(Crashed),
            (Crashed, Flap | Retry) => Ok(Playing),
            (Crashed, Menu) => Ok(Idle),
            (from, trigger) => Err(TransitionError { from, trigger }),
        }
    }
}

/// The player's vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Left edge (fixed while playing)
    pub x: f32,
    /// Vertical center
    pub y: f32,
    /// Vertical velocity (px/s, positive is down)
    pub vy: f32,
}

impl Vehicle {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, vy: 0.0 }
    }
}

/// A solid (non-passable) band of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub y: f32,
    pub height: f32,
}

/// A passable opening of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub top: f32,
    pub bottom: f32,
    /// Generator's target; off the midpoint when a floored solid trims the gap
    pub center: f32,
}

impl Gap {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            center: (top + bottom) * 0.5,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A column of solids with one or two gaps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    /// Top to bottom
    pub solids: Vec<Solid>,
    /// Top to bottom
    pub gaps: Vec<Gap>,
    /// Already counted toward the score
    pub scored: bool,
    pub is_double: bool,
}

impl Obstacle {
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Solids as world-space rectangles
    pub fn solid_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.solids
            .iter()
            .map(move |s| Rect::new(self.x, s.y, self.width, s.height))
    }
}

/// The slow-motion bonus pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
}

/// Per-run bookkeeping, cleared on every reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    /// Consecutive clears without a crash
    pub combo: u32,
    /// Slow motion lasts while `now < slow_motion_until`
    pub slow_motion_until: Option<f64>,
    pub last_spawn_ms: f64,
    /// Gap center of the previous obstacle, for smoothing
    pub last_gap_center: Option<f32>,
    /// Spawns left before a double gap is allowed again
    pub double_gap_cooldown: u32,
    /// Next spawn carries a collectible
    pub collectible_pending: bool,
    /// Best score when the run began
    pub best_at_start: u32,
    pub started_at_ms: f64,
    pub crashed_at_ms: Option<f64>,
}

impl RunState {
    pub fn new(now_ms: f64, best_score: u32) -> Self {
        Self {
            score: 0,
            combo: 0,
            slow_motion_until: None,
            last_spawn_ms: now_ms,
            last_gap_center: None,
            double_gap_cooldown: 0,
            collectible_pending: false,
            best_at_start: best_score,
            started_at_ms: now_ms,
            crashed_at_ms: None,
        }
    }
}

/// Notifications for presentation collaborators, emitted by the tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Flap,
    ObstacleCleared { score: u32, combo: u32 },
    /// Combo milestone reached: the next obstacle will carry a collectible
    CollectibleArmed,
    CollectiblePickup,
    SlowMotion { until_ms: f64 },
    Crashed {
        nickname: String,
        score: u32,
        best_score: u32,
        new_best: bool,
    },
    /// Menu entered: host may fetch the leaderboard (non-blocking)
    LeaderboardRequested,
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    /// Seed of the random source (0 when injected)
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub vehicle: Vehicle,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub collectible: Option<Collectible>,
    pub run: RunState,
    /// Survives across runs
    pub best_score: u32,
    /// Already sanitized by the caller
    pub nickname: String,
    pub clock: Clock,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Box<dyn RandomSource>,
    next_id: u32,
}

impl GameState {
    /// Create a game seeded with `seed`; fails on invalid tuning
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Result<Self, TuningError> {
        let mut state = Self::with_rng(Box::new(rng::seeded(seed)), tuning, viewport)?;
        state.seed = seed;
        Ok(state)
    }

    /// Create a game drawing from an injected random source
    pub fn with_rng(
        rng: Box<dyn RandomSource>,
        tuning: Tuning,
        viewport: Viewport,
    ) -> Result<Self, TuningError> {
        tuning.validate(viewport)?;

        let vehicle = Vehicle::new(
            viewport.width * tuning.vehicle_x_fraction,
            viewport.height * VEHICLE_START_FRACTION,
        );
        Ok(Self {
            seed: 0,
            tuning,
            viewport,
            phase: GamePhase::Idle,
            vehicle,
            obstacles: Vec::new(),
            collectible: None,
            run: RunState::new(0.0, 0),
            best_score: 0,
            nickname: String::new(),
            clock: Clock::new(),
            events: Vec::new(),
            rng,
            next_id: 1,
        })
    }

    /// Apply a new viewport; the tuning must still fit
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), TuningError> {
        self.tuning.validate(viewport)?;
        self.viewport = viewport;
        self.vehicle.x = viewport.width * self.tuning.vehicle_x_fraction;
        Ok(())
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Seed the best score (e.g. from storage); never lowers it
    pub fn set_best_score(&mut self, best: u32) {
        self.best_score = self.best_score.max(best);
    }

    /// Events emitted by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move to the next phase or report why not
    pub fn transition(&mut self, trigger: PhaseTrigger) -> Result<GamePhase, TransitionError> {
        let next = self.phase.next(trigger)?;
        self.phase = next;
        Ok(next)
    }

    /// Clear all per-run state and entities
    ///
    /// Also drops any slow-motion window.
    pub fn reset_run(&mut self, now_ms: f64) {
        self.run = RunState::new(now_ms, self.best_score);
        self.vehicle = Vehicle::new(
            self.viewport.width * self.tuning.vehicle_x_fraction,
            self.viewport.height * VEHICLE_START_FRACTION,
        );
        self.obstacles.clear();
        self.collectible = None;
    }

    /// Slow motion in effect at `now_ms`
    pub fn slow_motion_active(&self, now_ms: f64) -> bool {
        clock::slow_motion_active(now_ms, self.run.slow_motion_until)
    }

    /// Read-only view for renderers
    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot::capture(self, now_ms)
    }
}
