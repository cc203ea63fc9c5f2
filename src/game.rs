//! Host shell around the simulation
//!
//! Owns the [`GameState`] and its collaborators. After every tick the
//! emitted events are handed to audio, the leaderboard and storage. Their
//! failures are logged and dropped; nothing flows back into the tick.

use crate::audio::AudioManager;
use crate::consts::LEADERBOARD_SIZE;
use crate::highscores::{Leaderboard, ScoreEntry};
use crate::persistence::{self, Storage};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Snapshot, TickInput, tick};

#[derive(Debug)]
pub struct Game {
    state: GameState,
    settings: Settings,
    audio: AudioManager,
    leaderboard: Box<dyn Leaderboard>,
    storage: Box<dyn Storage>,
    /// Last leaderboard listing fetched for the menu
    top_scores: Vec<ScoreEntry>,
}

impl Game {
    /// Wire up a game, restoring settings and the best score from `storage`
    pub fn new(
        mut state: GameState,
        leaderboard: Box<dyn Leaderboard>,
        storage: Box<dyn Storage>,
    ) -> Self {
        let settings = Settings::load(storage.as_ref());
        match persistence::load_best_score(storage.as_ref()) {
            Ok(best) => state.set_best_score(best),
            Err(e) => log::warn!("Failed to load best score: {}", e),
        }

        let mut game = Self {
            state,
            audio: AudioManager::new(&settings),
            settings,
            leaderboard,
            storage,
            top_scores: Vec::new(),
        };
        game.refresh_leaderboard();
        game
    }

    /// Run one frame and dispatch its events
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> &[GameEvent] {
        tick(&mut self.state, input, now_ms);

        for event in &self.state.events {
            self.audio.on_event(event);

            match event {
                GameEvent::Crashed {
                    nickname,
                    score,
                    best_score,
                    new_best,
                } => {
                    match self.leaderboard.submit(nickname, *score) {
                        Ok(Some(rank)) => log::info!("{} placed #{} with {}", nickname, rank, score),
                        Ok(None) => {}
                        Err(e) => log::warn!("Score submission failed: {}", e),
                    }
                    if *new_best {
                        if let Err(e) = persistence::save_best_score(self.storage.as_mut(), *best_score) {
                            log::warn!("Failed to save best score: {}", e);
                        }
                    }
                }
                GameEvent::LeaderboardRequested => {
                    match self.leaderboard.top(LEADERBOARD_SIZE) {
                        Ok(top) => self.top_scores = top,
                        Err(e) => log::warn!("Leaderboard fetch failed: {}", e),
                    }
                }
                _ => {}
            }
        }

        self.state.events()
    }

    fn refresh_leaderboard(&mut self) {
        match self.leaderboard.top(LEADERBOARD_SIZE) {
            Ok(top) => self.top_scores = top,
            Err(e) => log::warn!("Leaderboard fetch failed: {}", e),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        self.state.snapshot(now_ms)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist preferences
    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        if let Err(e) = settings.save(self.storage.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.settings = settings;
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Leaderboard listing for the menu
    pub fn top_scores(&self) -> &[ScoreEntry] {
        &self.top_scores
    }

    pub fn leaderboard(&self) -> &dyn Leaderboard {
        self.leaderboard.as_ref()
    }
}
