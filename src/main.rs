//! Rocket Gap headless runner
//!
//! Plays the game on autopilot at a fixed frame rate and logs the results.
//!
//! Usage: `rocket-gap [--tuning FILE] [--seed N] [--seconds N] [--save FILE] [--nickname NAME]`
//!
//! Set `RUST_LOG=debug` to see every spawn and pickup.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rocket_gap::consts::FRAME_MS;
use rocket_gap::persistence::{FileStorage, MemoryStorage, Storage};
use rocket_gap::sim::{GameEvent, GameState, TickInput};
use rocket_gap::{Game, LocalLeaderboard, Tuning, Viewport};

#[derive(Debug, Parser)]
#[command(name = "rocket-gap", about = "Play Rocket Gap on autopilot and log the results")]
struct Options {
    /// JSON tuning file; built-in balance when omitted
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Seed for obstacle layout
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated play time
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
    /// JSON file holding settings and the best score
    #[arg(long)]
    save: Option<PathBuf>,
    #[arg(long, default_value = "autopilot")]
    nickname: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();

    let tuning = match &options.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Invalid tuning {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut state = match GameState::new(options.seed, tuning, Viewport::default()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    state.set_nickname(options.nickname.clone());

    let storage: Box<dyn Storage> = match &options.save {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::new()),
    };
    let mut game = Game::new(state, Box::new(LocalLeaderboard::default()), storage);

    log::info!(
        "Rocket Gap headless run: seed {}, {:.0}s of play",
        options.seed,
        options.seconds
    );

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let frames = (options.seconds * 1000.0 / FRAME_MS).ceil() as u64;
    let mut runs = 0u32;
    let mut pickups = 0u32;

    for frame in 0..frames {
        let now_ms = frame as f64 * FRAME_MS;
        for event in game.frame(now_ms, &input) {
            match event {
                GameEvent::Crashed { .. } => runs += 1,
                GameEvent::CollectiblePickup => pickups += 1,
                _ => {}
            }
        }
        // Nothing plays the sound; keep the queue from growing
        game.audio_mut().drain_tones();
    }

    let snapshot = game.snapshot(frames as f64 * FRAME_MS);
    log::info!(
        "Finished: {} crashes, {} pickups, current score {}, best {}",
        runs,
        pickups,
        snapshot.score,
        snapshot.best_score
    );
    match game.leaderboard().top(5) {
        Ok(top) => {
            for (i, entry) in top.iter().enumerate() {
                log::info!("  #{} {:<10} {}", i + 1, entry.nickname, entry.score);
            }
        }
        Err(e) => log::warn!("Leaderboard unavailable: {}", e),
    }

    ExitCode::SUCCESS
}
