//! Per-frame simulation tick
//!
//! One tick per rendered frame. Within a tick the order is fixed: input,
//! physics, bounds and collision, scoring, collectible pickup, spawning,
//! cleanup. Presentation side effects are only recorded as [`GameEvent`]s.

use super::autopilot;
use super::clock::FrameTime;
use super::collectible;
use super::collision::{hits_obstacle, out_of_bounds, vehicle_hitbox, vehicle_rect};
use super::difficulty;
use super::generator::spawn_obstacle;
use super::state::{GameEvent, GamePhase, GameState, PhaseTrigger};
use crate::consts::{IDLE_BOB_AMPLITUDE, IDLE_BOB_RATE};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Discrete flap trigger (tap/click/space)
    pub flap: bool,
    /// Explicit retry from the crash screen
    pub retry: bool,
    /// Back to the menu from the crash screen
    pub menu: bool,
    /// Demo mode - the autopilot decides when to flap
    pub autopilot: bool,
}

/// Advance the game by one frame at host timestamp `now_ms`
///
/// Events from the previous tick are discarded; read [`GameState::events`]
/// after each call.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    state.events.clear();
    let frame = state
        .clock
        .frame(now_ms, &state.tuning, state.run.slow_motion_until);

    let mut input = input.clone();
    if input.autopilot {
        input.flap = autopilot::wants_flap(state, now_ms);
    }

    match state.phase {
        GamePhase::Idle => {
            idle_bob(state, now_ms);
            if input.flap {
                start_run(state, PhaseTrigger::Flap, now_ms);
                apply_flap(state, now_ms);
            }
        }

        GamePhase::Playing => step_playing(state, &input, &frame),

        GamePhase::Crashed => {
            let acknowledged = state
                .run
                .crashed_at_ms
                .is_some_and(|at| now_ms - at >= state.tuning.crash_ack_ms);

            if input.menu {
                if transition(state, PhaseTrigger::Menu) {
                    state.events.push(GameEvent::LeaderboardRequested);
                }
            } else if input.retry {
                start_run(state, PhaseTrigger::Retry, now_ms);
            } else if input.flap && acknowledged {
                start_run(state, PhaseTrigger::Flap, now_ms);
                apply_flap(state, now_ms);
            }
        }
    }
}

fn step_playing(state: &mut GameState, input: &TickInput, frame: &FrameTime) {
    let now_ms = frame.now_ms;
    let dt = frame.dt;

    // Input
    if input.flap {
        apply_flap(state, now_ms);
    }

    // Physics
    let tuning = &state.tuning;
    state.vehicle.vy += tuning.gravity * dt;
    state.vehicle.y += state.vehicle.vy * dt;

    let dx = difficulty::speed(tuning, state.run.score) * dt;
    for obstacle in &mut state.obstacles {
        obstacle.x -= dx;
    }
    if let Some(c) = state.collectible.as_mut() {
        collectible::advance(c, dx, tuning.collectible_despawn_x);
    }

    // Bounds
    let rect = vehicle_rect(&state.vehicle, tuning);
    if out_of_bounds(&rect, state.viewport.height, tuning.bounds_tolerance) {
        crash(state, PhaseTrigger::OutOfBounds, now_ms);
        return;
    }

    // Collision
    let hitbox = vehicle_hitbox(&state.vehicle, &state.tuning);
    if let Some(solid) = state
        .obstacles
        .iter()
        .find_map(|o| hits_obstacle(&hitbox, o))
    {
        log::debug!("Hit solid at y={:.0} h={:.0}", solid.y, solid.h);
        crash(state, PhaseTrigger::Collision, now_ms);
        return;
    }

    // Scoring: an obstacle counts once its trailing edge is behind the vehicle
    let vehicle_x = state.vehicle.x;
    for obstacle in &mut state.obstacles {
        if obstacle.scored || obstacle.trailing_edge() >= vehicle_x {
            continue;
        }
        obstacle.scored = true;

        let run = &mut state.run;
        run.score += 1;
        run.combo += 1;
        state.best_score = state.best_score.max(run.score);
        state.events.push(GameEvent::ObstacleCleared {
            score: run.score,
            combo: run.combo,
        });
        if collectible::on_combo(&state.tuning, run) {
            log::debug!("Combo {}: collectible armed", run.combo);
            state.events.push(GameEvent::CollectibleArmed);
        }
    }

    // Collectible pickup
    if let Some(c) = state.collectible.as_mut() {
        let center = rect.center();
        if let Some(until) = collectible::try_pickup(&state.tuning, center, c, &mut state.run, now_ms) {
            log::debug!("Collectible picked up, slow motion until {:.0}", until);
            state.events.push(GameEvent::CollectiblePickup);
            state.events.push(GameEvent::SlowMotion { until_ms: until });
        }
    }

    // Spawning
    let due = now_ms - state.run.last_spawn_ms > state.tuning.spawn_interval_ms;
    if state.obstacles.is_empty() || due {
        let id = state.next_entity_id();
        let spawn = spawn_obstacle(
            &state.tuning,
            state.viewport,
            &mut state.run,
            id,
            now_ms,
            state.rng.as_mut(),
        );
        state.obstacles.push(spawn.obstacle);
        if spawn.collectible.is_some() {
            state.collectible = spawn.collectible;
        }
    }

    // Cleanup
    let despawn_x = state.tuning.obstacle_despawn_x;
    state.obstacles.retain(|o| o.trailing_edge() > despawn_x);
    if state.collectible.is_some_and(|c| !c.alive) {
        state.collectible = None;
    }
}

/// Flap impulse; weaker while slow motion is active
fn apply_flap(state: &mut GameState, now_ms: f64) {
    let tuning = &state.tuning;
    state.vehicle.vy = if state.slow_motion_active(now_ms) {
        tuning.flap_velocity * tuning.slow_motion_flap_factor
    } else {
        tuning.flap_velocity
    };
    state.events.push(GameEvent::Flap);
}

/// Cosmetic hover while on the menu
fn idle_bob(state: &mut GameState, now_ms: f64) {
    state.vehicle.x = state.viewport.width * state.tuning.vehicle_x_fraction;
    state.vehicle.y =
        state.viewport.height * 0.5 + (now_ms * IDLE_BOB_RATE).sin() as f32 * IDLE_BOB_AMPLITUDE;
    state.vehicle.vy = 0.0;
}

fn start_run(state: &mut GameState, trigger: PhaseTrigger, now_ms: f64) {
    if !transition(state, trigger) {
        return;
    }
    state.reset_run(now_ms);
    state.events.push(GameEvent::RunStarted);
    log::info!(
        "Run started (seed {}, nickname {:?}, best {})",
        state.seed,
        state.nickname,
        state.best_score
    );
}

/// End the run: combo resets, pending spawns are cancelled
fn crash(state: &mut GameState, trigger: PhaseTrigger, now_ms: f64) {
    if !transition(state, trigger) {
        return;
    }

    let run = &mut state.run;
    run.combo = 0;
    run.collectible_pending = false;
    run.crashed_at_ms = Some(now_ms);
    state.best_score = state.best_score.max(run.score);
    let new_best = run.score > run.best_at_start;

    log::info!(
        "Crashed ({:?}) with score {} (best {}{})",
        trigger,
        run.score,
        state.best_score,
        if new_best { ", new best" } else { "" }
    );
    state.events.push(GameEvent::Crashed {
        nickname: state.nickname.clone(),
        score: run.score,
        best_score: state.best_score,
        new_best,
    });
}

fn transition(state: &mut GameState, trigger: PhaseTrigger) -> bool {
    match state.transition(trigger) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("{}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::layout_single;
    use crate::sim::rng::SequenceRng;
    use crate::sim::state::{Collectible, Obstacle};
    use crate::tuning::{Tuning, Viewport};
    use glam::Vec2;
    use proptest::prelude::*;

    const FLAP: TickInput = TickInput {
        flap: true,
        retry: false,
        menu: false,
        autopilot: false,
    };
    const NONE: TickInput = TickInput {
        flap: false,
        retry: false,
        menu: false,
        autopilot: false,
    };

    fn new_state(tuning: Tuning) -> GameState {
        GameState::new(12345, tuning, Viewport::default()).unwrap()
    }

    /// Start a run at t=0 and return the state in Playing
    fn playing(tuning: Tuning) -> GameState {
        let mut state = new_state(tuning);
        tick(&mut state, &FLAP, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// Vehicle hovers in place, nothing spawns on its own
    fn hover_tuning() -> Tuning {
        Tuning {
            gravity: 0.0,
            flap_velocity: 0.0,
            spawn_interval_ms: 1e9,
            ..Default::default()
        }
    }

    fn gap_around_vehicle(state: &GameState, id: u32, x: f32) -> Obstacle {
        layout_single(id, x, 86.0, state.vehicle.y, 235.0, state.viewport.height, 40.0)
    }

    fn crash_count(state: &GameState) -> usize {
        state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Crashed { .. }))
            .count()
    }

    #[test]
    fn test_idle_to_playing() {
        let mut state = new_state(Tuning::default());
        tick(&mut state, &NONE, 0.0);
        assert_eq!(state.phase, GamePhase::Idle);

        tick(&mut state, &FLAP, 16.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.vehicle.vy, state.tuning.flap_velocity);
        assert_eq!(state.events(), &[GameEvent::RunStarted, GameEvent::Flap]);
    }

    #[test]
    fn test_idle_bob_has_no_physics() {
        let mut state = new_state(Tuning::default());
        for i in 0..100 {
            tick(&mut state, &NONE, i as f64 * 16.0);
            let mid = state.viewport.height * 0.5;
            assert!((state.vehicle.y - mid).abs() <= IDLE_BOB_AMPLITUDE + 1e-3);
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_first_playing_tick_spawns() {
        let mut state = playing(Tuning::default());
        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.obstacles.len(), 1);
        tick(&mut state, &NONE, 32.0);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_spawn_interval() {
        let mut state = playing(hover_tuning());
        state.tuning.spawn_interval_ms = 1450.0;
        let mut now = 0.0;
        while now < 3000.0 {
            now += 16.0;
            tick(&mut state, &NONE, now);
        }
        // t=16 (empty), t>1466, t>2932
        assert_eq!(state.obstacles.len(), 3);
    }

    #[test]
    fn test_out_of_bounds_crash_fires_once() {
        let mut state = playing(Tuning::default());
        state.vehicle.y = 50.0;
        state.vehicle.vy = -10_000.0;

        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.phase, GamePhase::Crashed);
        assert_eq!(crash_count(&state), 1);

        for i in 2..10 {
            tick(&mut state, &NONE, i as f64 * 16.0);
            assert_eq!(crash_count(&state), 0);
            assert_eq!(state.phase, GamePhase::Crashed);
        }
    }

    #[test]
    fn test_collision_crash() {
        let mut state = playing(hover_tuning());
        let h = state.viewport.height;
        // Solid wall straight through the vehicle
        state
            .obstacles
            .push(layout_single(99, state.vehicle.x, 86.0, 100.0, 100.0, h, 40.0));
        state.run.combo = 7;

        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.phase, GamePhase::Crashed);
        assert_eq!(state.run.combo, 0);
    }

    #[test]
    fn test_score_once_per_obstacle() {
        let mut state = playing(hover_tuning());
        let obstacle = gap_around_vehicle(&state, 50, state.vehicle.x + 100.0);
        state.obstacles.push(obstacle);

        let mut now = 0.0;
        let mut cleared = 0;
        while now < 3000.0 {
            now += 16.0;
            tick(&mut state, &NONE, now);
            cleared += state
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ObstacleCleared { .. }))
                .count();
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.score, 1);
        assert_eq!(state.run.combo, 1);
        assert_eq!(cleared, 1);
        assert_eq!(state.best_score, 1);
    }

    #[test]
    fn test_score_is_frame_rate_independent() {
        let run_at = |step_ms: f64| {
            let mut state = playing(hover_tuning());
            let obstacle = gap_around_vehicle(&state, 50, state.vehicle.x + 200.0);
            state.obstacles.push(obstacle);
            let mut now = 0.0;
            while now < 2500.0 {
                now += step_ms;
                tick(&mut state, &NONE, now);
            }
            assert_eq!(state.phase, GamePhase::Playing);
            state.run.score
        };
        let fine = run_at(1.0);
        let coarse = run_at(30.0);
        assert_eq!(fine, 1);
        assert_eq!(fine, coarse);
    }

    #[test]
    fn test_crash_ack_delay() {
        let mut state = playing(Tuning::default());
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 100.0);
        assert_eq!(state.phase, GamePhase::Crashed);

        // Too soon
        tick(&mut state, &FLAP, 200.0);
        assert_eq!(state.phase, GamePhase::Crashed);

        let acknowledged_at = 100.0 + state.tuning.crash_ack_ms;
        tick(&mut state, &FLAP, acknowledged_at);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.score, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_retry_is_immediate() {
        let mut state = playing(Tuning::default());
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 100.0);
        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        tick(&mut state, &retry, 110.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events(), &[GameEvent::RunStarted]);
    }

    #[test]
    fn test_menu_from_crash() {
        let mut state = playing(Tuning::default());
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 100.0);
        let menu = TickInput {
            menu: true,
            ..Default::default()
        };
        tick(&mut state, &menu, 120.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.events(), &[GameEvent::LeaderboardRequested]);
    }

    #[test]
    fn test_best_score_survives_runs() {
        let mut state = playing(hover_tuning());
        state.run.score = 9;
        state.best_score = 9;
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.best_score, 9);
        assert!(matches!(
            state.events()[0],
            GameEvent::Crashed { score: 9, new_best: true, .. }
        ));

        // Shorter second run
        tick(&mut state, &FLAP, 1000.0);
        state.run.score = 3;
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 1016.0);
        assert_eq!(state.best_score, 9);
        assert!(matches!(
            state.events()[0],
            GameEvent::Crashed { score: 3, best_score: 9, new_best: false, .. }
        ));
    }

    #[test]
    fn test_tenth_clear_arms_collectible() {
        let mut state = playing(hover_tuning());
        state.run.combo = 9;
        state.run.score = 9;
        let obstacle = gap_around_vehicle(&state, 50, state.vehicle.x - 87.0);
        state.obstacles.push(obstacle);

        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.run.combo, 10);
        assert!(state.events().contains(&GameEvent::CollectibleArmed));
        assert!(state.run.collectible_pending);
    }

    #[test]
    fn test_pending_collectible_spawns_with_next_obstacle() {
        let mut state = playing(Tuning::default());
        state.run.collectible_pending = true;
        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.obstacles.len(), 1);
        let c = state.collectible.expect("collectible spawned");
        assert!(c.alive);
        assert!(!state.run.collectible_pending);
    }

    #[test]
    fn test_pickup_starts_slow_motion() {
        let mut state = playing(hover_tuning());
        state.obstacles.push(gap_around_vehicle(&state, 50, 1000.0));
        let center = vehicle_rect(&state.vehicle, &state.tuning).center();
        state.collectible = Some(Collectible {
            pos: center + Vec2::new(5.0, 0.0),
            radius: 14.0,
            alive: true,
        });

        tick(&mut state, &NONE, 16.0);
        let until = 16.0 + state.tuning.slow_motion_ms;
        assert!(state.events().contains(&GameEvent::CollectiblePickup));
        assert!(state.events().contains(&GameEvent::SlowMotion { until_ms: until }));
        assert_eq!(state.run.slow_motion_until, Some(until));
        assert!(state.collectible.is_none());

        // Timescale applies to obstacle motion
        let x_before = state.obstacles[0].x;
        tick(&mut state, &NONE, 32.0);
        let moved = x_before - state.obstacles[0].x;
        let expected = state.tuning.base_speed * 0.016 * state.tuning.slow_motion_scale;
        assert!((moved - expected).abs() < 1e-3);
    }

    #[test]
    fn test_slow_motion_flap_is_weaker() {
        let mut state = playing(Tuning::default());
        state.run.slow_motion_until = Some(10_000.0);
        tick(&mut state, &FLAP, 16.0);
        let expected_start = state.tuning.flap_velocity * state.tuning.slow_motion_flap_factor;
        // One frame of gravity on top of the impulse
        let g = state.tuning.gravity * 0.016 * state.tuning.slow_motion_scale;
        assert!((state.vehicle.vy - (expected_start + g)).abs() < 1e-2);
    }

    #[test]
    fn test_reset_clears_slow_motion() {
        let mut state = playing(Tuning::default());
        state.run.slow_motion_until = Some(60_000.0);
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 16.0);
        tick(&mut state, &TickInput { retry: true, ..Default::default() }, 32.0);
        assert_eq!(state.run.slow_motion_until, None);
    }

    #[test]
    fn test_crash_cancels_pending_collectible() {
        let mut state = playing(Tuning::default());
        state.run.collectible_pending = true;
        state.vehicle.y = -500.0;
        tick(&mut state, &NONE, 16.0);
        assert!(!state.run.collectible_pending);
        let before = state.obstacles.len();
        tick(&mut state, &NONE, 32.0);
        assert_eq!(state.obstacles.len(), before);
    }

    #[test]
    fn test_offscreen_obstacles_removed() {
        let mut state = playing(hover_tuning());
        state.obstacles.push(gap_around_vehicle(&state, 50, -250.0));
        state.obstacles.push(gap_around_vehicle(&state, 51, 900.0));
        tick(&mut state, &NONE, 16.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, 51);
    }

    #[test]
    fn test_exact_layout_with_injected_rng() {
        let rng = SequenceRng::new([0.5]);
        let mut state =
            GameState::with_rng(Box::new(rng), Tuning::default(), Viewport::default()).unwrap();
        tick(&mut state, &FLAP, 0.0);
        tick(&mut state, &NONE, 16.0);
        let gap = state.obstacles[0].gaps[0];
        assert!((gap.center - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(Tuning::default());
        let mut b = new_state(Tuning::default());
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for i in 0..2000 {
            let now = i as f64 * 16.0;
            tick(&mut a, &auto, now);
            tick(&mut b, &auto, now);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.run, b.run);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.vehicle, b.vehicle);
    }

    #[test]
    fn test_autopilot_scores() {
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for seed in [1, 7, 42, 12345] {
            let mut state = GameState::new(seed, Tuning::default(), Viewport::default()).unwrap();
            for i in 0..3000 {
                tick(&mut state, &auto, i as f64 * 16.0);
            }
            assert!(state.best_score >= 10, "seed {} best {}", seed, state.best_score);
        }
    }

    proptest! {
        #[test]
        fn prop_best_score_never_decreases(scores in prop::collection::vec(0u32..60, 1..12)) {
            let mut state = new_state(hover_tuning());
            let retry = TickInput {
                retry: true,
                ..Default::default()
            };
            tick(&mut state, &FLAP, 0.0);

            let mut expected_best = 0;
            let mut now = 0.0;
            for (i, score) in scores.into_iter().enumerate() {
                if i > 0 {
                    now += 16.0;
                    tick(&mut state, &retry, now);
                }
                prop_assert_eq!(state.phase, GamePhase::Playing);
                prop_assert_eq!(state.run.best_at_start, expected_best);

                state.run.score = score;
                state.vehicle.y = -500.0;
                now += 16.0;
                tick(&mut state, &NONE, now);

                let new_best = score > expected_best;
                expected_best = expected_best.max(score);
                prop_assert_eq!(state.best_score, expected_best);
                let crashed_as_expected = state.events().iter().any(|e| matches!(
                    e,
                    GameEvent::Crashed { score: s, best_score: b, new_best: n, .. }
                        if *s == score && *b == expected_best && *n == new_best
                ));
                prop_assert!(crashed_as_expected);
            }
        }
    }
}
