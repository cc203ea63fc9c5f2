//! Demo mode: synthesises flap input so the game can play itself

use super::state::{GamePhase, GameState};

/// Vertical target: middle of the nearest gap in the next obstacle ahead
pub fn target_y(state: &GameState) -> f32 {
    let vehicle = &state.vehicle;
    state
        .obstacles
        .iter()
        .filter(|o| o.trailing_edge() >= vehicle.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .and_then(|o| {
            o.gaps
                .iter()
                .map(|g| (g.top + g.bottom) * 0.5)
                .min_by(|a, b| (a - vehicle.y).abs().total_cmp(&(b - vehicle.y).abs()))
        })
        .unwrap_or(state.viewport.height * 0.5)
}

/// Height gained by one flap from the moment of the impulse to the apex
pub fn flap_rise(state: &GameState, now_ms: f64) -> f32 {
    let tuning = &state.tuning;
    let velocity = if state.slow_motion_active(now_ms) {
        tuning.flap_velocity * tuning.slow_motion_flap_factor
    } else {
        tuning.flap_velocity
    };
    if tuning.gravity > 0.0 {
        velocity * velocity / (2.0 * tuning.gravity)
    } else {
        0.0
    }
}

/// Should the autopilot flap this tick?
///
/// Starts runs from Idle and retries once a crash may be acknowledged. While
/// playing it flaps whenever the vehicle sinks half a flap-rise below the
/// target, so each arc peaks the same distance above it.
pub fn wants_flap(state: &GameState, now_ms: f64) -> bool {
    match state.phase {
        GamePhase::Idle => true,
        GamePhase::Crashed => state
            .run
            .crashed_at_ms
            .is_some_and(|at| now_ms - at >= state.tuning.crash_ack_ms),
        GamePhase::Playing => {
            state.vehicle.y >= target_y(state) + flap_rise(state, now_ms) * 0.5
        }
    }
}
