//! Slow-motion collectible
//!
//! Every `collectible_every`-th consecutive clear arms a collectible; the
//! next spawned obstacle carries it inside one of its gaps. Picking it up
//! opens (or re-opens) a slow-motion window. Windows do not stack: a second
//! pickup moves the expiry to `now + slow_motion_ms`.

use glam::Vec2;

use super::collision::circle_contact;
use super::rng::RandomSource;
use super::state::{Collectible, Obstacle, RunState};
use crate::clamp_band;
use crate::tuning::Tuning;

/// Arm a collectible when the combo hits a milestone. Returns true if armed.
pub fn on_combo(tuning: &Tuning, run: &mut RunState) -> bool {
    let every = tuning.collectible_every.max(1);
    if run.combo > 0 && run.combo % every == 0 {
        run.collectible_pending = true;
        true
    } else {
        false
    }
}

/// Place a collectible near the center of a random gap of `obstacle`
pub fn place_in_gap<R: RandomSource + ?Sized>(
    tuning: &Tuning,
    obstacle: &Obstacle,
    rng: &mut R,
) -> Collectible {
    let gap = obstacle.gaps[rng.index(obstacle.gaps.len())];
    let spread = tuning
        .collectible_jitter_max
        .min(gap.height() * tuning.collectible_jitter_frac);
    let y = clamp_band(
        gap.center + rng.signed_unit() * spread,
        gap.top + tuning.collectible_gap_margin,
        gap.bottom - tuning.collectible_gap_margin,
    );

    Collectible {
        pos: Vec2::new(obstacle.x + obstacle.width * tuning.collectible_offset_frac, y),
        radius: tuning.collectible_radius,
        alive: true,
    }
}

/// Scroll the collectible left; it dies once past `despawn_x`
pub fn advance(collectible: &mut Collectible, dx: f32, despawn_x: f32) {
    if !collectible.alive {
        return;
    }
    collectible.pos.x -= dx;
    if collectible.pos.x < despawn_x {
        collectible.alive = false;
    }
}

/// Collect if the vehicle touches it, opening the slow-motion window
///
/// Returns the new expiry on pickup.
pub fn try_pickup(
    tuning: &Tuning,
    vehicle_center: Vec2,
    collectible: &mut Collectible,
    run: &mut RunState,
    now_ms: f64,
) -> Option<f64> {
    if !collectible.alive {
        return None;
    }
    if !circle_contact(
        vehicle_center,
        collectible.pos,
        collectible.radius + tuning.pickup_radius,
    ) {
        return None;
    }

    collectible.alive = false;
    let until = now_ms + tuning.slow_motion_ms;
    run.slow_motion_until = Some(until);
    Some(until)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::{layout_double, layout_single};
    use crate::sim::rng::SequenceRng;

    fn live_collectible(x: f32, y: f32) -> Collectible {
        Collectible {
            pos: Vec2::new(x, y),
            radius: 14.0,
            alive: true,
        }
    }

    #[test]
    fn test_arms_every_tenth() {
        let tuning = Tuning::default();
        let mut run = RunState::new(0.0, 0);
        for combo in 1..=25 {
            run.combo = combo;
            run.collectible_pending = false;
            let armed = on_combo(&tuning, &mut run);
            assert_eq!(armed, combo % 10 == 0, "combo {}", combo);
            assert_eq!(run.collectible_pending, armed);
        }
    }

    #[test]
    fn test_zero_combo_never_arms() {
        let tuning = Tuning::default();
        let mut run = RunState::new(0.0, 0);
        assert!(!on_combo(&tuning, &mut run));
    }

    #[test]
    fn test_placement_inside_gap() {
        let tuning = Tuning::default();
        let obstacle = layout_single(1, 1000.0, 86.0, 300.0, 200.0, 720.0, 40.0);
        // Extreme jitter both ways
        for draw in [0.0, 0.999] {
            let mut rng = SequenceRng::new([0.0, draw]);
            let c = place_in_gap(&tuning, &obstacle, &mut rng);
            assert!(c.pos.y >= 200.0 + tuning.collectible_gap_margin);
            assert!(c.pos.y <= 400.0 - tuning.collectible_gap_margin);
            assert!((c.pos.x - (1000.0 + 86.0 * 0.55)).abs() < 1e-3);
            assert!(c.alive);
        }
    }

    #[test]
    fn test_placement_picks_gap() {
        let tuning = Tuning::default();
        let obstacle = layout_double(1, 0.0, 86.0, 200.0, 500.0, 190.0, 720.0, &tuning);
        // index draw 0.9 -> lower gap, no jitter
        let mut rng = SequenceRng::new([0.9, 0.5]);
        let c = place_in_gap(&tuning, &obstacle, &mut rng);
        assert!((c.pos.y - obstacle.gaps[1].center).abs() < 1e-3);
    }

    #[test]
    fn test_advance_despawns() {
        let mut c = live_collectible(-70.0, 100.0);
        advance(&mut c, 5.0, -80.0);
        assert!(c.alive);
        advance(&mut c, 6.0, -80.0);
        assert!(!c.alive);
    }

    #[test]
    fn test_pickup_opens_window() {
        let tuning = Tuning::default();
        let mut run = RunState::new(0.0, 0);
        let mut c = live_collectible(100.0, 100.0);

        // Out of reach (radius sum 30)
        assert_eq!(try_pickup(&tuning, Vec2::new(140.0, 100.0), &mut c, &mut run, 0.0), None);
        assert!(c.alive);

        let until = try_pickup(&tuning, Vec2::new(120.0, 100.0), &mut c, &mut run, 1000.0);
        assert_eq!(until, Some(6000.0));
        assert_eq!(run.slow_motion_until, Some(6000.0));
        assert!(!c.alive);

        // Dead collectibles cannot be picked again
        assert_eq!(try_pickup(&tuning, Vec2::new(100.0, 100.0), &mut c, &mut run, 1500.0), None);
    }

    #[test]
    fn test_second_pickup_extends_not_stacks() {
        let tuning = Tuning {
            slow_motion_ms: 3000.0,
            ..Default::default()
        };
        let mut run = RunState::new(0.0, 0);
        let mut first = live_collectible(0.0, 0.0);
        let mut second = live_collectible(0.0, 0.0);

        try_pickup(&tuning, Vec2::ZERO, &mut first, &mut run, 1000.0);
        assert_eq!(run.slow_motion_until, Some(4000.0));
        try_pickup(&tuning, Vec2::ZERO, &mut second, &mut run, 2000.0);
        assert_eq!(run.slow_motion_until, Some(5000.0));
    }
}
