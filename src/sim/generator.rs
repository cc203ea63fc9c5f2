//! Procedural obstacle generation
//!
//! Each spawn picks a gap center with smoothed randomness, occasionally
//! splits the column into two gaps, and may carry a collectible.
//!
//! All clamps run last, so no parameter combination that passes
//! [`Tuning::validate`] can push a gap outside the playfield or produce a
//! solid with non-positive height.

use super::collectible;
use super::difficulty;
use super::rng::RandomSource;
use super::state::{Collectible, Gap, Obstacle, RunState, Solid};
use crate::clamp_band;
use crate::tuning::{Tuning, Viewport};

/// Result of one spawn
#[derive(Debug, Clone, PartialEq)]
pub struct Spawn {
    pub obstacle: Obstacle,
    pub collectible: Option<Collectible>,
}

/// Generate the next obstacle and update the run's generator state
///
/// Updates `last_gap_center`, `double_gap_cooldown`, `collectible_pending`
/// and `last_spawn_ms`.
pub fn spawn_obstacle<R: RandomSource + ?Sized>(
    tuning: &Tuning,
    viewport: Viewport,
    run: &mut RunState,
    id: u32,
    now_ms: f64,
    rng: &mut R,
) -> Spawn {
    let h = viewport.height;
    let gap = difficulty::gap(tuning, run.score);
    let x = viewport.width + tuning.spawn_offset_x;

    let center = next_center(tuning, h, run.last_gap_center, rng);
    let is_double = decide_double_gap(tuning, run.score, &mut run.double_gap_cooldown, rng);

    let obstacle = if is_double {
        let (c1, c2) = double_centers(tuning, h, center, gap, rng);
        let obstacle = layout_double(id, x, tuning.obstacle_width, c1, c2, gap, h, tuning);
        run.last_gap_center = Some((obstacle.gaps[0].center + obstacle.gaps[1].center) * 0.5);
        obstacle
    } else {
        run.last_gap_center = Some(center);
        layout_single(id, x, tuning.obstacle_width, center, gap, h, tuning.min_solid)
    };

    let collectible = if run.collectible_pending {
        run.collectible_pending = false;
        let c = collectible::place_in_gap(tuning, &obstacle, rng);
        log::debug!("Collectible placed at ({:.0}, {:.0})", c.pos.x, c.pos.y);
        Some(c)
    } else {
        None
    };

    log::debug!(
        "Spawned obstacle {} ({}) gap={:.0} centers={:?}",
        id,
        if is_double { "double" } else { "single" },
        gap,
        obstacle.gaps.iter().map(|g| g.center.round()).collect::<Vec<_>>()
    );

    run.last_spawn_ms = now_ms;
    Spawn {
        obstacle,
        collectible,
    }
}

/// Pick a gap center: uniform for the first obstacle, smoothed afterwards
pub fn next_center<R: RandomSource + ?Sized>(
    tuning: &Tuning,
    viewport_height: f32,
    last_center: Option<f32>,
    rng: &mut R,
) -> f32 {
    let lo = tuning.margin;
    let hi = viewport_height - tuning.margin;
    let random_center = rng.range(lo, hi);

    let Some(last) = last_center else {
        return random_center;
    };

    let mut center = last + (random_center - last) * tuning.smoothing_factor;
    center += rng.signed_unit() * tuning.jitter;
    if rng.chance(tuning.spike_chance) {
        center += rng.sign() * tuning.spike;
    }
    clamp_band(center, lo, hi)
}

/// Roll for a double gap, honouring the minimum score and cooldown
///
/// The cooldown is reset on a double and counts down (floored at 0) otherwise.
pub fn decide_double_gap<R: RandomSource + ?Sized>(
    tuning: &Tuning,
    score: u32,
    cooldown: &mut u32,
    rng: &mut R,
) -> bool {
    let eligible = score >= tuning.double_gap_min_score && *cooldown == 0;
    if eligible && rng.chance(tuning.double_gap_chance) {
        *cooldown = tuning.double_gap_cooldown;
        true
    } else {
        *cooldown = cooldown.saturating_sub(1);
        false
    }
}

/// Two gap centers `separation` apart, both inside the safe band
fn double_centers<R: RandomSource + ?Sized>(
    tuning: &Tuning,
    viewport_height: f32,
    center: f32,
    gap: f32,
    rng: &mut R,
) -> (f32, f32) {
    let safe_edge = gap * 0.5 + tuning.min_solid;
    let lo = tuning.margin + safe_edge;
    let hi = viewport_height - tuning.margin - safe_edge;

    let c1 = clamp_band(center, lo, hi);
    let separation = gap + rng.range(tuning.double_gap_sep_extra_min, tuning.double_gap_sep_extra_max);

    let mut sign = rng.sign();
    let mut c2 = c1 + sign * separation;
    if c2 < lo || c2 > hi {
        sign = -sign;
        c2 = c1 + sign * separation;
    }
    (c1, clamp_band(c2, lo, hi))
}

/// One gap centered at `center`, solids above and below
///
/// Each solid is floored at `min_solid`; near the playfield edges this trims
/// the gap on that side while `center` stays where the generator put it.
pub fn layout_single(
    id: u32,
    x: f32,
    width: f32,
    center: f32,
    gap: f32,
    viewport_height: f32,
    min_solid: f32,
) -> Obstacle {
    let top = (center - gap * 0.5).max(min_solid);
    let bottom = (center + gap * 0.5).min(viewport_height - min_solid);
    let gap = Gap { top, bottom, center };
    let solids = vec![
        Solid { y: 0.0, height: top },
        Solid {
            y: bottom,
            height: viewport_height - bottom,
        },
    ];
    debug_assert!(solids.iter().all(|s| s.height > 0.0));
    debug_assert!(gap.height() > 0.0);

    Obstacle {
        id,
        x,
        width,
        solids,
        gaps: vec![gap],
        scored: false,
        is_double: false,
    }
}

/// Two gaps and three solids
///
/// The upper gap keeps its place; the lower one is pushed down until the
/// middle solid is at least `min_middle_solid` thick, then both are lifted
/// if that would crowd the bottom solid.
#[allow(clippy::too_many_arguments)]
pub fn layout_double(
    id: u32,
    x: f32,
    width: f32,
    c1: f32,
    c2: f32,
    gap: f32,
    viewport_height: f32,
    tuning: &Tuning,
) -> Obstacle {
    let min_pitch = gap + tuning.min_middle_solid;
    let mut top_center = c1.min(c2);
    let mut bottom_center = c1.max(c2);

    if bottom_center - top_center < min_pitch {
        bottom_center = top_center + min_pitch;
    }
    let lowest = viewport_height - tuning.min_solid - gap * 0.5;
    if bottom_center > lowest {
        bottom_center = lowest;
        top_center = top_center.min(bottom_center - min_pitch);
    }

    let upper = Gap::new(top_center - gap * 0.5, top_center + gap * 0.5);
    let lower = Gap::new(bottom_center - gap * 0.5, bottom_center + gap * 0.5);
    let solids = vec![
        Solid {
            y: 0.0,
            height: upper.top,
        },
        Solid {
            y: upper.bottom,
            height: lower.top - upper.bottom,
        },
        Solid {
            y: lower.bottom,
            height: viewport_height - lower.bottom,
        },
    ];
    debug_assert!(solids.iter().all(|s| s.height > 0.0));

    Obstacle {
        id,
        x,
        width,
        solids,
        gaps: vec![upper, lower],
        scored: false,
        is_double: true,
    }
}
