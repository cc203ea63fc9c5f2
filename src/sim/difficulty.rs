//! Difficulty curve: scroll speed and gap height as functions of score

use crate::tuning::Tuning;

/// Obstacle scroll speed (px/s). Grows without bound.
#[inline]
pub fn speed(tuning: &Tuning, score: u32) -> f32 {
    tuning.base_speed + score as f32 * tuning.speed_per_score
}

/// Gap height (px), shrinking toward `gap_min`
#[inline]
pub fn gap(tuning: &Tuning, score: u32) -> f32 {
    (tuning.gap_base - score as f32 * tuning.gap_shrink_per_score).max(tuning.gap_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_tuning() -> Tuning {
        Tuning {
            base_speed: 220.0,
            speed_per_score: 3.0,
            gap_base: 260.0,
            gap_min: 190.0,
            gap_shrink_per_score: 0.38,
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_score_20() {
        let tuning = scenario_tuning();
        assert!((speed(&tuning, 20) - 280.0).abs() < 1e-4);
        let expected_gap = (260.0_f32 - 20.0 * 0.38).max(190.0);
        assert!((gap(&tuning, 20) - expected_gap).abs() < 1e-4);
    }

    #[test]
    fn test_gap_reaches_floor() {
        let tuning = scenario_tuning();
        assert_eq!(gap(&tuning, 10_000), 190.0);
    }

    #[test]
    fn test_score_zero() {
        let tuning = Tuning::default();
        assert_eq!(speed(&tuning, 0), tuning.base_speed);
        assert_eq!(gap(&tuning, 0), tuning.gap_base);
    }

    proptest! {
        #[test]
        fn prop_bounds(score in 0u32..1_000_000) {
            let tuning = Tuning::default();
            prop_assert!(gap(&tuning, score) >= tuning.gap_min);
            prop_assert!(speed(&tuning, score) >= tuning.base_speed);
        }

        #[test]
        fn prop_monotone(a in 0u32..100_000, b in 0u32..100_000) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(speed(&tuning, lo) <= speed(&tuning, hi));
            prop_assert!(gap(&tuning, lo) >= gap(&tuning, hi));
        }
    }
}
