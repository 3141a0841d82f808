//! Team Elo update.
//!
//! Each team is rated by the arithmetic mean of its members' ratings. The expected
//! score comes from the logistic curve with base 10 and the configured spread, and
//! every member of a team moves by the same amount.

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Elo algorithm constants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EloParams {
    /// Step size (K). Winning an even match gains k_factor / 2
    pub k_factor: f64,
    /// Rating gap for a 10:1 expected win ratio
    pub spread: f64,
}

impl Default for EloParams {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            spread: 400.0,
        }
    }
}

/// Expected scores and the deltas derived from them for one round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EloUpdate {
    pub expected_a: f64,
    pub expected_b: f64,
    /// Applied to every member of team A
    pub delta_a: f64,
    /// Applied to every member of team B
    pub delta_b: f64,
}

/// Expected score of a side rated `rating` against `opponent`
///
/// Equal to `10^(r/s) / (10^(r/s) + 10^(o/s))`, written in difference form so large
/// ratings cannot overflow.
pub fn expected_score(rating: f64, opponent: f64, spread: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / spread))
}

/// Expected scores for both teams; they sum to 1
pub fn expected_scores(rating_a: f64, rating_b: f64, spread: f64) -> (f64, f64) {
    (
        expected_score(rating_a, rating_b, spread),
        expected_score(rating_b, rating_a, spread),
    )
}

/// Compute the per-member deltas for both teams
///
/// Each side's delta is computed from its own actual and expected score. The two
/// are negatives of each other because both pairs of scores sum to 1.
pub fn team_update(
    avg_rating_a: f64,
    avg_rating_b: f64,
    outcome: Outcome,
    params: &EloParams,
) -> EloUpdate {
    let (expected_a, expected_b) = expected_scores(avg_rating_a, avg_rating_b, params.spread);

    let delta_a = params.k_factor * (outcome.score() - expected_a);
    let delta_b = params.k_factor * (outcome.reversed().score() - expected_b);

    EloUpdate {
        expected_a,
        expected_b,
        delta_a,
        delta_b,
    }
}

/// Arithmetic mean of a team's ratings
pub fn average_rating(ratings: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), r| (sum + r, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rating_grid() -> Vec<f64> {
        vec![
            -2500.0, 0.0, 850.0, 1200.0, 1450.5, 1500.0, 1533.3, 1800.0, 2400.0, 6000.0,
        ]
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let params = EloParams::default();
        for &a in &rating_grid() {
            for &b in &rating_grid() {
                let (ea, eb) = expected_scores(a, b, params.spread);
                assert!((ea + eb - 1.0).abs() < EPS, "ra={} rb={}", a, b);
                assert!((0.0..=1.0).contains(&ea));
            }
        }
    }

    #[test]
    fn test_expected_score_matches_power_form() {
        let spread = 400.0;
        for (a, b) in [(1500.0, 1500.0), (1600.0, 1400.0), (1320.0, 1710.0)] {
            let q_a = 10f64.powf(a / spread);
            let q_b = 10f64.powf(b / spread);
            let power_form = q_a / (q_a + q_b);
            assert!((expected_score(a, b, spread) - power_form).abs() < EPS);
        }
    }

    #[test]
    fn test_spread_gives_ten_to_one_odds() {
        let (ea, eb) = expected_scores(1900.0, 1500.0, 400.0);
        assert!((ea / eb - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_team_deltas_are_zero_sum() {
        let params = EloParams::default();
        for &a in &rating_grid() {
            for &b in &rating_grid() {
                for outcome in [Outcome::TeamA, Outcome::Draw, Outcome::TeamB] {
                    let update = team_update(a, b, outcome, &params);
                    assert!(
                        (update.delta_a + update.delta_b).abs() < 1e-9,
                        "ra={} rb={} outcome={:?} update={:?}",
                        a,
                        b,
                        outcome,
                        update
                    );
                }
            }
        }
    }

    #[test]
    fn test_team_b_delta_matches_reduced_form() {
        // K * ((1 - s) - E_b) must equal K * (E_a - s)
        let params = EloParams::default();
        for (a, b) in [(1500.0, 1500.0), (1620.0, 1480.0), (1390.0, 1705.0)] {
            for outcome in [Outcome::TeamA, Outcome::Draw, Outcome::TeamB] {
                let update = team_update(a, b, outcome, &params);
                let reduced = params.k_factor * (update.expected_a - outcome.score());
                assert!((update.delta_b - reduced).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_equal_ratings_tie_moves_nothing() {
        let params = EloParams::default();
        let update = team_update(1500.0, 1500.0, Outcome::Draw, &params);
        assert_eq!(update.expected_a, 0.5);
        assert_eq!(update.delta_a, 0.0);
        assert_eq!(update.delta_b, 0.0);
    }

    #[test]
    fn test_even_win_gains_half_k() {
        let params = EloParams::default();
        let update = team_update(1500.0, 1500.0, Outcome::TeamA, &params);
        assert!((update.delta_a - 16.0).abs() < EPS);
        assert!((update.delta_b + 16.0).abs() < EPS);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let params = EloParams::default();
        let expected_win = team_update(1700.0, 1500.0, Outcome::TeamA, &params);
        let upset = team_update(1700.0, 1500.0, Outcome::TeamB, &params);
        assert!(upset.delta_a.abs() > expected_win.delta_a.abs());
        assert!(upset.delta_a < 0.0);
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating([1400.0, 1500.0, 1600.0]), 1500.0);
        assert_eq!(average_rating(Vec::<f64>::new()), 0.0);
    }
}
