use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of a round, from team A's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    TeamA,
    Draw,
    TeamB,
}

impl Outcome {
    /// Actual score for team A: 1.0 win, 0.5 draw, 0.0 loss
    pub fn score(&self) -> f64 {
        match self {
            Outcome::TeamA => 1.0,
            Outcome::Draw => 0.5,
            Outcome::TeamB => 0.0,
        }
    }

    /// The same result seen from team B
    pub fn reversed(&self) -> Outcome {
        match self {
            Outcome::TeamA => Outcome::TeamB,
            Outcome::Draw => Outcome::Draw,
            Outcome::TeamB => Outcome::TeamA,
        }
    }
}

/// Decides the true winner from hidden team skill sums
///
/// The rating system only ever observes the resulting [`Outcome`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeModel {
    /// Higher skill sum always wins; equal sums draw
    #[default]
    Deterministic,
    /// Higher skill sum wins with probability σ(gamma * diff); equal sums draw
    Logistic { gamma: f64 },
}

impl OutcomeModel {
    pub fn decide(&self, skill_a: u32, skill_b: u32, rng: &mut impl Rng) -> Outcome {
        if skill_a == skill_b {
            return Outcome::Draw;
        }

        match *self {
            OutcomeModel::Deterministic => {
                if skill_a > skill_b {
                    Outcome::TeamA
                } else {
                    Outcome::TeamB
                }
            }
            OutcomeModel::Logistic { gamma } => {
                let p_team_a = Self::team_a_win_probability(gamma, skill_a, skill_b);
                if rng.gen_bool(p_team_a) {
                    Outcome::TeamA
                } else {
                    Outcome::TeamB
                }
            }
        }
    }

    fn team_a_win_probability(gamma: f64, skill_a: u32, skill_b: u32) -> f64 {
        let diff = skill_a as f64 - skill_b as f64;
        let p = 1.0 / (1.0 + (-gamma * diff).exp());
        // gen_bool panics outside [0, 1]
        if p.is_finite() {
            p.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}
