use crate::error::SimulationError;
use crate::outcome::OutcomeModel;
use crate::rating::EloParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulated participant
///
/// `skill` is the hidden ground truth the rating system is trying to recover. It is
/// assigned once at construction and never written again; `rating` and
/// `games_played` only move through [`Player::record_game`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub name: String,
    /// Hidden ability level in [0, max_skill_level]
    pub skill: u32,
    /// Current Elo rating
    pub rating: f64,
    pub games_played: u32,
}

impl Player {
    pub fn new(id: usize, skill: u32, initial_rating: f64) -> Self {
        Self {
            id,
            name: format!("p{}", id),
            skill,
            rating: initial_rating,
            games_played: 0,
        }
    }

    /// Apply one resolved round: shift the rating and count the game
    pub fn record_game(&mut self, delta: f64) {
        self.rating += delta;
        self.games_played += 1;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\tSkill: {}\tElo: {:.2}\tGames Played: {}",
            self.name, self.skill, self.rating, self.games_played
        )
    }
}

/// Simulation configuration parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total rounds in the run, not the number of games per player
    pub total_rounds: usize,
    /// Population size; must be at least 2 * team_size
    pub total_players: usize,
    /// Players per team
    pub team_size: usize,
    /// Highest hidden skill level (levels run 0..=max)
    pub max_skill_level: u32,
    /// Starting rating for every player
    pub initial_rating: f64,
    /// Rating difference at which one side is 10x more likely to win
    pub rating_spread: f64,
    /// Maximum rating change per round (K)
    pub k_factor: f64,
    /// How the true winner is decided from team skill sums
    pub outcome_model: OutcomeModel,
    /// Print every player after the run
    pub display_all_players: bool,
    /// Print the per-skill-level summary after the run
    pub display_summary: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_rounds: 10_000,
            total_players: 1000,
            team_size: 5,
            max_skill_level: 10,
            initial_rating: 1500.0,
            rating_spread: 400.0,
            k_factor: 32.0,
            outcome_model: OutcomeModel::Deterministic,
            display_all_players: false,
            display_summary: true,
        }
    }
}

/// Upper bound on `max_skill_level`; the report keeps one group per level
pub const SKILL_LEVEL_CAP: u32 = 10_000;

impl SimulationConfig {
    /// Players drawn per round (both teams)
    pub fn players_per_round(&self) -> usize {
        self.team_size.saturating_mul(2)
    }

    pub fn elo_params(&self) -> EloParams {
        EloParams {
            k_factor: self.k_factor,
            spread: self.rating_spread,
        }
    }

    /// Reject configurations that could not produce well-formed rounds
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.team_size == 0 {
            return Err(SimulationError::InvalidConfig(
                "team_size must be at least 1".to_string(),
            ));
        }
        if self.total_players < self.players_per_round() {
            return Err(SimulationError::InvalidConfig(format!(
                "total_players ({}) must be at least 2 * team_size ({})",
                self.total_players,
                self.players_per_round()
            )));
        }
        if !self.rating_spread.is_finite() || self.rating_spread <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "rating_spread must be positive, got {}",
                self.rating_spread
            )));
        }
        if !self.k_factor.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "k_factor must be finite, got {}",
                self.k_factor
            )));
        }
        if !self.initial_rating.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "initial_rating must be finite, got {}",
                self.initial_rating
            )));
        }
        if let OutcomeModel::Logistic { gamma } = self.outcome_model {
            if !gamma.is_finite() || gamma < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "logistic gamma must be a non-negative number, got {}",
                    gamma
                )));
            }
        }
        if self.max_skill_level > SKILL_LEVEL_CAP {
            return Err(SimulationError::InvalidConfig(format!(
                "max_skill_level must be at most {}, got {}",
                SKILL_LEVEL_CAP, self.max_skill_level
            )));
        }
        // Team skill sums are u32
        let fits = u32::try_from(self.team_size)
            .ok()
            .and_then(|size| size.checked_mul(self.max_skill_level))
            .is_some();
        if !fits {
            return Err(SimulationError::InvalidConfig(format!(
                "team_size ({}) * max_skill_level ({}) overflows a team skill sum",
                self.team_size, self.max_skill_level
            )));
        }
        Ok(())
    }
}

/// Running statistics for a simulation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Rounds resolved so far
    pub rounds: usize,
    pub team_a_wins: usize,
    pub team_b_wins: usize,
    pub draws: usize,
    /// Rounds the rating favourite lost (a draw counts when ratings were unequal)
    pub upsets: usize,
    /// Mean |delta| applied per round
    pub avg_abs_delta: f64,
    /// Largest |delta| applied in any round
    pub max_abs_delta: f64,
}

impl SimulationStats {
    /// Fold one round into the running figures
    pub fn record(&mut self, outcome_score: f64, expected_a: f64, delta_a: f64) {
        let abs_delta = delta_a.abs();
        self.avg_abs_delta =
            (self.avg_abs_delta * self.rounds as f64 + abs_delta) / (self.rounds + 1) as f64;
        self.max_abs_delta = self.max_abs_delta.max(abs_delta);
        self.rounds += 1;

        if outcome_score > 0.5 {
            self.team_a_wins += 1;
        } else if outcome_score < 0.5 {
            self.team_b_wins += 1;
        } else {
            self.draws += 1;
        }

        // Favourite is whichever side expected more than half
        if (expected_a - 0.5) * (outcome_score - 0.5) < 0.0
            || (outcome_score == 0.5 && expected_a != 0.5)
        {
            self.upsets += 1;
        }
    }

    pub fn draw_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.draws as f64 / self.rounds as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.total_rounds, 10_000);
        assert_eq!(config.total_players, 1000);
        assert_eq!(config.team_size, 5);
        assert_eq!(config.max_skill_level, 10);
        assert_eq!(config.initial_rating, 1500.0);
        assert_eq!(config.rating_spread, 400.0);
        assert_eq!(config.k_factor, 32.0);
        assert_eq!(config.outcome_model, OutcomeModel::Deterministic);
        assert!(!config.display_all_players);
        assert!(config.display_summary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_teams() {
        let config = SimulationConfig {
            total_players: 9,
            team_size: 5,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        // Exactly two teams' worth is enough
        let config = SimulationConfig {
            total_players: 10,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_skill_levels() {
        let huge_levels = SimulationConfig {
            max_skill_level: 2_000_000_000,
            team_size: 3,
            total_players: 6,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            huge_levels.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        let at_cap = SimulationConfig {
            max_skill_level: SKILL_LEVEL_CAP,
            ..SimulationConfig::default()
        };
        assert!(at_cap.validate().is_ok());

        // Within the level cap, but the team sum would not fit in a u32
        let huge_teams = SimulationConfig {
            max_skill_level: SKILL_LEVEL_CAP,
            team_size: 500_000,
            total_players: 1_000_000,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            huge_teams.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        let overflowing_round = SimulationConfig {
            team_size: usize::MAX,
            ..SimulationConfig::default()
        };
        assert!(overflowing_round.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let zero_team = SimulationConfig {
            team_size: 0,
            ..SimulationConfig::default()
        };
        assert!(zero_team.validate().is_err());

        let zero_spread = SimulationConfig {
            rating_spread: 0.0,
            ..SimulationConfig::default()
        };
        assert!(zero_spread.validate().is_err());

        let nan_k = SimulationConfig {
            k_factor: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(nan_k.validate().is_err());

        let bad_gamma = SimulationConfig {
            outcome_model: OutcomeModel::Logistic { gamma: -1.0 },
            ..SimulationConfig::default()
        };
        assert!(bad_gamma.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"team_size": 3, "total_rounds": 50}"#).unwrap();
        assert_eq!(config.team_size, 3);
        assert_eq!(config.total_rounds, 50);
        assert_eq!(config.total_players, 1000);
        assert_eq!(config.k_factor, 32.0);
    }

    #[test]
    fn test_record_game_updates_rating_and_count() {
        let mut player = Player::new(7, 4, 1500.0);
        assert_eq!(player.name, "p7");

        player.record_game(12.5);
        player.record_game(-2.5);

        assert_eq!(player.rating, 1510.0);
        assert_eq!(player.games_played, 2);
        assert_eq!(player.skill, 4);
    }

    #[test]
    fn test_stats_count_outcomes_and_upsets() {
        let mut stats = SimulationStats::default();
        // A favoured and wins
        stats.record(1.0, 0.7, 9.6);
        // A favoured and loses
        stats.record(0.0, 0.7, -22.4);
        // Even match drawn
        stats.record(0.5, 0.5, 0.0);

        assert_eq!(stats.rounds, 3);
        assert_eq!(stats.team_a_wins, 1);
        assert_eq!(stats.team_b_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.upsets, 1);
        assert!((stats.avg_abs_delta - 32.0 / 3.0).abs() < 1e-9);
        assert!((stats.max_abs_delta - 22.4).abs() < 1e-9);
        assert!((stats.draw_rate() - 1.0 / 3.0).abs() < 1e-12);
    }
}
