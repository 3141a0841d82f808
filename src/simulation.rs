use crate::error::SimulationError;
use crate::matchmaker::{Matchmaker, Team};
use crate::outcome::Outcome;
use crate::population::Population;
use crate::rating::{self, EloUpdate};
use crate::report::{rating_skill_correlation, RunReport, SkillLevelSummary};
use crate::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// What happened in one round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: usize,
    pub team_a: Vec<usize>,
    pub team_b: Vec<usize>,
    /// Hidden skill sums that decided the outcome
    pub skill_a: u32,
    pub skill_b: u32,
    /// Mean ratings before the update
    pub avg_rating_a: f64,
    pub avg_rating_b: f64,
    pub outcome: Outcome,
    pub update: EloUpdate,
}

/// Main simulation state and controller
#[derive(Serialize)]
pub struct Simulation {
    pub config: SimulationConfig,
    pub population: Population,
    pub stats: SimulationStats,
    /// Random number generator seed
    rng_seed: u64,
}

impl Simulation {
    /// Validate the configuration and generate the population
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let population = Population::generate(&config, &mut rng);

        tracing::info!(
            seed,
            players = config.total_players,
            team_size = config.team_size,
            rounds = config.total_rounds,
            "simulation initialized"
        );

        Ok(Self {
            config,
            population,
            stats: SimulationStats::default(),
            rng_seed: seed,
        })
    }

    /// Run on a caller-supplied population instead of a generated one
    pub fn with_population(
        config: SimulationConfig,
        population: Population,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let config = SimulationConfig {
            total_players: population.len(),
            ..config
        };
        config.validate()?;

        if let Some(player) = population
            .players()
            .iter()
            .find(|p| p.skill > config.max_skill_level)
        {
            return Err(SimulationError::InvalidConfig(format!(
                "player {} has skill {} above max_skill_level {}",
                player.id, player.skill, config.max_skill_level
            )));
        }

        Ok(Self {
            config,
            population,
            stats: SimulationStats::default(),
            rng_seed: seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn rounds_played(&self) -> usize {
        self.stats.rounds
    }

    /// Rounds left before `total_rounds` is reached
    pub fn remaining_rounds(&self) -> usize {
        self.config.total_rounds.saturating_sub(self.stats.rounds)
    }

    /// Play a single round: form teams, decide, update ratings, return players
    pub fn play_round(&mut self) -> Result<RoundResult, SimulationError> {
        // Each round gets its own stream so a run replays from its seed
        let round = self.stats.rounds;
        let mut rng =
            StdRng::seed_from_u64(self.rng_seed.wrapping_add(1).wrapping_add(round as u64));

        let matchmaker = Matchmaker::new(self.config.team_size);
        let (team_a, team_b) = matchmaker.form_teams(&mut self.population, &mut rng)?;
        let result = self.settle(round, team_a, team_b, &mut rng)?;

        self.stats.record(
            result.outcome.score(),
            result.update.expected_a,
            result.update.delta_a,
        );

        tracing::trace!(
            round,
            skill_a = result.skill_a,
            skill_b = result.skill_b,
            outcome = ?result.outcome,
            delta_a = result.update.delta_a,
            delta_b = result.update.delta_b,
            "round resolved"
        );

        Ok(result)
    }

    /// Resolve a drawn pair of teams and return every member to the pool
    ///
    /// Players are returned even when resolution fails.
    fn settle(
        &mut self,
        round: usize,
        team_a: Team,
        team_b: Team,
        rng: &mut StdRng,
    ) -> Result<RoundResult, SimulationError> {
        let resolved = self.resolve(round, &team_a, &team_b, rng);
        let returned_a = Matchmaker::dissolve(&mut self.population, team_a);
        let returned_b = Matchmaker::dissolve(&mut self.population, team_b);

        let result = resolved?;
        returned_a?;
        returned_b?;
        Ok(result)
    }

    fn resolve(
        &mut self,
        round: usize,
        team_a: &Team,
        team_b: &Team,
        rng: &mut StdRng,
    ) -> Result<RoundResult, SimulationError> {
        let skill_a = team_a.skill_sum(&self.population)?;
        let skill_b = team_b.skill_sum(&self.population)?;
        let avg_rating_a = team_a.average_rating(&self.population)?;
        let avg_rating_b = team_b.average_rating(&self.population)?;

        let outcome = self.config.outcome_model.decide(skill_a, skill_b, rng);
        let update = rating::team_update(
            avg_rating_a,
            avg_rating_b,
            outcome,
            &self.config.elo_params(),
        );

        self.apply(team_a, update.delta_a)?;
        self.apply(team_b, update.delta_b)?;

        Ok(RoundResult {
            round,
            team_a: team_a.player_ids.clone(),
            team_b: team_b.player_ids.clone(),
            skill_a,
            skill_b,
            avg_rating_a,
            avg_rating_b,
            outcome,
            update,
        })
    }

    fn apply(&mut self, team: &Team, delta: f64) -> Result<(), SimulationError> {
        for &id in &team.player_ids {
            self.population.player_mut(id)?.record_game(delta);
        }
        Ok(())
    }

    /// Play `rounds` more rounds
    pub fn run(&mut self, rounds: usize) -> Result<(), SimulationError> {
        for _ in 0..rounds {
            self.play_round()?;
        }
        Ok(())
    }

    /// Play whatever is left of `total_rounds`
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        self.run(self.remaining_rounds())?;
        tracing::info!(
            rounds = self.stats.rounds,
            correlation = rating_skill_correlation(self.population.players()),
            "simulation complete"
        );
        Ok(())
    }

    /// Summarize the current population
    pub fn report(&self) -> RunReport {
        RunReport::new(
            self.rng_seed,
            self.stats.clone(),
            self.population.players(),
            self.config.max_skill_level,
        )
    }

    /// Get current simulation state as JSON
    pub fn get_state_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string(&SimulationState {
            rounds_played: self.stats.rounds,
            stats: &self.stats,
            config: &self.config,
        })?)
    }
}

#[derive(Serialize)]
struct SimulationState<'a> {
    rounds_played: usize,
    stats: &'a SimulationStats,
    config: &'a SimulationConfig,
}

/// One point of a parameter sweep
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub parameter_value: f64,
    pub correlation: f64,
    pub rounds_played: usize,
    pub levels: Vec<SkillLevelSummary>,
}

/// Set a named numeric parameter on a config
///
/// Count-like parameters only accept whole, non-negative values.
pub fn apply_parameter(
    config: &mut SimulationConfig,
    parameter: &str,
    value: f64,
) -> Result<(), SimulationError> {
    match parameter {
        "k_factor" => config.k_factor = value,
        "rating_spread" => config.rating_spread = value,
        "initial_rating" => config.initial_rating = value,
        "team_size" => {
            config.team_size = whole_number(parameter, value, usize::MAX as f64)? as usize
        }
        "total_rounds" => {
            config.total_rounds = whole_number(parameter, value, usize::MAX as f64)? as usize
        }
        "total_players" => {
            config.total_players = whole_number(parameter, value, usize::MAX as f64)? as usize
        }
        "max_skill_level" => {
            config.max_skill_level = whole_number(parameter, value, u32::MAX as f64)? as u32
        }
        _ => return Err(SimulationError::UnknownParameter(parameter.to_string())),
    }
    Ok(())
}

fn whole_number(parameter: &str, value: f64, max: f64) -> Result<f64, SimulationError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > max {
        return Err(SimulationError::InvalidConfig(format!(
            "{} must be a whole non-negative number, got {}",
            parameter, value
        )));
    }
    Ok(value)
}

/// Run one complete simulation per value of `parameter`
///
/// Run `i` uses seed `seed + i`.
pub fn sweep(
    base: &SimulationConfig,
    parameter: &str,
    values: &[f64],
    seed: u64,
) -> Result<Vec<SweepResult>, SimulationError> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let mut config = base.clone();
            apply_parameter(&mut config, parameter, value)?;

            let mut sim = Simulation::new(config, seed.wrapping_add(i as u64))?;
            sim.run_to_completion()?;
            let report = sim.report();

            tracing::debug!(parameter, value, correlation = report.correlation, "sweep point");

            Ok(SweepResult {
                parameter_value: value,
                correlation: report.correlation,
                rounds_played: report.rounds_played,
                levels: report.levels,
            })
        })
        .collect()
}
