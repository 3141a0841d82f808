use crate::error::SimulationError;
use crate::population::Population;
use crate::rating::average_rating;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Players drawn onto one side of a round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub player_ids: Vec<usize>,
}

impl Team {
    pub fn size(&self) -> usize {
        self.player_ids.len()
    }

    /// Sum of hidden skill levels; decides the true winner
    pub fn skill_sum(&self, population: &Population) -> Result<u32, SimulationError> {
        self.player_ids
            .iter()
            .map(|&id| population.player(id).map(|p| p.skill))
            .sum()
    }

    /// Mean current rating; what the Elo update sees
    pub fn average_rating(&self, population: &Population) -> Result<f64, SimulationError> {
        let ratings = self
            .player_ids
            .iter()
            .map(|&id| population.player(id).map(|p| p.rating))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(average_rating(ratings))
    }
}

/// Forms random, unbalanced teams from the shared population
pub struct Matchmaker {
    team_size: usize,
}

impl Matchmaker {
    pub fn new(team_size: usize) -> Self {
        Self { team_size }
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Draw team A then team B without replacement
    ///
    /// Nothing is drawn unless the pool can supply both full teams, so a failure
    /// leaves the population untouched.
    pub fn form_teams(
        &self,
        population: &mut Population,
        rng: &mut impl Rng,
    ) -> Result<(Team, Team), SimulationError> {
        let required = self.team_size.saturating_mul(2);
        if population.available() < required {
            return Err(SimulationError::InsufficientPlayers {
                available: population.available(),
                required,
            });
        }

        let team_a = self.draw_team(population, rng)?;
        let team_b = self.draw_team(population, rng)?;
        Ok((team_a, team_b))
    }

    fn draw_team(
        &self,
        population: &mut Population,
        rng: &mut impl Rng,
    ) -> Result<Team, SimulationError> {
        let player_ids = (0..self.team_size)
            .map(|_| population.draw_random(rng))
            .collect::<Result<Vec<usize>, _>>()?;
        Ok(Team { player_ids })
    }

    /// Return every member of a finished team to the pool
    ///
    /// Keeps returning the rest of the team past a bad id; the first error is reported.
    pub fn dissolve(population: &mut Population, team: Team) -> Result<(), SimulationError> {
        let mut first_error = None;
        for id in team.player_ids {
            if let Err(err) = population.return_player(id) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
