use crate::error::SimulationError;
use crate::types::{Player, SimulationConfig};
use rand::Rng;
use serde::Serialize;

/// Arena of players plus the pool of ids available for drawing
///
/// Players never move once created; their id is their index. A player is either in
/// `pool` or flagged in `in_play`, never both. Drawing swap-removes from the id pool
/// so the player storage itself is never reordered.
///
/// Serialize-only: the pool/flag invariant is established by the constructors.
#[derive(Clone, Debug, Serialize)]
pub struct Population {
    players: Vec<Player>,
    pool: Vec<usize>,
    in_play: Vec<bool>,
}

impl Population {
    /// Wrap existing players, all available
    ///
    /// Ids are reassigned to arena positions.
    pub fn from_players(mut players: Vec<Player>) -> Self {
        for (id, player) in players.iter_mut().enumerate() {
            player.id = id;
        }
        let count = players.len();
        Self {
            players,
            pool: (0..count).collect(),
            in_play: vec![false; count],
        }
    }

    /// Create `total_players` players with uniformly drawn skill levels
    pub fn generate(config: &SimulationConfig, rng: &mut impl Rng) -> Self {
        let players = (0..config.total_players)
            .map(|id| {
                let skill = rng.gen_range(0..=config.max_skill_level);
                Player::new(id, skill, config.initial_rating)
            })
            .collect();
        Self::from_players(players)
    }

    /// Total players, in play or not
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players that can currently be drawn
    pub fn available(&self) -> usize {
        self.pool.len()
    }

    pub fn in_play_count(&self) -> usize {
        self.in_play.iter().filter(|&&flag| flag).count()
    }

    pub fn is_in_play(&self, id: usize) -> bool {
        self.in_play.get(id).copied().unwrap_or(false)
    }

    /// Remove a uniformly random available player and mark them in play
    pub fn draw_random(&mut self, rng: &mut impl Rng) -> Result<usize, SimulationError> {
        if self.pool.is_empty() {
            return Err(SimulationError::EmptyPopulation);
        }
        let slot = rng.gen_range(0..self.pool.len());
        let id = self.pool.swap_remove(slot);
        self.in_play[id] = true;
        Ok(id)
    }

    /// Put a drawn player back into the pool
    pub fn return_player(&mut self, id: usize) -> Result<(), SimulationError> {
        match self.in_play.get_mut(id) {
            None => Err(SimulationError::UnknownPlayer(id)),
            Some(false) => Err(SimulationError::NotInPlay(id)),
            Some(flag) => {
                *flag = false;
                self.pool.push(id);
                Ok(())
            }
        }
    }

    pub fn player(&self, id: usize) -> Result<&Player, SimulationError> {
        self.players.get(id).ok_or(SimulationError::UnknownPlayer(id))
    }

    pub fn player_mut(&mut self, id: usize) -> Result<&mut Player, SimulationError> {
        self.players
            .get_mut(id)
            .ok_or(SimulationError::UnknownPlayer(id))
    }

    /// Every player in id order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players ordered by skill, highest first, ties by id
    pub fn players_by_skill(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| b.skill.cmp(&a.skill).then(a.id.cmp(&b.id)));
        sorted
    }

    /// True when every player is accounted for exactly once
    pub fn is_conserved(&self) -> bool {
        let mut seen = vec![false; self.players.len()];
        for &id in &self.pool {
            match seen.get_mut(id) {
                Some(slot) if !*slot && !self.in_play[id] => *slot = true,
                _ => return false,
            }
        }
        seen.iter()
            .zip(&self.in_play)
            .all(|(&pooled, &playing)| pooled != playing)
    }
}
