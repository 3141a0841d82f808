use crate::types::{Player, SimulationStats};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive statistics over a set of ratings
///
/// An empty set reports zeros rather than NaN.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by count)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl RatingStats {
    pub fn from_ratings(ratings: &[f64]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let count = ratings.len();
        let mean = ratings.iter().sum::<f64>() / count as f64;
        let variance = ratings.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count as f64;
        let min = ratings.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = ratings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Final rating distribution for one hidden skill level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillLevelSummary {
    pub skill_level: u32,
    pub ratings: RatingStats,
    pub avg_games_played: f64,
}

impl fmt::Display for SkillLevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skill Level: {}\tNumber of Players: {}\tAverage elo: {:.2}\tStandard Deviation: {:.2}\tMax elo: {:.2}\tMinimum elo: {:.2}\tAverage Games Played: {:.2}",
            self.skill_level,
            self.ratings.count,
            self.ratings.mean,
            self.ratings.std_dev,
            self.ratings.max,
            self.ratings.min,
            self.avg_games_played,
        )
    }
}

/// Group players by skill level and describe each group's ratings
///
/// Returns one entry per level from `max_skill_level` down to 0, including levels
/// nobody was assigned.
pub fn summarize_by_skill(players: &[Player], max_skill_level: u32) -> Vec<SkillLevelSummary> {
    let levels = max_skill_level as usize + 1;
    let mut ratings: Vec<Vec<f64>> = vec![Vec::new(); levels];
    let mut games: Vec<u64> = vec![0; levels];

    for player in players {
        // Out-of-range skills cannot come from generation; skip rather than index past the end
        if let Some(group) = ratings.get_mut(player.skill as usize) {
            group.push(player.rating);
            games[player.skill as usize] += player.games_played as u64;
        }
    }

    (0..=max_skill_level)
        .rev()
        .map(|level| {
            let group = &ratings[level as usize];
            let avg_games_played = if group.is_empty() {
                0.0
            } else {
                games[level as usize] as f64 / group.len() as f64
            };
            SkillLevelSummary {
                skill_level: level,
                ratings: RatingStats::from_ratings(group),
                avg_games_played,
            }
        })
        .collect()
}

/// Pearson correlation between hidden skill and final rating
///
/// 0.0 when either side has no variance.
pub fn rating_skill_correlation(players: &[Player]) -> f64 {
    if players.len() < 2 {
        return 0.0;
    }

    let n = players.len() as f64;
    let mean_skill = players.iter().map(|p| p.skill as f64).sum::<f64>() / n;
    let mean_rating = players.iter().map(|p| p.rating).sum::<f64>() / n;

    let (mut cov, mut var_skill, mut var_rating) = (0.0, 0.0, 0.0);
    for player in players {
        let ds = player.skill as f64 - mean_skill;
        let dr = player.rating - mean_rating;
        cov += ds * dr;
        var_skill += ds * ds;
        var_rating += dr * dr;
    }

    let denom = (var_skill * var_rating).sqrt();
    if denom > 0.0 && denom.is_finite() {
        cov / denom
    } else {
        0.0
    }
}

/// Everything a finished run reports
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub rounds_played: usize,
    pub stats: SimulationStats,
    /// Highest skill level first
    pub levels: Vec<SkillLevelSummary>,
    /// Pearson correlation of final rating against hidden skill
    pub correlation: f64,
}

impl RunReport {
    pub fn new(seed: u64, stats: SimulationStats, players: &[Player], max_skill_level: u32) -> Self {
        Self {
            seed,
            rounds_played: stats.rounds,
            levels: summarize_by_skill(players, max_skill_level),
            correlation: rating_skill_correlation(players),
            stats,
        }
    }

    pub fn level(&self, skill_level: u32) -> Option<&SkillLevelSummary> {
        self.levels.iter().find(|l| l.skill_level == skill_level)
    }
}
