use thiserror::Error;

/// Errors raised while configuring or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not enough players to form two teams: {available} available, {required} required")]
    InsufficientPlayers { available: usize, required: usize },

    #[error("cannot draw from an empty population")]
    EmptyPopulation,

    #[error("unknown player id {0}")]
    UnknownPlayer(usize),

    /// Returned for a player that is already back in the pool
    #[error("player {0} is not in play")]
    NotInPlay(usize),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
