use std::error::Error as StdError;

use thiserror::Error;

use crate::{GameId, Outcome};

/// Failure reported by a [`Model`](crate::Model) implementation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model supports games with {supported} players, got {actual}")]
    UnsupportedArity { supported: usize, actual: usize },
    #[error("outcome {0} does not refer to a player of the game")]
    InvalidOutcome(Outcome),
    #[error("prior for {player} missing from marginals")]
    MissingPrior { player: Box<str> },
    #[error("inference produced non-finite beliefs")]
    Degenerate,
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown player: {0}")]
    UnknownPlayer(Box<str>),
    #[error("player {player} has no prior and no default skill prior is configured")]
    MissingDefaultPrior { player: Box<str> },
    #[error("model failed on game {game_id}")]
    Model {
        game_id: GameId,
        #[source]
        source: ModelError,
    },
    #[error("player {player} appears more than once in game {game_id}")]
    DuplicatePlayer { game_id: GameId, player: Box<str> },
    #[error("posteriors for game {game_id} are missing player {player}")]
    MissingPosterior { game_id: GameId, player: Box<str> },
}
