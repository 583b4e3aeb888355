use std::fmt;

use crate::{DrawPolicy, Outcome};

/// Unique identifier of a game within a stream.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GameId(pub Box<str>);

impl From<&str> for GameId {
    fn from(id: &str) -> GameId {
        GameId(id.into())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> GameId {
        GameId(id.into_boxed_str())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finished game between two or more players.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    /// Participants in a fixed order. [`Outcome::Winner`] indexes into this.
    pub players: Vec<Box<str>>,
    pub outcome: Outcome,
}

impl Game {
    pub fn new<I, P>(id: impl Into<GameId>, players: I, outcome: Outcome) -> Game
    where
        I: IntoIterator<Item = P>,
        P: Into<Box<str>>,
    {
        Game {
            id: id.into(),
            players: players.into_iter().map(Into::into).collect(),
            outcome,
        }
    }

    /// Two-player game.
    pub fn head_to_head(
        id: impl Into<GameId>,
        first: impl Into<Box<str>>,
        second: impl Into<Box<str>>,
        outcome: Outcome,
    ) -> Game {
        Game {
            id: id.into(),
            players: vec![first.into(), second.into()],
            outcome,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &str> + '_ {
        self.players.iter().map(|player| &**player)
    }
}

/// What a model expected before it was trained on a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub game_id: GameId,
    pub predicted: Outcome,
    pub actual: Outcome,
    /// Natural logarithm of the probability the model assigned to `actual`.
    pub log_prob_of_truth: f64,
}

impl Prediction {
    pub fn is_correct(&self, draw_policy: DrawPolicy) -> bool {
        draw_policy.matches(self.predicted, self.actual)
    }
}
