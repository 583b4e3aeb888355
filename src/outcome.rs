use std::{fmt, str::FromStr};

use thiserror::Error;

/// Result of a game, in terms of positions in [`Game::players`](crate::Game).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The player at the given index won. All others lost.
    Winner(usize),
    Draw,
}

impl Outcome {
    pub const FIRST_WINS: Outcome = Outcome::Winner(0);
    pub const SECOND_WINS: Outcome = Outcome::Winner(1);

    pub fn is_draw(self) -> bool {
        self == Outcome::Draw
    }

    pub fn winner(self) -> Option<usize> {
        match self {
            Outcome::Winner(index) => Some(index),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid game result")]
pub struct InvalidOutcome;

impl FromStr for Outcome {
    type Err = InvalidOutcome;

    /// Parses the two-player notation `1-0`, `0-1` and `1/2-1/2`.
    fn from_str(s: &str) -> Result<Outcome, InvalidOutcome> {
        Ok(match s {
            "1-0" => Outcome::FIRST_WINS,
            "0-1" => Outcome::SECOND_WINS,
            "1/2-1/2" => Outcome::Draw,
            _ => return Err(InvalidOutcome),
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Outcome::Winner(0) => f.write_str("1-0"),
            Outcome::Winner(1) => f.write_str("0-1"),
            Outcome::Winner(index) => write!(f, "winner:{index}"),
            Outcome::Draw => f.write_str("1/2-1/2"),
        }
    }
}

/// How predictions are compared against actual outcomes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DrawPolicy {
    /// Predicted and actual outcome must be equal.
    #[default]
    Strict,
    /// Only a decisive prediction of a decisive game can be wrong. Anything
    /// involving a draw counts as correct.
    Ignore,
}

impl DrawPolicy {
    pub fn matches(self, predicted: Outcome, actual: Outcome) -> bool {
        match self {
            DrawPolicy::Strict => predicted == actual,
            DrawPolicy::Ignore => actual.is_draw() || predicted.is_draw() || predicted == actual,
        }
    }
}
