use std::str::FromStr;

use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use skill_replay::{Game, Outcome};
use thiserror::Error;

/// One row of a game CSV: `id,first,second,result`.
#[serde_as]
#[derive(Deserialize, Debug)]
pub struct RawGame {
    pub id: String,
    pub first: String,
    pub second: String,
    #[serde_as(as = "DisplayFromStr")]
    pub result: GameResult,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameResult {
    Unknown,
    Finished(Outcome),
}

#[derive(Debug, Error)]
#[error("invalid game result")]
pub struct InvalidGameResult;

impl FromStr for GameResult {
    type Err = InvalidGameResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "*" => GameResult::Unknown,
            _ => GameResult::Finished(s.parse().map_err(|_| InvalidGameResult)?),
        })
    }
}

impl RawGame {
    /// The game, unless it has no result.
    pub fn into_game(self) -> Option<Game> {
        match self.result {
            GameResult::Finished(outcome) => {
                Some(Game::head_to_head(self.id, self.first, self.second, outcome))
            }
            GameResult::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let data = "id,first,second,result\ng1,alice,bob,1-0\ng2,bob,carol,*\ng3,carol,alice,1/2-1/2\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let games: Vec<_> = reader
            .deserialize::<RawGame>()
            .map(|row| row.unwrap())
            .filter_map(RawGame::into_game)
            .collect();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0], Game::head_to_head("g1", "alice", "bob", Outcome::FIRST_WINS));
        assert_eq!(games[1].outcome, Outcome::Draw);
    }

    #[test]
    fn test_invalid_result() {
        assert!("2-0".parse::<GameResult>().is_err());
        let mut reader = csv::Reader::from_reader("id,first,second,result\ng1,a,b,x\n".as_bytes());
        assert!(reader.deserialize::<RawGame>().next().unwrap().is_err());
    }
}
