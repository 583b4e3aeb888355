//! Online Bayesian skill rating.
//!
//! A [`RatingRun`] replays a stream of games through a [`Model`], one game at
//! a time: it asks for a prediction with the current beliefs, then trains on
//! the game and appends the posteriors to each player's history. Leaderboards,
//! trajectories and calibration metrics are derived from the recorded state.
//!
//! ```
//! use skill_replay::{Game, Outcome, RatingRun, RunConfig, TrueSkill};
//!
//! let games = [
//!     Game::head_to_head("1", "alice", "bob", Outcome::FIRST_WINS),
//!     Game::head_to_head("2", "bob", "carol", Outcome::FIRST_WINS),
//! ];
//!
//! let mut run = RatingRun::new(RunConfig::new());
//! run.replay(&TrueSkill::new(), &games)?;
//!
//! assert_eq!(run.leaderboard()[0].0, "alice");
//! assert_eq!(run.cumulative_errors().len(), 2);
//! # Ok::<_, skill_replay::Error>(())
//! ```

mod config;
mod error;
mod game;
mod gaussian;
mod leaderboard;
mod model;
mod outcome;
mod run;
mod shared;
mod store;
mod trueskill;

pub mod metrics;

pub use config::{RunConfig, RunConfigBuilder};
pub use error::{Error, ModelError};
pub use game::{Game, GameId, Prediction};
pub use gaussian::{DrawMarginBelief, Gaussian, SkillBelief, SkillEstimate};
pub use leaderboard::{Limit, Selector, TrajectoryPoint};
pub use model::{Marginals, Model};
pub use outcome::{DrawPolicy, InvalidOutcome, Outcome};
pub use run::{Commit, RatingRun};
pub use shared::SharedRatingRun;
pub use store::{PlayerId, RatingStore};
pub use trueskill::{OutcomeProbabilities, TrueSkill, TrueSkillBuilder};
