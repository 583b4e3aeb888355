use std::cmp::Reverse;

use compensated_summation::KahanBabuskaNeumaier;
use ordered_float::OrderedFloat;
use rand::{seq::SliceRandom as _, RngCore};

use crate::{Error, RatingRun, SkillBelief};

/// Point of a player's skill trajectory, for plotting.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrajectoryPoint {
    /// `0` is the prior, `k` the belief after the player's `k`-th game.
    pub index: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Which players [`RatingRun::top_n()`] picks, and in what order.
pub enum Selector<'r> {
    /// Highest conservative skill first.
    BySkill,
    /// Most games played first.
    ByGamesPlayed,
    /// Uniformly random subset, in random order.
    Random(&'r mut dyn RngCore),
    /// Order of first appearance.
    FirstInStream,
    /// Players with at least `min_games` games, highest conservative skill
    /// first.
    Veterans { min_games: usize },
}

impl Selector<'static> {
    pub const VETERANS: Selector<'static> = Selector::Veterans { min_games: 100 };
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Limit {
    Count(usize),
    Unbounded,
}

impl Limit {
    fn apply<T>(self, items: &mut Vec<T>) {
        if let Limit::Count(n) = self {
            items.truncate(n);
        }
    }
}

fn conservative_key(history: &[SkillBelief]) -> Reverse<OrderedFloat<f64>> {
    Reverse(OrderedFloat(history[history.len() - 1].conservative()))
}

impl RatingRun {
    /// All players by descending conservative skill. Ties keep the order of
    /// first appearance.
    pub fn leaderboard(&self) -> Vec<(&str, f64)> {
        let mut board: Vec<_> = self
            .store()
            .iter()
            .map(|(player, history)| (player, history[history.len() - 1].conservative()))
            .collect();
        board.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
        board
    }

    pub fn trajectory(
        &self,
        player: &str,
    ) -> Result<impl ExactSizeIterator<Item = TrajectoryPoint> + Clone + '_, Error> {
        Ok(self
            .store()
            .history(player)?
            .iter()
            .enumerate()
            .map(|(index, belief)| TrajectoryPoint {
                index,
                mean: belief.mean,
                std_dev: belief.std_dev(),
            }))
    }

    pub fn games_played(&self, player: &str) -> Result<usize, Error> {
        Ok(self.store().history(player)?.len() - 1)
    }

    pub fn top_n(&self, selector: Selector<'_>, limit: Limit) -> Vec<&str> {
        let mut players: Vec<_> = self.store().iter().collect();
        match selector {
            Selector::BySkill => players.sort_by_key(|&(_, history)| conservative_key(history)),
            Selector::ByGamesPlayed => players.sort_by_key(|&(_, history)| Reverse(history.len())),
            Selector::Random(rng) => players.shuffle(rng),
            Selector::FirstInStream => (),
            Selector::Veterans { min_games } => {
                players.retain(|&(_, history)| history.len() > min_games);
                players.sort_by_key(|&(_, history)| conservative_key(history));
            }
        }
        limit.apply(&mut players);
        players.into_iter().map(|(player, _)| player).collect()
    }

    /// Mean of the latest skill means of all players, or `None` if there are
    /// no players yet.
    pub fn skill_average(&self) -> Option<f64> {
        if self.store().is_empty() {
            return None;
        }
        let mut total = KahanBabuskaNeumaier::<f64>::new();
        for (_, history) in self.store().iter() {
            total += history[history.len() - 1].mean;
        }
        Some(total.total() / self.store().len() as f64)
    }
}
