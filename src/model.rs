use rustc_hash::FxHashMap;

use crate::{DrawMarginBelief, Game, ModelError, Prediction, SkillBelief};

/// Beliefs going into or coming out of inference on a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginals {
    pub skills: FxHashMap<Box<str>, SkillBelief>,
    pub draw_margin: DrawMarginBelief,
}

impl Marginals {
    pub fn new(draw_margin: DrawMarginBelief) -> Marginals {
        Marginals {
            skills: FxHashMap::default(),
            draw_margin,
        }
    }

    #[must_use]
    pub fn with_skill(mut self, player: impl Into<Box<str>>, belief: SkillBelief) -> Marginals {
        self.skills.insert(player.into(), belief);
        self
    }

    pub fn skill(&self, player: &str) -> Option<SkillBelief> {
        self.skills.get(player).copied()
    }

    /// Like [`Marginals::skill()`], but a missing belief is an error.
    pub fn require_skill(&self, player: &str) -> Result<SkillBelief, ModelError> {
        self.skill(player).ok_or_else(|| ModelError::MissingPrior {
            player: player.into(),
        })
    }

    /// Overwrites beliefs with those from `posteriors`.
    pub fn absorb(&mut self, posteriors: &Marginals) {
        self.skills.extend(
            posteriors
                .skills
                .iter()
                .map(|(player, belief)| (player.clone(), *belief)),
        );
        self.draw_margin = posteriors.draw_margin;
    }
}

/// Inference engine that turns priors and an observed game into posteriors.
pub trait Model {
    /// Display label.
    fn name(&self) -> &str;

    /// Infers posteriors for one game. The result must contain a belief for
    /// every player of `game`, and the updated draw margin.
    fn train(&self, game: &Game, priors: &Marginals) -> Result<Marginals, ModelError>;

    /// Trains on `games` in order, feeding each game's posteriors into the
    /// priors of the next. Returns the posteriors of every game.
    fn train_batch(&self, games: &[Game], priors: &Marginals) -> Result<Vec<Marginals>, ModelError> {
        let mut current = priors.clone();
        let mut results = Vec::with_capacity(games.len());
        for game in games {
            let posteriors = self.train(game, &current)?;
            current.absorb(&posteriors);
            results.push(posteriors);
        }
        Ok(results)
    }

    /// Predicts the outcome of `game` without learning from it.
    fn predict_outcome(&self, game: &Game, priors: &Marginals) -> Result<Prediction, ModelError>;
}

impl<M: Model + ?Sized> Model for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn train(&self, game: &Game, priors: &Marginals) -> Result<Marginals, ModelError> {
        (**self).train(game, priors)
    }

    fn train_batch(&self, games: &[Game], priors: &Marginals) -> Result<Vec<Marginals>, ModelError> {
        (**self).train_batch(games, priors)
    }

    fn predict_outcome(&self, game: &Game, priors: &Marginals) -> Result<Prediction, ModelError> {
        (**self).predict_outcome(game, priors)
    }
}
