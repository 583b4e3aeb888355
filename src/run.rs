use std::borrow::Borrow;

use log::{debug, info, warn};

use crate::{Error, Game, Marginals, Model, Prediction, RatingStore, RunConfig, SkillBelief};

/// Published to observers after a game has been fully applied.
#[derive(Debug)]
pub struct Commit<'a> {
    pub game: &'a Game,
    pub posteriors: &'a Marginals,
    pub prediction: Option<&'a Prediction>,
    /// Number of games processed, including this one.
    pub games_processed: usize,
}

type Observer = Box<dyn FnMut(&Commit<'_>) + Send + Sync>;

/// Rating state of one replay over a stream of games: skill histories, draw
/// margin history and the predictions made along the way.
pub struct RatingRun {
    config: RunConfig,
    store: RatingStore,
    predictions: Vec<Prediction>,
    games_processed: usize,
    seeded: bool,
    observers: Vec<Observer>,
}

impl RatingRun {
    pub fn new(config: RunConfig) -> RatingRun {
        RatingRun {
            store: RatingStore::new(config.initial_draw_margin()),
            config,
            predictions: Vec::new(),
            games_processed: 0,
            seeded: false,
            observers: Vec::new(),
        }
    }

    /// Starts a run with explicit priors. `priors.draw_margin` replaces the
    /// configured initial draw margin.
    pub fn with_priors(config: RunConfig, priors: &Marginals) -> RatingRun {
        let mut run = RatingRun {
            store: RatingStore::new(priors.draw_margin),
            config,
            predictions: Vec::new(),
            games_processed: 0,
            seeded: true,
            observers: Vec::new(),
        };
        let mut players: Vec<_> = priors.skills.iter().collect();
        players.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        for (player, prior) in players {
            run.store.ensure_player(player, *prior);
        }
        run
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut RatingStore {
        &mut self.store
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn games_processed(&self) -> usize {
        self.games_processed
    }

    /// Registers a callback that sees every committed game.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Commit<'_>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Current belief of `player`, or the default prior if `player` has not
    /// played yet.
    fn prior(&self, game: &Game, player: &str) -> Result<SkillBelief, Error> {
        match self.store.latest(player) {
            Ok(belief) => Ok(belief),
            Err(_) => self
                .config
                .default_skill_prior()
                .ok_or_else(|| Error::MissingDefaultPrior {
                    player: player.into(),
                })
                .inspect(|_| {
                    if self.seeded {
                        warn!(
                            "player {} in game {} has no explicit prior, using default",
                            player, game.id
                        );
                    }
                }),
        }
    }

    fn priors(&self, game: &Game) -> Result<Marginals, Error> {
        let mut priors = Marginals::new(self.store.latest_draw_margin());
        for player in game.players() {
            let prior = self.prior(game, player)?;
            if priors.skills.insert(player.into(), prior).is_some() {
                return Err(Error::DuplicatePlayer {
                    game_id: game.id.clone(),
                    player: player.into(),
                });
            }
        }
        Ok(priors)
    }

    /// Predicts (if configured) and then trains on a single game. Either the
    /// whole update is applied or, on error, nothing is.
    pub fn process<M: Model + ?Sized>(&mut self, model: &M, game: &Game) -> Result<(), Error> {
        let priors = self.priors(game)?;

        let prediction = if self.config.predict() {
            let mut prediction = model
                .predict_outcome(game, &priors)
                .map_err(|source| Error::Model {
                    game_id: game.id.clone(),
                    source,
                })?;
            // The game, not the model, is authoritative for what happened.
            prediction.game_id = game.id.clone();
            prediction.actual = game.outcome;
            Some(prediction)
        } else {
            None
        };

        let posteriors = model.train(game, &priors).map_err(|source| Error::Model {
            game_id: game.id.clone(),
            source,
        })?;

        let mut updates = Vec::with_capacity(game.players.len());
        for player in game.players() {
            updates.push((
                player,
                priors.skills[player],
                posteriors
                    .skill(player)
                    .ok_or_else(|| Error::MissingPosterior {
                        game_id: game.id.clone(),
                        player: player.into(),
                    })?,
            ));
        }

        // Validated. Nothing below can fail.
        for (player, prior, posterior) in updates {
            self.store.ensure_player(player, prior);
            self.store.append_skill(player, posterior)?;
        }
        self.store.append_draw_margin(posteriors.draw_margin);
        if let Some(prediction) = prediction {
            self.predictions.push(prediction);
        }
        self.games_processed += 1;

        debug!(
            "game {} ({}): {} players updated, draw margin {:.3}",
            game.id,
            game.outcome,
            game.players.len(),
            posteriors.draw_margin.mean
        );

        if !self.observers.is_empty() {
            let commit = Commit {
                game,
                posteriors: &posteriors,
                prediction: self.predictions.last().filter(|_| self.config.predict()),
                games_processed: self.games_processed,
            };
            for observer in &mut self.observers {
                observer(&commit);
            }
        }

        Ok(())
    }

    /// Processes `games` strictly in order. Stops at the first failure, leaving
    /// the run as it was after the last successfully applied game.
    pub fn replay<M, I>(&mut self, model: &M, games: I) -> Result<usize, Error>
    where
        M: Model + ?Sized,
        I: IntoIterator,
        I::Item: Borrow<Game>,
    {
        info!("replaying games with model {}", model.name());
        let mut processed = 0;
        for game in games {
            self.process(model, game.borrow())?;
            processed += 1;
        }
        info!(
            "replayed {} games, {} players, {} predictions",
            processed,
            self.store.len(),
            self.predictions.len()
        );
        Ok(processed)
    }
}
