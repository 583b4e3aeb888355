use crate::{
    gaussian::{cdf_over_pdf, ln_standard_cdf, ln_standard_pdf, standard_cdf, standard_pdf},
    Game, Gaussian, Marginals, Model, ModelError, Outcome, Prediction,
};

#[derive(Debug, Clone)]
pub struct TrueSkillBuilder {
    name: String,
    performance_variance: f64,
    dynamics_variance: f64,
}

impl Default for TrueSkillBuilder {
    fn default() -> TrueSkillBuilder {
        TrueSkillBuilder::new()
    }
}

impl TrueSkillBuilder {
    pub fn new() -> TrueSkillBuilder {
        TrueSkillBuilder {
            name: "TrueSkill".to_owned(),
            performance_variance: 20.0 * 20.0,
            dynamics_variance: 0.0,
        }
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Variance of a player's performance in a single game around their skill.
    pub fn performance_variance(&mut self, performance_variance: f64) -> &mut Self {
        assert!(performance_variance > 0.0);
        self.performance_variance = performance_variance;
        self
    }

    /// Variance added to every skill belief before each game, allowing skills
    /// to drift over time.
    pub fn dynamics_variance(&mut self, dynamics_variance: f64) -> &mut Self {
        assert!(dynamics_variance >= 0.0);
        self.dynamics_variance = dynamics_variance;
        self
    }

    pub fn build(&self) -> TrueSkill {
        TrueSkill {
            name: self.name.clone(),
            performance_variance: self.performance_variance,
            dynamics_variance: self.dynamics_variance,
        }
    }
}

/// Two-player TrueSkill with closed-form moment matching.
///
/// Performances are the players' skills plus Gaussian noise. The first player
/// wins if their performance exceeds the second's by more than the draw
/// margin, loses if it falls short by more than the draw margin, and draws
/// otherwise. The draw margin is taken as the mean of the draw margin belief,
/// which is passed through unchanged.
#[derive(Debug, Clone)]
pub struct TrueSkill {
    name: String,
    performance_variance: f64,
    dynamics_variance: f64,
}

impl Default for TrueSkill {
    fn default() -> TrueSkill {
        TrueSkill::new()
    }
}

/// Probabilities from the first player's perspective, kept as natural
/// logarithms so that very unlikely outcomes stay distinguishable from
/// impossible ones.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutcomeProbabilities {
    pub ln_first_wins: f64,
    pub ln_draw: f64,
    pub ln_second_wins: f64,
}

impl OutcomeProbabilities {
    pub fn first_wins(&self) -> f64 {
        self.ln_first_wins.exp()
    }

    pub fn draw(&self) -> f64 {
        self.ln_draw.exp()
    }

    pub fn second_wins(&self) -> f64 {
        self.ln_second_wins.exp()
    }

    pub fn ln_of(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Winner(0) => self.ln_first_wins,
            Outcome::Winner(_) => self.ln_second_wins,
            Outcome::Draw => self.ln_draw,
        }
    }

    pub fn of(&self, outcome: Outcome) -> f64 {
        self.ln_of(outcome).exp()
    }

    /// Most likely outcome. Ties favor a decisive result, then the first
    /// player.
    pub fn most_likely(&self) -> Outcome {
        if self.ln_first_wins >= self.ln_second_wins && self.ln_first_wins >= self.ln_draw {
            Outcome::FIRST_WINS
        } else if self.ln_second_wins >= self.ln_draw {
            Outcome::SECOND_WINS
        } else {
            Outcome::Draw
        }
    }
}

impl TrueSkill {
    pub fn builder() -> TrueSkillBuilder {
        TrueSkillBuilder::default()
    }

    pub fn new() -> TrueSkill {
        TrueSkill::builder().build()
    }

    pub fn performance_variance(&self) -> f64 {
        self.performance_variance
    }

    pub fn dynamics_variance(&self) -> f64 {
        self.dynamics_variance
    }

    fn pair(&self, game: &Game, priors: &Marginals) -> Result<(Gaussian, Gaussian), ModelError> {
        if game.players.len() != 2 {
            return Err(ModelError::UnsupportedArity {
                supported: 2,
                actual: game.players.len(),
            });
        }
        if matches!(game.outcome, Outcome::Winner(i) if i > 1) {
            return Err(ModelError::InvalidOutcome(game.outcome));
        }
        Ok((
            priors.require_skill(&game.players[0])?.widen(self.dynamics_variance),
            priors.require_skill(&game.players[1])?.widen(self.dynamics_variance),
        ))
    }

    /// Standard deviation of the difference between the two performances.
    fn performance_std_dev(&self, first: Gaussian, second: Gaussian) -> f64 {
        (2.0 * self.performance_variance + first.variance + second.variance).sqrt()
    }

    pub fn outcome_probabilities(
        &self,
        first: Gaussian,
        second: Gaussian,
        draw_margin: f64,
    ) -> OutcomeProbabilities {
        let c = self.performance_std_dev(first, second);
        let t = (first.mean - second.mean) / c;
        let e = draw_margin.max(0.0) / c;
        OutcomeProbabilities {
            ln_first_wins: ln_standard_cdf(t - e),
            ln_draw: ln_draw_probability(t, e),
            ln_second_wins: ln_standard_cdf(-t - e),
        }
    }
}

/// Log probability that the normalized performance difference lands within
/// `e` of zero, given its mean `t`. Evaluated for `|t|` so both ends of the
/// interval lie in the lower tail.
fn ln_draw_probability(t: f64, e: f64) -> f64 {
    let s = t.abs();
    if e - s > 0.0 {
        (standard_cdf(e - s) - standard_cdf(-e - s)).ln()
    } else {
        ln_standard_pdf(e - s) + draw_mass_over_pdf(s, e).ln()
    }
}

/// `(cdf(e - s) - cdf(-e - s)) / pdf(e - s)`.
fn draw_mass_over_pdf(s: f64, e: f64) -> f64 {
    cdf_over_pdf(e - s) - cdf_over_pdf(-e - s) * (-2.0 * e * s).exp()
}

/// Mean and variance correction factors for a decisive result, where `t` is
/// the winner's normalized lead and `e` the normalized draw margin.
fn win_factors(t: f64, e: f64) -> (f64, f64) {
    let x = t - e;
    let v = if x < 0.0 {
        1.0 / cdf_over_pdf(x)
    } else {
        standard_pdf(x) / standard_cdf(x)
    };
    (v, (v * (v + x)).clamp(0.0, 1.0))
}

/// Correction factors for a draw, where `t` is the first player's normalized
/// lead. `v` is odd and `w` even in `t`, so both are evaluated for `|t|` with
/// every density scaled by `pdf(e - |t|)`.
fn draw_factors(t: f64, e: f64) -> (f64, f64) {
    let s = t.abs();
    let ratio = (-2.0 * e * s).exp(); // pdf(e + s) / pdf(e - s)
    let mass = draw_mass_over_pdf(s, e);
    let v = (ratio - 1.0) / mass;
    let w = v * v + ((e - s) + (e + s) * ratio) / mass;
    (if t < 0.0 { -v } else { v }, w.clamp(0.0, 1.0))
}

fn update(belief: Gaussian, sign: f64, c: f64, v: f64, w: f64) -> Gaussian {
    Gaussian {
        mean: belief.mean + sign * belief.variance / c * v,
        variance: belief.variance * (1.0 - belief.variance / (c * c) * w),
    }
}

impl Model for TrueSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, game: &Game, priors: &Marginals) -> Result<Marginals, ModelError> {
        let (first, second) = self.pair(game, priors)?;
        let c = self.performance_std_dev(first, second);
        let e = priors.draw_margin.mean.max(0.0) / c;

        let (first, second) = match game.outcome {
            Outcome::Winner(0) => {
                let (v, w) = win_factors((first.mean - second.mean) / c, e);
                (update(first, 1.0, c, v, w), update(second, -1.0, c, v, w))
            }
            Outcome::Winner(_) => {
                let (v, w) = win_factors((second.mean - first.mean) / c, e);
                (update(first, -1.0, c, v, w), update(second, 1.0, c, v, w))
            }
            Outcome::Draw => {
                let (v, w) = draw_factors((first.mean - second.mean) / c, e);
                (update(first, 1.0, c, v, w), update(second, -1.0, c, v, w))
            }
        };

        if !first.is_finite() || !second.is_finite() || first.variance <= 0.0 || second.variance <= 0.0 {
            return Err(ModelError::Degenerate);
        }

        Ok(Marginals::new(priors.draw_margin)
            .with_skill(game.players[0].clone(), first)
            .with_skill(game.players[1].clone(), second))
    }

    fn predict_outcome(&self, game: &Game, priors: &Marginals) -> Result<Prediction, ModelError> {
        let (first, second) = self.pair(game, priors)?;
        let probabilities = self.outcome_probabilities(first, second, priors.draw_margin.mean);
        Ok(Prediction {
            game_id: game.id.clone(),
            predicted: probabilities.most_likely(),
            actual: game.outcome,
            log_prob_of_truth: probabilities.ln_of(game.outcome),
        })
    }
}
