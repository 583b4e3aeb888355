use crate::{DrawMarginBelief, DrawPolicy, Gaussian, SkillBelief};

#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    default_skill_prior: Option<SkillBelief>,
    initial_draw_margin: DrawMarginBelief,
    predict: bool,
    draw_policy: DrawPolicy,
}

impl Default for RunConfigBuilder {
    fn default() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }
}

impl RunConfigBuilder {
    pub fn new() -> RunConfigBuilder {
        RunConfigBuilder {
            default_skill_prior: Some(Gaussian::from_mean_and_std_dev(120.0, 40.0)),
            initial_draw_margin: Gaussian::new(5.0, 1.0),
            predict: true,
            draw_policy: DrawPolicy::Strict,
        }
    }

    /// Prior for players that first appear in the game stream.
    pub fn default_skill_prior(&mut self, prior: SkillBelief) -> &mut Self {
        assert!(prior.is_finite());
        assert!(prior.variance >= 0.0);
        self.default_skill_prior = Some(prior);
        self
    }

    /// Require explicit priors for every player. Unseen players then fail the
    /// run with [`Error::MissingDefaultPrior`](crate::Error).
    pub fn no_default_skill_prior(&mut self) -> &mut Self {
        self.default_skill_prior = None;
        self
    }

    pub fn initial_draw_margin(&mut self, belief: DrawMarginBelief) -> &mut Self {
        assert!(belief.is_finite());
        assert!(belief.variance >= 0.0);
        self.initial_draw_margin = belief;
        self
    }

    /// Whether to ask the model for a prediction before training on each game.
    pub fn predict(&mut self, predict: bool) -> &mut Self {
        self.predict = predict;
        self
    }

    pub fn draw_policy(&mut self, draw_policy: DrawPolicy) -> &mut Self {
        self.draw_policy = draw_policy;
        self
    }

    pub fn build(&self) -> RunConfig {
        RunConfig {
            default_skill_prior: self.default_skill_prior,
            initial_draw_margin: self.initial_draw_margin,
            predict: self.predict,
            draw_policy: self.draw_policy,
        }
    }
}

/// Settings of a [`RatingRun`](crate::RatingRun).
#[derive(Debug, Clone)]
pub struct RunConfig {
    default_skill_prior: Option<SkillBelief>,
    initial_draw_margin: DrawMarginBelief,
    predict: bool,
    draw_policy: DrawPolicy,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig::new()
    }
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn new() -> RunConfig {
        RunConfig::builder().build()
    }

    pub fn default_skill_prior(&self) -> Option<SkillBelief> {
        self.default_skill_prior
    }

    pub fn initial_draw_margin(&self) -> DrawMarginBelief {
        self.initial_draw_margin
    }

    pub fn predict(&self) -> bool {
        self.predict
    }

    pub fn draw_policy(&self) -> DrawPolicy {
        self.draw_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new();
        assert_eq!(config.default_skill_prior(), Some(Gaussian::new(120.0, 1600.0)));
        assert!(config.predict());
        assert_eq!(config.draw_policy(), DrawPolicy::Strict);
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::builder()
            .no_default_skill_prior()
            .predict(false)
            .draw_policy(DrawPolicy::Ignore)
            .initial_draw_margin(Gaussian::new(1.0, 0.5))
            .build();
        assert_eq!(config.default_skill_prior(), None);
        assert!(!config.predict());
        assert_eq!(config.initial_draw_margin(), Gaussian::new(1.0, 0.5));
    }

    #[test]
    #[should_panic]
    fn test_negative_variance() {
        RunConfig::builder().default_skill_prior(Gaussian::new(0.0, -1.0));
    }
}
