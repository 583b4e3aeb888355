use std::f64::consts::{PI, SQRT_2};

/// A normal distribution, parameterized by mean and variance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub variance: f64,
}

/// Belief about the latent skill of one player at one point in time.
pub type SkillBelief = Gaussian;

/// Belief about the margin within which a performance difference counts as a
/// draw. One sequence of these is shared by all players of a run.
pub type DrawMarginBelief = Gaussian;

impl Gaussian {
    #[inline]
    pub fn new(mean: f64, variance: f64) -> Gaussian {
        Gaussian { mean, variance }
    }

    #[inline]
    pub fn from_mean_and_std_dev(mean: f64, std_dev: f64) -> Gaussian {
        Gaussian {
            mean,
            variance: std_dev * std_dev,
        }
    }

    /// A degenerate distribution with all mass at `value`.
    #[inline]
    pub fn point_mass(value: f64) -> Gaussian {
        Gaussian {
            mean: value,
            variance: 0.0,
        }
    }

    #[inline]
    pub fn std_dev(self) -> f64 {
        self.variance.sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.mean.is_finite() && self.variance.is_finite()
    }

    /// The same distribution with additional variance, for example to model
    /// skill drift between games.
    #[must_use]
    #[inline]
    pub fn widen(self, extra_variance: f64) -> Gaussian {
        Gaussian {
            variance: self.variance + extra_variance,
            ..self
        }
    }

    /// See [`SkillEstimate::conservative()`].
    #[inline]
    pub fn conservative(self) -> f64 {
        SkillEstimate::from(self).conservative()
    }
}

/// A skill estimate that is either a full distribution or a bare number.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SkillEstimate {
    Distributional(Gaussian),
    PointEstimate(f64),
}

impl From<Gaussian> for SkillEstimate {
    #[inline]
    fn from(gaussian: Gaussian) -> SkillEstimate {
        SkillEstimate::Distributional(gaussian)
    }
}

impl From<f64> for SkillEstimate {
    #[inline]
    fn from(value: f64) -> SkillEstimate {
        SkillEstimate::PointEstimate(value)
    }
}

impl SkillEstimate {
    #[inline]
    pub fn mean(self) -> f64 {
        match self {
            SkillEstimate::Distributional(gaussian) => gaussian.mean,
            SkillEstimate::PointEstimate(value) => value,
        }
    }

    #[inline]
    pub fn variance(self) -> f64 {
        match self {
            SkillEstimate::Distributional(gaussian) => gaussian.variance,
            SkillEstimate::PointEstimate(_) => 0.0,
        }
    }

    /// Lower bound used for ranking: `mean - sqrt(3 * variance)`. Point
    /// estimates have no uncertainty and are returned as is.
    #[inline]
    pub fn conservative(self) -> f64 {
        self.mean() - (3.0 * self.variance()).sqrt()
    }
}

/// Probability density of the standard normal distribution.
pub(crate) fn standard_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Natural logarithm of [`standard_pdf()`], finite for every finite `x`.
pub(crate) fn ln_standard_pdf(x: f64) -> f64 {
    -0.5 * x * x - 0.5 * (2.0 * PI).ln()
}

/// Cumulative distribution function of the standard normal distribution.
///
/// Accurate in relative terms only for `x <= 0`. Above about 8.3 the result
/// rounds to exactly 1.0, so upper tail masses must be computed from the
/// mirrored argument.
pub(crate) fn standard_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Natural logarithm of [`standard_cdf()`], finite for every finite `x`.
pub(crate) fn ln_standard_cdf(x: f64) -> f64 {
    if x < 0.0 {
        ln_standard_pdf(x) + cdf_over_pdf(x).ln()
    } else {
        standard_cdf(x).ln()
    }
}

/// `standard_cdf(x) / standard_pdf(x)`, without underflow for negative `x`.
pub(crate) fn cdf_over_pdf(x: f64) -> f64 {
    if x <= 0.0 {
        0.5 * (2.0 * PI).sqrt() * erfcx(-x / SQRT_2)
    } else {
        standard_cdf(x) / standard_pdf(x)
    }
}

/// Complementary error function with fractional error below 1.2e-7
/// everywhere, including far into the tails.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let r = erfcx(z) * (-z * z).exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}

/// Scaled complementary error function `exp(z^2) * erfc(z)` for `z >= 0`.
fn erfcx(z: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.5 * z);
    t * (-1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277)))))))))
        .exp()
}
