#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use skill_replay::{Game, Gaussian, Marginals, Model, Outcome, TrueSkill};

#[derive(Arbitrary)]
struct ArbitraryBelief {
    mean: f64,
    variance: f64,
}

impl ArbitraryBelief {
    fn into_clamped(self) -> Option<Gaussian> {
        if self.mean.is_nan() || self.variance.is_nan() {
            None
        } else {
            Some(Gaussian::new(
                self.mean.clamp(-10000.0, 10000.0),
                self.variance.clamp(1e-6, 1e6),
            ))
        }
    }
}

#[derive(Arbitrary)]
struct Encounter {
    first: ArbitraryBelief,
    second: ArbitraryBelief,
    draw_margin: f64,
    outcome: u8,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(encounter) = Encounter::arbitrary(&mut u) else {
        return;
    };
    let (Some(first), Some(second)) = (encounter.first.into_clamped(), encounter.second.into_clamped()) else {
        return;
    };
    if encounter.draw_margin.is_nan() {
        return;
    }

    let outcome = match encounter.outcome % 3 {
        0 => Outcome::FIRST_WINS,
        1 => Outcome::SECOND_WINS,
        _ => Outcome::Draw,
    };
    let game = Game::head_to_head("fuzz", "first", "second", outcome);
    let priors = Marginals::new(Gaussian::new(encounter.draw_margin.clamp(0.01, 1000.0), 1.0))
        .with_skill("first", first)
        .with_skill("second", second);

    let model = TrueSkill::new();

    let prediction = model.predict_outcome(&game, &priors).unwrap();
    assert!(prediction.log_prob_of_truth.is_finite());
    assert!(prediction.log_prob_of_truth <= 0.0);

    let posteriors = model.train(&game, &priors).unwrap();
    for player in ["first", "second"] {
        let belief = posteriors.skill(player).unwrap();
        assert!(belief.is_finite());
        assert!(belief.variance > 0.0);
    }
});
