use assert_approx_eq::assert_approx_eq;
use rustc_hash::FxHashMap;
use skill_replay::{
    Error, Game, GameId, Gaussian, Marginals, Model, ModelError, Outcome, Prediction, RatingRun,
    RunConfig, TrueSkill,
};

/// Returns posteriors fixed per game id, and a fixed prediction.
struct Scripted {
    posteriors: FxHashMap<&'static str, Marginals>,
}

impl Model for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn train(&self, game: &Game, _priors: &Marginals) -> Result<Marginals, ModelError> {
        self.posteriors
            .get(&*game.id.0)
            .cloned()
            .ok_or_else(|| ModelError::Other(format!("no script for {}", game.id).into()))
    }

    fn predict_outcome(&self, game: &Game, _priors: &Marginals) -> Result<Prediction, ModelError> {
        Ok(Prediction {
            game_id: game.id.clone(),
            predicted: Outcome::FIRST_WINS,
            actual: game.outcome,
            log_prob_of_truth: 0.25f64.ln(),
        })
    }
}

fn prior() -> Gaussian {
    Gaussian::new(0.0, 1.0)
}

fn three_players() -> Marginals {
    Marginals::new(Gaussian::new(0.5, 0.1))
        .with_skill("A", prior())
        .with_skill("B", prior())
        .with_skill("C", prior())
}

#[test]
fn test_end_to_end_with_scripted_model() {
    let draw_margin = Gaussian::new(0.5, 0.1);
    let model = Scripted {
        posteriors: [
            (
                "1",
                Marginals::new(draw_margin)
                    .with_skill("A", Gaussian::new(0.8, 0.7))
                    .with_skill("B", Gaussian::new(-0.8, 0.7)),
            ),
            (
                "2",
                Marginals::new(draw_margin)
                    .with_skill("B", Gaussian::new(-0.1, 0.5))
                    .with_skill("C", Gaussian::new(-0.7, 0.7)),
            ),
        ]
        .into_iter()
        .collect(),
    };
    let games = [
        Game::head_to_head("1", "A", "B", Outcome::FIRST_WINS),
        Game::head_to_head("2", "B", "C", Outcome::FIRST_WINS),
    ];

    let mut run = RatingRun::with_priors(RunConfig::new(), &three_players());
    assert_eq!(run.replay(&model, &games).unwrap(), 2);

    let board = run.leaderboard();
    let names: Vec<_> = board.iter().map(|&(name, _)| name).collect();
    assert_eq!(names, ["A", "B", "C"]);
    for &(name, score) in &board {
        assert_approx_eq!(score, run.store().latest(name).unwrap().conservative());
    }
    assert!(board.windows(2).all(|pair| pair[0].1 >= pair[1].1));

    assert_eq!(run.store().history("A").unwrap().len(), 2);
    assert_eq!(run.store().history("B").unwrap().len(), 3);
    assert_eq!(run.store().history("C").unwrap().len(), 2);
    assert_eq!(run.store().draw_margin_history().len(), 3);

    assert_eq!(run.cumulative_errors(), [0, 0]);
    let curve = run.cumulative_neg_log_prob_of_truth();
    assert_approx_eq!(curve[1].unwrap(), -(0.25f64.ln()));
}

#[test]
fn test_history_growth_for_every_prefix() {
    let games = [
        Game::head_to_head("1", "A", "B", Outcome::FIRST_WINS),
        Game::head_to_head("2", "B", "C", Outcome::Draw),
        Game::head_to_head("3", "C", "D", Outcome::SECOND_WINS),
        Game::head_to_head("4", "A", "D", Outcome::FIRST_WINS),
        Game::head_to_head("5", "A", "C", Outcome::SECOND_WINS),
    ];
    let model = TrueSkill::new();

    for prefix in 0..=games.len() {
        let mut run = RatingRun::new(RunConfig::new());
        run.replay(&model, &games[..prefix]).unwrap();

        let mut participations: FxHashMap<&str, usize> = FxHashMap::default();
        for game in &games[..prefix] {
            for player in game.players() {
                *participations.entry(player).or_default() += 1;
            }
        }

        assert_eq!(run.store().len(), participations.len());
        for (player, count) in participations {
            assert_eq!(run.store().history(player).unwrap().len(), count + 1);
        }
        assert_eq!(run.store().draw_margin_history().len(), prefix + 1);
        assert_eq!(run.predictions().len(), prefix);
    }
}

#[test]
fn test_ratings_are_path_dependent() {
    let a_beats_b = Game::head_to_head("1", "A", "B", Outcome::FIRST_WINS);
    let b_beats_a = Game::head_to_head("2", "B", "A", Outcome::FIRST_WINS);
    let a_beats_b_again = Game::head_to_head("3", "A", "B", Outcome::FIRST_WINS);

    let model = TrueSkill::builder().performance_variance(1.0).build();
    let config = || RunConfig::builder().default_skill_prior(prior()).build();

    let mut forward = RatingRun::new(config());
    forward
        .replay(&model, [&a_beats_b, &b_beats_a, &a_beats_b_again])
        .unwrap();

    let mut permuted = RatingRun::new(config());
    permuted
        .replay(&model, [&a_beats_b, &a_beats_b_again, &b_beats_a])
        .unwrap();

    let forward_a = forward.store().latest("A").unwrap();
    let permuted_a = permuted.store().latest("A").unwrap();
    assert!((forward_a.mean - permuted_a.mean).abs() > 1e-6);

    let forward_b = forward.store().latest("B").unwrap();
    let permuted_b = permuted.store().latest("B").unwrap();
    assert!((forward_b.mean - permuted_b.mean).abs() > 1e-6);
}

#[test]
fn test_prediction_sees_only_earlier_games() {
    let games = [
        Game::head_to_head("1", "A", "B", Outcome::FIRST_WINS),
        Game::head_to_head("2", "A", "B", Outcome::FIRST_WINS),
    ];
    let model = TrueSkill::new();
    let mut run = RatingRun::new(RunConfig::new());
    run.replay(&model, &games).unwrap();

    // Before the first game both players are equal, after it A is favored.
    let first = &run.predictions()[0];
    let second = &run.predictions()[1];
    assert!(second.log_prob_of_truth > first.log_prob_of_truth);

    let priors = Marginals::new(run.store().draw_margin_history()[1])
        .with_skill("A", run.store().history("A").unwrap()[1])
        .with_skill("B", run.store().history("B").unwrap()[1]);
    let expected = model.predict_outcome(&games[1], &priors).unwrap();
    assert_approx_eq!(second.log_prob_of_truth, expected.log_prob_of_truth);
}

#[test]
fn test_derived_views_are_idempotent() {
    let games = [
        Game::head_to_head("1", "A", "B", Outcome::FIRST_WINS),
        Game::head_to_head("2", "C", "B", Outcome::Draw),
    ];
    let mut run = RatingRun::new(RunConfig::new());
    run.replay(&TrueSkill::new(), &games).unwrap();

    assert_eq!(run.leaderboard(), run.leaderboard());
    assert_eq!(
        run.trajectory("B").unwrap().collect::<Vec<_>>(),
        run.trajectory("B").unwrap().collect::<Vec<_>>()
    );
    assert_eq!(run.cumulative_error_rate(), run.cumulative_error_rate());
    assert_eq!(
        run.cumulative_neg_log_prob_of_truth(),
        run.cumulative_neg_log_prob_of_truth()
    );
}

#[test]
fn test_model_failure_reports_game() {
    let model = Scripted {
        posteriors: FxHashMap::default(),
    };
    let mut run = RatingRun::with_priors(RunConfig::new(), &three_players());
    let err = run
        .replay(&model, [Game::head_to_head("42", "A", "B", Outcome::Draw)])
        .unwrap_err();
    match err {
        Error::Model { game_id, .. } => assert_eq!(game_id, GameId::from("42")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(run.games_processed(), 0);
    assert!(run.predictions().is_empty());
    assert_eq!(run.store().history("A").unwrap().len(), 1);
}

#[test]
fn test_unknown_player_queries() {
    let run = RatingRun::new(RunConfig::new());
    assert!(matches!(run.store().latest("nobody"), Err(Error::UnknownPlayer(_))));
    assert!(matches!(run.games_played("nobody"), Err(Error::UnknownPlayer(_))));
    assert!(run.trajectory("nobody").is_err());
    assert!(run.cumulative_errors().is_empty());
    assert!(run.cumulative_neg_log_prob_of_truth().is_empty());
}

#[test]
fn test_draw_by_heavy_underdog_keeps_the_run_going() {
    let priors = Marginals::new(Gaussian::new(5.0, 1.0))
        .with_skill("A", Gaussian::new(0.0, 1.0))
        .with_skill("B", Gaussian::new(300.0, 1.0));
    let games = [
        Game::head_to_head("1", "A", "B", Outcome::Draw),
        Game::head_to_head("2", "B", "A", Outcome::FIRST_WINS),
    ];
    let mut run = RatingRun::with_priors(RunConfig::new(), &priors);
    assert_eq!(run.replay(&TrueSkill::new(), &games).unwrap(), 2);

    assert!(run.store().latest("A").unwrap().mean > 0.0);
    let curve = run.cumulative_neg_log_prob_of_truth();
    assert!(curve.iter().all(|point| point.is_some_and(f64::is_finite)));
}
