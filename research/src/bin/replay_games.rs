use std::{error::Error as StdError, fs::File, io, io::Write};

use clap::Parser as _;
use env_logger::Env;
use log::info;
use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, SeedableRng as _};
use rayon::prelude::*;
use skill_replay::{
    DrawPolicy, Error, Game, Gaussian, Limit, RatingRun, RunConfig, Selector, TrueSkill,
};
use skill_replay_research::record::RawGame;
use uuid::Uuid;

struct Experiment {
    model: TrueSkill,
    draw_margin: f64,
    run: RatingRun,
}

impl Experiment {
    fn sort_key(&self) -> impl Ord {
        OrderedFloat(-self.avg_neg_log_prob_of_truth().unwrap_or(f64::INFINITY))
    }

    fn batch_games(&mut self, games: &[Game]) -> Result<(), Error> {
        self.run.replay(&self.model, games)?;
        Ok(())
    }

    fn error_rate(&self) -> Option<f64> {
        self.run.cumulative_error_rate().last().copied()
    }

    fn avg_neg_log_prob_of_truth(&self) -> Option<f64> {
        self.run
            .cumulative_neg_log_prob_of_truth()
            .last()
            .copied()
            .flatten()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_owned(), |value| value.to_string())
}

fn write_report<W: Write>(
    mut writer: W,
    experiments: &[Experiment],
    opt: &Opt,
) -> io::Result<()> {
    writeln!(
        writer,
        "performance_variance,dynamics_variance,draw_margin,error_rate,avg_neg_log_prob_of_truth"
    )?;

    for experiment in experiments {
        writeln!(
            writer,
            "{},{},{},{},{}",
            experiment.model.performance_variance(),
            experiment.model.dynamics_variance(),
            experiment.draw_margin,
            fmt_opt(experiment.error_rate()),
            fmt_opt(experiment.avg_neg_log_prob_of_truth()),
        )?;
    }

    writeln!(writer, "# ---")?;

    let Some(best) = experiments.last() else {
        return Ok(());
    };
    let run = &best.run;

    for (rank, (player, conservative)) in run.leaderboard().into_iter().take(opt.top).enumerate() {
        if let Ok(belief) = run.store().latest(player) {
            writeln!(
                writer,
                "# #{} {}: {:.1} (mean: {:.1}, sd: {:.1}, games: {})",
                rank + 1,
                player,
                conservative,
                belief.mean,
                belief.std_dev(),
                run.games_played(player).unwrap_or_default()
            )?;
        }
    }
    writeln!(writer, "# ---")?;

    let mut rng = StdRng::seed_from_u64(opt.seed);
    for player in run.top_n(Selector::Random(&mut rng), Limit::Count(opt.trajectories)) {
        if let Ok(trajectory) = run.trajectory(player) {
            let points: Vec<_> = trajectory
                .map(|point| format!("{:.1}±{:.1}", point.mean, point.std_dev))
                .collect();
            writeln!(writer, "# Trajectory of {}: {}", player, points.join(" "))?;
        }
    }
    writeln!(writer, "# ---")?;
    writeln!(
        writer,
        "# Veterans: {}",
        run.top_n(Selector::VETERANS, Limit::Unbounded).len()
    )?;
    writeln!(writer, "# Skill average: {}", fmt_opt(run.skill_average()))?;
    writeln!(writer, "# Distinct players: {}", run.store().len())?;
    writeln!(writer, "# Processed games: {}", run.games_processed())?;
    writeln!(writer, "# ---")?;

    Ok(())
}

#[derive(clap::Parser)]
struct Opt {
    #[clap(long, value_delimiter = ',', num_args = 1.., default_value = "400")]
    performance_variance: Vec<f64>,
    #[clap(long, value_delimiter = ',', num_args = 1.., default_value = "0")]
    dynamics_variance: Vec<f64>,
    #[clap(long, value_delimiter = ',', num_args = 1.., default_value = "5")]
    draw_margin: Vec<f64>,
    #[clap(long, default_value = "120")]
    prior_mean: f64,
    #[clap(long, default_value = "1600")]
    prior_variance: f64,
    /// Count predictions involving draws as correct.
    #[clap(long)]
    ignore_draws: bool,
    #[clap(long, default_value = "20")]
    top: usize,
    #[clap(long, default_value = "5")]
    trajectories: usize,
    /// Seed for picking the players whose trajectories are reported.
    #[clap(long, default_value = "0")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let opt = Opt::parse();

    let process_uuid = Uuid::now_v7();

    let mut experiments = Vec::new();

    for &performance_variance in &opt.performance_variance {
        for &dynamics_variance in &opt.dynamics_variance {
            for &draw_margin in &opt.draw_margin {
                experiments.push(Experiment {
                    model: TrueSkill::builder()
                        .name(format!(
                            "TrueSkill(beta²={performance_variance}, tau²={dynamics_variance})"
                        ))
                        .performance_variance(performance_variance)
                        .dynamics_variance(dynamics_variance)
                        .build(),
                    draw_margin,
                    run: RatingRun::new(
                        RunConfig::builder()
                            .default_skill_prior(Gaussian::new(opt.prior_mean, opt.prior_variance))
                            .initial_draw_margin(Gaussian::new(draw_margin, 1.0))
                            .draw_policy(if opt.ignore_draws {
                                DrawPolicy::Ignore
                            } else {
                                DrawPolicy::Strict
                            })
                            .build(),
                    ),
                });
            }
        }
    }

    println!("# Parallel experiments: {}", experiments.len());
    println!("# ---");

    let mut reader = csv::Reader::from_reader(io::stdin().lock());

    let mut batch = Vec::new();
    let mut total_games: u64 = 0;

    for record in reader.deserialize() {
        let record: RawGame = record?;
        if let Some(game) = record.into_game() {
            batch.push(game);
        }

        if batch.len() >= 100_000 {
            experiments
                .par_iter_mut()
                .try_for_each(|experiment| experiment.batch_games(&batch))?;
            total_games += batch.len() as u64;
            batch.clear();
            info!("processed {} games", total_games);
        }
    }

    experiments
        .par_iter_mut()
        .try_for_each(|experiment| experiment.batch_games(&batch))?;
    total_games += batch.len() as u64;
    info!("processed {} games", total_games);

    experiments.sort_by_key(Experiment::sort_key);

    write_report(
        File::create(format!("report-{}.csv", process_uuid))?,
        &experiments,
        &opt,
    )?;
    write_report(io::stdout(), &experiments, &opt)?;

    Ok(())
}
