use compensated_summation::KahanBabuskaNeumaier;
use log::warn;

use crate::{DrawPolicy, Prediction, RatingRun};

/// Running count of incorrect predictions: index `i` counts the errors among
/// predictions `0..=i`.
pub fn cumulative_errors(predictions: &[Prediction], draw_policy: DrawPolicy) -> Vec<u64> {
    predictions
        .iter()
        .scan(0, |errors, prediction| {
            if !prediction.is_correct(draw_policy) {
                *errors += 1;
            }
            Some(*errors)
        })
        .collect()
}

/// Fraction of incorrect predictions among predictions `0..=i`.
pub fn cumulative_error_rate(predictions: &[Prediction], draw_policy: DrawPolicy) -> Vec<f64> {
    cumulative_errors(predictions, draw_policy)
        .into_iter()
        .enumerate()
        .map(|(i, errors)| errors as f64 / (i + 1) as f64)
        .collect()
}

/// Running average of `-log_prob_of_truth`. Once the average is no longer
/// finite it is `None` for that index and every later one.
pub fn cumulative_neg_log_prob_of_truth(predictions: &[Prediction]) -> Vec<Option<f64>> {
    let mut total = KahanBabuskaNeumaier::<f64>::new();
    let mut degenerate = false;
    let mut result = Vec::with_capacity(predictions.len());
    for (i, prediction) in predictions.iter().enumerate() {
        if !degenerate {
            total += -prediction.log_prob_of_truth;
            let avg = total.total() / (i + 1) as f64;
            if avg.is_finite() {
                result.push(Some(avg));
                continue;
            }
            warn!(
                "average negative log probability of truth degenerates at game {} (index {})",
                prediction.game_id, i
            );
            degenerate = true;
        }
        result.push(None);
    }
    result
}

impl RatingRun {
    pub fn cumulative_errors(&self) -> Vec<u64> {
        cumulative_errors(self.predictions(), self.config().draw_policy())
    }

    pub fn cumulative_error_rate(&self) -> Vec<f64> {
        cumulative_error_rate(self.predictions(), self.config().draw_policy())
    }

    pub fn cumulative_neg_log_prob_of_truth(&self) -> Vec<Option<f64>> {
        cumulative_neg_log_prob_of_truth(self.predictions())
    }
}
