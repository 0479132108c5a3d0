use crate::engine::weight::{WeightConfig, WeightModel};
use crate::{Candidate, DrawError};

/// Scales `weights` so they sum to one, keeping length and order.
pub fn normalize(weights: &[f64]) -> Result<Vec<f64>, DrawError> {
    if weights.is_empty() {
        return Ok(Vec::new());
    }

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(DrawError::DegenerateDistribution { total });
    }

    Ok(weights.iter().map(|weight| weight / total).collect())
}

pub fn probabilities(candidates: &[Candidate], config: &WeightConfig) -> Result<Vec<f64>, DrawError> {
    let model = WeightModel::new(config);
    normalize(&model.weights(candidates))
}
