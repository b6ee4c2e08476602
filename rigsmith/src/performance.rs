use crate::{
    config::{default_performance_weights, WeightTable},
    selection::SelectionResult,
};

/// Weighted average of per-component performance scores.
#[derive(Clone, Debug)]
pub struct PerformanceEstimator {
    weights: WeightTable,
    default_score: f64,
}

impl Default for PerformanceEstimator {
    fn default() -> Self {
        Self::new(default_performance_weights(), Self::DEFAULT_SCORE)
    }
}

impl PerformanceEstimator {
    /// Stand-in for components that have no score.
    pub const DEFAULT_SCORE: f64 = 50.0;

    pub fn new(weights: WeightTable, default_score: f64) -> Self {
        Self {
            weights,
            default_score,
        }
    }

    /// Averages over the weighted categories actually present, so a missing GPU does
    /// not count as a zero. Categories without a weight are ignored.
    pub fn estimate(&self, selection: &SelectionResult) -> f64 {
        let (sum, total) = selection
            .iter()
            .filter_map(|(category, component)| {
                let weight = *self.weights.get(&category)?;
                let score = component.performance_score.unwrap_or(self.default_score);
                Some((score * weight, weight))
            })
            .fold((0.0, 0.0), |(sum, total), (s, w)| (sum + s, total + w));

        if total > 0.0 {
            sum / total
        } else {
            0.0
        }
    }
}
