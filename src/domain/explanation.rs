//! Per-feature attribution for a single prediction.

use serde::{Deserialize, Serialize};

/// Signed contribution of one feature to the predicted probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Feature name (model schema)
    pub name: String,

    /// The observed value for this feature
    pub value: f64,

    /// Probability shift attributed to this feature
    pub contribution: f64,
}

/// Additive attribution of a prediction: the baseline expectation plus one
/// signed contribution per feature reconstructs the predicted probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Probability of the baseline (expected) feature vector
    pub baseline: f64,

    /// Per-feature contributions, in model schema order
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    /// Reconstruct the predicted probability from baseline + contributions.
    #[must_use]
    pub fn predicted(&self) -> f64 {
        self.baseline
            + self
                .contributions
                .iter()
                .map(|c| c.contribution)
                .sum::<f64>()
    }

    /// Contributions sorted by decreasing absolute magnitude, for display.
    #[must_use]
    pub fn ranked(&self) -> Vec<&FeatureContribution> {
        let mut ranked: Vec<&FeatureContribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// Largest absolute contribution, used to scale display bars.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.contributions
            .iter()
            .map(|c| c.contribution.abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(name: &str, contribution: f64) -> FeatureContribution {
        FeatureContribution {
            name: name.to_string(),
            value: 0.0,
            contribution,
        }
    }

    #[test]
    fn test_predicted_is_additive() {
        let explanation = Explanation {
            baseline: 0.30,
            contributions: vec![
                contribution("creatinine", 0.25),
                contribution("potassium", -0.05),
                contribution("bun", 0.10),
            ],
        };
        assert!((explanation.predicted() - 0.60).abs() < 1e-12);
    }

    #[test]
    fn test_ranked_orders_by_magnitude() {
        let explanation = Explanation {
            baseline: 0.5,
            contributions: vec![
                contribution("a", 0.02),
                contribution("b", -0.2),
                contribution("c", 0.1),
            ],
        };
        let ranked = explanation.ranked();
        assert_eq!(ranked[0].name, "b");
        assert_eq!(ranked[1].name, "c");
        assert_eq!(ranked[2].name, "a");
        assert!((explanation.max_magnitude() - 0.2).abs() < 1e-12);
    }
}
