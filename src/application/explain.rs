//! Explanation generator: per-feature attribution for one prediction.
//!
//! Model-agnostic sequential substitution: starting from the model's
//! expected (baseline) vector, each feature is replaced by its observed
//! value in turn and the probability delta is recorded. The deltas
//! telescope, so baseline + sum(contributions) reconstructs the
//! full-vector score exactly.
//!
//! Works against the `RiskModel` port alone; it needs n + 1 scoring
//! calls and no access to model internals.

use crate::domain::{Explanation, FeatureContribution, FeatureVector};
use crate::ports::{ModelError, RiskModel};

/// Errors that can occur while generating an explanation.
///
/// None of these abort the main prediction flow; callers degrade to a
/// warning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExplainError {
    #[error("Model does not expose expected feature values")]
    BaselineUnavailable,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Attribute a prediction over `vector` to its individual features.
///
/// `vector` must already be aligned to the model's schema (the same
/// vector that was scored).
///
/// # Errors
/// Returns `ExplainError::BaselineUnavailable` if the model declares no
/// expected features, or a `ModelError` if any scoring call fails.
pub fn explain<M>(model: &M, vector: &FeatureVector) -> Result<Explanation, ExplainError>
where
    M: RiskModel + ?Sized,
{
    let expected = model
        .expected_features()
        .ok_or(ExplainError::BaselineUnavailable)?;

    if expected.len() != vector.len() {
        return Err(ExplainError::Model(ModelError::SchemaMismatch(format!(
            "Expected-feature length {} does not match vector length {}",
            expected.len(),
            vector.len()
        ))));
    }

    let mut current = FeatureVector::new(vector.names().to_vec(), expected.to_vec())
        .map_err(|e| ExplainError::Model(ModelError::SchemaMismatch(e)))?;

    let baseline = model.score(&current)?;

    let mut contributions = Vec::with_capacity(vector.len());
    let mut previous = baseline;

    for (i, name) in vector.names().iter().enumerate() {
        let observed = vector.values()[i];
        current = current.with_value_at(i, observed);

        let probability = model.score(&current)?;
        contributions.push(FeatureContribution {
            name: name.clone(),
            value: observed,
            contribution: probability - previous,
        });
        previous = probability;
    }

    Ok(Explanation {
        baseline,
        contributions,
    })
}
