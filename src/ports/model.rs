//! Risk Model port: Trait for the externally-trained classifier.
//!
//! The model is a black box: the application never inspects its internals
//! beyond the optional schema metadata declared here.

use crate::domain::FeatureVector;

/// Errors that can occur when loading or scoring a model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Scoring failed: {0}")]
    Scoring(String),
}

/// Trait for scoring a single observation.
///
/// Implementations are loaded once per process and never mutated after
/// load, so a shared reference is safe to score from concurrently.
pub trait RiskModel: Send + Sync {
    /// Score a feature vector, returning a probability in [0, 1].
    ///
    /// The vector's column order must match the model's training order;
    /// callers align via [`feature_order`](Self::feature_order) first.
    ///
    /// # Errors
    /// Returns `ModelError::SchemaMismatch` if the vector does not match
    /// the model's schema, `ModelError::Scoring` if evaluation fails.
    fn score(&self, vector: &FeatureVector) -> Result<f64, ModelError>;

    /// The feature order the model was trained with, if it declares one.
    ///
    /// `None` means the caller must fall back to a fixed order and accept
    /// the mismatch risk.
    fn feature_order(&self) -> Option<&[String]> {
        None
    }

    /// Per-feature expected (training mean) values, if the model declares
    /// them. Used as the baseline vector for attributions.
    fn expected_features(&self) -> Option<&[f64]> {
        None
    }
}
