//! Model store adapter: JSON-exported calibrated logistic model.
//!
//! The training pipeline exports the fitted standardizer and logistic
//! coefficients as a single JSON artifact. Loading happens once at
//! startup; the handle is immutable afterwards.
//!
//! Failure to load is not fatal to the process: the caller surfaces a
//! "model unavailable" state and disables prediction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::FeatureVector;
use crate::ports::{ModelError, RiskModel};

/// Maximum number of features supported (dialysis-initiation model = 9).
/// Used for input validation and sanity checks.
const MAX_FEATURES: usize = 9;

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub feature_names: Vec<String>,
    pub scaler_mean: Vec<f64>,
    pub scaler_std: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Risk model backed by an exported logistic artifact.
#[derive(Debug)]
pub struct LogisticModel {
    model: ExportedModel,
}

impl LogisticModel {
    /// Load the artifact from a file or a directory of candidates.
    ///
    /// A directory is searched for `nephro_model.json`, then `model.json`.
    ///
    /// # Errors
    /// Returns `ModelError::Unavailable` if no artifact is found or
    /// readable, `ModelError::InvalidArtifact` if it fails sanity checks.
    pub fn load(model_path: &Path) -> Result<Self, ModelError> {
        let candidates: Vec<std::path::PathBuf> = if model_path.is_file() {
            vec![model_path.to_path_buf()]
        } else {
            vec![
                model_path.join("nephro_model.json"),
                model_path.join("model.json"),
            ]
        };

        let artifact_path = candidates.into_iter().find(|p| p.exists()).ok_or_else(|| {
            ModelError::Unavailable(format!(
                "No model JSON found in {model_path:?} (expected nephro_model.json or model.json)"
            ))
        })?;

        let content = fs::read_to_string(&artifact_path)
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;
        let model: ExportedModel = serde_json::from_str(&content)
            .map_err(|e| ModelError::InvalidArtifact(e.to_string()))?;

        let n = model.feature_names.len();
        if n == 0 || n > MAX_FEATURES {
            return Err(ModelError::InvalidArtifact(format!(
                "Invalid feature count in model: got {n}, max {MAX_FEATURES}"
            )));
        }
        if model.coefficients.len() != n
            || model.scaler_mean.len() != n
            || model.scaler_std.len() != n
        {
            return Err(ModelError::InvalidArtifact(
                "Model parameter lengths do not match feature_names length".into(),
            ));
        }
        if model.scaler_std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ModelError::InvalidArtifact(
                "Scaler std values must be finite and > 0".into(),
            ));
        }
        if !model.intercept.is_finite()
            || model.coefficients.iter().any(|c| !c.is_finite())
            || model.scaler_mean.iter().any(|m| !m.is_finite())
        {
            return Err(ModelError::InvalidArtifact(
                "Model parameters must be finite".into(),
            ));
        }

        tracing::info!(
            "Loaded model from {:?} (n_features={})",
            artifact_path,
            n
        );

        Ok(Self { model })
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

impl RiskModel for LogisticModel {
    fn score(&self, vector: &FeatureVector) -> Result<f64, ModelError> {
        // Strict by-name check: a positional slip here would silently
        // mis-score, so names and order must both match the artifact.
        if vector.names() != self.model.feature_names.as_slice() {
            return Err(ModelError::SchemaMismatch(format!(
                "Vector columns {:?} do not match model schema {:?}",
                vector.names(),
                self.model.feature_names
            )));
        }

        let mut logit = self.model.intercept;
        for (i, &x) in vector.values().iter().enumerate() {
            let normalized = (x - self.model.scaler_mean[i]) / self.model.scaler_std[i];
            logit += self.model.coefficients[i] * normalized;
        }

        let probability = Self::sigmoid(logit);
        if !probability.is_finite() {
            return Err(ModelError::Scoring(
                "Model produced a non-finite probability".into(),
            ));
        }

        Ok(probability)
    }

    fn feature_order(&self) -> Option<&[String]> {
        Some(&self.model.feature_names)
    }

    fn expected_features(&self) -> Option<&[f64]> {
        Some(&self.model.scaler_mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_artifact(path: &Path, intercept: f64) {
        let model = ExportedModel {
            feature_names: vec!["a".into(), "b".into()],
            scaler_mean: vec![0.0, 0.0],
            scaler_std: vec![1.0, 1.0],
            coefficients: vec![1.0, -1.0],
            intercept,
        };
        let json = serde_json::to_string(&model).expect("serialize model");
        fs::write(path, json).expect("write model");
    }

    fn vector(names: &[&str], values: &[f64]) -> FeatureVector {
        FeatureVector::new(
            names.iter().map(|n| (*n).to_string()).collect(),
            values.to_vec(),
        )
        .expect("well-formed vector")
    }

    #[test]
    fn test_load_prefers_nephro_model_json() {
        let temp = tempdir().expect("tempdir");
        write_artifact(&temp.path().join("nephro_model.json"), 1.0);
        write_artifact(&temp.path().join("model.json"), 2.0);

        let model = LogisticModel::load(temp.path()).expect("should load");
        assert!((model.model.intercept - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_artifact() {
        let temp = tempdir().expect("tempdir");
        let err = LogisticModel::load(temp.path()).expect_err("must fail");
        assert!(matches!(err, ModelError::Unavailable(_)));
    }

    #[test]
    fn test_load_rejects_length_mismatch() {
        let temp = tempdir().expect("tempdir");
        let broken = serde_json::json!({
            "feature_names": ["a", "b"],
            "scaler_mean": [0.0],
            "scaler_std": [1.0, 1.0],
            "coefficients": [1.0, -1.0],
            "intercept": 0.0,
        });
        fs::write(temp.path().join("model.json"), broken.to_string()).expect("write");

        let err = LogisticModel::load(temp.path()).expect_err("must fail");
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
    }

    #[test]
    fn test_score_known_value() {
        let temp = tempdir().expect("tempdir");
        write_artifact(&temp.path().join("model.json"), 0.0);
        let model = LogisticModel::load(temp.path()).expect("should load");

        // logit = 1.0*x0 - 1.0*x1 = 0 at the baseline, sigmoid(0) = 0.5
        let p = model
            .score(&vector(&["a", "b"], &[0.0, 0.0]))
            .expect("should score");
        assert!((p - 0.5).abs() < 1e-12);

        // logit = 2.0 - 0.0
        let p = model
            .score(&vector(&["a", "b"], &[2.0, 0.0]))
            .expect("should score");
        assert!((p - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_score_rejects_misordered_columns() {
        let temp = tempdir().expect("tempdir");
        write_artifact(&temp.path().join("model.json"), 0.0);
        let model = LogisticModel::load(temp.path()).expect("should load");

        let err = model
            .score(&vector(&["b", "a"], &[0.0, 0.0]))
            .expect_err("must fail");
        assert!(matches!(err, ModelError::SchemaMismatch(_)));
    }

    #[test]
    fn test_metadata_exposed() {
        let temp = tempdir().expect("tempdir");
        write_artifact(&temp.path().join("model.json"), 0.0);
        let model = LogisticModel::load(temp.path()).expect("should load");

        assert_eq!(
            model.feature_order().expect("order"),
            &["a".to_string(), "b".to_string()]
        );
        assert_eq!(model.expected_features().expect("means"), &[0.0, 0.0]);
    }
}
