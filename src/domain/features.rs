//! Ordered feature vectors and schema alignment.
//!
//! The model scores a positional vector; a column-order mismatch silently
//! corrupts the prediction instead of raising an error. Alignment against
//! the model's declared schema is therefore done by name, here, before any
//! scoring call.

use serde::{Deserialize, Serialize};

use super::observation::{ClinicalObservation, FEATURE_NAMES};

/// An ordered sequence of named feature values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a vector from parallel name/value sequences.
    ///
    /// # Errors
    /// Returns an error message if the lengths differ.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Result<Self, String> {
        if names.len() != values.len() {
            return Err(format!(
                "Feature name/value length mismatch: {} names, {} values",
                names.len(),
                values.len()
            ));
        }
        Ok(Self { names, values })
    }

    /// Encode an observation in canonical training order.
    #[must_use]
    pub fn from_observation(observation: &ClinicalObservation) -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|n| (*n).to_string()).collect(),
            values: observation.feature_values().to_vec(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Look up a value by feature name.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Return a copy whose columns follow `order` exactly.
    ///
    /// Idempotent: aligning an already-aligned vector returns an equal
    /// vector. Every name in `order` must exist here and vice versa;
    /// anything else is a schema mismatch, never a guess.
    ///
    /// # Errors
    /// Returns an error message naming the first missing or extra column.
    pub fn aligned_to(&self, order: &[String]) -> Result<Self, String> {
        if order.len() != self.names.len() {
            return Err(format!(
                "Schema mismatch: model expects {} features, observation has {}",
                order.len(),
                self.names.len()
            ));
        }

        let mut values = Vec::with_capacity(order.len());
        for name in order {
            match self.value_of(name) {
                Some(v) => values.push(v),
                None => return Err(format!("Schema mismatch: unknown feature '{name}'")),
            }
        }

        Ok(Self {
            names: order.to_vec(),
            values,
        })
    }

    /// Return a copy with `value` substituted at position `index`.
    ///
    /// Used by the explanation generator to probe the model one feature at
    /// a time.
    #[must_use]
    pub fn with_value_at(&self, index: usize, value: f64) -> Self {
        let mut out = self.clone();
        if index < out.values.len() {
            out.values[index] = value;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::FluidOverload;

    fn sample_observation() -> ClinicalObservation {
        ClinicalObservation {
            creatinine: 2.0,
            delta_creatinine_24h: 0.0,
            potassium: 4.5,
            bicarbonate: 24.0,
            bun: 40.0,
            ph: 7.4,
            urine_output_24h: 1500.0,
            fluid_overload: FluidOverload::Mild,
            encephalopathy: true,
        }
    }

    #[test]
    fn test_alignment_reorders_by_name() {
        let vector = FeatureVector::from_observation(&sample_observation());

        let mut reversed: Vec<String> = vector.names().to_vec();
        reversed.reverse();

        let aligned = vector.aligned_to(&reversed).expect("should align");
        assert_eq!(aligned.names(), &reversed[..]);
        assert!((aligned.values()[0] - 1500.0).abs() < f64::EPSILON); // urine_output_24h first
        assert!((aligned.values()[8] - 2.0).abs() < f64::EPSILON); // creatinine last
    }

    #[test]
    fn test_alignment_is_idempotent() {
        let vector = FeatureVector::from_observation(&sample_observation());
        let order: Vec<String> = vector.names().to_vec();

        let once = vector.aligned_to(&order).expect("should align");
        let twice = once.aligned_to(&order).expect("should align");

        assert_eq!(once, vector);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_alignment_rejects_unknown_feature() {
        let vector = FeatureVector::from_observation(&sample_observation());
        let mut order: Vec<String> = vector.names().to_vec();
        order[3] = "hemoglobin".to_string();

        let err = vector.aligned_to(&order).expect_err("must fail");
        assert!(err.contains("hemoglobin"));
    }

    #[test]
    fn test_alignment_rejects_width_mismatch() {
        let vector = FeatureVector::from_observation(&sample_observation());
        let order: Vec<String> = vector.names()[..5].to_vec();
        assert!(vector.aligned_to(&order).is_err());
    }

    #[test]
    fn test_value_substitution() {
        let vector = FeatureVector::from_observation(&sample_observation());
        let probed = vector.with_value_at(0, 9.9);
        assert!((probed.values()[0] - 9.9).abs() < f64::EPSILON);
        assert!((vector.values()[0] - 2.0).abs() < f64::EPSILON);
    }
}
