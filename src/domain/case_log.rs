//! Case log records for the research database.
//!
//! A record is created only when the user opts in to contributing the case,
//! and is flattened into one positional row of primitive cells: the remote
//! table accepts exactly that shape, no nested structures.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::observation::ClinicalObservation;

/// Timestamp format used in the first cell of every row.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One appended training case: the observation, when it was entered, and
/// what the model predicted. Write-once; there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseLogRecord {
    /// Local wall-clock time of the submission
    pub recorded_at: NaiveDateTime,

    /// The observation as entered
    pub observation: ClinicalObservation,

    /// Raw predicted probability
    pub probability: f64,
}

impl CaseLogRecord {
    /// Create a record stamped with the current local time.
    #[must_use]
    pub fn new(observation: ClinicalObservation, probability: f64) -> Self {
        Self {
            recorded_at: chrono::Local::now().naive_local(),
            observation,
            probability,
        }
    }

    /// Create a record with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(
        observation: ClinicalObservation,
        probability: f64,
        recorded_at: NaiveDateTime,
    ) -> Self {
        Self {
            recorded_at,
            observation,
            probability,
        }
    }

    /// Probability rounded to three decimals, as stored in the log.
    #[must_use]
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 1000.0).round() / 1000.0
    }

    /// Flatten into the positional row the remote table expects:
    /// timestamp, six lab values, fluid grade and encephalopathy as
    /// integers, urine output, rounded probability.
    #[must_use]
    pub fn to_row(&self) -> Vec<Value> {
        let obs = &self.observation;
        vec![
            Value::from(self.recorded_at.format(TIMESTAMP_FORMAT).to_string()),
            Value::from(obs.creatinine),
            Value::from(obs.delta_creatinine_24h),
            Value::from(obs.potassium),
            Value::from(obs.bicarbonate),
            Value::from(obs.bun),
            Value::from(obs.ph),
            Value::from(i64::from(obs.fluid_overload.grade())),
            Value::from(i64::from(u8::from(obs.encephalopathy))),
            Value::from(obs.urine_output_24h),
            Value::from(self.rounded_probability()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::FluidOverload;
    use chrono::NaiveDate;

    fn sample_observation() -> ClinicalObservation {
        ClinicalObservation {
            creatinine: 2.0,
            delta_creatinine_24h: 0.0,
            potassium: 4.5,
            bicarbonate: 24.0,
            bun: 40.0,
            ph: 7.4,
            urine_output_24h: 1500.0,
            fluid_overload: FluidOverload::Moderate,
            encephalopathy: true,
        }
    }

    fn sample_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_row_shape_and_order() {
        let record =
            CaseLogRecord::with_timestamp(sample_observation(), 0.8275, sample_timestamp());
        let row = record.to_row();

        assert_eq!(row.len(), 11);
        assert_eq!(row[0], Value::from("2024-03-15 14:30:05"));
        assert_eq!(row[1], Value::from(2.0)); // creatinine
        assert_eq!(row[6], Value::from(7.4)); // ph
        assert_eq!(row[7], Value::from(2)); // fluid grade as integer
        assert_eq!(row[8], Value::from(1)); // encephalopathy as 0/1
        assert_eq!(row[9], Value::from(1500.0)); // urine output
        assert_eq!(row[10], Value::from(0.828)); // rounded to 3 decimals
    }

    #[test]
    fn test_row_is_flat_primitives() {
        let record = CaseLogRecord::with_timestamp(sample_observation(), 0.5, sample_timestamp());
        for cell in record.to_row() {
            assert!(cell.is_string() || cell.is_number());
        }
    }

    #[test]
    fn test_probability_rounding() {
        let record =
            CaseLogRecord::with_timestamp(sample_observation(), 0.123_456, sample_timestamp());
        assert!((record.rounded_probability() - 0.123).abs() < 1e-12);
    }
}
