//! Clinical observation types for dialysis-initiation risk prediction.
//!
//! One observation per form submission: seven lab values plus two
//! clinical signs, matching the columns the model was trained on.

use serde::{Deserialize, Serialize};

/// Fluid overload grade on clinical examination (0 = none, 3 = anasarca).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FluidOverload {
    #[default]
    None,
    Mild,
    Moderate,
    Anasarca,
}

impl FluidOverload {
    /// Numeric grade as used in the training data (0-3).
    #[must_use]
    pub fn grade(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Anasarca => 3,
        }
    }

    /// Parse a numeric grade.
    ///
    /// # Errors
    /// Returns an error message if the grade is not in 0-3.
    pub fn from_grade(grade: u8) -> Result<Self, String> {
        match grade {
            0 => Ok(Self::None),
            1 => Ok(Self::Mild),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Anasarca),
            other => Err(format!("Fluid overload grade {other} out of range [0, 3]")),
        }
    }
}

impl std::fmt::Display for FluidOverload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Mild => write!(f, "mild"),
            Self::Moderate => write!(f, "moderate"),
            Self::Anasarca => write!(f, "anasarca"),
        }
    }
}

/// A single patient observation entered through the form.
///
/// Field order here is documentation only; scoring order is governed by
/// [`FEATURE_NAMES`] and the model's declared schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalObservation {
    /// Serum creatinine in mg/dL
    pub creatinine: f64,

    /// Creatinine change over the last 24h in mg/dL (may be negative)
    pub delta_creatinine_24h: f64,

    /// Serum potassium in mEq/L
    pub potassium: f64,

    /// Serum bicarbonate in mEq/L
    pub bicarbonate: f64,

    /// Blood urea nitrogen in mg/dL
    pub bun: f64,

    /// Arterial pH
    pub ph: f64,

    /// Urine output over the last 24h in mL
    pub urine_output_24h: f64,

    /// Fluid overload grade on examination
    pub fluid_overload: FluidOverload,

    /// Uremic encephalopathy present
    pub encephalopathy: bool,
}

/// Feature names in the order the model was trained with.
///
/// These are the training-set column names; they must match the artifact's
/// `feature_names` exactly for alignment to succeed.
pub const FEATURE_NAMES: [&str; 9] = [
    "creatinine",
    "delta_Cr_24h",
    "potassium",
    "bicarbonate",
    "bun",
    "ph_level",
    "fluid_overload_grade",
    "uremic_encephalopathy",
    "urine_output_24h",
];

impl ClinicalObservation {
    /// Numeric encoding of the observation in canonical training order.
    #[must_use]
    pub fn feature_values(&self) -> [f64; 9] {
        [
            self.creatinine,
            self.delta_creatinine_24h,
            self.potassium,
            self.bicarbonate,
            self.bun,
            self.ph,
            f64::from(self.fluid_overload.grade()),
            if self.encephalopathy { 1.0 } else { 0.0 },
            self.urine_output_24h,
        ]
    }

    /// Validate that all fields are within clinically plausible ranges.
    ///
    /// # Errors
    /// Returns every violation as a vector of messages.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(0.0..=40.0).contains(&self.creatinine) {
            errors.push(format!(
                "Creatinine {} out of range [0, 40]",
                self.creatinine
            ));
        }
        if !(-10.0..=10.0).contains(&self.delta_creatinine_24h) {
            errors.push(format!(
                "Delta Cr 24h {} out of range [-10, 10]",
                self.delta_creatinine_24h
            ));
        }
        if !(0.0..=12.0).contains(&self.potassium) {
            errors.push(format!("Potassium {} out of range [0, 12]", self.potassium));
        }
        if !(0.0..=45.0).contains(&self.bicarbonate) {
            errors.push(format!(
                "Bicarbonate {} out of range [0, 45]",
                self.bicarbonate
            ));
        }
        if !(0.0..=300.0).contains(&self.bun) {
            errors.push(format!("BUN {} out of range [0, 300]", self.bun));
        }
        if !(6.8..=7.6).contains(&self.ph) {
            errors.push(format!("pH {} out of range [6.8, 7.6]", self.ph));
        }
        if !(0.0..=10_000.0).contains(&self.urine_output_24h) {
            errors.push(format!(
                "Urine output 24h {} out of range [0, 10000]",
                self.urine_output_24h
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClinicalObservation {
        ClinicalObservation {
            creatinine: 2.0,
            delta_creatinine_24h: 0.0,
            potassium: 4.5,
            bicarbonate: 24.0,
            bun: 40.0,
            ph: 7.4,
            urine_output_24h: 1500.0,
            fluid_overload: FluidOverload::None,
            encephalopathy: false,
        }
    }

    #[test]
    fn test_feature_values_order() {
        let values = sample().feature_values();
        assert_eq!(values.len(), FEATURE_NAMES.len());
        assert!((values[0] - 2.0).abs() < f64::EPSILON); // creatinine
        assert!((values[5] - 7.4).abs() < f64::EPSILON); // ph_level
        assert!((values[6]).abs() < f64::EPSILON); // fluid grade
        assert!((values[8] - 1500.0).abs() < f64::EPSILON); // urine output last
    }

    #[test]
    fn test_encephalopathy_encodes_as_binary() {
        let mut obs = sample();
        obs.encephalopathy = true;
        assert!((obs.feature_values()[7] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fluid_overload_grades() {
        assert_eq!(FluidOverload::from_grade(3).unwrap(), FluidOverload::Anasarca);
        assert_eq!(FluidOverload::Anasarca.grade(), 3);
        assert!(FluidOverload::from_grade(4).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());

        let mut invalid = sample();
        invalid.ph = 8.0;
        invalid.potassium = -1.0;
        let errors = invalid.validate().expect_err("should fail");
        assert_eq!(errors.len(), 2);
    }
}
