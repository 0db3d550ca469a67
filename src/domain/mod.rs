//! Domain layer: Core business types and logic.
//!
//! Pure types with no external collaborators: observations, feature
//! vectors, risk tiers, attributions, and case log rows.

mod assessment;
mod case_log;
mod explanation;
mod features;
mod observation;

pub use assessment::{RiskAssessment, RiskTier, HIGH_THRESHOLD, MODERATE_THRESHOLD};
pub use case_log::{CaseLogRecord, TIMESTAMP_FORMAT};
pub use explanation::{Explanation, FeatureContribution};
pub use features::FeatureVector;
pub use observation::{ClinicalObservation, FluidOverload, FEATURE_NAMES};
