//! Assessment service: Orchestrates the prediction pipeline.
//!
//! One submission runs: build feature vector -> score -> tier ->
//! optional explanation -> optional case log append. The optional stages
//! have their own error boundaries; nothing they do can stop the primary
//! risk result from being returned.

use std::sync::Arc;

use crate::application::explain::explain;
use crate::domain::{CaseLogRecord, ClinicalObservation, Explanation, FeatureVector, RiskAssessment};
use crate::ports::{CaseLog, ModelError, RiskModel};
use crate::RenalertError;

/// Per-submission options from the form toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessOptions {
    /// Generate a per-feature attribution alongside the prediction
    pub explain: bool,

    /// Contribute this case to the research log
    pub save: bool,
}

/// Outcome of the opt-in save stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Row appended to the remote log
    Saved,
    /// Append failed; the assessment itself is unaffected
    Failed(String),
}

/// Everything one submission produced.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    /// The primary result; always present when the pipeline succeeds
    pub assessment: RiskAssessment,

    /// Attribution, when requested and available
    pub explanation: Option<Explanation>,

    /// Why the attribution is missing, when it was requested but failed
    pub explanation_warning: Option<String>,

    /// Save stage outcome; `None` when the user did not opt in
    pub save: Option<SaveStatus>,
}

/// Service for running the assessment pipeline.
///
/// Holds the process-wide immutable model handle and the case log;
/// stateless between submissions.
pub struct AssessmentService<M, L>
where
    M: RiskModel,
    L: CaseLog,
{
    model: Arc<M>,
    case_log: Arc<L>,
}

impl<M, L> AssessmentService<M, L>
where
    M: RiskModel,
    L: CaseLog,
{
    /// Create a new assessment service.
    pub fn new(model: Arc<M>, case_log: Arc<L>) -> Self {
        Self { model, case_log }
    }

    /// Run the full pipeline for one observation.
    ///
    /// # Errors
    /// Returns error if the observation is invalid or the model cannot
    /// score it. Explanation and save failures never surface here; they
    /// are reported inside the outcome.
    pub fn assess(
        &self,
        observation: &ClinicalObservation,
        options: AssessOptions,
    ) -> Result<AssessmentOutcome, RenalertError> {
        observation
            .validate()
            .map_err(|errors| RenalertError::Validation(errors.join(", ")))?;

        let vector = self.build_vector(observation)?;

        let probability = self.model.score(&vector)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(RenalertError::Model(ModelError::Scoring(format!(
                "Probability {probability} outside [0, 1]"
            ))));
        }

        let assessment = RiskAssessment::new(probability);
        tracing::info!(
            "Assessment complete: probability={:.3}, tier={}",
            probability,
            assessment.tier
        );

        let (explanation, explanation_warning) = if options.explain {
            match explain(self.model.as_ref(), &vector) {
                Ok(explanation) => (Some(explanation), None),
                Err(e) => {
                    tracing::warn!("Explanation unavailable: {e}");
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        let save = if options.save {
            let record = CaseLogRecord::new(observation.clone(), probability);
            match self.case_log.append(&record) {
                Ok(()) => Some(SaveStatus::Saved),
                Err(e) => {
                    tracing::warn!("Failed to append case to research log: {e}");
                    Some(SaveStatus::Failed(e.to_string()))
                }
            }
        } else {
            None
        };

        Ok(AssessmentOutcome {
            assessment,
            explanation,
            explanation_warning,
            save,
        })
    }

    /// Build the feature vector aligned to the model's schema.
    ///
    /// When the model declares no order, fall back to the fixed training
    /// order and warn: the mismatch risk is accepted, not hidden.
    fn build_vector(&self, observation: &ClinicalObservation) -> Result<FeatureVector, RenalertError> {
        let vector = FeatureVector::from_observation(observation);

        match self.model.feature_order() {
            Some(order) => vector
                .aligned_to(order)
                .map_err(|e| RenalertError::Model(ModelError::SchemaMismatch(e))),
            None => {
                tracing::warn!(
                    "Model declares no feature order; falling back to the fixed training order"
                );
                Ok(vector)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FluidOverload, RiskTier, FEATURE_NAMES};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic stub returning a fixed probability.
    struct StubModel {
        probability: f64,
        order: Vec<String>,
    }

    impl StubModel {
        fn returning(probability: f64) -> Self {
            Self {
                probability,
                order: FEATURE_NAMES.iter().map(|n| (*n).to_string()).collect(),
            }
        }
    }

    impl RiskModel for StubModel {
        fn score(&self, _vector: &FeatureVector) -> Result<f64, ModelError> {
            Ok(self.probability)
        }

        fn feature_order(&self) -> Option<&[String]> {
            Some(&self.order)
        }
    }

    /// Case log stub counting appends, optionally failing every call.
    #[derive(Default)]
    struct StubCaseLog {
        appends: AtomicUsize,
        fail: bool,
    }

    impl StubCaseLog {
        fn failing() -> Self {
            Self {
                appends: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn append_count(&self) -> usize {
            self.appends.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("remote store unavailable")]
    struct StubCaseLogError;

    impl CaseLog for StubCaseLog {
        type Error = StubCaseLogError;

        fn append(&self, _record: &CaseLogRecord) -> Result<(), StubCaseLogError> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StubCaseLogError)
            } else {
                Ok(())
            }
        }
    }

    fn fixed_observation() -> ClinicalObservation {
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

    fn service(probability: f64, case_log: StubCaseLog) -> AssessmentService<StubModel, StubCaseLog> {
        AssessmentService::new(Arc::new(StubModel::returning(probability)), Arc::new(case_log))
    }

    #[test]
    fn test_high_risk_assessment() {
        let svc = service(0.83, StubCaseLog::default());
        let outcome = svc
            .assess(&fixed_observation(), AssessOptions::default())
            .expect("should assess");

        assert_eq!(outcome.assessment.tier, RiskTier::High);
        assert_eq!(outcome.assessment.display_percent(), "83.0%");
    }

    #[test]
    fn test_moderate_risk_assessment() {
        let svc = service(0.50, StubCaseLog::default());
        let outcome = svc
            .assess(&fixed_observation(), AssessOptions::default())
            .expect("should assess");
        assert_eq!(outcome.assessment.tier, RiskTier::Moderate);
    }

    #[test]
    fn test_low_risk_assessment() {
        let svc = service(0.10, StubCaseLog::default());
        let outcome = svc
            .assess(&fixed_observation(), AssessOptions::default())
            .expect("should assess");
        assert_eq!(outcome.assessment.tier, RiskTier::Low);
    }

    #[test]
    fn test_save_disabled_never_touches_remote_store() {
        let case_log = Arc::new(StubCaseLog::default());
        let svc = AssessmentService::new(Arc::new(StubModel::returning(0.83)), case_log.clone());

        let outcome = svc
            .assess(&fixed_observation(), AssessOptions::default())
            .expect("should assess");

        assert!(outcome.save.is_none());
        assert_eq!(case_log.append_count(), 0);
    }

    #[test]
    fn test_save_failure_leaves_assessment_intact() {
        let svc = service(0.83, StubCaseLog::failing());
        let options = AssessOptions {
            save: true,
            ..AssessOptions::default()
        };

        let outcome = svc
            .assess(&fixed_observation(), options)
            .expect("should assess");

        assert_eq!(outcome.assessment.tier, RiskTier::High);
        assert_eq!(outcome.assessment.display_percent(), "83.0%");
        assert!(matches!(outcome.save, Some(SaveStatus::Failed(_))));
    }

    #[test]
    fn test_save_success_is_reported() {
        let case_log = Arc::new(StubCaseLog::default());
        let svc = AssessmentService::new(Arc::new(StubModel::returning(0.2)), case_log.clone());
        let options = AssessOptions {
            save: true,
            ..AssessOptions::default()
        };

        let outcome = svc
            .assess(&fixed_observation(), options)
            .expect("should assess");

        assert_eq!(outcome.save, Some(SaveStatus::Saved));
        assert_eq!(case_log.append_count(), 1);
    }

    #[test]
    fn test_explanation_failure_degrades_to_warning() {
        // StubModel exposes no expected features, so attribution cannot run.
        let svc = service(0.83, StubCaseLog::default());
        let options = AssessOptions {
            explain: true,
            ..AssessOptions::default()
        };

        let outcome = svc
            .assess(&fixed_observation(), options)
            .expect("should assess");

        assert!(outcome.explanation.is_none());
        assert!(outcome.explanation_warning.is_some());
        assert_eq!(outcome.assessment.tier, RiskTier::High);
    }

    #[test]
    fn test_invalid_observation_rejected() {
        let svc = service(0.5, StubCaseLog::default());
        let mut invalid = fixed_observation();
        invalid.ph = 9.0;

        assert!(matches!(
            svc.assess(&invalid, AssessOptions::default()),
            Err(RenalertError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let svc = service(1.7, StubCaseLog::default());
        assert!(matches!(
            svc.assess(&fixed_observation(), AssessOptions::default()),
            Err(RenalertError::Model(ModelError::Scoring(_)))
        ));
    }
}
