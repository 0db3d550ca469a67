//! Background assessment worker.
//!
//! Runs the pipeline off the TUI main loop so the terminal stays
//! responsive while the model scores and the (opt-in) remote append runs.
//! The form does not accept a second submission while one is in flight.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{AssessOptions, AssessmentOutcome, AssessmentService};
use crate::domain::ClinicalObservation;
use crate::ports::{CaseLog, RiskModel};

/// Progress updates from the assessment worker.
#[derive(Debug, Clone)]
pub enum AssessmentProgress {
    /// Pipeline started
    Running,
    /// Pipeline finished with a result
    Complete(AssessmentOutcome),
    /// Error occurred during assessment
    Error(String),
}

/// Handle to a running assessment worker.
pub struct AssessmentWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<AssessmentProgress>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl AssessmentWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<AssessmentProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Worker that runs one assessment in the background.
pub struct AssessmentWorker;

impl AssessmentWorker {
    /// Spawn a background assessment task.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<M, L>(
        service: Arc<AssessmentService<M, L>>,
        observation: ClinicalObservation,
        options: AssessOptions,
    ) -> AssessmentWorkerHandle
    where
        M: RiskModel + 'static,
        L: CaseLog + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(service, observation, options, &tx);
        });

        AssessmentWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<M, L>(
        service: Arc<AssessmentService<M, L>>,
        observation: ClinicalObservation,
        options: AssessOptions,
        tx: &Sender<AssessmentProgress>,
    ) where
        M: RiskModel + 'static,
        L: CaseLog + 'static,
    {
        let _ = tx.send(AssessmentProgress::Running);

        match service.assess(&observation, options) {
            Ok(outcome) => {
                let _ = tx.send(AssessmentProgress::Complete(outcome));
            }
            Err(e) => {
                let _ = tx.send(AssessmentProgress::Error(e.to_string()));
            }
        }
    }
}
