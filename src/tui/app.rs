//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background assessment via worker thread

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::logistic::LogisticModel;
use crate::adapters::sheets::SheetsCaseLog;
use crate::application::{AssessOptions, AssessmentService};

use super::ui::{
    assessment::{render_assessment, AssessmentState},
    form::{render_observation_form, ObservationFormState},
    render_disclaimer,
};
use super::worker::{AssessmentProgress, AssessmentWorker, AssessmentWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Form,
    Assessment,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Assessment service; `None` when the model failed to load
    service: Option<Arc<AssessmentService<LogisticModel, SheetsCaseLog>>>,

    /// Why the model is unavailable, when it is
    model_error: Option<String>,

    /// Observation form state
    form_state: ObservationFormState,

    /// Assessment view state
    assessment_state: AssessmentState,

    /// Pending assessment worker (if running)
    pending_worker: Option<AssessmentWorkerHandle>,

    /// When the current run started (for the progress animation)
    run_started_at: Option<Instant>,
}

impl App {
    /// Create a new application instance using default adapters.
    ///
    /// A model load failure does not fail construction: prediction is
    /// disabled and the form shows a visible error instead.
    ///
    /// # Errors
    /// Returns error if the case log HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let model_path = std::env::var("RENALERT_MODEL_PATH")
            .unwrap_or_else(|_| "models".to_string());

        let (service, model_error) =
            match LogisticModel::load(std::path::Path::new(&model_path)) {
                Ok(model) => {
                    let case_log = SheetsCaseLog::from_env().unwrap_or_else(|e| {
                        tracing::warn!("Research log not configured: {e}");
                        SheetsCaseLog::disabled()
                    });
                    let service =
                        AssessmentService::new(Arc::new(model), Arc::new(case_log));
                    (Some(Arc::new(service)), None)
                }
                Err(e) => {
                    tracing::error!("Failed to load model from {model_path:?}: {e}");
                    (None, Some(e.to_string()))
                }
            };

        Ok(Self::with_service(service, model_error))
    }

    /// Create the application with an injected service (Composition Root
    /// pattern), for tests and alternative entry points.
    #[must_use]
    pub fn with_service(
        service: Option<Arc<AssessmentService<LogisticModel, SheetsCaseLog>>>,
        model_error: Option<String>,
    ) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            model_error,
            form_state: ObservationFormState::default(),
            assessment_state: AssessmentState::default(),
            pending_worker: None,
            run_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Form => render_observation_form(
                        f,
                        content_area,
                        &self.form_state,
                        self.model_error.as_deref(),
                    ),
                    Screen::Assessment => {
                        render_assessment(f, content_area, &self.assessment_state)
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }

        loop {
            let progress = match self
                .pending_worker
                .as_ref()
                .and_then(|worker| worker.try_recv())
            {
                Some(p) => p,
                None => break,
            };

            match progress {
                AssessmentProgress::Running => {
                    self.assessment_state = AssessmentState::Running { progress: 0.02 };
                    self.run_started_at = Some(Instant::now());
                }
                AssessmentProgress::Complete(outcome) => {
                    self.assessment_state = AssessmentState::Complete { outcome };
                    self.pending_worker = None;
                    self.run_started_at = None;
                    break;
                }
                AssessmentProgress::Error(message) => {
                    self.assessment_state = AssessmentState::Error { message };
                    self.pending_worker = None;
                    self.run_started_at = None;
                    break;
                }
            }
        }
    }

    /// Smooth, monotonic progress that asymptotically approaches 95%
    /// while the worker runs; jumps to done when it reports back.
    fn tick_progress(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }
        let Some(started_at) = self.run_started_at else {
            return;
        };
        let AssessmentState::Running { progress } = &self.assessment_state else {
            return;
        };
        let progress = *progress;

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();
        let k = 1.0 - (-elapsed / 1.5).exp();
        let desired = (0.02 + 0.93 * k).clamp(0.0, 0.95);

        self.assessment_state = AssessmentState::Running {
            progress: desired.max(progress),
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Assessment => self.handle_assessment_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.form_state.save_enabled = !self.form_state.save_enabled;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.form_state.explain_enabled = !self.form_state.explain_enabled;
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        match &self.assessment_state {
            AssessmentState::Complete { .. } => match key {
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.form_state = ObservationFormState::default();
                    self.assessment_state = AssessmentState::Idle;
                    self.screen = Screen::Form;
                }
                KeyCode::Esc => {
                    self.assessment_state = AssessmentState::Idle;
                    self.screen = Screen::Form;
                }
                _ => {}
            },
            AssessmentState::Error { .. } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.assessment_state = AssessmentState::Idle;
                    self.screen = Screen::Form;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        let Some(service) = self.service.clone() else {
            self.form_state.error_message = Some(
                "Model unavailable - prediction disabled. Check RENALERT_MODEL_PATH.".to_string(),
            );
            return;
        };

        match self.form_state.to_observation() {
            Ok(observation) => {
                if let Err(errors) = observation.validate() {
                    self.form_state.error_message = Some(errors.join(", "));
                    return;
                }

                let options = AssessOptions {
                    explain: self.form_state.explain_enabled,
                    save: self.form_state.save_enabled,
                };

                self.screen = Screen::Assessment;
                self.assessment_state = AssessmentState::Running { progress: 0.0 };
                self.run_started_at = Some(Instant::now());

                let worker = AssessmentWorker::spawn(service, observation, options);
                self.pending_worker = Some(worker);

                // Clear plaintext buffers from the UI immediately.
                self.form_state.clear_sensitive();
            }
            Err(e) => {
                self.form_state.error_message = Some(e);
            }
        }
    }
}
