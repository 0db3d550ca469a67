//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Patient lab value entry
//! - Risk assessment display with attribution
//! - Opt-in research log contribution

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{AssessmentProgress, AssessmentWorker, AssessmentWorkerHandle};
