//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `logistic`: the JSON model artifact exported by the training pipeline
//! - `sheets`: the remote spreadsheet research log
//! - `sanitize`: PHI filtering for logs

pub mod logistic;
pub mod sanitize;
pub mod sheets;

// Re-export case log error for lib.rs
pub use sheets::CaseLogError;
