//! # Renalert
//!
//! Clinical decision support for dialysis-initiation risk.
//!
//! This crate provides:
//! - Scoring of patient lab values against a pre-trained classifier
//! - Fixed-threshold LOW/MODERATE/HIGH risk tiering
//! - Per-feature attribution for individual predictions
//! - Opt-in, best-effort case logging to a remote research spreadsheet
//! - Terminal UI for bedside use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (observations, feature vectors, tiers)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (model artifact, spreadsheet log)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClinicalObservation, RiskAssessment, RiskTier};

/// Result type for Renalert operations
pub type Result<T> = std::result::Result<T, RenalertError>;

/// Main error type for Renalert
#[derive(Debug, thiserror::Error)]
pub enum RenalertError {
    #[error("Model error: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Case log error: {0}")]
    CaseLog(#[from] adapters::CaseLogError),

    #[error("Invalid observation: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
