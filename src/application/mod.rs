//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
mod explain;

pub use assessment::{AssessOptions, AssessmentOutcome, AssessmentService, SaveStatus};
pub use explain::{explain, ExplainError};
