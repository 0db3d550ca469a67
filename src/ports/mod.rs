//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model store, remote
//! case log).

mod case_log;
mod model;

pub use case_log::CaseLog;
pub use model::{ModelError, RiskModel};
