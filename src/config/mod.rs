//! Plan document loading and validation
//!
//! Reads YAML plan documents, applies size limits, and runs semantic
//! validation that reports data problems the engine would otherwise absorb.

pub mod loader;
pub mod validation;

pub use loader::{LoadResult, LoaderOptions, PlanLimits, PlanLoader};
pub use validation::{ValidationResult, Validator};
