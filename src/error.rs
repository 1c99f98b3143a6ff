//! Error types for `breedline`
//!
//! Transition outcomes (blocked, declined, conflict) are values, not errors;
//! see [`crate::phase::TransitionOutcome`]. The types here cover the
//! failure modes of the surrounding layers: plan documents, stores, the
//! evidence editor, and CLI input.

use std::path::PathBuf;
use thiserror::Error;

use crate::phase::Phase;
use crate::plan::PlanId;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `breedline` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Plan document error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Store error (plan not found, backend failure)
    pub const STORE_ERROR: i32 = 4;

    /// Invalid phase or evidence input
    pub const PHASE_ERROR: i32 = 5;

    /// Transition blocked by unmet requirements
    pub const BLOCKED: i32 = 6;

    /// Confirmation declined
    pub const DECLINED: i32 = 7;

    /// Plan changed underneath the caller; reload and retry
    pub const CONFLICT: i32 = 8;

    /// Commit failed in the store
    pub const PERSISTENCE_FAILURE: i32 = 9;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `breedline` operations.
#[derive(Debug, Error)]
pub enum BreedlineError {
    /// Plan document loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Plan store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Phase lookup error
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Evidence editing error
    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    /// A transition did not advance; carries the exit code for the outcome
    #[error("{message}")]
    NotAdvanced {
        /// Human-readable summary of the outcome
        message: String,
        /// Exit code matching the outcome kind
        code: i32,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BreedlineError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Store(_) => ExitCode::STORE_ERROR,
            Self::Phase(_) | Self::Evidence(_) => ExitCode::PHASE_ERROR,
            Self::NotAdvanced { code, .. } => *code,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Plan Document Errors
// ============================================================================

/// Plan document loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the plan document
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Plan validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the plan document
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced plan document not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking a plan.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "evidence.birth.actual")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the plan document cannot be used
    Error,
    /// Warning - suspicious data that does not prevent loading
    Warning,
}

// ============================================================================
// Store Errors
// ============================================================================

/// Errors returned by a [`PlanStore`](crate::store::PlanStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict: the plan was modified since the
    /// caller's snapshot was taken.
    #[error("concurrent conflict on plan {plan_id}: expected version {expected_version}, found {found_version}")]
    Conflict {
        /// Plan being committed
        plan_id: PlanId,
        /// Version the caller's snapshot carried
        expected_version: u64,
        /// Version currently stored
        found_version: u64,
    },

    /// No plan with the given id exists.
    #[error("plan not found: {0}")]
    NotFound(PlanId),

    /// The id cannot name a stored plan (empty, or contains path syntax).
    #[error("invalid plan id '{0}'")]
    InvalidId(String),

    /// A plan with the given id already exists.
    #[error("plan already exists: {0}")]
    AlreadyExists(PlanId),

    /// The commit names an edge that does not start at the stored phase.
    #[error("plan {plan_id} is at {stored}, cannot commit {from} -> {to}")]
    StaleEdge {
        /// Plan being committed
        plan_id: PlanId,
        /// Phase currently stored
        stored: Phase,
        /// Requested source phase
        from: Phase,
        /// Requested target phase
        to: Phase,
    },

    /// `save_plan` attempted to change the phase; only commits may do that.
    #[error("plan {0}: phase changes must go through a transition commit")]
    PhaseChangeRejected(PlanId),

    /// Plan file could not be read or written.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Plan could not be serialized or deserialized.
    #[error("store serialization error: {0}")]
    Serialization(String),

    /// A backend-specific error (transport, server, etc.).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ============================================================================
// Phase & Evidence Errors
// ============================================================================

/// Errors parsing phase names at input boundaries.
///
/// The engine itself never fails on unknown statuses; it reads them as
/// PLANNING. This error is only raised where a caller names a phase
/// explicitly (CLI arguments).
#[derive(Debug, Error)]
pub enum PhaseError {
    /// Phase name is not one of the eight canonical keys
    #[error("unknown phase '{value}'{}", suggestion_suffix(.suggestion.as_deref()))]
    Unknown {
        /// The rejected input
        value: String,
        /// Closest canonical key, if one is near enough
        suggestion: Option<String>,
    },
}

/// Evidence editor errors.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// Evidence field name is not recognized
    #[error("unknown evidence field '{value}'{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownField {
        /// The rejected input
        value: String,
        /// Closest field name, if one is near enough
        suggestion: Option<String>,
    },

    /// Value kind does not match the field (e.g. a date for a flag)
    #[error("field '{field}' expects a {expected}")]
    TypeMismatch {
        /// Field being set
        field: String,
        /// Kind of value the field accepts
        expected: &'static str,
    },

    /// Value could not be parsed
    #[error("invalid value '{value}' for '{field}': expected {expected}")]
    InvalidValue {
        /// Field being set
        field: String,
        /// The rejected input
        value: String,
        /// Description of what was expected
        expected: &'static str,
    },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `breedline` operations.
pub type Result<T> = std::result::Result<T, BreedlineError>;

// ============================================================================
// Tests
// ============================================================================
