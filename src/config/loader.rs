//! Plan document loader
//!
//! Pipeline for a single YAML plan document:
//! 1. Size check against [`PlanLimits`]
//! 2. UTF-8 BOM strip
//! 3. YAML deserialization into [`Plan`]
//! 4. Validation (errors fail the load, warnings are returned)

use std::path::Path;

use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};
use crate::plan::Plan;

// ============================================================================
// Public API
// ============================================================================

/// Options for the plan loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for plan documents.
    pub limits: PlanLimits,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

/// Limits on plan documents to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct PlanLimits {
    /// Maximum plan document size in bytes.
    pub max_plan_size: usize,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            max_plan_size: env_or("BREEDLINE_MAX_PLAN_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a plan document.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated plan.
    pub plan: Plan,

    /// Warnings encountered during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads plan documents from disk or memory.
#[derive(Debug, Clone, Default)]
pub struct PlanLoader {
    options: LoaderOptions,
}

impl PlanLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates a plan document from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing or larger than the configured limit
    /// - YAML parsing fails
    /// - Validation reports errors (or warnings, in strict mode)
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        self.check_size(metadata.len())?;

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        self.parse(&content, path)
    }

    /// Parses and validates plan content already in memory.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is oversized, is not a valid plan
    /// document, or fails validation.
    pub fn parse(&self, content: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        self.check_size(content.len() as u64)?;

        // Handle UTF-8 BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "plan document is empty".to_string(),
            });
        }

        let plan: Plan = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        let result = Validator::new().validate(&plan);
        let mut errors = result.errors;
        let warnings = if self.options.strict {
            errors.extend(result.warnings);
            Vec::new()
        } else {
            result.warnings
        };

        if !errors.is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors,
            });
        }

        Ok(LoadResult { plan, warnings })
    }

    fn check_size(&self, len: u64) -> Result<(), ConfigError> {
        let max = self.options.limits.max_plan_size;
        let size = usize::try_from(len).unwrap_or(usize::MAX);
        if size > max {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{size} bytes"),
                expected: format!("at most {max} bytes"),
            });
        }
        Ok(())
    }
}

/// Reads an environment variable and parses it, falling back to `default`.
pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
