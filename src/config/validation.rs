//! Plan document validation
//!
//! Semantic checks run on a deserialized [`Plan`] after loading. The engine
//! tolerates everything reported here (unknown statuses read as PLANNING,
//! bare flags simply don't satisfy requirements); the validator exists so
//! data problems are visible instead of silently absorbed.
//!
//! Validation collects ALL issues rather than stopping at the first.

use crate::error::{Severity, ValidationIssue};
use crate::phase::{Phase, registry};
use crate::plan::{MILESTONES, Plan};
use crate::store::check_id;

// ============================================================================
// Public API
// ============================================================================

/// Result of plan validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Plan validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a plan and returns every issue found.
    pub fn validate(&mut self, plan: &Plan) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_identity(plan);
        self.validate_status(plan);
        self.validate_milestones(plan);
        self.validate_reached_phase(plan);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn validate_identity(&mut self, plan: &Plan) {
        if check_id(&plan.id).is_err() {
            self.add_error(
                "id",
                "Plan id is required and cannot contain path separators",
            );
        }

        if plan.name.as_ref().is_some_and(|n| n.chars().count() > 200) {
            self.add_warning("name", "Plan name is unusually long (> 200 characters)");
        }
    }

    fn validate_status(&mut self, plan: &Plan) {
        match plan.status.as_deref() {
            None => self.add_warning("status", "Status is missing; plan will be read as PLANNING"),
            Some(raw) if !registry::is_recognized(Some(raw)) => self.add_warning(
                "status",
                &format!("Unrecognized status '{raw}'; plan will be read as PLANNING"),
            ),
            Some(_) => {}
        }
    }

    fn validate_milestones(&mut self, plan: &Plan) {
        for kind in MILESTONES {
            let milestone = plan.evidence.milestone(kind);
            let path = format!("evidence.{}", kind.as_str());

            if milestone.recorded && milestone.actual.is_none() {
                self.add_warning(
                    &path,
                    "Milestone is marked recorded but has no actual date; it does not count as evidence",
                );
            }

            let (Some(actual), Some(previous)) = (milestone.actual, kind.previous()) else {
                continue;
            };
            match plan.evidence.milestone(previous).actual {
                None => self.add_warning(
                    &path,
                    &format!(
                        "Actual date recorded while earlier milestone '{}' has none",
                        previous.as_str()
                    ),
                ),
                Some(earlier) if actual < earlier => self.add_warning(
                    &path,
                    &format!(
                        "Actual date {actual} is before the '{}' date {earlier}",
                        previous.as_str()
                    ),
                ),
                Some(_) => {}
            }
        }
    }

    /// Flags evidence that was cleared after the plan advanced past it.
    fn validate_reached_phase(&mut self, plan: &Plan) {
        let current = plan.phase();
        if current >= Phase::Committed && !plan.locked_cycle {
            self.add_warning(
                "locked_cycle",
                &format!("Plan is at {current} but its cycle is not locked"),
            );
        }

        for kind in MILESTONES {
            let entered = kind.unlocks();
            if entered <= current && !plan.evidence.milestone(kind).is_evidenced() {
                self.add_warning(
                    &format!("evidence.{}", kind.as_str()),
                    &format!(
                        "Plan is at {current} but the evidence for entering {entered} is missing"
                    ),
                );
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn validate(plan: &Plan) -> ValidationResult {
        Validator::new().validate(plan)
    }

    fn warning_paths(result: &ValidationResult) -> Vec<&str> {
        result.warnings.iter().map(|w| w.path.as_str()).collect()
    }

    #[test]
    fn test_fresh_plan_is_clean() {
        let result = validate(&Plan::new(PlanId::new("p-1")));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_empty_id_is_error() {
        let result = validate(&Plan::new(PlanId::new("")));
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "id");
    }

    #[test]
    fn test_unknown_status_warns() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.status = Some("ON_HOLD".to_string());
        let result = validate(&plan);
        assert!(result.is_valid());
        assert!(result.warnings[0].message.contains("ON_HOLD"));

        plan.status = None;
        let result = validate(&plan);
        assert_eq!(warning_paths(&result), vec!["status"]);
    }

    #[test]
    fn test_recorded_without_date_warns() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.evidence.birth.recorded = true;
        let result = validate(&plan);
        assert!(warning_paths(&result).contains(&"evidence.birth"));
    }

    #[test]
    fn test_dates_going_backwards_warn() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.evidence.cycle_start.actual = date(2025, 3, 10);
        plan.evidence.breed.actual = date(2025, 3, 1);
        let result = validate(&plan);
        assert_eq!(warning_paths(&result), vec!["evidence.breed"]);
        assert!(result.warnings[0].message.contains("before"));
    }

    #[test]
    fn test_skipped_milestone_warns() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.evidence.birth.actual = date(2025, 5, 1);
        let result = validate(&plan);
        assert_eq!(warning_paths(&result), vec!["evidence.birth"]);
        assert!(result.warnings[0].message.contains("'breed'"));
    }

    #[test]
    fn test_cleared_evidence_behind_current_phase_warns() {
        let mut plan = Plan::new(PlanId::new("p-1")).at_phase(Phase::Bred);
        plan.locked_cycle = true;
        let result = validate(&plan);
        assert_eq!(warning_paths(&result), vec!["evidence.cycle_start"]);
    }

    #[test]
    fn test_committed_without_lock_warns() {
        let plan = Plan::new(PlanId::new("p-1")).at_phase(Phase::Committed);
        let result = validate(&plan);
        assert_eq!(warning_paths(&result), vec!["locked_cycle"]);
    }

    #[test]
    fn test_validator_is_reusable() {
        let mut validator = Validator::new();
        let first = validator.validate(&Plan::new(PlanId::new("")));
        assert!(first.has_errors());
        let second = validator.validate(&Plan::new(PlanId::new("p-2")));
        assert!(second.is_valid());
    }
}
