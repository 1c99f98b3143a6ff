//! Guard evaluation
//!
//! Folds a requirement list into a single "may advance" verdict. An empty
//! list is satisfied: a transition with no rules advances freely.

use serde::Serialize;

use crate::plan::Plan;

use super::registry::Phase;
use super::requirements::{Requirement, requirements_for};

/// Returns `true` when every requirement for entering `target` holds.
///
/// Equivalent to `requirements_for(target, plan).iter().all(|r| r.satisfied)`;
/// vacuously `true` when there are no requirements.
#[must_use]
pub fn can_advance(target: Option<Phase>, plan: &Plan) -> bool {
    requirements_for(target, plan).iter().all(|r| r.satisfied)
}

/// A resolved checklist for one transition, with progress counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    /// Phase the plan is in.
    pub from: Phase,
    /// Phase the checklist gates, or `None` when the plan is terminal.
    pub target: Option<Phase>,
    pub requirements: Vec<Requirement>,
}

impl Checklist {
    /// Resolves the checklist for `plan`'s next transition.
    #[must_use]
    pub fn for_plan(plan: &Plan) -> Self {
        let target = plan.next_phase();
        Self {
            from: plan.phase(),
            target,
            requirements: requirements_for(target, plan),
        }
    }

    /// Guard verdict over the requirements.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.requirements.iter().all(|r| r.satisfied)
    }

    #[must_use]
    pub fn met_count(&self) -> usize {
        self.requirements.iter().filter(|r| r.satisfied).count()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.requirements.len()
    }

    /// Requirements still open, in table order.
    #[must_use]
    pub fn unsatisfied(&self) -> Vec<Requirement> {
        self.requirements
            .iter()
            .filter(|r| !r.satisfied)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanId;
    use chrono::NaiveDate;

    #[test]
    fn test_fresh_plan_cannot_commit() {
        let plan = Plan::new(PlanId::new("p-1"));
        let checklist = Checklist::for_plan(&plan);
        assert_eq!(checklist.target, Some(Phase::Committed));
        assert!(!checklist.can_advance());
        assert_eq!(checklist.met_count(), 0);
        assert_eq!(checklist.total_count(), 6);
        assert_eq!(checklist.unsatisfied().len(), 6);
        assert!(!can_advance(checklist.target, &plan));
    }

    #[test]
    fn test_partial_progress_counts() {
        let plan = Plan::new(PlanId::new("p-1")).with_name("Litter A");
        let checklist = Checklist::for_plan(&plan);
        assert_eq!(checklist.met_count(), 1);
        assert_eq!(checklist.total_count(), 6);
    }

    #[test]
    fn test_empty_requirements_are_free_advance() {
        let plan = Plan::new(PlanId::new("p-1"));
        assert!(can_advance(None, &plan));
        assert!(can_advance(Some(Phase::Planning), &plan));
    }

    #[test]
    fn test_terminal_checklist() {
        let plan = Plan::new(PlanId::new("p-1")).at_phase(Phase::Complete);
        let checklist = Checklist::for_plan(&plan);
        assert_eq!(checklist.target, None);
        assert_eq!(checklist.total_count(), 0);
        assert!(checklist.can_advance());
    }

    #[test]
    fn test_bred_ready_once_cycle_start_recorded() {
        let mut plan = Plan::new(PlanId::new("p-1")).at_phase(Phase::Committed);
        assert!(!can_advance(Some(Phase::Bred), &plan));
        plan.evidence.cycle_start.recorded = true;
        plan.evidence.cycle_start.actual = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(can_advance(Some(Phase::Bred), &plan));
        assert!(Checklist::for_plan(&plan).can_advance());
    }
}
