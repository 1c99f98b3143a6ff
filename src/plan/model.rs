//! The `Plan` aggregate and its evidence snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::phase::registry::{self, Phase};

/// Identifier of a breeding plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl PlanId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Reference to an animal record (dam or sire) owned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRef {
    /// Identifier in the animal registry.
    pub id: String,
    /// Call name, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The evidence-backed milestones, one per transition after COMMITTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    /// Heat cycle started; gates BRED.
    CycleStart,
    /// Breeding took place; gates BIRTHED.
    Breed,
    /// Litter born; gates WEANED.
    Birth,
    /// Litter weaned; gates `PLACEMENT_STARTED`.
    Weaned,
    /// First placement; gates `PLACEMENT_COMPLETED`.
    PlacementStart,
    /// Last placement; gates COMPLETE.
    PlacementCompleted,
}

/// Milestones in lifecycle order.
pub const MILESTONES: [MilestoneKind; 6] = [
    MilestoneKind::CycleStart,
    MilestoneKind::Breed,
    MilestoneKind::Birth,
    MilestoneKind::Weaned,
    MilestoneKind::PlacementStart,
    MilestoneKind::PlacementCompleted,
];

impl MilestoneKind {
    /// The phase whose entry this milestone's actual date unlocks.
    #[must_use]
    pub const fn unlocks(self) -> Phase {
        match self {
            Self::CycleStart => Phase::Bred,
            Self::Breed => Phase::Birthed,
            Self::Birth => Phase::Weaned,
            Self::Weaned => Phase::PlacementStarted,
            Self::PlacementStart => Phase::PlacementCompleted,
            Self::PlacementCompleted => Phase::Complete,
        }
    }

    /// Field name used in plan documents and paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CycleStart => "cycle_start",
            Self::Breed => "breed",
            Self::Birth => "birth",
            Self::Weaned => "weaned",
            Self::PlacementStart => "placement_start",
            Self::PlacementCompleted => "placement_completed",
        }
    }

    /// The milestone before this one, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::CycleStart => None,
            Self::Breed => Some(Self::CycleStart),
            Self::Birth => Some(Self::Breed),
            Self::Weaned => Some(Self::Birth),
            Self::PlacementStart => Some(Self::Weaned),
            Self::PlacementCompleted => Some(Self::PlacementStart),
        }
    }
}

/// Evidence that a real-world milestone occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// The "has-evidence" flag.
    #[serde(default)]
    pub recorded: bool,
    /// When the milestone actually happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<NaiveDate>,
    /// Projected date. Display pre-fill only; never satisfies a requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<NaiveDate>,
}

impl Milestone {
    /// Returns `true` when an actual date is present.
    #[must_use]
    pub const fn is_evidenced(&self) -> bool {
        self.actual.is_some()
    }

    /// Returns `true` when no field carries data.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.recorded && self.actual.is_none() && self.expected.is_none()
    }
}

/// Evidence snapshot: one [`Milestone`] per evidence-backed transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub cycle_start: Milestone,
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub breed: Milestone,
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub birth: Milestone,
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub weaned: Milestone,
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub placement_start: Milestone,
    #[serde(default, skip_serializing_if = "Milestone::is_empty")]
    pub placement_completed: Milestone,
}

impl Evidence {
    /// Borrows the milestone for `kind`.
    #[must_use]
    pub const fn milestone(&self, kind: MilestoneKind) -> &Milestone {
        match kind {
            MilestoneKind::CycleStart => &self.cycle_start,
            MilestoneKind::Breed => &self.breed,
            MilestoneKind::Birth => &self.birth,
            MilestoneKind::Weaned => &self.weaned,
            MilestoneKind::PlacementStart => &self.placement_start,
            MilestoneKind::PlacementCompleted => &self.placement_completed,
        }
    }

    /// Mutably borrows the milestone for `kind`.
    pub fn milestone_mut(&mut self, kind: MilestoneKind) -> &mut Milestone {
        match kind {
            MilestoneKind::CycleStart => &mut self.cycle_start,
            MilestoneKind::Breed => &mut self.breed,
            MilestoneKind::Birth => &mut self.birth,
            MilestoneKind::Weaned => &mut self.weaned,
            MilestoneKind::PlacementStart => &mut self.placement_start,
            MilestoneKind::PlacementCompleted => &mut self.placement_completed,
        }
    }

    fn is_empty(&self) -> bool {
        MILESTONES.iter().all(|k| self.milestone(*k).is_empty())
    }
}

/// A committed phase edge, recorded by the store for idempotent retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEdge {
    pub from: Phase,
    pub to: Phase,
}

/// A breeding plan snapshot.
///
/// Snapshots are immutable from the engine's point of view: every operation
/// returns a new `Plan` or a typed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    /// Optimistic-concurrency token, owned by the store.
    #[serde(default)]
    pub version: u64,
    /// Raw persisted status. Read through [`Plan::phase`], never directly.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub dam: Option<AnimalRef>,
    #[serde(default)]
    pub sire: Option<AnimalRef>,
    /// One-time commitment flag for the chosen cycle.
    #[serde(default)]
    pub locked_cycle: bool,
    #[serde(default, skip_serializing_if = "Evidence::is_empty")]
    pub evidence: Evidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<TransitionEdge>,
}

impl Plan {
    /// A fresh plan in PLANNING with no descriptive fields or evidence.
    #[must_use]
    pub fn new(id: PlanId) -> Self {
        Self {
            id,
            version: 0,
            status: Some(Phase::Planning.as_str().to_string()),
            name: None,
            species: None,
            breed: None,
            dam: None,
            sire: None,
            locked_cycle: false,
            evidence: Evidence::default(),
            last_transition: None,
        }
    }

    /// Sets the plan name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current phase, with unknown or missing statuses read as PLANNING.
    #[must_use]
    pub fn phase(&self) -> Phase {
        registry::resolve_phase(self.status.as_deref())
    }

    /// Current phase index in `[0, 7]`.
    #[must_use]
    pub fn phase_index(&self) -> usize {
        registry::phase_index(self.status.as_deref())
    }

    /// Phase this plan would advance to next, or `None` at COMPLETE.
    #[must_use]
    pub fn next_phase(&self) -> Option<Phase> {
        registry::next_phase(self.status.as_deref())
    }

    /// Returns a copy of this snapshot at `phase`, for stores applying a
    /// committed transition.
    #[must_use]
    pub fn at_phase(&self, phase: Phase) -> Self {
        let mut next = self.clone();
        next.status = Some(phase.as_str().to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plan_is_planning() {
        let plan = Plan::new(PlanId::new("p-1"));
        assert_eq!(plan.phase(), Phase::Planning);
        assert_eq!(plan.next_phase(), Some(Phase::Committed));
        assert_eq!(plan.version, 0);
    }

    #[test]
    fn test_missing_status_reads_as_planning() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.status = None;
        assert_eq!(plan.phase_index(), 0);
        plan.status = Some("ON_HOLD".to_string());
        assert_eq!(plan.phase(), Phase::Planning);
    }

    #[test]
    fn test_milestones_unlock_consecutive_phases() {
        let unlocked: Vec<usize> = MILESTONES.iter().map(|m| m.unlocks().index()).collect();
        assert_eq!(unlocked, vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_previous_milestone_chain() {
        assert_eq!(MilestoneKind::CycleStart.previous(), None);
        for pair in MILESTONES.windows(2) {
            assert_eq!(pair[1].previous(), Some(pair[0]));
        }
    }

    #[test]
    fn test_plan_yaml_shape() {
        let yaml = r"
id: litter-2025-a
version: 3
status: COMMITTED
name: Spring litter
species: DOG
breed: Whippet
dam: { id: dam-1, name: Juno }
sire: { id: sire-9 }
locked_cycle: true
evidence:
  cycle_start:
    recorded: true
    actual: 2025-03-01
  breed:
    expected: 2025-03-12
";
        let plan: Plan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plan.phase(), Phase::Committed);
        assert_eq!(plan.version, 3);
        assert_eq!(
            plan.evidence.cycle_start.actual,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert!(!plan.evidence.breed.is_evidenced());
        assert_eq!(plan.dam.as_ref().and_then(|d| d.name.as_deref()), Some("Juno"));
    }

    #[test]
    fn test_at_phase_keeps_evidence() {
        let mut plan = Plan::new(PlanId::new("p-1"));
        plan.evidence.cycle_start.actual = NaiveDate::from_ymd_opt(2025, 3, 1);
        let moved = plan.at_phase(Phase::Bred);
        assert_eq!(moved.phase(), Phase::Bred);
        assert_eq!(moved.evidence, plan.evidence);
    }
}
