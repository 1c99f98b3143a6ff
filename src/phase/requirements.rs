//! Requirement resolver
//!
//! A declarative table from target phase to the requirements a plan must
//! meet to enter it. Each requirement key carries its own check, so
//! resolving is a table lookup followed by a map; no per-phase branching
//! lives anywhere else.

use serde::Serialize;

use crate::plan::{MilestoneKind, Plan};

use super::registry::Phase;

/// A named condition on the plan snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementKey {
    PlanName,
    Species,
    Dam,
    Sire,
    Breed,
    LockedCycle,
    CycleStart,
    BreedDate,
    BirthDate,
    WeanedDate,
    PlacementStart,
    PlacementCompleted,
}

impl RequirementKey {
    /// Stable key, e.g. `"cycleStart"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlanName => "planName",
            Self::Species => "species",
            Self::Dam => "dam",
            Self::Sire => "sire",
            Self::Breed => "breed",
            Self::LockedCycle => "lockedCycle",
            Self::CycleStart => "cycleStart",
            Self::BreedDate => "breedDate",
            Self::BirthDate => "birthDate",
            Self::WeanedDate => "weanedDate",
            Self::PlacementStart => "placementStart",
            Self::PlacementCompleted => "placementCompleted",
        }
    }

    /// Checklist label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlanName => "Plan name set",
            Self::Species => "Species set",
            Self::Dam => "Dam linked",
            Self::Sire => "Sire linked",
            Self::Breed => "Breed set",
            Self::LockedCycle => "Cycle locked",
            Self::CycleStart => "Actual cycle start date recorded",
            Self::BreedDate => "Actual breeding date recorded",
            Self::BirthDate => "Actual birth date recorded",
            Self::WeanedDate => "Actual weaning date recorded",
            Self::PlacementStart => "Actual placement start date recorded",
            Self::PlacementCompleted => "Actual placement completion date recorded",
        }
    }

    /// What the user should do to satisfy this requirement.
    #[must_use]
    pub const fn action_hint(self) -> &'static str {
        match self {
            Self::PlanName => "Give the plan a name.",
            Self::Species => "Choose the species for this plan.",
            Self::Dam => "Link a dam from your animals.",
            Self::Sire => "Link a sire from your animals or a stud listing.",
            Self::Breed => "Set the breed for the expected litter.",
            Self::LockedCycle => "Lock the selected heat cycle.",
            Self::CycleStart => "Enter the date the heat cycle actually started.",
            Self::BreedDate => "Enter the date breeding actually took place.",
            Self::BirthDate => "Enter the date the litter was born.",
            Self::WeanedDate => "Enter the date the litter was weaned.",
            Self::PlacementStart => "Enter the date the first offspring went home.",
            Self::PlacementCompleted => "Enter the date the last offspring went home.",
        }
    }

    /// The milestone whose actual date satisfies this key, if any.
    #[must_use]
    pub const fn milestone(self) -> Option<MilestoneKind> {
        match self {
            Self::CycleStart => Some(MilestoneKind::CycleStart),
            Self::BreedDate => Some(MilestoneKind::Breed),
            Self::BirthDate => Some(MilestoneKind::Birth),
            Self::WeanedDate => Some(MilestoneKind::Weaned),
            Self::PlacementStart => Some(MilestoneKind::PlacementStart),
            Self::PlacementCompleted => Some(MilestoneKind::PlacementCompleted),
            _ => None,
        }
    }

    /// Evaluates this requirement against a snapshot.
    ///
    /// Only actual dates count; expected dates and bare `recorded` flags
    /// never satisfy a milestone requirement.
    #[must_use]
    pub fn is_met(self, plan: &Plan) -> bool {
        if let Some(kind) = self.milestone() {
            return plan.evidence.milestone(kind).is_evidenced();
        }
        match self {
            Self::PlanName => has_text(plan.name.as_deref()),
            Self::Species => has_text(plan.species.as_deref()),
            Self::Breed => has_text(plan.breed.as_deref()),
            Self::Dam => plan.dam.as_ref().is_some_and(|a| !a.id.trim().is_empty()),
            Self::Sire => plan.sire.as_ref().is_some_and(|a| !a.id.trim().is_empty()),
            Self::LockedCycle => plan.locked_cycle,
            _ => false,
        }
    }
}

impl std::fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// A requirement evaluated against a snapshot. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub key: RequirementKey,
    pub label: &'static str,
    pub satisfied: bool,
    pub action_hint: &'static str,
}

const COMMITTED: &[RequirementKey] = &[
    RequirementKey::PlanName,
    RequirementKey::Species,
    RequirementKey::Dam,
    RequirementKey::Sire,
    RequirementKey::Breed,
    RequirementKey::LockedCycle,
];

/// The rule table: requirement keys for entering `target`, in display order.
///
/// PLANNING is never a transition target, so its list is empty.
#[must_use]
pub const fn rules_for(target: Phase) -> &'static [RequirementKey] {
    match target {
        Phase::Planning => &[],
        Phase::Committed => COMMITTED,
        Phase::Bred => &[RequirementKey::CycleStart],
        Phase::Birthed => &[RequirementKey::BreedDate],
        Phase::Weaned => &[RequirementKey::BirthDate],
        Phase::PlacementStarted => &[RequirementKey::WeanedDate],
        Phase::PlacementCompleted => &[RequirementKey::PlacementStart],
        Phase::Complete => &[RequirementKey::PlacementCompleted],
    }
}

/// Resolves the requirements for entering `target` from `plan`'s evidence.
///
/// Pure: the same inputs always yield an equal list. `None` (no target,
/// i.e. the plan is terminal) yields an empty list.
#[must_use]
pub fn requirements_for(target: Option<Phase>, plan: &Plan) -> Vec<Requirement> {
    let Some(target) = target else {
        return Vec::new();
    };
    rules_for(target)
        .iter()
        .map(|&key| Requirement {
            key,
            label: key.label(),
            satisfied: key.is_met(plan),
            action_hint: key.action_hint(),
        })
        .collect()
}
