//! Breeding plan aggregate and the evidence editor.

pub mod evidence;
pub mod model;

pub use evidence::{EvidenceField, EvidenceValue, clear_evidence, set_evidence};
pub use model::{
    AnimalRef, Evidence, MILESTONES, Milestone, MilestoneKind, Plan, PlanId, TransitionEdge,
};
