//! Breeding-plan lifecycle
//!
//! Eight sequential phases, each entered only when the plan carries the
//! evidence its requirements demand.
//!
//! # Architecture
//!
//! - [`registry`]: the ordered phase list and lenient status lookup
//! - [`requirements`]: the rule table from target phase to requirements
//! - [`guard`]: folds requirements into a single verdict
//! - [`confirm`]: the injected human confirmation gate
//! - [`engine`]: the advancement command tying them to a [`PlanStore`](crate::store::PlanStore)

pub mod confirm;
pub mod engine;
pub mod guard;
pub mod registry;
pub mod requirements;

pub use confirm::{AlwaysConfirm, ConfirmContext, ConfirmGate, FnGate, NeverConfirm, confirmation_for};
pub use engine::{LifecycleEngine, TransitionOutcome};
pub use guard::{Checklist, can_advance};
pub use registry::{PHASES, Phase, is_recognized, next_phase, phase_index, resolve_phase};
pub use requirements::{Requirement, RequirementKey, requirements_for, rules_for};
