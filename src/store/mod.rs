//! Plan persistence
//!
//! The engine never owns a plan between operations. A [`PlanStore`] hands
//! out snapshots and commits transitions against them, detecting concurrent
//! modification with a version compare.

pub mod memory;
pub mod yaml_dir;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::phase::Phase;
use crate::plan::{Evidence, Plan, PlanId, TransitionEdge};

pub use memory::InMemoryPlanStore;
pub use yaml_dir::YamlDirStore;

/// A request to move a plan along one edge of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub plan_id: PlanId,
    /// Version of the snapshot the caller validated against.
    pub expected_version: u64,
    pub from: Phase,
    pub to: Phase,
    /// Evidence to store alongside the phase change, replacing the stored
    /// evidence when present.
    pub evidence_patch: Option<Evidence>,
}

impl CommitRequest {
    /// Builds a commit for `plan`'s next edge, carrying its evidence.
    #[must_use]
    pub fn for_snapshot(plan: &Plan, to: Phase) -> Self {
        Self {
            plan_id: plan.id.clone(),
            expected_version: plan.version,
            from: plan.phase(),
            to,
            evidence_patch: Some(plan.evidence.clone()),
        }
    }

    #[must_use]
    pub const fn edge(&self) -> TransitionEdge {
        TransitionEdge {
            from: self.from,
            to: self.to,
        }
    }
}

/// Storage for plan snapshots.
///
/// ## Concurrency
///
/// `commit_transition` and `save_plan` compare the caller's version with the
/// stored one and return [`StoreError::Conflict`] on mismatch rather than
/// overwriting. A successful write bumps the version by one.
///
/// ## Idempotency
///
/// Commits are keyed by `(plan_id, from, to)`. Replaying the commit the store
/// applied last (the plan sits at `to`, its last edge is `from -> to`, the
/// request's version is one behind, and its evidence matches) returns the
/// current snapshot instead of failing, so a caller that lost the response
/// can retry safely. Any other request on that edge is a [`StoreError::Conflict`].
#[async_trait]
pub trait PlanStore: Send + Sync + 'static {
    /// Loads the current snapshot of a plan.
    async fn load_plan(&self, id: &PlanId) -> Result<Plan, StoreError>;

    /// Stores a new plan. The store resets it to PLANNING at version 0.
    async fn create_plan(&self, plan: Plan) -> Result<Plan, StoreError>;

    /// Commits a phase transition and returns the new snapshot.
    async fn commit_transition(&self, request: CommitRequest) -> Result<Plan, StoreError>;

    /// Persists evidence or descriptive edits. Rejects any status change.
    async fn save_plan(&self, plan: &Plan) -> Result<Plan, StoreError>;
}

/// Resets a draft to the state a freshly created plan must have.
pub(crate) fn prepare_new(mut plan: Plan) -> Plan {
    plan.version = 0;
    plan.status = Some(Phase::Planning.as_str().to_string());
    plan.last_transition = None;
    plan
}

/// Applies a commit to the stored snapshot, enforcing version and edge checks.
pub(crate) fn apply_commit(current: &Plan, request: &CommitRequest) -> Result<Plan, StoreError> {
    let edge = request.edge();
    if is_replay(current, request) {
        return Ok(current.clone());
    }

    if current.version != request.expected_version {
        return Err(StoreError::Conflict {
            plan_id: current.id.clone(),
            expected_version: request.expected_version,
            found_version: current.version,
        });
    }

    if current.phase() != request.from || request.from.next() != Some(request.to) {
        return Err(StoreError::StaleEdge {
            plan_id: current.id.clone(),
            stored: current.phase(),
            from: request.from,
            to: request.to,
        });
    }

    let mut next = current.at_phase(request.to);
    if let Some(evidence) = &request.evidence_patch {
        next.evidence = evidence.clone();
    }
    next.version = current.version + 1;
    next.last_transition = Some(edge);
    Ok(next)
}

/// True when `request` is the commit that produced `current`.
///
/// Only the immediately preceding write counts, and only when it stored the
/// same evidence; any other request on the same edge is stale.
fn is_replay(current: &Plan, request: &CommitRequest) -> bool {
    current.phase() == request.to
        && current.last_transition == Some(request.edge())
        && request.expected_version.checked_add(1) == Some(current.version)
        && request
            .evidence_patch
            .as_ref()
            .is_none_or(|evidence| *evidence == current.evidence)
}

/// Applies a non-transition edit to the stored snapshot.
pub(crate) fn apply_save(current: &Plan, edited: &Plan) -> Result<Plan, StoreError> {
    if current.version != edited.version {
        return Err(StoreError::Conflict {
            plan_id: current.id.clone(),
            expected_version: edited.version,
            found_version: current.version,
        });
    }
    if current.status != edited.status {
        return Err(StoreError::PhaseChangeRejected(current.id.clone()));
    }

    let mut next = edited.clone();
    next.version = current.version + 1;
    next.last_transition = current.last_transition;
    Ok(next)
}

/// Rejects ids that are empty or could escape a storage directory.
pub(crate) fn check_id(id: &PlanId) -> Result<(), StoreError> {
    let s = id.as_str();
    let valid = !s.trim().is_empty()
        && s != "."
        && s != ".."
        && !s.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(s.to_string()))
    }
}
