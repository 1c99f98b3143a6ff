//! In-memory plan store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::StoreError;
use crate::plan::{Plan, PlanId};

use super::{CommitRequest, PlanStore, apply_commit, apply_save, check_id, prepare_new};

/// A [`PlanStore`] backed by a concurrent map.
///
/// Each commit runs under the map's per-shard write lock, so the version
/// check and the write happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    plans: DashMap<PlanId, Plan>,
}

impl InMemoryPlanStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a snapshot exactly as given, bypassing lifecycle resets.
    ///
    /// For fixtures and imports of plans that already have history.
    pub fn insert(&self, plan: Plan) {
        self.plans.insert(plan.id.clone(), plan);
    }

    /// Number of stored plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn load_plan(&self, id: &PlanId) -> Result<Plan, StoreError> {
        self.plans
            .get(id)
            .map(|p| p.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create_plan(&self, plan: Plan) -> Result<Plan, StoreError> {
        check_id(&plan.id)?;
        match self.plans.entry(plan.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(plan.id)),
            Entry::Vacant(slot) => {
                let fresh = prepare_new(plan);
                slot.insert(fresh.clone());
                Ok(fresh)
            }
        }
    }

    async fn commit_transition(&self, request: CommitRequest) -> Result<Plan, StoreError> {
        let mut stored = self
            .plans
            .get_mut(&request.plan_id)
            .ok_or_else(|| StoreError::NotFound(request.plan_id.clone()))?;
        let next = apply_commit(&stored, &request)?;
        debug!(plan_id = %request.plan_id, version = next.version, "transition stored");
        *stored = next.clone();
        Ok(next)
    }

    async fn save_plan(&self, plan: &Plan) -> Result<Plan, StoreError> {
        let mut stored = self
            .plans
            .get_mut(&plan.id)
            .ok_or_else(|| StoreError::NotFound(plan.id.clone()))?;
        let next = apply_save(&stored, plan)?;
        *stored = next.clone();
        Ok(next)
    }
}
