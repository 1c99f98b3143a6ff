//! Advancement orchestration
//!
//! The `LifecycleEngine` moves a plan one phase forward: it re-validates
//! requirements against the snapshot it is given, consults the confirmation
//! gate, and asks the store to commit. Every result is a
//! [`TransitionOutcome`] value; nothing here mutates a snapshot in place.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{BreedlineError, ExitCode, StoreError};
use crate::observability::metrics::{self, OutcomeLabel};
use crate::observability::{Event, EventEmitter};
use crate::plan::{EvidenceField, EvidenceValue, Plan, PlanId, clear_evidence, set_evidence};
use crate::store::{CommitRequest, PlanStore};

use super::confirm::{ConfirmGate, confirmation_for};
use super::registry::Phase;
use super::requirements::{Requirement, requirements_for};

/// Result of an advancement attempt.
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The store committed the transition; carries the new snapshot.
    Advanced(Plan),
    /// Requirements are unmet. Empty when the plan is already COMPLETE.
    Blocked(Vec<Requirement>),
    /// The confirmation gate refused. Nothing was written.
    Declined,
    /// The snapshot was stale; reload and retry.
    Conflict {
        plan_id: PlanId,
        expected_version: u64,
    },
    /// The store failed to persist the commit.
    PersistenceFailure(StoreError),
}

impl TransitionOutcome {
    /// Returns `true` for [`TransitionOutcome::Advanced`].
    #[must_use]
    pub const fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced(_))
    }

    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Advanced(_) => ExitCode::SUCCESS,
            Self::Blocked(_) => ExitCode::BLOCKED,
            Self::Declined => ExitCode::DECLINED,
            Self::Conflict { .. } => ExitCode::CONFLICT,
            Self::PersistenceFailure(_) => ExitCode::PERSISTENCE_FAILURE,
        }
    }

    const fn label(&self) -> OutcomeLabel {
        match self {
            Self::Advanced(_) => OutcomeLabel::Advanced,
            Self::Blocked(_) => OutcomeLabel::Blocked,
            Self::Declined => OutcomeLabel::Declined,
            Self::Conflict { .. } => OutcomeLabel::Conflict,
            Self::PersistenceFailure(_) => OutcomeLabel::PersistenceFailure,
        }
    }
}

/// Lifecycle engine bound to a plan store.
///
/// Cheap to clone; clones share the store and the event emitter.
#[derive(Debug)]
pub struct LifecycleEngine<S: PlanStore> {
    store: Arc<S>,
    events: Arc<EventEmitter>,
}

impl<S: PlanStore> Clone for LifecycleEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            events: Arc::clone(&self.events),
        }
    }
}

impl<S: PlanStore> LifecycleEngine<S> {
    /// Creates an engine that discards lifecycle events.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_events(store, Arc::new(EventEmitter::noop()))
    }

    /// Creates an engine emitting lifecycle events to `events`.
    #[must_use]
    pub const fn with_events(store: Arc<S>, events: Arc<EventEmitter>) -> Self {
        Self { store, events }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the current snapshot of a plan.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the plan cannot be read.
    pub async fn load(&self, id: &PlanId) -> Result<Plan, StoreError> {
        let plan = self.store.load_plan(id).await?;
        self.events.emit(Event::PlanLoaded {
            timestamp: Utc::now(),
            plan_id: plan.id.clone(),
            phase: plan.phase(),
            version: plan.version,
        });
        Ok(plan)
    }

    /// Advances `plan` to its next phase.
    ///
    /// Requirements are recomputed from `plan` itself; no cached verdict is
    /// trusted. When the transition needs confirmation and `gate` is `None`,
    /// the engine proceeds without asking.
    pub async fn advance(&self, plan: &Plan, gate: Option<&dyn ConfirmGate>) -> TransitionOutcome {
        let started = Instant::now();
        let from = plan.phase();
        let target = plan.next_phase();

        let outcome = self.run_advance(plan, from, target, gate).await;

        metrics::record_transition(outcome.label(), from, target);
        metrics::record_advance_duration(started.elapsed());
        outcome
    }

    /// Loads the latest snapshot for `id` and advances it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the plan cannot be loaded. Failures after
    /// loading are reported through the outcome.
    pub async fn advance_by_id(
        &self,
        id: &PlanId,
        gate: Option<&dyn ConfirmGate>,
    ) -> Result<TransitionOutcome, StoreError> {
        let plan = self.load(id).await?;
        Ok(self.advance(&plan, gate).await)
    }

    /// Sets or clears one evidence field and saves the result.
    ///
    /// `None` clears the field. Status is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`BreedlineError::Evidence`] for a value of the wrong kind and
    /// [`BreedlineError::Store`] if the save fails.
    pub async fn edit_evidence(
        &self,
        plan: &Plan,
        field: EvidenceField,
        value: Option<EvidenceValue>,
    ) -> Result<Plan, BreedlineError> {
        let edited = match value {
            Some(value) => set_evidence(plan, field, value)?,
            None => clear_evidence(plan, field),
        };
        let saved = self.store.save_plan(&edited).await?;
        debug!(plan_id = %saved.id, %field, cleared = value.is_none(), "evidence saved");
        self.events.emit(Event::EvidenceChanged {
            timestamp: Utc::now(),
            plan_id: saved.id.clone(),
            field: field.name(),
            cleared: value.is_none(),
        });
        Ok(saved)
    }

    async fn run_advance(
        &self,
        plan: &Plan,
        from: Phase,
        target: Option<Phase>,
        gate: Option<&dyn ConfirmGate>,
    ) -> TransitionOutcome {
        let Some(to) = target else {
            debug!(plan_id = %plan.id, "plan is terminal");
            self.emit_blocked(plan, from, None, &[]);
            return TransitionOutcome::Blocked(Vec::new());
        };

        let unmet: Vec<Requirement> = requirements_for(Some(to), plan)
            .into_iter()
            .filter(|r| !r.satisfied)
            .collect();
        metrics::record_requirement_check(Some(to), unmet.len());
        debug!(plan_id = %plan.id, %from, %to, unmet = unmet.len(), "requirements re-validated");

        if !unmet.is_empty() {
            self.emit_blocked(plan, from, Some(to), &unmet);
            return TransitionOutcome::Blocked(unmet);
        }

        if let Some(context) = confirmation_for(from, to) {
            match gate {
                Some(gate) => {
                    if !gate.confirm(&context).await {
                        info!(plan_id = %plan.id, %from, %to, "transition declined");
                        self.events.emit(Event::TransitionDeclined {
                            timestamp: Utc::now(),
                            plan_id: plan.id.clone(),
                            from,
                            to,
                        });
                        return TransitionOutcome::Declined;
                    }
                }
                None => debug!(plan_id = %plan.id, %from, %to, "no confirmation gate supplied"),
            }
        }

        match self
            .store
            .commit_transition(CommitRequest::for_snapshot(plan, to))
            .await
        {
            Ok(committed) => {
                info!(plan_id = %committed.id, %from, %to, version = committed.version, "phase advanced");
                self.events.emit(Event::PhaseAdvanced {
                    timestamp: Utc::now(),
                    plan_id: committed.id.clone(),
                    from,
                    to,
                    version: committed.version,
                });
                TransitionOutcome::Advanced(committed)
            }
            Err(StoreError::Conflict { .. } | StoreError::StaleEdge { .. }) => {
                warn!(plan_id = %plan.id, version = plan.version, "plan changed since it was loaded");
                self.events.emit(Event::TransitionConflict {
                    timestamp: Utc::now(),
                    plan_id: plan.id.clone(),
                    expected_version: plan.version,
                });
                TransitionOutcome::Conflict {
                    plan_id: plan.id.clone(),
                    expected_version: plan.version,
                }
            }
            Err(e) => {
                warn!(plan_id = %plan.id, error = %e, "failed to persist transition");
                self.events.emit(Event::PersistenceFailed {
                    timestamp: Utc::now(),
                    plan_id: plan.id.clone(),
                    error: e.to_string(),
                });
                TransitionOutcome::PersistenceFailure(e)
            }
        }
    }

    fn emit_blocked(&self, plan: &Plan, from: Phase, to: Option<Phase>, unmet: &[Requirement]) {
        info!(plan_id = %plan.id, %from, unmet = unmet.len(), "transition blocked");
        self.events.emit(Event::TransitionBlocked {
            timestamp: Utc::now(),
            plan_id: plan.id.clone(),
            from,
            to,
            unmet: unmet.iter().map(|r| r.key.as_str().to_string()).collect(),
        });
    }
}
