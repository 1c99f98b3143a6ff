//! Behavior every `PlanStore` must share, run against each implementation.

mod common;

use std::sync::Arc;

use breedline::error::StoreError;
use breedline::phase::{LifecycleEngine, Phase, TransitionOutcome};
use breedline::plan::{Plan, PlanId};
use breedline::store::{CommitRequest, InMemoryPlanStore, PlanStore, YamlDirStore};

use common::{date, ready_to_commit};

async fn create_resets_lifecycle<S: PlanStore>(store: &S) {
    let draft = ready_to_commit("reset").at_phase(Phase::Weaned);
    let created = store.create_plan(draft).await.unwrap();
    assert_eq!(created.phase(), Phase::Planning);
    assert_eq!(created.version, 0);

    let err = store.create_plan(ready_to_commit("reset")).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

async fn stale_commit_conflicts<S: PlanStore>(store: &S) {
    let snapshot = store.create_plan(ready_to_commit("stale")).await.unwrap();
    store
        .save_plan(&snapshot.clone().with_name("edited elsewhere"))
        .await
        .unwrap();

    let err = store
        .commit_transition(CommitRequest::for_snapshot(&snapshot, Phase::Committed))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Conflict {
            expected_version: 0,
            found_version: 1,
            ..
        }
    ));
}

async fn replayed_commit_is_idempotent<S: PlanStore>(store: &S) {
    let snapshot = store.create_plan(ready_to_commit("replay")).await.unwrap();
    let request = CommitRequest::for_snapshot(&snapshot, Phase::Committed);

    let first = store.commit_transition(request.clone()).await.unwrap();
    let second = store.commit_transition(request).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.load_plan(&snapshot.id).await.unwrap().version, 1);
}

async fn stale_snapshot_on_same_edge_conflicts<S: PlanStore>(store: Arc<S>) {
    let created = store.create_plan(ready_to_commit("same-edge")).await.unwrap();
    let committed = store
        .commit_transition(CommitRequest::for_snapshot(&created, Phase::Committed))
        .await
        .unwrap();
    let engine = LifecycleEngine::new(Arc::clone(&store));

    // Two editors load the same COMMITTED snapshot.
    let mut first = committed.clone();
    first.evidence.cycle_start.actual = date(2025, 3, 1);
    let mut second = committed;
    second.evidence.cycle_start.actual = date(2025, 4, 15);

    let TransitionOutcome::Advanced(bred) = engine.advance(&first, None).await else {
        panic!("first advance should commit");
    };

    let outcome = engine.advance(&second, None).await;
    assert!(
        matches!(outcome, TransitionOutcome::Conflict { expected_version: 1, .. }),
        "got {outcome:?}"
    );

    // Still a conflict once later edits have moved the version further.
    let mut later = bred.clone();
    later.evidence.breed.expected = date(2025, 3, 20);
    store.save_plan(&later).await.unwrap();
    let err = store
        .commit_transition(CommitRequest::for_snapshot(&second, Phase::Bred))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Conflict {
            expected_version: 1,
            found_version: 3,
            ..
        }
    ));

    let stored = store.load_plan(&bred.id).await.unwrap();
    assert_eq!(stored.evidence.cycle_start.actual, date(2025, 3, 1));
}

async fn save_cannot_move_phase<S: PlanStore>(store: &S) {
    let snapshot = store.create_plan(ready_to_commit("sneaky")).await.unwrap();
    let err = store
        .save_plan(&snapshot.at_phase(Phase::Complete))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PhaseChangeRejected(_)));
}

async fn commit_carries_evidence<S: PlanStore>(store: &S) {
    let mut snapshot = store.create_plan(ready_to_commit("carry")).await.unwrap();
    snapshot.evidence.breed.expected = date(2025, 4, 2);

    let committed = store
        .commit_transition(CommitRequest::for_snapshot(&snapshot, Phase::Committed))
        .await
        .unwrap();
    assert_eq!(committed.evidence.breed.expected, date(2025, 4, 2));
}

async fn missing_plan_is_not_found<S: PlanStore>(store: &S) {
    let err = store.load_plan(&PlanId::new("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

async fn two_engines_race_one_advances<S: PlanStore>(store: Arc<S>) {
    let snapshot = store.create_plan(ready_to_commit("race")).await.unwrap();
    let engine = LifecycleEngine::new(Arc::clone(&store));

    // A second editor saves first; the advance from the older snapshot loses.
    let mut other = snapshot.clone();
    other.evidence.cycle_start.expected = date(2025, 5, 1);
    store.save_plan(&other).await.unwrap();

    let outcome = engine.advance(&snapshot, None).await;
    assert!(matches!(
        outcome,
        TransitionOutcome::Conflict {
            expected_version: 0,
            ..
        }
    ));

    let fresh = engine.load(&snapshot.id).await.unwrap();
    assert!(engine.advance(&fresh, None).await.is_advanced());
}

async fn run_suite<S: PlanStore>(store: Arc<S>) {
    create_resets_lifecycle(store.as_ref()).await;
    stale_commit_conflicts(store.as_ref()).await;
    replayed_commit_is_idempotent(store.as_ref()).await;
    stale_snapshot_on_same_edge_conflicts(Arc::clone(&store)).await;
    save_cannot_move_phase(store.as_ref()).await;
    commit_carries_evidence(store.as_ref()).await;
    missing_plan_is_not_found(store.as_ref()).await;
    two_engines_race_one_advances(store).await;
}

#[tokio::test]
async fn in_memory_store_conformance() {
    run_suite(Arc::new(InMemoryPlanStore::new())).await;
}

#[tokio::test]
async fn yaml_dir_store_conformance() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlDirStore::open(dir.path()).await.unwrap();
    run_suite(Arc::new(store)).await;
}

#[tokio::test]
async fn yaml_dir_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let plan: Plan = {
        let store = YamlDirStore::open(dir.path()).await.unwrap();
        let created = store.create_plan(ready_to_commit("durable")).await.unwrap();
        store
            .commit_transition(CommitRequest::for_snapshot(&created, Phase::Committed))
            .await
            .unwrap()
    };

    let reopened = YamlDirStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.load_plan(&plan.id).await.unwrap(), plan);
    assert_eq!(reopened.list().await.unwrap(), vec![plan.id]);
}
