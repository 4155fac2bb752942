//! Integration tests for the optimistic mutation controller: the
//! snapshot / apply / publish / commit-or-rollback protocol against an
//! in-process endpoint.

mod test_harness;

use std::sync::Arc;
use std::time::Duration;

use talentflow::client::MutationController;
use talentflow::config::{FaultPolicy, OpClass};
use talentflow::error::TalentError;
use talentflow::model::{CandidatePatch, JobPatch, JobStatus, QuestionSpec, Stage};
use talentflow::ordering::is_dense;
use talentflow::query::{page_jobs, JobQuery};

use test_harness::{
    controller_with_jobs, failing_endpoint, reliable_endpoint, seeded_store, slow_endpoint,
    store_with_jobs,
};

#[tokio::test]
async fn test_successful_move_adopts_server_value() {
    let (controller, store) = controller_with_jobs(5).await;

    let jobs = controller.move_job(1, 3).await.unwrap();
    assert!(is_dense(&jobs));

    // The published view and the authoritative store agree.
    let view = controller.view();
    let view = view.read().await;
    assert_eq!(view.jobs, jobs);
    assert_eq!(store.read().await.jobs(), jobs);
}

#[tokio::test]
async fn test_failed_move_rolls_back_bit_for_bit() {
    let store = store_with_jobs(5);
    let controller = MutationController::new(failing_endpoint(store.clone()));
    // Load the view directly; the endpoint only fails mutations.
    controller.refresh_jobs().await.unwrap();

    let before = controller.view().read().await.clone();
    let err = controller.move_job(1, 3).await.unwrap_err();
    assert_eq!(err, TalentError::TransientFailure);

    let after = controller.view().read().await.clone();
    assert_eq!(after, before, "rollback must restore the exact snapshot");
    // The store was never touched either.
    assert!(is_dense(&store.read().await.jobs()));
}

#[tokio::test]
async fn test_server_value_wins_over_optimistic_guess() {
    let (controller, store) = controller_with_jobs(5).await;

    // An out-of-band change the client has not observed.
    {
        let mut store = store.write().await;
        let mut jobs = store.jobs();
        jobs[4].status = JobStatus::Archived;
        store.replace_jobs(jobs);
    }

    // The optimistic guess is computed from the stale view, but the commit
    // adopts the server's payload, which includes the archive.
    let jobs = controller.move_job(0, 2).await.unwrap();
    let archived = jobs.iter().find(|j| j.id == 5).unwrap();
    assert_eq!(archived.status, JobStatus::Archived);
    assert_eq!(controller.view().read().await.jobs, jobs);
}

#[tokio::test]
async fn test_move_out_of_range_source_is_invalid() {
    let (controller, _store) = controller_with_jobs(4).await;

    let before = controller.view().read().await.clone();
    let err = controller.move_job(9, 0).await.unwrap_err();
    assert_eq!(err, TalentError::InvalidMove { from_order: 9 });
    assert_eq!(*controller.view().read().await, before);
}

#[tokio::test]
async fn test_move_target_is_clamped() {
    let (controller, _store) = controller_with_jobs(4).await;

    // Target beyond the last rank clamps to N-1.
    let jobs = controller.move_job(0, 99).await.unwrap();
    assert_eq!(jobs.iter().find(|j| j.id == 1).unwrap().order, 3);
    assert!(is_dense(&jobs));
}

#[tokio::test]
async fn test_clamped_noop_skips_the_remote_call() {
    let store = store_with_jobs(3);
    // Even a failing endpoint cannot break a no-op: it is never called.
    let controller = MutationController::new(failing_endpoint(store));
    controller.refresh_jobs().await.unwrap();

    let jobs = controller.move_job(2, 5).await.unwrap();
    assert!(is_dense(&jobs));
}

#[tokio::test]
async fn test_create_job_swaps_guess_for_server_record() {
    let (controller, store) = controller_with_jobs(3).await;

    let created = controller
        .create_job("Staff Engineer".to_string(), vec!["senior".to_string()])
        .await
        .unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.order, 3);

    let view = controller.view();
    let view = view.read().await;
    assert_eq!(view.jobs.len(), 4);
    assert_eq!(view.job(4).unwrap().title, "Staff Engineer");
    assert_eq!(store.read().await.jobs(), view.jobs);
}

#[tokio::test]
async fn test_failed_create_leaves_no_phantom_job() {
    let store = store_with_jobs(3);
    let controller = MutationController::new(failing_endpoint(store));
    controller.refresh_jobs().await.unwrap();

    let before = controller.view().read().await.clone();
    controller
        .create_job("Ghost".to_string(), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(*controller.view().read().await, before);
}

#[tokio::test]
async fn test_patch_job_is_optimistic_and_idempotent() {
    let (controller, _store) = controller_with_jobs(3).await;

    let patch = JobPatch::status(JobStatus::Archived);
    let first = controller.patch_job(2, patch.clone()).await.unwrap();
    let second = controller.patch_job(2, patch).await.unwrap();
    assert_eq!(first, second, "re-issuing a patch is last-write-wins safe");
    assert_eq!(
        controller.view().read().await.job(2).unwrap().status,
        JobStatus::Archived
    );
}

#[tokio::test]
async fn test_toggle_archive_flips_status_both_ways() {
    let (controller, store) = controller_with_jobs(3).await;

    let archived = controller.toggle_archive(2).await.unwrap();
    assert_eq!(archived.status, JobStatus::Archived);
    assert_eq!(
        store.read().await.job(2).unwrap().status,
        JobStatus::Archived
    );

    let restored = controller.toggle_archive(2).await.unwrap();
    assert_eq!(restored.status, JobStatus::Active);

    assert!(matches!(
        controller.toggle_archive(99).await,
        Err(TalentError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_patch_absent_job_fails_synchronously() {
    let (controller, _store) = controller_with_jobs(2).await;

    let err = controller
        .patch_job(99, JobPatch::status(JobStatus::Archived))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TalentError::NotFound {
            collection: "job",
            id: 99
        }
    );
}

#[tokio::test]
async fn test_stage_transition_and_rollback() {
    let store = seeded_store(0, 5);
    let controller = MutationController::new(reliable_endpoint(store.clone()));
    controller.refresh_candidates().await.unwrap();
    let id = controller.view().read().await.candidates[0].id;

    let moved = controller.set_candidate_stage(id, Stage::Offer).await.unwrap();
    assert_eq!(moved.stage, Stage::Offer);

    // Same transition through a failing endpoint rolls back.
    let failing = MutationController::new(failing_endpoint(store));
    failing.refresh_candidates().await.unwrap();
    let before = failing.view().read().await.clone();
    failing
        .set_candidate_stage(id, Stage::Rejected)
        .await
        .unwrap_err();
    assert_eq!(*failing.view().read().await, before);
}

#[tokio::test]
async fn test_add_candidate_note_appends() {
    let store = seeded_store(0, 3);
    let controller = MutationController::new(reliable_endpoint(store));
    controller.refresh_candidates().await.unwrap();
    let id = controller.view().read().await.candidates[0].id;

    controller
        .add_candidate_note(id, "great phone screen".to_string())
        .await
        .unwrap();
    let updated = controller
        .add_candidate_note(id, "take-home sent".to_string())
        .await
        .unwrap();

    assert_eq!(updated.notes.len(), 2);
    assert_eq!(updated.notes[1].body, "take-home sent");
}

#[tokio::test]
async fn test_candidate_patch_rolls_back_on_failure() {
    let store = seeded_store(0, 4);
    let controller = MutationController::new(failing_endpoint(store));
    controller.refresh_candidates().await.unwrap();
    let id = controller.view().read().await.candidates[2].id;

    let before = controller.view().read().await.clone();
    controller
        .patch_candidate(
            id,
            CandidatePatch {
                email: Some("new@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(*controller.view().read().await, before);
}

#[tokio::test]
async fn test_save_assessment_round_trip() {
    let (controller, _store) = controller_with_jobs(2).await;

    let questions = vec![
        QuestionSpec::text("Why this role?"),
        QuestionSpec::text("Notice period?"),
    ];
    let stored = controller.save_assessment(1, questions.clone()).await.unwrap();
    assert_eq!(stored.questions, questions);

    let loaded = controller.load_assessment(1).await.unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert!(controller.load_assessment(2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_assessment_save_restores_previous_form() {
    let store = store_with_jobs(1);
    let reliable = MutationController::new(reliable_endpoint(store.clone()));
    reliable
        .save_assessment(1, vec![QuestionSpec::text("Original")])
        .await
        .unwrap();

    let failing = MutationController::new(failing_endpoint(store));
    failing.load_assessment(1).await.unwrap();
    let before = failing.view().read().await.clone();

    failing
        .save_assessment(1, vec![QuestionSpec::text("Replacement")])
        .await
        .unwrap_err();
    assert_eq!(*failing.view().read().await, before);
    assert_eq!(
        failing.view().read().await.assessments[&1].questions[0].label,
        "Original"
    );
}

#[tokio::test]
async fn test_concurrent_same_collection_moves_are_serialized() {
    let (controller, store) = controller_with_jobs(6).await;
    let controller = Arc::new(controller);

    let a = {
        let c = controller.clone();
        tokio::spawn(async move { c.move_job(0, 4).await })
    };
    let b = {
        let c = controller.clone();
        tokio::spawn(async move { c.move_job(5, 1).await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Both moves applied without corrupting the permutation, and the view
    // converged on the store.
    let jobs = store.read().await.jobs();
    assert!(is_dense(&jobs));
    assert_eq!(controller.view().read().await.jobs, jobs);
}

#[tokio::test]
async fn test_failed_move_preserves_overlapping_candidate_refresh() {
    let store = seeded_store(6, 8);
    let remote = slow_endpoint(
        store.clone(),
        Duration::from_millis(50),
        FaultPolicy::always(vec![OpClass::Move]),
    );
    let controller = Arc::new(MutationController::new(remote));
    controller.refresh_jobs().await.unwrap();
    let before = controller.view().read().await.jobs.clone();

    // The refresh commits while the doomed move is still in flight; the
    // move's later rollback must leave that result alone.
    let refresh = {
        let c = controller.clone();
        tokio::spawn(async move { c.refresh_candidates().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let moved = controller.move_job(0, 3).await;
    assert!(matches!(moved, Err(TalentError::TransientFailure)));

    let refreshed = refresh.await.unwrap().unwrap();
    assert_eq!(refreshed.len(), 8);

    let view = controller.view();
    let view = view.read().await;
    assert_eq!(view.candidates, refreshed);
    assert_eq!(view.jobs, before);
}

#[tokio::test]
async fn test_view_paginates_consistently_after_moves() {
    let (controller, _store) = controller_with_jobs(12).await;
    controller.move_job(0, 11).await.unwrap();
    controller.move_job(5, 2).await.unwrap();

    let view = controller.view();
    let view = view.read().await;
    let page = page_jobs(&view.jobs, &JobQuery::page(3, 5));
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 12);
}
