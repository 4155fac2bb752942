//! The optimistic mutation controller.
//!
//! Every mutating action follows the same protocol: snapshot the
//! collection it targets, apply the change locally, publish it
//! immediately, then issue the remote
//! call. Success adopts the server's authoritative payload (the server
//! wins over the local guess on any divergence); any failure restores the
//! snapshot verbatim and surfaces the error. There is no automatic retry.
//!
//! Overlapping mutations against the same collection would compute their
//! optimistic guesses against each other's unconfirmed state, so each
//! collection has an async gate held across the remote await. Mutations
//! against different collections may still overlap and resolve out of
//! order; each snapshots and rolls back only the collection it touches,
//! so a late failure cannot disturb what the others have committed.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::error::{Result, TalentError};
use crate::model::{
    Assessment, Candidate, CandidatePatch, Job, JobPatch, Note, QuestionSpec,
};
use crate::ordering;
use crate::remote::RemoteEndpoint;

use super::view::{self, ClientView};

pub struct MutationController {
    view: Arc<RwLock<ClientView>>,
    remote: RemoteEndpoint,
    jobs_gate: Mutex<()>,
    candidates_gate: Mutex<()>,
    assessments_gate: Mutex<()>,
}

impl MutationController {
    pub fn new(remote: RemoteEndpoint) -> Self {
        Self {
            view: Arc::new(RwLock::new(ClientView::new())),
            remote,
            jobs_gate: Mutex::new(()),
            candidates_gate: Mutex::new(()),
            assessments_gate: Mutex::new(()),
        }
    }

    /// Shared handle to the local view. Observers read through this and
    /// see optimistic state the moment it is published.
    pub fn view(&self) -> Arc<RwLock<ClientView>> {
        self.view.clone()
    }

    /// Run one optimistic mutation against a single collection: apply
    /// locally (publishing before any remote suspension), await the remote
    /// call, then either commit the authoritative value or roll back to
    /// the snapshot.
    ///
    /// `scope` selects the one collection the mutation touches; the
    /// snapshot covers only that collection, so a late rollback cannot
    /// disturb what overlapping operations on the others have committed.
    ///
    /// Callers hold the relevant collection gate before invoking this.
    async fn mutate<S, T, A, C>(
        &self,
        scope: fn(&mut ClientView) -> &mut S,
        apply: A,
        remote: impl Future<Output = Result<T>>,
        commit: C,
    ) -> Result<T>
    where
        S: Clone,
        A: FnOnce(&mut S) -> Result<()>,
        C: FnOnce(&mut S, &T),
    {
        let snapshot = {
            let mut view = self.view.write().await;
            let target = scope(&mut view);
            let snapshot = target.clone();
            if let Err(err) = apply(&mut *target) {
                // Local validation failed before anything was published.
                *target = snapshot;
                return Err(err);
            }
            snapshot
        };

        match remote.await {
            Ok(value) => {
                let mut view = self.view.write().await;
                commit(scope(&mut view), &value);
                Ok(value)
            }
            Err(err) => {
                let mut view = self.view.write().await;
                *scope(&mut view) = snapshot;
                tracing::warn!(error = %err, "Mutation failed, collection rolled back");
                Err(err)
            }
        }
    }

    // --- Jobs -------------------------------------------------------------

    /// Reload the jobs collection from the server.
    pub async fn refresh_jobs(&self) -> Result<Vec<Job>> {
        let _gate = self.jobs_gate.lock().await;
        let jobs = self.remote.fetch_jobs().await?;
        self.view.write().await.jobs = jobs.clone();
        Ok(jobs)
    }

    /// Create a job. The local guess uses a provisional id and the tail
    /// rank; the committed view swaps it for the server-assigned record.
    pub async fn create_job(&self, title: String, tags: Vec<String>) -> Result<Job> {
        let _gate = self.jobs_gate.lock().await;

        if title.trim().is_empty() {
            return Err(TalentError::Validation("job title is required".into()));
        }

        let provisional_id = {
            let view = self.view.read().await;
            view.jobs.iter().map(|j| j.id).max().map_or(1, |max| max + 1)
        };
        let title_for_guess = title.clone();
        let tags_for_guess = tags.clone();

        self.mutate(
            |view| &mut view.jobs,
            |jobs| {
                let guess = Job {
                    tags: tags_for_guess,
                    ..Job::new(provisional_id, title_for_guess, jobs.len() as u32)
                };
                jobs.push(guess);
                Ok(())
            },
            self.remote.create_job(title, tags),
            |jobs, created| {
                jobs.retain(|j| j.id != provisional_id);
                view::put_job(jobs, created.clone());
            },
        )
        .await
    }

    /// Patch a job's attributes. Raises `NotFound` synchronously when the
    /// id is not in the local view.
    pub async fn patch_job(&self, id: u32, patch: JobPatch) -> Result<Job> {
        let _gate = self.jobs_gate.lock().await;

        self.patch_job_gated(id, patch).await
    }

    /// Flip a job between active and archived.
    pub async fn toggle_archive(&self, id: u32) -> Result<Job> {
        let _gate = self.jobs_gate.lock().await;

        let status = {
            let view = self.view.read().await;
            let job = view.job(id).ok_or(TalentError::not_found("job", id))?;
            if job.is_active() {
                crate::model::JobStatus::Archived
            } else {
                crate::model::JobStatus::Active
            }
        };
        self.patch_job_gated(id, JobPatch::status(status)).await
    }

    /// Body of a job patch; the caller holds the jobs gate.
    async fn patch_job_gated(&self, id: u32, patch: JobPatch) -> Result<Job> {
        self.mutate(
            |view| &mut view.jobs,
            |jobs| {
                let job = jobs
                    .iter_mut()
                    .find(|j| j.id == id)
                    .ok_or(TalentError::not_found("job", id))?;
                patch.apply(job);
                Ok(())
            },
            self.remote.patch_job(id, &patch),
            |jobs, updated| view::put_job(jobs, updated.clone()),
        )
        .await
    }

    /// Move the job at `from_order` to `to_order`, reconciling sibling
    /// ranks optimistically. `to_order` is clamped into `[0, N-1]`; a
    /// clamped no-op returns the current view without a remote call.
    pub async fn move_job(&self, from_order: u32, to_order: u32) -> Result<Vec<Job>> {
        let _gate = self.jobs_gate.lock().await;

        let n = self.view.read().await.jobs.len() as u32;
        if n == 0 {
            return Err(TalentError::InvalidMove { from_order });
        }
        let to_order = to_order.min(n - 1);
        if from_order == to_order {
            return Ok(self.view.read().await.jobs.clone());
        }

        self.mutate(
            |view| &mut view.jobs,
            |jobs| {
                *jobs = ordering::reconcile(from_order, to_order, jobs)?;
                Ok(())
            },
            self.remote.move_job(from_order, to_order),
            |jobs, authoritative| *jobs = authoritative.clone(),
        )
        .await
    }

    // --- Candidates -------------------------------------------------------

    /// Reload the candidates collection from the server.
    pub async fn refresh_candidates(&self) -> Result<Vec<Candidate>> {
        let _gate = self.candidates_gate.lock().await;
        let candidates = self.remote.list_candidates().await?;
        self.view.write().await.candidates = candidates.clone();
        Ok(candidates)
    }

    pub async fn create_candidate(&self, name: String, email: String) -> Result<Candidate> {
        let _gate = self.candidates_gate.lock().await;

        if name.trim().is_empty() {
            return Err(TalentError::Validation("candidate name is required".into()));
        }

        let provisional_id = {
            let view = self.view.read().await;
            view.candidates
                .iter()
                .map(|c| c.id)
                .max()
                .map_or(1, |max| max + 1)
        };
        let guess = Candidate::new(provisional_id, name.clone(), email.clone());

        self.mutate(
            |view| &mut view.candidates,
            |candidates| {
                candidates.push(guess);
                Ok(())
            },
            self.remote.create_candidate(name, email),
            |candidates, created| {
                candidates.retain(|c| c.id != provisional_id);
                view::put_candidate(candidates, created.clone());
            },
        )
        .await
    }

    pub async fn patch_candidate(&self, id: u32, patch: CandidatePatch) -> Result<Candidate> {
        let _gate = self.candidates_gate.lock().await;
        self.patch_candidate_gated(id, patch).await
    }

    /// Move a candidate to another pipeline stage.
    pub async fn set_candidate_stage(
        &self,
        id: u32,
        stage: crate::model::Stage,
    ) -> Result<Candidate> {
        self.patch_candidate(id, CandidatePatch::stage(stage)).await
    }

    /// Append a note to a candidate's history.
    pub async fn add_candidate_note(&self, id: u32, body: String) -> Result<Candidate> {
        let _gate = self.candidates_gate.lock().await;

        let mut notes = {
            let view = self.view.read().await;
            view.candidate(id)
                .ok_or(TalentError::not_found("candidate", id))?
                .notes
                .clone()
        };
        notes.push(Note::new(body));
        let patch = CandidatePatch {
            notes: Some(notes),
            ..Default::default()
        };
        self.patch_candidate_gated(id, patch).await
    }

    /// Body of a candidate patch; the caller holds the candidates gate.
    async fn patch_candidate_gated(&self, id: u32, patch: CandidatePatch) -> Result<Candidate> {
        self.mutate(
            |view| &mut view.candidates,
            |candidates| {
                let candidate = candidates
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(TalentError::not_found("candidate", id))?;
                patch.apply(candidate);
                Ok(())
            },
            self.remote.patch_candidate(id, &patch),
            |candidates, updated| view::put_candidate(candidates, updated.clone()),
        )
        .await
    }

    // --- Assessments ------------------------------------------------------

    /// Fetch and cache the assessment for a job, if one exists.
    pub async fn load_assessment(&self, job_id: u32) -> Result<Option<Assessment>> {
        let _gate = self.assessments_gate.lock().await;
        let assessment = self.remote.get_assessment(job_id).await?;
        if let Some(ref a) = assessment {
            self.view.write().await.assessments.insert(job_id, a.clone());
        }
        Ok(assessment)
    }

    /// Replace a job's assessment form.
    pub async fn save_assessment(
        &self,
        job_id: u32,
        questions: Vec<QuestionSpec>,
    ) -> Result<Assessment> {
        let _gate = self.assessments_gate.lock().await;

        let guess = Assessment::new(job_id, questions.clone());
        self.mutate(
            |view| &mut view.assessments,
            |assessments| {
                assessments.insert(job_id, guess);
                Ok(())
            },
            self.remote.put_assessment(job_id, questions),
            |assessments, stored| {
                assessments.insert(job_id, stored.clone());
            },
        )
        .await
    }
}
