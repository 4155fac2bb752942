//! The simulated remote endpoint.
//!
//! Behaves like the flaky HTTP backend a real client has to live with:
//! every call pays a fixed artificial latency, and every mutating call may
//! fail with a content-free transient error according to the configured
//! fault policy. Each mutation runs as one read-transform-replace critical
//! section under the store's write lock, so mutations never interleave
//! partial updates within a collection.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, RwLock};

use crate::config::{FaultPolicy, OpClass, SimulationConfig};
use crate::error::{Result, TalentError};
use crate::model::{
    Assessment, Candidate, CandidatePatch, Job, JobPatch, QuestionSpec,
};
use crate::ordering;
use crate::query::{self, JobQuery, Page};
use crate::store::RecordStore;

/// Rolls the dice for mutating calls, independently per call.
#[derive(Debug)]
pub struct FaultInjector {
    policy: FaultPolicy,
    rng: Mutex<StdRng>,
}

impl FaultInjector {
    pub fn new(policy: FaultPolicy) -> Self {
        let rng = match policy.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            policy,
            rng: Mutex::new(rng),
        }
    }

    /// Err(TransientFailure) when this call draws a failure.
    pub async fn check(&self, class: OpClass) -> Result<()> {
        if !self.policy.covers(class) || self.policy.probability <= 0.0 {
            return Ok(());
        }
        let roll: f64 = self.rng.lock().await.gen();
        if roll < self.policy.probability {
            tracing::debug!(?class, "Injected transient failure");
            return Err(TalentError::TransientFailure);
        }
        Ok(())
    }
}

/// The unreliable remote endpoint over the record store.
///
/// Cheap to clone; clones share the store and fault injector.
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    store: Arc<RwLock<RecordStore>>,
    latency: std::time::Duration,
    faults: Arc<FaultInjector>,
}

impl RemoteEndpoint {
    pub fn new(store: Arc<RwLock<RecordStore>>, config: SimulationConfig) -> Self {
        Self {
            store,
            latency: config.latency,
            faults: Arc::new(FaultInjector::new(config.faults)),
        }
    }

    pub fn store(&self) -> Arc<RwLock<RecordStore>> {
        self.store.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // --- Jobs -------------------------------------------------------------

    /// Filtered + paged jobs read. Reads are delayed but never fault.
    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Page<Job>> {
        self.simulate_latency().await;
        let store = self.store.read().await;
        Ok(query::page_jobs(&store.jobs(), query))
    }

    /// Full jobs read, used by clients that maintain their own view.
    pub async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        self.simulate_latency().await;
        Ok(self.store.read().await.jobs())
    }

    /// Create a job. The server assigns the id and appends the job at the
    /// tail of the ordering (`order = N`).
    pub async fn create_job(&self, title: String, tags: Vec<String>) -> Result<Job> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Create).await?;

        if title.trim().is_empty() {
            return Err(TalentError::Validation("job title is required".into()));
        }

        let mut store = self.store.write().await;
        let mut jobs = store.jobs();
        let job = Job {
            tags,
            ..Job::new(store.next_job_id(), title, jobs.len() as u32)
        };
        jobs.push(job.clone());
        store.replace_jobs(jobs);
        tracing::info!(job_id = job.id, order = job.order, "Job created");
        Ok(job)
    }

    /// Merge a patch into an existing job. Absent ids are an explicit
    /// `NotFound`, never a silent no-op.
    pub async fn patch_job(&self, id: u32, patch: &JobPatch) -> Result<Job> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Patch).await?;

        let mut store = self.store.write().await;
        let mut jobs = store.jobs();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(TalentError::not_found("job", id))?;
        patch.apply(job);
        let updated = job.clone();
        store.replace_jobs(jobs);
        tracing::info!(job_id = id, "Job patched");
        Ok(updated)
    }

    /// Move the job at `from_order` to `to_order`, reconciling every
    /// sibling's rank. Returns the full authoritative collection.
    pub async fn move_job(&self, from_order: u32, to_order: u32) -> Result<Vec<Job>> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Move).await?;

        let mut store = self.store.write().await;
        let jobs = store.jobs();
        if to_order as usize >= jobs.len() {
            // Clients clamp the target; a raw caller that does not would
            // punch a hole in the dense permutation.
            return Err(TalentError::Validation(format!(
                "target order {to_order} is out of range"
            )));
        }
        let reconciled = ordering::reconcile(from_order, to_order, &jobs)?;
        store.replace_jobs(reconciled.clone());
        tracing::info!(from_order, to_order, "Jobs reordered");
        Ok(reconciled)
    }

    // --- Candidates -------------------------------------------------------

    /// Full unpaginated candidates read.
    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.simulate_latency().await;
        Ok(self.store.read().await.candidates())
    }

    pub async fn create_candidate(&self, name: String, email: String) -> Result<Candidate> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Create).await?;

        if name.trim().is_empty() {
            return Err(TalentError::Validation("candidate name is required".into()));
        }

        let mut store = self.store.write().await;
        let mut candidates = store.candidates();
        let candidate = Candidate::new(store.next_candidate_id(), name, email);
        candidates.push(candidate.clone());
        store.replace_candidates(candidates);
        tracing::info!(candidate_id = candidate.id, "Candidate created");
        Ok(candidate)
    }

    pub async fn patch_candidate(&self, id: u32, patch: &CandidatePatch) -> Result<Candidate> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Patch).await?;

        let mut store = self.store.write().await;
        let mut candidates = store.candidates();
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TalentError::not_found("candidate", id))?;
        patch.apply(candidate);
        let updated = candidate.clone();
        store.replace_candidates(candidates);
        tracing::info!(candidate_id = id, "Candidate patched");
        Ok(updated)
    }

    // --- Assessments ------------------------------------------------------

    pub async fn get_assessment(&self, job_id: u32) -> Result<Option<Assessment>> {
        self.simulate_latency().await;
        Ok(self.store.read().await.assessment(job_id).cloned())
    }

    /// Replace the assessment for a job.
    pub async fn put_assessment(
        &self,
        job_id: u32,
        questions: Vec<QuestionSpec>,
    ) -> Result<Assessment> {
        self.simulate_latency().await;
        self.faults.check(OpClass::Put).await?;

        let mut store = self.store.write().await;
        let stored = store.put_assessment(job_id, questions).clone();
        tracing::info!(job_id, questions = stored.questions.len(), "Assessment saved");
        Ok(stored)
    }

    /// Accept a candidate's assessment submission. Submissions are
    /// acknowledged but not stored.
    pub async fn submit_assessment(
        &self,
        job_id: u32,
        answers: serde_json::Value,
    ) -> Result<()> {
        self.simulate_latency().await;
        tracing::info!(job_id, %answers, "Assessment submission received (not stored)");
        Ok(())
    }
}
