use std::collections::HashMap;

use crate::model::{Assessment, Candidate, Job};

/// The client's local view of the three collections.
///
/// This is a disposable cache of the server's state, never a second source
/// of truth: it exists so reads and optimistic writes feel instantaneous,
/// and any divergence is resolved by adopting whatever the server returns.
/// Explicitly constructed and injected into the controller; starts empty
/// and is simply dropped on teardown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientView {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub assessments: HashMap<u32, Assessment>,
}

impl ClientView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn candidate(&self, id: u32) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Replace one job in place, by id.
    pub fn put_job(&mut self, job: Job) {
        put_job(&mut self.jobs, job);
    }

    /// Replace one candidate in place, by id.
    pub fn put_candidate(&mut self, candidate: Candidate) {
        put_candidate(&mut self.candidates, candidate);
    }
}

/// Replace one job in a collection, by id; append when absent.
pub fn put_job(jobs: &mut Vec<Job>, job: Job) {
    if let Some(existing) = jobs.iter_mut().find(|j| j.id == job.id) {
        *existing = job;
    } else {
        jobs.push(job);
    }
}

/// Replace one candidate in a collection, by id; append when absent.
pub fn put_candidate(candidates: &mut Vec<Candidate>, candidate: Candidate) {
    if let Some(existing) = candidates.iter_mut().find(|c| c.id == candidate.id) {
        *existing = candidate;
    } else {
        candidates.push(candidate);
    }
}
