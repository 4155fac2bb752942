use std::collections::HashMap;

use crate::model::{Assessment, Candidate, Job, QuestionSpec};

/// The authoritative record store: in-memory collections for jobs,
/// candidates, and assessments.
///
/// The access contract is coarse on purpose: readers take a snapshot of a
/// whole collection, writers replace a whole collection. There are no
/// row-level updates, so a mutation is always read-transform-replace under
/// one exclusive critical section (the store lives behind an
/// `Arc<RwLock<RecordStore>>` and the endpoint holds the write guard for
/// the whole transform).
#[derive(Debug, Default)]
pub struct RecordStore {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    assessments: HashMap<u32, Assessment>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Jobs -------------------------------------------------------------

    /// Snapshot of the jobs collection.
    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.clone()
    }

    /// Replace the entire jobs collection.
    pub fn replace_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    pub fn job(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Next server-assigned job id: max existing + 1, or 1 when empty.
    pub fn next_job_id(&self) -> u32 {
        self.jobs.iter().map(|j| j.id).max().map_or(1, |max| max + 1)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    // --- Candidates -------------------------------------------------------

    pub fn candidates(&self) -> Vec<Candidate> {
        self.candidates.clone()
    }

    pub fn replace_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
    }

    pub fn candidate(&self, id: u32) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn next_candidate_id(&self) -> u32 {
        self.candidates
            .iter()
            .map(|c| c.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    // --- Assessments ------------------------------------------------------

    pub fn assessment(&self, job_id: u32) -> Option<&Assessment> {
        self.assessments.get(&job_id)
    }

    /// Insert or replace the assessment for a job.
    pub fn put_assessment(&mut self, job_id: u32, questions: Vec<QuestionSpec>) -> &Assessment {
        self.assessments
            .insert(job_id, Assessment::new(job_id, questions));
        &self.assessments[&job_id]
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.candidates.is_empty() && self.assessments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionSpec;

    #[test]
    fn next_job_id_starts_at_one() {
        let store = RecordStore::new();
        assert_eq!(store.next_job_id(), 1);
        assert_eq!(store.next_candidate_id(), 1);
    }

    #[test]
    fn next_job_id_is_max_plus_one() {
        let mut store = RecordStore::new();
        store.replace_jobs(vec![Job::new(3, "A", 0), Job::new(7, "B", 1)]);
        assert_eq!(store.next_job_id(), 8);
    }

    #[test]
    fn replace_jobs_is_whole_collection() {
        let mut store = RecordStore::new();
        store.replace_jobs(vec![Job::new(1, "A", 0)]);
        store.replace_jobs(vec![Job::new(2, "B", 0)]);
        assert_eq!(store.job_count(), 1);
        assert!(store.job(1).is_none());
        assert!(store.job(2).is_some());
    }

    #[test]
    fn put_assessment_replaces_existing() {
        let mut store = RecordStore::new();
        store.put_assessment(4, vec![QuestionSpec::text("One")]);
        store.put_assessment(4, vec![QuestionSpec::text("Two"), QuestionSpec::text("Three")]);
        assert_eq!(store.assessment(4).unwrap().questions.len(), 2);
        assert!(store.assessment(5).is_none());
    }
}
