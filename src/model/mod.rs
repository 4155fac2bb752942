pub mod assessment;
pub mod candidate;
pub mod job;

pub use assessment::{Assessment, QuestionKind, QuestionSpec};
pub use candidate::{Candidate, CandidatePatch, Note, Stage};
pub use job::{Job, JobPatch, JobStatus};
