use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Archived,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Active => write!(f, "active"),
            JobStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "archived" => Ok(JobStatus::Archived),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// A job posting. `order` is the job's rank among all jobs and must form a
/// dense permutation of `0..N-1` across the collection at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u32,
    pub title: String,
    pub slug: String,
    pub status: JobStatus,
    pub tags: Vec<String>,
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: u32, title: impl Into<String>, order: u32) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            id,
            title,
            status: JobStatus::Active,
            tags: Vec::new(),
            order,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }
}

/// Fields a job patch is allowed to touch. `order` is deliberately absent:
/// ranks only change through the move operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl JobPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merge the set fields into `job`. Unset fields are left alone, so
    /// applying the same patch twice is last-write-wins safe.
    pub fn apply(&self, job: &mut Job) {
        if let Some(ref title) = self.title {
            job.title = title.clone();
        }
        if let Some(ref slug) = self.slug {
            job.slug = slug.clone();
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(ref tags) = self.tags {
            job.tags = tags.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.status.is_none() && self.tags.is_none()
    }
}

/// Lowercase, whitespace collapsed to single dashes.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
