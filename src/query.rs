use serde::{Deserialize, Serialize};

use crate::model::{Candidate, Job, JobStatus};

/// Query parameters for the paged jobs list.
#[derive(Debug, Clone, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    5
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl JobQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }
}

/// One page of a filtered collection. `total` counts the whole filtered
/// set, not just this page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Filter and paginate the jobs collection.
///
/// `search` is a case-insensitive substring match on the title; `status`
/// is exact; both are conjunctive when present. The page window is
/// zero-indexed at `(page-1) * page_size`; a page past the end yields
/// empty items with the filtered total intact. Pages and sizes below 1 are
/// treated as 1.
pub fn page_jobs(jobs: &[Job], query: &JobQuery) -> Page<Job> {
    let needle = query.search.as_deref().map(str::to_lowercase);
    let filtered: Vec<&Job> = jobs
        .iter()
        .filter(|job| {
            needle
                .as_deref()
                .map_or(true, |n| job.title.to_lowercase().contains(n))
        })
        .filter(|job| query.status.map_or(true, |s| job.status == s))
        .collect();

    let total = filtered.len();
    let page = query.page.max(1) as usize;
    let page_size = query.page_size.max(1) as usize;
    let start = (page - 1) * page_size;

    let items = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Page { items, total }
}

/// Case-insensitive candidate search over name OR email. An empty search
/// returns the collection unchanged.
pub fn filter_candidates(candidates: &[Candidate], search: &str) -> Vec<Candidate> {
    if search.is_empty() {
        return candidates.to_vec();
    }
    let needle = search.to_lowercase();
    candidates
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
