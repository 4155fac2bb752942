//! Dense-rank reconciliation for job ordering.
//!
//! Every job carries an `order` in `0..N-1` with no gaps or duplicates.
//! Moving one job shifts the jobs between its old and new rank by exactly
//! one position, so the result is still a dense permutation. The same
//! function computes both the client's optimistic guess and the server's
//! authoritative result, so both sides converge on identical input.

use crate::error::{Result, TalentError};
use crate::model::Job;

/// Compute the job collection after moving the job at `from_order` to
/// `to_order`.
///
/// Fails with `InvalidMove` (and touches nothing) when no job currently
/// has `from_order`. `from_order == to_order` is a valid no-op and returns
/// the collection unchanged. Callers are expected to clamp `to_order` into
/// `[0, N-1]`; the controller does this before calling.
pub fn reconcile(from_order: u32, to_order: u32, jobs: &[Job]) -> Result<Vec<Job>> {
    if !jobs.iter().any(|j| j.order == from_order) {
        return Err(TalentError::InvalidMove { from_order });
    }

    if from_order == to_order {
        return Ok(jobs.to_vec());
    }

    let mut next = jobs.to_vec();
    for job in &mut next {
        if job.order == from_order {
            job.order = to_order;
        } else if from_order < to_order && job.order > from_order && job.order <= to_order {
            // Moving forward: the jobs in (from, to] slide one rank earlier.
            job.order -= 1;
        } else if from_order > to_order && job.order < from_order && job.order >= to_order {
            // Moving backward: the jobs in [to, from) slide one rank later.
            job.order += 1;
        }
    }
    Ok(next)
}

/// Check that `order` values form a dense permutation of `0..N-1`.
pub fn is_dense(jobs: &[Job]) -> bool {
    let mut seen = vec![false; jobs.len()];
    for job in jobs {
        match seen.get_mut(job.order as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
