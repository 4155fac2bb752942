//! Shared builders for integration tests.
//!
//! Endpoints are built with zero latency and a deterministic fault policy
//! so tests assert on outcomes, not timing.

#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;

use talentflow::client::MutationController;
use talentflow::config::{FaultPolicy, OpClass, SimulationConfig};
use talentflow::model::Job;
use talentflow::remote::RemoteEndpoint;
use talentflow::seed;
use talentflow::store::RecordStore;

pub const ALL_MUTATION_CLASSES: [OpClass; 4] =
    [OpClass::Create, OpClass::Patch, OpClass::Move, OpClass::Put];

/// A store seeded with `jobs` jobs and `candidates` candidates, from a
/// fixed RNG seed.
pub fn seeded_store(jobs: usize, candidates: usize) -> Arc<RwLock<RecordStore>> {
    let mut store = RecordStore::new();
    let mut rng = StdRng::seed_from_u64(42);
    seed::seed_store(&mut store, jobs, candidates, &mut rng);
    Arc::new(RwLock::new(store))
}

/// A store holding exactly `n` active jobs titled "Job 0".."Job n-1" with
/// `order = index`.
pub fn store_with_jobs(n: u32) -> Arc<RwLock<RecordStore>> {
    let mut store = RecordStore::new();
    store.replace_jobs(
        (0..n)
            .map(|i| Job::new(i + 1, format!("Job {i}"), i))
            .collect(),
    );
    Arc::new(RwLock::new(store))
}

/// Endpoint that never fails and never sleeps.
pub fn reliable_endpoint(store: Arc<RwLock<RecordStore>>) -> RemoteEndpoint {
    RemoteEndpoint::new(store, SimulationConfig::instant())
}

/// Endpoint that fails every mutating call.
pub fn failing_endpoint(store: Arc<RwLock<RecordStore>>) -> RemoteEndpoint {
    let config = SimulationConfig {
        latency: std::time::Duration::ZERO,
        faults: FaultPolicy::always(ALL_MUTATION_CLASSES.to_vec()),
    };
    RemoteEndpoint::new(store, config)
}

/// Endpoint with a custom fault policy and real latency, for tests that
/// overlap in-flight operations.
pub fn slow_endpoint(
    store: Arc<RwLock<RecordStore>>,
    latency: std::time::Duration,
    faults: FaultPolicy,
) -> RemoteEndpoint {
    RemoteEndpoint::new(store, SimulationConfig { latency, faults })
}

/// Endpoint with a custom fault policy and zero latency.
pub fn endpoint_with_faults(
    store: Arc<RwLock<RecordStore>>,
    faults: FaultPolicy,
) -> RemoteEndpoint {
    let config = SimulationConfig {
        latency: std::time::Duration::ZERO,
        faults,
    };
    RemoteEndpoint::new(store, config)
}

/// A controller over a reliable endpoint, with its jobs view already
/// loaded from a store of `n` jobs.
pub async fn controller_with_jobs(n: u32) -> (MutationController, Arc<RwLock<RecordStore>>) {
    let store = store_with_jobs(n);
    let controller = MutationController::new(reliable_endpoint(store.clone()));
    controller
        .refresh_jobs()
        .await
        .expect("reliable refresh should succeed");
    (controller, store)
}
