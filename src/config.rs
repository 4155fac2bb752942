use std::net::SocketAddr;
use std::time::Duration;

/// Which class of API operation a fault policy applies to.
///
/// Reads are never fault-injected (matching the simulated backend this
/// models), but the distinction between mutation classes lets tests target
/// a single class deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Create,
    Patch,
    Move,
    /// Assessment replace (PUT).
    Put,
}

/// Fault-injection policy for the simulated remote endpoint.
///
/// Every mutating call rolls independently against `probability`. A seeded
/// RNG makes failure sequences reproducible in tests.
#[derive(Debug, Clone)]
pub struct FaultPolicy {
    /// Probability in [0.0, 1.0] that an applicable call fails.
    pub probability: f64,
    /// Operation classes the policy applies to. Empty means "no class",
    /// i.e. faults are disabled regardless of probability.
    pub applies_to: Vec<OpClass>,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self {
            // The backend this simulates fails roughly one mutation in ten.
            probability: 0.1,
            applies_to: vec![OpClass::Create, OpClass::Patch, OpClass::Move, OpClass::Put],
            seed: None,
        }
    }
}

impl FaultPolicy {
    /// A policy that never injects a failure. Used by tests and the demo.
    pub fn disabled() -> Self {
        Self {
            probability: 0.0,
            applies_to: Vec::new(),
            seed: None,
        }
    }

    /// A policy that fails every applicable call. Deterministic by
    /// construction, no seed required.
    pub fn always(applies_to: Vec<OpClass>) -> Self {
        Self {
            probability: 1.0,
            applies_to,
            seed: None,
        }
    }

    pub fn covers(&self, class: OpClass) -> bool {
        self.applies_to.contains(&class)
    }
}

/// Configuration for the simulated remote endpoint.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Artificial latency added to every call, reads included.
    pub latency: Duration,
    pub faults: FaultPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(400),
            faults: FaultPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Zero latency, zero faults. The default for unit and integration
    /// tests, which assert on outcomes rather than timing.
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            faults: FaultPolicy::disabled(),
        }
    }
}

/// Configuration for the HTTP server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Number of jobs to seed when the store starts empty.
    pub seed_jobs: usize,
    /// Number of candidates to seed when the store starts empty.
    pub seed_candidates: usize,
    /// Seed for generated sample data.
    pub seed_rng: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8700"
                .parse()
                .expect("default listen address is valid"),
            seed_jobs: 25,
            seed_candidates: 1000,
            seed_rng: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_policy_default() {
        let policy = FaultPolicy::default();
        assert!((policy.probability - 0.1).abs() < f64::EPSILON);
        assert!(policy.covers(OpClass::Create));
        assert!(policy.covers(OpClass::Patch));
        assert!(policy.covers(OpClass::Move));
        assert!(policy.covers(OpClass::Put));
        assert!(policy.seed.is_none());
    }

    #[test]
    fn fault_policy_disabled_covers_nothing() {
        let policy = FaultPolicy::disabled();
        assert_eq!(policy.probability, 0.0);
        assert!(!policy.covers(OpClass::Create));
        assert!(!policy.covers(OpClass::Move));
    }

    #[test]
    fn fault_policy_always_is_class_scoped() {
        let policy = FaultPolicy::always(vec![OpClass::Move]);
        assert_eq!(policy.probability, 1.0);
        assert!(policy.covers(OpClass::Move));
        assert!(!policy.covers(OpClass::Patch));
    }

    #[test]
    fn simulation_config_default() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.latency, Duration::from_millis(400));
        assert!((cfg.faults.probability - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn simulation_config_instant() {
        let cfg = SimulationConfig::instant();
        assert_eq!(cfg.latency, Duration::ZERO);
        assert_eq!(cfg.faults.probability, 0.0);
    }

    #[test]
    fn server_config_default() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:8700");
        assert_eq!(cfg.seed_jobs, 25);
        assert_eq!(cfg.seed_candidates, 1000);
    }
}
