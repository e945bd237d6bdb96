//! Dispatch policies: pluggable decision strategies for the fleet.
//!
//! Every policy implements [`DispatchPolicy`]: given the shared per-tick
//! observation and a taxi identity, produce that taxi's next action. The
//! concrete strategies differ only in which waiting passengers a taxi is
//! allowed to pursue and in whether taxis coordinate within a tick.

pub mod greedy;
pub mod identity;
pub mod nearest;
pub mod policy;
pub mod quadrant;
pub mod random;

pub use greedy::GreedyAssignment;
pub use identity::IdentityDispatch;
pub use nearest::NearestFirst;
pub use policy::DispatchPolicy;
pub use quadrant::QuadrantDispatch;
pub use random::RandomPolicy;

use serde::{Deserialize, Serialize};

/// Which dispatch policy to run. Serializes into parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Decentralized nearest-first.
    #[default]
    Nearest,
    /// Spatial partition: each taxi serves one map quadrant.
    Quadrant,
    /// Identity partition: passengers assigned by id modulo fleet size.
    Identity,
    /// Centralized greedy role assignment, recomputed every tick.
    Greedy,
    /// Baseline: uniformly random actions.
    Random,
}

/// Construct a boxed policy from a [`PolicyKind`] descriptor. The seed only
/// matters for stochastic policies.
pub fn build_policy(kind: PolicyKind, seed: Option<u64>) -> Box<dyn DispatchPolicy> {
    match kind {
        PolicyKind::Nearest => Box::new(NearestFirst::new()),
        PolicyKind::Quadrant => Box::new(QuadrantDispatch::new()),
        PolicyKind::Identity => Box::new(IdentityDispatch::new()),
        PolicyKind::Greedy => Box::new(GreedyAssignment::new()),
        PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
    }
}
