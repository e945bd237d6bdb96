//! Uniformly random baseline policy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::Action;
use crate::environment::Observation;

use super::policy::DispatchPolicy;

/// Picks every action uniformly at random. Useful as a floor when comparing
/// the real dispatch strategies.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl DispatchPolicy for RandomPolicy {
    fn decide(&mut self, _observation: &Observation, _taxi_index: usize) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}
