//! Canned scenario construction: the default city and a parameter builder.

use serde::{Deserialize, Serialize};

use crate::dispatch::PolicyKind;
use crate::environment::Environment;
use crate::grid::GridMap;

/// The stock 8x10 city used when no custom map is supplied. Roads form a
/// loose lattice with a few dead ends, so routes are rarely unique.
pub const DEFAULT_MAP: &str = "........\n\
                               .#..#...\n\
                               .######.\n\
                               .#..#...\n\
                               .##.#...\n\
                               ..#.###.\n\
                               ..###...\n\
                               .##.#...\n\
                               ..#.#...\n\
                               ........";

pub fn default_map() -> GridMap {
    GridMap::from_ascii(DEFAULT_MAP)
}

/// Everything needed to stand up one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub num_taxis: usize,
    pub num_passengers: usize,
    /// Seed for entity placement (and for stochastic policies). `None`
    /// draws from entropy, so two runs will differ.
    pub seed: Option<u64>,
    pub policy: PolicyKind,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_taxis: 3,
            num_passengers: 5,
            seed: None,
            policy: PolicyKind::Nearest,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fleet(mut self, num_taxis: usize) -> Self {
        self.num_taxis = num_taxis;
        self
    }

    pub fn with_passengers(mut self, num_passengers: usize) -> Self {
        self.num_passengers = num_passengers;
        self
    }
}

/// An environment on the default map, not yet reset.
pub fn build_environment(params: &ScenarioParams) -> Environment {
    Environment::new(
        default_map(),
        params.num_taxis,
        params.num_passengers,
        params.seed,
    )
}
