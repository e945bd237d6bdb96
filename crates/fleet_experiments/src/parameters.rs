//! Parameter variation framework for dispatch policy sweeps.
//!
//! A [`ParameterSpace`] holds the axes to explore; [`ParameterSpace::generate`]
//! expands them into one [`ParameterSet`] per combination via Cartesian
//! product (grid search).

use fleet_core::dispatch::PolicyKind;
use fleet_core::scenario::ScenarioParams;

/// One point in the parameter space, ready to run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParameterSet {
    /// Human-readable identifier derived from the combination.
    pub experiment_id: String,
    /// Index of this set within the generated sweep.
    pub run_id: usize,
    /// Scenario configuration handed to fleet_core.
    pub params: ScenarioParams,
    /// How many seeded episodes to run for this combination.
    pub episodes: usize,
}

impl ParameterSet {
    pub fn scenario_params(&self) -> ScenarioParams {
        self.params
    }
}

/// Grid-search builder over fleet size, passenger count and policy.
///
/// Axes left empty fall back to the base scenario's single value.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: ScenarioParams,
    episodes: usize,
    num_taxis: Vec<usize>,
    num_passengers: Vec<usize>,
    policies: Vec<PolicyKind>,
}

impl ParameterSpace {
    /// Start a grid search from the default scenario, seeded so sweeps are
    /// reproducible unless the caller overrides the seed.
    pub fn grid() -> Self {
        Self {
            base: ScenarioParams::default().with_seed(0),
            episodes: 1,
            num_taxis: Vec::new(),
            num_passengers: Vec::new(),
            policies: Vec::new(),
        }
    }

    pub fn base(mut self, base: ScenarioParams) -> Self {
        self.base = base;
        self
    }

    pub fn episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn num_taxis(mut self, values: Vec<usize>) -> Self {
        self.num_taxis = values;
        self
    }

    pub fn num_passengers(mut self, values: Vec<usize>) -> Self {
        self.num_passengers = values;
        self
    }

    pub fn policies(mut self, values: Vec<PolicyKind>) -> Self {
        self.policies = values;
        self
    }

    /// Expand the axes into one parameter set per combination.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let num_taxis = fallback(&self.num_taxis, self.base.num_taxis);
        let num_passengers = fallback(&self.num_passengers, self.base.num_passengers);
        let policies = fallback(&self.policies, self.base.policy);

        let mut sets = Vec::new();
        for &taxis in &num_taxis {
            for &passengers in &num_passengers {
                for &policy in &policies {
                    let params = self
                        .base
                        .with_fleet(taxis)
                        .with_passengers(passengers)
                        .with_policy(policy);
                    sets.push(ParameterSet {
                        experiment_id: format!(
                            "taxis{taxis}-passengers{passengers}-{policy:?}"
                        ),
                        run_id: sets.len(),
                        params,
                        episodes: self.episodes,
                    });
                }
            }
        }
        sets
    }
}

fn fallback<T: Copy>(values: &[T], default: T) -> Vec<T> {
    if values.is_empty() {
        vec![default]
    } else {
        values.to_vec()
    }
}
