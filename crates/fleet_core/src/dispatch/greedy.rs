//! Centralized greedy role assignment.
//!
//! Roles are recomputed from scratch every tick: carrying taxis keep their
//! delivery role, then each idle taxi in index order claims the nearest
//! still-unclaimed waiting passenger. A claim lasts one tick only, so the
//! assignment adapts as taxis move and passengers board.

use std::collections::HashSet;

use crate::entities::{Action, PassengerId};
use crate::environment::Observation;
use crate::routing::{BfsPlanner, CachedPlanner};

use super::policy::{advance_along, nearest_among, toward_drop_off, DispatchPolicy};

pub struct GreedyAssignment {
    planner: CachedPlanner<BfsPlanner>,
}

impl GreedyAssignment {
    pub fn new() -> Self {
        Self {
            planner: CachedPlanner::default(),
        }
    }
}

impl Default for GreedyAssignment {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for GreedyAssignment {
    /// One taxi's action under the full-fleet assignment. Coordination
    /// lives in [`decide_all`](DispatchPolicy::decide_all), so a single-taxi
    /// query still runs the whole assignment and picks out one entry.
    fn decide(&mut self, observation: &Observation, taxi_index: usize) -> Action {
        self.decide_all(observation)[taxi_index]
    }

    fn decide_all(&mut self, observation: &Observation) -> Vec<Action> {
        let mut taken: HashSet<PassengerId> = observation
            .taxis
            .iter()
            .filter_map(|taxi| taxi.passenger)
            .collect();

        observation
            .taxis
            .iter()
            .map(|taxi| {
                if taxi.passenger.is_some() {
                    return toward_drop_off(&self.planner, observation, taxi);
                }
                let claimed = nearest_among(
                    &self.planner,
                    observation,
                    taxi.position,
                    observation
                        .waiting_passengers()
                        .filter(|p| !taken.contains(&p.id)),
                );
                match claimed {
                    Some((id, path)) => {
                        taken.insert(id);
                        advance_along(&path, Action::PickUp)
                    }
                    None => Action::Stay,
                }
            })
            .collect()
    }
}
