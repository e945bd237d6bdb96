//! Identity partition dispatch: passengers assigned by id modulo fleet size.
//!
//! Taxi `i` only pursues waiting passengers with `id mod fleet_size == i`;
//! within that subset it behaves exactly like nearest-first.

use crate::entities::Action;
use crate::environment::Observation;
use crate::routing::{BfsPlanner, CachedPlanner};

use super::policy::{advance_along, nearest_among, toward_drop_off, DispatchPolicy};

pub struct IdentityDispatch {
    planner: CachedPlanner<BfsPlanner>,
}

impl IdentityDispatch {
    pub fn new() -> Self {
        Self {
            planner: CachedPlanner::default(),
        }
    }
}

impl Default for IdentityDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for IdentityDispatch {
    fn decide(&mut self, observation: &Observation, taxi_index: usize) -> Action {
        let taxi = &observation.taxis[taxi_index];
        if taxi.passenger.is_some() {
            return toward_drop_off(&self.planner, observation, taxi);
        }
        let fleet_size = observation.taxis.len();
        let eligible = observation
            .waiting_passengers()
            .filter(|p| p.id.0 % fleet_size == taxi_index);
        match nearest_among(&self.planner, observation, taxi.position, eligible) {
            Some((_, path)) => advance_along(&path, Action::PickUp),
            None => Action::Stay,
        }
    }
}
