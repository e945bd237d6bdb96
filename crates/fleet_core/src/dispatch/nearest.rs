//! Decentralized nearest-first dispatch.
//!
//! Each taxi decides alone: an idle taxi heads for the waiting passenger
//! with the shortest route to its pickup; a carrying taxi heads for its
//! passenger's drop-off.

use crate::entities::Action;
use crate::environment::Observation;
use crate::routing::{BfsPlanner, CachedPlanner};

use super::policy::{advance_along, nearest_among, toward_drop_off, DispatchPolicy};

pub struct NearestFirst {
    planner: CachedPlanner<BfsPlanner>,
}

impl NearestFirst {
    pub fn new() -> Self {
        Self {
            planner: CachedPlanner::default(),
        }
    }
}

impl Default for NearestFirst {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for NearestFirst {
    fn decide(&mut self, observation: &Observation, taxi_index: usize) -> Action {
        let taxi = &observation.taxis[taxi_index];
        if taxi.passenger.is_some() {
            return toward_drop_off(&self.planner, observation, taxi);
        }
        match nearest_among(
            &self.planner,
            observation,
            taxi.position,
            observation.waiting_passengers(),
        ) {
            Some((_, path)) => advance_along(&path, Action::PickUp),
            None => Action::Stay,
        }
    }
}
