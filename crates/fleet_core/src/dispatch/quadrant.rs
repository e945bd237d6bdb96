//! Spatial partition dispatch: each taxi serves one quadrant of the map.
//!
//! Taxis are statically bound to quadrants by `taxi_index mod 4` and only
//! pursue waiting passengers whose pickup lies in their quadrant; within
//! that subset they behave exactly like nearest-first.

use crate::entities::Action;
use crate::environment::Observation;
use crate::grid::{GridMap, Position};
use crate::routing::{BfsPlanner, CachedPlanner};

use super::policy::{advance_along, nearest_among, toward_drop_off, DispatchPolicy};

/// Quadrant of `position` on a map split at `width/2` and `height/2`:
/// 0 = west/north, 1 = east/north, 2 = west/south, 3 = east/south.
fn quadrant(map: &GridMap, position: Position) -> usize {
    let east = position.x >= map.width() / 2;
    let south = position.y >= map.height() / 2;
    match (east, south) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

pub struct QuadrantDispatch {
    planner: CachedPlanner<BfsPlanner>,
}

impl QuadrantDispatch {
    pub fn new() -> Self {
        Self {
            planner: CachedPlanner::default(),
        }
    }
}

impl Default for QuadrantDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPolicy for QuadrantDispatch {
    fn decide(&mut self, observation: &Observation, taxi_index: usize) -> Action {
        let taxi = &observation.taxis[taxi_index];
        if taxi.passenger.is_some() {
            return toward_drop_off(&self.planner, observation, taxi);
        }
        let own = taxi_index % 4;
        let eligible = observation
            .waiting_passengers()
            .filter(|p| quadrant(&observation.map, p.pickup) == own);
        match nearest_among(&self.planner, observation, taxi.position, eligible) {
            Some((_, path)) => advance_along(&path, Action::PickUp),
            None => Action::Stay,
        }
    }
}
