//! The simulation state machine.
//!
//! One `step` call advances the world a single tick: taxis act in fixed
//! index order, then passenger wait/travel counters advance, then finished
//! trips leave the active set. The episode is terminal exactly from the tick
//! the active-passenger set becomes empty.
//!
//! All mutation goes through [`Environment::step`]; policies only ever see
//! immutable [`Observation`] snapshots.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{
    Action, CompletedTrip, Passenger, PassengerId, Taxi, TaxiId, TripState,
};
use crate::error::SimulationError;
use crate::grid::{Cell, Direction, GridMap, Position};
use crate::render::Renderer;

/// Immutable world snapshot broadcast identically to every dispatch policy
/// each tick: the map, every taxi and every active passenger. Full
/// observability, no partial or noisy sensing.
#[derive(Debug, Clone)]
pub struct Observation {
    pub map: Arc<GridMap>,
    /// Taxis in fleet-index order.
    pub taxis: Vec<Taxi>,
    /// Active passengers in ascending id order.
    pub passengers: Vec<Passenger>,
}

impl Observation {
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn waiting_passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers
            .iter()
            .filter(|p| p.state == TripState::Waiting)
    }
}

/// Result of one environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Observation,
    /// True exactly from the tick the active-passenger set becomes empty.
    pub done: bool,
}

/// The simulated world: a static map plus the taxis and passengers of one
/// episode. Owns all mutable state exclusively.
pub struct Environment {
    map: Arc<GridMap>,
    num_taxis: usize,
    num_passengers: usize,
    rng: StdRng,
    tick: u64,
    taxis: Vec<Taxi>,
    /// Active passengers keyed by id; BTreeMap keeps iteration in id order,
    /// which pickup tie-breaking and observation ordering rely on.
    passengers: BTreeMap<PassengerId, Passenger>,
    completed: Vec<CompletedTrip>,
    renderer: Option<Box<dyn Renderer>>,
}

impl Environment {
    /// Environment for `num_taxis` taxis and `num_passengers` passengers on
    /// `map`. Seeded for reproducibility; `None` seeds from entropy. Call
    /// [`reset`](Self::reset) before stepping.
    pub fn new(map: GridMap, num_taxis: usize, num_passengers: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            map: Arc::new(map),
            num_taxis,
            num_passengers,
            rng,
            tick: 0,
            taxis: Vec::new(),
            passengers: BTreeMap::new(),
            completed: Vec::new(),
            renderer: None,
        }
    }

    /// Attach a render collaborator invoked by [`render`](Self::render).
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Environment with hand-placed entities, bypassing random spawning.
    /// The caller is responsible for the placement invariants (taxis on
    /// distinct road cells, passengers on distinct boardable sidewalks).
    #[cfg(feature = "test-helpers")]
    pub fn from_parts(map: GridMap, taxis: Vec<Taxi>, passengers: Vec<Passenger>) -> Self {
        let num_taxis = taxis.len();
        let num_passengers = passengers.len();
        Self {
            map: Arc::new(map),
            num_taxis,
            num_passengers,
            rng: StdRng::seed_from_u64(0),
            tick: 0,
            taxis,
            passengers: passengers.into_iter().map(|p| (p.id, p)).collect(),
            completed: Vec::new(),
            renderer: None,
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn taxis(&self) -> &[Taxi] {
        &self.taxis
    }

    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values()
    }

    /// Trips delivered so far this episode, in completion order.
    pub fn completed_trips(&self) -> &[CompletedTrip] {
        &self.completed
    }

    /// True once no active passenger remains.
    pub fn done(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Populate the episode: taxis at distinct random road cells with random
    /// headings, passengers at distinct boardable pickup/drop-off pairs.
    /// Returns the initial observation.
    pub fn reset(&mut self) -> Result<Observation, SimulationError> {
        self.tick = 0;
        self.taxis.clear();
        self.passengers.clear();
        self.completed.clear();

        for index in 0..self.num_taxis {
            let taxi = self.create_taxi(TaxiId(index))?;
            info!(
                "t={} created taxi {} at ({}, {})",
                self.tick, index, taxi.position.x, taxi.position.y
            );
            self.taxis.push(taxi);
        }
        for index in 0..self.num_passengers {
            let passenger = self.create_passenger(PassengerId(index))?;
            info!(
                "t={} created passenger {} pickup ({}, {}) drop-off ({}, {})",
                self.tick,
                index,
                passenger.pickup.x,
                passenger.pickup.y,
                passenger.drop_off.x,
                passenger.drop_off.y
            );
            self.passengers.insert(passenger.id, passenger);
        }

        Ok(self.observation())
    }

    /// Advance the world one tick with exactly one action per taxi, in
    /// taxi-index order. Fails without any state change when the action
    /// count does not match the fleet.
    pub fn step(&mut self, actions: &[Action]) -> Result<StepResult, SimulationError> {
        if actions.len() != self.taxis.len() {
            return Err(SimulationError::ActionCountMismatch {
                expected: self.taxis.len(),
                got: actions.len(),
            });
        }

        self.tick += 1;

        // Trip-state snapshot before anyone acts: the counter sweep below
        // distinguishes a full on-board tick from the pickup tick itself.
        let on_board_at_start: HashSet<PassengerId> = self
            .passengers
            .values()
            .filter(|p| p.state == TripState::InTrip)
            .map(|p| p.id)
            .collect();

        for index in 0..self.taxis.len() {
            let action = actions[index];
            debug!("t={} taxi {} chose {:?}", self.tick, index, action);
            match action {
                Action::Up => self.move_taxi(index, Direction::Up),
                Action::Down => self.move_taxi(index, Direction::Down),
                Action::Left => self.move_taxi(index, Direction::Left),
                Action::Right => self.move_taxi(index, Direction::Right),
                Action::Stay => {}
                Action::PickUp => self.pick_up(index),
                Action::DropOff => self.drop_off(index),
            }
        }

        // A passenger picked up this tick spent the tick at the curb, so it
        // still counts as waiting; travel counts full on-board ticks only.
        for passenger in self.passengers.values_mut() {
            match passenger.state {
                TripState::Waiting => passenger.waiting_ticks += 1,
                TripState::InTrip if on_board_at_start.contains(&passenger.id) => {
                    passenger.travel_ticks += 1
                }
                TripState::InTrip => passenger.waiting_ticks += 1,
                TripState::Finished => {}
            }
        }

        // Finished trips were recorded at drop-off time.
        self.passengers.retain(|_, p| p.state != TripState::Finished);

        let done = self.passengers.is_empty();
        Ok(StepResult {
            observation: self.observation(),
            done,
        })
    }

    /// Hand the current snapshot to the injected renderer, if any.
    pub fn render(&mut self) {
        if self.renderer.is_none() {
            return;
        }
        let snapshot = self.observation();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&snapshot, self.tick);
        }
    }

    pub fn observation(&self) -> Observation {
        Observation {
            map: Arc::clone(&self.map),
            taxis: self.taxis.clone(),
            passengers: self.passengers.values().cloned().collect(),
        }
    }

    fn create_taxi(&mut self, id: TaxiId) -> Result<Taxi, SimulationError> {
        let occupied: HashSet<Position> = self.taxis.iter().map(|t| t.position).collect();
        let free: Vec<Position> = self
            .map
            .drivable_positions()
            .into_iter()
            .filter(|p| !occupied.contains(p))
            .collect();
        if free.is_empty() {
            return Err(SimulationError::ResourceExhausted {
                cell_kind: "road",
                entity: "taxi",
            });
        }
        let position = free[self.rng.gen_range(0..free.len())];
        let heading = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        Ok(Taxi::new(id, position, heading))
    }

    fn create_passenger(&mut self, id: PassengerId) -> Result<Passenger, SimulationError> {
        let mut occupied: HashSet<Position> = HashSet::new();
        for p in self.passengers.values() {
            occupied.insert(p.pickup);
            occupied.insert(p.drop_off);
        }
        let mut free: Vec<Position> = self
            .map
            .boardable_positions()
            .into_iter()
            .filter(|p| !occupied.contains(p))
            .collect();
        if free.len() < 2 {
            return Err(SimulationError::ResourceExhausted {
                cell_kind: "boardable sidewalk",
                entity: "passenger",
            });
        }
        let pickup = free.remove(self.rng.gen_range(0..free.len()));
        let drop_off = free[self.rng.gen_range(0..free.len())];
        Ok(Passenger::new(id, pickup, drop_off))
    }

    /// A blocked move still turns the taxi towards the obstruction and still
    /// counts as attempted distance.
    fn move_taxi(&mut self, index: usize, direction: Direction) {
        let taxi = &mut self.taxis[index];
        let target = direction.step(taxi.position);
        if self.map.is_road(target) {
            taxi.position = target;
        }
        taxi.heading = direction;
        taxi.distance += 1;
    }

    /// Board the lowest-id waiting passenger whose pickup cell equals or is
    /// adjacent to the taxi's position. No-op for a carrying taxi or when no
    /// passenger is in reach.
    fn pick_up(&mut self, index: usize) {
        let taxi = &mut self.taxis[index];
        if taxi.passenger.is_some() {
            return;
        }
        let position = taxi.position;
        let candidate = self.passengers.values_mut().find(|p| {
            p.state == TripState::Waiting
                && (p.pickup == position || p.pickup.is_adjacent_to(position))
        });
        if let Some(passenger) = candidate {
            passenger.state = TripState::InTrip;
            taxi.passenger = Some(passenger.id);
            debug!(
                "t={} taxi {} picked up passenger {}",
                self.tick, index, passenger.id.0
            );
        }
    }

    /// Set the carried passenger down on a sidewalk at or adjacent to the
    /// taxi. Landing on the designated drop-off finishes the trip; anywhere
    /// else is a partial ride and the passenger waits again there. No-op for
    /// an idle taxi or when no sidewalk is in reach.
    fn drop_off(&mut self, index: usize) {
        let taxi = &mut self.taxis[index];
        let Some(passenger_id) = taxi.passenger else {
            return;
        };
        let Some(passenger) = self.passengers.get_mut(&passenger_id) else {
            return;
        };
        let Some(resolved) = resolve_drop_cell(&self.map, taxi.position, passenger.drop_off)
        else {
            return;
        };

        if resolved == passenger.drop_off {
            passenger.state = TripState::Finished;
            self.completed.push(CompletedTrip {
                passenger: passenger_id,
                waiting_ticks: passenger.waiting_ticks,
                travel_ticks: passenger.travel_ticks,
            });
            debug!(
                "t={} taxi {} delivered passenger {}",
                self.tick, index, passenger_id.0
            );
        } else {
            passenger.state = TripState::Waiting;
            passenger.pickup = resolved;
            debug!(
                "t={} taxi {} set passenger {} down at ({}, {})",
                self.tick, index, passenger_id.0, resolved.x, resolved.y
            );
        }
        taxi.passenger = None;
    }
}

/// Sidewalk cell a drop-off at `position` lands on: the designated
/// `drop_off` when it is at or adjacent to the taxi, otherwise the first
/// adjacent sidewalk in the fixed scan order. `None` when the taxi has no
/// sidewalk in reach at all.
fn resolve_drop_cell(map: &GridMap, position: Position, drop_off: Position) -> Option<Position> {
    if drop_off == position || drop_off.is_adjacent_to(position) {
        return Some(drop_off);
    }
    map.adjacent(position, Some(Cell::Sidewalk)).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ring_map;

    fn taxi_at(x: i32, y: i32) -> Taxi {
        Taxi::new(TaxiId(0), Position::new(x, y), Direction::Up)
    }

    fn single_taxi_env(taxi: Taxi, passengers: Vec<Passenger>) -> Environment {
        Environment::from_parts(ring_map(), vec![taxi], passengers)
    }

    #[test]
    fn reset_places_taxis_on_distinct_road_cells() {
        let mut env = Environment::new(ring_map(), 4, 3, Some(7));
        let obs = env.reset().expect("reset succeeds");
        let mut seen = HashSet::new();
        assert_eq!(obs.taxis.len(), 4);
        for taxi in &obs.taxis {
            assert!(obs.map.is_road(taxi.position));
            assert!(seen.insert(taxi.position), "taxi positions must be distinct");
        }
    }

    #[test]
    fn reset_places_passengers_on_distinct_boardable_cells() {
        let mut env = Environment::new(ring_map(), 1, 4, Some(11));
        let obs = env.reset().expect("reset succeeds");
        let mut seen = HashSet::new();
        assert_eq!(obs.passengers.len(), 4);
        for passenger in &obs.passengers {
            assert_ne!(passenger.pickup, passenger.drop_off);
            for p in [passenger.pickup, passenger.drop_off] {
                assert!(obs.map.is_sidewalk(p));
                assert!(obs.map.has_adjacent(p, Cell::Road));
                assert!(seen.insert(p), "pickup/drop-off cells must be disjoint");
            }
        }
    }

    #[test]
    fn reset_fails_when_the_map_cannot_hold_the_fleet() {
        // The ring map has 8 road cells.
        let mut env = Environment::new(ring_map(), 9, 1, Some(1));
        assert_eq!(
            env.reset().map(|_| ()),
            Err(SimulationError::ResourceExhausted {
                cell_kind: "road",
                entity: "taxi",
            })
        );
    }

    #[test]
    fn mismatched_action_count_fails_without_state_change() {
        let mut env = Environment::new(ring_map(), 2, 2, Some(3));
        env.reset().expect("reset succeeds");
        let before = env.observation();

        let result = env.step(&[Action::Stay]);
        assert_eq!(
            result.map(|_| ()),
            Err(SimulationError::ActionCountMismatch { expected: 2, got: 1 })
        );
        assert_eq!(env.tick(), 0);
        let after = env.observation();
        assert_eq!(before.taxis, after.taxis);
        assert_eq!(before.passengers, after.passengers);
    }

    #[test]
    fn blocked_move_updates_heading_and_distance_but_not_position() {
        // (1, 1) is a road cell with sidewalk above it.
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 1),
        )]);
        let step = env.step(&[Action::Up]).expect("step succeeds");
        let taxi = &step.observation.taxis[0];
        assert_eq!(taxi.position, Position::new(1, 1));
        assert_eq!(taxi.heading, Direction::Up);
        assert_eq!(taxi.distance, 1);
    }

    #[test]
    fn open_move_displaces_the_taxi() {
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 1),
        )]);
        let step = env.step(&[Action::Right]).expect("step succeeds");
        let taxi = &step.observation.taxis[0];
        assert_eq!(taxi.position, Position::new(2, 1));
        assert_eq!(taxi.heading, Direction::Right);
        assert_eq!(taxi.distance, 1);
    }

    #[test]
    fn pick_up_boards_the_lowest_id_adjacent_passenger() {
        let passengers = vec![
            Passenger::new(PassengerId(0), Position::new(0, 1), Position::new(4, 3)),
            Passenger::new(PassengerId(1), Position::new(1, 0), Position::new(4, 1)),
        ];
        // (1, 1) is adjacent to both pickups.
        let mut env = single_taxi_env(taxi_at(1, 1), passengers);
        let step = env.step(&[Action::PickUp]).expect("step succeeds");
        assert_eq!(step.observation.taxis[0].passenger, Some(PassengerId(0)));
        assert_eq!(
            step.observation.passenger(PassengerId(0)).expect("active").state,
            TripState::InTrip
        );
        assert_eq!(
            step.observation.passenger(PassengerId(1)).expect("active").state,
            TripState::Waiting
        );
    }

    #[test]
    fn immediate_drop_off_reverts_to_waiting_with_zero_travel() {
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 3),
        )]);
        env.step(&[Action::PickUp]).expect("pick up");
        let step = env.step(&[Action::DropOff]).expect("drop off");

        let passenger = step.observation.passenger(PassengerId(0)).expect("active");
        assert_eq!(passenger.state, TripState::Waiting);
        assert_eq!(passenger.travel_ticks, 0);
        // Set down on the first adjacent sidewalk: the pickup moved there.
        assert!(step.observation.map.is_sidewalk(passenger.pickup));
        assert!(passenger.pickup.is_adjacent_to(Position::new(1, 1)));
        assert!(step.observation.taxis[0].is_idle());
        assert!(!step.done);
    }

    #[test]
    fn drop_off_at_the_destination_finishes_the_trip() {
        // Taxi adjacent to the pickup; destination (0, 3) is adjacent to the
        // road cell (1, 3).
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(0, 3),
        )]);
        env.step(&[Action::PickUp]).expect("pick up");
        env.step(&[Action::Down]).expect("move");
        env.step(&[Action::Down]).expect("move");
        let step = env.step(&[Action::DropOff]).expect("drop off");

        assert!(step.done);
        assert!(step.observation.passengers.is_empty());
        assert_eq!(env.completed_trips().len(), 1);
        let trip = env.completed_trips()[0];
        assert_eq!(trip.passenger, PassengerId(0));
        // Picked up on tick 1, dropped on tick 4: two full on-board ticks.
        assert_eq!(trip.travel_ticks, 2);
        assert_eq!(trip.waiting_ticks, 1);
    }

    #[test]
    fn drop_off_without_a_passenger_is_a_no_op() {
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 3),
        )]);
        let step = env.step(&[Action::DropOff]).expect("step succeeds");
        assert!(step.observation.taxis[0].is_idle());
        assert_eq!(
            step.observation.passenger(PassengerId(0)).expect("active").state,
            TripState::Waiting
        );
    }

    #[test]
    fn waiting_and_travel_counters_advance_with_state() {
        let mut env = single_taxi_env(taxi_at(3, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 3),
        )]);
        env.step(&[Action::Stay]).expect("step");
        env.step(&[Action::Stay]).expect("step");
        let obs = env.observation();
        let passenger = obs.passenger(PassengerId(0)).expect("active");
        assert_eq!(passenger.waiting_ticks, 2);
        assert_eq!(passenger.travel_ticks, 0);
    }

    #[test]
    fn terminal_exactly_when_the_last_passenger_finishes() {
        let mut env = single_taxi_env(taxi_at(1, 1), vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(0, 3),
        )]);
        let step = env.step(&[Action::PickUp]).expect("step");
        assert!(!step.done);
        env.step(&[Action::Down]).expect("step");
        let step = env.step(&[Action::Down]).expect("step");
        assert!(!step.done);
        let step = env.step(&[Action::DropOff]).expect("step");
        assert!(step.done);
        assert!(env.done());
    }
}
