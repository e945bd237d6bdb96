//! The dispatch capability and the navigation helpers every policy shares.

use crate::entities::{Action, Passenger, PassengerId, Taxi};
use crate::environment::Observation;
use crate::grid::{Direction, Position};
use crate::routing::RoutePlanner;

/// Decision strategy for a fleet of taxis.
///
/// [`decide`](Self::decide) produces one taxi's next action from the shared
/// observation. [`decide_all`](Self::decide_all) covers the whole fleet and
/// defaults to calling `decide` per taxi in index order; centralized
/// policies override it to coordinate across taxis within a tick.
pub trait DispatchPolicy: Send + Sync {
    fn decide(&mut self, observation: &Observation, taxi_index: usize) -> Action;

    fn decide_all(&mut self, observation: &Observation) -> Vec<Action> {
        (0..observation.taxis.len())
            .map(|taxi_index| self.decide(observation, taxi_index))
            .collect()
    }
}

/// Directional action advancing one step along `path`, or `terminal` when
/// the path is a single cell (the taxi is already adjacent to its target).
pub(crate) fn advance_along(path: &[Position], terminal: Action) -> Action {
    match path {
        [] | [_] => terminal,
        [current, next, ..] => match Direction::between(*current, *next) {
            Some(direction) => Action::from_direction(direction),
            None => Action::Stay,
        },
    }
}

/// The candidate whose pickup minimizes route length from `from`; ties fall
/// to the earlier candidate in iteration order. Unreachable pickups are
/// skipped, so an empty or fully unreachable candidate set yields `None`.
pub(crate) fn nearest_among<'a>(
    planner: &dyn RoutePlanner,
    observation: &Observation,
    from: Position,
    candidates: impl Iterator<Item = &'a Passenger>,
) -> Option<(PassengerId, Vec<Position>)> {
    let mut best: Option<(PassengerId, Vec<Position>)> = None;
    for passenger in candidates {
        let Ok(path) = planner.route(&observation.map, from, passenger.pickup) else {
            continue;
        };
        match &best {
            Some((_, best_path)) if best_path.len() <= path.len() => {}
            _ => best = Some((passenger.id, path)),
        }
    }
    best
}

/// Route a carrying taxi towards its passenger's drop-off, emitting the
/// drop-off once adjacent. Falls back to `Stay` when the passenger is gone
/// from the registry or the drop-off is unreachable.
pub(crate) fn toward_drop_off(
    planner: &dyn RoutePlanner,
    observation: &Observation,
    taxi: &Taxi,
) -> Action {
    let Some(id) = taxi.passenger else {
        return Action::Stay;
    };
    let Some(passenger) = observation.passenger(id) else {
        return Action::Stay;
    };
    match planner.route(&observation.map, taxi.position, passenger.drop_off) {
        Ok(path) => advance_along(&path, Action::DropOff),
        Err(_) => Action::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_along_emits_the_terminal_action_when_adjacent() {
        let path = vec![Position::new(1, 1)];
        assert_eq!(advance_along(&path, Action::PickUp), Action::PickUp);
        assert_eq!(advance_along(&path, Action::DropOff), Action::DropOff);
    }

    #[test]
    fn advance_along_steps_towards_the_next_cell() {
        let path = vec![Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)];
        assert_eq!(advance_along(&path, Action::PickUp), Action::Right);
        let path = vec![Position::new(1, 1), Position::new(1, 0)];
        assert_eq!(advance_along(&path, Action::PickUp), Action::Up);
    }
}
