//! The world data model: taxis, passengers and the actions taxis perform.

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Position};

/// Stable taxi identifier, equal to the taxi's fleet index for the episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TaxiId(pub usize);

/// Unique passenger identifier within an episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PassengerId(pub usize);

/// Everything a taxi can do in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
    PickUp,
    DropOff,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
        Action::PickUp,
        Action::DropOff,
    ];

    /// The movement direction for a directional action, `None` otherwise.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::Stay | Action::PickUp | Action::DropOff => None,
        }
    }

    pub fn from_direction(direction: Direction) -> Action {
        match direction {
            Direction::Up => Action::Up,
            Direction::Down => Action::Down,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }
}

/// Lifecycle stage of a passenger's trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripState {
    Waiting,
    InTrip,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxi {
    pub id: TaxiId,
    /// Always a road cell.
    pub position: Position,
    pub heading: Direction,
    /// The passenger on board, if any, resolved against the environment's
    /// passenger registry. A taxi carries at most one.
    pub passenger: Option<PassengerId>,
    /// Directional actions issued so far, whether or not they displaced the
    /// taxi (attempted distance).
    pub distance: u32,
}

impl Taxi {
    pub fn new(id: TaxiId, position: Position, heading: Direction) -> Self {
        Self {
            id,
            position,
            heading,
            passenger: None,
            distance: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.passenger.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    /// Boardable sidewalk cell the passenger waits at. Moves when a partial
    /// ride sets the passenger down short of its destination.
    pub pickup: Position,
    /// Boardable sidewalk cell the passenger wants to reach. Never equal to
    /// `pickup` while the passenger is active.
    pub drop_off: Position,
    pub state: TripState,
    /// Ticks spent waiting at the curb since creation.
    pub waiting_ticks: u32,
    /// Full ticks spent on board since creation.
    pub travel_ticks: u32,
}

impl Passenger {
    pub fn new(id: PassengerId, pickup: Position, drop_off: Position) -> Self {
        Self {
            id,
            pickup,
            drop_off,
            state: TripState::Waiting,
            waiting_ticks: 0,
            travel_ticks: 0,
        }
    }
}

/// Waiting/travel totals recorded when a passenger reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletedTrip {
    pub passenger: PassengerId,
    pub waiting_ticks: u32,
    pub travel_ticks: u32,
}
