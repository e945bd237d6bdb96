//! Error taxonomy: fatal environment errors and the recoverable routing miss.

use thiserror::Error;

use crate::grid::Position;

/// Fatal simulation errors. Both variants indicate a caller contract
/// violation or a misconfigured scenario and must stop the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimulationError {
    /// `step` received the wrong number of actions for the fleet.
    #[error("expected {expected} actions for {expected} taxis, got {got}")]
    ActionCountMismatch { expected: usize, got: usize },
    /// Not enough free cells to place an entity at reset time; the map is
    /// too small for the configured fleet or passenger count.
    #[error("not enough free {cell_kind} cells to place a {entity}")]
    ResourceExhausted {
        cell_kind: &'static str,
        entity: &'static str,
    },
}

/// Route search failure: no road cell adjacent to the target is reachable
/// from the source. Recoverable; dispatch policies substitute `Stay`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no road path from ({}, {}) to a cell adjacent to ({}, {})", from.x, from.y, to.x, to.y)]
pub struct NoPath {
    pub from: Position,
    pub to: Position,
}
