//! Narrow interface to an injected render collaborator.
//!
//! Rendering implementations live outside the core; the environment only
//! hands them a snapshot once per tick.

use crate::environment::Observation;

/// Capability invoked by `Environment::render`.
pub trait Renderer {
    fn render(&mut self, observation: &Observation, tick: u64);
}
