//! Small hand-drawn maps shared by unit tests and benchmarks.
//!
//! Compiled behind the `test-helpers` feature so downstream crates can use
//! the same fixtures in their own tests.

use crate::grid::GridMap;

/// A 5x5 map whose roads form a ring with one interior sidewalk cell:
///
/// ```text
/// .....
/// .###.
/// .#.#.
/// .###.
/// .....
/// ```
///
/// Every sidewalk cell on the inner border is reachable, which makes it a
/// convenient arena for pickup and drop-off scenarios.
pub fn ring_map() -> GridMap {
    GridMap::from_ascii(
        ".....\n\
         .###.\n\
         .#.#.\n\
         .###.\n\
         .....",
    )
}
