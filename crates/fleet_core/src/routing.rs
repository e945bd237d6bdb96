//! Shortest-path search over the road subgraph.
//!
//! Routes connect a source road cell to a cell *adjacent to* the target: the
//! target itself, typically a sidewalk, is not traversable. The search is
//! breadth-first with unit edge weights, expanding neighbors in the fixed
//! up/down/left/right order, so for a fixed map the result is deterministic
//! and a true shortest path.
//!
//! Planners implement [`RoutePlanner`]; [`CachedPlanner`] wraps any planner
//! with an LRU cache of successful routes.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use pathfinding::directed::bfs::bfs;

use crate::error::NoPath;
use crate::grid::{Cell, GridMap, Position};

/// Default capacity for route caches.
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 5_000;

/// Capability to plan a route across a map. `Send + Sync` so one planner can
/// be shared by policies evaluated in parallel sweeps.
pub trait RoutePlanner: Send + Sync {
    /// Shortest forward-ordered sequence of road cells from `from`
    /// (inclusive) to a road cell adjacent to `to` (inclusive). A
    /// single-element path means `from` is already adjacent to `to`.
    fn route(&self, map: &GridMap, from: Position, to: Position) -> Result<Vec<Position>, NoPath>;
}

/// Breadth-first search over road cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct BfsPlanner;

impl RoutePlanner for BfsPlanner {
    fn route(&self, map: &GridMap, from: Position, to: Position) -> Result<Vec<Position>, NoPath> {
        bfs(
            &from,
            |p| map.adjacent(*p, Some(Cell::Road)),
            |p| p.is_adjacent_to(to),
        )
        .ok_or(NoPath { from, to })
    }
}

/// LRU-cached wrapper around a [`RoutePlanner`].
///
/// The cache key is the directional `(from, to)` pair. Only successful
/// routes are cached; a failed search is recomputed on the next query. The
/// cache assumes a fixed map, so build a fresh planner per map.
pub struct CachedPlanner<P> {
    inner: P,
    cache: Mutex<LruCache<(Position, Position), Vec<Position>>>,
}

impl<P: RoutePlanner> CachedPlanner<P> {
    pub fn new(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

impl Default for CachedPlanner<BfsPlanner> {
    fn default() -> Self {
        Self::new(BfsPlanner, DEFAULT_ROUTE_CACHE_CAPACITY)
    }
}

impl<P: RoutePlanner> RoutePlanner for CachedPlanner<P> {
    fn route(&self, map: &GridMap, from: Position, to: Position) -> Result<Vec<Position>, NoPath> {
        let key = (from, to);

        {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                // Mutex poisoned: fall back to the inner planner.
                Err(_) => return self.inner.route(map, from, to),
            };
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }

        let path = self.inner.route(map, from, to)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, path.clone());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 block of road with a sidewalk target in the corner.
    fn corner_map() -> GridMap {
        GridMap::from_ascii(
            "###
             ###
             ##.",
        )
    }

    #[test]
    fn route_stops_adjacent_to_the_target() {
        let map = corner_map();
        let path = BfsPlanner
            .route(&map, Position::new(0, 0), Position::new(2, 2))
            .expect("path exists");
        // Corner to opposite corner: 4 cells on the path, the full
        // source-to-target distance is 5 cells (4 moves).
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Position::new(0, 0));
        assert!(path[path.len() - 1].is_adjacent_to(Position::new(2, 2)));
        for cell in &path {
            assert!(map.is_road(*cell));
        }
    }

    #[test]
    fn route_is_simple() {
        let map = corner_map();
        let path = BfsPlanner
            .route(&map, Position::new(0, 0), Position::new(2, 2))
            .expect("path exists");
        for (i, a) in path.iter().enumerate() {
            for b in &path[i + 1..] {
                assert_ne!(a, b, "path must not repeat positions");
            }
        }
        // Consecutive cells are adjacent.
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent_to(pair[1]));
        }
    }

    #[test]
    fn route_is_a_single_cell_exactly_when_already_adjacent() {
        let map = corner_map();
        let adjacent = BfsPlanner
            .route(&map, Position::new(2, 1), Position::new(2, 2))
            .expect("path exists");
        assert_eq!(adjacent, vec![Position::new(2, 1)]);

        let not_adjacent = BfsPlanner
            .route(&map, Position::new(0, 0), Position::new(2, 2))
            .expect("path exists");
        assert!(not_adjacent.len() > 1);
    }

    #[test]
    fn route_is_deterministic_for_a_fixed_map() {
        let map = corner_map();
        let first = BfsPlanner.route(&map, Position::new(0, 0), Position::new(2, 2));
        let second = BfsPlanner.route(&map, Position::new(0, 0), Position::new(2, 2));
        assert_eq!(first, second);
    }

    #[test]
    fn disconnected_road_graph_reports_no_path() {
        // Two road islands separated by sidewalk.
        let map = GridMap::from_ascii(
            "#.#
             #.#
             #.#",
        );
        let result = BfsPlanner.route(&map, Position::new(0, 0), Position::new(2, 2));
        assert_eq!(
            result,
            Err(NoPath {
                from: Position::new(0, 0),
                to: Position::new(2, 2),
            })
        );
    }

    #[test]
    fn cached_planner_returns_the_same_routes() {
        let map = corner_map();
        let planner = CachedPlanner::default();
        let from = Position::new(0, 0);
        let to = Position::new(2, 2);
        let direct = BfsPlanner.route(&map, from, to).expect("path exists");
        let first = planner.route(&map, from, to).expect("path exists");
        let cached = planner.route(&map, from, to).expect("path exists");
        assert_eq!(direct, first);
        assert_eq!(first, cached);
    }
}
