//! Static city topology: cell classification and adjacency queries.
//!
//! A [`GridMap`] is a fixed 2-D array of [`Cell`] built once per scenario and
//! never mutated afterwards. All queries are pure and never fail: positions
//! outside the map are simply neither road nor sidewalk.

use serde::{Deserialize, Serialize};

/// A pair of grid coordinates.
///
/// Carries no validity on its own; whether it lies inside a map, on a road
/// or on a sidewalk is always relative to a [`GridMap`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position one cell up. The grid is row-major with y growing downwards,
    /// so "up" decrements y.
    pub fn up(self) -> Self {
        Self { x: self.x, y: self.y - 1 }
    }

    pub fn down(self) -> Self {
        Self { x: self.x, y: self.y + 1 }
    }

    pub fn left(self) -> Self {
        Self { x: self.x - 1, y: self.y }
    }

    pub fn right(self) -> Self {
        Self { x: self.x + 1, y: self.y }
    }

    /// The four cardinal neighbors, always in up/down/left/right order.
    /// Route search and drop-off resolution rely on this fixed order for
    /// deterministic tie-breaking.
    pub fn neighbors(self) -> [Position; 4] {
        [self.up(), self.down(), self.left(), self.right()]
    }

    pub fn is_adjacent_to(self, other: Position) -> bool {
        self.neighbors().contains(&other)
    }
}

/// One of the four cardinal headings a taxi can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The neighbor of `from` one step this way.
    pub fn step(self, from: Position) -> Position {
        match self {
            Direction::Up => from.up(),
            Direction::Down => from.down(),
            Direction::Left => from.left(),
            Direction::Right => from.right(),
        }
    }

    /// Direction that takes `from` to `to`, if the two are adjacent.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.step(from) == to)
    }
}

/// Static classification of a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Drivable by taxis.
    Road,
    /// Where passengers wait or are dropped off; not drivable.
    Sidewalk,
}

/// Fixed road/sidewalk layout of the city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    width: i32,
    height: i32,
    /// Row-major: `cells[y * width + x]`.
    cells: Vec<Cell>,
}

impl GridMap {
    /// Build from row-major rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.len() as i32);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in &rows {
            assert_eq!(
                row.len() as i32,
                width,
                "all map rows must have the same length"
            );
            cells.extend_from_slice(row);
        }
        Self { width, height, cells }
    }

    /// Parse a map from ascii art: `#` is road, anything else is sidewalk.
    pub fn from_ascii(art: &str) -> Self {
        let rows = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| if c == '#' { Cell::Road } else { Cell::Sidewalk })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_inside(&self, p: Position) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn cell(&self, p: Position) -> Option<Cell> {
        if !self.is_inside(p) {
            return None;
        }
        Some(self.cells[(p.y * self.width + p.x) as usize])
    }

    pub fn is_road(&self, p: Position) -> bool {
        self.cell(p) == Some(Cell::Road)
    }

    pub fn is_sidewalk(&self, p: Position) -> bool {
        self.cell(p) == Some(Cell::Sidewalk)
    }

    /// 4-neighbors of `p` clipped to the map bounds, optionally filtered to a
    /// single cell type. Enumeration keeps the fixed up/down/left/right order.
    pub fn adjacent(&self, p: Position, filter: Option<Cell>) -> Vec<Position> {
        p.neighbors()
            .into_iter()
            .filter(|adj| match filter {
                Some(cell) => self.cell(*adj) == Some(cell),
                None => self.is_inside(*adj),
            })
            .collect()
    }

    pub fn has_adjacent(&self, p: Position, cell: Cell) -> bool {
        p.neighbors().into_iter().any(|adj| self.cell(adj) == Some(cell))
    }

    pub fn all_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            for x in 0..self.width {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// All road cells: the positions a taxi may occupy.
    pub fn drivable_positions(&self) -> Vec<Position> {
        self.all_positions()
            .into_iter()
            .filter(|p| self.is_road(*p))
            .collect()
    }

    /// Boardable positions: sidewalk cells with at least one road neighbor,
    /// where a passenger may wait or be dropped off.
    pub fn boardable_positions(&self) -> Vec<Position> {
        self.all_positions()
            .into_iter()
            .filter(|p| self.is_sidewalk(*p) && self.has_adjacent(*p, Cell::Road))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_map() -> GridMap {
        GridMap::from_ascii(
            "...
             ###
             .#.",
        )
    }

    #[test]
    fn ascii_parsing_classifies_cells() {
        let map = cross_map();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert!(map.is_road(Position::new(0, 1)));
        assert!(map.is_road(Position::new(1, 2)));
        assert!(map.is_sidewalk(Position::new(0, 0)));
        assert!(map.is_sidewalk(Position::new(2, 2)));
    }

    #[test]
    fn positions_outside_the_map_are_neither_road_nor_sidewalk() {
        let map = cross_map();
        let outside = Position::new(-1, 0);
        assert!(!map.is_inside(outside));
        assert!(!map.is_road(outside));
        assert!(!map.is_sidewalk(outside));
    }

    #[test]
    fn adjacent_filters_and_clips() {
        let map = cross_map();
        let corner = Position::new(0, 0);
        // Up and left fall outside the map.
        assert_eq!(
            map.adjacent(corner, None),
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
        assert_eq!(
            map.adjacent(corner, Some(Cell::Road)),
            vec![Position::new(0, 1)]
        );
        assert_eq!(
            map.adjacent(corner, Some(Cell::Sidewalk)),
            vec![Position::new(1, 0)]
        );
    }

    #[test]
    fn boardable_positions_require_a_road_neighbor() {
        let map = cross_map();
        let boardable = map.boardable_positions();
        assert!(boardable.contains(&Position::new(0, 0)));
        assert!(boardable.contains(&Position::new(0, 2)));
        // Sidewalk cells with a road neighbor only; every '.' here has one.
        for p in &boardable {
            assert!(map.is_sidewalk(*p));
            assert!(map.has_adjacent(*p, Cell::Road));
        }
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let p = Position::new(1, 1);
        assert_eq!(
            p.neighbors(),
            [
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn direction_between_adjacent_positions() {
        let p = Position::new(1, 1);
        assert_eq!(Direction::between(p, p.up()), Some(Direction::Up));
        assert_eq!(Direction::between(p, p.right()), Some(Direction::Right));
        assert_eq!(Direction::between(p, Position::new(3, 3)), None);
    }
}
