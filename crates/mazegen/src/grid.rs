//! Grid model: coordinates, directions and per-cell wall bitmasks.
//!
//! Each cell stores a 4-bit mask of CLOSED walls:
//! bit 0 = North, bit 1 = East, bit 2 = South, bit 3 = West.
//! A set bit means the wall in that direction is closed.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// Cell coordinate. `x` is the column, `y` is the row, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in `dir`, or `None` if it would go negative.
    /// Upper bounds are the grid's business, see [`Grid::neighbor`].
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        Some(Coord {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord::new(x, y)
    }
}

/// True if `(x, y)` lies inside a `width` x `height` grid.
pub fn in_bounds(coord: Coord, width: usize, height: usize) -> bool {
    coord.x < width && coord.y < height
}

/// Orthogonal direction. Declaration order is the neighbour enumeration
/// order everywhere in the crate (N, E, S, W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1 << 0,
            Direction::East => 1 << 1,
            Direction::South => 1 << 2,
            Direction::West => 1 << 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Single-letter symbol used in solved paths.
    pub fn symbol(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_symbol(c: char) -> Option<Direction> {
        match c {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Return the direction from `a` to its orthogonal neighbour `b`.
pub fn direction_between(a: Coord, b: Coord) -> Result<Direction, ConfigError> {
    Direction::ALL
        .into_iter()
        .find(|&dir| a.step(dir) == Some(b))
        .ok_or(ConfigError::NotNeighbors { a, b })
}

/// Closed-wall bitmask of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallMask(u8);

impl WallMask {
    pub const OPEN: WallMask = WallMask(0);
    pub const ALL_WALLS: WallMask = WallMask(0b1111);

    /// Build from raw bits; anything above the low nibble is dropped.
    pub fn from_bits(bits: u8) -> Self {
        WallMask(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has_wall(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Copy of this mask with the wall in `dir` closed or opened.
    pub fn with_wall(self, dir: Direction, closed: bool) -> Self {
        if closed {
            WallMask(self.0 | dir.bit())
        } else {
            WallMask(self.0 & !dir.bit())
        }
    }

    pub fn is_fully_closed(self) -> bool {
        self == WallMask::ALL_WALLS
    }

    /// Uppercase hex digit, as written in export files.
    pub fn hex_digit(self) -> char {
        // the low nibble always maps to a digit
        char::from_digit(u32::from(self.0), 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('F')
    }
}

impl Default for WallMask {
    fn default() -> Self {
        WallMask::ALL_WALLS
    }
}

/// In-bounds neighbours of a cell, in N, E, S, W order.
pub type Neighbors = SmallVec<[(Direction, Coord); 4]>;

/// Rectangular, fully populated wall grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<WallMask>,
}

impl Grid {
    /// A grid with every wall of every cell closed.
    pub fn closed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WallMask::ALL_WALLS; width * height],
        }
    }

    /// Build from explicit rows. Rows must all have the same length.
    pub fn from_rows(rows: Vec<Vec<WallMask>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        in_bounds(coord, self.width, self.height)
    }

    #[inline]
    fn index_of(&self, coord: Coord) -> usize {
        coord.y * self.width + coord.x
    }

    /// Mask of an in-bounds cell. Panics on out-of-bounds access like slice indexing.
    #[inline]
    pub fn get(&self, coord: Coord) -> WallMask {
        self.cells[self.index_of(coord)]
    }

    #[inline]
    pub fn set(&mut self, coord: Coord, mask: WallMask) {
        let index = self.index_of(coord);
        self.cells[index] = mask;
    }

    pub fn has_wall(&self, coord: Coord, dir: Direction) -> bool {
        self.get(coord).has_wall(dir)
    }

    /// Change one side of a cell only. Callers carving passages want
    /// [`Grid::set_wall_between`] instead.
    pub fn set_wall(&mut self, coord: Coord, dir: Direction, closed: bool) {
        let mask = self.get(coord).with_wall(dir, closed);
        self.set(coord, mask);
    }

    pub fn neighbor(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        coord.step(dir).filter(|&c| self.in_bounds(c))
    }

    pub fn neighbors(&self, coord: Coord) -> Neighbors {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.neighbor(coord, dir).map(|c| (dir, c)))
            .collect()
    }

    /// Open or close the wall shared by two orthogonal neighbours, on both sides.
    pub fn set_wall_between(&mut self, a: Coord, b: Coord, closed: bool) -> Result<(), ConfigError> {
        for c in [a, b] {
            if !self.in_bounds(c) {
                return Err(ConfigError::OutOfBounds {
                    role: "cell",
                    coord: c,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        let dir = direction_between(a, b)?;
        self.set_wall(a, dir, closed);
        self.set_wall(b, dir.opposite(), closed);
        Ok(())
    }

    /// True if the passage between two orthogonal neighbours is open.
    pub fn is_open_between(&self, a: Coord, b: Coord) -> Result<bool, ConfigError> {
        let dir = direction_between(a, b)?;
        Ok(!self.has_wall(a, dir))
    }

    /// Rows of masks, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[WallMask]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_and_bits() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.bit(), dir.opposite().bit());
        }
        let sum: u8 = Direction::ALL.iter().map(|d| d.bit()).sum();
        assert_eq!(sum, WallMask::ALL_WALLS.bits());
    }

    #[test]
    fn test_mask_wall_toggle() {
        let mask = WallMask::ALL_WALLS.with_wall(Direction::East, false);
        assert!(!mask.has_wall(Direction::East));
        assert!(mask.has_wall(Direction::North));
        assert_eq!(mask.bits(), 0b1101);
        assert_eq!(mask.hex_digit(), 'D');
        assert!(mask.with_wall(Direction::East, true).is_fully_closed());
        assert_eq!(WallMask::OPEN.hex_digit(), '0');
    }

    #[test]
    fn test_direction_between() {
        let c = Coord::new(2, 2);
        assert_eq!(direction_between(c, Coord::new(2, 1)).unwrap(), Direction::North);
        assert_eq!(direction_between(c, Coord::new(3, 2)).unwrap(), Direction::East);
        assert_eq!(direction_between(c, Coord::new(2, 3)).unwrap(), Direction::South);
        assert_eq!(direction_between(c, Coord::new(1, 2)).unwrap(), Direction::West);
        assert!(matches!(
            direction_between(c, Coord::new(3, 3)),
            Err(ConfigError::NotNeighbors { .. })
        ));
        assert!(direction_between(c, c).is_err());
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = Grid::closed(3, 2);
        let n = grid.neighbors(Coord::new(0, 0));
        assert_eq!(
            n.as_slice(),
            &[
                (Direction::East, Coord::new(1, 0)),
                (Direction::South, Coord::new(0, 1)),
            ]
        );
        let n = grid.neighbors(Coord::new(1, 1));
        assert_eq!(n.len(), 3);
        assert_eq!(n[0], (Direction::North, Coord::new(1, 0)));
    }

    #[test]
    fn test_set_wall_between_is_symmetric() {
        let mut grid = Grid::closed(3, 3);
        let a = Coord::new(1, 1);
        let b = Coord::new(1, 2);
        grid.set_wall_between(a, b, false).unwrap();
        assert!(!grid.has_wall(a, Direction::South));
        assert!(!grid.has_wall(b, Direction::North));
        assert!(grid.is_open_between(b, a).unwrap());

        grid.set_wall_between(b, a, true).unwrap();
        assert!(grid.get(a).is_fully_closed());
        assert!(grid.get(b).is_fully_closed());

        assert!(grid.set_wall_between(a, Coord::new(3, 1), false).is_err());
        assert!(grid.set_wall_between(a, Coord::new(0, 0), false).is_err());
    }

    #[test]
    fn test_rows_shape() {
        let grid = Grid::closed(4, 3);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 4));
        assert_eq!(grid.coords().count(), 12);
        assert!(Grid::from_rows(vec![vec![WallMask::OPEN; 2], vec![WallMask::OPEN; 3]]).is_none());
    }
}
