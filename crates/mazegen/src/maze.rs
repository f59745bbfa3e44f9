//! Immutable maze snapshot returned by the generator.

use std::collections::{BTreeSet, VecDeque};

use serde::{Serialize, Serializer};

use crate::grid::{Coord, Direction, Grid, WallMask};

/// Side length of the open area forbidden in imperfect mazes.
pub const PLAZA_SIZE: usize = 3;

/// A finished maze. Built once by the generator and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maze {
    width: usize,
    height: usize,
    #[serde(serialize_with = "serialize_grid")]
    grid: Grid,
    entry: Coord,
    exit: Coord,
    closed: BTreeSet<Coord>,
}

fn serialize_grid<S: Serializer>(grid: &Grid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(grid.rows())
}

impl Maze {
    pub(crate) fn new(grid: Grid, entry: Coord, exit: Coord, closed: BTreeSet<Coord>) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            grid,
            entry,
            exit,
            closed,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entry(&self) -> Coord {
        self.entry
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    pub fn closed(&self) -> &BTreeSet<Coord> {
        &self.closed
    }

    pub fn is_closed(&self, coord: Coord) -> bool {
        self.closed.contains(&coord)
    }

    pub fn wall_mask(&self, coord: Coord) -> WallMask {
        self.grid.get(coord)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[WallMask]> {
        self.grid.rows()
    }

    pub fn walkable_count(&self) -> usize {
        self.width * self.height - self.closed.len()
    }

    /// Open internal passages between two walkable cells.
    pub fn open_edge_count(&self) -> usize {
        count_open_edges(&self.grid, |c| self.is_closed(c))
    }

    /// Number of walkable cells reachable from `start` through open walls.
    pub fn reachable_from(&self, start: Coord) -> usize {
        if !self.grid.in_bounds(start) || self.is_closed(start) {
            return 0;
        }
        flood_count(&self.grid, start, |c| self.is_closed(c))
    }

    /// True if any 3x3 block is fully walkable and fully open inside.
    pub fn has_open_plaza(&self) -> bool {
        if self.width < PLAZA_SIZE || self.height < PLAZA_SIZE {
            return false;
        }
        (0..=self.height - PLAZA_SIZE).any(|y0| {
            (0..=self.width - PLAZA_SIZE)
                .any(|x0| is_open_plaza(&self.grid, |c| self.is_closed(c), Coord::new(x0, y0)))
        })
    }
}

pub(crate) fn count_open_edges(grid: &Grid, is_closed: impl Fn(Coord) -> bool) -> usize {
    let mut edges = 0;
    for c in grid.coords() {
        if is_closed(c) {
            continue;
        }
        for dir in [Direction::East, Direction::South] {
            if let Some(n) = grid.neighbor(c, dir) {
                if !is_closed(n) && !grid.has_wall(c, dir) {
                    edges += 1;
                }
            }
        }
    }
    edges
}

pub(crate) fn flood_count(grid: &Grid, start: Coord, is_closed: impl Fn(Coord) -> bool) -> usize {
    let mut seen = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::from([start]);
    seen[start.y * grid.width() + start.x] = true;
    let mut count = 0;

    while let Some(c) = queue.pop_front() {
        count += 1;
        for (dir, n) in grid.neighbors(c) {
            let index = n.y * grid.width() + n.x;
            if seen[index] || is_closed(n) || grid.has_wall(c, dir) {
                continue;
            }
            seen[index] = true;
            queue.push_back(n);
        }
    }
    count
}

/// The 3x3 block with top-left `origin` is all walkable and has all 12
/// internal walls open. The block must lie inside the grid.
pub(crate) fn is_open_plaza(grid: &Grid, is_closed: impl Fn(Coord) -> bool, origin: Coord) -> bool {
    for dy in 0..PLAZA_SIZE {
        for dx in 0..PLAZA_SIZE {
            let c = Coord::new(origin.x + dx, origin.y + dy);
            if is_closed(c) {
                return false;
            }
            if dx + 1 < PLAZA_SIZE && grid.has_wall(c, Direction::East) {
                return false;
            }
            if dy + 1 < PLAZA_SIZE && grid.has_wall(c, Direction::South) {
                return false;
            }
        }
    }
    true
}
