//! Breadth-first shortest-path solver.
//!
//! Neighbours are explored in N, E, S, W order and the first visit wins,
//! so solving the same maze twice always yields the same path.

use std::collections::VecDeque;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::UnsolvableError;
use crate::grid::{Coord, Direction};
use crate::maze::Maze;

/// A sequence of moves, written as `N`/`E`/`S`/`W` symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Direction>);

impl Path {
    pub fn new(moves: Vec<Direction>) -> Self {
        Self(moves)
    }

    /// Parse a symbol string; `None` on any unknown character.
    pub fn from_symbols(s: &str) -> Option<Self> {
        s.chars().map(Direction::from_symbol).collect::<Option<Vec<_>>>().map(Path)
    }

    pub fn moves(&self) -> &[Direction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Where the path ends when followed from `start`, ignoring walls.
    /// `None` if a move would leave the non-negative quadrant.
    pub fn end_point(&self, start: Coord) -> Option<Coord> {
        self.0.iter().try_fold(start, |c, &dir| c.step(dir))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dir in &self.0 {
            write!(f, "{}", dir.symbol())?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Find the shortest path from the maze entry to its exit.
pub fn solve(maze: &Maze) -> Result<Path, UnsolvableError> {
    let start = maze.entry();
    let goal = maze.exit();

    if maze.is_closed(start) {
        return Err(UnsolvableError::EntryClosed(start));
    }
    if maze.is_closed(goal) {
        return Err(UnsolvableError::ExitClosed(goal));
    }

    let grid = maze.grid();
    let index = |c: Coord| c.y * maze.width() + c.x;

    // predecessor and the move that led here, per cell
    let mut prev: Vec<Option<(Coord, Direction)>> = vec![None; maze.width() * maze.height()];
    let mut seen = vec![false; maze.width() * maze.height()];
    seen[index(start)] = true;
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for (dir, next) in grid.neighbors(current) {
            if grid.has_wall(current, dir) || maze.is_closed(next) || seen[index(next)] {
                continue;
            }
            seen[index(next)] = true;
            prev[index(next)] = Some((current, dir));
            queue.push_back(next);
        }
    }

    if !seen[index(goal)] {
        return Err(UnsolvableError::NoPath {
            entry: start,
            exit: goal,
        });
    }

    let mut moves = Vec::new();
    let mut cursor = goal;
    while let Some((parent, dir)) = prev[index(cursor)] {
        moves.push(dir);
        cursor = parent;
    }
    moves.reverse();
    Ok(Path(moves))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use std::collections::BTreeSet;

    fn corridor(width: usize) -> Grid {
        let mut grid = Grid::closed(width, 1);
        for x in 0..width - 1 {
            grid.set_wall_between(Coord::new(x, 0), Coord::new(x + 1, 0), false)
                .unwrap();
        }
        grid
    }

    #[test]
    fn test_straight_corridor() {
        let maze = Maze::new(corridor(4), Coord::new(0, 0), Coord::new(3, 0), BTreeSet::new());
        let path = solve(&maze).unwrap();
        assert_eq!(path.to_string(), "EEE");
        assert_eq!(path.end_point(maze.entry()), Some(maze.exit()));

        let back = Maze::new(corridor(4), Coord::new(3, 0), Coord::new(1, 0), BTreeSet::new());
        assert_eq!(solve(&back).unwrap().to_string(), "WW");
    }

    #[test]
    fn test_tie_break_prefers_north_then_east() {
        // fully open 2x2: both EN and NE are shortest from (0,1) to (1,0)
        let mut grid = Grid::closed(2, 2);
        let edges: [((usize, usize), (usize, usize)); 4] =
            [((0, 0), (1, 0)), ((0, 1), (1, 1)), ((0, 0), (0, 1)), ((1, 0), (1, 1))];
        for (a, b) in edges {
            grid.set_wall_between(a.into(), b.into(), false).unwrap();
        }
        let maze = Maze::new(grid, Coord::new(0, 1), Coord::new(1, 0), BTreeSet::new());
        assert_eq!(solve(&maze).unwrap().to_string(), "NE");
        assert_eq!(solve(&maze).unwrap(), solve(&maze).unwrap());
    }

    #[test]
    fn test_walls_block() {
        let maze = Maze::new(Grid::closed(3, 3), Coord::new(0, 0), Coord::new(2, 2), BTreeSet::new());
        assert_eq!(
            solve(&maze),
            Err(UnsolvableError::NoPath {
                entry: Coord::new(0, 0),
                exit: Coord::new(2, 2),
            })
        );
    }

    #[test]
    fn test_closed_endpoints() {
        let mut closed = BTreeSet::new();
        closed.insert(Coord::new(3, 0));
        let maze = Maze::new(corridor(4), Coord::new(0, 0), Coord::new(3, 0), closed.clone());
        assert_eq!(solve(&maze), Err(UnsolvableError::ExitClosed(Coord::new(3, 0))));

        let maze = Maze::new(corridor(4), Coord::new(3, 0), Coord::new(0, 0), closed);
        assert_eq!(solve(&maze), Err(UnsolvableError::EntryClosed(Coord::new(3, 0))));
    }

    #[test]
    fn test_closed_cell_is_not_crossed_even_if_open() {
        let mut closed = BTreeSet::new();
        closed.insert(Coord::new(1, 0));
        let maze = Maze::new(corridor(3), Coord::new(0, 0), Coord::new(2, 0), closed);
        assert!(matches!(solve(&maze), Err(UnsolvableError::NoPath { .. })));
    }

    #[test]
    fn test_path_symbols() {
        let path = Path::from_symbols("NESW").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.end_point(Coord::new(1, 1)), Some(Coord::new(1, 1)));
        assert_eq!(Path::from_symbols("W").unwrap().end_point(Coord::new(0, 0)), None);
        assert!(Path::from_symbols("NX").is_none());
        assert!(Path::from_symbols("").unwrap().is_empty());
    }
}
