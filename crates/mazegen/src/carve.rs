//! Spanning-tree carving strategies.
//!
//! Every strategy opens walls only through [`Grid::set_wall_between`],
//! never enters a closed cell, and returns how many walkable cells are
//! connected to the start cell once it is done.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::events::{MazeStep, StepKind, StepSink};
use crate::grid::{Coord, Direction, Grid, Neighbors};
use crate::maze::flood_count;

/// Which spanning-tree algorithm carves the maze.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Randomized iterative depth-first search (recursive backtracker).
    #[default]
    Dfs,
    /// Randomized Prim over a frontier of edges.
    Prim,
    /// Randomized Kruskal over a shuffled edge list.
    Kruskal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Dfs, Algorithm::Prim, Algorithm::Kruskal];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Prim => "prim",
            Algorithm::Kruskal => "kruskal",
        }
    }

    pub(crate) fn strategy(self) -> &'static dyn CarveStrategy {
        match self {
            Algorithm::Dfs => &Backtracker,
            Algorithm::Prim => &RandomPrim,
            Algorithm::Kruskal => &RandomKruskal,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown algorithm '{}' (expected dfs, prim or kruskal)", s))
    }
}

/// Row-major mask of permanently closed cells.
pub(crate) struct ClosedMask {
    width: usize,
    cells: Vec<bool>,
}

impl ClosedMask {
    pub(crate) fn new<'a>(width: usize, height: usize, closed: impl IntoIterator<Item = &'a Coord>) -> Self {
        let mut cells = vec![false; width * height];
        for c in closed {
            cells[c.y * width + c.x] = true;
        }
        Self { width, cells }
    }

    #[inline]
    pub(crate) fn contains(&self, c: Coord) -> bool {
        self.cells[c.y * self.width + c.x]
    }
}

pub(crate) trait CarveStrategy {
    fn carve(
        &self,
        grid: &mut Grid,
        closed: &ClosedMask,
        start: Coord,
        rng: &mut StdRng,
        sink: &mut StepSink<'_>,
    ) -> Result<usize, ConfigError>;
}

#[inline]
fn index_of(grid: &Grid, c: Coord) -> usize {
    c.y * grid.width() + c.x
}

fn walkable_neighbors(grid: &Grid, closed: &ClosedMask, c: Coord) -> Neighbors {
    grid.neighbors(c)
        .into_iter()
        .filter(|&(_, n)| !closed.contains(n))
        .collect()
}

/// Iterative recursive backtracker with an explicit stack.
pub(crate) struct Backtracker;

impl CarveStrategy for Backtracker {
    fn carve(
        &self,
        grid: &mut Grid,
        closed: &ClosedMask,
        start: Coord,
        rng: &mut StdRng,
        sink: &mut StepSink<'_>,
    ) -> Result<usize, ConfigError> {
        let mut visited = vec![false; grid.width() * grid.height()];
        visited[index_of(grid, start)] = true;
        let mut visited_count = 1;
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let candidates: Neighbors = walkable_neighbors(grid, closed, current)
                .into_iter()
                .filter(|&(_, n)| !visited[index_of(grid, n)])
                .collect();

            match candidates.choose(rng) {
                Some(&(_, next)) => {
                    grid.set_wall_between(current, next, false)?;
                    visited[index_of(grid, next)] = true;
                    visited_count += 1;
                    sink.emit(MazeStep::new(StepKind::Carve, Some(current), Some(next), visited_count));
                    stack.push(next);
                }
                None => {
                    stack.pop();
                    sink.emit(MazeStep::new(StepKind::Backtrack, Some(current), None, visited_count));
                }
            }
        }

        Ok(visited_count)
    }
}

/// Randomized Prim: grow the tree through a uniformly chosen frontier edge.
pub(crate) struct RandomPrim;

impl CarveStrategy for RandomPrim {
    fn carve(
        &self,
        grid: &mut Grid,
        closed: &ClosedMask,
        start: Coord,
        rng: &mut StdRng,
        sink: &mut StepSink<'_>,
    ) -> Result<usize, ConfigError> {
        let mut in_tree = vec![false; grid.width() * grid.height()];
        in_tree[index_of(grid, start)] = true;
        let mut visited_count = 1;

        let mut frontier: Vec<(Coord, Coord)> = walkable_neighbors(grid, closed, start)
            .into_iter()
            .map(|(_, n)| (start, n))
            .collect();

        while !frontier.is_empty() {
            let pick = rng.gen_range(0..frontier.len());
            let (from, to) = frontier.swap_remove(pick);
            if in_tree[index_of(grid, to)] {
                continue;
            }

            grid.set_wall_between(from, to, false)?;
            in_tree[index_of(grid, to)] = true;
            visited_count += 1;
            sink.emit(MazeStep::new(StepKind::Carve, Some(from), Some(to), visited_count));

            for (_, n) in walkable_neighbors(grid, closed, to) {
                if !in_tree[index_of(grid, n)] {
                    frontier.push((to, n));
                }
            }
        }

        Ok(visited_count)
    }
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

/// Randomized Kruskal: open shuffled edges that join two separate trees.
pub(crate) struct RandomKruskal;

impl CarveStrategy for RandomKruskal {
    fn carve(
        &self,
        grid: &mut Grid,
        closed: &ClosedMask,
        start: Coord,
        rng: &mut StdRng,
        sink: &mut StepSink<'_>,
    ) -> Result<usize, ConfigError> {
        let mut edges = Vec::new();
        for c in grid.coords() {
            if closed.contains(c) {
                continue;
            }
            for dir in [Direction::East, Direction::South] {
                if let Some(n) = grid.neighbor(c, dir) {
                    if !closed.contains(n) {
                        edges.push((c, n));
                    }
                }
            }
        }
        edges.shuffle(rng);

        let cell_count = grid.width() * grid.height();
        let mut sets = DisjointSet::new(cell_count);
        let mut touched = vec![false; cell_count];
        let mut touched_count = 0;

        for (a, b) in edges {
            let (ia, ib) = (index_of(grid, a), index_of(grid, b));
            if !sets.union(ia, ib) {
                continue;
            }
            grid.set_wall_between(a, b, false)?;
            for i in [ia, ib] {
                if !touched[i] {
                    touched[i] = true;
                    touched_count += 1;
                }
            }
            sink.emit(MazeStep::new(StepKind::Carve, Some(a), Some(b), touched_count));
        }

        Ok(flood_count(grid, start, |c| closed.contains(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::count_open_edges;
    use rand::SeedableRng;

    fn run(algorithm: Algorithm, width: usize, height: usize, seed: u64) -> (Grid, usize, Vec<MazeStep>) {
        let mut grid = Grid::closed(width, height);
        let closed = ClosedMask::new(width, height, std::iter::empty::<&Coord>());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut steps = Vec::new();
        let mut observer = |s: &MazeStep| steps.push(*s);
        let mut sink = StepSink::new(Some(&mut observer), 1).unwrap();
        let reached = algorithm
            .strategy()
            .carve(&mut grid, &closed, Coord::new(0, 0), &mut rng, &mut sink)
            .unwrap();
        drop(sink);
        (grid, reached, steps)
    }

    #[test]
    fn test_every_strategy_builds_spanning_tree() {
        for algorithm in Algorithm::ALL {
            let (grid, reached, _) = run(algorithm, 9, 6, 11);
            assert_eq!(reached, 54, "{}", algorithm);
            assert_eq!(count_open_edges(&grid, |_| false), 53, "{}", algorithm);
        }
    }

    #[test]
    fn test_dfs_events_balance() {
        let (_, reached, steps) = run(Algorithm::Dfs, 5, 4, 3);
        let carves = steps.iter().filter(|s| s.kind == StepKind::Carve).count();
        let backtracks = steps.iter().filter(|s| s.kind == StepKind::Backtrack).count();
        // every cell is pushed once and popped once
        assert_eq!(carves, reached - 1);
        assert_eq!(backtracks, reached);
        assert_eq!(steps.last().unwrap().visited, reached);
    }

    #[test]
    fn test_prim_and_kruskal_emit_no_backtracks() {
        for algorithm in [Algorithm::Prim, Algorithm::Kruskal] {
            let (_, reached, steps) = run(algorithm, 6, 6, 5);
            assert!(steps.iter().all(|s| s.kind == StepKind::Carve));
            assert_eq!(steps.len(), reached - 1);
        }
    }

    #[test]
    fn test_closed_cells_are_skipped() {
        let mut grid = Grid::closed(3, 3);
        let blocked = [Coord::new(1, 0), Coord::new(1, 1)];
        let closed = ClosedMask::new(3, 3, &blocked);
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = StepSink::new(None, 1).unwrap();
        let reached = Backtracker
            .carve(&mut grid, &closed, Coord::new(0, 0), &mut rng, &mut sink)
            .unwrap();
        assert_eq!(reached, 7);
        for c in blocked {
            assert!(grid.get(c).is_fully_closed());
        }
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("dfs".parse::<Algorithm>().unwrap(), Algorithm::Dfs);
        assert_eq!("Prim".parse::<Algorithm>().unwrap(), Algorithm::Prim);
        assert_eq!(" kruskal ".parse::<Algorithm>().unwrap(), Algorithm::Kruskal);
        assert!("eller".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::default(), Algorithm::Dfs);
    }
}
