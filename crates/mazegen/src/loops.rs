//! Extra passages for imperfect mazes.
//!
//! After carving, a handful of walls are knocked down to create cycles.
//! An opening is rejected when it would complete a fully open 3x3 block.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::carve::ClosedMask;
use crate::error::ConfigError;
use crate::events::{MazeStep, StepKind, StepSink};
use crate::grid::{Coord, Grid, Neighbors};
use crate::maze::{is_open_plaza, PLAZA_SIZE};

/// Roughly one extra passage per this many walkable cells.
const CELLS_PER_LOOP: usize = 25;
/// Attempts allowed per requested passage.
const ATTEMPTS_PER_LOOP: usize = 30;

/// How many loops were requested and how many were opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopReport {
    pub target: usize,
    pub opened: usize,
    pub attempts: usize,
}

impl LoopReport {
    pub fn reached_target(&self) -> bool {
        self.opened >= self.target
    }
}

pub(crate) fn loop_target(walkable: usize) -> usize {
    (walkable / CELLS_PER_LOOP).max(1)
}

/// True if any 3x3 block containing both `a` and `b` is fully open.
///
/// Only windows that can include the changed wall are scanned.
pub(crate) fn creates_open_plaza(grid: &Grid, closed: &ClosedMask, a: Coord, b: Coord) -> bool {
    if grid.width() < PLAZA_SIZE || grid.height() < PLAZA_SIZE {
        return false;
    }
    let span = PLAZA_SIZE - 1;
    let min_x = a.x.min(b.x).saturating_sub(span);
    let max_x = a.x.max(b.x).min(grid.width() - PLAZA_SIZE);
    let min_y = a.y.min(b.y).saturating_sub(span);
    let max_y = a.y.max(b.y).min(grid.height() - PLAZA_SIZE);

    (min_y..=max_y).any(|y0| {
        (min_x..=max_x).any(|x0| is_open_plaza(grid, |c| closed.contains(c), Coord::new(x0, y0)))
    })
}

/// Open extra walls between walkable neighbours until the target is met or
/// the attempt budget runs out.
pub(crate) fn inject_loops(
    grid: &mut Grid,
    closed: &ClosedMask,
    rng: &mut StdRng,
    sink: &mut StepSink<'_>,
) -> Result<LoopReport, ConfigError> {
    let walkable: Vec<Coord> = grid.coords().filter(|&c| !closed.contains(c)).collect();
    let target = loop_target(walkable.len());
    let budget = target * ATTEMPTS_PER_LOOP;
    let mut report = LoopReport {
        target,
        ..LoopReport::default()
    };

    while report.opened < target && report.attempts < budget {
        report.attempts += 1;

        let Some(&a) = walkable.choose(rng) else {
            break;
        };
        let options: Neighbors = grid
            .neighbors(a)
            .into_iter()
            .filter(|&(_, n)| !closed.contains(n))
            .collect();
        let Some(&(dir, b)) = options.choose(rng) else {
            continue;
        };
        if !grid.has_wall(a, dir) {
            continue;
        }

        grid.set_wall_between(a, b, false)?;
        if creates_open_plaza(grid, closed, a, b) {
            grid.set_wall_between(a, b, true)?;
            continue;
        }

        report.opened += 1;
        sink.emit(MazeStep::new(StepKind::LoopOpen, Some(a), Some(b), walkable.len()));
    }

    Ok(report)
}
