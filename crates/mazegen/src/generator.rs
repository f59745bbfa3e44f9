//! Reproducible maze generator.
//!
//! A generator owns its configuration, a seeded RNG and the warnings of
//! its last run. Each call to [`MazeGenerator::generate`] builds a fresh
//! [`Maze`]; the generator keeps no reference to it.

use std::collections::BTreeSet;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::carve::{Algorithm, ClosedMask};
use crate::error::{ConfigError, GenerationError, MazeResult};
use crate::events::{MazeStep, StepKind, StepObserver, StepSink};
use crate::grid::{in_bounds, Coord, Grid};
use crate::loops::{inject_loops, LoopReport};
use crate::maze::Maze;
use crate::pattern::{pattern_closed_cells, PATTERN_HEIGHT, PATTERN_WIDTH};
use crate::solver::{solve, Path};
use crate::validate::{check_symmetry, enforce_border};

/// Construction parameters, already validated for syntax by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    pub entry: Coord,
    pub exit: Coord,
    pub perfect: bool,
    /// `None` seeds from OS entropy; the run is valid but not reproducible.
    pub seed: Option<u64>,
    pub include_pattern: bool,
    pub algorithm: Algorithm,
}

impl GeneratorConfig {
    pub fn new(width: usize, height: usize, entry: Coord, exit: Coord) -> Self {
        Self {
            width,
            height,
            entry,
            exit,
            perfect: true,
            seed: None,
            include_pattern: true,
            algorithm: Algorithm::Dfs,
        }
    }

    pub fn perfect(mut self, perfect: bool) -> Self {
        self.perfect = perfect;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn include_pattern(mut self, include: bool) -> Self {
        self.include_pattern = include;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

pub struct MazeGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    used_pattern: bool,
    warnings: Vec<String>,
    last_loops: Option<LoopReport>,
}

impl MazeGenerator {
    /// Validate the configuration and seed the RNG.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        let (width, height) = (config.width, config.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        for (role, coord) in [("entry", config.entry), ("exit", config.exit)] {
            if !in_bounds(coord, width, height) {
                return Err(ConfigError::OutOfBounds {
                    role,
                    coord,
                    width,
                    height,
                });
            }
        }
        if config.entry == config.exit {
            return Err(ConfigError::EntryEqualsExit(config.entry));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            used_pattern: false,
            warnings: Vec::new(),
            last_loops: None,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// True if the last generated maze contains the decorative pattern.
    pub fn used_pattern(&self) -> bool {
        self.used_pattern
    }

    /// Warnings recorded during the last run.
    pub fn last_warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Loop injection outcome of the last run; `None` in perfect mode.
    pub fn last_loops(&self) -> Option<LoopReport> {
        self.last_loops
    }

    /// Generate a maze without observing steps.
    pub fn generate(&mut self) -> MazeResult<Maze> {
        self.generate_observed(None, 1)
    }

    /// Generate a maze, dispatching step events to `observer`.
    ///
    /// `pattern_marked` and `done` are always dispatched; every other kind
    /// only on every `step_every`-th occurrence.
    pub fn generate_observed(
        &mut self,
        observer: Option<StepObserver<'_>>,
        step_every: usize,
    ) -> MazeResult<Maze> {
        let mut sink = StepSink::new(observer, step_every)?;
        let GeneratorConfig {
            width,
            height,
            entry,
            exit,
            perfect,
            include_pattern,
            algorithm,
            ..
        } = self.config;

        debug!(
            "generating {}x{} maze (perfect={}, algorithm={}, seed={:?})",
            width, height, perfect, algorithm, self.config.seed
        );

        self.warnings.clear();
        self.used_pattern = false;
        self.last_loops = None;

        let mut grid = Grid::closed(width, height);
        let mut closed = BTreeSet::new();

        if include_pattern {
            match pattern_closed_cells(width, height) {
                Some(cells) => {
                    closed = cells;
                    self.used_pattern = true;
                    sink.emit(MazeStep::new(StepKind::PatternMarked, None, None, 0));
                }
                None => self.warn(format!(
                    "grid too small for pattern, needs at least {}x{}",
                    PATTERN_WIDTH, PATTERN_HEIGHT
                )),
            }
        }

        if closed.contains(&entry) {
            return Err(GenerationError::EntryClosed(entry).into());
        }

        let mask = ClosedMask::new(width, height, &closed);
        let visited = algorithm
            .strategy()
            .carve(&mut grid, &mask, entry, &mut self.rng, &mut sink)?;

        if !perfect {
            let report = inject_loops(&mut grid, &mask, &mut self.rng, &mut sink)?;
            if !report.reached_target() {
                self.warn(format!(
                    "could not add requested loops without violating the open-area constraint ({} of {})",
                    report.opened, report.target
                ));
            }
            self.last_loops = Some(report);
        }

        enforce_border(&mut grid);
        check_symmetry(&grid)?;

        let expected = width * height - closed.len();
        if visited != expected {
            return Err(GenerationError::IncompleteCoverage { visited, expected }.into());
        }

        sink.emit(MazeStep::new(StepKind::Done, Some(entry), Some(exit), visited));
        debug!(
            "generated maze: {} cells visited, {} closed, {} loops",
            visited,
            closed.len(),
            self.last_loops.map_or(0, |r| r.opened)
        );

        Ok(Maze::new(grid, entry, exit, closed))
    }

    /// Shortest path from entry to exit of a maze.
    pub fn solve(&self, maze: &Maze) -> MazeResult<Path> {
        Ok(solve(maze)?)
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, MazeError};
    use crate::grid::WallMask;

    fn config(width: usize, height: usize) -> GeneratorConfig {
        GeneratorConfig::new(
            width,
            height,
            Coord::new(0, 0),
            Coord::new(width - 1, height - 1),
        )
        .seed(1)
    }

    #[test]
    fn test_rejects_bad_config() {
        let base = config(5, 5);
        let bad = [
            GeneratorConfig { width: 0, ..base.clone() },
            GeneratorConfig { height: 0, ..base.clone() },
            GeneratorConfig { entry: Coord::new(5, 0), ..base.clone() },
            GeneratorConfig { exit: Coord::new(0, 9), ..base.clone() },
            GeneratorConfig { exit: Coord::new(0, 0), ..base.clone() },
        ];
        for cfg in bad {
            assert!(MazeGenerator::new(cfg).is_err());
        }
        assert!(matches!(
            MazeGenerator::new(GeneratorConfig { exit: Coord::new(0, 0), ..base }),
            Err(ConfigError::EntryEqualsExit(_))
        ));
    }

    #[test]
    fn test_zero_stride_is_config_error() {
        let mut gen = MazeGenerator::new(config(5, 5)).unwrap();
        let err = gen.generate_observed(None, 0).unwrap_err();
        assert_eq!(err, MazeError::Config(ConfigError::InvalidStride(0)));
    }

    #[test]
    fn test_pattern_scenario() {
        let mut gen = MazeGenerator::new(config(10, 7)).unwrap();
        let maze = gen.generate().unwrap();
        assert!(gen.used_pattern());
        assert!(!maze.closed().is_empty());
        assert!(gen.last_warnings().is_empty());
        for &c in maze.closed() {
            assert_eq!(maze.wall_mask(c), WallMask::ALL_WALLS);
        }

        let path = gen.solve(&maze).unwrap();
        assert!(!path.is_empty());
        assert_eq!(path.end_point(maze.entry()), Some(Coord::new(9, 6)));
    }

    #[test]
    fn test_small_grid_skips_pattern_with_warning() {
        let mut gen = MazeGenerator::new(config(6, 4)).unwrap();
        let maze = gen.generate().unwrap();
        assert!(!gen.used_pattern());
        assert!(maze.closed().is_empty());
        assert!(!gen.last_warnings().is_empty());
        assert_eq!(maze.open_edge_count(), maze.walkable_count() - 1);
    }

    #[test]
    fn test_entry_inside_pattern() {
        // (1,1) is the top-left stroke of the 4 on a 9x7 grid
        let cfg = GeneratorConfig::new(9, 7, Coord::new(1, 1), Coord::new(8, 6)).seed(3);
        let mut gen = MazeGenerator::new(cfg).unwrap();
        let err = gen.generate().unwrap_err();
        assert_eq!(err, MazeError::Generation(GenerationError::EntryClosed(Coord::new(1, 1))));
    }

    #[test]
    fn test_pattern_pocket_on_short_grid_fails_coverage() {
        // height 5 puts the 4 against the top border, sealing a pocket
        let mut gen = MazeGenerator::new(config(12, 5).seed(2)).unwrap();
        let err = gen.generate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert!(matches!(
            err,
            MazeError::Generation(GenerationError::IncompleteCoverage { .. })
        ));
        assert!(gen.used_pattern());
    }

    #[test]
    fn test_same_seed_same_maze() {
        for algorithm in Algorithm::ALL {
            for perfect in [true, false] {
                let cfg = config(20, 20).perfect(perfect).algorithm(algorithm).seed(7);
                let a = MazeGenerator::new(cfg.clone()).unwrap().generate().unwrap();
                let b = MazeGenerator::new(cfg).unwrap().generate().unwrap();
                assert_eq!(a, b, "{} perfect={}", algorithm, perfect);
            }
        }
    }

    #[test]
    fn test_warnings_reset_between_runs() {
        let mut gen = MazeGenerator::new(config(4, 4)).unwrap();
        gen.generate().unwrap();
        gen.generate().unwrap();
        assert_eq!(gen.last_warnings().len(), 1);
    }

    #[test]
    fn test_imperfect_maze_has_cycle_and_no_plaza() {
        let cfg = config(30, 20).perfect(false).seed(9);
        let mut gen = MazeGenerator::new(cfg).unwrap();
        let maze = gen.generate().unwrap();
        assert!(maze.open_edge_count() >= maze.walkable_count());
        assert!(!maze.has_open_plaza());
        assert_eq!(maze.reachable_from(maze.entry()), maze.walkable_count());
        let report = gen.last_loops().unwrap();
        assert_eq!(maze.open_edge_count(), maze.walkable_count() - 1 + report.opened);
    }

    #[test]
    fn test_events_end_with_done() {
        let mut steps = Vec::new();
        let mut gen = MazeGenerator::new(config(10, 7)).unwrap();
        {
            let mut observer = |s: &MazeStep| steps.push(*s);
            gen.generate_observed(Some(&mut observer), 5).unwrap();
        }
        assert_eq!(steps.first().map(|s| s.kind), Some(StepKind::PatternMarked));
        let last = steps.last().unwrap();
        assert_eq!(last.kind, StepKind::Done);
        assert_eq!(last.a, Some(Coord::new(0, 0)));
        assert_eq!(last.b, Some(Coord::new(9, 6)));
        assert_eq!(last.visited, 70 - 20);
    }
}
