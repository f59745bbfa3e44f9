//! Seeded grid maze generator and solver.
//!
//! This crate builds rectangular mazes from a seed, optionally with extra
//! loops and a decorative "42" pattern of closed cells, solves them with a
//! breadth-first search and renders them to a compact hex export that can
//! be parsed back and verified.

pub mod carve;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod generator;
pub mod grid;
pub mod loops;
pub mod maze;
pub mod pattern;
pub mod solver;
pub mod validate;

// Re-export main types
pub use carve::Algorithm;
pub use config::{ConfigFileError, MazeConfig};
pub use error::{ConfigError, ErrorKind, GenerationError, MazeError, MazeResult, UnsolvableError};
pub use events::{MazeStep, StepKind, StepObserver};
pub use export::{hex_lines, ExportDocument, ExportError, ExportSections};
pub use generator::{GeneratorConfig, MazeGenerator};
pub use grid::{direction_between, in_bounds, Coord, Direction, Grid, WallMask};
pub use loops::LoopReport;
pub use maze::Maze;
pub use pattern::pattern_closed_cells;
pub use solver::{solve, Path};
pub use validate::{check_symmetry, enforce_border};
