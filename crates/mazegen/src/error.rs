//! Error types for maze construction, generation and solving.
//!
//! `MazeError` is the family every core operation reports through. It wraps
//! one of three kinds so callers can branch on the kind alone or match on
//! the structured detail.

use std::fmt;

use crate::grid::Coord;

/// Invalid constructor or call parameters. Detected before any work begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero.
    InvalidDimensions { width: usize, height: usize },
    /// A coordinate lies outside the grid. `role` names which one ("entry", "exit", "cell").
    OutOfBounds {
        role: &'static str,
        coord: Coord,
        width: usize,
        height: usize,
    },
    /// Entry and exit are the same cell.
    EntryEqualsExit(Coord),
    /// Step stride must be at least 1.
    InvalidStride(usize),
    /// Two coordinates were expected to be orthogonal neighbours.
    NotNeighbors { a: Coord, b: Coord },
    /// Two neighbours disagree about the wall between them.
    InconsistentWall { a: Coord, b: Coord },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { width, height } => write!(
                f,
                "width and height must be positive, got {}x{}",
                width, height
            ),
            ConfigError::OutOfBounds {
                role,
                coord,
                width,
                height,
            } => write!(
                f,
                "{} {} is out of bounds for {}x{}",
                role, coord, width, height
            ),
            ConfigError::EntryEqualsExit(c) => {
                write!(f, "entry and exit must be different coordinates, both are {}", c)
            }
            ConfigError::InvalidStride(n) => {
                write!(f, "step stride must be a positive integer, got {}", n)
            }
            ConfigError::NotNeighbors { a, b } => {
                write!(f, "coordinates {} and {} are not orthogonal neighbors", a, b)
            }
            ConfigError::InconsistentWall { a, b } => {
                write!(f, "inconsistent wall between {} and {}", a, b)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// An internal invariant failed while generating. Indicates a logic defect
/// or an unreachable layout, never bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The entry cell is part of the closed pattern.
    EntryClosed(Coord),
    /// Carving did not reach every walkable cell.
    IncompleteCoverage { visited: usize, expected: usize },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EntryClosed(c) => write!(f, "entry {} cannot be in a closed cell", c),
            GenerationError::IncompleteCoverage { visited, expected } => write!(
                f,
                "not all cells were reached during generation ({} of {})",
                visited, expected
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// The solver could not connect entry to exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsolvableError {
    EntryClosed(Coord),
    ExitClosed(Coord),
    NoPath { entry: Coord, exit: Coord },
}

impl fmt::Display for UnsolvableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsolvableError::EntryClosed(c) => write!(f, "entry {} is in a closed cell", c),
            UnsolvableError::ExitClosed(c) => write!(f, "exit {} is in a closed cell", c),
            UnsolvableError::NoPath { entry, exit } => {
                write!(f, "no path exists between entry {} and exit {}", entry, exit)
            }
        }
    }
}

impl std::error::Error for UnsolvableError {}

/// Coarse classification of a [`MazeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Generation,
    Unsolvable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    Config(ConfigError),
    Generation(GenerationError),
    Unsolvable(UnsolvableError),
}

impl MazeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MazeError::Config(_) => ErrorKind::Config,
            MazeError::Generation(_) => ErrorKind::Generation,
            MazeError::Unsolvable(_) => ErrorKind::Unsolvable,
        }
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::Config(e) => write!(f, "configuration error: {}", e),
            MazeError::Generation(e) => write!(f, "generation error: {}", e),
            MazeError::Unsolvable(e) => write!(f, "unsolvable maze: {}", e),
        }
    }
}

impl std::error::Error for MazeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MazeError::Config(e) => Some(e),
            MazeError::Generation(e) => Some(e),
            MazeError::Unsolvable(e) => Some(e),
        }
    }
}

impl From<ConfigError> for MazeError {
    fn from(e: ConfigError) -> Self {
        MazeError::Config(e)
    }
}

impl From<GenerationError> for MazeError {
    fn from(e: GenerationError) -> Self {
        MazeError::Generation(e)
    }
}

impl From<UnsolvableError> for MazeError {
    fn from(e: UnsolvableError) -> Self {
        MazeError::Unsolvable(e)
    }
}

pub type MazeResult<T> = Result<T, MazeError>;
