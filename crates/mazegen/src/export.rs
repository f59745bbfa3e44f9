//! Export text format.
//!
//! ```text
//! 9515391539551795151151153
//! ...                       (one line per row, one hex digit per cell)
//!
//! 1,1                       (entry x,y)
//! 19,14                     (exit x,y)
//! SWSESWSESWSSSEESEEENEES   (shortest path)
//! ```
//!
//! Rendering is pure; writing the text somewhere is the caller's job.
//! [`ExportDocument`] parses the text back and checks it is self-consistent.

use std::fmt;

use serde::Serialize;

use crate::error::{ConfigError, MazeResult};
use crate::grid::{in_bounds, Coord, Direction, Grid, WallMask};
use crate::maze::Maze;
use crate::solver::{solve, Path};
use crate::validate::{border_closed, check_symmetry};

/// One uppercase hex string per row, top to bottom.
pub fn hex_lines(maze: &Maze) -> Vec<String> {
    grid_hex_lines(maze.grid())
}

fn grid_hex_lines(grid: &Grid) -> Vec<String> {
    grid.rows()
        .map(|row| row.iter().map(|mask| mask.hex_digit()).collect())
        .collect()
}

/// `x,y` rendering used for the entry and exit lines.
pub fn format_coord(c: Coord) -> String {
    format!("{},{}", c.x, c.y)
}

/// The four logical sections of an export, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSections {
    pub hex_lines: Vec<String>,
    pub entry: String,
    pub exit: String,
    pub path: String,
}

impl ExportSections {
    /// Render a maze with an already computed path.
    pub fn with_path(maze: &Maze, path: &Path) -> Self {
        Self {
            hex_lines: hex_lines(maze),
            entry: format_coord(maze.entry()),
            exit: format_coord(maze.exit()),
            path: path.to_string(),
        }
    }

    /// Solve the maze and render it.
    pub fn from_maze(maze: &Maze) -> MazeResult<Self> {
        let path = solve(maze)?;
        Ok(Self::with_path(maze, &path))
    }
}

impl fmt::Display for ExportSections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.hex_lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.entry)?;
        writeln!(f, "{}", self.exit)?;
        writeln!(f, "{}", self.path)
    }
}

/// Problems found while reading or checking an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The text ended before all sections were read.
    MissingSection(&'static str),
    /// A grid line contains a character that is not a hex digit.
    InvalidHex { line: usize, column: usize },
    /// A grid line's length differs from the first line.
    RaggedRow { line: usize, expected: usize, found: usize },
    /// An entry/exit line is not `x,y`.
    InvalidCoord { line: usize, text: String },
    /// The path contains something other than N, E, S, W.
    InvalidPath { line: usize },
    /// Unexpected lines after the path.
    TrailingContent { line: usize },
    /// A border-facing wall is open.
    OpenBorder,
    /// Adjacent cells disagree on their shared wall.
    InconsistentWall { a: Coord, b: Coord },
    /// Entry or exit lies outside the grid.
    EndpointOutOfBounds(Coord),
    /// Following the path crosses a closed wall.
    PathBlocked { step: usize, at: Coord, direction: Direction },
    /// The path ends somewhere other than the exit.
    PathMissesExit { end: Coord, exit: Coord },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::MissingSection(name) => write!(f, "missing {} section", name),
            ExportError::InvalidHex { line, column } => {
                write!(f, "line {}: invalid hex digit at column {}", line, column)
            }
            ExportError::RaggedRow {
                line,
                expected,
                found,
            } => write!(f, "line {}: expected {} cells, found {}", line, expected, found),
            ExportError::InvalidCoord { line, text } => {
                write!(f, "line {}: invalid coordinate '{}' (expected x,y)", line, text)
            }
            ExportError::InvalidPath { line } => write!(f, "line {}: invalid path symbol", line),
            ExportError::TrailingContent { line } => write!(f, "line {}: unexpected content", line),
            ExportError::OpenBorder => write!(f, "a border wall is open"),
            ExportError::InconsistentWall { a, b } => {
                write!(f, "inconsistent wall between {} and {}", a, b)
            }
            ExportError::EndpointOutOfBounds(c) => write!(f, "endpoint {} is out of bounds", c),
            ExportError::PathBlocked { step, at, direction } => write!(
                f,
                "path step {} moves {} through a wall at {}",
                step, direction, at
            ),
            ExportError::PathMissesExit { end, exit } => {
                write!(f, "path ends at {} instead of exit {}", end, exit)
            }
        }
    }
}

impl std::error::Error for ExportError {}

/// A parsed export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub grid: Grid,
    pub entry: Coord,
    pub exit: Coord,
    pub path: Path,
}

fn parse_coord(line: usize, text: &str) -> Result<Coord, ExportError> {
    let invalid = || ExportError::InvalidCoord {
        line,
        text: text.to_string(),
    };
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Coord::new(x, y))
}

impl ExportDocument {
    pub fn parse(text: &str) -> Result<Self, ExportError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .peekable();

        let mut rows: Vec<Vec<WallMask>> = Vec::new();
        while let Some(&(number, line)) = lines.peek() {
            // the grid ends at the blank separator or the first x,y line
            if line.is_empty() || line.contains(',') {
                break;
            }
            lines.next();
            let row = line
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    ch.to_digit(16)
                        .map(|d| WallMask::from_bits(d as u8))
                        .ok_or(ExportError::InvalidHex {
                            line: number,
                            column: i + 1,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(ExportError::RaggedRow {
                        line: number,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(ExportError::MissingSection("grid"));
        }
        while lines.peek().is_some_and(|&(_, l)| l.is_empty()) {
            lines.next();
        }

        let (n, text) = lines.next().ok_or(ExportError::MissingSection("entry"))?;
        let entry = parse_coord(n, text)?;
        let (n, text) = lines.next().ok_or(ExportError::MissingSection("exit"))?;
        let exit = parse_coord(n, text)?;
        let (n, text) = lines.next().ok_or(ExportError::MissingSection("path"))?;
        let path = Path::from_symbols(text.trim()).ok_or(ExportError::InvalidPath { line: n })?;

        if let Some((n, _)) = lines.find(|(_, l)| !l.is_empty()) {
            return Err(ExportError::TrailingContent { line: n });
        }

        let grid = Grid::from_rows(rows).ok_or(ExportError::MissingSection("grid"))?;
        Ok(Self {
            grid,
            entry,
            exit,
            path,
        })
    }

    /// Check borders, wall symmetry, endpoints, and that the path walks
    /// from entry to exit through open walls only.
    pub fn verify(&self) -> Result<(), ExportError> {
        let (width, height) = (self.grid.width(), self.grid.height());
        if !border_closed(&self.grid) {
            return Err(ExportError::OpenBorder);
        }
        if let Err(ConfigError::InconsistentWall { a, b }) = check_symmetry(&self.grid) {
            return Err(ExportError::InconsistentWall { a, b });
        }
        for c in [self.entry, self.exit] {
            if !in_bounds(c, width, height) {
                return Err(ExportError::EndpointOutOfBounds(c));
            }
        }

        let mut at = self.entry;
        for (i, &dir) in self.path.moves().iter().enumerate() {
            // a closed wall also covers moves off the grid, borders being closed
            if self.grid.has_wall(at, dir) {
                return Err(ExportError::PathBlocked {
                    step: i + 1,
                    at,
                    direction: dir,
                });
            }
            at = self.grid.neighbor(at, dir).ok_or(ExportError::OpenBorder)?;
        }
        if at != self.exit {
            return Err(ExportError::PathMissesExit {
                end: at,
                exit: self.exit,
            });
        }
        Ok(())
    }

    /// Render back to export text.
    pub fn to_sections(&self) -> ExportSections {
        ExportSections {
            hex_lines: grid_hex_lines(&self.grid),
            entry: format_coord(self.entry),
            exit: format_coord(self.exit),
            path: self.path.to_string(),
        }
    }
}
