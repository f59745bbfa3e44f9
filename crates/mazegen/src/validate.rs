//! Consistency checks run after every generation pass.

use crate::error::ConfigError;
use crate::grid::{Coord, Direction, Grid};

/// Close every wall that faces outside the grid. Never opens anything.
pub fn enforce_border(grid: &mut Grid) {
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 {
        return;
    }
    for x in 0..width {
        grid.set_wall(Coord::new(x, 0), Direction::North, true);
        grid.set_wall(Coord::new(x, height - 1), Direction::South, true);
    }
    for y in 0..height {
        grid.set_wall(Coord::new(0, y), Direction::West, true);
        grid.set_wall(Coord::new(width - 1, y), Direction::East, true);
    }
}

/// True if no wall faces outside the grid.
pub fn border_closed(grid: &Grid) -> bool {
    grid.coords().all(|c| {
        Direction::ALL
            .into_iter()
            .all(|dir| grid.neighbor(c, dir).is_some() || grid.has_wall(c, dir))
    })
}

/// Check that every pair of adjacent cells agrees on the wall between them.
///
/// Only East and South partners are compared, which covers each pair once.
pub fn check_symmetry(grid: &Grid) -> Result<(), ConfigError> {
    for c in grid.coords() {
        for dir in [Direction::East, Direction::South] {
            if let Some(n) = grid.neighbor(c, dir) {
                if grid.has_wall(c, dir) != grid.has_wall(n, dir.opposite()) {
                    return Err(ConfigError::InconsistentWall { a: c, b: n });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_border_closes_only_outer_walls() {
        let mut grid = Grid::closed(3, 2);
        for c in grid.coords().collect::<Vec<_>>() {
            grid.set(c, crate::grid::WallMask::OPEN);
        }
        assert!(!border_closed(&grid));
        enforce_border(&mut grid);
        assert!(border_closed(&grid));
        // interior sides untouched
        assert!(!grid.has_wall(Coord::new(0, 0), Direction::East));
        assert!(!grid.has_wall(Coord::new(1, 0), Direction::South));

        let snapshot = grid.clone();
        enforce_border(&mut grid);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn test_symmetry_detects_one_sided_wall() {
        let mut grid = Grid::closed(3, 3);
        assert!(check_symmetry(&grid).is_ok());

        grid.set_wall_between(Coord::new(0, 0), Coord::new(1, 0), false).unwrap();
        assert!(check_symmetry(&grid).is_ok());

        grid.set_wall(Coord::new(1, 1), Direction::South, false);
        assert_eq!(
            check_symmetry(&grid),
            Err(ConfigError::InconsistentWall {
                a: Coord::new(1, 1),
                b: Coord::new(1, 2),
            })
        );
    }
}
