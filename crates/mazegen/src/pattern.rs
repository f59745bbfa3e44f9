//! Decorative "42" glyph made of permanently closed cells.

use std::collections::BTreeSet;

use crate::grid::Coord;

pub const PATTERN_WIDTH: usize = 7;
pub const PATTERN_HEIGHT: usize = 5;

const GLYPH_WIDTH: usize = 3;

const DIGIT_4: [[u8; GLYPH_WIDTH]; PATTERN_HEIGHT] = [
    [1, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 0, 1],
    [0, 0, 1],
];

const DIGIT_2: [[u8; GLYPH_WIDTH]; PATTERN_HEIGHT] = [
    [1, 1, 1],
    [0, 0, 1],
    [1, 1, 1],
    [1, 0, 0],
    [1, 1, 1],
];

/// Column offset of each glyph inside the pattern box; column 3 is the gap.
const GLYPHS: [(usize, &[[u8; GLYPH_WIDTH]; PATTERN_HEIGHT]); 2] = [(0, &DIGIT_4), (4, &DIGIT_2)];

/// Closed cells of the pattern centred in a `width` x `height` grid, or
/// `None` if the grid is smaller than the 7x5 pattern box.
pub fn pattern_closed_cells(width: usize, height: usize) -> Option<BTreeSet<Coord>> {
    if width < PATTERN_WIDTH || height < PATTERN_HEIGHT {
        return None;
    }

    let offset_x = (width - PATTERN_WIDTH) / 2;
    let offset_y = (height - PATTERN_HEIGHT) / 2;

    let mut closed = BTreeSet::new();
    for (glyph_x, bitmap) in GLYPHS {
        for (py, row) in bitmap.iter().enumerate() {
            for (px, &bit) in row.iter().enumerate() {
                if bit == 1 {
                    closed.insert(Coord::new(offset_x + glyph_x + px, offset_y + py));
                }
            }
        }
    }
    Some(closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small() {
        assert!(pattern_closed_cells(6, 5).is_none());
        assert!(pattern_closed_cells(7, 4).is_none());
        assert!(pattern_closed_cells(1, 1).is_none());
    }

    #[test]
    fn test_exact_fit() {
        let cells = pattern_closed_cells(7, 5).unwrap();
        // 4 has 9 set cells, 2 has 11
        assert_eq!(cells.len(), 20);
        assert!(cells.contains(&Coord::new(0, 0)));
        assert!(!cells.contains(&Coord::new(1, 0)));
        // gap column stays open
        assert!((0..5).all(|y| !cells.contains(&Coord::new(3, y))));
    }

    #[test]
    fn test_centered() {
        let cells = pattern_closed_cells(10, 7).unwrap();
        let min_x = cells.iter().map(|c| c.x).min().unwrap();
        let max_x = cells.iter().map(|c| c.x).max().unwrap();
        let min_y = cells.iter().map(|c| c.y).min().unwrap();
        let max_y = cells.iter().map(|c| c.y).max().unwrap();
        assert_eq!((min_x, max_x), (1, 7));
        assert_eq!((min_y, max_y), (1, 5));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(pattern_closed_cells(31, 17), pattern_closed_cells(31, 17));
    }
}
