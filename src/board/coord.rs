//! Board coordinates and movement directions.
//!
//! Coordinates are (row, col) pairs on the fixed-size grid. Directions are
//! unit vectors; `Coord::offset` is the single bounds check used by the
//! board, the move generator and the evaluator.

use std::fmt;

/// Width and height of the board.
pub const BOARD_N: usize = 8;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_N * BOARD_N;

/// A cell on the board. Always in bounds once constructed via `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Creates a coordinate, returning None when it falls off the board.
    pub fn new(row: usize, col: usize) -> Option<Coord> {
        if row < BOARD_N && col < BOARD_N {
            Some(Coord {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns the flat cell index used by the board arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_N + self.col as usize
    }

    /// Inverse of `index`.
    #[inline]
    pub const fn from_index(idx: usize) -> Coord {
        Coord {
            row: (idx / BOARD_N) as u8,
            col: (idx % BOARD_N) as u8,
        }
    }

    /// Returns the neighbouring coordinate in `dir`, or None off the board.
    #[inline]
    pub fn offset(self, dir: Direction) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Coord::new(row as usize, col as usize)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// One of the eight compass directions. Row numbers grow downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

/// All directions, clockwise from `Up`.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
    Direction::Left,
    Direction::UpLeft,
];

impl Direction {
    /// Returns the (row, col) unit vector.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::UpRight => (-1, 1),
            Direction::Right => (0, 1),
            Direction::DownRight => (1, 1),
            Direction::Down => (1, 0),
            Direction::DownLeft => (1, -1),
            Direction::Left => (0, -1),
            Direction::UpLeft => (-1, -1),
        }
    }

    /// Returns the short notation used by the text protocol.
    pub const fn abbrev(self) -> &'static str {
        match self {
            Direction::Up => "U",
            Direction::UpRight => "UR",
            Direction::Right => "R",
            Direction::DownRight => "DR",
            Direction::Down => "D",
            Direction::DownLeft => "DL",
            Direction::Left => "L",
            Direction::UpLeft => "UL",
        }
    }

    /// Parses the short notation (case-insensitive).
    pub fn from_abbrev(s: &str) -> Option<Direction> {
        ALL_DIRECTIONS
            .iter()
            .copied()
            .find(|d| d.abbrev().eq_ignore_ascii_case(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_respects_bounds() {
        let corner = Coord::new(0, 0).unwrap();
        assert_eq!(corner.offset(Direction::Up), None);
        assert_eq!(corner.offset(Direction::Left), None);
        assert_eq!(corner.offset(Direction::DownRight), Coord::new(1, 1));

        let far = Coord::new(BOARD_N - 1, BOARD_N - 1).unwrap();
        assert_eq!(far.offset(Direction::Down), None);
        assert_eq!(far.offset(Direction::Right), None);
        assert_eq!(far.offset(Direction::UpLeft), Coord::new(BOARD_N - 2, BOARD_N - 2));
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Coord::new(BOARD_N, 0).is_none());
        assert!(Coord::new(0, BOARD_N).is_none());
    }

    #[test]
    fn index_roundtrip() {
        for idx in 0..CELL_COUNT {
            assert_eq!(Coord::from_index(idx).index(), idx);
        }
    }

    #[test]
    fn abbrev_parses_any_case() {
        for d in ALL_DIRECTIONS {
            assert_eq!(Direction::from_abbrev(d.abbrev()), Some(d));
        }
        assert_eq!(Direction::from_abbrev("dr"), Some(Direction::DownRight));
        assert_eq!(Direction::from_abbrev("X"), None);
    }

    #[test]
    fn display_uses_dash() {
        assert_eq!(Coord::new(3, 5).unwrap().to_string(), "3-5");
    }
}
