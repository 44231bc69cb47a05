//! Player colors and cell contents.

use super::coord::{Direction, BOARD_N};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
}

/// Both colors, Red first.
pub const ALL_COLORS: [Color; 2] = [Color::Red, Color::Blue];

/// Number of pieces each color starts with.
pub const STARTING_PIECES: usize = BOARD_N - 2;

const RED_DIRECTIONS: [Direction; 5] = [
    Direction::Down,
    Direction::DownLeft,
    Direction::DownRight,
    Direction::Left,
    Direction::Right,
];

const BLUE_DIRECTIONS: [Direction; 5] = [
    Direction::Up,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::Left,
    Direction::Right,
];

impl Color {
    /// Returns the other player.
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Returns the array slot for per-color tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// The row this color's pieces race towards.
    #[inline]
    pub const fn goal_row(self) -> usize {
        match self {
            Color::Red => BOARD_N - 1,
            Color::Blue => 0,
        }
    }

    /// The row this color's pieces start on.
    #[inline]
    pub const fn start_row(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => BOARD_N - 1,
        }
    }

    /// Number of rows between `row` and this color's goal row.
    #[inline]
    pub const fn goal_distance(self, row: usize) -> usize {
        self.goal_row().abs_diff(row)
    }

    /// Number of rows between `row` and this color's start row.
    #[inline]
    pub const fn start_distance(self, row: usize) -> usize {
        self.start_row().abs_diff(row)
    }

    /// Row delta of one forward step (+1 for Red, -1 for Blue).
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Color::Red => 1,
            Color::Blue => -1,
        }
    }

    /// Directions this color may move or jump in. Backward motion is never legal.
    #[inline]
    pub fn legal_directions(self) -> &'static [Direction] {
        match self {
            Color::Red => &RED_DIRECTIONS,
            Color::Blue => &BLUE_DIRECTIONS,
        }
    }

    /// Returns whether `dir` is a legal direction for this color.
    pub fn allows(self, dir: Direction) -> bool {
        self.legal_directions().contains(&dir)
    }

    /// Parses a color from its protocol name (`red` / `blue`, any case).
    pub fn from_name(s: &str) -> Option<Color> {
        if s.eq_ignore_ascii_case("red") {
            Some(Color::Red)
        } else if s.eq_ignore_ascii_case("blue") {
            Some(Color::Blue)
        } else {
            None
        }
    }

    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
        }
    }

    /// Single-character side marker used in layout strings.
    pub const fn side_char(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Blue => 'b',
        }
    }

    /// Parses the single-character side marker.
    pub fn from_side_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    LilyPad,
    Piece(Color),
}

impl Cell {
    /// Returns the piece color if the cell is occupied.
    #[inline]
    pub const fn piece(self) -> Option<Color> {
        match self {
            Cell::Piece(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_occupied(self) -> bool {
        matches!(self, Cell::Piece(_))
    }

    #[inline]
    pub const fn is_pad(self) -> bool {
        matches!(self, Cell::LilyPad)
    }

    /// Returns the layout character for this cell.
    pub const fn layout_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::LilyPad => '*',
            Cell::Piece(Color::Red) => 'R',
            Cell::Piece(Color::Blue) => 'B',
        }
    }

    /// Parses a layout character.
    pub fn from_layout_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            '*' => Some(Cell::LilyPad),
            'R' => Some(Cell::Piece(Color::Red)),
            'B' => Some(Cell::Piece(Color::Blue)),
            _ => None,
        }
    }
}
