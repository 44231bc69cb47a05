//! Layout notation for full board positions.
//!
//! Eight ranks of eight cells, row 0 first, joined by `/`, followed by the
//! side to move and the number of actions already played:
//!
//! `.RRRRRR./.******./......../......../......../......../.******./.BBBBBB./r/0`
//!
//! Cells: `R` red piece, `B` blue piece, `*` lily pad, `.` empty. The
//! `startpos` keyword stands for the standard opening position.

use thiserror::Error;

use crate::board::{Board, Cell, Color, Coord, BOARD_N};

/// Errors that can occur during layout parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("expected {expected} sections separated by '/', got {0}", expected = BOARD_N + 2)]
    WrongSectionCount(usize),

    #[error("row {row} has {len} cells, expected {expected}", expected = BOARD_N)]
    WrongRowLength { row: usize, len: usize },

    #[error("invalid cell character '{0}'")]
    InvalidCell(char),

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    #[error("invalid turn count '{0}'")]
    InvalidTurnCount(String),
}

/// Keyword for the standard opening position.
pub const STARTPOS: &str = "startpos";

/// Parses a layout string (or `startpos`) into a board with no history.
pub fn parse_layout(s: &str) -> Result<Board, LayoutError> {
    let s = s.trim();
    if s == STARTPOS {
        return Ok(Board::new());
    }

    let sections: Vec<&str> = s.split('/').collect();
    if sections.len() != BOARD_N + 2 {
        return Err(LayoutError::WrongSectionCount(sections.len()));
    }

    let side = sections[BOARD_N];
    let turn = side
        .chars()
        .next()
        .filter(|_| side.len() == 1)
        .and_then(Color::from_side_char)
        .ok_or_else(|| LayoutError::InvalidSide(side.to_string()))?;
    let count = sections[BOARD_N + 1];
    let turn_count: u32 = count
        .parse()
        .map_err(|_| LayoutError::InvalidTurnCount(count.to_string()))?;

    let mut board = Board::empty(turn);
    board.set_turn_count(turn_count);
    for (row, rank) in sections[..BOARD_N].iter().enumerate() {
        let len = rank.chars().count();
        if len != BOARD_N {
            return Err(LayoutError::WrongRowLength { row, len });
        }
        for (col, ch) in rank.chars().enumerate() {
            let cell = Cell::from_layout_char(ch).ok_or(LayoutError::InvalidCell(ch))?;
            if let Some(coord) = Coord::new(row, col) {
                board.set_cell(coord, cell);
            }
        }
    }
    Ok(board)
}

/// Encodes a board as a layout string. History is not encoded.
pub fn encode_layout(board: &Board) -> String {
    let mut out = String::with_capacity(BOARD_N * (BOARD_N + 1) + 8);
    for row in 0..BOARD_N {
        for col in 0..BOARD_N {
            let cell = Coord::new(row, col).map_or(Cell::Empty, |c| board.cell(c));
            out.push(cell.layout_char());
        }
        out.push('/');
    }
    out.push(board.turn().side_char());
    out.push('/');
    out.push_str(&board.turn_count().to_string());
    out
}
