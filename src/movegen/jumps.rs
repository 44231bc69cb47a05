//! Jump-chain exploration.
//!
//! Depth-first backtracking from a landing cell. Each branch carries its own
//! copy of the visited set, so sibling branches never see each other's
//! landings. Every chain found is recorded, including every prefix, because
//! a player may stop after any jump.

use crate::board::{Board, Cell, Coord, Direction};

/// Set of cells already landed on in the current chain.
///
/// One bit per cell; `Copy`, so passing it by value gives each recursive call
/// its own copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Visited(u64);

impl Visited {
    #[inline]
    pub(crate) fn contains(self, c: Coord) -> bool {
        self.0 & (1u64 << c.index()) != 0
    }

    /// Returns a copy with `c` marked.
    #[inline]
    pub(crate) fn with(self, c: Coord) -> Visited {
        Visited(self.0 | (1u64 << c.index()))
    }
}

/// Read-only chain search for one moving piece.
pub(crate) struct ChainSearch<'a> {
    board: &'a Board,
    origin: Coord,
    dirs: &'a [Direction],
    chains: Vec<Vec<Direction>>,
}

impl<'a> ChainSearch<'a> {
    pub(crate) fn new(board: &'a Board, origin: Coord, dirs: &'a [Direction]) -> Self {
        ChainSearch {
            board,
            origin,
            dirs,
            chains: Vec::new(),
        }
    }

    /// Reads a cell with the moving piece lifted off its origin.
    #[inline]
    fn view(&self, c: Coord) -> Cell {
        if c == self.origin {
            Cell::Empty
        } else {
            self.board.cell(c)
        }
    }

    /// Returns the landing cell of a jump from `from` in `dir`, if legal.
    pub(crate) fn jump_from(&self, from: Coord, dir: Direction) -> Option<Coord> {
        let over = from.offset(dir)?;
        if !self.view(over).is_occupied() {
            return None;
        }
        let landing = over.offset(dir)?;
        self.view(landing).is_pad().then_some(landing)
    }

    /// Records `chain` and every continuation reachable from `at`.
    pub(crate) fn explore(&mut self, at: Coord, chain: &[Direction], visited: Visited) {
        for &dir in self.dirs {
            let Some(landing) = self.jump_from(at, dir) else {
                continue;
            };
            if visited.contains(landing) {
                continue;
            }
            let mut extended = Vec::with_capacity(chain.len() + 1);
            extended.extend_from_slice(chain);
            extended.push(dir);
            self.chains.push(extended.clone());
            self.explore(landing, &extended, visited.with(landing));
        }
    }

    /// Consumes the search and returns every chain found, in discovery order.
    pub(crate) fn into_chains(self) -> Vec<Vec<Direction>> {
        self.chains
    }
}
