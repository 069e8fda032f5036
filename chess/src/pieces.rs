//! Per-color collections of live pieces

use crate::types::{Cell, Color, Coord, Piece};

use arrayvec::{ArrayVec, CapacityError};

/// Maximum number of pieces a single side may have
pub const MAX_PIECES: usize = 16;

/// State of a single piece on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceState {
    /// Color of the piece
    pub color: Color,
    /// Kind of the piece
    pub piece: Piece,
    /// Square on which the piece stands
    pub coord: Coord,
    /// Whether the piece has moved since the game started
    ///
    /// Only matters for kings and rooks, as it determines castling availability.
    pub moved: bool,
}

impl PieceState {
    /// Returns the board cell for this piece
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::from_parts(self.color, self.piece)
    }
}

/// Pieces of both sides, kept in insertion order
///
/// The set is owned by [`Board`](crate::board::Board), which keeps it consistent with the
/// cells: a piece believes it stands on a square iff that square holds its cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PieceSet {
    sides: [ArrayVec<PieceState, MAX_PIECES>; 2],
}

impl PieceSet {
    pub fn new() -> PieceSet {
        PieceSet::default()
    }

    /// Returns the pieces of color `c`
    #[inline]
    pub fn pieces_of(&self, c: Color) -> impl Iterator<Item = &PieceState> + '_ {
        self.sides[c.index()].iter()
    }

    /// Returns the number of pieces of color `c`
    #[inline]
    pub fn len(&self, c: Color) -> usize {
        self.sides[c.index()].len()
    }

    /// Returns the position of the king of color `c`
    ///
    /// # Panics
    ///
    /// Panics if there is no king of color `c`. Valid boards always have exactly one king
    /// of each color, so this means the game state is corrupted.
    pub fn king_square(&self, c: Color) -> Coord {
        match self
            .pieces_of(c)
            .find(|p| p.piece == Piece::King)
        {
            Some(p) => p.coord,
            None => panic!("corrupted state: no {} king", c.as_long_str()),
        }
    }

    /// Returns the piece standing on `coord`, if any
    pub fn get(&self, coord: Coord) -> Option<&PieceState> {
        self.sides
            .iter()
            .flat_map(|side| side.iter())
            .find(|p| p.coord == coord)
    }

    /// Returns whether the piece on `coord` has moved, or `None` if the square is empty
    pub fn has_moved(&self, coord: Coord) -> Option<bool> {
        self.get(coord).map(|p| p.moved)
    }

    fn get_mut(&mut self, coord: Coord) -> Option<&mut PieceState> {
        self.sides
            .iter_mut()
            .flat_map(|side| side.iter_mut())
            .find(|p| p.coord == coord)
    }

    pub(crate) fn add(&mut self, state: PieceState) -> Result<(), CapacityError<PieceState>> {
        self.sides[state.color.index()].try_push(state)
    }

    pub(crate) fn remove(&mut self, coord: Coord) -> Option<PieceState> {
        for side in &mut self.sides {
            if let Some(pos) = side.iter().position(|p| p.coord == coord) {
                return Some(side.remove(pos));
            }
        }
        None
    }

    /// Moves the piece from `src` to `dst` and marks it as moved
    ///
    /// The destination must be already vacated.
    pub(crate) fn relocate(&mut self, src: Coord, dst: Coord) {
        debug_assert!(self.get(dst).is_none(), "{} is still occupied", dst);
        let p = self
            .get_mut(src)
            .unwrap_or_else(|| panic!("corrupted state: no piece on {}", src));
        p.coord = dst;
        p.moved = true;
    }

    pub(crate) fn set_moved(&mut self, coord: Coord, moved: bool) {
        if let Some(p) = self.get_mut(coord) {
            p.moved = moved;
        }
    }

    pub(crate) fn promote(&mut self, coord: Coord, piece: Piece) {
        let p = self
            .get_mut(coord)
            .unwrap_or_else(|| panic!("corrupted state: no piece on {}", coord));
        p.piece = piece;
    }
}
