//! Legality checks, check and game end detection

use crate::board::Board;
use crate::moves::Move;
use crate::movegen;
use crate::types::Color;

use std::borrow::Cow;

/// Tests semilegal moves for legality
///
/// Each move is applied to a scratch copy of the source board, which is reused between calls.
/// The source board is never modified.
#[derive(Clone, Debug)]
pub struct Checker<'a> {
    src: &'a Board,
    scratch: Board,
}

impl<'a> Checker<'a> {
    pub fn new(src: &'a Board) -> Self {
        Checker {
            src,
            scratch: src.clone(),
        }
    }

    /// Returns `true` if the move doesn't leave the king of the moving side under attack
    ///
    /// The move must be semilegal, otherwise the scratch board may become inconsistent and the
    /// result is meaningless.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        self.scratch.clone_from(self.src);
        self.scratch.apply_move(mv);
        !self.scratch.is_opponent_king_attacked()
    }
}

/// Returns `true` if semilegal move `mv` is legal in position `b`
#[inline]
pub(crate) fn is_legal_semilegal(b: &Board, mv: Move) -> bool {
    Checker::new(b).is_legal(mv)
}

/// Returns `true` if `mv` is legal in position `b`
#[inline]
pub fn is_legal(b: &Board, mv: Move) -> bool {
    mv.is_legal(b)
}

/// Returns the position as if `color` were to move
fn as_side(b: &Board, color: Color) -> Cow<'_, Board> {
    if b.side() == color {
        Cow::Borrowed(b)
    } else {
        Cow::Owned(b.with_side(color))
    }
}

/// Returns `true` if the king of color `color` is attacked
///
/// Only the geometry of the attacking pieces is considered, so a pinned piece still gives check.
#[inline]
pub fn is_check(b: &Board, color: Color) -> bool {
    movegen::is_cell_attacked(b, b.king_pos(color), color.inv())
}

/// Returns `true` if side `color` has at least one legal move
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    movegen::has_legal_moves(&as_side(b, color))
}

/// Returns `true` if side `color` is in check and has no legal moves
pub fn is_checkmate(b: &Board, color: Color) -> bool {
    is_check(b, color) && !has_legal_moves(b, color)
}

/// Returns `true` if side `color` is not in check but has no legal moves
pub fn is_stalemate(b: &Board, color: Color) -> bool {
    !is_check(b, color) && !has_legal_moves(b, color)
}
