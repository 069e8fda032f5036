use super::uci;
use crate::board::Board;
use crate::types::{CastlingSide, Cell, Color, Coord, File, Piece};
use crate::{geometry, legal, movegen};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// What a move does besides relocating a piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move of a piece other than a pawn, castling excluded
    Simple,
    /// Pawn push by one square or a regular pawn capture, not reaching the last rank
    PawnSimple,
    /// Pawn push by two squares from its starting rank
    PawnDouble,
    Enpassant,
    /// King and rook move together
    Castling(CastlingSide),
    /// Pawn reaches the last rank, possibly capturing, and turns into the given piece
    Promote(PromotePiece),
}

/// Piece a pawn may turn into
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromotePiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

/// Special rule involved in a move, if any
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Special {
    /// Regular move or capture
    None,
    /// Castling, either side
    Castle,
    /// En passant capture
    EnPassant,
    /// Pawn promotion, either with or without capture
    Promotion,
}

const PROMOTE_CHARS: [char; 4] = ['n', 'b', 'r', 'q'];

impl PromotePiece {
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Rook,
        PromotePiece::Queen,
    ];

    /// Returns the lowercase letter used for this piece in UCI notation
    pub fn as_char(self) -> char {
        PROMOTE_CHARS[self as usize]
    }

    pub fn from_char(c: char) -> Option<PromotePiece> {
        let pos = PROMOTE_CHARS.iter().position(|&x| x == c)?;
        Some(Self::ALL[pos])
    }

    /// Piece which appears on the board after promotion
    pub fn piece(self) -> Piece {
        match self {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl MoveKind {
    /// Piece which replaces the pawn, if this is a promotion
    #[inline]
    pub fn promote(self) -> Option<PromotePiece> {
        match self {
            MoveKind::Promote(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn castling_side(self) -> Option<CastlingSide> {
        match self {
            MoveKind::Castling(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    pub fn special(self) -> Special {
        match self {
            MoveKind::Simple | MoveKind::PawnSimple | MoveKind::PawnDouble => Special::None,
            MoveKind::Castling(_) => Special::Castle,
            MoveKind::Enpassant => Special::EnPassant,
            MoveKind::Promote(_) => Special::Promotion,
        }
    }
}

/// Chess move
///
/// Besides the source and destination squares, the move records the piece which moves and the
/// piece it captures, as they were on the board before the move. So the move can be displayed
/// or logged without looking at the board.
///
/// Moves can have different degrees of validity:
///
/// - _Semilegal_. A move is considered semi-legal if it's valid by the rules of chess, except that
///   the king can remain under attack after such move.
///
/// - _Legal_. A move is considered legal if it's semilegal plus the king doesn't remain under
///   attack. So, such move is fully valid by the rules of chess.
///
/// Only legal moves are ever applied to a [`Board`]. Use [`Move::validate()`] or
/// [`Board::make_move()`] to check a move which comes from the outside.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Coord,
    dst: Coord,
    cell: Cell,
    captured: Option<Cell>,
}

/// Error indicating that move is invalid
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// The moving piece doesn't belong to the side to move
    #[error("piece on {0} does not belong to the side to move")]
    NotOwnPiece(Coord),
    /// Move is not semi-legal
    #[error("move is not semi-legal")]
    NotSemiLegal,
    /// Move is not legal
    #[error("move is not legal")]
    NotLegal,
}

/// Error creating move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CreateError {
    /// Source and destination are the same square
    #[error("source and destination are the same square")]
    SameSquare,
    /// There is no piece to move
    #[error("no piece on {0}")]
    EmptySource(Coord),
    /// Promote piece is given for a move which is not a promote
    #[error("unexpected promote piece")]
    UnexpectedPromote,
    /// Pawn moves to the last rank, but the promote piece is not given
    #[error("promote piece is required")]
    MissingPromote,
}

impl Move {
    pub(crate) const fn from_parts(
        kind: MoveKind,
        src: Coord,
        dst: Coord,
        cell: Cell,
        captured: Option<Cell>,
    ) -> Move {
        Move {
            kind,
            src,
            dst,
            cell,
            captured,
        }
    }

    /// Creates a castling move made by `color` with side `side`
    pub fn from_castling(color: Color, side: CastlingSide) -> Move {
        let rank = geometry::castling_rank(color);
        Move {
            kind: MoveKind::Castling(side),
            src: Coord::from_parts(File::E, rank),
            dst: Coord::from_parts(side.king_dst_file(), rank),
            cell: Cell::from_parts(color, Piece::King),
            captured: None,
        }
    }

    /// Returns `true` if the piece moving from `src` to `dst` must be promoted
    pub fn needs_promote(b: &Board, src: Coord, dst: Coord) -> bool {
        let cell = b.get(src);
        match (cell.color(), cell.piece()) {
            (Some(color), Some(Piece::Pawn)) => dst.rank() == geometry::promote_dst_rank(color),
            _ => false,
        }
    }

    /// Creates a move from its source and destination squares in position `b`
    ///
    /// The kind of the move is inferred from the piece on `src`. The returned move is **not**
    /// guaranteed to be semilegal.
    pub fn from_coords(
        b: &Board,
        src: Coord,
        dst: Coord,
        promote: Option<PromotePiece>,
    ) -> Result<Move, CreateError> {
        if src == dst {
            return Err(CreateError::SameSquare);
        }
        let cell = b.get(src);
        let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
            return Err(CreateError::EmptySource(src));
        };
        let target = b.get(dst);
        let mut captured = target.is_occupied().then_some(target);

        let kind = match piece {
            Piece::Pawn => {
                if dst.rank() == geometry::promote_dst_rank(color) {
                    MoveKind::Promote(promote.ok_or(CreateError::MissingPromote)?)
                } else if promote.is_some() {
                    return Err(CreateError::UnexpectedPromote);
                } else if src.file() == dst.file()
                    && src.rank() == geometry::double_move_src_rank(color)
                    && dst.rank() == geometry::double_move_dst_rank(color)
                {
                    MoveKind::PawnDouble
                } else if src.file() != dst.file() && target.is_free() {
                    captured = Some(b.get(Coord::from_parts(dst.file(), src.rank())))
                        .filter(|c| c.is_occupied());
                    MoveKind::Enpassant
                } else {
                    MoveKind::PawnSimple
                }
            }
            _ if promote.is_some() => return Err(CreateError::UnexpectedPromote),
            Piece::King => {
                let rank = geometry::castling_rank(color);
                let home = Coord::from_parts(File::E, rank);
                if src == home && dst == Coord::from_parts(File::G, rank) {
                    MoveKind::Castling(CastlingSide::King)
                } else if src == home && dst == Coord::from_parts(File::C, rank) {
                    MoveKind::Castling(CastlingSide::Queen)
                } else {
                    MoveKind::Simple
                }
            }
            _ => MoveKind::Simple,
        };

        Ok(Move {
            kind,
            src,
            dst,
            cell,
            captured,
        })
    }

    /// Creates a move from the UCI string `s` if `b` is the positon preceding this move
    ///
    /// The returned move is **not** guaranteed to be semilegal.
    #[inline]
    pub fn from_uci(s: &str, b: &Board) -> Result<Move, uci::BasicParseError> {
        Ok(uci::Move::from_str(s)?.into_move(b)?)
    }

    /// Same as [`Move::from_uci()`], but the returned move is guaranteed to be legal
    pub fn from_uci_legal(s: &str, b: &Board) -> Result<Move, uci::ParseError> {
        let res = uci::Move::from_str(s)?.into_move(b)?;
        res.validate(b)?;
        Ok(res)
    }

    /// Returns `true` if the move is semilegal
    pub fn is_semilegal(&self, b: &Board) -> bool {
        let color = b.side();
        if b.get(self.src) != self.cell || self.cell.color() != Some(color) {
            return false;
        }

        // The captured piece must be an enemy one, and kings are never captured
        if let Some(taken) = self.captured {
            if taken.color() != Some(color.inv()) || taken.piece() == Some(Piece::King) {
                return false;
            }
        }
        if self.kind != MoveKind::Enpassant {
            let target = b.get(self.dst);
            if target.is_occupied().then_some(target) != self.captured {
                return false;
            }
        }

        let fwd = geometry::pawn_forward_delta(color);
        let is_pawn = self.cell.piece() == Some(Piece::Pawn);
        match self.kind {
            MoveKind::Simple => !is_pawn && movegen::attacks_from(b, self.src).has(self.dst),
            MoveKind::PawnSimple => {
                is_pawn
                    && self.dst.rank() != geometry::promote_dst_rank(color)
                    && self.is_pawn_step(fwd)
            }
            MoveKind::PawnDouble => {
                let mid = self.src.try_shift(0, fwd);
                is_pawn
                    && self.captured.is_none()
                    && self.src.rank() == geometry::double_move_src_rank(color)
                    && self.src.try_shift(0, 2 * fwd) == Some(self.dst)
                    && mid.map_or(false, |c| b.get(c).is_free())
            }
            MoveKind::Enpassant => {
                let taken = Coord::from_parts(self.dst.file(), self.src.rank());
                is_pawn
                    && b.ep_source() == Some(taken)
                    && self.src.rank() == geometry::enpassant_src_rank(color)
                    && self.captured == Some(Cell::from_parts(color.inv(), Piece::Pawn))
                    && b.get(taken) == Cell::from_parts(color.inv(), Piece::Pawn)
                    && b.get(self.dst).is_free()
                    && self.src.file().index().abs_diff(self.dst.file().index()) == 1
                    && self.src.try_shift(0, fwd).map(|c| c.rank()) == Some(self.dst.rank())
            }
            MoveKind::Castling(side) => {
                *self == Move::from_castling(color, side) && movegen::can_castle(b, color, side)
            }
            MoveKind::Promote(_) => {
                is_pawn
                    && self.dst.rank() == geometry::promote_dst_rank(color)
                    && self.is_pawn_step(fwd)
            }
        }
    }

    /// Single pawn step, either a push onto a free square or a diagonal capture
    fn is_pawn_step(&self, fwd: isize) -> bool {
        let df = self.dst.file().index() as isize - self.src.file().index() as isize;
        if self.src.try_shift(df, fwd) != Some(self.dst) {
            return false;
        }
        match df {
            0 => self.captured.is_none(),
            -1 | 1 => self.captured.is_some(),
            _ => false,
        }
    }

    /// Returns `true` if the move is legal
    #[inline]
    pub fn is_legal(&self, b: &Board) -> bool {
        self.is_semilegal(b) && legal::is_legal_semilegal(b, *self)
    }

    /// Validates whether this move is semilegal from position `b`
    pub fn semi_validate(&self, b: &Board) -> Result<(), ValidateError> {
        if self.cell.color() != Some(b.side()) {
            return Err(ValidateError::NotOwnPiece(self.src));
        }
        if !self.is_semilegal(b) {
            return Err(ValidateError::NotSemiLegal);
        }
        Ok(())
    }

    /// Validates whether this move is legal from position `b`
    #[inline]
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        self.semi_validate(b)?;
        match legal::is_legal_semilegal(b, *self) {
            true => Ok(()),
            false => Err(ValidateError::NotLegal),
        }
    }

    /// Returns the move kind
    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the special rule this move follows
    #[inline]
    pub fn special(&self) -> Special {
        self.kind.special()
    }

    /// Returns the move source square
    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    /// Returns the move destination square
    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns the moving piece, as it stood on the source square
    #[inline]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Returns the side which makes this move
    #[inline]
    pub fn side(&self) -> Color {
        self.cell
            .color()
            .unwrap_or_else(|| panic!("corrupted state: move {} has no piece", self))
    }

    /// Returns the captured piece, if any
    #[inline]
    pub const fn captured(&self) -> Option<Cell> {
        self.captured
    }

    /// Returns the square of the captured piece, if any
    ///
    /// Differs from [`Move::dst()`] only for en passant.
    pub fn captured_coord(&self) -> Option<Coord> {
        self.captured?;
        match self.kind {
            MoveKind::Enpassant => Some(Coord::from_parts(self.dst.file(), self.src.rank())),
            _ => Some(self.dst),
        }
    }

    /// Converts this move into a parsed UCI representation
    #[inline]
    pub fn uci(&self) -> uci::Move {
        (*self).into()
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.uci().fmt(f)
    }
}
