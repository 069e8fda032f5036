//! Positions: the raw input form and the validated board

use crate::bitboard::Bitboard;
use crate::fen::{self, FenParseError, RawFenParseError};
use crate::moves::{Move, MoveKind, ValidateError as MoveValidateError};
use crate::pieces::{PieceSet, PieceState, MAX_PIECES};
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Outcome, Piece, Rank};
use crate::{geometry, legal, movegen};

use std::fmt::{self, Display};
use std::iter;
use std::str::FromStr;

use thiserror::Error;

/// Error validating a position
///
/// A position with such an error cannot arise in a game, so it is rejected when loaded.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// En passant square is given, but the pawn which has just made a double move is not on
    /// the expected rank
    #[error("bad en passant source {0}")]
    InvalidEnpassant(Coord),
    /// A side has more than 16 pieces
    #[error("{} has too many pieces", .0.as_long_str())]
    TooManyPieces(Color),
    #[error("{} has no king", .0.as_long_str())]
    NoKing(Color),
    #[error("{} has more than one king", .0.as_long_str())]
    TooManyKings(Color),
    /// Pawn stands on the first or the last rank
    #[error("pawn on {0} cannot stand on the edge rank")]
    InvalidPawn(Coord),
    /// The side which is not to move is in check
    #[error("king of the side not to move is in check")]
    OpponentKingAttacked,
}

/// Raw chess board
///
/// Raw board contains all the information needed to set up a position. Unlike [`Board`], it is
/// not validated and may contain an invalid position. It is the input format for loading
/// positions: build or parse a `RawBoard`, then convert it via [`Board::try_from()`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Coord::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// Pawn which may be captured en passant right now
    ///
    /// Contains the square with the pawn which has just made a double move and thus can be
    /// captured en passant, or `None` if there is no such pawn.
    pub ep_source: Option<Coord>,
    /// Half-moves since the last capture or pawn move
    pub move_counter: u16,
    /// Move number, incremented after each move by Black
    pub move_number: u16,
}

impl RawBoard {
    /// Board without pieces, White to move
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_source: None,
            move_counter: 0,
            move_number: 1,
        }
    }

    /// Standard starting position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard {
            castling: CastlingRights::FULL,
            ..RawBoard::empty()
        };
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, piece) in File::iter().zip(BACK_RANK) {
                res.put2(file, rank, Cell::from_parts(color, piece));
            }
        }
        res
    }

    /// Reads the position from a FEN string
    #[inline]
    pub fn from_fen(fen: &str) -> Result<RawBoard, RawFenParseError> {
        RawBoard::from_str(fen)
    }

    /// Contents of the square `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Contents of the square at `file` and `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Overwrites the square `c` with `cell`
    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Same as [`RawBoard::put()`], addressing the square by file and rank
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Returns the destination square for a possible en passant capture, if any
    #[inline]
    pub fn ep_dest(&self) -> Option<Coord> {
        let p = self.ep_source?;
        Some(Coord::from_parts(
            p.file(),
            geometry::enpassant_dst_rank(self.side),
        ))
    }

    /// Returns a printable diagram of the board
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty {
        Pretty { raw: *self, style }
    }

    /// FEN string of the position
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Returns `true` if a piece of color `color` starts the game on `coord`
fn is_home_square(color: Color, piece: Piece, coord: Coord) -> bool {
    match piece {
        Piece::Pawn => coord.rank() == geometry::double_move_src_rank(color),
        _ => {
            coord.rank() == geometry::castling_rank(color)
                && BACK_RANK[coord.file().index()] == piece
        }
    }
}

/// Position which passed validation, so its king positions and piece sets can be trusted
///
/// Besides the cells, the board owns the [`PieceSet`], which tracks the state of every piece
/// (including whether it has moved). The cells and the piece set are always kept consistent.
///
/// The board can only be built from a validated [`RawBoard`] and then changed by making legal
/// moves, so it never contains an unreachable position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; 64],
    pieces: PieceSet,
    side: Color,
    ep_source: Option<Coord>,
    move_counter: u16,
    move_number: u16,
}

impl Board {
    /// Standard starting position
    pub fn initial() -> Board {
        match Board::try_from(RawBoard::initial()) {
            Ok(b) => b,
            Err(e) => panic!("initial position is invalid: {}", e),
        }
    }

    /// Reads the position from a FEN string
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Returns the raw representation of the board
    pub fn raw(&self) -> RawBoard {
        RawBoard {
            cells: self.cells,
            side: self.side,
            castling: self.castling(),
            ep_source: self.ep_source,
            move_counter: self.move_counter,
            move_number: self.move_number,
        }
    }

    /// Contents of the square `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Contents of the square at `file` and `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Returns the piece standing on `c`, if any
    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<PieceState> {
        if self.get(c).is_free() {
            return None;
        }
        self.pieces.get(c).copied()
    }

    /// Returns the piece set
    #[inline]
    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns the square of the pawn which may be captured en passant
    #[inline]
    pub fn ep_source(&self) -> Option<Coord> {
        self.ep_source
    }

    /// Returns the number of half-moves without pawn moves or captures
    #[inline]
    pub fn move_counter(&self) -> u16 {
        self.move_counter
    }

    /// Returns the current move number
    #[inline]
    pub fn move_number(&self) -> u16 {
        self.move_number
    }

    /// Square of the king of color `c`
    #[inline]
    pub fn king_pos(&self, c: Color) -> Coord {
        self.pieces.king_square(c)
    }

    /// Returns the castling rights, derived from the pieces which have not moved yet
    ///
    /// Note that the rights only say that neither king nor rook has moved. Whether castling
    /// is possible right now also depends on the pieces in between and on attacked squares.
    pub fn castling(&self) -> CastlingRights {
        let mut res = CastlingRights::EMPTY;
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::King, CastlingSide::Queen] {
                if self.is_castling_unmoved(color, side) {
                    res.set(color, side);
                }
            }
        }
        res
    }

    pub(crate) fn is_castling_unmoved(&self, color: Color, side: CastlingSide) -> bool {
        let rank = geometry::castling_rank(color);
        let king = Coord::from_parts(File::E, rank);
        let rook = Coord::from_parts(side.rook_src_file(), rank);
        self.get(king) == Cell::from_parts(color, Piece::King)
            && self.get(rook) == Cell::from_parts(color, Piece::Rook)
            && self.pieces.has_moved(king) == Some(false)
            && self.pieces.has_moved(rook) == Some(false)
    }

    /// Returns a copy of the board with `side` to move
    ///
    /// En passant is reset, as it only makes sense right after the opponent's move.
    pub(crate) fn with_side(&self, side: Color) -> Board {
        let mut res = self.clone();
        if res.side != side {
            res.side = side;
            res.ep_source = None;
        }
        res
    }

    /// Validates the move `mv` and returns the board after it
    pub fn make_move(&self, mv: Move) -> Result<Board, MoveValidateError> {
        mv.validate(self)?;
        let mut res = self.clone();
        res.apply_move(mv);
        Ok(res)
    }

    /// Applies the move `mv` to the board
    ///
    /// No legality checks are performed here. The move must be either validated with
    /// [`Move::validate()`] or produced by the legal move generator, otherwise the board
    /// and the piece set may become inconsistent.
    pub(crate) fn apply_move(&mut self, mv: Move) {
        let color = self.side;
        debug_assert_eq!(mv.cell().color(), Some(color));

        self.ep_source = None;

        // Remove the captured piece first, so the mover can take its square.
        if let Some(taken) = mv.captured_coord() {
            let removed = self.pieces.remove(taken);
            debug_assert_eq!(removed.map(|p| p.cell()), mv.captured());
            self.cells[taken.index()] = Cell::EMPTY;
        }

        self.cells[mv.src().index()] = Cell::EMPTY;
        self.pieces.relocate(mv.src(), mv.dst());
        self.cells[mv.dst().index()] = mv.cell();

        match mv.kind() {
            MoveKind::PawnDouble => {
                self.ep_source = Some(mv.dst());
            }
            MoveKind::Castling(side) => {
                let rank = geometry::castling_rank(color);
                let rook_src = Coord::from_parts(side.rook_src_file(), rank);
                let rook_dst = Coord::from_parts(side.rook_dst_file(), rank);
                self.cells[rook_src.index()] = Cell::EMPTY;
                self.pieces.relocate(rook_src, rook_dst);
                self.cells[rook_dst.index()] = Cell::from_parts(color, Piece::Rook);
            }
            MoveKind::Promote(p) => {
                let piece = p.piece();
                self.pieces.promote(mv.dst(), piece);
                self.cells[mv.dst().index()] = Cell::from_parts(color, piece);
            }
            MoveKind::Simple | MoveKind::PawnSimple | MoveKind::Enpassant => {}
        }

        if mv.captured().is_some() || mv.cell().piece() == Some(Piece::Pawn) {
            self.move_counter = 0;
        } else {
            self.move_counter = self.move_counter.saturating_add(1);
        }
        if color == Color::Black {
            self.move_number = self.move_number.saturating_add(1);
        }
        self.side = color.inv();
    }

    /// Returns `true` if the king of the side which has just moved is under attack
    ///
    /// Such boards appear only as scratch copies while checking moves for legality.
    #[inline]
    pub(crate) fn is_opponent_king_attacked(&self) -> bool {
        let c = self.side;
        movegen::is_cell_attacked(self, self.king_pos(c.inv()), c)
    }

    /// Whether the side to move can make any legal move
    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        legal::has_legal_moves(self, self.side)
    }

    /// Whether the king of the side to move is attacked
    #[inline]
    pub fn is_check(&self) -> bool {
        legal::is_check(self, self.side)
    }

    /// Returns `true` if the current side is checkmated
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        legal::is_checkmate(self, self.side)
    }

    /// Returns `true` if the current side is stalemated
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        legal::is_stalemate(self, self.side)
    }

    /// Squares of the pieces checking the side to move
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let c = self.side;
        movegen::cell_attackers(self, self.king_pos(c), c.inv())
    }

    /// Checkmate or stalemate on the board, if the game is over
    ///
    /// Only checkmate and stalemate are considered. This function can be computationally
    /// expensive, as it searches for a legal move.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        if self.has_legal_moves() {
            return None;
        }
        if self.is_check() {
            Some(Outcome::Checkmate {
                winner: self.side.inv(),
            })
        } else {
            Some(Outcome::Stalemate)
        }
    }

    /// Returns a printable diagram of the board
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty {
        self.raw().pretty(style)
    }

    /// FEN string of the position
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(mut raw: RawBoard) -> Result<Board, ValidateError> {
        // Check enpassant
        if let Some(p) = raw.ep_source {
            if p.rank() != geometry::enpassant_src_rank(raw.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }

            // A stale en passant square is dropped instead of rejected. The pawn must stand on
            // `p`, with both squares it has just crossed empty.
            let fwd = geometry::pawn_forward_delta(raw.side);
            let is_free = |c: Option<Coord>| c.map_or(false, |c| raw.get(c).is_free());
            if raw.get(p) != Cell::from_parts(raw.side.inv(), Piece::Pawn)
                || !is_free(p.try_shift(0, fwd))
                || !is_free(p.try_shift(0, 2 * fwd))
            {
                raw.ep_source = None;
            }
        }

        let mut pieces = PieceSet::new();
        for (idx, cell) in raw.cells.iter().enumerate() {
            let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
                continue;
            };
            let coord = Coord::from_index(idx);
            if piece == Piece::Pawn && matches!(coord.rank(), Rank::R1 | Rank::R8) {
                return Err(ValidateError::InvalidPawn(coord));
            }
            let moved = !is_home_square(color, piece, coord);
            pieces
                .add(PieceState {
                    color,
                    piece,
                    coord,
                    moved,
                })
                .map_err(|_| ValidateError::TooManyPieces(color))?;
        }

        for color in [Color::White, Color::Black] {
            let kings = pieces
                .pieces_of(color)
                .filter(|p| p.piece == Piece::King)
                .count();
            if kings == 0 {
                return Err(ValidateError::NoKing(color));
            }
            if kings > 1 {
                return Err(ValidateError::TooManyKings(color));
            }
            debug_assert!(pieces.len(color) <= MAX_PIECES);
        }

        let mut res = Board {
            cells: raw.cells,
            pieces,
            side: raw.side,
            ep_source: raw.ep_source,
            move_counter: raw.move_counter,
            move_number: raw.move_number,
        };

        // Castling rights are kept as "moved" flags of kings and rooks. A piece on its home square
        // counts as unmoved only if the rights allow it.
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            let king = Coord::from_parts(File::E, rank);
            let mut king_unmoved = false;
            for side in [CastlingSide::King, CastlingSide::Queen] {
                let rook = Coord::from_parts(side.rook_src_file(), rank);
                let allowed = raw.castling.has(color, side)
                    && res.get(king) == Cell::from_parts(color, Piece::King)
                    && res.get(rook) == Cell::from_parts(color, Piece::Rook);
                king_unmoved |= allowed;
                if res.get(rook) == Cell::from_parts(color, Piece::Rook) {
                    res.pieces.set_moved(rook, !allowed);
                }
            }
            if res.get(king) == Cell::from_parts(color, Piece::King) {
                res.pieces.set_moved(king, !king_unmoved);
            }
        }

        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Board, ValidateError> {
        (*raw).try_into()
    }
}

/// Character set used by [`RawBoard::pretty()`] and [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Letters for pieces and ASCII frame
    Ascii,
    /// Chess symbols and box-drawing frame
    Utf8,
}

impl PrettyStyle {
    fn cell(self, c: Cell) -> char {
        match self {
            PrettyStyle::Ascii => c.as_char(),
            PrettyStyle::Utf8 => c.as_utf8_char(),
        }
    }

    /// Returns the vertical bar, the horizontal bar and the corner
    fn frame(self) -> (char, char, char) {
        match self {
            PrettyStyle::Ascii => ('|', '-', '+'),
            PrettyStyle::Utf8 => ('│', '─', '┼'),
        }
    }

    fn side(self, c: Color) -> char {
        match (self, c) {
            (PrettyStyle::Ascii, Color::White) => 'W',
            (PrettyStyle::Ascii, Color::Black) => 'B',
            (PrettyStyle::Utf8, Color::White) => '○',
            (PrettyStyle::Utf8, Color::Black) => '●',
        }
    }
}

/// Board diagram, printed via [`Display`]
///
/// White is at the bottom. The corner below the ranks shows the side to move.
pub struct Pretty {
    raw: RawBoard,
    style: PrettyStyle,
}

impl Display for Pretty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let style = self.style;
        let (vert, horz, corner) = style.frame();
        for rank in Rank::iter() {
            let row: String = File::iter()
                .map(|file| style.cell(self.raw.get2(file, rank)))
                .collect();
            writeln!(f, "{}{}{}", rank, vert, row)?;
        }
        let line: String = iter::repeat(horz).take(8).collect();
        writeln!(f, "{}{}{}", horz, corner, line)?;
        let files: String = File::iter().map(|file| file.as_char()).collect();
        writeln!(f, "{}{}{}", style.side(self.raw.side), vert, files)
    }
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        fen::parse(s)
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(RawBoard::from_str(s)?.try_into()?)
    }
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fen::write(self, f)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fen::write(&self.raw(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn play(b: &Board, s: &str) -> Board {
        let mv = Move::from_uci(s, b).unwrap();
        b.make_move(mv).unwrap()
    }

    fn assert_consistent(b: &Board) {
        let mut seen = 0;
        for c in Coord::iter() {
            match b.piece_at(c) {
                Some(p) => {
                    assert_eq!(p.coord, c);
                    assert_eq!(p.cell(), b.get(c));
                    seen += 1;
                }
                None => assert!(b.get(c).is_free()),
            }
        }
        assert_eq!(
            seen,
            b.pieces().len(Color::White) + b.pieces().len(Color::Black)
        );
    }

    #[test]
    fn test_initial() {
        assert_eq!(RawBoard::initial().to_string(), INI_FEN);
        assert_eq!(Board::initial().to_string(), INI_FEN);
        assert_eq!(RawBoard::from_str(INI_FEN), Ok(RawBoard::initial()));
        assert_eq!(Board::from_str(INI_FEN), Ok(Board::initial()));

        let b = Board::initial();
        assert_consistent(&b);
        assert_eq!(b.pieces().len(Color::White), 16);
        assert_eq!(b.pieces().len(Color::Black), 16);
        assert!(b.pieces().pieces_of(Color::White).all(|p| !p.moved));
        assert_eq!(b.king_pos(Color::White), coord("e1"));
        assert_eq!(b.king_pos(Color::Black), coord("e8"));
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(board.as_fen(), FEN);
        assert_eq!(
            board.get2(File::B, Rank::R4),
            Cell::from_parts(Color::Black, Piece::Bishop)
        );
        assert_eq!(
            board.get2(File::F, Rank::R2),
            Cell::from_parts(Color::White, Piece::Queen)
        );
        assert_eq!(board.king_pos(Color::White), coord("h1"));
        assert_eq!(board.king_pos(Color::Black), coord("g8"));
        assert_eq!(board.side(), Color::White);
        assert_eq!(board.castling(), CastlingRights::EMPTY);
        assert_eq!(board.ep_source(), None);
        assert_eq!(board.move_counter(), 1);
        assert_eq!(board.move_number(), 21);
        assert_consistent(&board);
    }

    #[test]
    fn test_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq c6 6 5";

        let raw = RawBoard::from_fen(FEN).unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);
        assert_eq!(raw.ep_source, Some(coord("c5")));
        assert_eq!(raw.ep_dest(), Some(coord("c6")));
        assert_eq!(raw.as_fen(), FEN);

        let board: Board = raw.try_into().unwrap();
        assert_eq!(
            board.castling(),
            CastlingRights::EMPTY.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(board.ep_source(), None);
        assert_eq!(
            board.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q - 6 5"
        );

        // The pawn on c5 cannot have come from c7, which is occupied
        let raw = RawBoard::from_fen("4k3/2n5/8/1Pp5/8/8/8/4K3 w - c6 0 2").unwrap();
        assert_eq!(raw.ep_source, Some(coord("c5")));
        let board: Board = raw.try_into().unwrap();
        assert_eq!(board.ep_source(), None);
        assert_eq!(board.as_fen(), "4k3/2n5/8/1Pp5/8/8/8/4K3 w - - 0 2");

        let board = Board::from_fen("4k3/8/8/1Pp5/8/8/8/4K3 w - c6 0 2").unwrap();
        assert_eq!(board.ep_source(), Some(coord("c5")));
    }

    #[test]
    fn test_counters_saturate() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 65535 10").unwrap();
        let b = b.make_move(Move::from_uci("e1d1", &b).unwrap()).unwrap();
        assert_eq!(b.move_counter(), u16::MAX);
        assert_eq!(b.move_number(), 10);

        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 65535").unwrap();
        let b = b.make_move(Move::from_uci("e8d8", &b).unwrap()).unwrap();
        assert_eq!(b.move_counter(), 1);
        assert_eq!(b.move_number(), u16::MAX);
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            RawBoard::from_fen(""),
            Err(RawFenParseError::Missing("piece placement"))
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(RawFenParseError::Missing("side to move"))
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(RawFenParseError::Missing("castling rights"))
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(RawFenParseError::Missing("en passant square"))
        );

        let raw =
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 10").unwrap();
        assert_eq!(raw.move_counter, 10);
        assert_eq!(raw.move_number, 1);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::NoKing(Color::Black)))
        );
        assert_eq!(
            Board::from_fen("k6k/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::TooManyKings(
                Color::Black
            )))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6P w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::InvalidPawn(coord("h1"))))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6r b - - 0 1"),
            Err(FenParseError::Valid(ValidateError::OpponentKingAttacked))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/7N/PPPPPPPP/KNNNNNNN w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::TooManyPieces(
                Color::White
            )))
        );
    }

    #[test]
    fn test_apply_simple() {
        let mut b = Board::initial();
        for (mv_str, fen_str) in [
            (
                "e2e4",
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            ),
            (
                "b8c6",
                "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2",
            ),
            (
                "g1f3",
                "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 2",
            ),
            (
                "e7e5",
                "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq e6 0 3",
            ),
            (
                "f1b5",
                "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 1 3",
            ),
            (
                "g8f6",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 4",
            ),
            (
                "e1g1",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 4",
            ),
            (
                "f6e4",
                "r1bqkb1r/pppp1ppp/2n5/1B2p3/4n3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 5",
            ),
        ] {
            b = play(&b, mv_str);
            assert_eq!(b.as_fen(), fen_str);
            assert_consistent(&b);
            assert_eq!(Board::try_from(b.raw()).map(|x| x.as_fen()), Ok(b.as_fen()));
        }
    }

    #[test]
    fn test_apply_special() {
        let b = Board::from_fen("1b1b1K2/2P5/8/8/7k/8/8/8 w - - 0 1").unwrap();
        for (mv_str, fen_str) in [
            ("c7c8q", "1bQb1K2/8/8/8/7k/8/8/8 b - - 0 1"),
            ("c7b8n", "1N1b1K2/8/8/8/7k/8/8/8 b - - 0 1"),
            ("c7d8r", "1b1R1K2/8/8/8/7k/8/8/8 b - - 0 1"),
        ] {
            let after = play(&b, mv_str);
            assert_eq!(after.as_fen(), fen_str);
            assert_consistent(&after);
        }

        let b = Board::from_fen("3K4/3p4/8/3PpP2/8/5p2/6P1/2k5 w - e6 0 1").unwrap();
        for (mv_str, fen_str) in [
            ("g2g3", "3K4/3p4/8/3PpP2/8/5pP1/8/2k5 b - - 0 1"),
            ("g2g4", "3K4/3p4/8/3PpP2/6P1/5p2/8/2k5 b - g3 0 1"),
            ("g2f3", "3K4/3p4/8/3PpP2/8/5P2/8/2k5 b - - 0 1"),
            ("d5e6", "3K4/3p4/4P3/5P2/8/5p2/6P1/2k5 b - - 0 1"),
            ("f5e6", "3K4/3p4/4P3/3P4/8/5p2/6P1/2k5 b - - 0 1"),
        ] {
            let after = play(&b, mv_str);
            assert_eq!(after.as_fen(), fen_str);
            assert_consistent(&after);
        }

        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        let after = play(&b, "e8c8");
        assert_eq!(after.as_fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
        assert_eq!(after.pieces().has_moved(coord("d8")), Some(true));
        assert_consistent(&after);
    }

    #[test]
    fn test_rook_capture_drops_castling() {
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let after = play(&b, "a1a8");
        assert_eq!(after.as_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn test_outcome() {
        let b = Board::initial();
        assert_eq!(b.calc_outcome(), None);

        let b = Board::from_fen("rn1q1bnr/ppp1kB1p/3p2p1/3NN3/4P3/8/PPPP1PPP/R1BbK2R b KQ - 2 7")
            .unwrap();
        assert!(!b.has_legal_moves());
        assert!(b.is_checkmate());
        assert_eq!(
            b.calc_outcome(),
            Some(Outcome::Checkmate {
                winner: Color::White
            })
        );
        assert_eq!(b.checkers().len(), 1);

        let b = Board::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(!b.has_legal_moves());
        assert!(b.is_stalemate());
        assert_eq!(b.calc_outcome(), Some(Outcome::Stalemate));
    }

    #[test]
    fn test_pretty() {
        let r = RawBoard::initial();

        let res = r#"
8|rnbqkbnr
7|pppppppp
6|........
5|........
4|........
3|........
2|PPPPPPPP
1|RNBQKBNR
-+--------
W|abcdefgh
"#;
        assert_eq!(r.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
        assert_eq!(
            Board::initial()
                .pretty(PrettyStyle::Ascii)
                .to_string()
                .trim(),
            res.trim()
        );

        let res = r#"
8│♜♞♝♛♚♝♞♜
7│♟♟♟♟♟♟♟♟
6│........
5│........
4│........
3│........
2│♙♙♙♙♙♙♙♙
1│♖♘♗♕♔♗♘♖
─┼────────
○│abcdefgh
"#;
        assert_eq!(r.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    }
}
