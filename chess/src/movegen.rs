//! Attack geometry and semilegal or legal move generation

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::legal::Checker;
use crate::moves::{Move, MoveKind, PromotePiece};
use crate::types::{CastlingSide, Cell, Color, Coord, File, Piece};
use crate::geometry;

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

fn is_diag(p: Piece) -> bool {
    matches!(p, Piece::Bishop | Piece::Queen)
}

fn is_line(p: Piece) -> bool {
    matches!(p, Piece::Rook | Piece::Queen)
}

/// Walks from `src` in direction `dir`, calling `f` on each square until a piece is met
///
/// The square with the blocking piece is passed to `f` as well.
fn walk_ray(b: &Board, src: Coord, dir: (isize, isize), mut f: impl FnMut(Coord)) {
    let mut cur = src;
    while let Some(next) = cur.try_shift(dir.0, dir.1) {
        f(next);
        if b.get(next).is_occupied() {
            break;
        }
        cur = next;
    }
}

/// Returns the first occupied square from `src` in direction `dir`, if any
fn ray_blocker(b: &Board, src: Coord, dir: (isize, isize)) -> Option<Coord> {
    let mut cur = src;
    while let Some(next) = cur.try_shift(dir.0, dir.1) {
        if b.get(next).is_occupied() {
            return Some(next);
        }
        cur = next;
    }
    None
}

fn leaper_attacks(src: Coord, deltas: &[(isize, isize)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(df, dr)| src.try_shift(df, dr))
        .collect()
}

fn pawn_attacks(c: Color, src: Coord) -> Bitboard {
    let fwd = geometry::pawn_forward_delta(c);
    leaper_attacks(src, &[(-1, fwd), (1, fwd)])
}

/// Returns all the squares attacked by the piece on `coord`
///
/// For sliding pieces, the squares behind the first blocker are not included. The blocker itself
/// is included regardless of its color. Returns an empty set if `coord` is empty.
pub fn attacks_from(b: &Board, coord: Coord) -> Bitboard {
    let cell = b.get(coord);
    let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
        return Bitboard::EMPTY;
    };
    match piece {
        Piece::Pawn => pawn_attacks(color, coord),
        Piece::Knight => leaper_attacks(coord, &geometry::KNIGHT_DELTAS),
        Piece::King => leaper_attacks(coord, &geometry::KING_DELTAS),
        Piece::Bishop | Piece::Rook | Piece::Queen => {
            let mut res = Bitboard::EMPTY;
            if is_diag(piece) {
                for dir in geometry::DIAG_DIRS {
                    walk_ray(b, coord, dir, |c| res.set(c));
                }
            }
            if is_line(piece) {
                for dir in geometry::LINE_DIRS {
                    walk_ray(b, coord, dir, |c| res.set(c));
                }
            }
            res
        }
    }
}

/// Returns all the pieces of color `color` which attack `coord`
///
/// Attacks are traced back from `coord`, so the square itself may hold any piece (or be empty).
/// The king safety of the attacking side is not considered.
pub fn cell_attackers(b: &Board, coord: Coord, color: Color) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    let has = |c: Coord, p: Piece| b.get(c) == Cell::from_parts(color, p);

    // Here, we use the pawn attack map of the other color, as we trace the attack from destination
    for src in pawn_attacks(color.inv(), coord) {
        if has(src, Piece::Pawn) {
            res.set(src);
        }
    }
    for src in leaper_attacks(coord, &geometry::KNIGHT_DELTAS) {
        if has(src, Piece::Knight) {
            res.set(src);
        }
    }
    for src in leaper_attacks(coord, &geometry::KING_DELTAS) {
        if has(src, Piece::King) {
            res.set(src);
        }
    }

    for (dirs, pred) in [
        (geometry::DIAG_DIRS, is_diag as fn(Piece) -> bool),
        (geometry::LINE_DIRS, is_line as fn(Piece) -> bool),
    ] {
        for dir in dirs {
            let Some(src) = ray_blocker(b, coord, dir) else {
                continue;
            };
            let cell = b.get(src);
            if cell.color() == Some(color) && cell.piece().map_or(false, pred) {
                res.set(src);
            }
        }
    }

    res
}

/// Returns `true` if `coord` is attacked by any piece of color `color`
#[inline]
pub fn is_cell_attacked(b: &Board, coord: Coord, color: Color) -> bool {
    cell_attackers(b, coord, color).is_nonempty()
}

/// Returns `true` if castling for `color` on side `side` is possible in position `b`
///
/// Checks that neither the king nor the rook have moved, that the squares between them are empty,
/// and that the king doesn't start, pass or land on an attacked square.
pub fn can_castle(b: &Board, color: Color, side: CastlingSide) -> bool {
    if !b.is_castling_unmoved(color, side) {
        return false;
    }
    let rank = geometry::castling_rank(color);
    let (lo, hi) = match side {
        CastlingSide::King => (File::F.index(), File::G.index()),
        CastlingSide::Queen => (File::B.index(), File::D.index()),
    };
    if (lo..=hi).any(|f| b.get2(File::from_index(f), rank).is_occupied()) {
        return false;
    }
    let king_path = match side {
        CastlingSide::King => [File::E, File::F, File::G],
        CastlingSide::Queen => [File::E, File::D, File::C],
    };
    !king_path
        .into_iter()
        .any(|f| is_cell_attacked(b, Coord::from_parts(f, rank), color.inv()))
}

trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// List of moves which doesn't allocate
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Sink for generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Infallible> {
        MovePush::push(self, m);
        Ok(())
    }
}

/// Passes only legal moves to the inner sink
struct LegalFilter<'a, P> {
    checker: Checker<'a>,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, m: Move) -> Result<(), P::Err> {
        if self.checker.is_legal(m) {
            self.inner.push(m)?;
        }
        Ok(())
    }
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

struct MoveGen<'a, P> {
    board: &'a Board,
    dst: &'a mut P,
    color: Color,
}

impl<'a, P: MaybeMovePush> MoveGen<'a, P> {
    fn new(board: &'a Board, dst: &'a mut P) -> Self {
        MoveGen {
            board,
            dst,
            color: board.side(),
        }
    }

    fn add_move(&mut self, kind: MoveKind, src: Coord, dst: Coord) -> Result<(), P::Err> {
        let cell = self.board.get(src);
        let target = self.board.get(dst);
        let captured = target.is_occupied().then_some(target);
        self.dst
            .push(Move::from_parts(kind, src, dst, cell, captured))
    }

    /// Returns `true` if a piece of the current side may go to `dst`
    fn can_land(&self, dst: Coord) -> bool {
        let cell = self.board.get(dst);
        cell.color() != Some(self.color) && cell.piece() != Some(Piece::King)
    }

    fn add_pawn_step(&mut self, src: Coord, dst: Coord) -> Result<(), P::Err> {
        if dst.rank() == geometry::promote_dst_rank(self.color) {
            for p in PromotePiece::ALL {
                self.add_move(MoveKind::Promote(p), src, dst)?;
            }
            Ok(())
        } else {
            self.add_move(MoveKind::PawnSimple, src, dst)
        }
    }

    fn gen_pawn(&mut self, src: Coord) -> Result<(), P::Err> {
        let b = self.board;
        let fwd = geometry::pawn_forward_delta(self.color);

        if let Some(dst) = src.try_shift(0, fwd).filter(|&c| b.get(c).is_free()) {
            self.add_pawn_step(src, dst)?;
            if src.rank() == geometry::double_move_src_rank(self.color) {
                if let Some(dst) = src.try_shift(0, 2 * fwd).filter(|&c| b.get(c).is_free()) {
                    self.add_move(MoveKind::PawnDouble, src, dst)?;
                }
            }
        }

        for dst in pawn_attacks(self.color, src) {
            if b.get(dst).color() == Some(self.color.inv()) && self.can_land(dst) {
                self.add_pawn_step(src, dst)?;
            }
        }

        if let Some(ep) = b.ep_source() {
            if ep.rank() == src.rank()
                && ep.file().index().abs_diff(src.file().index()) == 1
                && b.get(ep) == Cell::from_parts(self.color.inv(), Piece::Pawn)
            {
                let df = ep.file().index() as isize - src.file().index() as isize;
                if let Some(dst) = src.try_shift(df, fwd) {
                    let mv = Move::from_parts(
                        MoveKind::Enpassant,
                        src,
                        dst,
                        b.get(src),
                        Some(b.get(ep)),
                    );
                    self.dst.push(mv)?;
                }
            }
        }
        Ok(())
    }

    fn gen_piece(&mut self, src: Coord) -> Result<(), P::Err> {
        for dst in attacks_from(self.board, src) {
            if self.can_land(dst) {
                self.add_move(MoveKind::Simple, src, dst)?;
            }
        }
        Ok(())
    }

    fn gen_castling(&mut self) -> Result<(), P::Err> {
        for side in [CastlingSide::King, CastlingSide::Queen] {
            if can_castle(self.board, self.color, side) {
                self.dst.push(Move::from_castling(self.color, side))?;
            }
        }
        Ok(())
    }

    fn gen_all(&mut self) -> Result<(), P::Err> {
        let board = self.board;
        for p in board.pieces().pieces_of(self.color) {
            match p.piece {
                Piece::Pawn => self.gen_pawn(p.coord)?,
                _ => self.gen_piece(p.coord)?,
            }
        }
        self.gen_castling()
    }
}

/// Generates all the semilegal moves into `dst`
pub fn gen_semilegal_into<P: MovePush>(b: &Board, dst: &mut P) {
    let _ = MoveGen::new(b, dst).gen_all();
}

/// Generates all the semilegal moves
///
/// The king may remain under attack after such moves.
pub fn gen_semilegal(b: &Board) -> MoveList {
    let mut res = MoveList::new();
    gen_semilegal_into(b, &mut res);
    res
}

/// Generates all the legal moves into `dst`
pub fn gen_legal_into<P: MovePush>(b: &Board, dst: &mut P) {
    let mut p = LegalFilter {
        checker: Checker::new(b),
        inner: dst,
    };
    let _ = MoveGen::new(b, &mut p).gen_all();
}

/// Generates all the legal moves
pub fn gen_legal(b: &Board) -> MoveList {
    let mut res = MoveList::new();
    gen_legal_into(b, &mut res);
    res
}

/// Returns `true` if the side to move has at least one legal move
///
/// Stops on the first legal move found.
pub fn has_legal_moves(b: &Board) -> bool {
    let mut err_on_first = ErrOnFirst;
    let mut p = LegalFilter {
        checker: Checker::new(b),
        inner: &mut err_on_first,
    };
    MoveGen::new(b, &mut p).gen_all().is_err()
}
