//! Reading and writing positions in Forsyth-Edwards notation

use crate::board::{RawBoard, ValidateError};
use crate::geometry;
use crate::types::{
    CastlingRights, CastlingRightsParseError, Cell, Color, ColorParseError, Coord, CoordError,
    File, Rank,
};

use std::fmt::{self, Write};
use std::num::ParseIntError;

use thiserror::Error;

/// Error in the piece placement field
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementError {
    #[error("rank {0} describes more than 8 squares")]
    LongRank(Rank),
    #[error("rank {0} describes less than 8 squares")]
    ShortRank(Rank),
    #[error("less than 8 ranks")]
    MissingRanks,
    #[error("more than 8 ranks")]
    ExtraRanks,
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`RawBoard`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    #[error("FEN contains non-ASCII characters")]
    NonAscii,
    /// A mandatory field is absent. The four first fields are mandatory, while the move counters
    /// default to `0 1`.
    #[error("no {0} in FEN")]
    Missing(&'static str),
    #[error("bad piece placement: {0}")]
    Placement(#[from] PlacementError),
    #[error("bad side to move: {0}")]
    Side(#[from] ColorParseError),
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    #[error("bad en passant square: {0}")]
    EnPassant(#[from] CoordError),
    /// En passant square does not lie right behind a pawn of the side which has just moved
    #[error("en passant square {0} is on a wrong rank")]
    EnPassantRank(Coord),
    #[error("bad half-move clock: {0}")]
    HalfmoveClock(ParseIntError),
    #[error("bad move number: {0}")]
    MoveNumber(ParseIntError),
    #[error("trailing data after FEN")]
    TrailingData,
}

/// Error parsing a valid [`Board`](crate::Board) from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    #[error("cannot parse FEN: {0}")]
    Fen(#[from] RawFenParseError),
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

fn parse_placement(s: &str) -> Result<[Cell; 64], PlacementError> {
    let mut cells = [Cell::EMPTY; 64];
    let mut rows = s.split('/');
    for rank in Rank::iter() {
        let row = rows.next().ok_or(PlacementError::MissingRanks)?;
        let mut files = File::iter();
        for ch in row.chars() {
            match ch.to_digit(10) {
                Some(skip @ 1..=8) => {
                    for _ in 0..skip {
                        files.next().ok_or(PlacementError::LongRank(rank))?;
                    }
                }
                _ => {
                    let cell = Cell::from_char(ch)
                        .filter(Cell::is_occupied)
                        .ok_or(PlacementError::UnexpectedChar(ch))?;
                    let file = files.next().ok_or(PlacementError::LongRank(rank))?;
                    cells[Coord::from_parts(file, rank).index()] = cell;
                }
            }
        }
        if files.next().is_some() {
            return Err(PlacementError::ShortRank(rank));
        }
    }
    if rows.next().is_some() {
        return Err(PlacementError::ExtraRanks);
    }
    Ok(cells)
}

/// Parses the en passant target square and converts it into the square of the pawn to capture
fn parse_ep(s: &str, side: Color) -> Result<Option<Coord>, RawFenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let dst: Coord = s.parse()?;
    if dst.rank() != geometry::enpassant_dst_rank(side) {
        return Err(RawFenParseError::EnPassantRank(dst));
    }
    Ok(Some(Coord::from_parts(
        dst.file(),
        geometry::enpassant_src_rank(side),
    )))
}

pub(crate) fn parse(s: &str) -> Result<RawBoard, RawFenParseError> {
    if !s.is_ascii() {
        return Err(RawFenParseError::NonAscii);
    }
    let mut fields = s.split_ascii_whitespace();
    let mut field = |name: &'static str| fields.next().ok_or(RawFenParseError::Missing(name));

    let cells = parse_placement(field("piece placement")?)?;
    let side: Color = field("side to move")?.parse()?;
    let castling: CastlingRights = field("castling rights")?.parse()?;
    let ep_source = parse_ep(field("en passant square")?, side)?;
    let move_counter = match fields.next() {
        Some(v) => v.parse::<u16>().map_err(RawFenParseError::HalfmoveClock)?,
        None => 0,
    };
    let move_number = match fields.next() {
        Some(v) => v.parse::<u16>().map_err(RawFenParseError::MoveNumber)?,
        None => 1,
    };
    if fields.next().is_some() {
        return Err(RawFenParseError::TrailingData);
    }

    Ok(RawBoard {
        cells,
        side,
        castling,
        ep_source,
        move_counter,
        move_number,
    })
}

fn write_placement(cells: &[Cell; 64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rank in Rank::iter() {
        if rank != Rank::R8 {
            f.write_char('/')?;
        }
        let mut gap = 0;
        for file in File::iter() {
            let cell = cells[Coord::from_parts(file, rank).index()];
            if cell.is_free() {
                gap += 1;
                continue;
            }
            if gap > 0 {
                write!(f, "{}", gap)?;
                gap = 0;
            }
            f.write_char(cell.as_char())?;
        }
        if gap > 0 {
            write!(f, "{}", gap)?;
        }
    }
    Ok(())
}

pub(crate) fn write(b: &RawBoard, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_placement(&b.cells, f)?;
    write!(f, " {} {} ", b.side, b.castling)?;
    match b.ep_dest() {
        Some(dst) => write!(f, "{}", dst)?,
        None => f.write_char('-')?,
    }
    write!(f, " {} {}", b.move_counter, b.move_number)
}
