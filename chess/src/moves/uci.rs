//! Long algebraic move notation as used by UCI engines, like `e2e4` or `a7a8q`

use super::base::{self, CreateError, PromotePiece, ValidateError};
use crate::board::Board;
use crate::types::{Coord, CoordError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Malformed UCI string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    #[error("UCI move must be 4 or 5 ASCII chars long")]
    Length,
    #[error("source square: {0}")]
    Source(CoordError),
    #[error("destination square: {0}")]
    Destination(CoordError),
    #[error("{0:?} is not a promotion piece")]
    Promote(char),
}

/// UCI string which does not describe a move on the given board
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BasicParseError {
    #[error(transparent)]
    Parse(#[from] RawParseError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

/// UCI string which does not describe a legal move on the given board
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Parse(#[from] RawParseError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error("illegal move: {0}")]
    Validate(#[from] ValidateError),
}

/// Parsed move in UCI format
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
    /// Piece to promote, if any
    pub promote: Option<PromotePiece>,
}

impl Move {
    /// Converts the UCI move into [`moves::Move`](super::Move) in position `b`
    #[inline]
    pub fn into_move(self, b: &Board) -> Result<base::Move, CreateError> {
        base::Move::from_coords(b, self.src, self.dst, self.promote)
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        Move {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv.kind().promote(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() {
            return Err(RawParseError::Length);
        }
        let (src, dst, promote) = match s.len() {
            4 => (&s[0..2], &s[2..4], None),
            5 => (&s[0..2], &s[2..4], s.chars().nth(4)),
            _ => return Err(RawParseError::Length),
        };
        Ok(Move {
            src: src.parse().map_err(RawParseError::Source)?,
            dst: dst.parse().map_err(RawParseError::Destination)?,
            promote: promote
                .map(|c| PromotePiece::from_char(c).ok_or(RawParseError::Promote(c)))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use crate::types::{File, Rank};

    #[test]
    fn test_simple() {
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        assert_eq!(
            Move::from_str("e2e4").unwrap(),
            Move {
                src: e2,
                dst: e4,
                promote: None
            }
        );
        let mv = Move::from_str("e2e4")
            .unwrap()
            .into_move(&Board::initial())
            .unwrap();
        assert_eq!(mv.kind(), MoveKind::PawnDouble);
        assert_eq!(mv.src(), e2);
        assert_eq!(mv.dst(), e4);
        assert_eq!(Move::from(mv).to_string(), "e2e4");
    }

    #[test]
    fn test_promote() {
        let mv = Move::from_str("a7a8n").unwrap();
        assert_eq!(mv.promote, Some(PromotePiece::Knight));
        assert_eq!(mv.to_string(), "a7a8n");
    }

    #[test]
    fn test_errors() {
        assert_eq!(Move::from_str("e2"), Err(RawParseError::Length));
        assert_eq!(Move::from_str("e2e4qq"), Err(RawParseError::Length));
        assert_eq!(
            Move::from_str("i2e4"),
            Err(RawParseError::Source(CoordError::UnexpectedFileChar('i')))
        );
        assert_eq!(
            Move::from_str("e2e9"),
            Err(RawParseError::Destination(CoordError::UnexpectedRankChar('9')))
        );
        assert_eq!(Move::from_str("e7e8k"), Err(RawParseError::Promote('k')));
        assert_eq!(
            base::Move::from_uci("e3e4", &Board::initial()),
            Err(BasicParseError::Create(CreateError::EmptySource(
                Coord::from_parts(File::E, Rank::R3)
            )))
        );
        assert_eq!(
            base::Move::from_uci_legal("e2e5", &Board::initial()),
            Err(ParseError::Validate(ValidateError::NotSemiLegal))
        );
    }
}
