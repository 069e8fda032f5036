use crate::types::{Coord, File, Rank};
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::fmt;
use std::iter::FromIterator;

/// Set of squares
///
/// Used to report attack sets and checking pieces. Bit `i` corresponds to
/// the coordinate with index `i`.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not)]
pub struct Bitboard(u64);

const fn bit(coord: Coord) -> u64 {
    1 << coord.index()
}

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub const fn from_coord(coord: Coord) -> Bitboard {
        Bitboard(bit(coord))
    }

    #[inline]
    pub fn set(&mut self, coord: Coord) {
        self.0 |= bit(coord);
    }

    #[inline]
    pub const fn has(&self, coord: Coord) -> bool {
        self.0 & bit(coord) != 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the square with the lowest index, if any
    pub fn first(&self) -> Option<Coord> {
        self.iter().next()
    }

    pub fn iter(&self) -> Iter {
        Iter(self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.to_string())).finish()
    }
}

/// Renders the set as eight rows of `x` and `.`, from rank 8 down to rank 1
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            let row: String = File::iter()
                .map(|file| match self.has(Coord::from_parts(file, rank)) {
                    true => 'x',
                    false => '.',
                })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Iterator over the squares of a [`Bitboard`], in index order
pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let idx = self.0.trailing_zeros() as usize;
        let coord = (idx < 64).then(|| Coord::from_index(idx))?;
        self.0 ^= bit(coord);
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for Bitboard {
    type Item = Coord;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl FromIterator<Coord> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Bitboard {
        let mut res = Bitboard::EMPTY;
        for coord in iter {
            res.set(coord);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    #[test]
    fn test_membership() {
        let mut bb = Bitboard::EMPTY;
        assert!(bb.is_empty());
        assert_eq!(bb.first(), None);

        bb.set(sq("c3"));
        bb.set(sq("c3"));
        bb.set(sq("h8"));
        assert_eq!(bb.len(), 2);
        assert!(bb.has(sq("c3")));
        assert!(bb.has(sq("h8")));
        assert!(!bb.has(sq("a1")));
        // Rank 8 comes first in index order
        assert_eq!(bb.first(), Some(sq("h8")));
        assert_eq!(bb.iter().len(), 2);
    }

    #[test]
    fn test_set_ops() {
        let left: Bitboard = ["a1", "d4"].into_iter().map(sq).collect();
        let right: Bitboard = ["d4", "g7"].into_iter().map(sq).collect();
        assert_eq!(left & right, Bitboard::from_coord(sq("d4")));
        assert_eq!((left | right).len(), 3);
        assert_eq!((!left).len(), 62);

        let mut acc = Bitboard::EMPTY;
        acc |= left;
        acc &= right;
        assert_eq!(acc.into_iter().collect::<Vec<_>>(), vec![sq("d4")]);
    }

    #[test]
    fn test_format() {
        let bb: Bitboard = ["a8", "e4", "h1"].into_iter().map(sq).collect();
        assert_eq!(format!("{:?}", bb), r#"{"a8", "e4", "h1"}"#);
        assert_eq!(
            bb.to_string(),
            "x.......\n........\n........\n........\n....x...\n........\n........\n.......x\n"
        );
    }
}
