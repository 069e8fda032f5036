use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error converting raw file/rank input into a [`Coord`]
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("file index {0} is out of range")]
    FileOutOfRange(u8),
    #[error("rank {0} is out of range")]
    RankOutOfRange(u8),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected a single `w` or `b`, got {0:?}")]
    Unexpected(String),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    #[error("duplicate char {0:?}")]
    DuplicateChar(char),
    #[error("unexpected empty string")]
    EmptyString,
}

/// Board file, from `a` to `h`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not less than 8
    pub const fn from_index(val: usize) -> Self {
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        let idx = (c as u32).checked_sub('a' as u32)? as usize;
        Self::ALL.get(idx).copied()
    }

    pub fn as_char(&self) -> char {
        char::from(b'a' + *self as u8)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank
///
/// Ranks are indexed from the top of the board, so [`Rank::R8`] has index 0 and
/// [`Rank::R1`] has index 7.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    /// All the ranks in index order, from the eighth down to the first
    pub const ALL: [Rank; 8] = [
        Rank::R8,
        Rank::R7,
        Rank::R6,
        Rank::R5,
        Rank::R4,
        Rank::R3,
        Rank::R2,
        Rank::R1,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not less than 8
    pub const fn from_index(val: usize) -> Self {
        Self::ALL[val]
    }

    /// Returns the rank with the human-readable number `num` (from 1 to 8)
    pub const fn from_number(num: u8) -> Option<Self> {
        match num {
            1..=8 => Some(Self::ALL[(8 - num) as usize]),
            _ => None,
        }
    }

    /// Returns the human-readable number of the rank (from 1 to 8)
    pub const fn number(&self) -> u8 {
        8 - *self as u8
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::from_number(u8::try_from(c.to_digit(10)?).ok()?)
    }

    pub fn as_char(&self) -> char {
        char::from(b'0' + self.number())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board
///
/// Stored as a single index `8 * rank.index() + file.index()`, so `a8` is 0 and `h1` is 63.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    /// Panics if `val` is not less than 64
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord must be between 0 and 63");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord(rank as u8 * 8 + file as u8)
    }

    /// Builds a coordinate from a file letter (`'a'..='h'`) and a rank number (`1..=8`)
    pub fn from_raw(file: char, rank: u8) -> Result<Coord, CoordError> {
        let file = File::from_char(file).ok_or(CoordError::UnexpectedFileChar(file))?;
        let rank = Rank::from_number(rank).ok_or(CoordError::RankOutOfRange(rank))?;
        Ok(Coord::from_parts(file, rank))
    }

    /// Builds a coordinate from zero-based indices
    ///
    /// File 0 is `a`, rank 0 is the first rank (the one with White's pieces).
    pub fn from_indices(file: u8, rank: u8) -> Result<Coord, CoordError> {
        let f = File::ALL
            .get(file as usize)
            .ok_or(CoordError::FileOutOfRange(file))?;
        let r = Rank::from_number(rank.saturating_add(1))
            .ok_or(CoordError::RankOutOfRange(rank))?;
        Ok(Coord::from_parts(*f, r))
    }

    pub const fn file(&self) -> File {
        File::ALL[(self.0 % 8) as usize]
    }

    pub const fn rank(&self) -> Rank {
        Rank::ALL[(self.0 / 8) as usize]
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Shifts the coordinate by the given deltas of file and rank indices
    ///
    /// Returns `None` if the result leaves the board. Note that positive `delta_rank`
    /// moves towards the first rank, as ranks are indexed from the top.
    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Coord> {
        let file = self.file().index().checked_add_signed(delta_file)?;
        let rank = self.rank().index().checked_add_signed(delta_rank)?;
        Some(Coord::from_parts(
            *File::ALL.get(file)?,
            *Rank::ALL.get(rank)?,
        ))
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file_ch), Some(rank_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(CoordError::BadLength);
        };
        Ok(Coord::from_parts(
            File::from_char(file_ch).ok_or(CoordError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(CoordError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

/// Side in the game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the opponent
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the FEN letter of the side, `w` or `b`
    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn as_long_str(&self) -> &'static str {
        match *self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            _ => Err(ColorParseError::Unexpected(s.to_string())),
        }
    }
}

/// Kind of a chess piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    King = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::King,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];
}

const CELL_CHARS: [char; 13] = [
    '.', 'P', 'K', 'N', 'B', 'R', 'Q', 'p', 'k', 'n', 'b', 'r', 'q',
];

const CELL_UTF8_CHARS: [char; 13] = [
    '.', '♙', '♔', '♘', '♗', '♖', '♕', '♟', '♚', '♞', '♝', '♜', '♛',
];

/// Contents of a single square: either empty or a piece of some color
///
/// Zero means an empty square. Otherwise the value is `1 + 6 * color + piece`.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);

    pub const fn is_free(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell(1 + 6 * c as u8 + p as u8)
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            0 => None,
            1..=6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        match self.0 {
            0 => None,
            v => Some(Piece::ALL[((v - 1) % 6) as usize]),
        }
    }

    /// Returns the FEN letter of the piece, or `.` for an empty square
    pub fn as_char(&self) -> char {
        CELL_CHARS[self.0 as usize]
    }

    pub fn as_utf8_char(&self) -> char {
        CELL_UTF8_CHARS[self.0 as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        CELL_CHARS
            .iter()
            .position(|&x| x == c)
            .map(|idx| Cell(idx as u8))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Cell({})", self.as_char())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

impl CastlingSide {
    /// File on which the rook for this castling side starts
    pub const fn rook_src_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::A,
            CastlingSide::King => File::H,
        }
    }

    /// File on which the rook lands after castling
    pub const fn rook_dst_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::D,
            CastlingSide::King => File::F,
        }
    }

    /// File on which the king lands after castling
    pub const fn king_dst_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::C,
            CastlingSide::King => File::G,
        }
    }
}

/// FEN letters of castling rights, in the order they are written
const CASTLING_CHARS: [(char, Color, CastlingSide); 4] = [
    ('K', Color::White, CastlingSide::King),
    ('Q', Color::White, CastlingSide::Queen),
    ('k', Color::Black, CastlingSide::King),
    ('q', Color::Black, CastlingSide::Queen),
];

/// Set of castling rights for both sides
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(0b1111);

    const fn bit(c: Color, s: CastlingSide) -> u8 {
        1 << (2 * c as u8 + s as u8)
    }

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        self.0 & Self::bit(c, s) != 0
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | Self::bit(c, s))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        self.0 |= Self::bit(c, s);
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !Self::bit(c, s);
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if *self == Self::EMPTY {
            return write!(f, "-");
        }
        for (ch, color, side) in CASTLING_CHARS {
            if self.has(color, side) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        match s {
            "-" => return Ok(CastlingRights::EMPTY),
            "" => return Err(CastlingRightsParseError::EmptyString),
            _ => {}
        }
        s.chars().try_fold(CastlingRights::EMPTY, |res, ch| {
            let &(_, color, side) = CASTLING_CHARS
                .iter()
                .find(|(c, _, _)| *c == ch)
                .ok_or(CastlingRightsParseError::UnexpectedChar(ch))?;
            if res.has(color, side) {
                return Err(CastlingRightsParseError::DuplicateChar(ch));
            }
            Ok(res.with(color, side))
        })
    }
}

/// Final result of a game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The side to move is checkmated; `winner` delivered the mate
    Checkmate { winner: Color },
    /// The side to move has no legal moves but is not in check
    Stalemate,
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Self::Checkmate { winner } => Some(winner),
            Self::Stalemate => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.as_long_str()),
            Self::Stalemate => write!(f, "draw by stalemate"),
        }
    }
}
