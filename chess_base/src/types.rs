use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("coordinate ({file}, {rank}) is out of bounds")]
    OutOfBounds { file: i32, rank: i32 },
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

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
    const ALL: [File; 8] = [
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
        *self as u8 as usize
    }

    pub const fn try_from_index(val: usize) -> Option<Self> {
        if val < 8 {
            Some(Self::ALL[val])
        } else {
            None
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Self::try_from_index((u32::from(c) - u32::from('a')) as usize),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank
///
/// Ranks are indexed from Black's back rank: index 0 is the eighth rank and index 7 is
/// the first rank, where the White pieces start.
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
    const ALL: [Rank; 8] = [
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
        *self as u8 as usize
    }

    pub const fn try_from_index(val: usize) -> Option<Self> {
        if val < 8 {
            Some(Self::ALL[val])
        } else {
            None
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::try_from_index((u32::from('8') - u32::from(c)) as usize),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board
///
/// A coordinate is always on the board. The only fallible constructors are [`Coord::new()`]
/// and the [`TryFrom`] conversion from a signed pair; both refuse anything outside `0..=7`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    /// Creates a coordinate from zero-based file and rank indices
    pub const fn new(file: usize, rank: usize) -> Result<Coord, CoordError> {
        if file >= 8 || rank >= 8 {
            return Err(CoordError::OutOfBounds {
                file: file as i32,
                rank: rank as i32,
            });
        }
        Ok(Coord(((rank as u8) << 3) | file as u8))
    }

    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord must be between 0 and 63");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord(((rank as u8) << 3) | file as u8)
    }

    pub const fn file(&self) -> File {
        File::from_index((self.0 & 7) as usize)
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index((self.0 >> 3) as usize)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Steps by `(delta_file, delta_rank)`, returning `None` if the result leaves the board
    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Coord> {
        let new_file = self.file().index().wrapping_add(delta_file as usize);
        let new_rank = self.rank().index().wrapping_add(delta_rank as usize);
        Coord::new(new_file, new_rank).ok()
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Coord)
    }
}

impl TryFrom<(i32, i32)> for Coord {
    type Error = CoordError;

    fn try_from((file, rank): (i32, i32)) -> Result<Self, Self::Error> {
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return Err(CoordError::OutOfBounds { file, rank });
        }
        Coord::new(file as usize, rank as usize)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
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

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Offset of this color's flags inside a packed [`Cell`]
    pub const fn cell_shift(&self) -> u32 {
        match *self {
            Color::White => 0,
            Color::Black => 6,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Point value of the piece, equal to its flag in a packed White [`Cell`]
    pub const fn value(&self) -> u16 {
        1 << (*self as u8)
    }

    pub fn as_char(&self) -> char {
        b"PNBRQK"[*self as usize] as char
    }
}

/// Packed contents of a single square
///
/// Bits 0-5 hold one flag per White piece kind (pawn = 1 up to king = 32), bits 6-11 hold
/// the same flags for Black. A well-formed cell has at most one bit set. The top nibble is
/// never used by a cell; auxiliary state lives outside the grid.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(u16);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const WHITE_MASK: u16 = 0x003f;
    pub const BLACK_MASK: u16 = 0x0fc0;
    pub const PIECE_MASK: u16 = Self::WHITE_MASK | Self::BLACK_MASK;

    pub const fn from_parts(c: Color, p: PieceKind) -> Cell {
        Cell(p.value() << c.cell_shift())
    }

    pub const fn from_raw(val: u16) -> Cell {
        Cell(val & Self::PIECE_MASK)
    }

    pub const fn as_raw(&self) -> u16 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 & Self::PIECE_MASK == 0
    }

    pub const fn is_occupied(&self) -> bool {
        !self.is_empty()
    }

    pub const fn is_white(&self) -> bool {
        self.0 & Self::WHITE_MASK != 0
    }

    pub const fn is_black(&self) -> bool {
        self.0 & Self::BLACK_MASK != 0
    }

    pub const fn has_color(&self, c: Color) -> bool {
        match c {
            Color::White => self.is_white(),
            Color::Black => self.is_black(),
        }
    }

    pub const fn color(&self) -> Option<Color> {
        if self.is_white() {
            Some(Color::White)
        } else if self.is_black() {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub const fn kind(&self) -> Option<PieceKind> {
        if self.is_empty() {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize % 6;
        Some(PieceKind::ALL[bit])
    }

    pub fn as_char(&self) -> char {
        match (self.color(), self.kind()) {
            (Some(Color::White), Some(p)) => p.as_char(),
            (Some(Color::Black), Some(p)) => p.as_char().to_ascii_lowercase(),
            _ => '-',
        }
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
    King = 0,
    Queen = 1,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];
}

/// Castling rights nibble
///
/// Bit order is White kingside, White queenside, Black kingside, Black queenside.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const fn to_index(c: Color, s: CastlingSide) -> u8 {
        ((c as u8) << 1) | s as u8
    }

    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(15);

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        ((self.0 >> Self::to_index(c, s)) & 1) != 0
    }

    pub fn flip(&mut self, c: Color, s: CastlingSide) {
        self.0 ^= 1_u8 << Self::to_index(c, s)
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | (1_u8 << Self::to_index(c, s)))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        *self = self.with(c, s)
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !(1_u8 << Self::to_index(c, s))
    }

    pub fn unset_color(&mut self, c: Color) {
        self.unset(c, CastlingSide::King);
        self.unset(c, CastlingSide::Queen);
    }

    pub const fn from_raw(val: u8) -> CastlingRights {
        assert!(val < 16, "raw castling rights must be between 0 and 15");
        CastlingRights(val)
    }

    pub const fn as_raw(&self) -> u8 {
        self.0
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
        for (c, s, ch) in [
            (Color::White, CastlingSide::King, 'K'),
            (Color::White, CastlingSide::Queen, 'Q'),
            (Color::Black, CastlingSide::King, 'k'),
            (Color::Black, CastlingSide::Queen, 'q'),
        ] {
            if self.has(c, s) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
