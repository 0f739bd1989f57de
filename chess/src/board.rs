//! Board and related things

use crate::bitboard::Bitboard;
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Rank};

use std::fmt;

/// Auxiliary position state which does not belong to any square
///
/// Both fields are plain values, so the whole struct is saved before a move is applied and
/// written back verbatim when it is unapplied.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GameFlags {
    /// Castling rights for both sides
    pub castling: CastlingRights,
    /// File of the pawn which has just made a double push, if any
    pub ep_target: Option<File>,
}

/// Dense 8x8 grid of packed cells plus the auxiliary [`GameFlags`]
///
/// The board doesn't know anything about piece identity. It only answers occupancy and color
/// queries in O(1) via the packed [`Cell`] flags. Use [`Game`](crate::game::Game) to keep the
/// board in sync with the per-side piece mappings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; 64],
    flags: GameFlags,
}

impl Board {
    /// Returns an empty board without castling rights
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
            flags: GameFlags {
                castling: CastlingRights::EMPTY,
                ep_target: None,
            },
        }
    }

    /// Returns the packed contents of the square with coordinate `c`
    #[inline]
    pub fn get_piece_at(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the packed contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get_piece_at(Coord::from_parts(file, rank))
    }

    #[inline]
    pub fn is_free(&self, c: Coord) -> bool {
        self.get_piece_at(c).is_empty()
    }

    #[inline]
    pub fn is_white_piece(&self, c: Coord) -> bool {
        self.get_piece_at(c).is_white()
    }

    #[inline]
    pub fn is_black_piece(&self, c: Coord) -> bool {
        self.get_piece_at(c).is_black()
    }

    /// Returns `true` if the square `c` holds a piece of color `color`
    #[inline]
    pub fn is_color(&self, c: Coord, color: Color) -> bool {
        self.get_piece_at(c).has_color(color)
    }

    /// Overwrites the square `c` with `cell`
    #[inline]
    pub fn set_piece(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = Cell::from_raw(cell.as_raw());
    }

    #[inline]
    pub fn remove_piece(&mut self, c: Coord) {
        self.cells[c.index()] = Cell::EMPTY;
    }

    /// Returns the set of all occupied squares
    pub fn occupied(&self) -> Bitboard {
        Coord::iter().filter(|&c| !self.is_free(c)).collect()
    }

    #[inline]
    pub fn flags(&self) -> GameFlags {
        self.flags
    }

    #[inline]
    pub(crate) fn set_flags(&mut self, flags: GameFlags) {
        self.flags = flags;
    }

    #[inline]
    pub fn castle_rights(&self) -> CastlingRights {
        self.flags.castling
    }

    /// Replaces all the castling rights at once
    #[inline]
    pub fn set_castle_rights(&mut self, rights: CastlingRights) {
        self.flags.castling = rights;
    }

    #[inline]
    pub fn grant_castle_right(&mut self, color: Color, side: CastlingSide) {
        self.flags.castling.set(color, side);
    }

    #[inline]
    pub fn revoke_castle_right(&mut self, color: Color, side: CastlingSide) {
        self.flags.castling.unset(color, side);
    }

    /// Revokes both castling rights of `color`
    #[inline]
    pub fn revoke_castle_rights(&mut self, color: Color) {
        self.flags.castling.unset_color(color);
    }

    /// Flips a single castling right
    ///
    /// Calling it twice with the same arguments restores the original value. Prefer
    /// [`Board::grant_castle_right()`] and [`Board::revoke_castle_right()`], which are idempotent.
    #[inline]
    pub fn toggle_castle_right(&mut self, color: Color, side: CastlingSide) {
        self.flags.castling.flip(color, side);
    }

    /// Marks `file` as the en passant target, dropping any previous marker
    #[inline]
    pub fn set_en_passant_target(&mut self, file: File) {
        self.flags.ep_target = Some(file);
    }

    #[inline]
    pub fn clear_en_passant_target(&mut self) {
        self.flags.ep_target = None;
    }

    #[inline]
    pub fn is_ep_target(&self, file: File) -> bool {
        self.flags.ep_target == Some(file)
    }

    #[inline]
    pub fn ep_target(&self) -> Option<File> {
        self.flags.ep_target
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Prints one line per rank, from rank 8 to rank 1
///
/// White pieces are uppercase, Black pieces are lowercase, empty squares are `-`.
///
/// ```
/// # use packboard::Game;
/// let game = Game::initial();
/// assert_eq!(
///     game.board().to_string(),
///     "|rnbqkbnr|\n|pppppppp|\n|--------|\n|--------|\n\
///      |--------|\n|--------|\n|PPPPPPPP|\n|RNBQKBNR|\n",
/// );
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "|")?;
            for file in File::iter() {
                write!(f, "{}", self.get2(file, rank).as_char())?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
