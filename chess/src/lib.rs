//! # Packboard
//!
//! Chess position engine with exact make/unmake.
//!
//! The position is kept twice: as a dense [`Board`] of packed cells for O(1) occupancy and
//! color queries, and as per-side mappings from coordinate to [`Piece`] which carry piece
//! identity. [`Game`] keeps the two in sync while moves are applied and unapplied.
//!
//! Move generation is pseudo-legal: pieces don't check whether their own king is left in
//! check. Castling is generated when the rights are held, the path is empty and the squares
//! the king starts on and passes are not attacked.
//!
//! # Example
//!
//! ```
//! use packboard::{Color, Game};
//!
//! let mut game = Game::initial();
//! let mv = game
//!     .possible_moves()
//!     .into_iter()
//!     .find(|m| m.to_string() == "Pe2e4")
//!     .unwrap();
//! game.apply_move(mv);
//! assert_eq!(game.side(), Color::Black);
//! game.unapply_move(mv).unwrap();
//! assert_eq!(game, Game::initial());
//! ```

pub use packboard_base::{bitboard, geometry, types};

pub mod board;
pub mod castling;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod options;
pub mod piece;

pub use bitboard::Bitboard;
pub use board::{Board, GameFlags};
pub use game::{Game, SetupError, UnmakeError, ValidateError};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, RawUndo};
pub use options::{AttackSource, GameOptions};
pub use piece::{Piece, PieceId};
pub use types::{
    CastlingRights, CastlingSide, Cell, Color, Coord, CoordError, File, PieceKind, Rank,
};
