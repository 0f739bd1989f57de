//! Moves and the make/unmake protocol

use crate::board::GameFlags;
use crate::castling;
use crate::game::Game;
use crate::piece::Piece;
use crate::types::{CastlingSide, Cell, Color, Coord, PieceKind};

use std::fmt;

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move or capture which touches a single piece of the mover
    Simple,
    /// Double pawn push, which marks its file as the en passant target
    PawnDouble,
    /// Castling; the king moves from `src` to `dst`, the rook from `rook_src` to `rook_dst`
    Castling {
        side: CastlingSide,
        rook_src: Coord,
        rook_dst: Coord,
    },
}

/// Chess move
///
/// A move is a plain value describing a state transition of a [`Game`]. Moves are meant to be
/// produced by [`Game::possible_moves()`] and applied to the same position they were generated
/// for. Applying a move generated for another position is a contract violation: nothing is
/// re-validated, and the resulting position is unspecified.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    side: Color,
    piece: PieceKind,
    src: Coord,
    dst: Coord,
    capture: bool,
}

/// Metadata necessary to undo the applied move
///
/// Holds the captured piece itself, so unapplying puts back the very same piece rather than
/// an equal-valued replacement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawUndo {
    captured: Option<Piece>,
    flags: GameFlags,
}

impl RawUndo {
    #[inline]
    pub fn captured(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }

    #[inline]
    pub fn flags(&self) -> GameFlags {
        self.flags
    }
}

impl Move {
    #[inline]
    pub const fn simple(
        side: Color,
        piece: PieceKind,
        src: Coord,
        dst: Coord,
        capture: bool,
    ) -> Move {
        Move {
            kind: MoveKind::Simple,
            side,
            piece,
            src,
            dst,
            capture,
        }
    }

    #[inline]
    pub const fn pawn_double(side: Color, src: Coord, dst: Coord) -> Move {
        Move {
            kind: MoveKind::PawnDouble,
            side,
            piece: PieceKind::Pawn,
            src,
            dst,
            capture: false,
        }
    }

    /// Creates a castling move made by `color` with side `side`
    #[inline]
    pub const fn castling(color: Color, side: CastlingSide) -> Move {
        Move {
            kind: MoveKind::Castling {
                side,
                rook_src: castling::rook_src(color, side),
                rook_dst: castling::rook_dst(color, side),
            },
            side: color,
            piece: PieceKind::King,
            src: castling::king_src(color),
            dst: castling::king_dst(color, side),
            capture: false,
        }
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub const fn piece(&self) -> PieceKind {
        self.piece
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture
    }

    /// Returns the rook part of a castling move as a separate simple move
    #[inline]
    pub const fn rook_leg(&self) -> Option<Move> {
        match self.kind {
            MoveKind::Castling {
                rook_src, rook_dst, ..
            } => Some(Move::simple(
                self.side,
                PieceKind::Rook,
                rook_src,
                rook_dst,
                false,
            )),
            _ => None,
        }
    }

    /// Applies the move to `game` and returns the data needed to unapply it
    ///
    /// Updates the board, the per-side piece mappings and the moved piece's own coordinate.
    /// The side to move is left untouched, [`Game::apply_move()`] takes care of it.
    pub fn apply(&self, game: &mut Game) -> RawUndo {
        let flags = game.board().flags();
        game.board_mut().clear_en_passant_target();
        let captured = self.apply_leg(game);
        match self.kind {
            MoveKind::Simple => {}
            MoveKind::PawnDouble => {
                game.board_mut().set_en_passant_target(self.dst.file());
            }
            MoveKind::Castling { .. } => {
                if let Some(rook) = self.rook_leg() {
                    rook.apply_leg(game);
                }
            }
        }
        RawUndo { captured, flags }
    }

    /// Reverts [`Move::apply()`], given the [`RawUndo`] it returned
    ///
    /// `game` must be exactly in the state left by the corresponding `apply()`.
    pub fn unapply(&self, game: &mut Game, undo: RawUndo) {
        if let Some(rook) = self.rook_leg() {
            rook.unapply_leg(game, None);
        }
        self.unapply_leg(game, undo.captured);
        game.board_mut().set_flags(undo.flags);
    }

    fn apply_leg(&self, game: &mut Game) -> Option<Piece> {
        let captured = if self.capture {
            game.remove_piece(self.side.inv(), self.dst)
        } else {
            None
        };
        let piece = game.remove_piece(self.side, self.src);
        debug_assert!(piece.is_some(), "no {} piece on {}", self.side, self.src);
        if let Some(piece) = piece {
            game.set_piece(self.side, piece, self.dst);
        }
        captured
    }

    fn unapply_leg(&self, game: &mut Game, captured: Option<Piece>) {
        if let Some(piece) = game.remove_piece(self.side, self.dst) {
            game.set_piece(self.side, piece, self.src);
        }
        if let Some(piece) = captured {
            game.set_piece(self.side.inv(), piece, self.dst);
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let cap = if self.capture { "x" } else { "" };
        write!(
            f,
            "{}{}{}{}",
            Cell::from_parts(self.side, self.piece),
            self.src,
            cap,
            self.dst
        )
    }
}
