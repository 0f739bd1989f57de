//! Move generation for the side to move

use crate::bitboard::Bitboard;
use crate::castling;
use crate::game::Game;
use crate::moves::Move;
use crate::options::AttackSource;
use crate::types::{CastlingSide, Cell, Color, PieceKind};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;
use tracing::trace;

/// Upper bound on pseudo-legal moves with at most 16 pieces per side
pub const MAX_MOVES: usize = 512;

pub trait MovePush {
    fn push(&mut self, m: Move);
}

/// Fixed-capacity list of moves
///
/// Generated lists are snapshots: they stay valid as values after the game is mutated, but
/// only the list generated for the current position may be passed to
/// [`Game::apply_move()`](crate::game::Game::apply_move).
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

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

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVES>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

/// Collects move destinations only, which is how attack maps are built
impl MovePush for Bitboard {
    fn push(&mut self, m: Move) {
        self.set(m.dst());
    }
}

/// Returns all the squares attacked by the pieces of color `c`
pub fn attacked_squares(game: &Game, c: Color) -> Bitboard {
    game.pieces(c)
        .values()
        .fold(Bitboard::EMPTY, |acc, p| acc | p.attacked_squares(game.board()))
}

/// Pushes the castling moves available to the side to move
///
/// A wing is available when its right is held, the king and the rook stand on their home squares,
/// all the squares between them are empty, and none of the squares the king starts on or passes
/// is attacked. Whose attacks count is configured by
/// [`GameOptions::castling_attacks`](crate::options::GameOptions::castling_attacks).
pub fn gen_castling<P: MovePush>(game: &Game, dst: &mut P) {
    let c = game.side();
    let board = game.board();
    let rights = board.castle_rights();
    if !rights.has(c, CastlingSide::King) && !rights.has(c, CastlingSide::Queen) {
        return;
    }
    if game.king_coord(c) != Some(castling::king_src(c)) {
        return;
    }

    let attacker = match game.options().castling_attacks {
        AttackSource::Opponent => c.inv(),
        AttackSource::Mover => c,
    };
    let attacked = attacked_squares(game, attacker);
    let occupied = board.occupied();
    let rook = Cell::from_parts(c, PieceKind::Rook);

    for s in CastlingSide::ALL {
        if !rights.has(c, s) || board.get_piece_at(castling::rook_src(c, s)) != rook {
            continue;
        }
        if (castling::pass(c, s) & occupied).is_nonempty() {
            trace!(side = %c, wing = ?s, "castling blocked by pieces");
            continue;
        }
        if (castling::safe(c, s) & attacked).is_nonempty() {
            trace!(side = %c, wing = ?s, "castling blocked by attacks");
            continue;
        }
        dst.push(Move::castling(c, s));
    }
}

/// Pushes all the pseudo-legal moves of the side to move, including castling
pub fn gen_all_into<P: MovePush>(game: &Game, dst: &mut P) {
    for piece in game.pieces(game.side()).values() {
        piece.generate_moves(game.board(), dst);
    }
    gen_castling(game, dst);
}

/// Returns all the pseudo-legal moves of the side to move, including castling
pub fn gen_all(game: &Game) -> MoveList {
    let mut res = MoveList::new();
    gen_all_into(game, &mut res);
    trace!(side = %game.side(), count = res.len(), "generated moves");
    res
}
