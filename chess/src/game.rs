//! Game state: the board, the pieces of both sides and the history of applied moves

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castling;
use crate::movegen::{self, MoveList};
use crate::moves::{Move, RawUndo};
use crate::options::GameOptions;
use crate::piece::{Piece, PieceId};
use crate::types::{CastlingRights, CastlingSide, Color, Coord, File, PieceKind, Rank};

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

/// Maximum number of pieces a side may have
pub const MAX_PIECES: usize = 16;

/// Error adding a piece to the game
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SetupError {
    /// The square is already occupied
    #[error("square {0} is already occupied")]
    Occupied(Coord),
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// The side already has a king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
}

/// Error unapplying a move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum UnmakeError {
    /// No moves were applied
    #[error("no moves to unapply")]
    EmptyHistory,
    /// The move is not the last applied one
    #[error("move {found} is not the last applied move {expected}")]
    Mismatch { expected: Move, found: Move },
}

/// Disagreement between the board and the piece mappings
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// A square is occupied on the board, but no piece of that color is mapped there
    #[error("no mapped piece on occupied square {0}")]
    MissingPiece(Coord),
    /// A piece is mapped to a square whose board cell doesn't contain it
    #[error("mapped piece on {0} is not on the board")]
    StrayPiece(Coord),
    /// A piece is mapped under a key different from its own coordinate
    #[error("piece mapped on {key} thinks it is on {stored}")]
    StaleCoord { key: Coord, stored: Coord },
    /// King position is not tracked correctly
    #[error("king of color {0:?} is not tracked correctly")]
    KingTracking(Color),
}

/// Chess game
///
/// Holds the [`Board`], one mapping from coordinate to [`Piece`] per side, the side to move and
/// the stack of applied moves. The board and the mappings always agree: pieces are only
/// added through [`Game::add_piece()`] and only moved by applying and unapplying moves.
///
/// The game is a make/unmake engine: apply a move from [`Game::possible_moves()`] with
/// [`Game::apply_move()`], and revert it with [`Game::unapply_move()`]. Unapplying restores
/// the previous state exactly, so search can backtrack without copying the position.
///
/// # Example
///
/// ```
/// # use packboard::Game;
/// let mut game = Game::initial();
/// let before = game.clone();
/// let moves = game.possible_moves();
/// assert_eq!(moves.len(), 20);
/// for &mv in &moves {
///     game.apply_move(mv);
///     game.unapply_move(mv).unwrap();
///     assert_eq!(game, before);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    pieces: [BTreeMap<Coord, Piece>; 2],
    kings: [Option<Coord>; 2],
    side: Color,
    options: GameOptions,
    next_id: u16,
    stack: Vec<(Move, RawUndo)>,
}

impl Game {
    /// Returns an empty game with White to move
    pub fn new() -> Game {
        Game::with_options(GameOptions::default())
    }

    /// Returns an empty game with White to move and the given options
    pub fn with_options(options: GameOptions) -> Game {
        Game {
            board: Board::empty(),
            pieces: [BTreeMap::new(), BTreeMap::new()],
            kings: [None, None],
            side: Color::White,
            options,
            next_id: 0,
            stack: Vec::new(),
        }
    }

    /// Returns a game in the standard starting position
    pub fn initial() -> Game {
        let mut res = Game::new();
        res.setup_standard();
        res
    }

    /// Puts the 32 pieces of the standard starting position and grants all the castling rights
    ///
    /// Meant to be called once on an empty game.
    pub fn setup_standard(&mut self) {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for (color, back, pawns) in [
            (Color::White, Rank::R1, Rank::R2),
            (Color::Black, Rank::R8, Rank::R7),
        ] {
            for (file, kind) in File::iter().zip(BACK_RANK) {
                self.put_new(color, kind, Coord::from_parts(file, back));
            }
            for file in File::iter() {
                self.put_new(color, PieceKind::Pawn, Coord::from_parts(file, pawns));
            }
        }
        self.board.set_castle_rights(CastlingRights::FULL);
        debug!("standard position set up");
    }

    /// Adds a new piece to the game, returning its identity
    ///
    /// This is meant for building positions before play starts. Castling rights are not
    /// changed; grant them with [`Game::set_castle_rights()`] if needed.
    pub fn add_piece(
        &mut self,
        color: Color,
        kind: PieceKind,
        coord: Coord,
    ) -> Result<PieceId, SetupError> {
        if !self.board.is_free(coord) {
            return Err(SetupError::Occupied(coord));
        }
        if self.pieces[color.index()].len() >= MAX_PIECES {
            return Err(SetupError::TooManyPieces(color));
        }
        if kind == PieceKind::King && self.kings[color.index()].is_some() {
            return Err(SetupError::TooManyKings(color));
        }
        Ok(self.put_new(color, kind, coord))
    }

    fn put_new(&mut self, color: Color, kind: PieceKind, coord: Coord) -> PieceId {
        let id = PieceId::from_raw(self.next_id);
        self.next_id += 1;
        self.set_piece(color, Piece::new(id, kind, color, coord), coord);
        id
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Gives mutable access to the board flags and cells
    ///
    /// Writing cells directly breaks the agreement with the piece mappings, so this is
    /// crate-only.
    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replaces the castling rights, for building positions
    #[inline]
    pub fn set_castle_rights(&mut self, rights: CastlingRights) {
        self.board.set_castle_rights(rights);
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Sets side to move, for building positions
    #[inline]
    pub fn set_side(&mut self, side: Color) {
        self.side = side;
    }

    #[inline]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Returns the pieces of color `c`, keyed by their coordinates
    #[inline]
    pub fn pieces(&self, c: Color) -> &BTreeMap<Coord, Piece> {
        &self.pieces[c.index()]
    }

    /// Returns the piece of either color standing on `coord`
    pub fn piece_at(&self, coord: Coord) -> Option<&Piece> {
        let color = self.board.get_piece_at(coord).color()?;
        self.pieces[color.index()].get(&coord)
    }

    #[inline]
    pub fn king_coord(&self, c: Color) -> Option<Coord> {
        self.kings[c.index()]
    }

    /// Returns the applied moves, oldest first
    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.stack.iter().map(|(m, _)| *m)
    }

    /// Removes the piece of color `color` from `coord`, from both the board and the mapping
    ///
    /// Returns `None` and leaves the game untouched if no such piece is there.
    pub(crate) fn remove_piece(&mut self, color: Color, coord: Coord) -> Option<Piece> {
        let piece = self.pieces[color.index()].remove(&coord)?;
        self.board.remove_piece(coord);
        if self.kings[color.index()] == Some(coord) {
            self.kings[color.index()] = None;
        }
        Some(piece)
    }

    /// Puts `piece` of color `color` on `coord`, updating the board, the mapping and the
    /// piece's own coordinate
    ///
    /// The square must not hold a piece of the other color.
    pub(crate) fn set_piece(&mut self, color: Color, mut piece: Piece, coord: Coord) {
        debug_assert_eq!(piece.color(), color);
        debug_assert!(!self.board.is_color(coord, color.inv()));
        piece.set_coord(coord);
        self.board.set_piece(coord, piece.cell());
        if piece.kind() == PieceKind::King {
            self.kings[color.index()] = Some(coord);
        }
        self.pieces[color.index()].insert(coord, piece);
    }

    /// Returns all the squares attacked by color `c`
    #[inline]
    pub fn attacked_squares(&self, c: Color) -> Bitboard {
        movegen::attacked_squares(self, c)
    }

    /// Returns all the pseudo-legal moves of the side to move, castling included
    ///
    /// The list is a snapshot of the current position.
    #[inline]
    pub fn possible_moves(&self) -> MoveList {
        movegen::gen_all(self)
    }

    /// Applies `mv`, which must come from [`Game::possible_moves()`] for the current position
    ///
    /// Besides moving the pieces, this revokes the castling rights of the mover if its king
    /// moved, revokes a wing's right once its rook corner is left or captured on, and passes
    /// the turn.
    pub fn apply_move(&mut self, mv: Move) {
        let undo = mv.apply(self);
        if mv.piece() == PieceKind::King {
            self.board.revoke_castle_rights(mv.side());
        }
        self.update_castling(mv);
        debug!(%mv, "played move");
        self.side = self.side.inv();
        self.stack.push((mv, undo));
        self.selftest();
    }

    /// Unapplies `mv`, which must be the last applied move
    pub fn unapply_move(&mut self, mv: Move) -> Result<(), UnmakeError> {
        match self.stack.last() {
            None => return Err(UnmakeError::EmptyHistory),
            Some(&(last, _)) if last != mv => {
                return Err(UnmakeError::Mismatch {
                    expected: last,
                    found: mv,
                })
            }
            Some(_) => {}
        }
        self.undo_last();
        Ok(())
    }

    /// Unapplies the last applied move and returns it
    pub fn undo_last(&mut self) -> Option<Move> {
        let (mv, undo) = self.stack.pop()?;
        self.side = self.side.inv();
        mv.unapply(self, undo);
        debug!(%mv, "unplayed move");
        self.selftest();
        Some(mv)
    }

    fn update_castling(&mut self, mv: Move) {
        for c in [Color::White, Color::Black] {
            for s in CastlingSide::ALL {
                let corner = castling::rook_src(c, s);
                if mv.src() == corner || mv.dst() == corner {
                    self.board.revoke_castle_right(c, s);
                }
            }
        }
    }

    #[inline]
    fn selftest(&self) {
        #[cfg(feature = "selftest")]
        debug_assert_eq!(self.validate(), Ok(()));
    }

    /// Checks that the board and the piece mappings agree
    pub fn validate(&self) -> Result<(), ValidateError> {
        for coord in Coord::iter() {
            let cell = self.board.get_piece_at(coord);
            for color in [Color::White, Color::Black] {
                let mapped = self.pieces[color.index()].get(&coord);
                match (cell.has_color(color), mapped) {
                    (true, None) => return Err(ValidateError::MissingPiece(coord)),
                    (false, Some(_)) => return Err(ValidateError::StrayPiece(coord)),
                    (true, Some(p)) if p.cell() != cell => {
                        return Err(ValidateError::StrayPiece(coord))
                    }
                    _ => {}
                }
            }
        }
        for color in [Color::White, Color::Black] {
            let mut king = None;
            for (&key, piece) in &self.pieces[color.index()] {
                if piece.coord() != key {
                    return Err(ValidateError::StaleCoord {
                        key,
                        stored: piece.coord(),
                    });
                }
                if piece.kind() == PieceKind::King {
                    king = Some(key);
                }
            }
            if king != self.kings[color.index()] {
                return Err(ValidateError::KingTracking(color));
            }
        }
        Ok(())
    }
}

impl Default for Game {
    #[inline]
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn coord(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn find(game: &Game, src: &str, dst: &str) -> Move {
        game.possible_moves()
            .into_iter()
            .find(|m| m.src() == coord(src) && m.dst() == coord(dst))
            .unwrap()
    }

    fn play(game: &mut Game, moves: &[(&str, &str)]) -> Vec<Move> {
        moves
            .iter()
            .map(|&(src, dst)| {
                let mv = find(game, src, dst);
                game.apply_move(mv);
                mv
            })
            .collect()
    }

    #[test]
    fn test_initial() {
        let game = Game::initial();
        assert_eq!(game.side(), Color::White);
        assert_eq!(game.pieces(Color::White).len(), 16);
        assert_eq!(game.pieces(Color::Black).len(), 16);
        assert_eq!(game.board().castle_rights(), CastlingRights::FULL);
        assert_eq!(game.king_coord(Color::White), Some(coord("e1")));
        assert_eq!(game.king_coord(Color::Black), Some(coord("e8")));
        assert_eq!(game.validate(), Ok(()));
        assert_eq!(game.board().occupied().len(), 32);

        let ids: std::collections::BTreeSet<_> = [Color::White, Color::Black]
            .into_iter()
            .flat_map(|c| game.pieces(c).values().map(|p| p.id()))
            .collect();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_add_piece_errors() {
        let mut game = Game::new();
        game.add_piece(Color::White, PieceKind::King, coord("e1"))
            .unwrap();
        assert_eq!(
            game.add_piece(Color::Black, PieceKind::Rook, coord("e1")),
            Err(SetupError::Occupied(coord("e1")))
        );
        assert_eq!(
            game.add_piece(Color::White, PieceKind::King, coord("e2")),
            Err(SetupError::TooManyKings(Color::White))
        );

        let mut game = Game::initial();
        assert_eq!(
            game.add_piece(Color::Black, PieceKind::Queen, coord("d4")),
            Err(SetupError::TooManyPieces(Color::Black))
        );
    }

    #[test]
    fn test_roundtrip_every_initial_move() {
        let mut game = Game::initial();
        let before = game.clone();
        for mv in game.possible_moves() {
            game.apply_move(mv);
            assert_eq!(game.side(), Color::Black);
            assert_eq!(game.validate(), Ok(()));
            game.unapply_move(mv).unwrap();
            assert_eq!(game, before);
        }
    }

    #[test]
    fn test_double_push_marks_file() {
        let mut game = Game::initial();
        let mv = find(&game, "e2", "e4");
        assert_eq!(mv.kind(), MoveKind::PawnDouble);
        game.apply_move(mv);
        for file in File::iter() {
            assert_eq!(game.board().is_ep_target(file), file == File::E);
        }

        // The marker only lives for one move
        play(&mut game, &[("g8", "f6")]);
        assert_eq!(game.board().ep_target(), None);
        play(&mut game, &[("d2", "d4")]);
        assert_eq!(game.board().ep_target(), Some(File::D));

        game.undo_last();
        game.undo_last();
        assert_eq!(game.board().ep_target(), Some(File::E));
        game.unapply_move(mv).unwrap();
        assert_eq!(game, Game::initial());
    }

    #[test]
    fn test_capture_restores_identity() {
        let mut game = Game::initial();
        play(&mut game, &[("e2", "e4"), ("d7", "d5")]);
        let victim = *game.piece_at(coord("d5")).unwrap();
        let before = game.clone();

        let capture = find(&game, "e4", "d5");
        assert!(capture.is_capture());
        game.apply_move(capture);
        assert_eq!(game.pieces(Color::Black).len(), 15);
        assert!(game
            .pieces(Color::Black)
            .values()
            .all(|p| p.id() != victim.id()));
        assert_eq!(game.validate(), Ok(()));

        game.unapply_move(capture).unwrap();
        assert_eq!(game, before);
        let restored = game.pieces(Color::Black).get(&coord("d5")).unwrap();
        assert_eq!(restored.id(), victim.id());
        assert_eq!(*restored, victim);
    }

    #[test]
    fn test_pieces_are_distinct() {
        let game = Game::initial();
        let a = game.piece_at(coord("a2")).unwrap();
        let b = game.piece_at(coord("b2")).unwrap();
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.color(), b.color());
        assert_ne!(a, b);
    }

    #[test]
    fn test_castling_roundtrip() {
        let mut game = Game::initial();
        play(
            &mut game,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("g1", "f3"),
                ("b8", "c6"),
                ("f1", "c4"),
                ("g8", "f6"),
            ],
        );
        let before = game.clone();
        let rook_id = game.piece_at(coord("h1")).unwrap().id();
        let king_id = game.piece_at(coord("e1")).unwrap().id();

        let castle = find(&game, "e1", "g1");
        assert!(matches!(
            castle.kind(),
            MoveKind::Castling {
                side: CastlingSide::King,
                ..
            }
        ));
        game.apply_move(castle);
        assert_eq!(game.piece_at(coord("g1")).unwrap().id(), king_id);
        assert_eq!(game.piece_at(coord("f1")).unwrap().id(), rook_id);
        assert_eq!(game.piece_at(coord("f1")).unwrap().coord(), coord("f1"));
        assert!(game.board().is_free(coord("e1")));
        assert!(game.board().is_free(coord("h1")));
        assert_eq!(game.king_coord(Color::White), Some(coord("g1")));
        assert_eq!(game.board().castle_rights().to_string(), "kq");
        assert_eq!(game.validate(), Ok(()));

        game.unapply_move(castle).unwrap();
        assert_eq!(game, before);
        assert_eq!(game.piece_at(coord("h1")).unwrap().id(), rook_id);
    }

    #[test]
    fn test_queenside_castling() {
        let mut game = Game::new();
        game.add_piece(Color::Black, PieceKind::King, coord("e8"))
            .unwrap();
        game.add_piece(Color::Black, PieceKind::Rook, coord("a8"))
            .unwrap();
        game.add_piece(Color::White, PieceKind::King, coord("e1"))
            .unwrap();
        game.set_castle_rights(CastlingRights::FULL);
        game.set_side(Color::Black);
        let before = game.clone();

        let castle = find(&game, "e8", "c8");
        game.apply_move(castle);
        assert_eq!(
            game.piece_at(coord("d8")).map(|p| p.kind()),
            Some(PieceKind::Rook)
        );
        assert_eq!(
            game.piece_at(coord("c8")).map(|p| p.kind()),
            Some(PieceKind::King)
        );
        assert_eq!(game.board().castle_rights().to_string(), "KQ");
        game.unapply_move(castle).unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn test_king_move_revokes_rights_for_both_colors() {
        let mut game = Game::initial();
        play(&mut game, &[("e2", "e4"), ("e7", "e5"), ("e1", "e2")]);
        assert_eq!(game.board().castle_rights().to_string(), "kq");
        play(&mut game, &[("e8", "e7")]);
        assert_eq!(game.board().castle_rights(), CastlingRights::EMPTY);

        game.undo_last();
        assert_eq!(game.board().castle_rights().to_string(), "kq");
        game.undo_last();
        assert_eq!(game.board().castle_rights(), CastlingRights::FULL);
    }

    #[test]
    fn test_rook_move_revokes_wing() {
        let mut game = Game::initial();
        play(&mut game, &[("h2", "h4"), ("a7", "a5"), ("h1", "h3")]);
        assert_eq!(game.board().castle_rights().to_string(), "Qkq");
        play(&mut game, &[("a8", "a6")]);
        assert_eq!(game.board().castle_rights().to_string(), "Qk");
    }

    #[test]
    fn test_capture_on_corner_revokes_wing() {
        let mut game = Game::new();
        for (c, kind, at) in [
            (Color::White, PieceKind::King, "e1"),
            (Color::White, PieceKind::Bishop, "b7"),
            (Color::Black, PieceKind::King, "e8"),
            (Color::Black, PieceKind::Rook, "a8"),
            (Color::Black, PieceKind::Rook, "h8"),
        ] {
            game.add_piece(c, kind, coord(at)).unwrap();
        }
        game.set_castle_rights(CastlingRights::FULL);

        let capture = find(&game, "b7", "a8");
        assert!(capture.is_capture());
        game.apply_move(capture);
        assert_eq!(game.board().castle_rights().to_string(), "KQk");

        game.unapply_move(capture).unwrap();
        assert_eq!(game.board().castle_rights(), CastlingRights::FULL);
        assert_eq!(
            game.piece_at(coord("a8")).map(|p| p.kind()),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn test_setup_keeps_board_in_sync() {
        let mut game = Game::new();
        game.add_piece(Color::White, PieceKind::King, coord("e1"))
            .unwrap();
        assert!(game
            .add_piece(Color::White, PieceKind::King, coord("e4"))
            .is_err());
        assert!(game
            .add_piece(Color::White, PieceKind::Rook, coord("e1"))
            .is_err());
        for file in File::iter() {
            game.add_piece(Color::White, PieceKind::Pawn, Coord::from_parts(file, Rank::R2))
                .unwrap();
        }
        assert_eq!(game.validate(), Ok(()));
        assert_eq!(game.king_coord(Color::White), Some(coord("e1")));
        assert_eq!(
            game.piece_at(coord("e1")).map(|p| p.kind()),
            Some(PieceKind::King)
        );
        assert_eq!(game.pieces(Color::White).len(), 9);
    }

    #[test]
    fn test_unapply_errors() {
        let mut game = Game::initial();
        let mv = find(&game, "g1", "f3");
        assert_eq!(game.unapply_move(mv), Err(UnmakeError::EmptyHistory));
        assert_eq!(game.undo_last(), None);

        game.apply_move(mv);
        let other = find(&game, "g8", "f6");
        assert_eq!(
            game.unapply_move(other),
            Err(UnmakeError::Mismatch {
                expected: mv,
                found: other
            })
        );
        assert_eq!(game.history().collect::<Vec<_>>(), vec![mv]);
        assert_eq!(game.unapply_move(mv), Ok(()));
    }

    #[test]
    fn test_random_walk() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mut game = Game::initial();
            let mut played = Vec::new();
            for _ in 0..60 {
                let moves = game.possible_moves();
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                let snapshot = game.clone();
                game.apply_move(mv);
                assert_eq!(game.validate(), Ok(()));
                played.push((mv, snapshot));
            }
            while let Some((mv, snapshot)) = played.pop() {
                game.unapply_move(mv).unwrap();
                assert_eq!(game, snapshot);
            }
            assert_eq!(game, Game::initial());
        }
    }
}
