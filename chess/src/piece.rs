//! Pieces and their movement rules

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::movegen::{MoveList, MovePush};
use crate::moves::Move;
use crate::types::{Cell, Color, Coord, PieceKind};

use std::fmt;

const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const KNIGHT_DIRS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

const SLIDE_LIMIT: usize = 7;
const STEP_LIMIT: usize = 1;

/// Identity of a piece within a [`Game`](crate::game::Game)
///
/// Two pieces of the same kind and color are still different pieces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u16);

impl PieceId {
    #[inline]
    pub const fn from_raw(val: u16) -> PieceId {
        PieceId(val)
    }

    #[inline]
    pub const fn as_raw(&self) -> u16 {
        self.0
    }
}

/// A piece standing on the board
///
/// The piece only reads the board while generating moves. Its stored coordinate is updated by
/// the [`Game`](crate::game::Game) together with the board and the piece mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    coord: Coord,
}

impl Piece {
    #[inline]
    pub const fn new(id: PieceId, kind: PieceKind, color: Color, coord: Coord) -> Piece {
        Piece {
            id,
            kind,
            color,
            coord,
        }
    }

    #[inline]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    #[inline]
    pub(crate) fn set_coord(&mut self, coord: Coord) {
        self.coord = coord;
    }

    /// Point value, which is also the piece flag in a packed cell
    #[inline]
    pub const fn value(&self) -> u16 {
        self.kind.value()
    }

    #[inline]
    pub const fn cell(&self) -> Cell {
        Cell::from_parts(self.color, self.kind)
    }

    /// Pushes every pseudo-legal move of this piece into `dst`
    ///
    /// Castling is not generated here, as it depends on the game state rather than on a single piece.
    pub fn generate_moves<P: MovePush>(&self, board: &Board, dst: &mut P) {
        match self.kind {
            PieceKind::Pawn => self.gen_pawn(board, dst),
            PieceKind::Knight => self.gen_rays(board, &KNIGHT_DIRS, STEP_LIMIT, dst),
            PieceKind::Bishop => self.gen_rays(board, &BISHOP_DIRS, SLIDE_LIMIT, dst),
            PieceKind::Rook => self.gen_rays(board, &ROOK_DIRS, SLIDE_LIMIT, dst),
            PieceKind::Queen => {
                self.gen_rays(board, &BISHOP_DIRS, SLIDE_LIMIT, dst);
                self.gen_rays(board, &ROOK_DIRS, SLIDE_LIMIT, dst);
            }
            PieceKind::King => {
                self.gen_rays(board, &BISHOP_DIRS, STEP_LIMIT, dst);
                self.gen_rays(board, &ROOK_DIRS, STEP_LIMIT, dst);
            }
        }
    }

    /// Returns the pseudo-legal moves of this piece as a list
    pub fn moves(&self, board: &Board) -> MoveList {
        let mut res = MoveList::new();
        self.generate_moves(board, &mut res);
        res
    }

    /// Returns the squares this piece attacks
    ///
    /// For a pawn, only a forward diagonal holding an opponent piece counts as attacked. For
    /// other pieces, these are exactly the destinations of [`Piece::generate_moves()`].
    pub fn attacked_squares(&self, board: &Board) -> Bitboard {
        match self.kind {
            PieceKind::Pawn => self.pawn_captures(board).collect(),
            _ => {
                let mut res = Bitboard::EMPTY;
                self.generate_moves(board, &mut res);
                res
            }
        }
    }

    fn gen_rays<P: MovePush>(
        &self,
        board: &Board,
        dirs: &[(isize, isize)],
        limit: usize,
        dst: &mut P,
    ) {
        for &dir in dirs {
            self.moves_in_dir(board, dir, limit, dst);
        }
    }

    /// Walks from the piece in direction `(dx, dy)` for at most `limit` steps
    ///
    /// The walk stops before the board edge, before an own piece, or right after a capture.
    fn moves_in_dir<P: MovePush>(
        &self,
        board: &Board,
        (dx, dy): (isize, isize),
        limit: usize,
        dst: &mut P,
    ) {
        let mut cur = self.coord;
        for _ in 0..limit {
            let Some(next) = cur.try_shift(dx, dy) else {
                break;
            };
            cur = next;
            let cell = board.get_piece_at(cur);
            if cell.has_color(self.color) {
                break;
            }
            let capture = cell.is_occupied();
            dst.push(Move::simple(self.color, self.kind, self.coord, cur, capture));
            if capture {
                break;
            }
        }
    }

    fn gen_pawn<P: MovePush>(&self, board: &Board, dst: &mut P) {
        let dy = geometry::pawn_forward_delta(self.color);
        if let Some(single) = self.coord.try_shift(0, dy) {
            if board.is_free(single) {
                dst.push(Move::simple(
                    self.color,
                    PieceKind::Pawn,
                    self.coord,
                    single,
                    false,
                ));
                if self.coord.rank() == geometry::pawn_home_rank(self.color) {
                    if let Some(double) = single.try_shift(0, dy) {
                        if board.is_free(double) {
                            dst.push(Move::pawn_double(self.color, self.coord, double));
                        }
                    }
                }
            }
        }
        for target in self.pawn_captures(board) {
            dst.push(Move::simple(
                self.color,
                PieceKind::Pawn,
                self.coord,
                target,
                true,
            ));
        }
    }

    fn pawn_captures<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Coord> + 'a {
        let dy = geometry::pawn_forward_delta(self.color);
        [-1, 1]
            .into_iter()
            .filter_map(move |dx| self.coord.try_shift(dx, dy))
            .filter(move |&c| board.is_color(c, self.color.inv()))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.cell(), self.coord)
    }
}
