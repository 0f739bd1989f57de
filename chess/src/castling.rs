//! Square tables for both castling wings

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{CastlingSide, Color, Coord, File};

#[inline]
const fn on_rank(c: Color, x: u64) -> Bitboard {
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

#[inline]
const fn at(c: Color, file: File) -> Coord {
    Coord::from_parts(file, geometry::castling_rank(c))
}

/// Squares between king and rook which must be empty
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    on_rank(
        c,
        match s {
            CastlingSide::King => 0x60,
            CastlingSide::Queen => 0x0e,
        },
    )
}

/// Squares the king stands on or passes which must not be attacked
#[inline]
pub const fn safe(c: Color, s: CastlingSide) -> Bitboard {
    on_rank(
        c,
        match s {
            CastlingSide::King => 0x30,
            CastlingSide::Queen => 0x18,
        },
    )
}

#[inline]
pub const fn king_src(c: Color) -> Coord {
    at(c, File::E)
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Coord {
    match s {
        CastlingSide::King => at(c, File::G),
        CastlingSide::Queen => at(c, File::C),
    }
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Coord {
    match s {
        CastlingSide::King => at(c, File::H),
        CastlingSide::Queen => at(c, File::A),
    }
}

#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Coord {
    match s {
        CastlingSide::King => at(c, File::F),
        CastlingSide::Queen => at(c, File::D),
    }
}
