//! # Base types for packboard
//!
//! This is an auxiliary crate for `packboard` which contains the plain value types: coordinates,
//! colors, piece kinds, packed cells, castling rights and square sets.
//!
//! Normally you don't want to use this crate directly. Use `packboard` instead, which re-exports
//! everything declared here.

pub mod bitboard;
pub mod geometry;
pub mod types;
