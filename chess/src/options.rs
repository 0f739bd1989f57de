//! Game configuration

/// Whose attacks are checked when deciding whether the king may castle
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttackSource {
    /// Squares attacked by the opponent of the side to move
    #[default]
    Opponent,
    /// Squares attacked by the side to move itself
    ///
    /// The castling rook itself usually covers the square the king passes, so castling is
    /// almost never generated with this source. It reproduces engines which computed the
    /// attack set this way.
    Mover,
}

/// Options of a [`Game`](crate::game::Game)
///
/// # Example
///
/// ```
/// # use packboard::{Game, options::{AttackSource, GameOptions}};
/// let opts = GameOptions::default().with_castling_attacks(AttackSource::Mover);
/// let game = Game::with_options(opts);
/// assert_eq!(game.options().castling_attacks, AttackSource::Mover);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GameOptions {
    pub castling_attacks: AttackSource,
}

impl GameOptions {
    #[inline]
    pub const fn with_castling_attacks(mut self, source: AttackSource) -> Self {
        self.castling_attacks = source;
        self
    }
}
