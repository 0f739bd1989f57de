// Plays random pseudo-legal moves from the initial position, then takes them all back
//
// Usage: random_walk [MOVES] [SEED]
//
// Set `RUST_LOG=packboard=debug` to see every played and unplayed move.

use packboard::{Color, Game};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let count: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(100);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut game = Game::initial();
    let mut played = Vec::new();
    for _ in 0..count {
        let moves = game.possible_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            println!("No moves for {}", game.side());
            break;
        };
        game.apply_move(mv);
        played.push(mv);
    }

    println!("After {} moves:", played.len());
    println!("{}", game.board());
    println!(
        "Castling: {}, en passant: {}",
        game.board().castle_rights(),
        game.board()
            .ep_target()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    println!(
        "Pieces: {} white, {} black",
        game.pieces(Color::White).len(),
        game.pieces(Color::Black).len(),
    );

    while let Some(mv) = played.pop() {
        game.unapply_move(mv).unwrap();
    }
    assert_eq!(game, Game::initial());
    println!("Unwound back to the initial position:");
    println!("{}", game.board());
}
