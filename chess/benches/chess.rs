use criterion::{black_box, criterion_group, criterion_main, Criterion};
use packboard::{movegen, CastlingRights, Color, Game, PieceKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const WALKS: [(&str, u64, usize); 3] = [("opening", 1, 8), ("middle", 2, 30), ("late", 3, 80)];

fn castling_position() -> Game {
    let mut game = Game::new();
    for (c, kind, at) in [
        (Color::White, PieceKind::King, "e1"),
        (Color::White, PieceKind::Rook, "a1"),
        (Color::White, PieceKind::Rook, "h1"),
        (Color::Black, PieceKind::King, "e8"),
        (Color::Black, PieceKind::Rook, "a8"),
        (Color::Black, PieceKind::Rook, "h8"),
    ] {
        game.add_piece(c, kind, at.parse().unwrap()).unwrap();
    }
    game.set_castle_rights(CastlingRights::FULL);
    game
}

fn queens() -> Game {
    let mut game = Game::new();
    game.add_piece(Color::White, PieceKind::King, "g1".parse().unwrap())
        .unwrap();
    game.add_piece(Color::Black, PieceKind::King, "a8".parse().unwrap())
        .unwrap();
    for at in ["d8", "b7", "g7", "e6", "c5", "a4", "f4", "d3", "g2"] {
        game.add_piece(Color::White, PieceKind::Queen, at.parse().unwrap())
            .unwrap();
    }
    game
}

fn random_walk(seed: u64, len: usize) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::initial();
    for _ in 0..len {
        let moves = game.possible_moves();
        match moves.choose(&mut rng) {
            Some(&mv) => game.apply_move(mv),
            None => break,
        }
    }
    game
}

fn games() -> impl Iterator<Item = (&'static str, Game)> {
    [
        ("initial", Game::initial()),
        ("castling", castling_position()),
        ("queens", queens()),
    ]
    .into_iter()
    .chain(
        WALKS
            .iter()
            .map(|&(name, seed, len)| (name, random_walk(seed, len))),
    )
}

fn bench_gen_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("gen_moves");
    for (name, game) in games() {
        group.bench_function(name, |b| b.iter(|| black_box(game.possible_moves().len())));
    }
}

fn bench_make_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_move");
    for (name, mut game) in games() {
        let moves = game.possible_moves();
        group.bench_function(name, |b| {
            b.iter(|| {
                for &mv in &moves {
                    game.apply_move(mv);
                    game.unapply_move(mv).unwrap();
                }
            })
        });
    }
}

fn bench_attacked_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("attacked_squares");
    for (name, game) in games() {
        group.bench_function(name, |b| {
            b.iter(|| {
                for color in [Color::White, Color::Black] {
                    black_box(movegen::attacked_squares(&game, color));
                }
            })
        });
    }
}

criterion_group!(
    chess,
    bench_gen_moves,
    bench_make_move,
    bench_attacked_squares,
);

criterion_main!(chess);
