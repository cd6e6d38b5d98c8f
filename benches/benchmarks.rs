use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_rules::board::Board;
use chess_rules::config::RulesConfig;
use chess_rules::game::Game;
use chess_rules::perft::{run_perft_parallel, run_perft_test};
use chess_rules::types::{Color, Position};

const MIDDLEGAME: &str = "r...k..r
                          p.ppqpb.
                          bn..pnp.
                          ...PN...
                          .p..P...
                          ..N..Q.p
                          PPPBBPPP
                          R...K..R";

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let mut bo = Board::new();
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| bo.all_valid_moves(black_box(Color::White)))
    });
}

pub fn bench_legal_moves_from_middlegame(c: &mut Criterion) {
    let mut bo = Board::from_diagram(MIDDLEGAME, Color::White).unwrap();
    c.bench_function("get legal moves from middlegame", |b| {
        b.iter(|| bo.all_valid_moves(black_box(Color::White)))
    });
}

pub fn bench_make_and_undo(c: &mut Criterion) {
    let mut game = Game::new();
    c.bench_function("make and undo e2e4", |b| {
        b.iter(|| {
            game.try_move(black_box(pos("e2")), black_box(pos("e4"))).unwrap();
            game.undo_last_move()
        })
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let mut game = Game::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| run_perft_test(&mut game, black_box(3)))
    });

    let board = Board::from_diagram(MIDDLEGAME, Color::White).unwrap();
    let game = Game::from_board(board, RulesConfig::default());
    group.bench_function("parallel perft from middlegame 2 ply", |b| {
        b.iter(|| run_perft_parallel(&game, black_box(2)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_middlegame,
    bench_make_and_undo,
    bench_perft_3,
);
criterion_main!(benches);
