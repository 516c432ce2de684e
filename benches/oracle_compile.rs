//! Compilation and replay benchmarks for composed oracles.
//!
//! Run with: cargo bench --bench oracle_compile
//!
//! Benchmarks cover:
//! - Compiling Kakuro grid oracles of growing size
//! - Replaying a compiled 8x8 Kakuro oracle on one classical input
//! - Active volume of the compiled sequences

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use revq::oracles::{SumEquals, grid};
use revq::{BitState, CostModel, Oracle, Session, SessionConfig, Simulator};

fn compile_kakuro(rows: &[usize], cols: &[usize]) -> Session {
    let oracle = grid::kakuro(rows, cols).expect("valid grid");
    let mut session = Session::new(SessionConfig::default().with_capacity(256));
    let x = session.allocate("x", rows.len() * cols.len()).expect("input register");
    let y = session.allocate("y", 1).expect("output register");
    oracle.compile(&mut session, &x, y[0]).expect("compiles");
    session
}

fn bench_kakuro_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("kakuro_compile");
    for size in [2usize, 4, 6, 8] {
        let sums: Vec<usize> = (0..size).map(|i| 1 + i % 2).collect();
        let volume = CostModel::default().active_volume(&compile_kakuro(&sums, &sums).circuit());
        println!("kakuro {}x{}: active volume {}", size, size, volume);
        group.bench_with_input(BenchmarkId::from_parameter(size), &sums, |b, sums| {
            b.iter(|| compile_kakuro(black_box(sums), black_box(sums)))
        });
    }
    group.finish();
}

fn bench_kakuro_replay(c: &mut Criterion) {
    let sums = [1usize, 2, 1, 2, 1, 2, 1, 2];
    let session = compile_kakuro(&sums, &sums);
    let circuit = session.circuit();
    let input = BitState::zeros(session.pool().capacity());
    let simulator = Simulator::new();
    c.bench_function("kakuro_8x8_replay", |b| {
        b.iter(|| simulator.run(black_box(&circuit), black_box(&input)).expect("replays"))
    });
}

fn bench_sum_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_equals_compile");
    for n in [4usize, 16, 64] {
        let oracle = SumEquals::new(n, n / 2).expect("valid sum");
        group.bench_with_input(BenchmarkId::from_parameter(n), &oracle, |b, oracle| {
            b.iter(|| {
                let mut session = Session::new(SessionConfig::default().with_capacity(n + 16));
                let x = session.allocate("x", n).expect("input register");
                let y = session.allocate("y", 1).expect("output register");
                oracle.compile(&mut session, &x, y[0]).expect("compiles");
                session
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kakuro_compile, bench_kakuro_replay, bench_sum_counter);
criterion_main!(benches);
