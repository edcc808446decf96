//! Replay benchmarks
//!
//! Measures recording a seeded run and verifying it by re-execution.
//!
//! Run with: cargo bench --bench replay

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hexagon_core::game::input::InputFrame;
use hexagon_core::game::pattern::PatternConfig;
use hexagon_core::game::state::LevelState;
use hexagon_core::game::tick::{tick, LevelConfig};
use hexagon_core::replay::{record_run, verify_replay};
use hexagon_core::TICK_RATE;

/// Short level so walls reach the player quickly.
fn bench_config() -> LevelConfig {
    LevelConfig {
        wall_spawn_distance: 400.0,
        pattern: PatternConfig {
            interval_ticks: 120,
            ..PatternConfig::default()
        },
        ..LevelConfig::default()
    }
}

fn weave(t: u32, _: &LevelState) -> InputFrame {
    if (t / 90) % 2 == 0 {
        InputFrame::with_movement(1)
    } else {
        InputFrame::with_movement(-1).focused()
    }
}

/// Benchmark raw tick throughput with many live walls
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let config = bench_config();

    for seconds in [1u32, 5, 10] {
        let ticks = seconds * TICK_RATE;
        group.throughput(Throughput::Elements(ticks as u64));
        group.bench_with_input(BenchmarkId::new("ticks", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut state = LevelState::new(&config, 42);
                for t in 0..ticks {
                    let input = weave(t, &state);
                    black_box(tick(&mut state, &input, &config));
                }
                black_box(state.compute_hash())
            });
        });
    }

    group.finish();
}

/// Benchmark recording and verifying a full run
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);
    let config = bench_config();
    let max_ticks = TICK_RATE * 30;

    group.bench_function("record", |b| {
        b.iter(|| black_box(record_run(&config, 42, weave, max_ticks)));
    });

    let replay = record_run(&config, 42, weave, max_ticks);
    group.bench_function("verify", |b| {
        b.iter(|| black_box(verify_replay(&replay).is_ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_replay);
criterion_main!(benches);
