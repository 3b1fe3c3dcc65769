use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sno::config::Config;
use sno::split::{SplitDirection, WindowManager};
use sno::window::default_processors;
use std::hint::black_box;

/// Layout with `count` windows, alternating split directions
fn build(count: usize) -> WindowManager {
    let mut windows = WindowManager::new(default_processors(&Config::default()), 60, 200);
    let mut target = windows.create_window(2).unwrap();
    for i in 1..count {
        let direction = if i % 3 == 0 {
            SplitDirection::Vertical
        } else {
            SplitDirection::Horizontal
        };
        target = windows.split(target, direction, None).unwrap();
    }
    windows
}

fn split_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_tree");

    group.bench_function("split_64", |b| {
        b.iter(|| black_box(build(64)))
    });

    group.bench_function("close_all_64", |b| {
        b.iter_batched(
            || build(64),
            |mut windows| {
                while let Some(id) = windows.active_window_id() {
                    windows.close_window(id).unwrap();
                }
                black_box(windows)
            },
            BatchSize::SmallInput,
        )
    });

    let windows = build(64);
    group.bench_function("walk_64", |b| {
        b.iter(|| black_box(windows.walk_windows()))
    });

    group.bench_function("layout_64", |b| {
        b.iter(|| black_box(windows.compute_layout(60, 200)))
    });

    group.bench_function("focus_cycle_64", |b| {
        b.iter_batched(
            || build(64),
            |mut windows| {
                for _ in 0..64 {
                    black_box(windows.focus_next_window());
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, split_tree);
criterion_main!(benches);
