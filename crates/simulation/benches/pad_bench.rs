//! Criterion benchmarks for launch pad formation detection.
//!
//! Benchmarks:
//!   - pad_connectivity at footprint center and corner
//!   - find_pad_center hit (full footprint) and miss (plus shape)
//!   - form_pad + clear_pad_formation cycle on a prepared window
//!   - one FixedUpdate pass with an assembled pad on the grid
//!
//! Budget: all detection operations < 1µs.
//!
//! Run with: cargo bench -p simulation --bench pad_bench --features bench

use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use simulation::config::{GRID_HEIGHT, GRID_WIDTH};
use simulation::grid::{PadRole, WorldGrid};
use simulation::launch_pad::{
    clear_pad_formation, find_pad_center, form_pad, pad_connectivity, place_pad_cell,
};
use simulation::test_harness::TestColony;

/// Grid with a full 3x3 pad footprint centered on `(cx, cy)`, roles unassigned.
fn grid_with_footprint(cx: usize, cy: usize) -> WorldGrid {
    let mut grid = WorldGrid::new(GRID_WIDTH, GRID_HEIGHT);
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            place_pad_cell(
                &mut grid,
                (cx as i32 + dx) as usize,
                (cy as i32 + dy) as usize,
            );
        }
    }
    grid
}

// ---------------------------------------------------------------------------
// Benchmark: pad_connectivity
// ---------------------------------------------------------------------------

fn bench_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("pad_connectivity");
    group.sample_size(1000);

    let grid = grid_with_footprint(64, 64);

    // Center cell: all four cardinal neighbors are free pad cells.
    group.bench_function("center_4_neighbors", |b| {
        b.iter(|| black_box(pad_connectivity(&grid, black_box(64), black_box(64))));
    });

    // Corner cell: two cardinal neighbors inside the footprint.
    group.bench_function("corner_2_neighbors", |b| {
        b.iter(|| black_box(pad_connectivity(&grid, black_box(63), black_box(63))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: find_pad_center
// ---------------------------------------------------------------------------

fn bench_find_pad_center(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_pad_center");
    group.sample_size(1000);

    let footprint = grid_with_footprint(64, 64);

    let mut plus = WorldGrid::new(GRID_WIDTH, GRID_HEIGHT);
    place_pad_cell(&mut plus, 64, 64);
    place_pad_cell(&mut plus, 64, 63);
    place_pad_cell(&mut plus, 64, 65);
    place_pad_cell(&mut plus, 63, 64);
    place_pad_cell(&mut plus, 65, 64);

    // Hit: a corner cell only reaches the center through the degraded
    // lower-connectivity candidate paths.
    group.bench_function("hit_from_corner", |b| {
        b.iter(|| black_box(find_pad_center(black_box(&footprint), 63, 63)));
    });

    // Hit: the center cell sees full connectivity and matches immediately.
    group.bench_function("hit_from_center", |b| {
        b.iter(|| black_box(find_pad_center(black_box(&footprint), 64, 64)));
    });

    // Miss: a plus shape has full connectivity at the middle but no valid
    // window, so every candidate is tried and rejected.
    group.bench_function("miss_plus_shape", |b| {
        b.iter(|| black_box(find_pad_center(black_box(&plus), 64, 64)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: form / clear cycle
// ---------------------------------------------------------------------------

fn bench_form_clear_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("pad_form_clear");
    group.sample_size(1000);

    let mut grid = grid_with_footprint(64, 64);

    // Stamp all nine roles plus the anchor, then tear the window back down.
    // Teardown leaves the cells pad-kind and role-less, so every iteration
    // starts from the same state.
    group.bench_function("cycle", |b| {
        b.iter(|| {
            form_pad(&mut grid, 64, 64, Entity::PLACEHOLDER);
            black_box(clear_pad_formation(&mut grid, 64, 64, PadRole::Center));
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: full FixedUpdate pass
// ---------------------------------------------------------------------------

fn bench_fixed_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("pad_fixed_update");
    group.sample_size(100);

    // One assembled pad plus scattered loose cells, which is the steady state
    // the placement handlers and the invariant sweep see.
    let mut colony = TestColony::new().with_pad_footprint(64, 64);
    for i in 0..16 {
        colony = colony.with_pad_cell(4 + i * 2, 4);
    }
    colony.tick(1);

    group.bench_function("idle_tick", |b| {
        b.iter(|| {
            colony.world_mut().run_schedule(FixedUpdate);
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_connectivity,
    bench_find_pad_center,
    bench_form_clear_cycle,
    bench_fixed_update
);
criterion_main!(benches);
