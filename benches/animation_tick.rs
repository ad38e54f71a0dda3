use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tech_grid::interaction::NormalizedPointer;
use tech_grid::scene::{BuiltScene, GridGeometry, ParticleSet};
use tech_grid::{AnimationDriver, DriverSettings, FieldConfig};

/// Benchmark: one active driver tick at increasing particle counts
fn bench_driver_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_tick");

    for count in [150usize, 1_000, 10_000].iter() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particles = ParticleSet::scatter(*count, 21.6, 5.0, &mut rng);
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(2));
        let pointer = NormalizedPointer::new(0.3, -0.4);
        let mut frame = 0u64;

        group.bench_with_input(BenchmarkId::new("particles", count), count, |b, _| {
            b.iter(|| {
                // Every call lands past the throttle interval
                frame += 1;
                let now = Duration::from_millis(frame * 40);
                let outcome = driver.tick(frame as f32 * 0.04, now, pointer, &mut particles);
                particles.take_dirty();
                black_box(outcome)
            })
        });
    }

    group.finish();
}

/// Benchmark: skipped ticks, the common case at display refresh rates
fn bench_throttled_tick(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut particles = ParticleSet::scatter(150, 21.6, 5.0, &mut rng);
    let mut driver = AnimationDriver::new(DriverSettings::default(), Some(2));
    driver.tick(0.0, Duration::ZERO, NormalizedPointer::CENTER, &mut particles);

    c.bench_function("driver_tick_throttled", |b| {
        b.iter(|| {
            black_box(driver.tick(
                0.001,
                Duration::from_millis(1),
                NormalizedPointer::CENTER,
                &mut particles,
            ))
        })
    });
}

/// Benchmark: full scene construction with default parameters
fn bench_scene_build(c: &mut Criterion) {
    let params = FieldConfig::default().scene_params().unwrap();
    let mut group = c.benchmark_group("scene_build");

    group.bench_function("default", |b| {
        let mut rng = StdRng::seed_from_u64(3);
        b.iter(|| black_box(BuiltScene::build(black_box(&params), &mut rng)))
    });

    for count in [24u32, 96, 384].iter() {
        group.bench_with_input(BenchmarkId::new("grid", count), count, |b, &count| {
            b.iter(|| black_box(GridGeometry::build(count, 1.8, 1)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_driver_tick,
    bench_throttled_tick,
    bench_scene_build
);
criterion_main!(benches);
