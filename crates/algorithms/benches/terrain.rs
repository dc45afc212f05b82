//! Benchmarks for raster kernels

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geoprocs_algorithms::hydrology::{flow_direction, D8Encoding};
use geoprocs_algorithms::terrain::{curvature, slope, tpi, CurvatureParams, SlopeParams, TpiParams};
use geoprocs_core::{GeoTransform, Raster};

fn create_dem(size: usize) -> Raster<f64> {
    let mut dem = Raster::new(size, size);
    dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));

    // Tilted plane with a repeating bumpy pattern
    for row in 0..size {
        for col in 0..size {
            let base = (row + col) as f64;
            let variation = ((row * 7 + col * 13) % 100) as f64 / 10.0;
            dem.set(row, col, base + variation).unwrap();
        }
    }
    dem
}

fn bench_window_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_3x3");

    for size in [256, 512, 1024] {
        let dem = create_dem(size);

        group.bench_with_input(BenchmarkId::new("slope", size), &dem, |b, dem| {
            b.iter(|| slope(black_box(dem), SlopeParams::default()).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("curvature", size), &dem, |b, dem| {
            b.iter(|| curvature(black_box(dem), CurvatureParams::default()).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("flow_direction", size), &dem, |b, dem| {
            b.iter(|| flow_direction(black_box(dem), D8Encoding::Esri).unwrap())
        });
    }

    group.finish();
}

fn bench_tpi_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("tpi");
    let dem = create_dem(512);

    for radius in [1, 3, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| tpi(black_box(&dem), TpiParams { radius }).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_window_kernels, bench_tpi_radius);
criterion_main!(benches);
