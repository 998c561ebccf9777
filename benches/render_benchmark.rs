#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for chart selection and rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dbbench_viz::prelude::*;
use dbbench_viz::output::PngEncoder;

const DATABASES: [&str; 3] = ["PostgreSQL", "MongoDB", "SQLite"];

fn records(operation: &str, per_cell: usize) -> Vec<BenchmarkRecord> {
    let mut out = Vec::new();
    for scale in [1.0, 2.0, 5.0, 10.0] {
        for (d, db) in DATABASES.iter().enumerate() {
            for i in 0..per_cell {
                let micros = 1000.0 * scale * (d as f64 + 1.0) + (i % 17) as f64 * 37.0;
                out.push(BenchmarkRecord::new(operation, *db, "Athlete", scale, scale * 100.0, micros));
            }
        }
    }
    out
}

fn render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_chart");
    let style = Style {
        dpi: 100,
        ..Style::default()
    };

    for per_cell in [10, 100, 1_000] {
        for operation in ["GetAllAsync", "GetByIdAsync"] {
            let data = records(operation, per_cell);
            let chart = enumerate(&data, GroupingMode::Global).next().expect("one group");
            let spec = select_chart(&chart).expect("chart spec");

            group.bench_with_input(
                BenchmarkId::new(operation, per_cell),
                &per_cell,
                |b, _| b.iter(|| render_chart(black_box(&spec), &style).expect("render should succeed")),
            );
        }
    }

    group.finish();
}

fn select_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_chart");

    for per_cell in [100, 10_000] {
        let data = records("GetByIdAsync", per_cell);
        group.bench_with_input(BenchmarkId::from_parameter(per_cell), &per_cell, |b, _| {
            b.iter(|| {
                let chart = enumerate(black_box(&data), GroupingMode::Global).next().expect("one group");
                select_chart(&chart).expect("chart spec")
            });
        });
    }

    group.finish();
}

fn encode_benchmark(c: &mut Criterion) {
    let style = Style::default();
    let data = records("DeleteAllAsync", 50);
    let chart = enumerate(&data, GroupingMode::Global).next().expect("one group");
    let fb = render_chart(&select_chart(&chart).expect("chart spec"), &style).expect("render");
    let encoder = PngEncoder::new(style.dpi);

    c.bench_function("png_encode_300dpi", |b| {
        b.iter(|| encoder.to_bytes(black_box(&fb)).expect("encode should succeed"));
    });
}

criterion_group!(benches, render_benchmark, select_benchmark, encode_benchmark);
criterion_main!(benches);
