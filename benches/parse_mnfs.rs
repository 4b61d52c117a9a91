//! Benchmark: parse and canonically emit representative click manifests.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WEATHER_CLICK: &str = include_str!("../testdata/weather-click.mnfs");
const THERMO_CLICK: &str = include_str!("../testdata/thermo-click.mnfs");

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse weather-click", |b| {
        b.iter(|| mnfs::parse(black_box(WEATHER_CLICK)).expect("parse"))
    });
    c.bench_function("parse thermo-click", |b| {
        b.iter(|| mnfs::parse(black_box(THERMO_CLICK)).expect("parse"))
    });
}

fn bench_emit(c: &mut Criterion) {
    let manifest = mnfs::parse(WEATHER_CLICK).expect("parse");
    c.bench_function("emit weather-click", |b| {
        b.iter(|| black_box(&manifest).to_string())
    });
}

criterion_group!(benches, bench_parse, bench_emit);
criterion_main!(benches);
