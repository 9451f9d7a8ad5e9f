//! Criterion benchmarks: pruned filter scan vs. exhaustive DTW scan.

use criterion::{Criterion, criterion_group, criterion_main};

use warpnn_dtw::{BandConstraint, Dtw, LowerBoundFilter, TimeSeries};

/// Deterministic pseudo-walk built from mixed sinusoids.
fn make_walk(n: usize, phase: f64) -> TimeSeries {
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 * 0.1 + phase;
            t.sin() + 0.5 * (2.3 * t).cos()
        })
        .collect();
    TimeSeries::new(values).unwrap()
}

fn make_pool(count: usize, len: usize) -> Vec<TimeSeries> {
    (0..count).map(|i| make_walk(len, i as f64 * 0.37)).collect()
}

fn bench_filter_scan(c: &mut Criterion) {
    let target = make_walk(128, 10.0);
    let pool = make_pool(200, 128);
    let constraint = BandConstraint::SakoeChibaRadius(12);

    c.bench_function("filter_scan_200x128_r12", |b| {
        b.iter(|| {
            let mut filter = LowerBoundFilter::new(target.as_view(), constraint);
            for s in &pool {
                filter.test(s.as_view()).unwrap();
            }
            filter.lowest_cost()
        });
    });
}

fn bench_exhaustive_scan(c: &mut Criterion) {
    let target = make_walk(128, 10.0);
    let pool = make_pool(200, 128);
    let dtw = Dtw::with_sakoe_chiba(12);

    c.bench_function("exhaustive_scan_200x128_r12", |b| {
        b.iter(|| {
            let mut best = f64::INFINITY;
            for s in &pool {
                let d = dtw.distance(s.as_view(), target.as_view()).value();
                if d < best {
                    best = d;
                }
            }
            best
        });
    });
}

fn bench_envelope_build(c: &mut Criterion) {
    let series = make_walk(1024, 0.0);
    let constraint = BandConstraint::SakoeChibaRadius(100);

    c.bench_function("envelope_1024_r100", |b| {
        b.iter(|| warpnn_dtw::SeriesEnvelope::compute(series.as_view(), constraint));
    });
}

criterion_group!(
    benches,
    bench_filter_scan,
    bench_exhaustive_scan,
    bench_envelope_build
);
criterion_main!(benches);
