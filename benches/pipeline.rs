use criterion::{black_box, Criterion};

use chromint::{integrate_peaks, IntegrationConfig, Interval, PeakDetector, Signal};

fn synthetic_chromatogram(n: usize) -> Vec<f32> {
    let shapes: Vec<(f64, f64, f64)> = (1..20)
        .map(|i| ((i * n / 20) as f64, 1000.0 + 250.0 * i as f64, 4.0 + (i % 5) as f64))
        .collect();
    (0..n)
        .map(|i| {
            let x = i as f64;
            shapes
                .iter()
                .map(|(c, h, s)| h * (-(x - c).powi(2) / (2.0 * s * s)).exp())
                .sum::<f64>() as f32
        })
        .collect()
}

fn detection(c: &mut Criterion) {
    let values = synthetic_chromatogram(20_000);
    let signal = Signal::try_from(&values[..]).unwrap();
    let detector = PeakDetector::new(500.0, 1.0, 2);
    c.bench_function("detect", |b| b.iter(|| black_box(detector.detect(&signal))));
}

fn pipeline(c: &mut Criterion) {
    let values = synthetic_chromatogram(20_000);
    let signal = Signal::try_from(&values[..]).unwrap();
    let intervals: Vec<Interval> = (0..10)
        .map(|i| Interval::new(i * 2_000, (i + 1) * 2_000).unwrap())
        .collect();
    let config = IntegrationConfig::default().min_height(500.0).min_slope(2.0);
    c.bench_function("integrate_peaks", |b| {
        b.iter(|| black_box(integrate_peaks(&signal, &intervals, &config).unwrap()))
    });
}

criterion::criterion_group!(benches, detection, pipeline);
criterion::criterion_main!(benches);
