use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tourcompare::core::{align::align_to_reference, range::AlignmentWindow};

fn series(samples: usize, step: f64) -> Vec<f64> {
    (0..samples).map(|i| i as f64 * step).collect()
}

fn bench_alignment(c: &mut Criterion) {
    let comp_distance = series(100_000, 9.7);
    let ref_distance = series(80_000, 11.3);
    let ref_elevation: Vec<f64> = ref_distance.iter().map(|d| 500.0 + (d * 0.01).sin() * 40.0).collect();
    let window = AlignmentWindow::new(0, comp_distance.len() - 1).expect("window");

    c.bench_function("align_100k_full", |b| {
        b.iter(|| {
            align_to_reference(
                black_box(&comp_distance),
                window,
                black_box(&ref_elevation),
                black_box(&ref_distance),
                0,
            )
            .expect("align")
        })
    });

    let partial = AlignmentWindow::new(25_000, 75_000).expect("window");
    c.bench_function("align_100k_partial_window", |b| {
        b.iter(|| {
            align_to_reference(
                black_box(&comp_distance),
                partial,
                black_box(&ref_elevation),
                black_box(&ref_distance),
                10_000,
            )
            .expect("align")
        })
    });
}

criterion_group!(benches, bench_alignment);
criterion_main!(benches);
