use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pyramid_binarize::{
    Binarization, BinarizeConfig, Grid, Hypothesis, PyramidSet, Sample, ThresholdSurface,
};

fn page(width: usize, height: usize) -> Grid<Sample> {
    // Text-like strokes on a left-to-right lighting gradient
    Grid::from_fn(width, height, |x, y| {
        let paper = 150 + (x * 90 / width) as u8;
        if (y % 24) < 10 && (x % 14) < 4 {
            Sample::new(paper / 4, paper / 4, paper / 3)
        } else {
            Sample::new(paper, paper, paper.saturating_sub(10))
        }
    })
}

fn bench_pyramid_build_medium(c: &mut Criterion) {
    let image = page(640, 480);
    c.bench_function("pyramid_set_640x480", |b| {
        b.iter(|| PyramidSet::build(black_box(&image)))
    });
}

fn bench_surface_build_medium(c: &mut Criterion) {
    let image = page(640, 480);
    let pyramids = PyramidSet::build(&image).unwrap();
    c.bench_function("threshold_surface_640x480", |b| {
        b.iter(|| {
            ThresholdSurface::build(
                black_box(&pyramids),
                black_box(Hypothesis::LocalAverage),
                black_box(5.0),
            )
        })
    });
}

fn bench_full_pipeline_medium(c: &mut Criterion) {
    let image = page(640, 480);
    let config = BinarizeConfig::default();
    c.bench_function("binarize_640x480", |b| {
        b.iter(|| pyramid_binarize::binarize(black_box(&image), black_box(&config)))
    });
}

fn bench_full_pipeline_large(c: &mut Criterion) {
    let image = page(1920, 1080);
    let config = BinarizeConfig::default();
    c.bench_function("binarize_1920x1080", |b| {
        b.iter(|| pyramid_binarize::binarize(black_box(&image), black_box(&config)))
    });
}

fn bench_render_only(c: &mut Criterion) {
    let image = page(640, 480);
    let binarization = Binarization::analyze(&image, Hypothesis::LocalAverage, 5.0).unwrap();
    c.bench_function("render_level0_640x480", |b| {
        b.iter(|| binarization.render(black_box(&image), 0, black_box(9.0), black_box(240)))
    });
}

criterion_group!(
    benches,
    bench_pyramid_build_medium,
    bench_surface_build_medium,
    bench_full_pipeline_medium,
    bench_full_pipeline_large,
    bench_render_only
);
criterion_main!(benches);
