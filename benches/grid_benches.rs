use RustedWorksheets::generators::{Difficulty, ProblemKind};
use RustedWorksheets::grid::grid_builder::GridBuilder;
use RustedWorksheets::grid::grid_config::GridSpec;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn spec(kind: ProblemKind, n: usize) -> GridSpec {
    let mut spec = GridSpec::new(kind, n);
    spec.seed = Some(42);
    spec
}

fn bench_grids(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid builds");
    group.sample_size(10);
    for kind in [
        ProblemKind::Derivatives,
        ProblemKind::Taylor,
        ProblemKind::Nash,
        ProblemKind::HorizontalTangent,
    ] {
        group.bench_function(format!("{} n=9", kind), |b| {
            b.iter(|| GridBuilder::new(black_box(spec(kind, 9))).build())
        });
    }
    for difficulty in [Difficulty::Simple, Difficulty::Hard, Difficulty::Extreme] {
        group.bench_function(format!("volumes {} n=3", difficulty), |b| {
            b.iter(|| {
                let mut spec = spec(ProblemKind::Volumes, 3);
                spec.difficulty = difficulty;
                GridBuilder::new(black_box(spec)).build()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grids);
criterion_main!(benches);
