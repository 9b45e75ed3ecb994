use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isosim::{build, validate, FieldSelection, Framing, Registry};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let registry = Registry::standard();
    let framing = Framing::none().with_tpdu().with_length_header();

    // Mandatory fields only (2..=7)
    let small = FieldSelection::seeded(registry);
    group.bench_function("build_mandatory", |b| {
        b.iter(|| {
            black_box(build(&small, registry, framing).unwrap());
        });
    });

    // Every field at its default value
    let mut full = FieldSelection::seeded(registry);
    for number in 8..=64 {
        full.include(number, registry).unwrap();
    }
    group.bench_function("build_all_fields", |b| {
        b.iter(|| {
            black_box(build(&full, registry, framing).unwrap());
        });
    });

    group.bench_function("validate_all_fields", |b| {
        b.iter(|| {
            black_box(validate(&full, registry));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
