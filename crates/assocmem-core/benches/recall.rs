use assocmem_core::scan::random_target;
use assocmem_core::{AssociativeMemory, RecallConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_memorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("memorize");
    group.sample_size(20);

    // Load fixed at 0.1
    for units in [256usize, 1000, 2048].iter() {
        let patterns = units / 10;
        let mut memory = AssociativeMemory::new(random_target(*units, 1234), 1234).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(units), &patterns, |b, &p| {
            b.iter(|| {
                memory.memorize(black_box(p)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_recall(c: &mut Criterion) {
    let mut group = c.benchmark_group("recall");
    group.sample_size(20);

    for m0 in [0.2, 0.6, 1.0].iter() {
        let mut memory = AssociativeMemory::new(random_target(1000, 1234), 1234).unwrap();
        memory.memorize(100).unwrap();
        let config = RecallConfig::new(*m0).with_delta_m(1e-3);

        group.bench_with_input(BenchmarkId::from_parameter(m0), &config, |b, config| {
            b.iter(|| black_box(memory.recall(config).unwrap().len()));
        });
    }

    group.finish();
}

fn bench_local_fields(c: &mut Criterion) {
    let target = random_target(1000, 7);
    let mut memory = AssociativeMemory::new(target.clone(), 7).unwrap();
    let coupling = memory.memorize(100).unwrap().clone();

    c.bench_function("local_fields_1000", |b| {
        b.iter(|| black_box(coupling.local_fields(black_box(&target))));
    });
}

criterion_group!(benches, bench_memorize, bench_recall, bench_local_fields);
criterion_main!(benches);
