// Pipeline benchmark - CSV extracts through both reports
//
// Measures the three stages separately: loading the extracts into typed
// records, computing both reports, and encoding them as CSV.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hirestats_core::{compute_reports, Inputs, LoadOptions, PipelineOptions};
use hirestats_writer::{encode_csv, DEFAULT_DELIMITER};

mod fixtures;
use fixtures::{generate_extracts, Extracts, WorkloadSize};

fn load(extracts: &Extracts) -> Inputs {
    Inputs::load(
        extracts.departments.as_bytes(),
        extracts.jobs.as_bytes(),
        extracts.hired_employees.as_bytes(),
        &LoadOptions::default(),
    )
    .unwrap()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_extracts");

    for size in [WorkloadSize::Small, WorkloadSize::Medium] {
        let extracts = generate_extracts(size);
        group.throughput(Throughput::Bytes(extracts.hired_employees.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", size)),
            &extracts,
            |b, extracts| {
                b.iter(|| black_box(load(extracts)));
            },
        );
    }

    group.finish();
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_reports");
    let options = PipelineOptions::default();

    for size in [WorkloadSize::Small, WorkloadSize::Medium] {
        let inputs = load(&generate_extracts(size));
        group.throughput(Throughput::Elements(size.record_count() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", size)),
            &inputs,
            |b, inputs| {
                b.iter(|| black_box(compute_reports(inputs, &options).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let inputs = load(&generate_extracts(WorkloadSize::Medium));
    let reports = compute_reports(&inputs, &PipelineOptions::default()).unwrap();
    let quarterly = reports.quarterly.to_record_batch().unwrap();

    c.bench_function("encode_quarterly_csv", |b| {
        b.iter(|| black_box(encode_csv(&quarterly, DEFAULT_DELIMITER, Vec::new()).unwrap()));
    });
}

criterion_group!(benches, bench_load, bench_compute, bench_encode);
criterion_main!(benches);
