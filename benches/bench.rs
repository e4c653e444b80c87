// Criterion benchmarks for Aluna Risk

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use aluna_risk::core::{
    aggregate, batch_statistics, classify_risk_level, to_wire, validate, validate_all,
    NumericField, RawInputBuffer,
};
use aluna_risk::models::{BatchPatientResult, ConfidenceLevel, RiskPrediction, RiskType};

fn create_predictions(seed: usize) -> Vec<RiskPrediction> {
    RiskType::ALL
        .into_iter()
        .enumerate()
        .map(|(i, risk_type)| {
            let probability = ((seed * 7 + i * 13) % 100) as f64 / 100.0;
            RiskPrediction {
                risk_type,
                probability,
                risk_level: classify_risk_level(probability),
                confidence_level: ConfidenceLevel::High,
                recommendation: String::new(),
            }
        })
        .collect()
}

fn bench_validate_field(c: &mut Criterion) {
    c.bench_function("validate_gestational_weeks", |b| {
        b.iter(|| validate(black_box(NumericField::GestationalWeeks), black_box("38.5")))
    });
}

fn bench_validate_all(c: &mut Criterion) {
    let buffer = RawInputBuffer::default();

    c.bench_function("validate_all", |b| {
        b.iter(|| validate_all(black_box(&buffer)))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let predictions = create_predictions(3);

    c.bench_function("aggregate", |b| {
        b.iter(|| aggregate(black_box(&predictions)))
    });
}

fn bench_batch_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_statistics");
    let patient = to_wire(&RawInputBuffer::default().to_input().unwrap());

    for size in [10, 50, 100].iter() {
        let results: Vec<BatchPatientResult> = (0..*size)
            .map(|id| {
                let predictions = create_predictions(id);
                BatchPatientResult {
                    patient_id: id as u32,
                    summary: aggregate(&predictions),
                    predictions,
                    patient_data: patient,
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &results, |b, results| {
            b.iter(|| batch_statistics(black_box(results)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_validate_field,
    bench_validate_all,
    bench_aggregate,
    bench_batch_statistics
);
criterion_main!(benches);
