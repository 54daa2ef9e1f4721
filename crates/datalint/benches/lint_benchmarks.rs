//! Lint performance benchmarks.
//!
//! Measures type imposition and a full `check_all` pass across dataset sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use datalint::{
    Column, ColumnMetadata, Dataset, Linter, SemanticType, TableMetadata, TypeConversionTable,
    TypeImposer,
};

/// Generate a text dataset with a mix of column kinds.
fn generate_dataset(rows: usize) -> Dataset {
    let ids = (0..rows).map(|r| Some(r.to_string()));
    let scores = (0..rows).map(|r| Some(format!("{:.2}", r as f64 * 1.5)));
    let dates = (0..rows).map(|r| Some(format!("2023-{:02}-{:02}", (r % 12) + 1, (r % 28) + 1)));
    let flags = (0..rows).map(|r| Some(if r % 2 == 0 { "true" } else { "false" }.to_string()));
    let categories = (0..rows).map(|r| {
        if r % 17 == 0 {
            None
        } else {
            Some(format!("Category_{}", r % 10))
        }
    });

    Dataset::from_columns(vec![
        ("id", Column::text(ids)),
        ("score", Column::text(scores)),
        ("visit_date", Column::text(dates)),
        ("flag", Column::text(flags)),
        ("category", Column::text(categories)),
    ])
    .unwrap()
}

fn metadata() -> TableMetadata {
    let categories: Vec<String> = (0..8).map(|i| format!("Category_{i}")).collect();
    TableMetadata::with_columns(vec![
        ColumnMetadata::new("id", SemanticType::Long).with_nullable(false),
        ColumnMetadata::new("score", SemanticType::Double),
        ColumnMetadata::new("visit_date", SemanticType::Date),
        ColumnMetadata::new("flag", SemanticType::Boolean),
        ColumnMetadata::new("category", SemanticType::Character)
            .with_nullable(false)
            .with_enum(categories)
            .with_pattern("^Category_[0-9]$"),
    ])
}

/// Benchmark type imposition alone.
fn bench_impose(c: &mut Criterion) {
    let mut group = c.benchmark_group("impose");
    let conversions = TypeConversionTable::default();
    let metadata = metadata();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = generate_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            let imposer = TypeImposer::new(&conversions, Default::default());
            b.iter(|| imposer.impose(black_box(dataset), black_box(&metadata)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark construction plus every check.
fn bench_check_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_all");
    let metadata = metadata();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = generate_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter_with_setup(
                || (dataset.clone(), metadata.clone()),
                |(dataset, metadata)| {
                    let mut linter = Linter::new(dataset, metadata).unwrap();
                    linter.check_all();
                    black_box(linter.log().len())
                },
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_impose, bench_check_all);
criterion_main!(benches);
