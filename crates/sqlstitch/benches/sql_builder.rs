use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlstitch::{BuilderOptions, FluentBuilder, Settings, TemplateBuilder, sql};

/// SELECT col0, col1, ... FROM t WHERE col0 = @p0 AND col1 = @p1 ...
fn build_fluent(n: usize, settings: &Settings) -> FluentBuilder {
    let mut b = FluentBuilder::new(settings.clone());
    for i in 0..n {
        b.select(format!("col{i}"));
    }
    b.from("t");
    for i in 0..n {
        let column = format!("col{i}");
        b.where_clause(sql!("{column:raw} = {i as i64}"));
    }
    b
}

fn bench_fluent(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/fluent");
    let settings = Settings::default();

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_fluent(n, &settings).build()));
        });
    }

    group.finish();
}

fn bench_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/reuse");
    let settings = Settings::default().apply(&BuilderOptions::new().reuse_parameters(true));

    // Half of the values repeat, so reuse hits and misses are both exercised.
    for n in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut builder = TemplateBuilder::new(settings.clone());
                for i in 0..n {
                    builder.append(sql!("OR Id = {(i % (n / 2)) as i64}"));
                }
                black_box(builder.sql().len());
            });
        });
    }

    group.finish();
}

fn bench_literal_fast_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/literal_append");

    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut builder = TemplateBuilder::new(Settings::default());
                for _ in 0..n {
                    builder.append("AND Active = 1");
                }
                black_box(builder.sql().len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fluent, bench_reuse, bench_literal_fast_path);
criterion_main!(benches);
