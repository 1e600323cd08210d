use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlgen::{Dollar, Expr, SelectBuilder, Statement, StatementBuilder, replace_positional};

/// SELECT col0, col1, ... FROM t WHERE col0 = $1 AND col1 = $2 ...
fn build_select(n: usize) -> SelectBuilder {
    let pg = StatementBuilder::new(Dollar);
    let mut qb = pg.select((0..n).map(|i| format!("col{i}"))).from(["t"]);
    for i in 0..n {
        qb = qb.eq(&format!("col{i}"), i as i64);
    }
    qb
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_configure_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/configure_and_build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).build()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let qb = sqlgen::select(["*"])
                    .from(["t"])
                    .in_list("id", values.iter().copied())
                    .placeholder(Dollar);
                black_box(qb.build())
            });
        });
    }

    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_groups");

    for depth in [1, 4, 16] {
        let mut expr = Expr::eq("leaf", 0);
        for i in 0..depth {
            expr = Expr::or(vec![Expr::eq(format!("c{i}"), i as i64), expr]);
        }
        let qb = sqlgen::delete("t").where_clause(expr).placeholder(Dollar);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_replace_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/replace_positional");

    for n in [10, 100, 1000] {
        let sql = format!("SELECT * FROM t WHERE id IN ({})", sqlgen::placeholders(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(replace_positional(sql, "$")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_configure_and_build,
    bench_in_list,
    bench_nested_groups,
    bench_replace_positional
);
criterion_main!(benches);
