//! Benchmarks for guarded search, OR-chain folding and SQL rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use searchable::query::{
    ChainSpec, Combinator, Condition, DatabaseType, Relation, SearchTerm, Searchable, fold,
    pattern::contains_pattern,
};

/// A registry with `count` pattern filters named `filter_0..`.
fn registry(count: usize) -> Searchable<Relation> {
    (0..count)
        .fold(Searchable::builder("Doc"), |builder, i| {
            builder.pattern_filter(format!("filter_{}", i), format!("column_{}", i))
        })
        .build()
}

fn filter_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("filter_{}", i)).collect()
}

fn bench_guard(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard");
    let docs = registry(1);
    let base = Relation::new("docs").where_eq("active", true);

    group.bench_function("blank_term_skip", |b| {
        b.iter(|| black_box(docs.simple_search(base.clone(), black_box("   "), "title")))
    });
    group.bench_function("pattern_search", |b| {
        b.iter(|| black_box(docs.simple_search(base.clone(), black_box("rust 100%"), "title")))
    });

    group.finish();
}

fn bench_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape");

    group.bench_function("plain", |b| {
        b.iter(|| black_box(contains_pattern(black_box("alice"), '\\')))
    });
    group.bench_function("wildcards", |b| {
        b.iter(|| black_box(contains_pattern(black_box("50%_off\\now"), '\\')))
    });

    group.finish();
}

fn bench_or_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("or_chain");
    let base = Relation::new("docs").where_eq("active", true);

    for count in [2usize, 5, 10, 25] {
        let docs = registry(count);
        let names = filter_names(count);

        group.bench_with_input(BenchmarkId::new("named_filters", count), &count, |b, _| {
            b.iter(|| {
                black_box(
                    docs.search_or_chain(base.clone(), "alice", names.iter().map(String::as_str))
                        .map(|q| q.constraints().len()),
                )
            })
        });

        let conditions: Vec<Condition> = (0..count)
            .map(|i| Condition::equals(format!("column_{}", i), i as i64))
            .collect();
        group.bench_with_input(BenchmarkId::new("fold", count), &count, |b, _| {
            b.iter(|| black_box(fold(conditions.clone(), Combinator::Or)))
        });
    }

    group.finish();
}

fn bench_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql");
    let docs = registry(10);
    let spec = ChainSpec::Filters(filter_names(10).into_iter().map(Into::into).collect());
    let query = docs
        .or_chain(
            Relation::new("docs").where_eq("active", true),
            &SearchTerm::new("alice"),
            spec,
        )
        .ok();

    for db in [DatabaseType::PostgreSQL, DatabaseType::MySQL, DatabaseType::SQLite] {
        group.bench_function(db.as_str(), |b| {
            b.iter(|| black_box(query.as_ref().map(|q| q.to_sql(db))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_guard, bench_escape, bench_or_chain, bench_sql);
criterion_main!(benches);
