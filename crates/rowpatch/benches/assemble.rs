use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rowpatch::{Dialect, Entity, UpdateQuery, col};

#[derive(Entity)]
#[orm(table = "orders")]
struct Order {
    #[orm(id)]
    id: i64,
    #[orm(column = "order_status")]
    status: String,
    total: f64,
    note: Option<String>,
}

fn order() -> Order {
    Order {
        id: 42,
        status: "shipped".into(),
        total: 99.5,
        note: None,
    }
}

/// An update with `n` ANDed predicates on the identity column.
fn build_query(order: &Order, n: usize, dialect: Dialect) -> UpdateQuery<'_, Order> {
    let mut q = rowpatch::update(Some(order));
    q.add_all_columns()
        .expect("bench setup")
        .use_entity_identity()
        .expect("bench setup")
        .dialect(dialect);
    for i in 0..n {
        let expr = col(Order::COL_ID).gte(i as i64);
        let added = if i == 0 { q.where_(expr) } else { q.and(expr) };
        added.expect("bench setup");
    }
    q
}

fn bench_build(c: &mut Criterion) {
    let order = order();
    let mut group = c.benchmark_group("assemble/build");

    for n in [1, 5, 20, 100] {
        for dialect in [Dialect::Postgres, Dialect::SqlServer] {
            let q = build_query(&order, n, dialect);
            let id = BenchmarkId::new(format!("{dialect:?}"), n);
            group.bench_with_input(id, &q, |b, q| {
                b.iter(|| black_box(q.build("shop")));
            });
        }
    }

    group.finish();
}

fn bench_declare_and_build(c: &mut Criterion) {
    let order = order();
    let mut group = c.benchmark_group("assemble/declare_and_build");

    for n in [1, 5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = build_query(&order, n, Dialect::Postgres);
                black_box(q.build("shop"))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_declare_and_build);
criterion_main!(benches);
