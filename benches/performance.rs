use criterion::{criterion_group, criterion_main, Criterion};
use tidyframe_core::prelude::*;
use tidyframe_verbs::{Gather, Join, JoinMode, Verb};

fn make_wide(rows: usize) -> Table {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Str, false),
        Field::new("y1830", DataType::Int, false),
        Field::new("y1840", DataType::Int, false),
        Field::new("y1850", DataType::Int, false),
    ])
    .unwrap();

    let mut data = Vec::with_capacity(rows);
    for i in 0..rows {
        data.push(vec![
            Value::Str(format!("church-{}", i)),
            Value::Int((i % 100) as i64),
            Value::Int((i % 90) as i64),
            Value::Int((i % 80) as i64),
        ]);
    }
    Table::from_rows(schema, data).unwrap()
}

fn make_lookup(keys: usize) -> Table {
    let schema = Schema::new(vec![
        Field::new("city", DataType::Str, false),
        Field::new("population", DataType::Int, false),
    ])
    .unwrap();
    let rows = (0..keys)
        .map(|i| vec![Value::Str(format!("city-{}", i)), Value::Int(i as i64 * 1000)])
        .collect();
    Table::from_rows(schema, rows).unwrap()
}

fn make_facts(rows: usize, keys: usize) -> Table {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Str, false),
        Field::new("city", DataType::Str, false),
    ])
    .unwrap();
    let data = (0..rows)
        .map(|i| {
            vec![
                Value::Str(format!("church-{}", i)),
                Value::Str(format!("city-{}", i % keys)),
            ]
        })
        .collect();
    Table::from_rows(schema, data).unwrap()
}

fn bench_gather(c: &mut Criterion) {
    let wide = make_wide(1024);
    let gather = Gather::new("year", "members", Selector::all_but(["name"]));
    c.bench_function("gather_1024x3", |b| {
        b.iter(|| {
            let _ = gather.apply(&wide).unwrap();
        })
    });
}

fn bench_hash_join(c: &mut Criterion) {
    let facts = make_facts(1024, 32);
    let join = Join::new(make_lookup(32), ["city"], JoinMode::Left);
    c.bench_function("left_join_1024x32", |b| {
        b.iter(|| {
            let _ = join.apply(&facts).unwrap();
        })
    });
}

criterion_group!(benches, bench_gather, bench_hash_join);
criterion_main!(benches);
