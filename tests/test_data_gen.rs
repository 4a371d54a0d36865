//! Shared fixture tables for the integration suites.

use tidyframe_core::prelude::*;

/// Two churches in wide membership layout: one column per census year.
#[allow(dead_code)]
pub fn churches_wide() -> Table {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Str, false),
        Field::new("members_1830", DataType::Int, false),
        Field::new("members_1840", DataType::Int, false),
        Field::new("members_1850", DataType::Int, false),
    ])
    .expect("schema");

    Table::from_rows(
        schema,
        vec![
            vec![
                Value::Str("First Presbyterian".into()),
                Value::Int(120),
                Value::Int(145),
                Value::Int(160),
            ],
            vec![
                Value::Str("St. Paul's".into()),
                Value::Int(80),
                Value::Int(95),
                Value::Int(130),
            ],
        ],
    )
    .expect("table")
}

/// Ten churches with denomination and city columns.
#[allow(dead_code)]
pub fn churches() -> Table {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Str, false),
        Field::new("denomination", DataType::Str, false),
        Field::new("city", DataType::Str, false),
        Field::new("members", DataType::Int, true),
    ])
    .expect("schema");

    let rows = [
        ("First Presbyterian", "Presbyterian", "New York", Some(120)),
        ("Second Presbyterian", "Presbyterian", "New York", Some(85)),
        ("St. Paul's", "Episcopalian", "Boston", Some(130)),
        ("Trinity", "Episcopalian", "New York", Some(210)),
        ("St. Mary's", "Catholic", "Baltimore", Some(340)),
        ("St. Peter's", "Catholic", "Baltimore", None),
        ("First Baptist", "Baptist", "Boston", Some(95)),
        ("Second Baptist", "Baptist", "Boston", Some(60)),
        ("Third Baptist", "Baptist", "New York", Some(75)),
        ("Cathedral", "Catholic", "Baltimore", Some(410)),
    ];

    Table::from_rows(
        schema,
        rows.iter()
            .map(|(name, denom, city, members)| {
                vec![
                    Value::Str((*name).into()),
                    Value::Str((*denom).into()),
                    Value::Str((*city).into()),
                    members.map(Value::Int).unwrap_or(Value::Missing),
                ]
            })
            .collect(),
    )
    .expect("table")
}

/// One row per city with its population (the codebook/lookup side).
#[allow(dead_code)]
pub fn cities() -> Table {
    let schema = Schema::new(vec![
        Field::new("city", DataType::Str, false),
        Field::new("population", DataType::Int, false),
    ])
    .expect("schema");

    Table::from_rows(
        schema,
        vec![
            vec![Value::Str("New York".into()), Value::Int(312_710)],
            vec![Value::Str("Boston".into()), Value::Int(93_383)],
            vec![Value::Str("Baltimore".into()), Value::Int(102_313)],
        ],
    )
    .expect("table")
}

#[allow(dead_code)]
pub fn str_column(table: &Table, name: &str) -> Vec<String> {
    table
        .column_by_name(name)
        .expect("column")
        .iter()
        .map(|v| match v {
            Value::Str(s) => s.clone(),
            other => panic!("expected str, found {:?}", other),
        })
        .collect()
}

#[allow(dead_code)]
pub fn int_column(table: &Table, name: &str) -> Vec<Option<i64>> {
    table
        .column_by_name(name)
        .expect("column")
        .iter()
        .map(|v| match v {
            Value::Int(i) => Some(*i),
            Value::Missing => None,
            other => panic!("expected int, found {:?}", other),
        })
        .collect()
}
