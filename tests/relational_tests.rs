//! Select, filter, arrange, and mutate behavior.

mod test_data_gen;

use tidyframe::error::Error;
use tidyframe::prelude::*;
use test_data_gen::{churches, int_column, str_column};

#[test]
fn select_projects_in_selector_order() {
    let t = churches();
    let out = Select::new(Selector::columns(["city", "name"]))
        .apply(&t)
        .expect("select");

    let names: Vec<&str> = out
        .schema()
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["city", "name"]);
    assert_eq!(out.n_rows(), t.n_rows());
}

#[test]
fn select_is_idempotent() {
    let t = churches();
    let selector = Selector::columns(["name", "members"]);
    let once = Select::new(selector.clone()).apply(&t).expect("select");
    let twice = Select::new(selector).apply(&once).expect("select");
    assert_eq!(once, twice);
}

#[test]
fn select_complement_keeps_schema_order() {
    let t = churches();
    let out = Select::new(Selector::all_but(["members"]))
        .apply(&t)
        .expect("select");
    let names: Vec<&str> = out
        .schema()
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["name", "denomination", "city"]);
}

#[test]
fn select_zero_columns_is_ambiguous() {
    let t = churches();
    let err = Select::new(Selector::all_but(["name", "denomination", "city", "members"]))
        .apply(&t)
        .unwrap_err();
    assert!(matches!(err, Error::AmbiguousSelection(_)), "{err}");
}

#[test]
fn filter_keeps_a_subset_in_order() {
    let t = churches();
    let out = Filter::new(Predicate::cmp("city", CmpOp::Eq, Value::Str("Boston".into())))
        .apply(&t)
        .expect("filter");

    assert!(out.n_rows() <= t.n_rows());
    assert_eq!(
        str_column(&out, "name"),
        vec!["St. Paul's", "First Baptist", "Second Baptist"]
    );
}

#[test]
fn filter_excludes_missing_without_raising() {
    let t = churches();
    // St. Peter's has missing members; neither the comparison nor its
    // negation may admit it.
    let over = Filter::new(Predicate::cmp("members", CmpOp::Gt, Value::Int(100)))
        .apply(&t)
        .expect("filter");
    let under = Filter::new(Predicate::Not(Box::new(Predicate::cmp(
        "members",
        CmpOp::Gt,
        Value::Int(100),
    ))))
    .apply(&t)
    .expect("filter");

    assert_eq!(over.n_rows() + under.n_rows(), t.n_rows() - 1);
    assert!(!str_column(&over, "name").contains(&"St. Peter's".to_string()));
    assert!(!str_column(&under, "name").contains(&"St. Peter's".to_string()));
}

#[test]
fn filter_accepts_a_row_function() {
    let t = churches();
    let out = Filter::with_fn(|row| {
        matches!(row.get("denomination"), Some(Value::Str(d)) if d == "Catholic")
    })
    .apply(&t)
    .expect("filter");
    assert_eq!(out.n_rows(), 3);
}

#[test]
fn filter_literal_type_mismatch_is_type_conflict() {
    let err = Filter::new(Predicate::cmp("members", CmpOp::Eq, Value::Str("many".into())))
        .apply(&churches())
        .unwrap_err();
    assert!(matches!(err, Error::TypeConflict(_)), "{err}");
}

#[test]
fn arrange_sorts_by_multiple_keys_stably() {
    let t = churches();
    let out = Arrange::new(vec![SortKey::asc("city"), SortKey::desc("members")])
        .apply(&t)
        .expect("arrange");

    let cities = str_column(&out, "city");
    let mut sorted = cities.clone();
    sorted.sort();
    assert_eq!(cities, sorted);

    // Within Boston, members descend.
    let members = int_column(&out, "members");
    let boston: Vec<Option<i64>> = cities
        .iter()
        .zip(&members)
        .filter(|(c, _)| c.as_str() == "Boston")
        .map(|(_, m)| *m)
        .collect();
    assert_eq!(boston, vec![Some(130), Some(95), Some(60)]);
}

#[test]
fn arrange_missing_sorts_last_ascending_first_descending() {
    let t = churches();

    let asc = Arrange::new(vec![SortKey::asc("members")])
        .apply(&t)
        .expect("arrange");
    assert_eq!(int_column(&asc, "members").last().copied(), Some(None));

    let desc = Arrange::new(vec![SortKey::desc("members")])
        .apply(&t)
        .expect("arrange");
    assert_eq!(int_column(&desc, "members").first().copied(), Some(None));
}

#[test]
fn arrange_preserves_original_order_on_ties() {
    let t = churches();
    let out = Arrange::new(vec![SortKey::asc("denomination")])
        .apply(&t)
        .expect("arrange");

    // Baptist churches keep their input order.
    let names = str_column(&out, "name");
    assert_eq!(
        &names[..3],
        &["First Baptist", "Second Baptist", "Third Baptist"]
    );
}

#[test]
fn mutate_appends_a_computed_column() {
    let t = churches();
    let out = Mutate::new("members_hundreds", DataType::Float, |row| {
        match row.get("members") {
            Some(Value::Int(m)) => Value::Float(*m as f64 / 100.0),
            _ => Value::Missing,
        }
    })
    .apply(&t)
    .expect("mutate");

    assert_eq!(out.n_rows(), t.n_rows());
    assert_eq!(out.n_cols(), t.n_cols() + 1);
    assert_eq!(
        out.value(0, out.n_cols() - 1),
        Some(&Value::Float(1.2))
    );
}

#[test]
fn mutate_replaces_in_place_when_name_exists() {
    let t = churches();
    let out = Mutate::new("members", DataType::Int, |row| match row.get("members") {
        Some(Value::Int(m)) => Value::Int(m * 2),
        _ => Value::Missing,
    })
    .apply(&t)
    .expect("mutate");

    assert_eq!(out.n_cols(), t.n_cols());
    assert_eq!(
        out.schema().index_of("members"),
        t.schema().index_of("members")
    );
    assert_eq!(int_column(&out, "members")[0], Some(240));
}

#[test]
fn mutate_type_disagreement_is_schema_violation() {
    let err = Mutate::new("flag", DataType::Bool, |_| Value::Int(1))
        .apply(&churches())
        .unwrap_err();
    assert!(matches!(err, Error::SchemaViolation(_)), "{err}");
}

#[test]
fn operations_do_not_mutate_their_input() {
    let t = churches();
    let snapshot = t.clone();
    let _ = Arrange::new(vec![SortKey::desc("name")]).apply(&t).expect("arrange");
    let _ = Filter::new(Predicate::cmp("city", CmpOp::Ne, Value::Str("Boston".into())))
        .apply(&t)
        .expect("filter");
    assert_eq!(t, snapshot);
}
