//! End-to-end pipelines: composition, fail-fast error surfacing, reports,
//! config, and table serde.

mod test_data_gen;

use tidyframe::error::Error;
use tidyframe::prelude::*;
use tidyframe_core::config::{CoercionPolicy, EngineConfig};
use test_data_gen::{churches, churches_wide, cities, int_column, str_column};

#[test]
fn chained_verbs_pass_tables_along() {
    // gather → filter → join → summarize: the tutorial walkthrough shape.
    let pipeline = Pipeline::new()
        .then(Join::new(cities(), ["city"], JoinMode::Left))
        .then(Filter::new(Predicate::cmp(
            "denomination",
            CmpOp::Ne,
            Value::Str("Catholic".into()),
        )))
        .then(GroupSummarize::new(
            ["city"],
            vec![
                NamedAggregate::new("churches", Aggregate::Count),
                NamedAggregate::new("members", Aggregate::Sum("members".into())).skip_missing(),
            ],
        ))
        .then(Arrange::new(vec![SortKey::desc("churches")]));

    let out = pipeline.run(&churches()).expect("pipeline");
    assert_eq!(out.n_rows(), 2); // Baltimore is all-Catholic and filtered out
    assert_eq!(str_column(&out, "city"), vec!["New York", "Boston"]);
    assert_eq!(int_column(&out, "churches"), vec![Some(4), Some(3)]);
}

#[test]
fn wide_to_long_to_wide_through_a_pipeline() {
    let wide = churches_wide();
    let out = Pipeline::new()
        .then(Gather::new(
            "year",
            "members",
            Selector::all_but(["name"]),
        ))
        .then(Spread::new("year", "members"))
        .run(&wide)
        .expect("pipeline");
    assert_eq!(out, wide);
}

#[test]
fn first_failure_aborts_the_chain() {
    let pipeline = Pipeline::new()
        .then(Select::new(Selector::columns(["name", "members"])))
        // "city" no longer exists: this stage must fail...
        .then(Filter::new(Predicate::cmp(
            "city",
            CmpOp::Eq,
            Value::Str("Boston".into()),
        )))
        // ...and this one must never run.
        .then(Select::new(Selector::columns(["nonexistent"])));

    let err = pipeline.run(&churches()).unwrap_err();
    let PipelineError::Stage { index, name, source } = err;
    assert_eq!(index, 1);
    assert_eq!(name, "filter");
    assert!(matches!(source, Error::SchemaViolation(_)), "{source}");
}

#[test]
fn validate_checks_the_chain_without_rows() {
    let good = Pipeline::new()
        .then(Select::new(Selector::all_but(["members"])))
        .then(Arrange::new(vec![SortKey::asc("city")]));
    let schema = good.validate(churches().schema()).expect("validate");
    assert_eq!(schema.len(), 3);

    let bad = Pipeline::new()
        .then(Select::new(Selector::columns(["members"])))
        .then(Arrange::new(vec![SortKey::asc("city")]));
    assert!(bad.validate(churches().schema()).is_err());
}

#[test]
fn run_report_accounts_for_every_stage() {
    let pipeline = Pipeline::new()
        .then(Filter::new(Predicate::cmp(
            "city",
            CmpOp::Eq,
            Value::Str("Boston".into()),
        )))
        .then(Select::new(Selector::columns(["name"])));

    assert_eq!(pipeline.len(), 2);
    assert!(!pipeline.is_empty());

    let (out, report) = pipeline.run_with_report(&churches()).expect("pipeline");
    assert_eq!(report.stages.len(), 2);
    assert_eq!(report.stages[0].name, "filter");
    assert_eq!(report.stages[0].rows_in, 10);
    assert_eq!(report.stages[0].rows_out, 3);
    assert_eq!(report.stages[1].rows_out, out.n_rows());
    assert!(report.started_ms <= report.finished_ms);

    // Reports are serializable for audit trails.
    let json = serde_json::to_string(&report).expect("serialize");
    assert!(json.contains("\"filter\""));
}

#[test]
fn same_table_feeds_independent_pipelines() {
    let t = churches();
    let a = Pipeline::new()
        .then(Select::new(Selector::columns(["name"])))
        .run(&t)
        .expect("pipeline");
    let b = Pipeline::new()
        .then(Select::new(Selector::columns(["city"])))
        .run(&t)
        .expect("pipeline");
    assert_eq!(a.n_rows(), t.n_rows());
    assert_eq!(b.n_rows(), t.n_rows());
}

#[test]
fn engine_config_reads_policies_from_env() {
    std::env::set_var("TIDYFRAME_GATHER_COERCION", "string");
    std::env::set_var("TIDYFRAME_AGGREGATE_MISSING", "skip");
    let cfg = EngineConfig::from_env();
    std::env::remove_var("TIDYFRAME_GATHER_COERCION");
    std::env::remove_var("TIDYFRAME_AGGREGATE_MISSING");

    assert_eq!(cfg.gather_coercion, CoercionPolicy::CoerceToString);

    // The configured policies feed straight into verbs.
    let long = Gather::new("k", "v", Selector::columns(["name", "members_1830"]))
        .with_policy(cfg.gather_coercion)
        .apply(&churches_wide())
        .expect("gather");
    assert_eq!(
        long.schema().fields.last().map(|f| f.data_type),
        Some(DataType::Str)
    );

    // Under the skip policy St. Peter's missing membership no longer
    // aborts a whole-table sum.
    let summary = GroupSummarize::new(
        Vec::<String>::new(),
        vec![
            NamedAggregate::new("total", Aggregate::Sum("members".into()))
                .with_policy(cfg.aggregate_missing),
        ],
    )
    .apply(&churches())
    .expect("summarize");
    assert_eq!(int_column(&summary, "total"), vec![Some(1525)]);
}

#[test]
fn tables_round_trip_through_serde() {
    let t = churches();
    let json = t.to_json().expect("serialize");
    let back = Table::from_json(&json).expect("deserialize");
    assert_eq!(t, back);
}

#[test]
fn from_json_revalidates_cells() {
    // A string cell inside an int column deserializes as a Value but must
    // be rejected when the table is rebuilt.
    let json = r#"{
        "schema": {"fields": [{"name": "n", "data_type": "Int", "nullable": false}]},
        "columns": [[{"Str": "oops"}]]
    }"#;
    let err = Table::from_json(json).unwrap_err();
    assert!(matches!(err, Error::SchemaViolation(_)), "{err}");
}
