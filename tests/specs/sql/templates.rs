//! Query template specs

use crate::prelude::*;
use nsk_sql::{Bindings, DriverRegistry, ParamStyle, Params, QueryTemplate, Row, SqlValue};
use similar_asserts::assert_eq;

fn template() -> QueryTemplate {
    QueryTemplate::with_variants(
        "select * from t%x where a = :a and b = :b and c = :a",
        [
            ("x", "select * from t where x = :a and b = :b and c = :a"),
            ("y", "select * from t where y = :b"),
            ("z", "select * from t where z = :a"),
        ],
    )
    .unwrap()
}

fn bindings() -> Bindings {
    Bindings::from([
        ("a".to_string(), SqlValue::from(1)),
        ("b".to_string(), SqlValue::from(2)),
        ("c".to_string(), SqlValue::from(3)),
    ])
}

#[test]
fn first_listed_runtime_variant_selects_the_body() {
    let rendered = template()
        .render(ParamStyle::Named, &["z", "y", "x"], &bindings())
        .unwrap();
    assert_eq!(rendered.sql, "select * from t where z = :a");
}

#[test]
fn pyformat_escapes_percent_and_keeps_names() {
    let rendered = template()
        .render::<&str>(ParamStyle::Pyformat, &[], &bindings())
        .unwrap();
    assert_eq!(
        rendered.sql,
        "select * from t%%x where a = %(a)s and b = %(b)s and c = %(a)s"
    );
    assert_eq!(rendered.params, Params::Named(bindings()));
}

#[test]
fn every_style_binds_the_same_value_to_each_name() {
    let t = template();
    for style in ParamStyle::ALL {
        let first = t.render(style, &["x"], &bindings()).unwrap();
        let again = t.render(style, &["x"], &bindings()).unwrap();
        assert_eq!(first, again, "{style}");
    }
}

#[test]
fn rendered_queries_run_on_sqlite() {
    let mut conn = DriverRegistry::with_defaults()
        .connect("sqlite://", None, None)
        .unwrap();
    let none = Params::Positional(Vec::new());
    conn.execute_sql("create table t (x integer, z integer, b integer, c integer)", &none)
        .unwrap();
    conn.execute_sql("insert into t values (1, 1, 2, 1), (2, 2, 2, 2)", &none)
        .unwrap();

    let template = template()
        .variant("sqlite", "select x, z, b, c from t where z = :a and b = :b")
        .unwrap();
    let rows: Vec<Row> = conn.execute(&template, &bindings()).unwrap().into_rows().unwrap();
    let one = SqlValue::Integer(1);
    assert_eq!(rows, vec![vec![one.clone(), one.clone(), SqlValue::Integer(2), one]]);
}
