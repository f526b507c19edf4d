// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::SqlValue;
use proptest::prelude::*;
use yare::parameterized;

const BASE: &str = "select * from t%x where a = :a and b = :b and c = :a";

fn template() -> QueryTemplate {
    QueryTemplate::with_variants(
        BASE,
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
        ("b".to_string(), SqlValue::from("two")),
        ("c".to_string(), SqlValue::from(3.5)),
    ])
}

fn positional(values: &[SqlValue]) -> Params {
    Params::Positional(values.to_vec())
}

#[test]
fn first_runtime_variant_with_a_body_wins() {
    let t = template();
    assert_eq!(t.select(&["z", "y", "x"]), "select * from t where z = :a");
    assert_eq!(t.select(&["y", "z"]), "select * from t where y = :b");
    assert_eq!(t.select(&["oracle", "x"]), "select * from t where x = :a and b = :b and c = :a");
}

#[test]
fn unknown_or_empty_variants_use_the_base() {
    let t = template();
    assert_eq!(t.select(&["postgres"]), BASE);
    assert_eq!(t.select::<&str>(&[]), BASE);
}

#[test]
fn pyformat_keeps_the_mapping_and_escapes_percent() {
    let rendered = template()
        .render(ParamStyle::Pyformat, &["z", "y", "x"], &bindings())
        .unwrap();
    assert_eq!(rendered.sql, "select * from t where z = %(a)s");
    assert_eq!(rendered.params, Params::Named(bindings()));

    let rendered = template()
        .render::<&str>(ParamStyle::Pyformat, &[], &bindings())
        .unwrap();
    assert_eq!(
        rendered.sql,
        "select * from t%%x where a = %(a)s and b = %(b)s and c = %(a)s"
    );
}

#[parameterized(
    qmark = { ParamStyle::Qmark, "select * from t%x where a = ? and b = ? and c = ?" },
    numeric = { ParamStyle::Numeric, "select * from t%x where a = :1 and b = :2 and c = :1" },
    named = { ParamStyle::Named, BASE },
    format = { ParamStyle::Format, "select * from t%%x where a = %s and b = %s and c = %s" },
    dollar = { ParamStyle::Dollar, "select * from t%x where a = $1 and b = $2 and c = $1" },
)]
fn base_body_in_each_style(style: ParamStyle, sql: &str) {
    let rendered = template().render::<&str>(style, &[], &bindings()).unwrap();
    assert_eq!(rendered.sql, sql);
}

#[test]
fn positional_values_follow_the_style() {
    let one = SqlValue::from(1);
    let two = SqlValue::from("two");
    let t = template();
    let render = |style| t.render::<&str>(style, &[], &bindings()).unwrap().params;

    assert_eq!(render(ParamStyle::Qmark), positional(&[one.clone(), two.clone(), one.clone()]));
    assert_eq!(render(ParamStyle::Format), positional(&[one.clone(), two.clone(), one.clone()]));
    assert_eq!(render(ParamStyle::Numeric), positional(&[one.clone(), two.clone()]));
    assert_eq!(render(ParamStyle::Dollar), positional(&[one, two]));
    assert_eq!(render(ParamStyle::Named), Params::Named(bindings()));
}

#[test]
fn missing_binding_names_the_parameter() {
    let mut partial = bindings();
    partial.remove("b");
    match template().render::<&str>(ParamStyle::Qmark, &[], &partial) {
        Err(SqlError::MissingParam { name }) => assert_eq!(name, "b"),
        other => panic!("expected a missing parameter, got {other:?}"),
    }
    // the chosen body never mentions b
    assert!(template().render(ParamStyle::Qmark, &["z"], &partial).is_ok());
}

#[test]
fn later_variant_replaces_an_earlier_tag() {
    let t = QueryTemplate::new("select 1")
        .unwrap()
        .variant("x", "select 2")
        .unwrap()
        .variant("x", "select 3")
        .unwrap();
    assert_eq!(t.tags().collect::<Vec<_>>(), vec!["x"]);
    assert_eq!(t.select(&["x"]), "select 3");
}

#[test]
fn bad_variant_body_is_rejected() {
    assert!(matches!(
        QueryTemplate::with_variants("select :a", [("x", "select ?")]),
        Err(SqlError::UnknownPlaceholder { .. })
    ));
}

#[test]
fn parameters_in_first_occurrence_order() {
    assert_eq!(template().parameters::<&str>(&[]), vec!["a", "b"]);
    assert_eq!(template().parameters(&["y"]), vec!["b"]);
}

#[test]
fn styles_parse_by_name() {
    for style in ParamStyle::ALL {
        assert_eq!(style.name().parse::<ParamStyle>().unwrap(), style);
    }
    assert!(matches!(
        "pyformat2".parse::<ParamStyle>(),
        Err(SqlError::UnknownStyle { .. })
    ));
}

proptest! {
    #[test]
    fn every_style_binds_the_same_value_to_each_name(
        names in proptest::collection::vec("[a-d]", 1..8),
        style_index in 0usize..6,
    ) {
        let body = names.iter().map(|n| format!(":{n}")).collect::<Vec<_>>().join(" + ");
        let bindings: Bindings = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), SqlValue::from(i as i64)))
            .collect();
        let t = QueryTemplate::new(&body).unwrap();
        let style = ParamStyle::ALL[style_index];
        let first = t.render::<&str>(style, &[], &bindings).unwrap();
        prop_assert_eq!(&first, &t.render::<&str>(style, &[], &bindings).unwrap());

        // qmark binds each occurrence in order; recover the name of each slot
        let qmark = t.render::<&str>(ParamStyle::Qmark, &[], &bindings).unwrap();
        let expected: Vec<SqlValue> = names.iter().map(|n| bindings[n].clone()).collect();
        prop_assert_eq!(qmark.params, Params::Positional(expected.clone()));

        if let (ParamStyle::Numeric | ParamStyle::Dollar, Params::Positional(values)) =
            (style, &first.params)
        {
            let slots: Vec<usize> = first
                .sql
                .split(" + ")
                .map(|token| token[1..].parse::<usize>().unwrap())
                .collect();
            let resolved: Vec<SqlValue> = slots.iter().map(|s| values[s - 1].clone()).collect();
            prop_assert_eq!(resolved, expected);
        }
    }
}
