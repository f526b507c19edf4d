// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Bindings, DriverRegistry, QueryTemplate};
use yare::parameterized;

fn exec(conn: &mut impl Connection, sql: &str) -> ResultSet {
    conn.execute_sql(sql, &Params::Positional(Vec::new())).unwrap()
}

fn flows() -> SqliteConnection {
    let mut conn = SqliteConnection::in_memory().unwrap();
    exec(&mut conn, "create table flows (sip text, bytes integer, ratio real)");
    exec(
        &mut conn,
        "insert into flows values ('10.0.0.1', 100, 0.5), ('10.0.0.2', 250, 1.5), ('10.0.0.1', 50, null)",
    );
    conn
}

fn bindings(pairs: &[(&str, SqlValue)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[parameterized(
    absolute = { "sqlite:///var/db/flows.db", Some("/var/db/flows.db") },
    relative = { "sqlite://data/flows.db", Some("data/flows.db") },
    empty = { "sqlite://", None },
    memory = { "sqlite:///:memory:", None },
)]
fn database_paths(uri: &str, expected: Option<&str>) {
    let uri = ConnectionUri::parse(uri).unwrap();
    assert_eq!(database_path(&uri), expected.map(PathBuf::from));
}

#[test]
fn statements_report_changed_rows() {
    let mut conn = flows();
    let result = exec(&mut conn, "update flows set bytes = bytes + 1 where sip = '10.0.0.1'");
    assert_eq!(result.rows_affected(), 2);
}

#[test]
fn queries_return_typed_rows() {
    let mut conn = flows();
    let result = exec(&mut conn, "select sip, bytes, ratio from flows order by bytes");
    assert_eq!(result.columns(), ["sip", "bytes", "ratio"].map(String::from));
    let rows = result.into_rows().unwrap();
    assert_eq!(
        rows[0],
        vec![SqlValue::from("10.0.0.1"), SqlValue::Integer(50), SqlValue::Null]
    );
    assert_eq!(rows.len(), 3);
}

#[test]
fn templates_render_as_qmark_with_the_sqlite_variant() {
    let mut conn = flows();
    let template = QueryTemplate::with_variants(
        "select sum(bytes) from flows where sip = :sip and bytes >= :min and nope()",
        [("sqlite", "select sum(bytes) from flows where sip = :sip and bytes >= :min")],
    )
    .unwrap();
    let args = bindings(&[("sip", "10.0.0.1".into()), ("min", SqlValue::Integer(60))]);
    let rows = conn.execute(&template, &args).unwrap().into_rows().unwrap();
    assert_eq!(rows, vec![vec![SqlValue::Integer(100)]]);
}

#[test]
fn named_params_bind_by_name() {
    let mut conn = flows();
    let params = Params::Named(bindings(&[
        ("sip", "10.0.0.2".into()),
        ("unused", SqlValue::Null),
    ]));
    let rows = conn
        .execute_sql("select bytes from flows where sip = :sip", &params)
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(rows, vec![vec![SqlValue::Integer(250)]]);

    let missing = Params::Named(Bindings::new());
    assert!(matches!(
        conn.execute_sql("select bytes from flows where sip = :sip", &missing),
        Err(SqlError::MissingParam { name }) if name == "sip"
    ));
}

#[test]
fn blobs_round_trip() {
    let mut conn = SqliteConnection::in_memory().unwrap();
    exec(&mut conn, "create table b (v blob)");
    let blob = SqlValue::Blob(vec![0, 255, 7]);
    conn.execute_sql("insert into b values (?)", &Params::Positional(vec![blob.clone()]))
        .unwrap();
    let rows = exec(&mut conn, "select v from b").into_rows().unwrap();
    assert_eq!(rows, vec![vec![blob]]);
}

#[test]
fn closed_connection_refuses_work() {
    let mut conn = flows();
    conn.close().unwrap();
    conn.close().unwrap();
    assert!(matches!(
        conn.execute_sql("select 1", &Params::Positional(Vec::new())),
        Err(SqlError::Closed)
    ));
}

#[test]
fn bad_sql_is_a_sqlite_error() {
    let mut conn = flows();
    assert!(matches!(
        conn.execute_sql("selec nothing", &Params::Positional(Vec::new())),
        Err(SqlError::Sqlite(_))
    ));
}

#[test]
fn file_database_through_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flows.db");
    let uri = format!("sqlite3://{}?timeout=500", path.display());

    let mut conn = DriverRegistry::with_defaults().connect(&uri, None, None).unwrap();
    assert_eq!(conn.driver(), "sqlite");
    exec(&mut conn, "create table t (a integer)");
    exec(&mut conn, "insert into t values (1)");
    conn.close().unwrap();

    let mut again = DriverRegistry::with_defaults().connect(&uri, None, None).unwrap();
    let rows = exec(&mut again, "select a from t").into_rows().unwrap();
    assert_eq!(rows, vec![vec![SqlValue::Integer(1)]]);
}

#[test]
fn bad_timeout_is_an_invalid_uri() {
    let uri = ConnectionUri::parse("sqlite://?timeout=soon").unwrap();
    assert!(matches!(
        SqliteConnection::open(&uri),
        Err(SqlError::InvalidUri { .. })
    ));
}
