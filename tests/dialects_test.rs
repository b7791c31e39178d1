//! Dialect composition, overrides and fallback.

use std::sync::Arc;

use jsql::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_quoting_per_dialect() {
    let query = json!({ "$select": { "$from": "people", "$where": { "id": 1, "name": "x" } } });
    let cases = [
        ("ansi", r#"SELECT * FROM "people" WHERE "id" = ? AND "name" = ?"#),
        ("mysql", "SELECT * FROM `people` WHERE `id` = ? AND `name` = ?"),
        ("postgresql", r#"SELECT * FROM "people" WHERE "id" = $1 AND "name" = $2"#),
    ];
    for (dialect, expected) in cases {
        let result = jsql::build(dialect, &query).unwrap();
        assert_eq!(result.sql, expected, "{dialect}");
        assert_eq!(result.values, vec![json!(1), json!("x")]);
    }
}

#[test]
fn test_limit_all_per_dialect() {
    let query = json!({ "$select": { "$from": "t", "$limit": "ALL", "$offset": 5 } });
    let ansi = jsql::build("ansi", &query).unwrap();
    assert_eq!(ansi.sql, r#"SELECT * FROM "t" LIMIT ALL OFFSET ?"#);
    assert_eq!(ansi.values, vec![json!(5)]);

    let mysql = jsql::build("mysql", &query).unwrap();
    assert_eq!(mysql.sql, "SELECT * FROM `t` LIMIT 18446744073709551615 OFFSET ?");
    assert_eq!(mysql.values, vec![json!(5)]);
}

#[test]
fn test_mysql_only_operators_are_unknown_elsewhere() {
    let cases = [
        json!({ "$select": { "$from": "t", "$calcFoundRows": true } }),
        json!({ "$select": { "$from": "t", "$into": ["@a"] } }),
        json!({ "$select": { "$from": "t", "$outfile": "/tmp/x" } }),
        json!({ "$select": { "$from": "t", "$groupBy": { "$columns": "a", "$rollup": true } } }),
    ];
    for query in cases {
        for dialect in ["ansi", "postgresql"] {
            let err = jsql::build(dialect, &query).unwrap_err();
            assert!(
                matches!(err, JsqlError::UnknownOperator(_)),
                "{dialect}: {query} gave {err:?}"
            );
        }
        assert!(jsql::build("mysql", &query).is_ok(), "{query}");
    }
}

#[test]
fn test_ilike_is_postgres_only() {
    let query = json!({ "$select": { "$from": "t", "$where": { "a": { "$ilike": "x%" } } } });
    let pg = jsql::build("postgres", &query).unwrap();
    assert_eq!(pg.sql, r#"SELECT * FROM "t" WHERE "a" ILIKE $1"#);
    let err = jsql::build("mysql", &query).unwrap_err();
    assert!(matches!(err, JsqlError::UnknownOperator(ref op) if op == "$ilike"));
}

fn shout(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    Ok(call.as_str()?.to_uppercase())
}

#[test]
fn test_custom_dialect_overrides_wholesale() {
    let ansi = Dialect::ansi().unwrap();
    let custom = DialectBuilder::derive("custom", &ansi)
        .quoter(Quoter::new('[', ']'))
        .register("$table", OperatorKind::Clause, shout)
        .update_syntax("$delete", "DELETE <$table>{ WHERE [$where]}")
        .unwrap()
        .build()
        .unwrap();
    let builder = SqlBuilder::with_dialect(Arc::new(custom));

    let result = builder
        .build(&json!({ "$delete": { "$table": "logs", "$where": { "id": 1 } } }))
        .unwrap();
    assert_eq!(result.sql, "DELETE LOGS WHERE [id] = ?");

    // the parent keeps its own handler and template
    let result = SqlBuilder::with_dialect(Arc::new(ansi))
        .build(&json!({ "$delete": { "$table": "logs" } }))
        .unwrap();
    assert_eq!(result.sql, r#"DELETE FROM "logs""#);
}

#[test]
fn test_registry_reports_inherited_operators() {
    let mysql = Dialect::mysql().unwrap();
    let names = mysql.registry().names();
    assert!(names.contains(&"$rollup".to_string()));
    assert!(names.contains(&"$select".to_string()));
    assert!(mysql.registry().owns("$limit"));
    assert!(!mysql.registry().owns("$where"));
    assert_eq!(
        mysql.resolve("$select").unwrap().kind(),
        OperatorKind::Statement
    );
}

#[test]
fn test_concurrent_compiles_share_one_dialect() {
    let builder = SqlBuilder::new("postgresql").unwrap();
    std::thread::scope(|scope| {
        for i in 0..8u64 {
            let builder = &builder;
            scope.spawn(move || {
                let query = json!({
                    "$select": { "$from": "t", "$where": { "a": i, "b": { "$lt": i * 2 } }, "$limit": 3 }
                });
                let result = builder.build(&query).unwrap();
                assert_eq!(
                    result.sql,
                    r#"SELECT * FROM "t" WHERE "a" = $1 AND "b" < $2 LIMIT $3"#
                );
                assert_eq!(result.values, vec![json!(i), json!(i * 2), json!(3)]);
            });
        }
    });
}
