//! Error kinds surfaced by malformed queries.

use jsql::prelude::*;
use serde_json::{json, Value};

fn fail(dialect: &str, query: Value) -> JsqlError {
    match jsql::build(dialect, &query) {
        Ok(result) => panic!("expected an error, got {:?}", result),
        Err(e) => e,
    }
}

#[test]
fn test_missing_required_field() {
    let err = fail("ansi", json!({ "$createTable": { "$define": { "id": { "$column": "INT" } } } }));
    match err {
        JsqlError::MissingRequiredField { field, operator } => {
            assert_eq!(field, "$table");
            assert_eq!(operator, "$createTable");
        }
        other => panic!("unexpected {:?}", other),
    }
    let err = fail("ansi", json!({ "$update": { "$table": "t" } }));
    assert!(matches!(err, JsqlError::MissingRequiredField { ref field, .. } if field == "$set"));
}

#[test]
fn test_unknown_operators() {
    let err = fail("ansi", json!({ "$upsert": { "$table": "t" } }));
    assert!(matches!(err, JsqlError::UnknownOperator(ref op) if op == "$upsert"));

    let err = fail("ansi", json!({ "$select": { "$from": "t", "$where": { "a": { "$regex": "x" } } } }));
    assert!(matches!(err, JsqlError::UnknownOperator(ref op) if op == "$regex"));

    let err = fail("ansi", json!({ "$select": { "$from": "t", "$bogus": 1 } }));
    assert!(matches!(err, JsqlError::UnknownOperator(ref op) if op == "$bogus"));
}

#[test]
fn test_operand_shape_is_validated() {
    let cases = [
        json!({ "$select": { "$from": "t", "$distinct": "yes" } }),
        json!({ "$select": { "$from": "t", "$limit": -1 } }),
        json!({ "$select": { "$from": "t", "$limit": "some" } }),
        json!({ "$select": { "$from": "t", "$sort": { "a": 2 } } }),
        json!({ "$select": { "$from": "t", "$where": { "a": { "$in": [] } } } }),
        json!({ "$select": { "$from": "t", "$where": { "a": { "$between": [1] } } } }),
        json!({ "$select": { "$from": "t", "$where": [] } }),
        json!({ "$select": { "$from": [{ "a": 1 }] } }),
        json!({ "$select": { "$from": "t", "$table": "u" } }),
        json!({ "$select": { "$from": "" } }),
        json!({ "$select": { "$from": "a..b" } }),
        json!({ "$insert": { "$table": "t", "$documents": [{ "a": 1 }, { "b": 2 }] } }),
        json!({ "$insert": { "$table": "t", "$documents": [] } }),
        json!({ "$update": { "$table": "t", "$set": {} } }),
        json!({ "$createTable": { "$table": "t", "$define": { "id": { "$column": "INT; DROP" } } } }),
        json!({ "$createTable": { "$table": "t", "$define": {} } }),
    ];
    for query in cases {
        let err = fail("ansi", query.clone());
        assert!(
            matches!(err, JsqlError::Validation { .. }),
            "{query} gave {err:?}"
        );
    }
}

#[test]
fn test_offset_requires_limit() {
    let err = fail("ansi", json!({ "$select": { "$from": "t", "$offset": 10 } }));
    match err {
        JsqlError::Validation { operator, message } => {
            assert_eq!(operator, "$select");
            assert_eq!(message, "'$offset' requires '$limit'");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_mysql_redirect_validation() {
    let cases = [
        json!({ "$select": { "$from": "t", "$into": ["@a"], "$outfile": "/tmp/x" } }),
        json!({ "$select": { "$from": "t", "$into": ["@a; DROP"] } }),
        json!({ "$select": { "$from": "t", "$into": [] } }),
        json!({ "$select": { "$from": "t", "$outfile": { "$file": "/tmp/x", "$fields": {} } } }),
        json!({ "$select": { "$from": "t", "$groupBy": { "$columns": "a", "$rollup": "yes" } } }),
    ];
    for query in cases {
        let err = fail("mysql", query.clone());
        assert!(
            matches!(err, JsqlError::Validation { .. }),
            "{query} gave {err:?}"
        );
    }
}

#[test]
fn test_constraint_needs_exactly_one_kind() {
    let err = fail(
        "ansi",
        json!({
            "$createTable": {
                "$table": "t",
                "$define": { "c": { "$constraint": { "$primary": true, "$unique": true, "$columns": "a" } } }
            }
        }),
    );
    assert!(matches!(err, JsqlError::Validation { ref operator, .. } if operator == "$constraint"));
}

#[test]
fn test_false_or_null_clause_is_rejected() {
    let cases = [
        json!({ "$delete": { "$table": "people", "$where": false } }),
        json!({ "$delete": { "$table": "people", "$where": null } }),
        json!({ "$update": { "$table": "people", "$set": { "a": 1 }, "$where": false } }),
        json!({ "$select": { "$from": false } }),
        json!({ "$select": { "$from": "t", "$limit": false } }),
        json!({ "$select": { "$from": "t", "$limit": null } }),
        json!({ "$select": { "$from": "t", "$limit": 5, "$offset": false } }),
        json!({ "$select": { "$from": "t", "$columns": null } }),
    ];
    for query in cases {
        let err = fail("ansi", query.clone());
        assert!(
            matches!(err, JsqlError::Validation { .. }),
            "{query} gave {err:?}"
        );
    }

    let err = fail("ansi", json!({ "$delete": { "$table": "people", "$where": false } }));
    assert!(matches!(err, JsqlError::Validation { ref operator, .. } if operator == "$where"));
}

#[test]
fn test_false_or_null_flag_is_off() {
    let result = jsql::build(
        "ansi",
        &json!({ "$select": { "$from": "t", "$distinct": null } }),
    )
    .unwrap();
    assert_eq!(result.sql, r#"SELECT * FROM "t""#);
}

#[test]
fn test_define_entry_is_column_or_constraint() {
    let err = fail(
        "ansi",
        json!({
            "$createTable": {
                "$table": "t",
                "$define": {
                    "id": {
                        "$column": "INT",
                        "$constraint": { "$primary": true, "$columns": "id" }
                    }
                }
            }
        }),
    );
    assert!(matches!(err, JsqlError::Validation { ref operator, .. } if operator == "$define"));
}

#[test]
fn test_references_only_on_foreign_keys() {
    let table = |constraint: Value| {
        json!({
            "$createTable": {
                "$table": "t",
                "$define": { "id": { "$column": "INT" }, "c": { "$constraint": constraint } }
            }
        })
    };
    let cases = [
        json!({ "$primary": true, "$columns": "id", "$references": { "$table": "u", "$columns": "id" } }),
        json!({ "$unique": true, "$columns": "id", "$references": { "$table": "u", "$columns": "id" } }),
        json!({ "$foreignKey": true, "$columns": "id" }),
    ];
    for constraint in cases {
        let err = fail("ansi", table(constraint.clone()));
        assert!(
            matches!(err, JsqlError::Validation { ref operator, .. } if operator == "$constraint"),
            "{constraint} gave {err:?}"
        );
    }
}

#[test]
fn test_projection_key_and_as_conflict() {
    let cases = [
        json!({ "amount": { "$sum": "amount", "$as": "total" } }),
        json!({ "x": { "$val": 1, "$as": "y" } }),
    ];
    for columns in cases {
        let err = fail("mysql", json!({ "$select": { "$from": "t", "$columns": columns.clone() } }));
        assert!(
            matches!(err, JsqlError::Validation { ref operator, .. } if operator == "$columns"),
            "{columns} gave {err:?}"
        );
    }
}

#[test]
fn test_error_messages() {
    let err = fail("ansi", json!({ "$select": { "$from": "t", "$distinct": "yes" } }));
    assert_eq!(
        err.to_string(),
        "Validation error in '$distinct': expected a boolean, found string"
    );
    let err = fail("ansi", json!({ "$delete": {} }));
    assert_eq!(err.to_string(), "Missing required field '$table' in '$delete'");
}
