//! Placeholder/value alignment over a corpus of queries.

use jsql::binder::PlaceholderStyle;
use jsql::SqlBuilder;
use serde_json::{json, Value};

fn corpus() -> Vec<Value> {
    vec![
        json!({ "$select": { "$from": "people" } }),
        json!({ "$select": { "$from": "people", "$limit": 50, "$offset": 10 } }),
        json!({ "$select": { "$from": "people", "$limit": "ALL" } }),
        json!({
            "$select": {
                "$from": "t",
                "$columns": { "id": true, "one": { "$val": 1 }, "total": { "$sum": "amount" } },
                "$where": {
                    "$and": [ { "a": 1 }, { "$or": [ { "b": "x" }, { "c": { "$between": [1, 9] } } ] } ],
                    "d": { "$in": [1, 2, 3] },
                    "e": null
                },
                "$groupBy": ["id"],
                "$having": { "n": { "$gte": 2 } },
                "$sort": { "id": -1 },
                "$limit": 5,
                "$offset": 0
            }
        }),
        json!({
            "$insert": { "$table": "t", "$documents": [ { "a": 1, "b": "x" }, { "a": 2 } ] }
        }),
        json!({
            "$update": { "$table": "t", "$set": { "a": 1, "b": null }, "$where": { "id": { "$ne": 4 } } }
        }),
        json!({ "$delete": { "$table": "t", "$where": { "$or": { "a": 1, "b": 2 } } } }),
        json!({
            "$createTable": {
                "$table": "t",
                "$define": { "id": { "$column": { "$type": "INT", "$default": 0 } } }
            }
        }),
    ]
}

/// Count `?` or `$n` tokens outside quoted identifiers and literals.
fn placeholders(sql: &str, style: PlaceholderStyle) -> Vec<usize> {
    let mut found = Vec::new();
    let mut quote: Option<char> = None;
    let chars: Vec<char> = sql.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '`' | '\'') => quote = Some(c),
            None => match style {
                PlaceholderStyle::Question if c == '?' => found.push(found.len() + 1),
                PlaceholderStyle::Numbered if c == '$' => {
                    let digits: String = chars[i + 1..]
                        .iter()
                        .take_while(|d| d.is_ascii_digit())
                        .collect();
                    if let Ok(n) = digits.parse() {
                        found.push(n);
                        i += digits.len();
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    found
}

#[test]
fn test_placeholder_count_matches_values() {
    for dialect in ["ansi", "mysql", "postgresql"] {
        let builder = SqlBuilder::new(dialect).unwrap();
        let style = builder.dialect().placeholders();
        for query in corpus() {
            let result = builder.build(&query).unwrap();
            let found = placeholders(&result.sql, style);
            assert_eq!(
                found.len(),
                result.values.len(),
                "{dialect}: {}",
                result.sql
            );
            // numbered placeholders appear in ascending order
            let expected: Vec<usize> = (1..=found.len()).collect();
            assert_eq!(found, expected, "{dialect}: {}", result.sql);
        }
    }
}

#[test]
fn test_values_follow_emission_order() {
    let query = json!({
        "$select": {
            "$from": "t",
            "$limit": 3,
            "$where": { "z": "first", "a": "second" },
            "$columns": { "x": { "$val": "zeroth" } }
        }
    });
    let result = SqlBuilder::new("postgres").unwrap().build(&query).unwrap();
    assert_eq!(
        result.sql,
        r#"SELECT $1 AS "x" FROM "t" WHERE "z" = $2 AND "a" = $3 LIMIT $4"#
    );
    assert_eq!(
        result.values,
        vec![json!("zeroth"), json!("first"), json!("second"), json!(3)]
    );
}
