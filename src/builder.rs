//! Statement entry point.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::compiler::{kind, Call, CompileContext};
use crate::dialect::Dialect;
use crate::error::{JsqlError, JsqlResult};
use crate::registry::OperatorKind;

/// Compiled SQL and its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub sql: String,
    pub values: Vec<Value>,
}

/// Compiles query documents for one dialect.
///
/// The builder holds no per-compile state; clone it or share it behind a
/// reference across threads.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    dialect: Arc<Dialect>,
}

impl SqlBuilder {
    /// A builder for a built-in dialect.
    pub fn new(dialect: &str) -> JsqlResult<Self> {
        Ok(Self::with_dialect(Arc::new(Dialect::by_name(dialect)?)))
    }

    /// A builder for a custom dialect.
    pub fn with_dialect(dialect: Arc<Dialect>) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Compile `{ $statement: { ... } }`.
    pub fn build(&self, query: &Value) -> JsqlResult<QueryResult> {
        let root = query.as_object().ok_or_else(|| {
            JsqlError::validation(
                "query",
                format!("expected an object, found {}", kind(query)),
            )
        })?;
        let (statement, node) = match root.iter().next() {
            Some(entry) if root.len() == 1 => entry,
            _ => {
                return Err(JsqlError::validation(
                    "query",
                    format!("expected exactly one statement key, found {}", root.len()),
                ));
            }
        };

        let spec = self.dialect.resolve(statement)?;
        if spec.kind() != OperatorKind::Statement {
            return Err(JsqlError::UnknownOperator(statement.clone()));
        }

        let mut ctx = CompileContext::new(&self.dialect);
        let sql = ctx.invoke(Call {
            operator: statement,
            value: node,
            parent: root,
            key: statement,
        })?;
        debug!(
            dialect = self.dialect.name(),
            statement = %statement,
            params = ctx.bound(),
            "compiled"
        );
        Ok(QueryResult {
            sql,
            values: ctx.into_values(),
        })
    }

    /// Parse `json` and compile it.
    pub fn build_str(&self, json: &str) -> JsqlResult<QueryResult> {
        let query: Value = serde_json::from_str(json)?;
        self.build(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ansi() -> SqlBuilder {
        SqlBuilder::new("ansi").unwrap()
    }

    #[test]
    fn test_select_star() {
        let result = ansi().build(&json!({ "$select": { "$from": "people" } })).unwrap();
        assert_eq!(result.sql, r#"SELECT * FROM "people""#);
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_root_must_have_one_key() {
        let err = ansi()
            .build(&json!({ "$select": { "$from": "a" }, "$delete": { "$table": "a" } }))
            .unwrap_err();
        assert!(matches!(err, JsqlError::Validation { .. }));
        assert!(ansi().build(&json!({})).is_err());
        assert!(ansi().build(&json!([1])).is_err());
    }

    #[test]
    fn test_clause_at_root_is_not_a_statement() {
        let err = ansi().build(&json!({ "$where": { "a": 1 } })).unwrap_err();
        assert!(matches!(err, JsqlError::UnknownOperator(ref op) if op == "$where"));
    }

    #[test]
    fn test_build_str_reports_bad_json() {
        let err = ansi().build_str("{ not json").unwrap_err();
        assert!(matches!(err, JsqlError::Json(_)));
    }

    #[test]
    fn test_numbered_placeholders() {
        let pg = SqlBuilder::new("postgres").unwrap();
        let result = pg
            .build(&json!({
                "$select": {
                    "$from": "people",
                    "$where": { "age": { "$gte": 18 }, "name": { "$ilike": "a%" } },
                    "$limit": 10
                }
            }))
            .unwrap();
        assert_eq!(
            result.sql,
            r#"SELECT * FROM "people" WHERE "age" >= $1 AND "name" ILIKE $2 LIMIT $3"#
        );
        assert_eq!(result.values, vec![json!(18), json!("a%"), json!(10)]);
    }
}
