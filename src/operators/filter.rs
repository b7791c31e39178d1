//! Boolean filters: `$where`, `$having`, `$and`, `$or` and comparisons.
//!
//! A mapping is a group of terms; plain keys are columns and `$` keys are
//! operators. A group is parenthesised only when it has more than one term
//! and sits inside a combinator of the other kind, so same-kind nesting
//! flattens:
//!
//! ```text
//! { $and: [ { a: 1 }, { $or: [ { b: 2 }, { c: 3 } ] } ] }
//! => "a" = ? AND ("b" = ? OR "c" = ?)
//! ```

use serde_json::{Map, Value};

use crate::compiler::{kind, Call, Combinator, CompileContext};
use crate::error::{JsqlError, JsqlResult};

/// `$where` / `$having`: the root group, joined with AND.
pub fn filter(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    group(ctx, call.operator, call.value, Combinator::And)
}

pub fn and(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    group(ctx, call.operator, call.value, Combinator::And)
}

/// `$or`: list items are OR'd, and so are the entries of a mapping.
pub fn or(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    group(ctx, call.operator, call.value, Combinator::Or)
}

/// Compile `node` as a group of `kind`.
///
/// A single-member group is transparent: its member is compiled against
/// the enclosing combinator.
pub fn group(
    ctx: &mut CompileContext<'_>,
    operator: &str,
    node: &Value,
    kind: Combinator,
) -> JsqlResult<String> {
    let members = match node {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        other => {
            return Err(JsqlError::validation(
                operator,
                format!("expected an object or a list, found {}", self::kind(other)),
            ));
        }
    };
    if members == 0 {
        return Err(JsqlError::validation(operator, "empty condition group"));
    }
    if members == 1 {
        return Ok(terms(ctx, operator, node)?.join(kind.joiner()));
    }

    let parent = ctx.combinator();
    let terms = ctx.scoped(kind, |ctx| terms(ctx, operator, node))?;
    Ok(wrap(terms.join(kind.joiner()), parent, kind))
}

fn wrap(sql: String, parent: Option<Combinator>, kind: Combinator) -> String {
    match parent {
        Some(p) if p != kind => format!("({})", sql),
        _ => sql,
    }
}

fn terms(ctx: &mut CompileContext<'_>, operator: &str, node: &Value) -> JsqlResult<Vec<String>> {
    match node {
        Value::Object(map) => {
            let mut terms = Vec::with_capacity(map.len());
            for (key, value) in map {
                let term = if key.starts_with('$') {
                    ctx.invoke(Call {
                        operator: key,
                        value,
                        parent: map,
                        key,
                    })?
                } else {
                    condition(ctx, key, value)?
                };
                terms.push(term);
            }
            Ok(terms)
        }
        Value::Array(items) => items
            .iter()
            .map(|item| group(ctx, operator, item, Combinator::And))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// `{ column: spec }`
fn condition(ctx: &mut CompileContext<'_>, column: &str, spec: &Value) -> JsqlResult<String> {
    match spec {
        Value::Object(ops) => column_group(ctx, column, ops),
        Value::Array(items) => {
            let col = ctx.quote_name(column, column)?;
            Ok(format!("{} IN ({})", col, bind_list(ctx, column, items)?))
        }
        Value::Null => Ok(format!("{} IS NULL", ctx.quote_name(column, column)?)),
        scalar => {
            let col = ctx.quote_name(column, column)?;
            Ok(format!("{} = {}", col, ctx.bind(scalar)))
        }
    }
}

/// Several operators on one column form an implicit AND group.
fn column_group(
    ctx: &mut CompileContext<'_>,
    column: &str,
    ops: &Map<String, Value>,
) -> JsqlResult<String> {
    if ops.is_empty() {
        return Err(JsqlError::validation(column, "expected at least one operator"));
    }
    if ops.len() == 1 {
        return Ok(column_terms(ctx, column, ops)?.join(" AND "));
    }
    let parent = ctx.combinator();
    let terms = ctx.scoped(Combinator::And, |ctx| column_terms(ctx, column, ops))?;
    Ok(wrap(terms.join(" AND "), parent, Combinator::And))
}

fn column_terms(
    ctx: &mut CompileContext<'_>,
    column: &str,
    ops: &Map<String, Value>,
) -> JsqlResult<Vec<String>> {
    let mut terms = Vec::with_capacity(ops.len());
    for (op, value) in ops {
        if !op.starts_with('$') {
            return Err(JsqlError::validation(
                column,
                format!("unexpected key '{}', expected a comparison operator", op),
            ));
        }
        terms.push(ctx.invoke(Call {
            operator: op,
            value,
            parent: ops,
            key: column,
        })?);
    }
    Ok(terms)
}

fn bind_list(ctx: &mut CompileContext<'_>, operator: &str, items: &[Value]) -> JsqlResult<String> {
    if items.is_empty() {
        return Err(JsqlError::validation(operator, "expected a non-empty list"));
    }
    let mut placeholders = Vec::with_capacity(items.len());
    for item in items {
        if item.is_array() || item.is_object() {
            return Err(JsqlError::validation(
                operator,
                format!("list items must be scalars, found {}", kind(item)),
            ));
        }
        placeholders.push(ctx.bind(item));
    }
    Ok(placeholders.join(", "))
}

/// `column <op> ?` for a scalar operand.
fn compare(ctx: &mut CompileContext<'_>, call: Call<'_>, op: &str) -> JsqlResult<String> {
    let col = ctx.quote_name(call.operator, call.column()?)?;
    match call.value {
        Value::Null | Value::Array(_) | Value::Object(_) => Err(call.invalid(format!(
            "expected a scalar, found {}",
            kind(call.value)
        ))),
        scalar => Ok(format!("{} {} {}", col, op, ctx.bind(scalar))),
    }
}

fn pattern(ctx: &mut CompileContext<'_>, call: Call<'_>, op: &str) -> JsqlResult<String> {
    call.as_str()?;
    compare(ctx, call, op)
}

pub fn eq(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    if call.value.is_null() {
        return Ok(format!("{} IS NULL", ctx.quote_name(call.operator, call.column()?)?));
    }
    compare(ctx, call, "=")
}

pub fn ne(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    if call.value.is_null() {
        return Ok(format!("{} IS NOT NULL", ctx.quote_name(call.operator, call.column()?)?));
    }
    compare(ctx, call, "<>")
}

pub fn gt(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    compare(ctx, call, ">")
}

pub fn gte(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    compare(ctx, call, ">=")
}

pub fn lt(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    compare(ctx, call, "<")
}

pub fn lte(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    compare(ctx, call, "<=")
}

pub fn like(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    pattern(ctx, call, "LIKE")
}

pub fn not_like(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    pattern(ctx, call, "NOT LIKE")
}

/// PostgreSQL only.
pub fn ilike(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    pattern(ctx, call, "ILIKE")
}

fn membership(ctx: &mut CompileContext<'_>, call: Call<'_>, op: &str) -> JsqlResult<String> {
    let col = ctx.quote_name(call.operator, call.column()?)?;
    let items = call
        .value
        .as_array()
        .ok_or_else(|| call.invalid(format!("expected a list, found {}", kind(call.value))))?;
    Ok(format!("{} {} ({})", col, op, bind_list(ctx, call.operator, items)?))
}

pub fn in_list(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    membership(ctx, call, "IN")
}

pub fn not_in_list(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    membership(ctx, call, "NOT IN")
}

fn is_bound(value: &Value) -> bool {
    !(value.is_null() || value.is_array() || value.is_object())
}

/// `$between: [low, high]`
pub fn between(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let col = ctx.quote_name(call.operator, call.column()?)?;
    match call.value.as_array().map(Vec::as_slice) {
        Some([low, high]) if is_bound(low) && is_bound(high) => {
            let low = ctx.bind(low);
            let high = ctx.bind(high);
            Ok(format!("{} BETWEEN {} AND {}", col, low, high))
        }
        _ => Err(call.invalid("expected a list of exactly two bounds")),
    }
}

/// `$isNull: true|false`
pub fn is_null(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let col = ctx.quote_name(call.operator, call.column()?)?;
    if call.as_bool()? {
        Ok(format!("{} IS NULL", col))
    } else {
        Ok(format!("{} IS NOT NULL", col))
    }
}
