//! Column projection, tables and scalar expressions.

use serde_json::{Map, Value};

use crate::compiler::{kind, Call, CompileContext};
use crate::error::JsqlResult;

fn has_operators(map: &Map<String, Value>) -> bool {
    map.keys().any(|k| k.starts_with('$'))
}

/// `$columns`: a name, a list, or a projection mapping.
///
/// In a projection mapping the key is the column when the value is `true`,
/// a string alias or `{ $as }`, and the alias when the value is any other
/// expression (`{ total: { $sum: 'amount' } }`). Such an expression may not
/// carry its own `$as`; a free-standing `{ $sum: 'amount', $as: 'total' }`
/// belongs in the list form.
pub fn columns(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    match call.value {
        Value::Object(map) if !has_operators(map) => projection(ctx, call, map),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(call.invalid("expected at least one column"));
            }
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                let part = match item {
                    Value::Object(map) if !has_operators(map) => projection(ctx, call, map)?,
                    other => ctx.identifier(call.operator, other)?,
                };
                parts.push(part);
            }
            Ok(parts.join(", "))
        }
        other => ctx.identifier(call.operator, other),
    }
}

fn projection(
    ctx: &mut CompileContext<'_>,
    call: Call<'_>,
    map: &Map<String, Value>,
) -> JsqlResult<String> {
    let mut parts = Vec::new();
    for (name, spec) in map {
        let part = match spec {
            Value::Bool(true) => ctx.quote_name(call.operator, name)?,
            Value::Bool(false) => continue,
            Value::String(alias) => format!(
                "{} AS {}",
                ctx.quote_name(call.operator, name)?,
                ctx.quoter().quote_segment(alias)
            ),
            Value::Object(inner) if inner.len() == 1 && inner.contains_key("$as") => {
                let column = ctx.quote_name(call.operator, name)?;
                ctx.alias(column, inner)?
            }
            Value::Object(inner) if inner.contains_key("$as") => {
                return Err(call.invalid(format!(
                    "column '{}' already names the alias of its expression, drop '$as' or list the expression under $columns as an array item",
                    name
                )));
            }
            Value::Object(_) => {
                let expression = ctx.identifier(call.operator, spec)?;
                format!("{} AS {}", expression, ctx.quoter().quote_segment(name))
            }
            other => {
                return Err(call.invalid(format!(
                    "column '{}' expects true, an alias or an expression, found {}",
                    name,
                    kind(other)
                )));
            }
        };
        parts.push(part);
    }
    if parts.is_empty() {
        return Err(call.invalid("expected at least one column"));
    }
    Ok(parts.join(", "))
}

/// `$as`: an alias, quoted as a single segment.
pub fn alias(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let name = call.as_str()?;
    if name.is_empty() {
        return Err(call.invalid("alias must not be empty"));
    }
    Ok(ctx.quoter().quote_segment(name))
}

/// `$val`: a literal value, bound.
pub fn val(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    super::bind_scalar(ctx, call)
}

fn aggregate(ctx: &mut CompileContext<'_>, call: Call<'_>, function: &str) -> JsqlResult<String> {
    let operand = ctx.identifier(call.operator, call.value)?;
    Ok(format!("{}({})", function, operand))
}

pub fn count(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    aggregate(ctx, call, "COUNT")
}

pub fn sum(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    aggregate(ctx, call, "SUM")
}

pub fn avg(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    aggregate(ctx, call, "AVG")
}

pub fn min(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    aggregate(ctx, call, "MIN")
}

pub fn max(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    aggregate(ctx, call, "MAX")
}

/// `$table`: a single table name.
pub fn table(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let name = call.as_str()?;
    ctx.quote_name(call.operator, name)
}

/// `$from`: one table or a list of tables.
pub fn from(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    if call.parent.get("$table").is_some_and(|v| !v.is_null()) {
        return Err(call.invalid("'$from' and '$table' are mutually exclusive"));
    }
    match call.value {
        Value::String(_) => ctx.identifier(call.operator, call.value),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            ctx.identifier(call.operator, call.value)
        }
        other => Err(call.invalid(format!(
            "expected a table name or a list of table names, found {}",
            kind(other)
        ))),
    }
}
