//! INSERT rows, UPDATE assignments and RETURNING.

use serde_json::{Map, Value};

use crate::compiler::{kind, Call, CompileContext};
use crate::error::JsqlResult;

/// `$documents`: one row object or a list of them.
///
/// The first row fixes the column list. Later rows may omit columns,
/// which then take `DEFAULT`, but may not introduce new ones.
pub fn documents(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let rows: Vec<&Map<String, Value>> = match call.value {
        Value::Object(row) => vec![row],
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| {
                item.as_object().ok_or_else(|| {
                    call.invalid(format!("rows must be objects, found {}", kind(item)))
                })
            })
            .collect::<JsqlResult<_>>()?,
        other => {
            return Err(call.invalid(format!(
                "expected a row or a non-empty list of rows, found {}",
                kind(other)
            )));
        }
    };

    let columns: Vec<&String> = rows[0].keys().collect();
    if columns.is_empty() {
        return Err(call.invalid("the first row has no columns"));
    }
    let names = columns
        .iter()
        .map(|c| ctx.quote_name(call.operator, c))
        .collect::<JsqlResult<Vec<_>>>()?;

    let mut tuples = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if let Some(extra) = row.keys().find(|k| !rows[0].contains_key(*k)) {
            return Err(call.invalid(format!(
                "row {} has column '{}' which the first row does not",
                index + 1,
                extra
            )));
        }
        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = match row.get(column.as_str()) {
                Some(value) => cell(ctx, call, value)?,
                None => "DEFAULT".to_string(),
            };
            values.push(value);
        }
        tuples.push(format!("({})", values.join(", ")));
    }

    Ok(format!("({}) VALUES {}", names.join(", "), tuples.join(", ")))
}

fn cell(ctx: &mut CompileContext<'_>, call: Call<'_>, value: &Value) -> JsqlResult<String> {
    match value {
        Value::Array(_) => Err(call.invalid("a column value cannot be a list")),
        other => ctx.value(call.operator, other),
    }
}

/// `$set`: `{ column: value }` assignments.
pub fn set(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let map = call.as_object()?;
    if map.is_empty() {
        return Err(call.invalid("expected at least one assignment"));
    }
    let mut assignments = Vec::with_capacity(map.len());
    for (column, value) in map {
        if column.starts_with('$') {
            return Err(call.invalid(format!("'{}' is not a column", column)));
        }
        let name = ctx.quote_name(call.operator, column)?;
        assignments.push(format!("{} = {}", name, cell(ctx, call, value)?));
    }
    Ok(assignments.join(", "))
}

/// `$returning` (PostgreSQL): a column list, `*` allowed.
pub fn returning(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    ctx.identifier(call.operator, call.value)
}
