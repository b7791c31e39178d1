//! CREATE TABLE pieces: column definitions and table constraints.
//!
//! Literals in DDL are inlined through the dialect's quoter rather than
//! bound; drivers generally refuse placeholders there.

use serde_json::Value;

use crate::compiler::{kind, Call, CompileContext};
use crate::error::JsqlResult;

/// `$define`: each entry is either a column or a table constraint.
pub fn define(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let entries = call.as_object()?;
    for (name, entry) in entries.iter().filter(|(k, _)| !k.starts_with('$')) {
        let both = entry
            .as_object()
            .is_some_and(|e| e.contains_key("$column") && e.contains_key("$constraint"));
        if both {
            return Err(call.invalid(format!(
                "entry '{}' must be either a $column or a $constraint, not both",
                name
            )));
        }
    }
    ctx.render_syntax(call.operator, call.value, call.key)
}

/// `$column`: `{ name: { $column: 'INT' } }` or
/// `{ name: { $column: { $type, $notNull, $default, ... } } }`.
pub fn column(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let name = ctx.quote_name(call.operator, call.column()?)?;
    let definition = match call.value {
        Value::String(_) => data_type(ctx, call)?,
        Value::Object(_) => ctx.render_syntax(call.operator, call.value, call.key)?,
        other => {
            return Err(call.invalid(format!(
                "expected a type or a column definition, found {}",
                kind(other)
            )));
        }
    };
    Ok(format!("{} {}", name, definition))
}

/// `$type`: a SQL type name such as `VARCHAR(255)` or `DECIMAL(10, 2)`.
pub fn data_type(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let ty = call.as_str()?.trim();
    let valid = !ty.is_empty()
        && ty
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '(' | ')' | ',' | '_'));
    if !valid {
        return Err(call.invalid(format!("'{}' is not a column type", ty)));
    }
    Ok(ty.to_string())
}

/// `$default`: emits its own ` DEFAULT` prefix so that `false`, `0` and
/// `null` still render.
pub fn default_value(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    Ok(format!(" DEFAULT {}", ctx.literal(call.operator, call.value)?))
}

/// `$constraint`: a named table constraint.
pub fn constraint(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let name = call.column()?;
    let spec = call.as_object()?;
    let kinds = ["$primary", "$unique", "$foreignKey"]
        .iter()
        .filter(|k| spec.get(**k).and_then(Value::as_bool).unwrap_or(false))
        .count();
    if kinds != 1 {
        return Err(call.invalid(format!(
            "constraint '{}' needs exactly one of $primary, $unique or $foreignKey",
            name
        )));
    }
    let foreign = spec.get("$foreignKey").and_then(Value::as_bool).unwrap_or(false);
    let references = spec.get("$references").is_some();
    if foreign != references {
        return Err(call.invalid(format!(
            "constraint '{}': $references goes with $foreignKey and nothing else",
            name
        )));
    }
    let body = ctx.render_syntax(call.operator, call.value, call.key)?;
    Ok(format!("CONSTRAINT {} {}", ctx.quoter().quote_segment(name), body))
}

/// `$onDelete` / `$onUpdate`.
pub fn referential_action(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let action = call.as_str()?.to_ascii_uppercase();
    match action.as_str() {
        "CASCADE" | "SET NULL" | "SET DEFAULT" | "RESTRICT" | "NO ACTION" => Ok(action),
        _ => Err(call.invalid(format!(
            "'{}' is not a referential action, expected CASCADE, SET NULL, SET DEFAULT, RESTRICT or NO ACTION",
            action
        ))),
    }
}
