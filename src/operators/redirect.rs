//! Result redirection (MySQL): `$into` and `$outfile`.

use serde_json::Value;

use crate::compiler::{kind, Call, CompileContext};
use crate::error::JsqlResult;

fn variable<'v>(call: &Call<'_>, value: &'v Value) -> JsqlResult<&'v str> {
    let name = value
        .as_str()
        .ok_or_else(|| call.invalid(format!("expected a variable name, found {}", kind(value))))?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '$' | '.'));
    if !valid {
        return Err(call.invalid(format!("'{}' is not a variable name", name)));
    }
    Ok(name)
}

/// `$into`: session variables, emitted verbatim (never quoted or bound).
pub fn into(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    match call.value {
        Value::Array(items) if !items.is_empty() => {
            let names = items
                .iter()
                .map(|item| variable(&call, item))
                .collect::<JsqlResult<Vec<_>>>()?;
            Ok(names.join(", "))
        }
        Value::String(_) => Ok(variable(&call, call.value)?.to_string()),
        other => Err(call.invalid(format!(
            "expected a variable or a non-empty list of variables, found {}",
            kind(other)
        ))),
    }
}

/// `$outfile`: a bound file name, or `{ $file, $fields, $lines }` rendered in
/// that fixed order through the dialect's `$outfile` template.
pub fn outfile(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    if call.parent.get("$into").is_some_and(|v| !v.is_null()) {
        return Err(call.invalid("'$outfile' and '$into' are mutually exclusive"));
    }
    match call.value {
        Value::String(_) => Ok(ctx.bind(call.value)),
        Value::Object(_) => ctx.render_syntax(call.operator, call.value, call.key),
        other => Err(call.invalid(format!(
            "expected a file name or an object, found {}",
            kind(other)
        ))),
    }
}

/// `$fields` / `$lines`: at least one sub-option must be given.
pub fn export_options(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let sql = ctx.render_syntax(call.operator, call.value, call.key)?;
    if sql.is_empty() {
        return Err(call.invalid("expected at least one option"));
    }
    Ok(sql)
}
