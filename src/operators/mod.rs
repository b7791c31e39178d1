//! Operator handlers.
//!
//! Every handler has the [`Handler`](crate::registry::Handler) signature and
//! is installed into a dialect by name. Handlers validate their operand and
//! only touch shared state through the [`CompileContext`] binder.

pub mod columns;
pub mod ddl;
pub mod dml;
pub mod filter;
pub mod grouping;
pub mod paging;
pub mod redirect;
pub mod sort;

use serde_json::Value;

use crate::compiler::{kind, Call, CompileContext};
use crate::error::JsqlResult;

/// Render the dialect template registered under the operator's own name.
pub fn syntax(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    ctx.render_syntax(call.operator, call.value, call.key)
}

/// A boolean switch; its SQL text lives in the surrounding template.
pub fn flag(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    call.as_bool()?;
    Ok(String::new())
}

/// Bind any scalar.
pub fn bind_scalar(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    match call.value {
        Value::Array(_) | Value::Object(_) => Err(call.invalid(format!(
            "expected a scalar, found {}",
            kind(call.value)
        ))),
        scalar => Ok(ctx.bind(scalar)),
    }
}

/// Bind a string.
pub fn bind_string(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    call.as_str()?;
    Ok(ctx.bind(call.value))
}

/// A string inlined as an escaped literal (DDL comments).
pub fn inline_string(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    call.as_str()?;
    ctx.literal(call.operator, call.value)
}

/// A bare SQL word such as a storage engine name, emitted verbatim.
pub fn keyword(_ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let word = call.as_str()?;
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(call.invalid(format!("'{}' is not a plain SQL word", word)));
    }
    Ok(word.to_string())
}
