//! `$limit` and `$offset`.

use serde_json::Value;

use crate::compiler::{Call, CompileContext};
use crate::error::JsqlResult;

fn limit_with(ctx: &mut CompileContext<'_>, call: Call<'_>, all: &str) -> JsqlResult<String> {
    match call.value {
        Value::String(s) if s.eq_ignore_ascii_case("all") => Ok(all.to_string()),
        v if v.is_u64() => Ok(ctx.bind(v)),
        other => Err(call.invalid(format!(
            "expected a non-negative integer or 'ALL', found {}",
            other
        ))),
    }
}

/// `$limit`; `'ALL'` renders the standard `ALL` keyword.
pub fn limit(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    limit_with(ctx, call, "ALL")
}

/// `$limit` for dialects without `LIMIT ALL`: `'ALL'` renders the
/// largest unsigned 64-bit integer.
pub fn limit_unsigned_max(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    limit_with(ctx, call, &u64::MAX.to_string())
}

pub fn offset(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    if !call.value.is_u64() {
        return Err(call.invalid(format!(
            "expected a non-negative integer, found {}",
            call.value
        )));
    }
    Ok(ctx.bind(call.value))
}
