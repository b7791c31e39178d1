//! `$groupBy`.

use serde_json::Value;

use crate::compiler::{Call, CompileContext};
use crate::error::JsqlResult;

/// A column or list of columns, or `{ $columns, ... }` rendered through
/// the dialect's `$groupBy` template (MySQL adds `$rollup` there).
pub fn group_by(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    match call.value {
        Value::Object(_) => ctx.render_syntax(call.operator, call.value, call.key),
        other => ctx.identifier(call.operator, other),
    }
}
