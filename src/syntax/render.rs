//! Rendering a parsed template against a query node.

use serde_json::{Map, Value};

use super::{guard_of, has_repeat, SyntaxNode, SyntaxTemplate};
use crate::compiler::{Call, CompileContext};
use crate::error::{JsqlError, JsqlResult};
use crate::registry::OperatorKind;

impl SyntaxTemplate {
    /// Render this template for operator `name` against `node`.
    ///
    /// `subject` is the property key handed to every operator invoked from
    /// the template.
    pub fn render(
        &self,
        name: &str,
        node: &Value,
        subject: &str,
        ctx: &mut CompileContext<'_>,
    ) -> JsqlResult<String> {
        let map = node
            .as_object()
            .ok_or_else(|| JsqlError::validation(name, "expected an object"))?;
        render_scope(name, &self.nodes, map, subject, ctx)
    }
}

/// `false` and `null` switch a group off only when its guard is a flag.
/// Any other guard renders its group and the handler judges the value.
fn switched_off(ctx: &CompileContext<'_>, guard: &str, value: &Value) -> JsqlResult<bool> {
    if !matches!(value, Value::Null | Value::Bool(false)) {
        return Ok(false);
    }
    Ok(ctx.dialect().resolve(guard)?.kind() == OperatorKind::Flag)
}

fn render_scope(
    name: &str,
    nodes: &[SyntaxNode],
    map: &Map<String, Value>,
    subject: &str,
    ctx: &mut CompileContext<'_>,
) -> JsqlResult<String> {
    let mut consumed = Vec::new();
    let mut sql = String::new();
    render_nodes(name, nodes, map, subject, ctx, &mut consumed, &mut sql)?;
    check_consumed(name, nodes, map, &consumed, ctx)?;
    Ok(sql)
}

fn render_nodes<'t>(
    name: &str,
    nodes: &'t [SyntaxNode],
    map: &Map<String, Value>,
    subject: &str,
    ctx: &mut CompileContext<'_>,
    consumed: &mut Vec<&'t str>,
    sql: &mut String,
) -> JsqlResult<()> {
    for node in nodes {
        match node {
            SyntaxNode::Literal(text) => sql.push_str(text),
            SyntaxNode::Required(key) => {
                let value = map
                    .get(key.as_str())
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| JsqlError::missing(key, name))?;
                consumed.push(key);
                sql.push_str(&invoke(ctx, key, value, map, subject)?);
            }
            SyntaxNode::InlineRef { key, fallback } => match map.get(key.as_str()) {
                Some(value) => {
                    consumed.push(key);
                    sql.push_str(&invoke(ctx, key, value, map, subject)?);
                }
                None => {
                    if let Some(text) = fallback {
                        sql.push_str(text);
                    }
                }
            },
            SyntaxNode::Optional { guard, body } => match map.get(guard.as_str()) {
                Some(value) if switched_off(ctx, guard, value)? => consumed.push(guard),
                Some(_) => render_nodes(name, body, map, subject, ctx, consumed, sql)?,
                None => {}
            },
            SyntaxNode::RepeatList { item, separator } => {
                let mut parts = Vec::new();
                for (key, value) in map.iter().filter(|(k, _)| !k.starts_with('$')) {
                    let part = render_item(name, item, key, value, ctx)?;
                    parts.push(part);
                }
                if parts.is_empty() {
                    return Err(JsqlError::validation(name, "expected at least one entry"));
                }
                sql.push_str(&parts.join(separator));
            }
        }
    }
    Ok(())
}

fn render_item(
    name: &str,
    item: &[SyntaxNode],
    key: &str,
    value: &Value,
    ctx: &mut CompileContext<'_>,
) -> JsqlResult<String> {
    let entry = value.as_object().ok_or_else(|| {
        JsqlError::validation(name, format!("entry '{}' must be an object", key))
    })?;
    let part = render_scope(name, item, entry, key, ctx)?;
    if part.is_empty() {
        return Err(JsqlError::validation(
            name,
            format!("entry '{}' renders nothing", key),
        ));
    }
    Ok(part)
}

fn invoke(
    ctx: &mut CompileContext<'_>,
    key: &str,
    value: &Value,
    parent: &Map<String, Value>,
    subject: &str,
) -> JsqlResult<String> {
    ctx.invoke(Call {
        operator: key,
        value,
        parent,
        key: subject,
    })
}

/// Every key on the node must have been rendered by the template.
fn check_consumed(
    name: &str,
    nodes: &[SyntaxNode],
    map: &Map<String, Value>,
    consumed: &[&str],
    ctx: &CompileContext<'_>,
) -> JsqlResult<()> {
    let repeats = has_repeat(nodes);
    for key in map.keys() {
        if consumed.contains(&key.as_str()) {
            continue;
        }
        if !key.starts_with('$') {
            if repeats {
                continue;
            }
            return Err(JsqlError::validation(
                name,
                format!("unexpected key '{}'", key),
            ));
        }
        if let Some(guard) = guard_of(nodes, key) {
            return Err(JsqlError::validation(
                name,
                format!("'{}' requires '{}'", key, guard),
            ));
        }
        if ctx.dialect().knows(key) {
            return Err(JsqlError::validation(
                name,
                format!("'{}' is not valid here", key),
            ));
        }
        return Err(JsqlError::UnknownOperator(key.clone()));
    }
    Ok(())
}
