//! `$sort`: ORDER BY items.

use serde_json::{Map, Value};

use crate::compiler::{kind, Call, CompileContext};
use crate::error::{JsqlError, JsqlResult};

/// Sort direction after normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Normalise `{ $asc: true }`, `'ASC'` or `1` (and the DESC forms).
    pub fn parse(operator: &str, value: &Value) -> JsqlResult<Self> {
        let invalid = || {
            JsqlError::validation(
                operator,
                format!(
                    "invalid sort direction {}, expected 'ASC', 'DESC', 1, -1, {{ $asc: true }} or {{ $desc: true }}",
                    value
                ),
            )
        };
        match value {
            Value::String(s) if s.eq_ignore_ascii_case("asc") => Ok(SortDirection::Asc),
            Value::String(s) if s.eq_ignore_ascii_case("desc") => Ok(SortDirection::Desc),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(SortDirection::Asc),
                Some(-1) => Ok(SortDirection::Desc),
                _ => Err(invalid()),
            },
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((key, Value::Bool(flag))) if key == "$asc" => Ok(if *flag {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                }),
                Some((key, Value::Bool(flag))) if key == "$desc" => Ok(if *flag {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `$sort`: a column, a list of columns or `{ column: direction }`
/// mappings, or a single mapping. Bare columns sort ascending.
pub fn sort(ctx: &mut CompileContext<'_>, call: Call<'_>) -> JsqlResult<String> {
    let mut items = Vec::new();
    match call.value {
        Value::String(column) => items.push(item(ctx, call, column, SortDirection::Asc)?),
        Value::Object(map) => entries(ctx, call, map, &mut items)?,
        Value::Array(list) => {
            for entry in list {
                match entry {
                    Value::String(column) => {
                        items.push(item(ctx, call, column, SortDirection::Asc)?)
                    }
                    Value::Object(map) => entries(ctx, call, map, &mut items)?,
                    other => {
                        return Err(call.invalid(format!(
                            "expected a column or a mapping, found {}",
                            kind(other)
                        )));
                    }
                }
            }
        }
        other => {
            return Err(call.invalid(format!(
                "expected a column, a list or a mapping, found {}",
                kind(other)
            )));
        }
    }
    if items.is_empty() {
        return Err(call.invalid("expected at least one sort column"));
    }
    Ok(items.join(", "))
}

fn entries(
    ctx: &mut CompileContext<'_>,
    call: Call<'_>,
    map: &Map<String, Value>,
    items: &mut Vec<String>,
) -> JsqlResult<()> {
    for (column, direction) in map {
        let direction = SortDirection::parse(call.operator, direction)?;
        items.push(item(ctx, call, column, direction)?);
    }
    Ok(())
}

fn item(
    ctx: &mut CompileContext<'_>,
    call: Call<'_>,
    column: &str,
    direction: SortDirection,
) -> JsqlResult<String> {
    if column.starts_with('$') {
        return Err(call.invalid(format!("'{}' is not a column", column)));
    }
    Ok(format!(
        "{} {}",
        ctx.quote_name(call.operator, column)?,
        direction.keyword()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_forms_agree() {
        for asc in [json!({"$asc": true}), json!("ASC"), json!("asc"), json!(1), json!({"$desc": false})] {
            assert_eq!(SortDirection::parse("$sort", &asc).unwrap(), SortDirection::Asc);
        }
        for desc in [json!({"$desc": true}), json!("DESC"), json!(-1), json!({"$asc": false})] {
            assert_eq!(SortDirection::parse("$sort", &desc).unwrap(), SortDirection::Desc);
        }
    }

    #[test]
    fn test_invalid_directions() {
        for bad in [json!(2), json!(0), json!("up"), json!(true), json!({"$asc": "yes"}), json!({"$asc": true, "$desc": true})] {
            assert!(SortDirection::parse("$sort", &bad).is_err(), "{bad}");
        }
    }
}
