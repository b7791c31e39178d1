//! The expression compiler.
//!
//! [`CompileContext`] is created fresh for every compile. It carries the
//! active dialect, the [`Binder`] and the boolean-combinator scope, and is
//! passed explicitly into every operator handler and template render.

use serde_json::{Map, Value};
use tracing::trace;

use crate::binder::Binder;
use crate::dialect::Dialect;
use crate::error::{JsqlError, JsqlResult};
use crate::quoter::Quoter;

/// One operator invocation: `{ key: { operator: value } }`.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// The `$`-prefixed operator name.
    pub operator: &'a str,
    /// The operand.
    pub value: &'a Value,
    /// The mapping the operator key was found on.
    pub parent: &'a Map<String, Value>,
    /// The property key the invocation applies to: the column for
    /// comparisons, the entry name inside a repeat list, otherwise the
    /// operator itself.
    pub key: &'a str,
}

impl<'a> Call<'a> {
    /// A validation error attributed to this operator.
    pub fn invalid(&self, message: impl Into<String>) -> JsqlError {
        JsqlError::validation(self.operator, message)
    }

    pub fn as_bool(&self) -> JsqlResult<bool> {
        self.value
            .as_bool()
            .ok_or_else(|| self.invalid(format!("expected a boolean, found {}", kind(self.value))))
    }

    pub fn as_str(&self) -> JsqlResult<&'a str> {
        self.value
            .as_str()
            .ok_or_else(|| self.invalid(format!("expected a string, found {}", kind(self.value))))
    }

    pub fn as_object(&self) -> JsqlResult<&'a Map<String, Value>> {
        self.value
            .as_object()
            .ok_or_else(|| self.invalid(format!("expected an object, found {}", kind(self.value))))
    }

    /// The column this operator applies to.
    pub fn column(&self) -> JsqlResult<&'a str> {
        if self.key.starts_with('$') {
            return Err(self.invalid("must be applied to a column"));
        }
        Ok(self.key)
    }
}

/// What a bare scalar means at the position being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Strings are column or table names and get quoted.
    Identifier,
    /// Scalars are bound as parameters.
    Value,
}

/// A boolean combinator in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn joiner(self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// Per-compile state.
pub struct CompileContext<'d> {
    dialect: &'d Dialect,
    binder: Binder,
    scope: Vec<Combinator>,
}

impl<'d> CompileContext<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            binder: Binder::new(dialect.placeholders()),
            scope: Vec::new(),
        }
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub fn quoter(&self) -> &'d Quoter {
        self.dialect.quoter()
    }

    /// Bind a value and return its placeholder.
    pub fn bind(&mut self, value: &Value) -> String {
        self.binder.bind(value.clone())
    }

    /// Resolve `call.operator` in the active dialect and run its handler.
    pub fn invoke(&mut self, call: Call<'_>) -> JsqlResult<String> {
        let dialect = self.dialect;
        let spec = dialect.resolve(call.operator)?;
        trace!(operator = call.operator, key = call.key, "invoke");
        (spec.handler())(self, call)
    }

    /// Render the dialect's template `name` against `node`.
    pub fn render_syntax(&mut self, name: &str, node: &Value, subject: &str) -> JsqlResult<String> {
        let dialect = self.dialect;
        let template = dialect.syntax(name)?;
        template.render(name, node, subject, self)
    }

    /// The combinator of the innermost enclosing filter group.
    pub fn combinator(&self) -> Option<Combinator> {
        self.scope.last().copied()
    }

    /// Run `f` inside a filter group of kind `kind`.
    pub fn scoped<T>(
        &mut self,
        kind: Combinator,
        f: impl FnOnce(&mut Self) -> JsqlResult<T>,
    ) -> JsqlResult<T> {
        self.scope.push(kind);
        let result = f(self);
        self.scope.pop();
        result
    }

    /// Compile a node whose scalars are column names.
    pub fn identifier(&mut self, operator: &str, node: &Value) -> JsqlResult<String> {
        self.expression(operator, node, Position::Identifier)
    }

    /// Compile a node whose scalars are bound values.
    pub fn value(&mut self, operator: &str, node: &Value) -> JsqlResult<String> {
        self.expression(operator, node, Position::Value)
    }

    /// Compile any node: scalars per `position`, lists joined with `, `,
    /// mappings as operator invocations.
    pub fn expression(
        &mut self,
        operator: &str,
        node: &Value,
        position: Position,
    ) -> JsqlResult<String> {
        match (node, position) {
            (Value::Object(map), _) => self.operator_expression(operator, map),
            (Value::Array(items), _) => {
                if items.is_empty() {
                    return Err(JsqlError::validation(operator, "expected a non-empty list"));
                }
                let parts = items
                    .iter()
                    .map(|item| self.expression(operator, item, position))
                    .collect::<JsqlResult<Vec<_>>>()?;
                Ok(parts.join(", "))
            }
            (Value::String(name), Position::Identifier) => self.quote_name(operator, name),
            (other, Position::Identifier) => Err(JsqlError::validation(
                operator,
                format!("expected a column name, found {}", kind(other)),
            )),
            (Value::Null, Position::Value) => Ok("NULL".to_string()),
            (scalar, Position::Value) => Ok(self.bind(scalar)),
        }
    }

    /// Quote a possibly dotted name, rejecting empty segments.
    pub fn quote_name(&self, operator: &str, name: &str) -> JsqlResult<String> {
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(JsqlError::validation(
                operator,
                format!("invalid identifier '{}'", name),
            ));
        }
        Ok(self.quoter().quote_identifier(name))
    }

    /// A mapping of operator keys; `$as` composes an alias onto the
    /// single expression operator.
    fn operator_expression(&mut self, operator: &str, map: &Map<String, Value>) -> JsqlResult<String> {
        let mut expression = None;
        for (key, value) in map {
            if key == "$as" {
                continue;
            }
            if !key.starts_with('$') {
                return Err(JsqlError::validation(
                    operator,
                    format!("unexpected key '{}', expected an operator", key),
                ));
            }
            if expression.is_some() {
                return Err(JsqlError::validation(
                    operator,
                    "only one expression operator is allowed per object",
                ));
            }
            expression = Some(self.invoke(Call {
                operator: key,
                value,
                parent: map,
                key,
            })?);
        }
        let expression = expression
            .ok_or_else(|| JsqlError::validation(operator, "expected an expression operator"))?;
        self.alias(expression, map)
    }

    /// Append `AS <alias>` when the mapping carries `$as`.
    pub fn alias(&mut self, expression: String, map: &Map<String, Value>) -> JsqlResult<String> {
        match map.get("$as") {
            Some(alias) => {
                let alias = self.invoke(Call {
                    operator: "$as",
                    value: alias,
                    parent: map,
                    key: "$as",
                })?;
                Ok(format!("{} AS {}", expression, alias))
            }
            None => Ok(expression),
        }
    }

    /// Render a scalar as an inline SQL literal (DDL positions).
    pub fn literal(&self, operator: &str, node: &Value) -> JsqlResult<String> {
        match node {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(self.quoter().quote_literal(s)),
            other => Err(JsqlError::validation(
                operator,
                format!("expected a scalar, found {}", kind(other)),
            )),
        }
    }

    /// Values bound so far.
    pub fn bound(&self) -> usize {
        self.binder.len()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.binder.into_values()
    }
}

/// Human name of a JSON value's type, for error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
