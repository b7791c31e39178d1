//! SQL dialects.
//!
//! A [`Dialect`] is an immutable bundle of operators, statement templates
//! and quoting rules. Dialects are composed with a [`DialectBuilder`],
//! either from scratch or derived from a parent, and frozen with
//! [`DialectBuilder::build`]. A frozen dialect is `Send + Sync` and can be
//! shared between threads compiling concurrently.
//!
//! ```text
//!            ansi ("…", ?, LIMIT ALL)
//!           /                        \
//!   mysql (`…`, ROLLUP, OUTFILE)   postgresql ($n, ILIKE, RETURNING)
//! ```

mod ansi;
mod mysql;
mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::binder::PlaceholderStyle;
use crate::error::{JsqlError, JsqlResult};
use crate::quoter::Quoter;
use crate::registry::{Handler, OperatorKind, OperatorRegistry, OperatorSpec};
use crate::syntax::SyntaxTemplate;

/// Names accepted by [`Dialect::by_name`].
pub const NAMES: &[&str] = &["ansi", "mysql", "postgresql"];

/// A row of an operator table: name, kind, handler.
pub(crate) type OperatorEntry = (&'static str, OperatorKind, Handler);

/// A frozen dialect.
#[derive(Debug, Clone)]
pub struct Dialect {
    name: String,
    registry: Arc<OperatorRegistry>,
    syntax: HashMap<String, Arc<SyntaxTemplate>>,
    quoter: Quoter,
    placeholders: PlaceholderStyle,
}

impl Dialect {
    /// The standard SQL base dialect.
    pub fn ansi() -> JsqlResult<Self> {
        ansi::builder()?.build()
    }

    pub fn mysql() -> JsqlResult<Self> {
        mysql::builder(&Self::ansi()?)?.build()
    }

    pub fn postgres() -> JsqlResult<Self> {
        postgres::builder(&Self::ansi()?)?.build()
    }

    /// Look a built-in dialect up by name, ignoring case.
    pub fn by_name(name: &str) -> JsqlResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ansi" => Self::ansi(),
            "mysql" => Self::mysql(),
            "postgresql" | "postgres" => Self::postgres(),
            _ => Err(JsqlError::UnknownDialect(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quoter(&self) -> &Quoter {
        &self.quoter
    }

    pub fn placeholders(&self) -> PlaceholderStyle {
        self.placeholders
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Resolve an operator, falling back through parent dialects.
    pub fn resolve(&self, name: &str) -> JsqlResult<&OperatorSpec> {
        self.registry.resolve(name)
    }

    /// Whether any registry in the chain has `name`.
    pub fn knows(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// The template registered under `name`.
    pub fn syntax(&self, name: &str) -> JsqlResult<&SyntaxTemplate> {
        self.syntax
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| JsqlError::UnknownOperator(name.to_string()))
    }

    /// Every template name, sorted.
    pub fn syntax_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.syntax.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Mutable dialect under composition.
#[derive(Debug)]
pub struct DialectBuilder {
    name: String,
    registry: OperatorRegistry,
    syntax: HashMap<String, Arc<SyntaxTemplate>>,
    quoter: Quoter,
    placeholders: PlaceholderStyle,
}

impl DialectBuilder {
    /// A builder with no operators and no templates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: OperatorRegistry::new(),
            syntax: HashMap::new(),
            quoter: Quoter::ansi(),
            placeholders: PlaceholderStyle::Question,
        }
    }

    /// A builder inheriting `parent`'s operators (by fallback), templates,
    /// quoting and placeholders.
    pub fn derive(name: impl Into<String>, parent: &Dialect) -> Self {
        Self {
            name: name.into(),
            registry: OperatorRegistry::derive(Arc::clone(&parent.registry)),
            syntax: parent.syntax.clone(),
            quoter: parent.quoter.clone(),
            placeholders: parent.placeholders,
        }
    }

    pub fn quoter(mut self, quoter: Quoter) -> Self {
        self.quoter = quoter;
        self
    }

    pub fn placeholders(mut self, style: PlaceholderStyle) -> Self {
        self.placeholders = style;
        self
    }

    pub fn register(mut self, name: &str, kind: OperatorKind, handler: Handler) -> Self {
        self.registry.register(name, kind, handler);
        self
    }

    pub(crate) fn register_all(self, table: &[OperatorEntry]) -> Self {
        table
            .iter()
            .fold(self, |builder, &(name, kind, handler)| builder.register(name, kind, handler))
    }

    /// Parse and install a template, replacing any inherited one.
    pub fn register_syntax(mut self, name: &str, grammar: &str) -> JsqlResult<Self> {
        let template = SyntaxTemplate::parse(grammar)?;
        self.syntax.insert(name.to_string(), Arc::new(template));
        Ok(self)
    }

    /// Replace a template that must already exist.
    pub fn update_syntax(self, name: &str, grammar: &str) -> JsqlResult<Self> {
        if !self.syntax.contains_key(name) {
            return Err(JsqlError::UnknownOperator(name.to_string()));
        }
        self.register_syntax(name, grammar)
    }

    pub(crate) fn register_all_syntax(self, table: &[(&str, &str)]) -> JsqlResult<Self> {
        table
            .iter()
            .try_fold(self, |builder, (name, grammar)| builder.register_syntax(name, grammar))
    }

    /// Freeze the dialect.
    pub fn build(self) -> JsqlResult<Dialect> {
        debug!(
            dialect = %self.name,
            templates = self.syntax.len(),
            "dialect composed"
        );
        Ok(Dialect {
            name: self.name,
            registry: Arc::new(self.registry),
            syntax: self.syntax,
            quoter: self.quoter,
            placeholders: self.placeholders,
        })
    }
}
