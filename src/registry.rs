//! Operator registry with base fallback.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::compiler::{Call, CompileContext};
use crate::error::{JsqlError, JsqlResult};

/// Signature shared by every operator handler.
pub type Handler = fn(&mut CompileContext<'_>, Call<'_>) -> JsqlResult<String>;

/// Where an operator may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Top-level entry point such as `$select`.
    Statement,
    /// Anything nested inside a statement.
    Clause,
    /// A boolean switch; `false` or `null` turns its template group off.
    Flag,
}

/// A registered operator.
#[derive(Debug, Clone)]
pub struct OperatorSpec {
    name: String,
    kind: OperatorKind,
    handler: Handler,
}

impl OperatorSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

/// Maps operator names to handlers.
///
/// A derived registry only holds its own entries and falls back to its
/// base on a miss.
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistry {
    operators: HashMap<String, OperatorSpec>,
    base: Option<Arc<OperatorRegistry>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry that falls back to `base`.
    pub fn derive(base: Arc<OperatorRegistry>) -> Self {
        Self {
            operators: HashMap::new(),
            base: Some(base),
        }
    }

    /// Install or replace the handler for `name`.
    pub fn register(&mut self, name: &str, kind: OperatorKind, handler: Handler) {
        self.operators.insert(
            name.to_string(),
            OperatorSpec {
                name: name.to_string(),
                kind,
                handler,
            },
        );
    }

    /// Look up `name`, falling back to the base registry.
    pub fn resolve(&self, name: &str) -> JsqlResult<&OperatorSpec> {
        if let Some(spec) = self.operators.get(name) {
            return Ok(spec);
        }
        match &self.base {
            Some(base) => {
                trace!(operator = name, "falling back to base registry");
                base.resolve(name)
            }
            None => Err(JsqlError::UnknownOperator(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
            || self.base.as_ref().is_some_and(|base| base.contains(name))
    }

    /// Whether `name` is registered here rather than inherited.
    pub fn owns(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Every resolvable operator name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names.into_iter().collect()
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        names.extend(self.operators.keys().cloned());
        if let Some(base) = &self.base {
            base.collect_names(names);
        }
    }
}
