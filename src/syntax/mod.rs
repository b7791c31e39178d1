//! Statement grammar templates.
//!
//! A dialect describes statement shapes with small grammar strings that are
//! parsed once, when the dialect is composed, and rendered against the query
//! node on every compile.
//!
//! # Notation
//!
//! ```text
//! CREATE{ TEMPORARY[$temp]} TABLE{ IF NOT EXISTS[$ine]} <$table> (<$define>)
//! ──┬─── ──────┬─────────        ───────────┬─────────  ───┬───   ────┬────
//!   │          │                            │              │          │
//!   │          │                            │              │          └── required
//!   │          │                            │              └── required
//!   │          │                            └── optional group guarded by $ine
//!   │          └── optional group guarded by $temp
//!   └── literal
//! ```
//!
//! | Construct             | Meaning                                               |
//! |-----------------------|-------------------------------------------------------|
//! | `text`                | literal, runs of whitespace collapse to one space      |
//! | `{ … }`               | optional group, guarded by the first key inside it     |
//! | `<$key>`              | required operator; a missing value is an error         |
//! | `[$key]`              | inline operator, omitted when the value is absent      |
//! | `[$key\|text]`        | inline operator with a fallback literal                |
//! | `{{ item \| sep }}`   | repeat `item` for every entry of the current mapping   |

mod grammar;
mod render;

use crate::error::JsqlResult;

/// One node of a parsed grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    Literal(String),
    Optional {
        guard: String,
        body: Vec<SyntaxNode>,
    },
    Required(String),
    InlineRef {
        key: String,
        fallback: Option<String>,
    },
    RepeatList {
        item: Vec<SyntaxNode>,
        separator: String,
    },
}

/// An immutable, parsed grammar string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTemplate {
    grammar: String,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTemplate {
    /// Parse a grammar string.
    pub fn parse(grammar: &str) -> JsqlResult<Self> {
        let nodes = grammar::parse(grammar)?;
        Ok(Self {
            grammar: grammar.to_string(),
            nodes,
        })
    }

    /// The source grammar string.
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    /// Whether the top-level scope of the template mentions `key`.
    pub fn references(&self, key: &str) -> bool {
        references(&self.nodes, key)
    }
}

/// Whether `nodes` mention `key`, not looking into repeat items.
fn references(nodes: &[SyntaxNode], key: &str) -> bool {
    nodes.iter().any(|node| match node {
        SyntaxNode::Required(k) => k == key,
        SyntaxNode::InlineRef { key: k, .. } => k == key,
        SyntaxNode::Optional { guard, body } => guard == key || references(body, key),
        SyntaxNode::Literal(_) | SyntaxNode::RepeatList { .. } => false,
    })
}

/// The outermost guard that hides `key`, if any.
fn guard_of<'t>(nodes: &'t [SyntaxNode], key: &str) -> Option<&'t str> {
    nodes.iter().find_map(|node| match node {
        SyntaxNode::Optional { guard, body } if guard != key && references(body, key) => {
            Some(guard.as_str())
        }
        _ => None,
    })
}

/// The first key referenced by `nodes`, used as an optional group guard.
fn first_key(nodes: &[SyntaxNode]) -> Option<String> {
    nodes.iter().find_map(|node| match node {
        SyntaxNode::Required(k) => Some(k.clone()),
        SyntaxNode::InlineRef { key, .. } => Some(key.clone()),
        SyntaxNode::Optional { guard, .. } => Some(guard.clone()),
        SyntaxNode::Literal(_) | SyntaxNode::RepeatList { .. } => None,
    })
}

fn has_repeat(nodes: &[SyntaxNode]) -> bool {
    nodes.iter().any(|node| match node {
        SyntaxNode::RepeatList { .. } => true,
        SyntaxNode::Optional { body, .. } => has_repeat(body),
        _ => false,
    })
}
