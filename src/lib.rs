//! # jsql
//!
//! Compile JSON query documents into parameterised SQL.
//!
//! ```rust
//! use serde_json::json;
//!
//! let query = json!({
//!     "$select": {
//!         "$from": "people",
//!         "$columns": ["id", "name"],
//!         "$where": { "age": { "$gte": 18 } },
//!         "$sort": { "name": 1 },
//!         "$limit": 10
//!     }
//! });
//!
//! let result = jsql::build("mysql", &query).unwrap();
//! assert_eq!(
//!     result.sql,
//!     "SELECT `id`, `name` FROM `people` WHERE `age` >= ? ORDER BY `name` ASC LIMIT ?"
//! );
//! assert_eq!(result.values, vec![json!(18), json!(10)]);
//! ```
//!
//! ## Layout
//!
//! | Piece            | Role                                                  |
//! |------------------|-------------------------------------------------------|
//! | [`SqlBuilder`]   | entry point, one per dialect                          |
//! | [`Dialect`]      | operators + statement templates + quoting, immutable  |
//! | [`syntax`]       | grammar templates such as `SELECT [$columns\|*]…`     |
//! | [`operators`]    | handlers turning one `$operator` into SQL             |
//! | [`Binder`]       | ordered bind values for one compile                   |
//!
//! Values never appear in the SQL text. Identifiers are quoted, scalars are
//! bound, and the i-th placeholder corresponds to `values[i]`.

pub mod binder;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod operators;
pub mod quoter;
pub mod registry;
pub mod syntax;

pub use binder::Binder;
pub use builder::{QueryResult, SqlBuilder};
pub use dialect::Dialect;

pub mod prelude {
    pub use crate::binder::{Binder, PlaceholderStyle};
    pub use crate::builder::{QueryResult, SqlBuilder};
    pub use crate::compiler::{Call, CompileContext};
    pub use crate::dialect::{Dialect, DialectBuilder};
    pub use crate::error::*;
    pub use crate::quoter::Quoter;
    pub use crate::registry::{Handler, OperatorKind, OperatorRegistry};
}

/// Compile `query` with the built-in dialect `dialect`.
///
/// Composes the dialect on every call; keep a [`SqlBuilder`] around when
/// compiling more than once.
pub fn build(dialect: &str, query: &serde_json::Value) -> error::JsqlResult<QueryResult> {
    SqlBuilder::new(dialect)?.build(query)
}
