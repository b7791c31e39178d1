//! PostgreSQL: numbered placeholders, `ILIKE` and `RETURNING`.

use super::{Dialect, DialectBuilder, OperatorEntry};
use crate::binder::PlaceholderStyle;
use crate::error::JsqlResult;
use crate::operators::{dml, filter};
use crate::registry::OperatorKind::Clause;

const OPERATORS: &[OperatorEntry] = &[
    ("$ilike", Clause, filter::ilike),
    ("$returning", Clause, dml::returning),
];

const SYNTAX: &[(&str, &str)] = &[
    ("$insert", "INSERT INTO <$table> <$documents>{ RETURNING [$returning]}"),
    (
        "$update",
        "UPDATE <$table> SET <$set>{ WHERE [$where]}{ RETURNING [$returning]}",
    ),
    (
        "$delete",
        "DELETE FROM <$table>{ WHERE [$where]}{ RETURNING [$returning]}",
    ),
];

pub(super) fn builder(ansi: &Dialect) -> JsqlResult<DialectBuilder> {
    let mut builder = DialectBuilder::derive("postgresql", ansi)
        .placeholders(PlaceholderStyle::Numbered)
        .register_all(OPERATORS);
    for (name, grammar) in SYNTAX {
        builder = builder.update_syntax(name, grammar)?;
    }
    Ok(builder)
}
