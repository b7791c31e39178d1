//! MySQL: backtick quoting, `WITH ROLLUP`, `SQL_CALC_FOUND_ROWS`,
//! `INTO` / `INTO OUTFILE`, table options and ordered UPDATE/DELETE.

use super::{Dialect, DialectBuilder, OperatorEntry};
use crate::error::JsqlResult;
use crate::operators::{self, paging, redirect};
use crate::quoter::Quoter;
use crate::registry::OperatorKind::{Clause, Flag};

const OPERATORS: &[OperatorEntry] = &[
    ("$calcFoundRows", Flag, operators::flag),
    ("$rollup", Flag, operators::flag),
    ("$limit", Clause, paging::limit_unsigned_max),
    ("$into", Clause, redirect::into),
    ("$outfile", Clause, redirect::outfile),
    ("$file", Clause, operators::bind_string),
    ("$fields", Clause, redirect::export_options),
    ("$lines", Clause, redirect::export_options),
    ("$terminatedBy", Clause, operators::bind_string),
    ("$enclosedBy", Clause, operators::bind_string),
    ("$escapedBy", Clause, operators::bind_string),
    ("$startingBy", Clause, operators::bind_string),
    ("$autoInc", Flag, operators::flag),
    ("$comment", Clause, operators::inline_string),
    ("$engine", Clause, operators::keyword),
    ("$charset", Clause, operators::keyword),
];

const SYNTAX: &[(&str, &str)] = &[
    (
        "$select",
        "SELECT{ DISTINCT[$distinct]}{ SQL_CALC_FOUND_ROWS[$calcFoundRows]} [$columns|*]\
         { INTO [$into]}{ INTO OUTFILE [$outfile]}\
         { FROM [$from]}{ FROM [$table]}\
         { WHERE [$where]}\
         { GROUP BY [$groupBy]}\
         { HAVING [$having]}\
         { ORDER BY [$sort]}\
         { LIMIT [$limit]{ OFFSET [$offset]}}",
    ),
    ("$groupBy", "<$columns>{ WITH ROLLUP[$rollup]}"),
    (
        "$column",
        "<$type>{ NOT NULL[$notNull]}[$default]{ AUTO_INCREMENT[$autoInc]}\
         { PRIMARY KEY[$primary]}{ UNIQUE[$unique]}{ COMMENT [$comment]}",
    ),
    (
        "$createTable",
        "CREATE{ TEMPORARY[$temp]} TABLE{ IF NOT EXISTS[$ine]} <$table> (<$define>)\
         { ENGINE = [$engine]}{ DEFAULT CHARSET = [$charset]}{ COMMENT = [$comment]}",
    ),
    (
        "$update",
        "UPDATE <$table> SET <$set>{ WHERE [$where]}{ ORDER BY [$sort]}{ LIMIT [$limit]}",
    ),
    (
        "$delete",
        "DELETE FROM <$table>{ WHERE [$where]}{ ORDER BY [$sort]}{ LIMIT [$limit]}",
    ),
];

const NEW_SYNTAX: &[(&str, &str)] = &[
    ("$outfile", "<$file>{ FIELDS[$fields]}{ LINES[$lines]}"),
    (
        "$fields",
        "{ TERMINATED BY [$terminatedBy]}{ ENCLOSED BY [$enclosedBy]}{ ESCAPED BY [$escapedBy]}",
    ),
    ("$lines", "{ STARTING BY [$startingBy]}{ TERMINATED BY [$terminatedBy]}"),
];

pub(super) fn builder(ansi: &Dialect) -> JsqlResult<DialectBuilder> {
    let mut builder = DialectBuilder::derive("mysql", ansi)
        .quoter(Quoter::backtick())
        .register_all(OPERATORS);
    for (name, grammar) in SYNTAX {
        builder = builder.update_syntax(name, grammar)?;
    }
    builder.register_all_syntax(NEW_SYNTAX)
}
