//! The standard SQL base dialect.

use super::{DialectBuilder, OperatorEntry};
use crate::error::JsqlResult;
use crate::operators::{self, columns, ddl, dml, filter, grouping, paging, sort};
use crate::registry::OperatorKind::{Clause, Flag, Statement};

const OPERATORS: &[OperatorEntry] = &[
    // statements
    ("$select", Statement, operators::syntax),
    ("$insert", Statement, operators::syntax),
    ("$update", Statement, operators::syntax),
    ("$delete", Statement, operators::syntax),
    ("$createTable", Statement, operators::syntax),
    // query clauses
    ("$distinct", Flag, operators::flag),
    ("$columns", Clause, columns::columns),
    ("$from", Clause, columns::from),
    ("$table", Clause, columns::table),
    ("$where", Clause, filter::filter),
    ("$having", Clause, filter::filter),
    ("$and", Clause, filter::and),
    ("$or", Clause, filter::or),
    ("$groupBy", Clause, grouping::group_by),
    ("$sort", Clause, sort::sort),
    ("$limit", Clause, paging::limit),
    ("$offset", Clause, paging::offset),
    ("$documents", Clause, dml::documents),
    ("$set", Clause, dml::set),
    // expressions
    ("$val", Clause, columns::val),
    ("$as", Clause, columns::alias),
    ("$count", Clause, columns::count),
    ("$sum", Clause, columns::sum),
    ("$avg", Clause, columns::avg),
    ("$min", Clause, columns::min),
    ("$max", Clause, columns::max),
    // comparisons
    ("$eq", Clause, filter::eq),
    ("$ne", Clause, filter::ne),
    ("$gt", Clause, filter::gt),
    ("$gte", Clause, filter::gte),
    ("$lt", Clause, filter::lt),
    ("$lte", Clause, filter::lte),
    ("$like", Clause, filter::like),
    ("$nlike", Clause, filter::not_like),
    ("$in", Clause, filter::in_list),
    ("$nin", Clause, filter::not_in_list),
    ("$between", Clause, filter::between),
    ("$isNull", Clause, filter::is_null),
    // ddl
    ("$temp", Flag, operators::flag),
    ("$ine", Flag, operators::flag),
    ("$define", Clause, ddl::define),
    ("$column", Clause, ddl::column),
    ("$constraint", Clause, ddl::constraint),
    ("$references", Clause, operators::syntax),
    ("$type", Clause, ddl::data_type),
    ("$default", Clause, ddl::default_value),
    ("$notNull", Flag, operators::flag),
    ("$primary", Flag, operators::flag),
    ("$unique", Flag, operators::flag),
    ("$foreignKey", Flag, operators::flag),
    ("$onDelete", Clause, ddl::referential_action),
    ("$onUpdate", Clause, ddl::referential_action),
];

const SYNTAX: &[(&str, &str)] = &[
    (
        "$select",
        "SELECT{ DISTINCT[$distinct]} [$columns|*]\
         { FROM [$from]}{ FROM [$table]}\
         { WHERE [$where]}\
         { GROUP BY [$groupBy]}\
         { HAVING [$having]}\
         { ORDER BY [$sort]}\
         { LIMIT [$limit]{ OFFSET [$offset]}}",
    ),
    ("$insert", "INSERT INTO <$table> <$documents>"),
    ("$update", "UPDATE <$table> SET <$set>{ WHERE [$where]}"),
    ("$delete", "DELETE FROM <$table>{ WHERE [$where]}"),
    (
        "$createTable",
        "CREATE{ TEMPORARY[$temp]} TABLE{ IF NOT EXISTS[$ine]} <$table> (<$define>)",
    ),
    ("$define", "{{[$column][$constraint]|, }}"),
    (
        "$column",
        "<$type>{ NOT NULL[$notNull]}[$default]{ PRIMARY KEY[$primary]}{ UNIQUE[$unique]}",
    ),
    (
        "$constraint",
        "{PRIMARY KEY[$primary]}{UNIQUE[$unique]}{FOREIGN KEY[$foreignKey]} (<$columns>)\
         { REFERENCES [$references]}",
    ),
    (
        "$references",
        "<$table> (<$columns>){ ON DELETE [$onDelete]}{ ON UPDATE [$onUpdate]}",
    ),
    ("$groupBy", "<$columns>"),
];

pub(super) fn builder() -> JsqlResult<DialectBuilder> {
    DialectBuilder::new("ansi")
        .register_all(OPERATORS)
        .register_all_syntax(SYNTAX)
}
