//! Statement and expression entry points.
//!
//! ```
//! use qir::prelude::*;
//!
//! let sql = q::update("users")
//!     .set("name", "John Doe")
//!     .filter(cond::equal("id", 1))
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(sql, r#"UPDATE `users` SET `name` = "John Doe" WHERE `id` = 1"#);
//! ```

use crate::ast::{
    CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, Expr, InsertMutation, SelectQuery,
    Statement, Table, TableSource, UpdateMutation, Value, ValueExpr,
};
use crate::error::QirResult;

pub fn select() -> SelectQuery {
    SelectQuery::new()
}

/// A join target or FROM source with an optional alias.
pub fn table(source: impl Into<TableSource>, alias: Option<&str>) -> Table {
    Table {
        source: source.into(),
        alias: alias.map(str::to_string),
    }
}

/// Placeholder select over `(?) AS t`, filled in by the caller's own source.
pub fn stats() -> SelectQuery {
    select().from_as("(?)", "t")
}

pub fn insert(table: impl Into<String>) -> InsertMutation {
    InsertMutation::new(Table::new(table.into()))
}

pub fn update(table: impl Into<String>) -> UpdateMutation {
    UpdateMutation::new(Table::new(table.into()))
}

pub fn update_as(table: impl Into<String>, alias: impl Into<String>) -> UpdateMutation {
    UpdateMutation::new(Table::aliased(table.into(), alias))
}

pub fn delete(table: impl Into<String>) -> DeleteMutation {
    DeleteMutation::new(Table::new(table.into()))
}

pub fn delete_as(table: impl Into<String>, alias: impl Into<String>) -> DeleteMutation {
    DeleteMutation::new(Table::aliased(table.into(), alias))
}

pub fn create_table_as(table: impl Into<String>, select: SelectQuery) -> CreateTableAsSelect {
    CreateTableAsSelect::new(table, select)
}

pub fn create_view_as(view: impl Into<String>, select: SelectQuery) -> CreateViewAsSelect {
    CreateViewAsSelect::new(view, select, false)
}

pub fn create_or_replace_view_as(view: impl Into<String>, select: SelectQuery) -> CreateViewAsSelect {
    CreateViewAsSelect::new(view, select, true)
}

/// Classify a serialized expression (sentinel-encoded value, raw, function,
/// operation, condition JSON, or plain column text).
pub fn expr(text: &str) -> QirResult<Expr> {
    Expr::deserialize(text)
}

/// A literal in value position.
pub fn value(v: impl Into<ValueExpr>) -> ValueExpr {
    v.into()
}

/// Force value interpretation of an arbitrary expression. Fails for function calls.
pub fn value_of(expr: Expr) -> QirResult<ValueExpr> {
    ValueExpr::try_from(expr)
}

/// A literal emitted verbatim, without quoting.
pub fn raw(v: impl Into<Value>) -> ValueExpr {
    ValueExpr(Expr::Raw(v.into()))
}

pub fn null() -> ValueExpr {
    raw("NULL")
}

/// `#name#`: a quoted identifier inside a column template.
pub fn column(name: impl std::fmt::Display) -> String {
    Expr::escape_column(name)
}

/// `&text&`: an escaped string literal inside a column template.
pub fn string(text: impl std::fmt::Display) -> Expr {
    Expr::column(Expr::escape_string(text))
}

/// Read back any serialized statement.
pub fn deserialize(json: &str) -> QirResult<Statement> {
    Statement::deserialize(json)
}
