//! Rendering of the query AST into SQL and DynamoDB requests.
//!
//! SQL output goes through a [`Flavor`]; the MySQL-style flavor is used when
//! none is given. [`QueryTarget`] puts the SQL renderer and the DynamoDB
//! compilers behind one interface.

pub mod conditions;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expressions;
pub mod nosql;
pub mod options;
pub mod sql;
pub mod target;
pub mod traits;

#[cfg(test)]
mod tests;

pub use dialect::{Dialect, FlavorOptions};
pub use nosql::dynamo::{DynamoOptions, DynamoRequest, DynamoTarget};
pub use nosql::partiql::PartiqlTarget;
pub use options::{RenderContext, RenderOptions};
pub use sql::{MySqlFlavor, PostgresFlavor, SqliteFlavor, TimestreamFlavor};
pub use target::{QueryTarget, SqlTarget};
pub use traits::Flavor;

use crate::ast::{
    Condition, CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, Expr, InsertMutation,
    SelectQuery, Statement, UpdateMutation,
};
use crate::error::QirResult;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Render with explicit flavor and transform hooks.
    fn to_sql_with_options(&self, flavor: &dyn Flavor, options: &RenderOptions) -> QirResult<String>;

    /// Render with the MySQL-style default flavor.
    fn to_sql(&self) -> QirResult<String> {
        self.to_sql_with_flavor(&MySqlFlavor::default())
    }

    fn to_sql_with_flavor(&self, flavor: &dyn Flavor) -> QirResult<String> {
        self.to_sql_with_options(flavor, &RenderOptions::default())
    }
}

macro_rules! impl_to_sql {
    ($($ty:ty => $render:path),* $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql_with_options(
                    &self,
                    flavor: &dyn Flavor,
                    options: &RenderOptions,
                ) -> QirResult<String> {
                    $render(self, RenderContext::new(flavor, options))
                }
            }
        )*
    };
}

impl_to_sql! {
    Expr => expressions::render_expr,
    Condition => conditions::render_condition,
    SelectQuery => dml::render_select,
    InsertMutation => dml::render_insert,
    UpdateMutation => dml::render_update,
    DeleteMutation => dml::render_delete,
    CreateTableAsSelect => ddl::render_create_table_as,
    CreateViewAsSelect => ddl::render_create_view_as,
}

impl ToSql for Statement {
    fn to_sql_with_options(&self, flavor: &dyn Flavor, options: &RenderOptions) -> QirResult<String> {
        match self {
            Statement::Select(q) => q.to_sql_with_options(flavor, options),
            Statement::Insert(m) => m.to_sql_with_options(flavor, options),
            Statement::Update(m) => m.to_sql_with_options(flavor, options),
            Statement::Delete(m) => m.to_sql_with_options(flavor, options),
            Statement::CreateTableAs(d) => d.to_sql_with_options(flavor, options),
            Statement::CreateViewAs(d) => d.to_sql_with_options(flavor, options),
        }
    }
}
