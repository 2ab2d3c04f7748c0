//! Compilation targets.

use crate::ast::{
    CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, InsertMutation, SelectQuery,
    Statement, UpdateMutation,
};
use crate::error::{QirError, QirResult};
use crate::transpiler::dialect::{Dialect, FlavorOptions};
use crate::transpiler::options::RenderOptions;
use crate::transpiler::sql::MySqlFlavor;
use crate::transpiler::traits::Flavor;
use crate::transpiler::ToSql;
use std::sync::Arc;

/// A backend that turns statements into its own request type.
pub trait QueryTarget {
    type Output;

    /// Backend name used in error messages.
    fn name(&self) -> &'static str;

    fn compile_select(&self, query: &SelectQuery) -> QirResult<Self::Output>;

    fn compile_insert(&self, mutation: &InsertMutation) -> QirResult<Self::Output>;

    fn compile_update(&self, mutation: &UpdateMutation) -> QirResult<Self::Output>;

    fn compile_delete(&self, mutation: &DeleteMutation) -> QirResult<Self::Output>;

    fn compile_create_table_as(&self, _ddl: &CreateTableAsSelect) -> QirResult<Self::Output> {
        Err(QirError::unsupported(
            self.name(),
            format!("{} does not support CREATE TABLE AS SELECT", self.name()),
        ))
    }

    fn compile_create_view_as(&self, _ddl: &CreateViewAsSelect) -> QirResult<Self::Output> {
        Err(QirError::unsupported(
            self.name(),
            format!("{} does not support CREATE VIEW AS SELECT", self.name()),
        ))
    }

    fn compile(&self, statement: &Statement) -> QirResult<Self::Output> {
        match statement {
            Statement::Select(q) => self.compile_select(q),
            Statement::Insert(m) => self.compile_insert(m),
            Statement::Update(m) => self.compile_update(m),
            Statement::Delete(m) => self.compile_delete(m),
            Statement::CreateTableAs(d) => self.compile_create_table_as(d),
            Statement::CreateViewAs(d) => self.compile_create_view_as(d),
        }
    }
}

/// SQL text through a flavor, with optional transform hooks.
#[derive(Debug, Clone)]
pub struct SqlTarget {
    flavor: Arc<dyn Flavor>,
    options: RenderOptions,
}

impl SqlTarget {
    pub fn new(flavor: Arc<dyn Flavor>) -> Self {
        Self {
            flavor,
            options: RenderOptions::default(),
        }
    }

    pub fn from_dialect(dialect: Dialect, options: FlavorOptions) -> Self {
        Self::new(dialect.flavor(options))
    }

    /// Same flavor, different hooks.
    pub fn with_options(&self, options: RenderOptions) -> Self {
        Self {
            flavor: Arc::clone(&self.flavor),
            options,
        }
    }

    pub fn flavor(&self) -> &dyn Flavor {
        self.flavor.as_ref()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

impl Default for SqlTarget {
    fn default() -> Self {
        Self::new(Arc::new(MySqlFlavor::default()))
    }
}

impl QueryTarget for SqlTarget {
    type Output = String;

    fn name(&self) -> &'static str {
        "SQL"
    }

    fn compile_select(&self, query: &SelectQuery) -> QirResult<String> {
        query.to_sql_with_options(self.flavor(), &self.options)
    }

    fn compile_insert(&self, mutation: &InsertMutation) -> QirResult<String> {
        mutation.to_sql_with_options(self.flavor(), &self.options)
    }

    fn compile_update(&self, mutation: &UpdateMutation) -> QirResult<String> {
        mutation.to_sql_with_options(self.flavor(), &self.options)
    }

    fn compile_delete(&self, mutation: &DeleteMutation) -> QirResult<String> {
        mutation.to_sql_with_options(self.flavor(), &self.options)
    }

    fn compile_create_table_as(&self, ddl: &CreateTableAsSelect) -> QirResult<String> {
        ddl.to_sql_with_options(self.flavor(), &self.options)
    }

    fn compile_create_view_as(&self, ddl: &CreateViewAsSelect) -> QirResult<String> {
        ddl.to_sql_with_options(self.flavor(), &self.options)
    }
}

macro_rules! impl_compile {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Compile through the given target.
                pub fn compile<T: QueryTarget>(&self, target: &T) -> QirResult<T::Output> {
                    target.$method(self)
                }
            }
        )*
    };
}

impl_compile! {
    SelectQuery => compile_select,
    InsertMutation => compile_insert,
    UpdateMutation => compile_update,
    DeleteMutation => compile_delete,
    CreateTableAsSelect => compile_create_table_as,
    CreateViewAsSelect => compile_create_view_as,
}

impl Statement {
    pub fn compile<T: QueryTarget>(&self, target: &T) -> QirResult<T::Output> {
        target.compile(self)
    }
}
