use crate::ast::{
    CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, InsertMutation, SelectQuery,
    UpdateMutation,
};

/// Statement kind reported by [`Statement::operation_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Select,
    Insert,
    Update,
    Delete,
    CreateTableAs,
    CreateViewAs,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Select => "select",
            OperationType::Insert => "insert",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
            OperationType::CreateTableAs => "create_table_as",
            OperationType::CreateViewAs => "create_view_as",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertMutation),
    Update(UpdateMutation),
    Delete(DeleteMutation),
    CreateTableAs(CreateTableAsSelect),
    CreateViewAs(CreateViewAsSelect),
}

impl Statement {
    pub fn operation_type(&self) -> OperationType {
        match self {
            Statement::Select(_) => OperationType::Select,
            Statement::Insert(_) => OperationType::Insert,
            Statement::Update(_) => OperationType::Update,
            Statement::Delete(_) => OperationType::Delete,
            Statement::CreateTableAs(_) => OperationType::CreateTableAs,
            Statement::CreateViewAs(_) => OperationType::CreateViewAs,
        }
    }

    pub fn table_names(&self) -> Vec<String> {
        match self {
            Statement::Select(s) => s.table_names(),
            Statement::Insert(s) => s.table_names(),
            Statement::Update(s) => s.table_names(),
            Statement::Delete(s) => s.table_names(),
            Statement::CreateTableAs(s) => s.table_names(),
            Statement::CreateViewAs(s) => s.table_names(),
        }
    }
}

macro_rules! impl_statement_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(s: $ty) -> Self {
                    Statement::$variant(s)
                }
            }
        )*
    };
}

impl_statement_from! {
    Select => SelectQuery,
    Insert => InsertMutation,
    Update => UpdateMutation,
    Delete => DeleteMutation,
    CreateTableAs => CreateTableAsSelect,
    CreateViewAs => CreateViewAsSelect,
}
