use crate::ast::SelectQuery;

/// `CREATE TABLE <name> AS <select>`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableAsSelect {
    pub(crate) table_name: String,
    pub(crate) select: SelectQuery,
}

impl CreateTableAsSelect {
    pub fn new(table_name: impl Into<String>, select: SelectQuery) -> Self {
        Self {
            table_name: table_name.into(),
            select,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn select(&self) -> &SelectQuery {
        &self.select
    }

    pub fn table_names(&self) -> Vec<String> {
        std::iter::once(self.table_name.clone())
            .chain(self.select.table_names())
            .collect()
    }
}

/// `CREATE [OR REPLACE] VIEW <name> AS <select>`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewAsSelect {
    pub(crate) view_name: String,
    pub(crate) select: SelectQuery,
    pub(crate) or_replace: bool,
}

impl CreateViewAsSelect {
    pub fn new(view_name: impl Into<String>, select: SelectQuery, or_replace: bool) -> Self {
        Self {
            view_name: view_name.into(),
            select,
            or_replace,
        }
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn select(&self) -> &SelectQuery {
        &self.select
    }

    pub fn or_replace(&self) -> bool {
        self.or_replace
    }

    pub fn table_names(&self) -> Vec<String> {
        std::iter::once(self.view_name.clone())
            .chain(self.select.table_names())
            .collect()
    }
}
