use crate::ast::{Condition, SelectQuery};

/// Where rows come from: a named table or a nested select.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Name(String),
    Select(Box<SelectQuery>),
}

impl From<&str> for TableSource {
    fn from(s: &str) -> Self {
        TableSource::Name(s.to_string())
    }
}

impl From<String> for TableSource {
    fn from(s: String) -> Self {
        TableSource::Name(s)
    }
}

impl From<SelectQuery> for TableSource {
    fn from(query: SelectQuery) -> Self {
        TableSource::Select(Box::new(query))
    }
}

/// A table source with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl Table {
    pub fn new(source: impl Into<TableSource>) -> Self {
        Self {
            source: source.into(),
            alias: None,
        }
    }

    pub fn aliased(source: impl Into<TableSource>, alias: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: Some(alias.into()),
        }
    }

    /// Plain table name. A nested select reports its own primary table.
    pub fn table_name(&self) -> Option<String> {
        match &self.source {
            TableSource::Name(name) => Some(name.clone()),
            TableSource::Select(query) => query.table().and_then(|t| t.table_name()),
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self.source, TableSource::Select(_))
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::new(name)
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Table::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INNER" => Some(JoinType::Inner),
            "LEFT" => Some(JoinType::Left),
            "RIGHT" => Some(JoinType::Right),
            "FULL" => Some(JoinType::Full),
            "CROSS" => Some(JoinType::Cross),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: Table,
    pub condition: Option<Condition>,
    pub join_type: JoinType,
}

impl Join {
    pub fn table_name(&self) -> Option<String> {
        self.table.table_name()
    }
}
