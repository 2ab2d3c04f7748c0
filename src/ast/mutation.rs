use crate::ast::{Condition, Expr, SelectQuery, Table, Value, ValueExpr};
use crate::error::{QirError, QirResult};
use indexmap::IndexMap;

/// One insert row: column name to literal, in caller order.
pub type Row = IndexMap<String, Value>;

/// `INSERT INTO ... VALUES` or `INSERT INTO ... SELECT`.
///
/// Row values and a source select are mutually exclusive. Setting one after
/// the other fails immediately; setting neither is only reported when the
/// statement is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertMutation {
    pub(crate) table: Table,
    pub(crate) rows: Option<Vec<Row>>,
    pub(crate) select: Option<(SelectQuery, Option<Vec<String>>)>,
}

impl InsertMutation {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            rows: None,
            select: None,
        }
    }

    /// Append rows.
    pub fn values<R, K, V>(&self, rows: impl IntoIterator<Item = R>) -> QirResult<Self>
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if self.select.is_some() {
            return Err(QirError::build("select already set"));
        }
        let mut clone = self.clone();
        let existing = clone.rows.get_or_insert_with(Vec::new);
        existing.extend(rows.into_iter().map(|row| {
            row.into_iter()
                .map(|(k, v)| -> (String, Value) { (k.into(), v.into()) })
                .collect::<Row>()
        }));
        Ok(clone)
    }

    /// Use a select as the row source, optionally naming the target columns.
    pub fn select(&self, query: SelectQuery, columns: Option<Vec<String>>) -> QirResult<Self> {
        if self.rows.is_some() {
            return Err(QirError::build("values already set"));
        }
        let mut clone = self.clone();
        clone.select = Some((query, columns));
        Ok(clone)
    }

    pub fn clear_values(&self) -> Self {
        let mut clone = self.clone();
        clone.rows = None;
        clone
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn rows(&self) -> Option<&[Row]> {
        self.rows.as_deref()
    }

    pub fn select_source(&self) -> Option<(&SelectQuery, Option<&[String]>)> {
        self.select
            .as_ref()
            .map(|(query, columns)| (query, columns.as_deref()))
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.table_name().into_iter().collect();
        if let Some((query, _)) = &self.select {
            for name in query.table_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// `UPDATE ... SET ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMutation {
    pub(crate) table: Table,
    pub(crate) values: IndexMap<String, Expr>,
    pub(crate) where_: Vec<Condition>,
}

impl UpdateMutation {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            values: IndexMap::new(),
            where_: Vec::new(),
        }
    }

    /// Assign a literal (or raw, sub-query, condition) to a column.
    pub fn set(&self, column: impl Into<String>, value: impl Into<ValueExpr>) -> Self {
        self.set_expr(column, ValueExpr::into_inner(value.into()))
    }

    /// Assign any expression, including computed ones such as function calls.
    pub fn set_expr(&self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        let mut clone = self.clone();
        clone.values.insert(column.into(), value.into());
        clone
    }

    pub fn set_values<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ValueExpr>,
    {
        let mut clone = self.clone();
        for (k, v) in values {
            clone.values.insert(k.into(), ValueExpr::into_inner(v.into()));
        }
        clone
    }

    #[doc(alias = "where")]
    pub fn filter(&self, condition: impl Into<Option<Condition>>) -> Self {
        let mut clone = self.clone();
        clone.where_.extend(condition.into());
        clone
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn assignments(&self) -> &IndexMap<String, Expr> {
        &self.values
    }

    pub fn where_conditions(&self) -> &[Condition] {
        &self.where_
    }

    pub fn table_names(&self) -> Vec<String> {
        self.table.table_name().into_iter().collect()
    }
}

/// `DELETE FROM ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMutation {
    pub(crate) table: Table,
    pub(crate) where_: Vec<Condition>,
}

impl DeleteMutation {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            where_: Vec::new(),
        }
    }

    #[doc(alias = "where")]
    pub fn filter(&self, condition: impl Into<Option<Condition>>) -> Self {
        let mut clone = self.clone();
        clone.where_.extend(condition.into());
        clone
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn where_conditions(&self) -> &[Condition] {
        &self.where_
    }

    pub fn table_names(&self) -> Vec<String> {
        self.table.table_name().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::statements as q;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_values_and_select_are_exclusive() {
        let with_values = q::insert("users")
            .values([[("id", Value::from(1))]])
            .unwrap();
        let err = with_values.select(q::select().from("other"), None).unwrap_err();
        assert_eq!(err.to_string(), "values already set");

        let with_select = q::insert("users")
            .select(q::select().from("other"), None)
            .unwrap();
        let err = with_select
            .values([[("id", Value::from(1))]])
            .unwrap_err();
        assert_eq!(err.to_string(), "select already set");
    }

    #[test]
    fn test_insert_values_accumulate() {
        let insert = q::insert("users")
            .values([[("id", 1)]])
            .unwrap()
            .values([[("id", 2)]])
            .unwrap();
        assert_eq!(insert.rows().map(|r| r.len()), Some(2));
        assert_eq!(insert.clear_values().rows(), None);
    }

    #[test]
    fn test_update_set_keeps_order_and_overwrites() {
        let update = q::update("users")
            .set("name", "a")
            .set("age", 3)
            .set("name", "b");
        let keys: Vec<&str> = update.assignments().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert_eq!(
            update.assignments()["name"],
            Expr::Value(Value::from("b"))
        );
    }

    #[test]
    fn test_mutation_table_names() {
        assert_eq!(q::insert("table").table_names(), vec!["table"]);
        assert_eq!(q::update("table").table_names(), vec!["table"]);
        assert_eq!(q::delete("table").table_names(), vec!["table"]);
        let insert = q::insert("backup")
            .select(q::select().from("users"), None)
            .unwrap();
        assert_eq!(insert.table_names(), vec!["backup", "users"]);
    }
}
