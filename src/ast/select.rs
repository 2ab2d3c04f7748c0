use crate::ast::{Condition, Expr, Join, JoinType, Table, TableSource};

/// A projected column with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectField {
    pub name: Expr,
    pub alias: Option<String>,
}

impl SelectField {
    pub fn new(name: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: Expr,
    pub direction: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnionType {
    #[default]
    Union,
    UnionAll,
}

impl UnionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionType::Union => "UNION",
            UnionType::UnionAll => "UNION ALL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNION" => Some(UnionType::Union),
            "UNION ALL" | "UNION_ALL" => Some(UnionType::UnionAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionQuery {
    pub query: SelectQuery,
    pub union_type: UnionType,
}

/// Immutable SELECT statement.
///
/// Every builder method borrows the receiver and returns an independent copy,
/// so a statement handed out once never changes underneath its holder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub(crate) tables: Vec<Table>,
    pub(crate) joins: Vec<Join>,
    pub(crate) fields: Vec<SelectField>,
    pub(crate) where_: Vec<Condition>,
    pub(crate) having: Vec<Condition>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) group_by: Vec<Expr>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) unions: Vec<UnionQuery>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        f(&mut clone);
        clone
    }

    /// Replace the FROM list with a single source.
    pub fn from(&self, source: impl Into<TableSource>) -> Self {
        let table = Table::new(source);
        self.with(|q| q.tables = vec![table])
    }

    pub fn from_as(&self, source: impl Into<TableSource>, alias: impl Into<String>) -> Self {
        let table = Table::aliased(source, alias);
        self.with(|q| q.tables = vec![table])
    }

    pub fn join(
        &self,
        table: impl Into<Table>,
        condition: impl Into<Option<Condition>>,
        join_type: JoinType,
    ) -> Self {
        let join = Join {
            table: table.into(),
            condition: condition.into(),
            join_type,
        };
        self.with(|q| q.joins.push(join))
    }

    pub fn inner_join(&self, table: impl Into<Table>, condition: impl Into<Option<Condition>>) -> Self {
        self.join(table, condition, JoinType::Inner)
    }

    pub fn left_join(&self, table: impl Into<Table>, condition: impl Into<Option<Condition>>) -> Self {
        self.join(table, condition, JoinType::Left)
    }

    pub fn right_join(&self, table: impl Into<Table>, condition: impl Into<Option<Condition>>) -> Self {
        self.join(table, condition, JoinType::Right)
    }

    pub fn full_join(&self, table: impl Into<Table>, condition: impl Into<Option<Condition>>) -> Self {
        self.join(table, condition, JoinType::Full)
    }

    pub fn cross_join(&self, table: impl Into<Table>) -> Self {
        self.join(table, None::<Condition>, JoinType::Cross)
    }

    pub fn field(&self, name: impl Into<Expr>) -> Self {
        self.add_fields([SelectField::new(name)])
    }

    pub fn field_as(&self, name: impl Into<Expr>, alias: impl Into<String>) -> Self {
        self.add_fields([SelectField::aliased(name, alias)])
    }

    pub fn add_fields(&self, fields: impl IntoIterator<Item = SelectField>) -> Self {
        let fields: Vec<SelectField> = fields.into_iter().collect();
        self.with(|q| q.fields.extend(fields))
    }

    /// Replace the projection.
    pub fn set_fields(&self, fields: impl IntoIterator<Item = SelectField>) -> Self {
        self.remove_fields().add_fields(fields)
    }

    pub fn remove_fields(&self) -> Self {
        self.with(|q| q.fields.clear())
    }

    /// Append a WHERE condition. `None` leaves the query unchanged.
    #[doc(alias = "where")]
    pub fn filter(&self, condition: impl Into<Option<Condition>>) -> Self {
        match condition.into() {
            Some(c) => self.with(|q| q.where_.push(c)),
            None => self.clone(),
        }
    }

    pub fn remove_where(&self) -> Self {
        self.with(|q| q.where_.clear())
    }

    pub fn having(&self, condition: impl Into<Option<Condition>>) -> Self {
        match condition.into() {
            Some(c) => self.with(|q| q.having.push(c)),
            None => self.clone(),
        }
    }

    pub fn remove_having(&self) -> Self {
        self.with(|q| q.having.clear())
    }

    pub fn limit(&self, limit: u64) -> Self {
        self.with(|q| q.limit = Some(limit))
    }

    pub fn clear_limit(&self) -> Self {
        self.with(|q| q.limit = None)
    }

    pub fn offset(&self, offset: u64) -> Self {
        self.with(|q| q.offset = Some(offset))
    }

    pub fn clear_offset(&self) -> Self {
        self.with(|q| q.offset = None)
    }

    pub fn order_by(&self, field: impl Into<Expr>, direction: SortOrder) -> Self {
        let order = OrderBy {
            field: field.into(),
            direction,
        };
        self.with(|q| q.order_by.push(order))
    }

    pub fn remove_order_by(&self) -> Self {
        self.with(|q| q.order_by.clear())
    }

    pub fn group_by<I, E>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let fields: Vec<Expr> = fields.into_iter().map(Into::into).collect();
        self.with(|q| q.group_by.extend(fields))
    }

    pub fn remove_group_by(&self) -> Self {
        self.with(|q| q.group_by.clear())
    }

    pub fn union(&self, query: SelectQuery) -> Self {
        self.union_with(query, UnionType::Union)
    }

    pub fn union_all(&self, query: SelectQuery) -> Self {
        self.union_with(query, UnionType::UnionAll)
    }

    pub fn union_with(&self, query: SelectQuery, union_type: UnionType) -> Self {
        self.with(|q| q.unions.push(UnionQuery { query, union_type }))
    }

    pub fn fields(&self) -> &[SelectField] {
        &self.fields
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The primary FROM target.
    pub fn table(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_conditions(&self) -> &[Condition] {
        &self.where_
    }

    pub fn having_conditions(&self) -> &[Condition] {
        &self.having
    }

    pub fn order_by_items(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn group_by_items(&self) -> &[Expr] {
        &self.group_by
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn union_queries(&self) -> &[UnionQuery] {
        &self.unions
    }

    /// Tables read by this query: FROM targets, join targets and every union
    /// tail, deduplicated in first-seen order.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let own = self
            .tables
            .iter()
            .filter_map(Table::table_name)
            .chain(self.joins.iter().filter_map(Join::table_name));
        let unions = self.unions.iter().flat_map(|u| u.query.table_names());
        for name in own.chain(unions) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
