//! JSON wire format of statements.

use crate::ast::{
    Condition, CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, Expr, InsertMutation,
    Join, JoinType, OrderBy, Row, SelectField, SelectQuery, SortOrder, Statement, Table,
    TableSource, UnionQuery, UnionType, UpdateMutation,
};
use crate::codec::expr_from_json;
use crate::codec::json::{condition_from_json, condition_to_json, value_from_json, value_to_json};
use crate::error::{QirError, QirResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

pub const SELECT_TYPE: &str = "SelectQuery";
pub const INSERT_TYPE: &str = "InsertMutation";
pub const UPDATE_TYPE: &str = "UpdateMutation";
pub const DELETE_TYPE: &str = "DeleteMutation";
pub const CTAS_TYPE: &str = "CreateTableAsSelect";
pub const CVAS_TYPE: &str = "CreateViewAsSelect";

fn table_tag() -> String {
    "Table".to_string()
}

fn join_tag() -> String {
    "Join".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct TableJson {
    #[serde(rename = "type", default = "table_tag")]
    kind: String,
    source: Json,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JoinJson {
    #[serde(rename = "type", default = "join_tag")]
    kind: String,
    table: TableJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Json>,
    #[serde(rename = "joinType", default)]
    join_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldJson {
    name: Json,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderJson {
    field: Json,
    #[serde(default)]
    direction: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UnionJson {
    #[serde(rename = "type")]
    union_type: String,
    query: SelectJson,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectJson {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    tables: Vec<TableJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    union_queries: Vec<UnionJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    joins: Vec<JoinJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldJson>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    where_: Vec<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    having: Vec<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<OrderJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InsertJson {
    #[serde(rename = "type")]
    kind: String,
    table: TableJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<IndexMap<String, Json>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    select: Option<(SelectJson, Option<Vec<String>>)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UpdateJson {
    #[serde(rename = "type")]
    kind: String,
    table: TableJson,
    #[serde(default)]
    values: IndexMap<String, Json>,
    #[serde(rename = "where", default)]
    where_: Vec<Json>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DeleteJson {
    #[serde(rename = "type")]
    kind: String,
    table: TableJson,
    #[serde(rename = "where", default)]
    where_: Vec<Json>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTableJson {
    #[serde(rename = "type")]
    kind: String,
    table_name: String,
    select: SelectJson,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateViewJson {
    #[serde(rename = "type")]
    kind: String,
    view_name: String,
    select: SelectJson,
    #[serde(default)]
    or_replace: bool,
}

fn conditions_to_json(conditions: &[Condition]) -> Vec<Json> {
    conditions.iter().map(condition_to_json).collect()
}

fn conditions_from_json(items: &[Json]) -> QirResult<Vec<Condition>> {
    items.iter().map(condition_from_json).collect()
}

fn table_to_wire(table: &Table) -> TableJson {
    let source = match &table.source {
        TableSource::Name(name) => Json::String(name.clone()),
        TableSource::Select(query) => select_to_value(query),
    };
    TableJson {
        kind: table_tag(),
        source,
        alias: table.alias.clone(),
    }
}

fn table_from_wire(wire: TableJson) -> QirResult<Table> {
    let source = match wire.source {
        Json::String(name) => TableSource::Name(name),
        json if json.get("type").and_then(Json::as_str) == Some(SELECT_TYPE) => {
            TableSource::Select(Box::new(SelectQuery::from_json(&json)?))
        }
        other => {
            return Err(QirError::invalid(format!("Invalid table source: {}", other)));
        }
    };
    Ok(Table {
        source,
        alias: wire.alias,
    })
}

fn select_to_wire(query: &SelectQuery) -> SelectJson {
    SelectJson {
        kind: SELECT_TYPE.to_string(),
        tables: query.tables.iter().map(table_to_wire).collect(),
        union_queries: query
            .unions
            .iter()
            .map(|u| UnionJson {
                union_type: u.union_type.as_str().to_string(),
                query: select_to_wire(&u.query),
            })
            .collect(),
        joins: query
            .joins
            .iter()
            .map(|j| JoinJson {
                kind: join_tag(),
                table: table_to_wire(&j.table),
                condition: j.condition.as_ref().map(condition_to_json),
                join_type: Some(j.join_type.as_str().to_string()),
            })
            .collect(),
        fields: query
            .fields
            .iter()
            .map(|f| FieldJson {
                name: Json::String(f.name.serialize()),
                alias: f.alias.clone(),
            })
            .collect(),
        where_: conditions_to_json(&query.where_),
        having: conditions_to_json(&query.having),
        order_by: query
            .order_by
            .iter()
            .map(|o| OrderJson {
                field: Json::String(o.field.serialize()),
                direction: Some(o.direction.as_str().to_string()),
            })
            .collect(),
        group_by: query
            .group_by
            .iter()
            .map(|g| Json::String(g.serialize()))
            .collect(),
        limit: query.limit,
        offset: query.offset,
    }
}

fn select_from_wire(wire: SelectJson) -> QirResult<SelectQuery> {
    let unions = wire
        .union_queries
        .into_iter()
        .map(|u| {
            let union_type = UnionType::parse(&u.union_type)
                .ok_or_else(|| QirError::unknown_type("union", u.union_type.clone()))?;
            Ok(UnionQuery {
                query: select_from_wire(u.query)?,
                union_type,
            })
        })
        .collect::<QirResult<Vec<_>>>()?;
    let joins = wire
        .joins
        .into_iter()
        .map(|j| {
            let join_type = match j.join_type.as_deref() {
                None => JoinType::Inner,
                Some(t) => JoinType::parse(t).ok_or_else(|| QirError::unknown_type("join", t))?,
            };
            Ok(Join {
                table: table_from_wire(j.table)?,
                condition: j.condition.as_ref().map(condition_from_json).transpose()?,
                join_type,
            })
        })
        .collect::<QirResult<Vec<_>>>()?;
    let fields = wire
        .fields
        .iter()
        .map(|f| {
            Ok(SelectField {
                name: expr_from_json(&f.name)?,
                alias: f.alias.clone(),
            })
        })
        .collect::<QirResult<Vec<_>>>()?;
    let order_by = wire
        .order_by
        .iter()
        .map(|o| {
            let direction = match o.direction.as_deref() {
                None => SortOrder::Asc,
                Some(d) => SortOrder::parse(d)
                    .ok_or_else(|| QirError::invalid(format!("Invalid sort direction: {}", d)))?,
            };
            Ok(OrderBy {
                field: expr_from_json(&o.field)?,
                direction,
            })
        })
        .collect::<QirResult<Vec<_>>>()?;
    Ok(SelectQuery {
        tables: wire
            .tables
            .into_iter()
            .map(table_from_wire)
            .collect::<QirResult<_>>()?,
        joins,
        fields,
        where_: conditions_from_json(&wire.where_)?,
        having: conditions_from_json(&wire.having)?,
        order_by,
        group_by: wire
            .group_by
            .iter()
            .map(expr_from_json)
            .collect::<QirResult<_>>()?,
        limit: wire.limit,
        offset: wire.offset,
        unions,
    })
}

fn select_to_value(query: &SelectQuery) -> Json {
    to_value(select_to_wire(query))
}

/// The wire structs hold only strings, numbers and JSON values, so
/// converting them cannot fail.
fn to_value(wire: impl Serialize) -> Json {
    serde_json::to_value(wire).unwrap_or(Json::Null)
}

/// An update value slot: strings are classified like any expression,
/// bare JSON scalars are literals.
fn assignment_from_json(json: &Json) -> QirResult<Expr> {
    match json {
        Json::String(text) => Expr::deserialize(text),
        other => Expr::deserialize_value(other),
    }
}

impl SelectQuery {
    pub fn to_json(&self) -> Json {
        select_to_value(self)
    }

    pub fn from_json(json: &Json) -> QirResult<SelectQuery> {
        select_from_wire(serde_json::from_value(json.clone())?)
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl InsertMutation {
    pub fn to_json(&self) -> Json {
        let values = self.rows.as_ref().map(|rows| {
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|(k, v)| (k.clone(), value_to_json(v)))
                        .collect::<IndexMap<_, _>>()
                })
                .collect()
        });
        to_value(InsertJson {
            kind: INSERT_TYPE.to_string(),
            table: table_to_wire(&self.table),
            values,
            select: self
                .select
                .as_ref()
                .map(|(query, columns)| (select_to_wire(query), columns.clone())),
        })
    }

    pub fn from_json(json: &Json) -> QirResult<InsertMutation> {
        let wire: InsertJson = serde_json::from_value(json.clone())?;
        if wire.values.is_some() && wire.select.is_some() {
            return Err(QirError::build("insert cannot have both values and select"));
        }
        let rows = wire.values.map(|rows| {
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|(k, v)| (k.clone(), value_from_json(v)))
                        .collect::<Row>()
                })
                .collect()
        });
        let select = match wire.select {
            Some((query, columns)) => Some((select_from_wire(query)?, columns)),
            None => None,
        };
        Ok(InsertMutation {
            table: table_from_wire(wire.table)?,
            rows,
            select,
        })
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl UpdateMutation {
    pub fn to_json(&self) -> Json {
        to_value(UpdateJson {
            kind: UPDATE_TYPE.to_string(),
            table: table_to_wire(&self.table),
            values: self
                .values
                .iter()
                .map(|(k, v)| (k.clone(), Json::String(v.serialize())))
                .collect(),
            where_: conditions_to_json(&self.where_),
        })
    }

    pub fn from_json(json: &Json) -> QirResult<UpdateMutation> {
        let wire: UpdateJson = serde_json::from_value(json.clone())?;
        let values = wire
            .values
            .iter()
            .map(|(k, v)| Ok((k.clone(), assignment_from_json(v)?)))
            .collect::<QirResult<IndexMap<_, _>>>()?;
        Ok(UpdateMutation {
            table: table_from_wire(wire.table)?,
            values,
            where_: conditions_from_json(&wire.where_)?,
        })
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl DeleteMutation {
    pub fn to_json(&self) -> Json {
        to_value(DeleteJson {
            kind: DELETE_TYPE.to_string(),
            table: table_to_wire(&self.table),
            where_: conditions_to_json(&self.where_),
        })
    }

    pub fn from_json(json: &Json) -> QirResult<DeleteMutation> {
        let wire: DeleteJson = serde_json::from_value(json.clone())?;
        Ok(DeleteMutation {
            table: table_from_wire(wire.table)?,
            where_: conditions_from_json(&wire.where_)?,
        })
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl CreateTableAsSelect {
    pub fn to_json(&self) -> Json {
        to_value(CreateTableJson {
            kind: CTAS_TYPE.to_string(),
            table_name: self.table_name.clone(),
            select: select_to_wire(&self.select),
        })
    }

    pub fn from_json(json: &Json) -> QirResult<CreateTableAsSelect> {
        let wire: CreateTableJson = serde_json::from_value(json.clone())?;
        Ok(CreateTableAsSelect::new(
            wire.table_name,
            select_from_wire(wire.select)?,
        ))
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl CreateViewAsSelect {
    pub fn to_json(&self) -> Json {
        to_value(CreateViewJson {
            kind: CVAS_TYPE.to_string(),
            view_name: self.view_name.clone(),
            select: select_to_wire(&self.select),
            or_replace: self.or_replace,
        })
    }

    pub fn from_json(json: &Json) -> QirResult<CreateViewAsSelect> {
        let wire: CreateViewJson = serde_json::from_value(json.clone())?;
        Ok(CreateViewAsSelect::new(
            wire.view_name,
            select_from_wire(wire.select)?,
            wire.or_replace,
        ))
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }
}

impl Statement {
    pub fn to_json(&self) -> Json {
        match self {
            Statement::Select(s) => s.to_json(),
            Statement::Insert(s) => s.to_json(),
            Statement::Update(s) => s.to_json(),
            Statement::Delete(s) => s.to_json(),
            Statement::CreateTableAs(s) => s.to_json(),
            Statement::CreateViewAs(s) => s.to_json(),
        }
    }

    pub fn serialize(&self) -> String {
        self.to_json().to_string()
    }

    /// Read back a serialized statement of any kind. Every failure is
    /// reported as a parse error naming the cause.
    pub fn deserialize(text: &str) -> QirResult<Statement> {
        Self::parse(text).map_err(|e| match e {
            QirError::Deserialize(_) => e,
            other => QirError::Deserialize(other.to_string()),
        })
    }

    fn parse(text: &str) -> QirResult<Statement> {
        let json: Json = serde_json::from_str(text)?;
        let kind = json.get("type").and_then(Json::as_str).unwrap_or_default();
        tracing::debug!(kind, "deserializing statement");
        Ok(match kind {
            SELECT_TYPE => Statement::Select(SelectQuery::from_json(&json)?),
            INSERT_TYPE => Statement::Insert(InsertMutation::from_json(&json)?),
            UPDATE_TYPE => Statement::Update(UpdateMutation::from_json(&json)?),
            DELETE_TYPE => Statement::Delete(DeleteMutation::from_json(&json)?),
            CTAS_TYPE => Statement::CreateTableAs(CreateTableAsSelect::from_json(&json)?),
            CVAS_TYPE => Statement::CreateViewAs(CreateViewAsSelect::from_json(&json)?),
            other => return Err(QirError::unknown_type("statement", other)),
        })
    }
}
