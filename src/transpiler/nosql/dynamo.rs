//! Native DynamoDB requests: Query, Scan, PutItem, UpdateItem, DeleteItem
//! and BatchWriteItem inputs, serialized in the AWS JSON shape.
//!
//! Every attribute name goes through a `#nN` placeholder and every literal
//! through a `:vN` placeholder, both shared across the whole request.

use crate::ast::{
    CompareOp, Condition, DeleteMutation, Expr, InsertMutation, SelectQuery, SortOrder, Table,
    UpdateMutation, Value,
};
use crate::error::{QirError, QirResult};
use crate::transpiler::nosql::attribute::{AttributeMap, AttributeValue, ExpressionContext};
use crate::transpiler::nosql::{LikePattern, validate_select};
use crate::transpiler::target::QueryTarget;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const TARGET: &str = "DynamoDB";

/// Key schema and read settings of the native target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DynamoOptions {
    /// Conditions on this attribute may drive a Query instead of a Scan.
    pub partition_key: Option<String>,
    pub sort_key: Option<String>,
    /// GSI or LSI name.
    pub index_name: Option<String>,
    pub consistent_read: bool,
    /// Always emit a Scan, even when key conditions are present.
    pub force_scan: bool,
}

impl DynamoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_key(mut self, name: impl Into<String>) -> Self {
        self.partition_key = Some(name.into());
        self
    }

    pub fn sort_key(mut self, name: impl Into<String>) -> Self {
        self.sort_key = Some(name.into());
        self
    }

    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn consistent_read(mut self, enabled: bool) -> Self {
        self.consistent_read = enabled;
        self
    }

    pub fn force_scan(mut self, enabled: bool) -> Self {
        self.force_scan = enabled;
        self
    }

    fn is_key(&self, column: &str) -> bool {
        self.partition_key.as_deref() == Some(column) || self.sort_key.as_deref() == Some(column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    pub key_condition_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    pub table_name: String,
    pub item: AttributeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemInput {
    pub table_name: String,
    pub key: AttributeMap,
    pub update_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<AttributeMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemInput {
    pub table_name: String,
    pub key: AttributeMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<AttributeMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub item: AttributeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub key: AttributeMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    pub request_items: IndexMap<String, Vec<WriteRequest>>,
}

/// One compiled request. Serializes as the bare input object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DynamoRequest {
    Query(QueryInput),
    Scan(ScanInput),
    PutItem(PutItemInput),
    UpdateItem(UpdateItemInput),
    DeleteItem(DeleteItemInput),
    BatchWriteItem(BatchWriteItemInput),
}

impl DynamoRequest {
    /// The DynamoDB API operation this input is meant for.
    pub fn kind(&self) -> &'static str {
        match self {
            DynamoRequest::Query(_) => "Query",
            DynamoRequest::Scan(_) => "Scan",
            DynamoRequest::PutItem(_) => "PutItem",
            DynamoRequest::UpdateItem(_) => "UpdateItem",
            DynamoRequest::DeleteItem(_) => "DeleteItem",
            DynamoRequest::BatchWriteItem(_) => "BatchWriteItem",
        }
    }
}

/// Compiles statements into native DynamoDB request inputs.
#[derive(Debug, Clone, Default)]
pub struct DynamoTarget {
    options: DynamoOptions,
}

impl DynamoTarget {
    pub fn new(options: DynamoOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DynamoOptions {
        &self.options
    }

    /// Column of a single-column predicate that may take part in a key lookup.
    fn condition_column(condition: &Condition) -> Option<String> {
        match condition {
            Condition::Binary { key, .. }
            | Condition::Between { key, .. }
            | Condition::In { key, .. }
            | Condition::Null { key, .. }
            | Condition::Like { key, .. } => Some(key.column_name()),
            _ => None,
        }
    }

    /// Equality on the partition or sort key, usable as part of `Key`.
    fn key_equality<'a>(&self, condition: &'a Condition) -> Option<(String, &'a Expr)> {
        match condition {
            Condition::Binary {
                key,
                value,
                operator: CompareOp::Eq,
            } => {
                let column = key.column_name();
                self.options.is_key(&column).then_some((column, value))
            }
            _ => None,
        }
    }

    /// Build `Key` from the key equalities in `conditions`. The partition key
    /// and any configured sort key must both be present.
    fn extract_key(&self, conditions: &[Condition], operation: &str) -> QirResult<AttributeMap> {
        let Some(partition_key) = self.options.partition_key.as_deref() else {
            return Err(QirError::missing(format!(
                "DynamoDB {} requires a configured partition key",
                operation
            )));
        };
        let mut key = AttributeMap::new();
        for condition in conditions {
            if let Some((column, value)) = self.key_equality(condition) {
                key.insert(column, AttributeValue::from(&extract_value(value)?));
            }
        }
        let required = std::iter::once(partition_key).chain(self.options.sort_key.as_deref());
        for name in required {
            if !key.contains_key(name) {
                return Err(QirError::missing(format!(
                    "DynamoDB {} requires an equality condition on key '{}'",
                    operation, name
                )));
            }
        }
        Ok(key)
    }

    /// Conditions left over once key equalities are removed.
    fn condition_expression(
        &self,
        conditions: &[Condition],
        ctx: &mut ExpressionContext,
    ) -> QirResult<Option<String>> {
        let parts = conditions
            .iter()
            .filter(|c| self.key_equality(c).is_none())
            .map(|c| compile_condition(c, ctx))
            .collect::<QirResult<Vec<_>>>()?;
        Ok((!parts.is_empty()).then(|| parts.join(" AND ")))
    }
}

fn table_name(table: &Table) -> QirResult<String> {
    table
        .table_name()
        .ok_or_else(|| QirError::missing("DynamoDB requires a table name"))
}

/// Literal carried by a value slot. Column text is taken as a string.
fn extract_value(expr: &Expr) -> QirResult<Value> {
    match expr {
        Expr::Value(v) | Expr::Raw(v) => Ok(v.clone()),
        Expr::Column(text) => Ok(Value::String(text.clone())),
        other => Err(QirError::unsupported(
            TARGET,
            format!(
                "DynamoDB does not support computed values: {}",
                other.serialize()
            ),
        )),
    }
}

fn compare_operator(operator: CompareOp) -> &'static str {
    match operator {
        CompareOp::Ne => "<>",
        other => other.as_str(),
    }
}

fn compile_values(values: &[Expr], ctx: &mut ExpressionContext) -> QirResult<String> {
    let placeholders = values
        .iter()
        .map(|v| Ok(ctx.add_value(&extract_value(v)?)))
        .collect::<QirResult<Vec<_>>>()?;
    Ok(placeholders.join(", "))
}

pub(crate) fn compile_condition(condition: &Condition, ctx: &mut ExpressionContext) -> QirResult<String> {
    let expression = match condition {
        Condition::Binary {
            key,
            value,
            operator,
        } => {
            let name = ctx.add_name(&key.column_name());
            let value = ctx.add_value(&extract_value(value)?);
            format!("{} {} {}", name, compare_operator(*operator), value)
        }
        Condition::Logical {
            conditions,
            operator,
        } => {
            let parts = conditions
                .iter()
                .map(|c| compile_condition(c, ctx))
                .collect::<QirResult<Vec<_>>>()?;
            format!("({})", parts.join(&format!(" {} ", operator)))
        }
        Condition::Between { key, from, to } => {
            let name = ctx.add_name(&key.column_name());
            let from = ctx.add_value(&extract_value(from)?);
            let to = ctx.add_value(&extract_value(to)?);
            format!("{} BETWEEN {} AND {}", name, from, to)
        }
        Condition::In { key, values } => {
            let name = ctx.add_name(&key.column_name());
            format!("{} IN ({})", name, compile_values(values, ctx)?)
        }
        Condition::NotIn { key, values } => {
            let name = ctx.add_name(&key.column_name());
            format!("NOT ({} IN ({}))", name, compile_values(values, ctx)?)
        }
        Condition::Null { key, is_null } => {
            let name = ctx.add_name(&key.column_name());
            if *is_null {
                format!("attribute_not_exists({})", name)
            } else {
                format!("attribute_exists({})", name)
            }
        }
        Condition::Like {
            key,
            pattern,
            is_like,
        } => {
            let name = ctx.add_name(&key.column_name());
            let negation = if *is_like { "" } else { "NOT " };
            match LikePattern::classify(pattern) {
                LikePattern::Contains(term) => {
                    let value = ctx.add_value(&Value::from(term));
                    format!("{}contains({}, {})", negation, name, value)
                }
                LikePattern::BeginsWith(term) => {
                    let value = ctx.add_value(&Value::from(term));
                    format!("{}begins_with({}, {})", negation, name, value)
                }
                LikePattern::Exact(term) => {
                    let value = ctx.add_value(&Value::from(term));
                    format!("{} {} {}", name, if *is_like { "=" } else { "<>" }, value)
                }
            }
        }
        Condition::ColumnComparison {
            left,
            right,
            operator,
        } => {
            let left = ctx.add_name(&left.column_name());
            let right = ctx.add_name(&right.column_name());
            format!("{} {} {}", left, compare_operator(*operator), right)
        }
        Condition::Not(inner) => format!("NOT ({})", compile_condition(inner, ctx)?),
    };
    Ok(expression)
}

impl QueryTarget for DynamoTarget {
    type Output = DynamoRequest;

    fn name(&self) -> &'static str {
        TARGET
    }

    fn compile_select(&self, query: &SelectQuery) -> QirResult<DynamoRequest> {
        validate_select(query, TARGET)?;
        let table = query
            .table()
            .ok_or_else(|| QirError::missing("DynamoDB requires a table name"))?;
        let table_name = table_name(table)?;

        let mut ctx = ExpressionContext::new();
        let mut key_conditions = Vec::new();
        let mut filter_conditions = Vec::new();
        let mut has_partition_condition = false;
        for condition in query.where_conditions() {
            let compiled = compile_condition(condition, &mut ctx)?;
            match Self::condition_column(condition) {
                Some(column) if self.options.is_key(&column) => {
                    if self.options.partition_key.as_deref() == Some(column.as_str()) {
                        has_partition_condition = true;
                    }
                    key_conditions.push(compiled);
                }
                _ => filter_conditions.push(compiled),
            }
        }

        let projection_expression = if query.fields().is_empty() {
            None
        } else {
            let names = query
                .fields()
                .iter()
                .map(|f| ctx.add_name(&f.name.column_name()))
                .collect::<Vec<_>>();
            Some(names.join(", "))
        };

        let can_query = !self.options.force_scan && has_partition_condition;
        let consistent_read = self.options.consistent_read.then_some(true);
        tracing::debug!(
            "DynamoDB select on '{}': {} key and {} filter conditions, {}",
            table_name,
            key_conditions.len(),
            filter_conditions.len(),
            if can_query { "Query" } else { "Scan" }
        );

        if can_query {
            let scan_index_forward = query
                .order_by_items()
                .first()
                .map(|o| o.direction == SortOrder::Asc);
            return Ok(DynamoRequest::Query(QueryInput {
                table_name,
                index_name: self.options.index_name.clone(),
                key_condition_expression: key_conditions.join(" AND "),
                filter_expression: (!filter_conditions.is_empty())
                    .then(|| filter_conditions.join(" AND ")),
                projection_expression,
                expression_attribute_names: ctx.names(),
                expression_attribute_values: ctx.values(),
                limit: query.limit_value(),
                scan_index_forward,
                consistent_read,
            }));
        }

        let all_conditions: Vec<String> = key_conditions.into_iter().chain(filter_conditions).collect();
        Ok(DynamoRequest::Scan(ScanInput {
            table_name,
            index_name: self.options.index_name.clone(),
            filter_expression: (!all_conditions.is_empty()).then(|| all_conditions.join(" AND ")),
            projection_expression,
            expression_attribute_names: ctx.names(),
            expression_attribute_values: ctx.values(),
            limit: query.limit_value(),
            consistent_read,
        }))
    }

    fn compile_insert(&self, mutation: &InsertMutation) -> QirResult<DynamoRequest> {
        let table_name = table_name(mutation.table())?;
        let rows = match mutation.rows() {
            Some(rows) if !rows.is_empty() => rows,
            _ if mutation.select_source().is_some() => {
                return Err(QirError::unsupported(
                    TARGET,
                    "DynamoDB does not support INSERT ... SELECT",
                ));
            }
            _ => return Err(QirError::missing("INSERT requires values")),
        };
        let items: Vec<AttributeMap> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(k, v)| (k.clone(), AttributeValue::from(v)))
                    .collect()
            })
            .collect();
        tracing::debug!("DynamoDB insert into '{}': {} item(s)", table_name, items.len());

        if let [item] = items.as_slice() {
            return Ok(DynamoRequest::PutItem(PutItemInput {
                table_name,
                item: item.clone(),
            }));
        }
        let requests = items
            .into_iter()
            .map(|item| WriteRequest {
                put_request: Some(PutRequest { item }),
                delete_request: None,
            })
            .collect();
        Ok(DynamoRequest::BatchWriteItem(BatchWriteItemInput {
            request_items: IndexMap::from([(table_name, requests)]),
        }))
    }

    fn compile_update(&self, mutation: &UpdateMutation) -> QirResult<DynamoRequest> {
        let table_name = table_name(mutation.table())?;
        if mutation.assignments().is_empty() {
            return Err(QirError::missing("UPDATE requires at least one value to set"));
        }
        let conditions = mutation.where_conditions();
        if conditions.is_empty() {
            return Err(QirError::missing(
                "DynamoDB UPDATE requires a WHERE clause with the key",
            ));
        }

        let mut ctx = ExpressionContext::new();
        let assignments = mutation
            .assignments()
            .iter()
            .map(|(column, value)| {
                let name = ctx.add_name(column);
                let value = ctx.add_value(&extract_value(value)?);
                Ok(format!("{} = {}", name, value))
            })
            .collect::<QirResult<Vec<_>>>()?;
        let key = self.extract_key(conditions, "UPDATE")?;
        let condition_expression = self.condition_expression(conditions, &mut ctx)?;
        tracing::debug!("DynamoDB update on '{}': {} assignment(s)", table_name, assignments.len());

        Ok(DynamoRequest::UpdateItem(UpdateItemInput {
            table_name,
            key,
            update_expression: format!("SET {}", assignments.join(", ")),
            condition_expression,
            expression_attribute_names: ctx.names(),
            expression_attribute_values: ctx.values(),
        }))
    }

    fn compile_delete(&self, mutation: &DeleteMutation) -> QirResult<DynamoRequest> {
        let table_name = table_name(mutation.table())?;
        let conditions = mutation.where_conditions();
        if conditions.is_empty() {
            return Err(QirError::missing(
                "DynamoDB DELETE requires a WHERE clause with the key",
            ));
        }

        let mut ctx = ExpressionContext::new();
        let key = self.extract_key(conditions, "DELETE")?;
        let condition_expression = self.condition_expression(conditions, &mut ctx)?;
        tracing::debug!("DynamoDB delete on '{}'", table_name);

        Ok(DynamoRequest::DeleteItem(DeleteItemInput {
            table_name,
            key,
            condition_expression,
            expression_attribute_names: ctx.names(),
            expression_attribute_values: ctx.values(),
        }))
    }
}
