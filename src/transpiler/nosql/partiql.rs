//! PartiQL statements for DynamoDB's ExecuteStatement API.
//!
//! Identifiers are emitted bare and string literals single-quoted. NULL checks
//! become `IS MISSING`, and LIKE patterns map to `begins_with`/`contains`.

use crate::ast::{
    Condition, DeleteMutation, Expr, InsertMutation, SelectQuery, Table, UpdateMutation, Value,
};
use crate::error::{QirError, QirResult};
use crate::transpiler::nosql::{LikePattern, validate_select};
use crate::transpiler::target::QueryTarget;

const TARGET: &str = "DynamoDB PartiQL";

/// Functions DynamoDB spells in lowercase.
const LOWERCASE_FUNCTIONS: &[&str] = &[
    "SIZE",
    "ATTRIBUTE_EXISTS",
    "ATTRIBUTE_NOT_EXISTS",
    "BEGINS_WITH",
    "CONTAINS",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PartiqlTarget;

impl PartiqlTarget {
    pub fn new() -> Self {
        Self
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn table_name(table: &Table) -> QirResult<String> {
    table
        .table_name()
        .ok_or_else(|| QirError::missing("DynamoDB PartiQL requires a table name"))
}

/// Literal in PartiQL syntax; lists and maps nest.
pub fn format_value(value: &Value) -> QirResult<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => Value::format_float(*f),
        Value::String(s) => quote(s),
        Value::Date(d) => quote(&Value::iso_date(d)),
        Value::Bytes(_) => {
            return Err(QirError::unsupported(
                TARGET,
                "DynamoDB PartiQL does not support binary values",
            ));
        }
        Value::List(items) => {
            let items = items.iter().map(format_value).collect::<QirResult<Vec<_>>>()?;
            format!("[{}]", items.join(", "))
        }
        Value::Map(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| Ok(format!("{}: {}", quote(k), format_value(v)?)))
                .collect::<QirResult<Vec<_>>>()?;
            format!("{{{}}}", entries.join(", "))
        }
    })
}

/// An expression in identifier position.
fn compile_expression(expr: &Expr) -> QirResult<String> {
    match expr {
        Expr::Column(name) => Ok(name.clone()),
        Expr::Value(v) => format_value(v),
        Expr::Raw(v) => Ok(v.to_plain_string()),
        Expr::Function(call) => {
            let args = call
                .args
                .iter()
                .map(compile_value)
                .collect::<QirResult<Vec<_>>>()?;
            let upper = call.name.to_uppercase();
            let name = if LOWERCASE_FUNCTIONS.contains(&upper.as_str()) {
                upper.to_lowercase()
            } else {
                call.name.clone()
            };
            Ok(format!("{}({})", name, args.join(", ")))
        }
        Expr::Operation(op) => {
            let args = op
                .args
                .iter()
                .map(compile_expression)
                .collect::<QirResult<Vec<_>>>()?;
            Ok(format!("({})", args.join(&format!(" {} ", op.operator))))
        }
        Expr::Condition(condition) => compile_condition(condition),
        Expr::SubQuery(_) => Err(QirError::unsupported(
            TARGET,
            "DynamoDB PartiQL does not support subqueries",
        )),
    }
}

/// An expression in value position: plain text is a string literal.
fn compile_value(expr: &Expr) -> QirResult<String> {
    match expr {
        Expr::Column(text) => Ok(quote(text)),
        other => compile_expression(other),
    }
}

fn compile_values(values: &[Expr]) -> QirResult<String> {
    Ok(values
        .iter()
        .map(compile_value)
        .collect::<QirResult<Vec<_>>>()?
        .join(", "))
}

fn compile_condition(condition: &Condition) -> QirResult<String> {
    Ok(match condition {
        Condition::Binary {
            key,
            value,
            operator,
        } => format!(
            "{} {} {}",
            compile_expression(key)?,
            partiql_operator(operator.as_str()),
            compile_value(value)?
        ),
        Condition::Logical {
            conditions,
            operator,
        } => {
            let parts = conditions
                .iter()
                .map(compile_condition)
                .collect::<QirResult<Vec<_>>>()?;
            format!("({})", parts.join(&format!(" {} ", operator)))
        }
        Condition::Between { key, from, to } => format!(
            "{} BETWEEN {} AND {}",
            compile_expression(key)?,
            compile_value(from)?,
            compile_value(to)?
        ),
        Condition::In { key, values } => {
            format!("{} IN ({})", compile_expression(key)?, compile_values(values)?)
        }
        Condition::NotIn { key, values } => {
            format!("NOT ({} IN ({}))", compile_expression(key)?, compile_values(values)?)
        }
        Condition::Null { key, is_null } => format!(
            "{} IS {}MISSING",
            compile_expression(key)?,
            if *is_null { "" } else { "NOT " }
        ),
        Condition::Like {
            key,
            pattern,
            is_like,
        } => {
            let key = compile_expression(key)?;
            let negation = if *is_like { "" } else { "NOT " };
            match LikePattern::classify(pattern) {
                LikePattern::Contains(term) => format!("{}contains({}, {})", negation, key, quote(term)),
                LikePattern::BeginsWith(term) => {
                    format!("{}begins_with({}, {})", negation, key, quote(term))
                }
                LikePattern::Exact(term) => {
                    format!("{} {} {}", key, if *is_like { "=" } else { "<>" }, quote(term))
                }
            }
        }
        Condition::ColumnComparison {
            left,
            right,
            operator,
        } => format!(
            "{} {} {}",
            compile_expression(left)?,
            partiql_operator(operator.as_str()),
            compile_expression(right)?
        ),
        Condition::Not(inner) => format!("NOT ({})", compile_condition(inner)?),
    })
}

fn partiql_operator(operator: &str) -> &str {
    if operator == "!=" { "<>" } else { operator }
}

fn compile_where(conditions: &[Condition]) -> QirResult<String> {
    Ok(conditions
        .iter()
        .map(compile_condition)
        .collect::<QirResult<Vec<_>>>()?
        .join(" AND "))
}

impl QueryTarget for PartiqlTarget {
    type Output = String;

    fn name(&self) -> &'static str {
        TARGET
    }

    fn compile_select(&self, query: &SelectQuery) -> QirResult<String> {
        validate_select(query, TARGET)?;
        let columns = if query.fields().is_empty() {
            "*".to_string()
        } else {
            query
                .fields()
                .iter()
                .map(|f| {
                    let name = compile_expression(&f.name)?;
                    Ok(match &f.alias {
                        Some(alias) => format!("{} AS {}", name, alias),
                        None => name,
                    })
                })
                .collect::<QirResult<Vec<_>>>()?
                .join(", ")
        };
        let table = query
            .table()
            .ok_or_else(|| QirError::missing("DynamoDB PartiQL requires a table name"))?;

        let mut sql = format!("SELECT {} FROM {}", columns, table_name(table)?);
        if let Some(alias) = &table.alias {
            sql.push_str(&format!(" AS {}", alias));
        }
        if !query.where_conditions().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile_where(query.where_conditions())?);
        }
        if !query.order_by_items().is_empty() {
            let orders = query
                .order_by_items()
                .iter()
                .map(|o| Ok(format!("{} {}", compile_expression(&o.field)?, o.direction.as_str())))
                .collect::<QirResult<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }
        if let Some(limit) = query.limit_value() {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        Ok(sql)
    }

    /// One `INSERT ... VALUE` per row, joined by `;\n` for batch execution.
    fn compile_insert(&self, mutation: &InsertMutation) -> QirResult<String> {
        let table = table_name(mutation.table())?;
        let rows = match mutation.rows() {
            Some(rows) if !rows.is_empty() => rows,
            _ if mutation.select_source().is_some() => {
                return Err(QirError::unsupported(
                    TARGET,
                    "DynamoDB PartiQL does not support INSERT ... SELECT",
                ));
            }
            _ => return Err(QirError::missing("INSERT requires values")),
        };
        let statements = rows
            .iter()
            .map(|row| {
                let entries = row
                    .iter()
                    .map(|(k, v)| Ok(format!("{}: {}", quote(k), format_value(v)?)))
                    .collect::<QirResult<Vec<_>>>()?;
                Ok(format!("INSERT INTO {} VALUE {{{}}}", table, entries.join(", ")))
            })
            .collect::<QirResult<Vec<_>>>()?;
        Ok(statements.join(";\n"))
    }

    fn compile_update(&self, mutation: &UpdateMutation) -> QirResult<String> {
        let table = table_name(mutation.table())?;
        if mutation.assignments().is_empty() {
            return Err(QirError::missing("UPDATE requires at least one value to set"));
        }
        let assignments = mutation
            .assignments()
            .iter()
            .map(|(k, v)| Ok(format!("{} = {}", k, compile_value(v)?)))
            .collect::<QirResult<Vec<_>>>()?;
        if mutation.where_conditions().is_empty() {
            return Err(QirError::missing(
                "DynamoDB UPDATE requires a WHERE clause with the primary key",
            ));
        }
        Ok(format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            assignments.join(", "),
            compile_where(mutation.where_conditions())?
        ))
    }

    fn compile_delete(&self, mutation: &DeleteMutation) -> QirResult<String> {
        let table = table_name(mutation.table())?;
        if mutation.where_conditions().is_empty() {
            return Err(QirError::missing(
                "DynamoDB DELETE requires a WHERE clause with the primary key",
            ));
        }
        Ok(format!(
            "DELETE FROM {} WHERE {}",
            table,
            compile_where(mutation.where_conditions())?
        ))
    }
}
