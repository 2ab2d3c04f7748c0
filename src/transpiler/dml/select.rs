//! SELECT SQL generation.

use crate::ast::{Join, SelectField, SelectQuery, Table, TableSource};
use crate::error::QirResult;
use crate::transpiler::conditions::{render_condition, render_conjunction};
use crate::transpiler::expressions::{render_all, render_expr};
use crate::transpiler::options::{RenderContext, RenderOptions};
use std::borrow::Cow;

/// Alias given to a nested select that has none.
const DEFAULT_SUBQUERY_ALIAS: &str = "t";

/// Render a select, its joins and its union tails.
///
/// The select hook runs on every select rendered here, union tails and
/// nested sources included.
pub fn render_select(query: &SelectQuery, ctx: RenderContext<'_>) -> QirResult<String> {
    let query = match &ctx.options.transform_select {
        Some(hook) => Cow::Owned(hook(query.clone())),
        None => Cow::Borrowed(query),
    };

    let mut sql = format!("SELECT {}", render_fields(&query.fields, ctx)?);
    if !query.tables.is_empty() {
        let tables = query
            .tables
            .iter()
            .map(|t| render_table(t, ctx, true))
            .collect::<QirResult<Vec<_>>>()?;
        sql.push_str(" FROM ");
        sql.push_str(&tables.join(","));
    }

    if !query.joins.is_empty() {
        let joins = query
            .joins
            .iter()
            .map(|j| render_join(j, ctx))
            .collect::<QirResult<Vec<_>>>()?;
        sql.push(' ');
        sql.push_str(&joins.join(" "));
    }

    if !query.where_.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&render_conjunction(&query.where_, ctx)?);
    }

    if !query.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&render_all(&query.group_by, ctx)?.join(", "));
    }

    if !query.having.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&render_conjunction(&query.having, ctx)?);
    }

    if !query.order_by.is_empty() {
        let orders = query
            .order_by
            .iter()
            .map(|o| Ok(format!("{} {}", render_expr(&o.field, ctx)?, o.direction.as_str())))
            .collect::<QirResult<Vec<_>>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&orders.join(", "));
    }

    sql.push_str(&ctx.flavor.escape_limit_and_offset(query.limit, query.offset));

    for union in &query.unions {
        let tail = render_select(&union.query, ctx)?;
        sql = ctx.flavor.escape_union(union.union_type, &sql, &tail);
    }

    Ok(sql)
}

fn render_fields(fields: &[SelectField], ctx: RenderContext<'_>) -> QirResult<String> {
    if fields.is_empty() {
        return Ok("*".to_string());
    }
    let columns = fields
        .iter()
        .map(|f| {
            let name = render_expr(&f.name, ctx)?;
            Ok(match &f.alias {
                Some(alias) => format!("{} AS {}", name, ctx.flavor.escape_column(alias, false)),
                None => name,
            })
        })
        .collect::<QirResult<Vec<_>>>()?;
    Ok(columns.join(", "))
}

fn render_join(join: &Join, ctx: RenderContext<'_>) -> QirResult<String> {
    let mut sql = format!(
        "{} JOIN {}",
        join.join_type.as_str(),
        render_table(&join.table, ctx, true)?
    );
    if let Some(condition) = &join.condition {
        sql.push_str(" ON ");
        sql.push_str(&render_condition(condition, ctx)?);
    }
    Ok(sql)
}

/// Render a table reference with its alias.
///
/// With `transform` set, plain names go through the table hook. A hook that
/// answers with a select has that select rendered without the table hook.
pub fn render_table(table: &Table, ctx: RenderContext<'_>, transform: bool) -> QirResult<String> {
    let hook = ctx.options.transform_table.as_ref().filter(|_| transform);
    let (source, nested) = match (&table.source, hook) {
        (TableSource::Name(name), Some(hook)) => match hook(name) {
            TableSource::Name(renamed) => (ctx.flavor.escape_table(&renamed), false),
            TableSource::Select(query) => {
                let options = RenderOptions {
                    transform_table: None,
                    ..ctx.options.clone()
                };
                let inner = RenderContext::new(ctx.flavor, &options);
                (format!("({})", render_select(&query, inner)?), true)
            }
        },
        (TableSource::Name(name), None) => (ctx.flavor.escape_table(name), false),
        (TableSource::Select(query), _) => (format!("({})", render_select(query, ctx)?), true),
    };

    let alias = match (&table.alias, nested) {
        (Some(alias), _) => Some(alias.as_str()),
        (None, true) => Some(DEFAULT_SUBQUERY_ALIAS),
        (None, false) => None,
    };
    Ok(match alias {
        Some(alias) => format!("{} AS {}", source, ctx.flavor.escape_column(alias, false)),
        None => source,
    })
}
