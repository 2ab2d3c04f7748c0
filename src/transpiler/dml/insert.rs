//! INSERT SQL generation.

use crate::ast::{InsertMutation, Value};
use crate::error::{QirError, QirResult};
use crate::transpiler::dml::select::{render_select, render_table};
use crate::transpiler::options::RenderContext;
use std::borrow::Cow;

pub fn render_insert(mutation: &InsertMutation, ctx: RenderContext<'_>) -> QirResult<String> {
    let mutation = match &ctx.options.transform_insert {
        Some(hook) => Cow::Owned(hook(mutation.clone())),
        None => Cow::Borrowed(mutation),
    };
    let flavor = ctx.flavor;
    let table = render_table(&mutation.table, ctx, false)?;

    if let Some(rows) = mutation.rows.as_deref().filter(|rows| !rows.is_empty()) {
        // Column list comes from the first row; later rows are matched by name.
        let columns: Vec<&String> = rows[0].keys().collect();
        let values = rows
            .iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|c| flavor.escape_value(row.get(*c).unwrap_or(&Value::Null)))
                    .collect::<Vec<_>>();
                format!("({})", cells.join(", "))
            })
            .collect::<Vec<_>>();
        return Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            columns
                .iter()
                .map(|c| flavor.escape_column(c, false))
                .collect::<Vec<_>>()
                .join(", "),
            values.join(", ")
        ));
    }

    if let Some((query, columns)) = &mutation.select {
        let columns = match columns {
            Some(columns) => format!(
                " ({})",
                columns
                    .iter()
                    .map(|c| flavor.escape_column(c, false))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => String::new(),
        };
        return Ok(format!(
            "INSERT INTO {}{} {}",
            table,
            columns,
            render_select(query, ctx)?
        ));
    }

    Err(QirError::missing("values or select must be set for insert query"))
}
