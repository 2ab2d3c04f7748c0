//! UPDATE SQL generation.

use crate::ast::UpdateMutation;
use crate::error::{QirError, QirResult};
use crate::transpiler::conditions::render_conjunction;
use crate::transpiler::dml::select::render_table;
use crate::transpiler::expressions::render_expr;
use crate::transpiler::options::RenderContext;
use std::borrow::Cow;

pub fn render_update(mutation: &UpdateMutation, ctx: RenderContext<'_>) -> QirResult<String> {
    let mutation = match &ctx.options.transform_update {
        Some(hook) => Cow::Owned(hook(mutation.clone())),
        None => Cow::Borrowed(mutation),
    };
    if mutation.values.is_empty() {
        return Err(QirError::missing("UPDATE requires at least one value to set"));
    }

    let assignments = mutation
        .values
        .iter()
        .map(|(column, value)| {
            Ok(format!(
                "{} = {}",
                ctx.flavor.escape_column(column, false),
                render_expr(value, ctx)?
            ))
        })
        .collect::<QirResult<Vec<_>>>()?;

    let mut sql = format!(
        "UPDATE {} SET {}",
        render_table(&mutation.table, ctx, false)?,
        assignments.join(", ")
    );
    if !mutation.where_.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&render_conjunction(&mutation.where_, ctx)?);
    }
    Ok(sql)
}
