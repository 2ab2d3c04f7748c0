//! DELETE SQL generation.

use crate::ast::DeleteMutation;
use crate::error::QirResult;
use crate::transpiler::conditions::render_conjunction;
use crate::transpiler::dml::select::render_table;
use crate::transpiler::options::RenderContext;
use std::borrow::Cow;

pub fn render_delete(mutation: &DeleteMutation, ctx: RenderContext<'_>) -> QirResult<String> {
    let mutation = match &ctx.options.transform_delete {
        Some(hook) => Cow::Owned(hook(mutation.clone())),
        None => Cow::Borrowed(mutation),
    };
    let mut sql = format!("DELETE FROM {}", render_table(&mutation.table, ctx, false)?);

    if !mutation.where_.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&render_conjunction(&mutation.where_, ctx)?);
    }
    Ok(sql)
}
