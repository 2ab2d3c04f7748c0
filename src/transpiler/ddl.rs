//! CREATE TABLE / CREATE VIEW ... AS SELECT.

use crate::ast::{CreateTableAsSelect, CreateViewAsSelect};
use crate::error::QirResult;
use crate::transpiler::dml::select::render_select;
use crate::transpiler::options::RenderContext;

pub fn render_create_table_as(ddl: &CreateTableAsSelect, ctx: RenderContext<'_>) -> QirResult<String> {
    Ok(format!(
        "CREATE TABLE {} AS {}",
        ctx.flavor.escape_table(&ddl.table_name),
        render_select(&ddl.select, ctx)?
    ))
}

pub fn render_create_view_as(ddl: &CreateViewAsSelect, ctx: RenderContext<'_>) -> QirResult<String> {
    Ok(format!(
        "CREATE {}VIEW {} AS {}",
        if ddl.or_replace { "OR REPLACE " } else { "" },
        ctx.flavor.escape_table(&ddl.view_name),
        render_select(&ddl.select, ctx)?
    ))
}
