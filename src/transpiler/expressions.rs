//! Expression rendering.

use crate::ast::{Expr, Value};
use crate::error::QirResult;
use crate::transpiler::conditions::render_condition;
use crate::transpiler::dml::select::render_select;
use crate::transpiler::options::RenderContext;
use crate::transpiler::traits::Flavor;

pub fn render_expr(expr: &Expr, ctx: RenderContext<'_>) -> QirResult<String> {
    match expr {
        Expr::Column(text) => Ok(render_column(text, ctx.flavor)),
        Expr::Value(value) => Ok(ctx.flavor.escape_value(value)),
        Expr::Raw(value) => Ok(ctx.flavor.escape_raw_value(value)),
        Expr::Function(call) => {
            let args = render_all(&call.args, ctx)?;
            ctx.flavor.escape_function(call, &args)
        }
        Expr::Operation(op) => {
            let args = render_all(&op.args, ctx)?;
            Ok(ctx.flavor.escape_operation(&op.operator, &args))
        }
        Expr::Condition(condition) => render_condition(condition, ctx),
        Expr::SubQuery(query) => Ok(format!("({})", render_select(query, ctx)?)),
    }
}

pub fn render_all(exprs: &[Expr], ctx: RenderContext<'_>) -> QirResult<Vec<String>> {
    exprs.iter().map(|e| render_expr(e, ctx)).collect()
}

/// Expand a column template.
///
/// `&text&` becomes an escaped string literal and `#name#` a quoted
/// identifier; neither marker may span a `#`. Whatever remains goes through
/// legacy column escaping, so fragments like `COUNT(*)` survive verbatim.
pub fn render_column(text: &str, flavor: &dyn Flavor) -> String {
    let with_strings = expand_string_markers(text, flavor);
    let with_columns = expand_column_markers(&with_strings, flavor);
    flavor.escape_column(&with_columns, true)
}

fn expand_string_markers(text: &str, flavor: &dyn Flavor) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let run = after.find('#').map_or(after, |end| &after[..end]);
        match run.rfind('&') {
            Some(close) if close > 0 => {
                let literal = Value::String(run[..close].to_string());
                out.push_str(&flavor.escape_value(&literal));
                rest = &after[close + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn expand_column_markers(text: &str, flavor: &dyn Flavor) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('#') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('#') {
            Some(close) if close > 0 => {
                out.push_str(&flavor.escape_column(&after[..close], false));
                rest = &after[close + 1..];
            }
            _ => {
                out.push('#');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
