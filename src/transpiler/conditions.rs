//! Condition rendering for WHERE, HAVING and ON clauses.

use crate::ast::{Condition, Value};
use crate::error::QirResult;
use crate::transpiler::expressions::{render_all, render_expr};
use crate::transpiler::options::RenderContext;

pub fn render_condition(condition: &Condition, ctx: RenderContext<'_>) -> QirResult<String> {
    let sql = match condition {
        Condition::Binary {
            key,
            value,
            operator,
        } => format!(
            "{} {} {}",
            render_expr(key, ctx)?,
            operator,
            render_expr(value, ctx)?
        ),
        Condition::Between { key, from, to } => format!(
            "{} BETWEEN {} AND {}",
            render_expr(key, ctx)?,
            render_expr(from, ctx)?,
            render_expr(to, ctx)?
        ),
        Condition::In { key, values } => format!(
            "{} IN ({})",
            render_expr(key, ctx)?,
            render_all(values, ctx)?.join(", ")
        ),
        Condition::NotIn { key, values } => format!(
            "{} NOT IN ({})",
            render_expr(key, ctx)?,
            render_all(values, ctx)?.join(", ")
        ),
        Condition::Null { key, is_null } => format!(
            "{} IS {}NULL",
            render_expr(key, ctx)?,
            if *is_null { "" } else { "NOT " }
        ),
        Condition::Like {
            key,
            pattern,
            is_like,
        } => format!(
            "{} {}LIKE {}",
            render_expr(key, ctx)?,
            if *is_like { "" } else { "NOT " },
            ctx.flavor.escape_value(&Value::String(pattern.clone()))
        ),
        Condition::ColumnComparison {
            left,
            right,
            operator,
        } => format!(
            "{} {} {}",
            render_expr(left, ctx)?,
            operator,
            render_expr(right, ctx)?
        ),
        Condition::Logical {
            conditions,
            operator,
        } => {
            let parts = render_conditions(conditions, ctx)?;
            format!("({})", parts.join(&format!(" {} ", operator)))
        }
        Condition::Not(inner) => format!("NOT ({})", render_condition(inner, ctx)?),
    };
    Ok(sql)
}

pub fn render_conditions(conditions: &[Condition], ctx: RenderContext<'_>) -> QirResult<Vec<String>> {
    conditions.iter().map(|c| render_condition(c, ctx)).collect()
}

/// Conditions joined by `AND`, as used by WHERE and HAVING.
pub fn render_conjunction(conditions: &[Condition], ctx: RenderContext<'_>) -> QirResult<String> {
    Ok(render_conditions(conditions, ctx)?.join(" AND "))
}
