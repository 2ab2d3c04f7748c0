//! Portable SQL functions and arithmetic operators.
//!
//! Arguments convert with `Into<Expr>`, so plain strings are column
//! references. Use [`q::value`](super::statements::value) or
//! [`string`] for literals.

use crate::ast::builders::conditions as cond;
use crate::ast::{Condition, Expr, Value, ValueExpr};
use crate::error::QirResult;
use chrono::{DateTime, Utc};

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::function(name, args)
}

fn operation<I, E>(operator: &str, args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::operation(operator, args.into_iter().map(Into::into).collect())
}

pub fn count(column: impl Into<Expr>) -> Expr {
    call("COUNT", vec![column.into()])
}

pub fn sum(column: impl Into<Expr>) -> Expr {
    call("SUM", vec![column.into()])
}

pub fn year(column: impl Into<Expr>) -> Expr {
    call("YEAR", vec![column.into()])
}

pub fn month(column: impl Into<Expr>) -> Expr {
    call("MONTH", vec![column.into()])
}

pub fn min(column: impl Into<Expr>) -> Expr {
    call("MIN", vec![column.into()])
}

pub fn max(column: impl Into<Expr>) -> Expr {
    call("MAX", vec![column.into()])
}

pub fn avg(column: impl Into<Expr>) -> Expr {
    call("AVG", vec![column.into()])
}

pub fn abs(column: impl Into<Expr>) -> Expr {
    call("ABS", vec![column.into()])
}

pub fn ifnull(column: impl Into<Expr>, fallback: impl Into<Expr>) -> Expr {
    call("IFNULL", vec![column.into(), fallback.into()])
}

pub fn concat<I, E>(values: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    call("CONCAT", values.into_iter().map(Into::into).collect())
}

/// `IF(condition, then, else)`, lowered to `CASE`/`IIF` where needed.
pub fn if_(condition: Condition, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    call(
        "IF",
        vec![Expr::from(condition), then.into(), otherwise.into()],
    )
}

/// `DATEADD(date, interval, unit)`. The interval and unit are validated when
/// the expression is rendered.
pub fn date_add(date: impl Into<Expr>, interval: impl Into<Expr>, unit: &str) -> Expr {
    call(
        "DATEADD",
        vec![date.into(), interval.into(), Expr::column(unit)],
    )
}

/// Difference between two dates in `day`s, `month`s or whole years.
pub fn date_diff(unit: &str, from: impl Into<Expr>, to: impl Into<Expr>) -> QirResult<Expr> {
    let (from, to) = (from.into(), to.into());
    Ok(match unit {
        "month" => Expr::column(format!(
            "TIMESTAMPDIFF(MONTH, {}, {})",
            from.escape_expression_value()?,
            to.escape_expression_value()?
        )),
        "day" => call("DATEDIFF", vec![from, to]),
        _ => Expr::operation("-", vec![year(from), year(to)]),
    })
}

pub fn substring(
    text: impl Into<Expr>,
    start: impl Into<ValueExpr>,
    length: impl Into<ValueExpr>,
) -> Expr {
    call(
        "SUBSTRING",
        vec![
            text.into(),
            ValueExpr::into_inner(start.into()),
            ValueExpr::into_inner(length.into()),
        ],
    )
}

/// A string literal escaped by the active flavor.
pub fn string(text: impl std::fmt::Display) -> Expr {
    Expr::column(Expr::escape_string(text))
}

pub fn null() -> Expr {
    Expr::column("NULL")
}

pub fn add<I, E>(args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    operation("+", args)
}

pub fn subtract<I, E>(args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    operation("-", args)
}

pub fn multiply<I, E>(args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    operation("*", args)
}

pub fn divide<I, E>(args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    operation("/", args)
}

/// `'YYYY-MM-DD HH:mm:ss'` inlined as SQL text.
pub fn format_date(date: DateTime<Utc>) -> Expr {
    Expr::column(format!("'{}'", date.format("%Y-%m-%d %H:%M:%S")))
}

/// Inputs of [`date_range_sum_field`].
#[derive(Debug, Clone)]
pub struct DateRangeSum {
    pub date_column: String,
    pub value_column: String,
    pub start: Value,
    pub end: Value,
}

/// `SUM(IF(date BETWEEN start AND end, value, 0))`
pub fn date_range_sum_field(range: DateRangeSum) -> Expr {
    sum(if_(
        cond::between(range.date_column, range.start, range.end),
        range.value_column,
        ValueExpr::from(0),
    ))
}

/// Relative change from last year's to this year's figure, guarded against
/// zero on either side.
pub fn price_current_and_previous_diff_field(
    this_year: impl Into<Expr>,
    last_year: impl Into<Expr>,
) -> Expr {
    let (this_year, last_year) = (this_year.into(), last_year.into());
    let both_zero = cond::and([
        Some(cond::equal(this_year.clone(), 0)),
        Some(cond::equal(last_year.clone(), 0)),
    ]);
    let ratio = divide([
        subtract([this_year.clone(), last_year.clone()]),
        last_year.clone(),
    ]);
    let inner = if_(cond::equal(this_year, 0), Expr::column("-1"), ratio);
    let middle = if_(cond::equal(last_year, 0), Expr::column("NULL"), inner);
    match both_zero {
        Some(c) => if_(c, Expr::column("+0"), middle),
        None => middle,
    }
}
