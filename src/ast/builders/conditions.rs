//! Condition builders for WHERE, HAVING and JOIN clauses.

use crate::ast::{CompareOp, Condition, Expr, LogicalOp, ValueExpr};
use nom::{branch::alt, bytes::complete::tag, combinator::value, IResult};

fn binary(key: impl Into<Expr>, value: impl Into<ValueExpr>, operator: CompareOp) -> Condition {
    Condition::Binary {
        key: key.into(),
        value: ValueExpr::into_inner(value.into()),
        operator,
    }
}

fn column_comparison(left: impl Into<Expr>, right: impl Into<Expr>, operator: CompareOp) -> Condition {
    Condition::ColumnComparison {
        left: left.into(),
        right: right.into(),
        operator,
    }
}

fn value_list<V: Into<ValueExpr>>(values: impl IntoIterator<Item = V>) -> Vec<Expr> {
    values.into_iter().map(|v| ValueExpr::into_inner(v.into())).collect()
}

/// Create an equality condition (key = value)
pub fn equal(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Eq)
}

pub fn not_equal(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Ne)
}

pub fn greater_than(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Gt)
}

pub fn less_than(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Lt)
}

pub fn greater_than_or_equal(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Gte)
}

pub fn less_than_or_equal(key: impl Into<Expr>, value: impl Into<ValueExpr>) -> Condition {
    binary(key, value, CompareOp::Lte)
}

/// Create a range condition (key BETWEEN from AND to)
pub fn between(
    key: impl Into<Expr>,
    from: impl Into<ValueExpr>,
    to: impl Into<ValueExpr>,
) -> Condition {
    Condition::Between {
        key: key.into(),
        from: ValueExpr::into_inner(from.into()),
        to: ValueExpr::into_inner(to.into()),
    }
}

/// Create an IN condition.
///
/// Returns `None` for an empty list: there is nothing to match, so the
/// condition is absent and `filter`/`having` leave the query unchanged.
///
/// ```
/// use qir::prelude::*;
///
/// assert!(cond::is_in("id", Vec::<i64>::new()).is_none());
/// let all = q::select().from("users").filter(cond::is_in("id", Vec::<i64>::new()));
/// assert_eq!(all.to_sql().unwrap(), "SELECT * FROM `users`");
/// ```
pub fn is_in<V: Into<ValueExpr>>(
    key: impl Into<Expr>,
    values: impl IntoIterator<Item = V>,
) -> Option<Condition> {
    let values = value_list(values);
    if values.is_empty() {
        return None;
    }
    Some(Condition::In {
        key: key.into(),
        values,
    })
}

/// Create a NOT IN condition.
///
/// Like [`is_in`], an empty list yields `None`, meaning no condition rather
/// than a condition that excludes nothing.
pub fn not_in<V: Into<ValueExpr>>(
    key: impl Into<Expr>,
    values: impl IntoIterator<Item = V>,
) -> Option<Condition> {
    let values = value_list(values);
    if values.is_empty() {
        return None;
    }
    Some(Condition::NotIn {
        key: key.into(),
        values,
    })
}

/// Conjunction of the present conditions; `None` if there are none.
pub fn and(conditions: impl IntoIterator<Item = Option<Condition>>) -> Option<Condition> {
    Condition::logical(LogicalOp::And, conditions)
}

/// Disjunction of the present conditions; `None` if there are none.
pub fn or(conditions: impl IntoIterator<Item = Option<Condition>>) -> Option<Condition> {
    Condition::logical(LogicalOp::Or, conditions)
}

/// Create a null check (key IS NULL)
pub fn null(key: impl Into<Expr>) -> Condition {
    Condition::Null {
        key: key.into(),
        is_null: true,
    }
}

pub fn is_null(key: impl Into<Expr>) -> Condition {
    null(key)
}

pub fn not_null(key: impl Into<Expr>) -> Condition {
    Condition::Null {
        key: key.into(),
        is_null: false,
    }
}

pub fn is_not_null(key: impl Into<Expr>) -> Condition {
    not_null(key)
}

pub fn like(key: impl Into<Expr>, pattern: impl Into<String>) -> Condition {
    Condition::Like {
        key: key.into(),
        pattern: pattern.into(),
        is_like: true,
    }
}

pub fn not_like(key: impl Into<Expr>, pattern: impl Into<String>) -> Condition {
    Condition::Like {
        key: key.into(),
        pattern: pattern.into(),
        is_like: false,
    }
}

/// Negate a condition. Double negation is kept as written.
pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

pub fn column_equal(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Eq)
}

pub fn column_not_equal(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Ne)
}

pub fn column_greater_than(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Gt)
}

pub fn column_less_than(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Lt)
}

pub fn column_greater_than_or_equal(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Gte)
}

pub fn column_less_than_or_equal(left: impl Into<Expr>, right: impl Into<Expr>) -> Condition {
    column_comparison(left, right, CompareOp::Lte)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shorthand {
    Gte,
    Lte,
    Gt,
    Lt,
    Like,
    NotLike,
    NotEqual,
}

/// Operator prefix of a search-box term.
fn parse_shorthand(input: &str) -> IResult<&str, Shorthand> {
    alt((
        value(Shorthand::Gte, tag(">=")),
        value(Shorthand::Lte, tag("<=")),
        value(Shorthand::Gt, tag(">")),
        value(Shorthand::Lt, tag("<")),
        value(Shorthand::Like, tag("~")),
        value(Shorthand::NotLike, tag("!~")),
        value(Shorthand::NotEqual, tag("!")),
    ))(input)
}

/// Interpret search-box shorthand: `>=`, `<=`, `>`, `<` compare, `~term`
/// matches words starting with `term`, `!~term` excludes them, and `!term`
/// is an inequality. Anything else is an equality on the whole text.
pub fn from_string(column: impl Into<Expr>, text: impl std::fmt::Display) -> Condition {
    from_string_with_delimiters(column, text, &[" "])
}

/// [`from_string`] with the set of word delimiters used by the `~` forms.
pub fn from_string_with_delimiters(
    column: impl Into<Expr>,
    text: impl std::fmt::Display,
    delimiters: &[&str],
) -> Condition {
    let column = column.into();
    let text = text.to_string();
    let Ok((rest, shorthand)) = parse_shorthand(&text) else {
        return equal(column, text);
    };
    let word_patterns = || {
        std::iter::once(format!("{}%", rest))
            .chain(delimiters.iter().map(|d| format!("%{}{}%", d, rest)))
            .collect::<Vec<_>>()
    };
    match shorthand {
        Shorthand::Gte => greater_than_or_equal(column, rest),
        Shorthand::Lte => less_than_or_equal(column, rest),
        Shorthand::Gt => greater_than(column, rest),
        Shorthand::Lt => less_than(column, rest),
        Shorthand::Like => Condition::Logical {
            conditions: word_patterns()
                .into_iter()
                .map(|p| like(column.clone(), p))
                .collect(),
            operator: LogicalOp::Or,
        },
        Shorthand::NotLike => Condition::Logical {
            conditions: word_patterns()
                .into_iter()
                .map(|p| not_like(column.clone(), p))
                .collect(),
            operator: LogicalOp::And,
        },
        Shorthand::NotEqual => not_equal(column, format!("{}%", rest)),
    }
}
