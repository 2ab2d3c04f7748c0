//! The flavor trait and the escaping rules shared by every SQL dialect.

use crate::ast::{FunctionCall, UnionType, Value};
use crate::error::{QirError, QirResult};
use crate::transpiler::dialect::{Dialect, FlavorOptions};
use chrono::{DateTime, Utc};
use nom::{
    character::complete::{digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, preceded},
    IResult,
};

/// Date literal layout used by every flavor.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// DATEADD units accepted by the MySQL-style `DATE_ADD`.
pub const DATE_ADD_UNITS: &[&str] = &[
    "year", "month", "day", "hour", "minute", "second", "week", "quarter",
];

/// Strategy for one SQL dialect: quoting, literal escaping and function lowering.
///
/// Every method has the MySQL-style behavior as its default; dialects override
/// what differs. Function arguments arrive already rendered, so a flavor never
/// recurses into the tree itself.
pub trait Flavor: std::fmt::Debug + Send + Sync {
    fn dialect(&self) -> Dialect;

    fn options(&self) -> &FlavorOptions;

    /// Identifier quote character.
    fn column_quote(&self) -> char {
        '`'
    }

    /// String literal quote character.
    fn string_quote(&self) -> char {
        '"'
    }

    /// Quote an identifier. In legacy mode, text that looks like an inlined
    /// SQL fragment passes through untouched.
    fn escape_column(&self, name: &str, legacy: bool) -> String {
        if name == "NULL" {
            return name.to_string();
        }
        if legacy && !is_plain_identifier(name) && is_inline_fragment(name, self) {
            return name.to_string();
        }
        quote_identifier(name, self.column_quote())
    }

    /// Table names containing `-` are quoted whole, without splitting on dots.
    fn escape_table(&self, name: &str) -> String {
        if name.contains('-') {
            let q = self.column_quote();
            return format!("{q}{name}{q}");
        }
        self.escape_column(name, false)
    }

    fn escape_string(&self, text: &str) -> String {
        let q = self.string_quote();
        format!("{q}{}{q}", text.replace(q, &format!("{q}{q}")))
    }

    fn escape_date(&self, date: &DateTime<Utc>) -> String {
        self.escape_string(&self.options().format_date(date))
    }

    fn escape_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Date(date) => self.escape_date(date),
            Value::String(text) => self.escape_string(text),
            other => other.to_plain_string(),
        }
    }

    fn escape_raw_value(&self, value: &Value) -> String {
        value.to_plain_string()
    }

    fn escape_limit_and_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    fn escape_function(&self, call: &FunctionCall, args: &[String]) -> QirResult<String> {
        default_function(call, args)
    }

    fn escape_operation(&self, operator: &str, args: &[String]) -> String {
        format!("({})", args.join(&format!(" {} ", operator)))
    }

    fn escape_union(&self, union_type: UnionType, left: &str, right: &str) -> String {
        format!("({}) {} ({})", left, union_type.as_str(), right)
    }
}

/// `NAME(a,b)`, with DATEADD lowered to `DATE_ADD(a, INTERVAL n UNIT)`.
pub fn default_function(call: &FunctionCall, args: &[String]) -> QirResult<String> {
    if call.name == "DATEADD" {
        let parts = DateAddParts::parse(call, DATE_ADD_UNITS)?;
        return Ok(format!(
            "DATE_ADD({}, INTERVAL {} {})",
            args[0],
            parts.interval,
            parts.unit.to_uppercase()
        ));
    }
    Ok(format!("{}({})", call.name, args.join(",")))
}

/// Validated arguments of a DATEADD call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAddParts {
    pub interval: i64,
    /// Lowercase unit from the allow-list.
    pub unit: String,
}

impl DateAddParts {
    /// The interval is read as a leading integer (`"5 days"` gives 5); the
    /// unit must be one of `units`, compared case-insensitively.
    pub fn parse(call: &FunctionCall, units: &[&str]) -> QirResult<Self> {
        if call.args.len() != 3 {
            return Err(QirError::invalid(format!(
                "DATEADD expects 3 arguments, got {}",
                call.args.len()
            )));
        }
        let interval_text = call.args[1]
            .literal_text()
            .unwrap_or_else(|| call.args[1].serialize());
        let interval = leading_integer(&interval_text).ok_or_else(|| {
            QirError::invalid(format!("Invalid DATEADD interval: {}", interval_text))
        })?;
        let unit = call.args[2]
            .literal_text()
            .unwrap_or_else(|| call.args[2].serialize())
            .to_lowercase();
        if !units.contains(&unit.as_str()) {
            return Err(QirError::invalid(format!(
                "Invalid DATEADD interval type: {}",
                unit
            )));
        }
        Ok(Self { interval, unit })
    }
}

fn parse_leading_integer(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, recognize(pair(opt(one_of("+-")), digit1)))(input)
}

fn leading_integer(text: &str) -> Option<i64> {
    let (_, digits) = parse_leading_integer(text).ok()?;
    digits.parse().ok()
}

/// Letters, digits, underscore and dot only.
pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Legacy pass-through test: already quoted text, expressions, signed
/// integers, `*`, `TRUE` and `FALSE`.
fn is_inline_fragment<F: Flavor + ?Sized>(name: &str, flavor: &F) -> bool {
    name.contains(flavor.column_quote())
        || name.contains(flavor.string_quote())
        || name.contains(['(', ')', ' ', ','])
        || is_signed_integer(name)
        || name == "*"
        || name == "TRUE"
        || name == "FALSE"
}

fn is_signed_integer(name: &str) -> bool {
    let digits = name.strip_prefix(['+', '-']).unwrap_or(name);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Quote each dotted segment, doubling embedded quote characters.
pub fn quote_identifier(name: &str, quote: char) -> String {
    let doubled = format!("{quote}{quote}");
    let separator = format!("{quote}.{quote}");
    format!(
        "{quote}{}{quote}",
        name.replace(quote, &doubled).split('.').collect::<Vec<_>>().join(&separator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("a.b", '`'), "`a`.`b`");
        assert_eq!(quote_identifier("we\"ird", '"'), "\"we\"\"ird\"");
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("5; DROP TABLE users"), Some(5));
        assert_eq!(leading_integer("  -12"), Some(-12));
        assert_eq!(leading_integer("7.9"), Some(7));
        assert_eq!(leading_integer("abc"), None);
    }

    #[test]
    fn test_date_add_parts() {
        let call = FunctionCall {
            name: "DATEADD".into(),
            args: vec![Expr::column("d"), Expr::column("3"), Expr::column("MONTH")],
        };
        let parts = DateAddParts::parse(&call, DATE_ADD_UNITS).unwrap();
        assert_eq!(parts, DateAddParts { interval: 3, unit: "month".into() });

        let bad = FunctionCall {
            name: "DATEADD".into(),
            args: vec![Expr::column("d"), Expr::column("3"), Expr::column("fortnight")],
        };
        let err = DateAddParts::parse(&bad, DATE_ADD_UNITS).unwrap_err();
        assert_eq!(err.to_string(), "Invalid DATEADD interval type: fortnight");
    }
}
