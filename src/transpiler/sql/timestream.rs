use crate::ast::FunctionCall;
use crate::error::QirResult;
use crate::transpiler::dialect::{Dialect, FlavorOptions};
use crate::transpiler::traits::{default_function, DateAddParts, Flavor, DATE_ADD_UNITS};
use chrono::{DateTime, Utc};

/// AWS Timestream SQL: `TIMESTAMP` literals and OFFSET before LIMIT.
#[derive(Debug, Clone, Default)]
pub struct TimestreamFlavor {
    options: FlavorOptions,
}

impl TimestreamFlavor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FlavorOptions) -> Self {
        Self { options }
    }
}

impl Flavor for TimestreamFlavor {
    fn dialect(&self) -> Dialect {
        Dialect::Timestream
    }

    fn options(&self) -> &FlavorOptions {
        &self.options
    }

    fn column_quote(&self) -> char {
        '"'
    }

    fn string_quote(&self) -> char {
        '\''
    }

    fn escape_date(&self, date: &DateTime<Utc>) -> String {
        format!("TIMESTAMP '{}'", self.options.format_date(date))
    }

    fn escape_limit_and_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        sql
    }

    fn escape_function(&self, call: &FunctionCall, args: &[String]) -> QirResult<String> {
        if call.name == "DATEADD" {
            let parts = DateAddParts::parse(call, DATE_ADD_UNITS)?;
            return Ok(format!(
                "date_add('{}', {}, {})",
                parts.unit, parts.interval, args[0]
            ));
        }
        default_function(call, args)
    }
}
