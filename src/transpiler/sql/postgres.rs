use crate::ast::FunctionCall;
use crate::error::QirResult;
use crate::transpiler::dialect::{Dialect, FlavorOptions};
use crate::transpiler::traits::{default_function, DateAddParts, Flavor};

const DATE_ADD_UNITS: &[&str] = &["year", "month", "day", "hour", "minute", "second", "week"];

/// PostgreSQL: double-quoted identifiers, single-quoted strings.
#[derive(Debug, Clone, Default)]
pub struct PostgresFlavor {
    options: FlavorOptions,
}

impl PostgresFlavor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FlavorOptions) -> Self {
        Self { options }
    }
}

impl Flavor for PostgresFlavor {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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

    fn escape_function(&self, call: &FunctionCall, args: &[String]) -> QirResult<String> {
        match call.name.as_str() {
            "DATEADD" => {
                let parts = DateAddParts::parse(call, DATE_ADD_UNITS)?;
                Ok(format!(
                    "({} + INTERVAL '{} {}')",
                    args[0], parts.interval, parts.unit
                ))
            }
            "YEAR" | "MONTH" => Ok(format!("EXTRACT({} FROM {})", call.name, args.join(", "))),
            "IF" if args.len() == 3 => Ok(format!(
                "CASE WHEN {} THEN {} ELSE {} END",
                args[0], args[1], args[2]
            )),
            "IFNULL" => Ok(format!("COALESCE({})", args.join(","))),
            _ => default_function(call, args),
        }
    }
}
