use crate::ast::FunctionCall;
use crate::error::QirResult;
use crate::transpiler::dialect::{Dialect, FlavorOptions};
use crate::transpiler::traits::{default_function, DateAddParts, Flavor};

const DATE_ADD_UNITS: &[&str] = &["year", "month", "day", "hour", "minute", "second"];

/// SQLite: backtick identifiers, single-quoted strings, date math through
/// `DateTime` and `strftime`.
#[derive(Debug, Clone, Default)]
pub struct SqliteFlavor {
    options: FlavorOptions,
}

impl SqliteFlavor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FlavorOptions) -> Self {
        Self { options }
    }
}

impl Flavor for SqliteFlavor {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn options(&self) -> &FlavorOptions {
        &self.options
    }

    fn string_quote(&self) -> char {
        '\''
    }

    /// `schema@table` addresses the table part only.
    fn escape_table(&self, name: &str) -> String {
        let name = name.split_once('@').map_or(name, |(_, table)| table);
        if name.contains('-') {
            return format!("`{}`", name);
        }
        self.escape_column(name, false)
    }

    fn escape_function(&self, call: &FunctionCall, args: &[String]) -> QirResult<String> {
        let joined = args.join(", ");
        match call.name.as_str() {
            "MONTH" => Ok(format!("strftime('%m', {}, 'localtime')", joined)),
            "YEAR" => Ok(format!("strftime('%Y', {}, 'localtime')", joined)),
            "IF" => Ok(format!("IIF({})", joined)),
            "DATEADD" => {
                let parts = DateAddParts::parse(call, DATE_ADD_UNITS)?;
                let sign = if parts.interval < 0 { "" } else { "+" };
                Ok(format!(
                    "DateTime({}, '{}{} {}')",
                    args[0], sign, parts.interval, parts.unit
                ))
            }
            _ => default_function(call, args),
        }
    }
}
