use crate::error::{QirError, QirResult};
use crate::transpiler::sql::mysql::MySqlFlavor;
use crate::transpiler::sql::postgres::PostgresFlavor;
use crate::transpiler::sql::sqlite::SqliteFlavor;
use crate::transpiler::sql::timestream::TimestreamFlavor;
use crate::transpiler::traits::{Flavor, DATE_FORMAT};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    /// MySQL-style default: backtick identifiers, double-quoted strings.
    #[default]
    MySql,
    Postgres,
    Sqlite,
    /// AWS Timestream SQL.
    Timestream,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
        Dialect::Timestream,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Timestream => "timestream",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dialect::MySql => "MySQL-style default (alias: default)",
            Dialect::Postgres => "PostgreSQL",
            Dialect::Sqlite => "SQLite",
            Dialect::Timestream => "AWS Timestream SQL",
        }
    }

    /// Build this dialect's flavor.
    pub fn flavor(&self, options: FlavorOptions) -> Arc<dyn Flavor> {
        match self {
            Dialect::MySql => Arc::new(MySqlFlavor::with_options(options)),
            Dialect::Postgres => Arc::new(PostgresFlavor::with_options(options)),
            Dialect::Sqlite => Arc::new(SqliteFlavor::with_options(options)),
            Dialect::Timestream => Arc::new(TimestreamFlavor::with_options(options)),
        }
    }
}

impl FromStr for Dialect {
    type Err = QirError;

    fn from_str(s: &str) -> QirResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "default" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "timestream" | "aws-timestream" => Ok(Dialect::Timestream),
            other => Err(QirError::unknown_type("flavor", other)),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = QirError;

    fn try_from(s: String) -> QirResult<Self> {
        s.parse()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Constructor-time flavor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlavorOptions {
    /// Zone date values are shown in. UTC when unset.
    pub timezone: Option<Tz>,
}

impl FlavorOptions {
    pub fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone: Some(timezone),
        }
    }

    /// Parse an IANA zone name such as `Europe/Prague`.
    pub fn parse_timezone(name: &str) -> QirResult<Self> {
        name.parse::<Tz>()
            .map(Self::with_timezone)
            .map_err(|_| QirError::Config(format!("Unknown time zone: {}", name)))
    }

    /// `YYYY-MM-DD HH:MM:SS` in the configured zone.
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        match self.timezone {
            Some(tz) => date.with_timezone(&tz).format(DATE_FORMAT).to_string(),
            None => date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_dialect() {
        assert_eq!("default".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown flavor type: oracle");
    }

    #[test]
    fn test_format_date_in_zone() {
        let date = DateTime::from_timestamp_millis(1_705_314_600_000).unwrap();
        assert_eq!(FlavorOptions::default().format_date(&date), "2024-01-15 10:30:00");
        let prague = FlavorOptions::parse_timezone("Europe/Prague").unwrap();
        assert_eq!(prague.format_date(&date), "2024-01-15 11:30:00");
        assert!(FlavorOptions::parse_timezone("Mars/Olympus").is_err());
    }
}
