//! qir: compile serialized statements from the command line.
//!
//! # Usage
//!
//! ```bash
//! # SQL in the configured flavor
//! qir compile query.json --flavor postgres
//!
//! # Native DynamoDB request from stdin
//! cat query.json | qir compile --target dynamodb --partition-key pk
//!
//! # What does this payload do?
//! qir inspect '{"type":"DeleteMutation","table":{"type":"Table","source":"users"},"where":[]}'
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qir::prelude::*;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qir")]
#[command(version)]
#[command(about = "Compile serialized query IR to SQL, PartiQL and DynamoDB requests", long_about = None)]
#[command(after_help = "EXAMPLES:
    qir compile query.json
    qir compile query.json --flavor sqlite
    qir compile query.json --target dynamodb --partition-key pk --sort-key sk
    qir inspect query.json")]
struct Cli {
    /// Configuration file (default: ./qir.toml, then the user config dir)
    #[arg(short, long, global = true, env = "QIR_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetKind {
    Sql,
    Partiql,
    Dynamodb,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a serialized statement
    Compile {
        /// File path, inline JSON, or `-` for stdin (the default)
        input: Option<String>,

        /// Output backend
        #[arg(short, long, value_enum, default_value = "sql")]
        target: TargetKind,

        /// SQL flavor: mysql, default, postgres, sqlite, timestream
        #[arg(short, long)]
        flavor: Option<Dialect>,

        /// IANA time zone for SQL date literals
        #[arg(long)]
        timezone: Option<String>,

        #[arg(long)]
        partition_key: Option<String>,

        #[arg(long)]
        sort_key: Option<String>,

        /// Secondary index to query
        #[arg(long)]
        index_name: Option<String>,

        #[arg(long)]
        consistent_read: bool,

        /// Emit a Scan even when key conditions are present
        #[arg(long)]
        force_scan: bool,
    },
    /// Show operation type, tables and canonical form
    Inspect {
        /// File path, inline JSON, or `-` for stdin (the default)
        input: Option<String>,
    },
    /// List the SQL flavors
    Flavors,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "qir=debug" } else { "qir=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compile {
            input,
            target,
            flavor,
            timezone,
            partition_key,
            sort_key,
            index_name,
            consistent_read,
            force_scan,
        } => {
            let mut config = QirConfig::load(cli.config.as_deref()).context("loading configuration")?;
            if let Some(flavor) = flavor {
                config.sql.flavor = *flavor;
            }
            if timezone.is_some() {
                config.sql.timezone = timezone.clone();
            }
            let dynamo = &mut config.dynamodb;
            if partition_key.is_some() {
                dynamo.partition_key = partition_key.clone();
            }
            if sort_key.is_some() {
                dynamo.sort_key = sort_key.clone();
            }
            if index_name.is_some() {
                dynamo.index_name = index_name.clone();
            }
            dynamo.consistent_read |= *consistent_read;
            dynamo.force_scan |= *force_scan;

            let statement = read_statement(input.as_deref())?;
            compile(&statement, *target, &config)
        }
        Commands::Inspect { input } => {
            let statement = read_statement(input.as_deref())?;
            inspect(&statement);
            Ok(())
        }
        Commands::Flavors => {
            show_flavors();
            Ok(())
        }
    }
}

/// Inline JSON when it looks like an object, stdin for `-` or nothing,
/// otherwise a file path.
fn read_input(input: Option<&str>) -> anyhow::Result<String> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading statement from stdin")?;
            Ok(text)
        }
        Some(text) if text.trim_start().starts_with('{') => Ok(text.to_string()),
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path)),
    }
}

fn read_statement(input: Option<&str>) -> anyhow::Result<Statement> {
    let text = read_input(input)?;
    Ok(q::deserialize(text.trim())?)
}

fn compile(statement: &Statement, target: TargetKind, config: &QirConfig) -> anyhow::Result<()> {
    match target {
        TargetKind::Sql => {
            let target = SqlTarget::from_dialect(config.sql.flavor, config.flavor_options()?);
            tracing::debug!("Compiling {} for {}", statement.operation_type().as_str(), config.sql.flavor);
            println!("{}", statement.compile(&target)?);
        }
        TargetKind::Partiql => {
            println!("{}", statement.compile(&PartiqlTarget::new())?);
        }
        TargetKind::Dynamodb => {
            let request = statement.compile(&DynamoTarget::new(config.dynamodb.clone()))?;
            tracing::debug!("DynamoDB request kind: {}", request.kind());
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }
    Ok(())
}

fn inspect(statement: &Statement) {
    println!("{}", "Statement".cyan().bold());
    println!(
        "  {} {}",
        "Operation:".dimmed(),
        statement.operation_type().as_str().yellow()
    );
    let tables = statement.table_names();
    if tables.is_empty() {
        println!("  {} {}", "Tables:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}", "Tables:".dimmed());
        for table in &tables {
            println!("    • {}", table.white());
        }
    }
    println!();
    println!("{}", "Canonical form:".green().bold());
    println!("  {}", statement.serialize().white());
}

fn show_flavors() {
    println!("{}", "SQL flavors".cyan().bold());
    println!();
    println!("{:12} {}", "Name".white().bold(), "Description".white().bold());
    println!("{}", "─".repeat(48).dimmed());
    for dialect in Dialect::ALL {
        println!("{:12} {}", dialect.name().cyan(), dialect.description().dimmed());
    }
}
