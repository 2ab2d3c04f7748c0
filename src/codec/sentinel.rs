//! Sentinel prefixes of the single-string expression encoding.
//!
//! ```text
//! !!!<json>        value literal (or nested select)
//! !D!<epoch-ms>!!  date value
//! !!<json>!!       raw literal
//! FN(<json array>) function: [name, ...args]
//! OP(<json array>) operation: [operator, ...operands]
//! ```
//!
//! Anything else is column text or, when it parses as one, condition JSON.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize, value},
    sequence::{pair, terminated},
    IResult,
};

pub const VALUE_PREFIX: &str = "!!!";
pub const DATE_PREFIX: &str = "!D!";
pub const RAW_MARK: &str = "!!";
pub const DATE_SUFFIX: &str = "!!";
pub const FUNCTION_PREFIX: &str = "FN(";
pub const OPERATION_PREFIX: &str = "OP(";

/// A recognized sentinel with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel<'a> {
    /// JSON payload after `!!!`.
    Value(&'a str),
    /// Epoch milliseconds.
    Date(i64),
    /// JSON payload between `!!` marks.
    Raw(&'a str),
    /// JSON array between `FN(` and `)`.
    Function(&'a str),
    /// JSON array between `OP(` and `)`.
    Operation(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Value,
    Date,
    Raw,
    Function,
    Operation,
}

/// Longest prefixes first: `!!!` must win over `!!`.
fn parse_prefix(input: &str) -> IResult<&str, Prefix> {
    alt((
        value(Prefix::Value, tag(VALUE_PREFIX)),
        value(Prefix::Date, tag(DATE_PREFIX)),
        value(Prefix::Raw, tag(RAW_MARK)),
        value(Prefix::Function, tag(FUNCTION_PREFIX)),
        value(Prefix::Operation, tag(OPERATION_PREFIX)),
    ))(input)
}

fn parse_millis(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i64>)(input)
}

/// `<ms>!!` following the date prefix.
fn parse_date_body(input: &str) -> IResult<&str, i64> {
    all_consuming(terminated(parse_millis, tag(DATE_SUFFIX)))(input)
}

/// Classify a serialized expression string. `None` means plain text.
pub fn classify(input: &str) -> Option<Sentinel<'_>> {
    let (rest, prefix) = parse_prefix(input).ok()?;
    match prefix {
        Prefix::Value => Some(Sentinel::Value(rest)),
        Prefix::Date => parse_date_body(rest)
            .ok()
            .map(|(_, ms)| Sentinel::Date(ms)),
        Prefix::Raw => rest.strip_suffix(RAW_MARK).map(Sentinel::Raw),
        Prefix::Function => rest.strip_suffix(')').map(Sentinel::Function),
        Prefix::Operation => rest.strip_suffix(')').map(Sentinel::Operation),
    }
}

/// True for strings that claim to be a date value, well-formed or not.
pub fn looks_like_date(input: &str) -> bool {
    input.starts_with(DATE_PREFIX)
}

pub fn encode_date(ms: i64) -> String {
    format!("{}{}{}", DATE_PREFIX, ms, DATE_SUFFIX)
}
