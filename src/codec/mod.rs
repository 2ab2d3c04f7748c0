//! Text encoding of expressions, conditions and statements.
//!
//! Expressions travel as single strings tagged by a sentinel prefix
//! ([`sentinel`]); conditions and statements as JSON objects with a `type`
//! discriminator ([`json`], [`statement`]). Decoding any encoder output and
//! encoding it again yields the same text.

pub mod json;
pub mod sentinel;
pub mod statement;

use crate::ast::{Expr, FunctionCall, Operation, SelectQuery, Value};
use crate::error::{QirError, QirResult};
use json::{
    condition_from_json, is_condition_json, payload_value_from_json, value_from_json, value_to_json,
};
use sentinel::{Sentinel, FUNCTION_PREFIX, OPERATION_PREFIX, RAW_MARK, VALUE_PREFIX};
use serde_json::Value as Json;

fn encode_call(prefix: &str, name: &str, args: &[Expr]) -> String {
    let items: Vec<Json> = std::iter::once(Json::String(name.to_string()))
        .chain(args.iter().map(|a| Json::String(a.serialize())))
        .collect();
    format!("{}{})", prefix, Json::Array(items))
}

fn decode_call(payload: &str, original: &str) -> QirResult<(String, Vec<Expr>)> {
    let items: Vec<Json> = serde_json::from_str(payload)?;
    let mut items = items.into_iter();
    let name = match items.next() {
        Some(Json::String(name)) => name,
        _ => {
            return Err(QirError::invalid(format!(
                "Invalid function expression: '{}'",
                original
            )))
        }
    };
    let args = items
        .map(|item| expr_from_json(&item))
        .collect::<QirResult<Vec<_>>>()?;
    Ok((name, args))
}

/// Value payload after `!!!`: a nested select or a literal.
fn decode_value_payload(payload: &str) -> QirResult<Expr> {
    let json: Json = serde_json::from_str(payload)?;
    if json.get("type").and_then(Json::as_str) == Some(statement::SELECT_TYPE) {
        return Ok(Expr::SubQuery(Box::new(SelectQuery::from_json(&json)?)));
    }
    Ok(Expr::Value(payload_value_from_json(&json)))
}

fn decode_date(ms: i64) -> QirResult<Expr> {
    Value::from_millis(ms)
        .map(Expr::Value)
        .ok_or_else(|| QirError::invalid(format!("Invalid date value: {}", ms)))
}

/// Expression from any JSON slot that holds one: strings are classified,
/// condition objects become conditions, other scalars are column text.
pub fn expr_from_json(json: &Json) -> QirResult<Expr> {
    match json {
        Json::String(text) => Expr::deserialize(text),
        Json::Object(_) if is_condition_json(json) => Ok(Expr::from(condition_from_json(json)?)),
        Json::Null => Ok(Expr::Value(Value::Null)),
        other => Ok(Expr::Column(other.to_string())),
    }
}

impl Expr {
    /// Single-string encoding of this expression.
    pub fn serialize(&self) -> String {
        match self {
            Expr::Column(text) => text.clone(),
            Expr::Value(Value::Date(d)) => sentinel::encode_date(d.timestamp_millis()),
            Expr::Value(v) => format!("{}{}", VALUE_PREFIX, value_to_json(v)),
            Expr::Raw(v) => format!("{}{}{}", RAW_MARK, value_to_json(v), RAW_MARK),
            Expr::Function(FunctionCall { name, args }) => {
                encode_call(FUNCTION_PREFIX, name, args)
            }
            Expr::Operation(Operation { operator, args }) => {
                encode_call(OPERATION_PREFIX, operator, args)
            }
            Expr::Condition(c) => c.serialize(),
            Expr::SubQuery(q) => format!("{}{}", VALUE_PREFIX, q.serialize()),
        }
    }

    /// Classify a serialized expression: value and date sentinels, raw,
    /// function, operation, condition JSON, and finally plain column text.
    pub fn deserialize(text: &str) -> QirResult<Expr> {
        match sentinel::classify(text) {
            Some(Sentinel::Value(payload)) => return decode_value_payload(payload),
            Some(Sentinel::Date(ms)) => return decode_date(ms),
            Some(Sentinel::Raw(payload)) => {
                let json: Json = serde_json::from_str(payload)?;
                return Ok(Expr::Raw(value_from_json(&json)));
            }
            Some(Sentinel::Function(payload)) => {
                let (name, args) = decode_call(payload, text)?;
                return Ok(Expr::Function(FunctionCall { name, args }));
            }
            Some(Sentinel::Operation(payload)) => {
                let (operator, args) = decode_call(payload, text)?;
                return Ok(Expr::Operation(Operation { operator, args }));
            }
            None => {}
        }
        if sentinel::looks_like_date(text) {
            return Err(QirError::invalid(format!("Invalid date value: {}", text)));
        }
        if text.starts_with('{') {
            if let Ok(json) = serde_json::from_str::<Json>(text) {
                if is_condition_json(&json) {
                    return Ok(Expr::from(condition_from_json(&json)?));
                }
            }
        }
        Ok(Expr::Column(text.to_string()))
    }

    /// Read a JSON value slot. Strings without a value or raw sentinel are
    /// string literals, never columns; function calls are rejected.
    pub fn deserialize_value(json: &Json) -> QirResult<Expr> {
        let Json::String(text) = json else {
            return Ok(Expr::Value(value_from_json(json)));
        };
        match sentinel::classify(text) {
            Some(Sentinel::Function(_)) => Err(QirError::function_as_value()),
            Some(_) => Expr::deserialize(text),
            None if text.starts_with('{') => match serde_json::from_str::<Json>(text) {
                Ok(inner) if is_condition_json(&inner) => {
                    Ok(Expr::from(condition_from_json(&inner)?))
                }
                _ => Ok(Expr::Value(Value::String(text.clone()))),
            },
            None => Ok(Expr::Value(value_from_json(json))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{conditions as cond, functions as func, statements as q};
    use pretty_assertions::assert_eq;

    fn assert_stable(expr: Expr) {
        let text = expr.serialize();
        let back = Expr::deserialize(&text).unwrap();
        assert_eq!(back, expr);
        assert_eq!(back.serialize(), text);
    }

    #[test]
    fn test_serialize_forms() {
        assert_eq!(Expr::column("foo").serialize(), "foo");
        assert_eq!(Expr::from(q::value("foo")).serialize(), "!!!\"foo\"");
        assert_eq!(Expr::from(q::value(123)).serialize(), "!!!123");
        assert_eq!(Expr::from(q::raw("NOW()")).serialize(), "!!\"NOW()\"!!");
        assert_eq!(
            func::sum(func::year("foo")).serialize(),
            r#"FN(["SUM","FN([\"YEAR\",\"foo\"])"])"#
        );
        assert_eq!(
            func::add(["a", "b"]).serialize(),
            r#"OP(["+","a","b"])"#
        );
    }

    #[test]
    fn test_round_trips() {
        assert_stable(Expr::column("foo.bar"));
        assert_stable(q::value("it's").into());
        assert_stable(q::value(Value::from_millis(1_705_314_600_000)).into());
        assert_stable(q::raw(42).into());
        assert_stable(q::null().into());
        assert_stable(func::ifnull(func::if_(cond::equal("a", 1), "b", q::value(2)), "c"));
        assert_stable(func::divide([func::subtract(["a", "b"]), Expr::column("c")]));
        assert_stable(Expr::from(cond::like("name", "J%")));
        assert_stable(Expr::from(q::select().field(func::sum("price")).from("orders")));
    }

    #[test]
    fn test_plain_json_arguments() {
        let expr = Expr::deserialize(r#"FN(["IFNULL","foo",123])"#).unwrap();
        assert_eq!(
            expr,
            Expr::function("IFNULL", vec![Expr::column("foo"), Expr::column("123")])
        );
    }

    #[test]
    fn test_deserialize_value_rejects_function() {
        let json = Json::String(func::max("a").serialize());
        let err = Expr::deserialize_value(&json).unwrap_err();
        assert_eq!(err.to_string(), "FunctionExpression cannot be used as a value");

        let plain = Expr::deserialize_value(&Json::String("price".into())).unwrap();
        assert_eq!(plain, Expr::Value(Value::from("price")));
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(Expr::deserialize("!D!soon!!").is_err());
    }
}
