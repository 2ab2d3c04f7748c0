//! JSON forms of literals and conditions.

use crate::ast::{CompareOp, Condition, Expr, LogicalOp, Value};
use crate::codec::sentinel::{self, Sentinel};
use crate::error::{QirError, QirResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};

/// Literal to JSON. Dates use the date sentinel so they survive the trip
/// back; strings that would read as a sentinel are escaped with `!!!`.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::String(s) if needs_escape(s) => Json::String(format!("{}{}", sentinel::VALUE_PREFIX, s)),
        Value::String(s) => Json::String(s.clone()),
        Value::Date(d) => Json::String(sentinel::encode_date(d.timestamp_millis())),
        Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => Json::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect::<Map<String, Json>>(),
        ),
    }
}

fn needs_escape(s: &str) -> bool {
    s.starts_with(sentinel::VALUE_PREFIX) || s.starts_with(sentinel::DATE_PREFIX)
}

/// JSON to literal, the inverse of [`value_to_json`].
pub fn value_from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => string_from_json(s),
        Json::Array(items) => Value::List(items.iter().map(value_from_json).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), value_from_json(v)))
                .collect::<IndexMap<String, Value>>(),
        ),
    }
}

fn string_from_json(s: &str) -> Value {
    if let Some(escaped) = s.strip_prefix(sentinel::VALUE_PREFIX) {
        return Value::String(escaped.to_string());
    }
    match sentinel::classify(s) {
        Some(Sentinel::Date(ms)) => Value::from_millis(ms).unwrap_or_else(|| Value::String(s.to_string())),
        _ => Value::String(s.to_string()),
    }
}

/// Payload of a `!!!` value expression. Top-level dates never travel here,
/// so a top-level string is always text, even when shaped like a date.
pub fn payload_value_from_json(json: &Json) -> Value {
    match json {
        Json::String(s) => Value::String(s.strip_prefix(sentinel::VALUE_PREFIX).unwrap_or(s).to_string()),
        other => value_from_json(other),
    }
}

/// Condition wire format, discriminated by `type`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ConditionJson {
    BinaryCondition {
        key: String,
        value: Json,
        operator: String,
    },
    LogicalCondition {
        conditions: Vec<Json>,
        operator: String,
    },
    BetweenCondition {
        key: String,
        from: Json,
        to: Json,
    },
    InCondition {
        key: String,
        values: Vec<Json>,
    },
    NotInCondition {
        key: String,
        values: Vec<Json>,
    },
    NullCondition {
        key: String,
        #[serde(rename = "isNull")]
        is_null: bool,
    },
    LikeCondition {
        key: String,
        pattern: String,
        #[serde(rename = "isLike")]
        is_like: bool,
    },
    ColumnComparisonCondition {
        #[serde(rename = "leftKey")]
        left_key: String,
        #[serde(rename = "rightKey")]
        right_key: String,
        operator: String,
    },
    NotCondition {
        condition: Json,
    },
}

const CONDITION_TYPES: &[&str] = &[
    "BinaryCondition",
    "LogicalCondition",
    "BetweenCondition",
    "InCondition",
    "NotInCondition",
    "NullCondition",
    "LikeCondition",
    "ColumnComparisonCondition",
    "NotCondition",
];

/// Whether a JSON object carries a known condition discriminator.
pub fn is_condition_json(json: &Json) -> bool {
    json.get("type")
        .and_then(Json::as_str)
        .is_some_and(|t| CONDITION_TYPES.contains(&t))
}

fn compare_op(s: &str) -> QirResult<CompareOp> {
    CompareOp::parse(s).ok_or_else(|| QirError::invalid(format!("Invalid operator: {}", s)))
}

fn value_json(expr: &Expr) -> Json {
    Json::String(expr.serialize())
}

pub fn condition_to_json(condition: &Condition) -> Json {
    let wire = match condition {
        Condition::Binary {
            key,
            value,
            operator,
        } => ConditionJson::BinaryCondition {
            key: key.serialize(),
            value: value_json(value),
            operator: operator.as_str().to_string(),
        },
        Condition::Logical {
            conditions,
            operator,
        } => ConditionJson::LogicalCondition {
            conditions: conditions.iter().map(condition_to_json).collect(),
            operator: operator.as_str().to_string(),
        },
        Condition::Between { key, from, to } => ConditionJson::BetweenCondition {
            key: key.serialize(),
            from: value_json(from),
            to: value_json(to),
        },
        Condition::In { key, values } => ConditionJson::InCondition {
            key: key.serialize(),
            values: values.iter().map(value_json).collect(),
        },
        Condition::NotIn { key, values } => ConditionJson::NotInCondition {
            key: key.serialize(),
            values: values.iter().map(value_json).collect(),
        },
        Condition::Null { key, is_null } => ConditionJson::NullCondition {
            key: key.serialize(),
            is_null: *is_null,
        },
        Condition::Like {
            key,
            pattern,
            is_like,
        } => ConditionJson::LikeCondition {
            key: key.serialize(),
            pattern: pattern.clone(),
            is_like: *is_like,
        },
        Condition::ColumnComparison {
            left,
            right,
            operator,
        } => ConditionJson::ColumnComparisonCondition {
            left_key: left.serialize(),
            right_key: right.serialize(),
            operator: operator.as_str().to_string(),
        },
        Condition::Not(inner) => ConditionJson::NotCondition {
            condition: condition_to_json(inner),
        },
    };
    // Plain data with string keys; serialization cannot fail.
    serde_json::to_value(wire).unwrap_or(Json::Null)
}

pub fn condition_from_json(json: &Json) -> QirResult<Condition> {
    let kind = json.get("type").and_then(Json::as_str).unwrap_or_default();
    if !CONDITION_TYPES.contains(&kind) {
        return Err(QirError::unknown_type("condition", kind));
    }
    let wire: ConditionJson = serde_json::from_value(json.clone())?;
    Ok(match wire {
        ConditionJson::BinaryCondition {
            key,
            value,
            operator,
        } => Condition::Binary {
            key: Expr::deserialize(&key)?,
            value: Expr::deserialize_value(&value)?,
            operator: compare_op(&operator)?,
        },
        ConditionJson::LogicalCondition {
            conditions,
            operator,
        } => Condition::Logical {
            conditions: conditions
                .iter()
                .map(condition_from_json)
                .collect::<QirResult<_>>()?,
            operator: LogicalOp::parse(&operator)
                .ok_or_else(|| QirError::invalid(format!("Invalid operator: {}", operator)))?,
        },
        ConditionJson::BetweenCondition { key, from, to } => Condition::Between {
            key: Expr::deserialize(&key)?,
            from: Expr::deserialize_value(&from)?,
            to: Expr::deserialize_value(&to)?,
        },
        ConditionJson::InCondition { key, values } => Condition::In {
            key: Expr::deserialize(&key)?,
            values: values
                .iter()
                .map(Expr::deserialize_value)
                .collect::<QirResult<_>>()?,
        },
        ConditionJson::NotInCondition { key, values } => Condition::NotIn {
            key: Expr::deserialize(&key)?,
            values: values
                .iter()
                .map(Expr::deserialize_value)
                .collect::<QirResult<_>>()?,
        },
        ConditionJson::NullCondition { key, is_null } => Condition::Null {
            key: Expr::deserialize(&key)?,
            is_null,
        },
        ConditionJson::LikeCondition {
            key,
            pattern,
            is_like,
        } => Condition::Like {
            key: Expr::deserialize(&key)?,
            pattern,
            is_like,
        },
        ConditionJson::ColumnComparisonCondition {
            left_key,
            right_key,
            operator,
        } => Condition::ColumnComparison {
            left: Expr::deserialize(&left_key)?,
            right: Expr::deserialize(&right_key)?,
            operator: compare_op(&operator)?,
        },
        ConditionJson::NotCondition { condition } => {
            Condition::Not(Box::new(condition_from_json(&condition)?))
        }
    })
}

impl Condition {
    /// JSON text of this condition.
    pub fn serialize(&self) -> String {
        condition_to_json(self).to_string()
    }

    pub fn to_json(&self) -> Json {
        condition_to_json(self)
    }

    pub fn from_json(json: &Json) -> QirResult<Condition> {
        condition_from_json(json)
    }

    pub fn deserialize(text: &str) -> QirResult<Condition> {
        let json: Json = serde_json::from_str(text)?;
        condition_from_json(&json)
    }
}
