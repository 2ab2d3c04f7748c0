//! DynamoDB attribute values and placeholder allocation.

use crate::ast::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// A typed DynamoDB attribute, serialized in the wire shape `{"S": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttributeValue {
    S(String),
    /// Numbers travel as strings.
    N(String),
    #[serde(with = "base64_bytes")]
    B(Vec<u8>),
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    L(Vec<AttributeValue>),
    M(IndexMap<String, AttributeValue>),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "BOOL")]
    Bool(bool),
}

pub type AttributeMap = IndexMap<String, AttributeValue>;

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null(true),
            Value::Bool(b) => AttributeValue::Bool(*b),
            Value::Int(n) => AttributeValue::N(n.to_string()),
            Value::Float(f) => AttributeValue::N(Value::format_float(*f)),
            Value::String(s) => AttributeValue::S(s.clone()),
            Value::Date(d) => AttributeValue::S(Value::iso_date(d)),
            Value::Bytes(bytes) => AttributeValue::B(bytes.clone()),
            Value::List(items) => list_attribute(items),
            Value::Map(map) => AttributeValue::M(
                map.iter()
                    .map(|(k, v)| (k.clone(), AttributeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Non-empty homogeneous string and number lists become sets.
fn list_attribute(items: &[Value]) -> AttributeValue {
    if !items.is_empty() {
        if let Some(strings) = items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        {
            return AttributeValue::Ss(strings);
        }
        if let Some(numbers) = items
            .iter()
            .map(|v| match v {
                Value::Int(n) => Some(n.to_string()),
                Value::Float(f) => Some(Value::format_float(*f)),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
        {
            return AttributeValue::Ns(numbers);
        }
    }
    AttributeValue::L(items.iter().map(AttributeValue::from).collect())
}

mod base64_bytes {
    use base64::{Engine, prelude::BASE64_STANDARD};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }
}

/// Allocates `#nN` name and `:vN` value placeholders for one request.
///
/// Names are shared by attribute name and values by their JSON form, so a
/// column or literal used twice maps to the same placeholder.
#[derive(Debug, Default)]
pub struct ExpressionContext {
    names: IndexMap<String, String>,
    name_lookup: IndexMap<String, String>,
    values: AttributeMap,
    value_lookup: IndexMap<String, String>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_name(&mut self, name: &str) -> String {
        if let Some(placeholder) = self.name_lookup.get(name) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), name.to_string());
        self.name_lookup.insert(name.to_string(), placeholder.clone());
        placeholder
    }

    /// Values are shared by their DynamoDB form, so `1` and `1.0` reuse
    /// one placeholder.
    pub fn add_value(&mut self, value: &Value) -> String {
        let attribute = AttributeValue::from(value);
        let key = serde_json::to_string(&attribute).unwrap_or_else(|_| format!("{:?}", attribute));
        if let Some(placeholder) = self.value_lookup.get(&key) {
            return placeholder.clone();
        }
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), attribute);
        self.value_lookup.insert(key, placeholder.clone());
        placeholder
    }

    /// Placeholder to attribute name, `None` when nothing was allocated.
    pub fn names(&self) -> Option<IndexMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }

    pub fn values(&self) -> Option<AttributeMap> {
        (!self.values.is_empty()).then(|| self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_attribute_mapping() {
        assert_eq!(AttributeValue::from(&Value::Null), AttributeValue::Null(true));
        assert_eq!(AttributeValue::from(&Value::from(99.99)), AttributeValue::N("99.99".into()));
        assert_eq!(
            AttributeValue::from(&Value::List(vec!["a".into(), "b".into()])),
            AttributeValue::Ss(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            AttributeValue::from(&Value::List(vec![1.into(), 2.5.into()])),
            AttributeValue::Ns(vec!["1".into(), "2.5".into()])
        );
        assert_eq!(
            AttributeValue::from(&Value::List(vec![1.into(), "a".into()])),
            AttributeValue::L(vec![AttributeValue::N("1".into()), AttributeValue::S("a".into())])
        );
        assert_eq!(AttributeValue::from(&Value::List(vec![])), AttributeValue::L(vec![]));
    }

    #[test]
    fn test_wire_shape() {
        let date = Value::from_millis(1_705_314_600_000).unwrap();
        let json = serde_json::to_value(AttributeValue::from(&date)).unwrap();
        assert_eq!(json, json!({"S": "2024-01-15T10:30:00.000Z"}));

        let bytes = serde_json::to_value(AttributeValue::from(&Value::Bytes(b"hi".to_vec()))).unwrap();
        assert_eq!(bytes, json!({"B": "aGk="}));

        let flags = serde_json::to_value(AttributeValue::from(&Value::Null)).unwrap();
        assert_eq!(flags, json!({"NULL": true}));
    }

    #[test]
    fn test_placeholders_are_shared() {
        let mut ctx = ExpressionContext::new();
        assert_eq!(ctx.add_name("status"), "#n0");
        assert_eq!(ctx.add_name("age"), "#n1");
        assert_eq!(ctx.add_name("status"), "#n0");
        assert_eq!(ctx.add_value(&Value::from("active")), ":v0");
        assert_eq!(ctx.add_value(&Value::from(18)), ":v1");
        assert_eq!(ctx.add_value(&Value::from("active")), ":v0");
        assert_eq!(ctx.names().unwrap().len(), 2);
        assert_eq!(ExpressionContext::new().values(), None);
    }

    #[test]
    fn test_placeholders_follow_attribute_form() {
        let mut ctx = ExpressionContext::new();
        assert_eq!(ctx.add_value(&Value::Null), ":v0");
        assert_eq!(ctx.add_value(&Value::Float(f64::NAN)), ":v1");
        assert_eq!(ctx.add_value(&Value::Int(1)), ":v2");
        assert_eq!(ctx.add_value(&Value::Float(1.0)), ":v2");
        assert_eq!(ctx.add_value(&Value::from("1")), ":v3");
        assert_eq!(
            ctx.values().unwrap().get(":v1"),
            Some(&AttributeValue::N("NaN".into()))
        );
    }
}
