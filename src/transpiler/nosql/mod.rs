//! DynamoDB targets: PartiQL statements and native request inputs.

pub mod attribute;
pub mod dynamo;
pub mod partiql;

use crate::ast::SelectQuery;
use crate::error::{QirError, QirResult};

/// Reject select clauses DynamoDB cannot evaluate.
pub(crate) fn validate_select(query: &SelectQuery, target: &'static str) -> QirResult<()> {
    let unsupported = if !query.joins().is_empty() {
        Some("DynamoDB does not support JOIN operations")
    } else if !query.group_by_items().is_empty() {
        Some("DynamoDB does not support GROUP BY")
    } else if !query.having_conditions().is_empty() {
        Some("DynamoDB does not support HAVING")
    } else if !query.union_queries().is_empty() {
        Some("DynamoDB does not support UNION")
    } else if query.offset_value().is_some() {
        Some("DynamoDB does not support OFFSET. Use ExclusiveStartKey for pagination.")
    } else {
        None
    };
    match unsupported {
        Some(message) => Err(QirError::unsupported(target, message)),
        None => Ok(()),
    }
}

/// How a LIKE pattern maps onto DynamoDB string functions. A trailing-only
/// wildcard is a prefix match; a leading one has no suffix function and
/// falls back to `contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LikePattern<'a> {
    Contains(&'a str),
    BeginsWith(&'a str),
    Exact(&'a str),
}

impl<'a> LikePattern<'a> {
    pub(crate) fn classify(pattern: &'a str) -> Self {
        let last = pattern.len().saturating_sub(1);
        match (pattern.starts_with('%'), pattern.ends_with('%')) {
            (true, true) => LikePattern::Contains(pattern.get(1..last).unwrap_or("")),
            (false, true) => LikePattern::BeginsWith(&pattern[..last]),
            (true, false) => LikePattern::Contains(&pattern[1..]),
            (false, false) => LikePattern::Exact(pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_like_pattern() {
        assert_eq!(LikePattern::classify("%john%"), LikePattern::Contains("john"));
        assert_eq!(LikePattern::classify("ORDER#%"), LikePattern::BeginsWith("ORDER#"));
        assert_eq!(LikePattern::classify("%son"), LikePattern::Contains("son"));
        assert_eq!(LikePattern::classify("exact"), LikePattern::Exact("exact"));
        assert_eq!(LikePattern::classify("%"), LikePattern::Contains(""));
    }
}
