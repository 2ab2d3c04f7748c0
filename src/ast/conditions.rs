use crate::ast::Expr;

/// Comparison operator shared by binary and column-to-column conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }

    /// Parse the textual operator used in serialized conditions.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(CompareOp::Eq),
            "!=" | "<>" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Gte),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AND" => Some(LogicalOp::And),
            "OR" => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean predicate over expressions.
///
/// Keys are column expressions; every value slot holds an expression in
/// value position (see [`ValueExpr`](crate::ast::ValueExpr)), so string
/// values are always rendered as quoted literals and never as identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Binary {
        key: Expr,
        value: Expr,
        operator: CompareOp,
    },
    Between {
        key: Expr,
        from: Expr,
        to: Expr,
    },
    In {
        key: Expr,
        values: Vec<Expr>,
    },
    NotIn {
        key: Expr,
        values: Vec<Expr>,
    },
    Null {
        key: Expr,
        is_null: bool,
    },
    Like {
        key: Expr,
        pattern: String,
        is_like: bool,
    },
    ColumnComparison {
        left: Expr,
        right: Expr,
        operator: CompareOp,
    },
    Logical {
        conditions: Vec<Condition>,
        operator: LogicalOp,
    },
    Not(Box<Condition>),
}

impl Condition {
    /// The wire discriminator of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Condition::Binary { .. } => "BinaryCondition",
            Condition::Between { .. } => "BetweenCondition",
            Condition::In { .. } => "InCondition",
            Condition::NotIn { .. } => "NotInCondition",
            Condition::Null { .. } => "NullCondition",
            Condition::Like { .. } => "LikeCondition",
            Condition::ColumnComparison { .. } => "ColumnComparisonCondition",
            Condition::Logical { .. } => "LogicalCondition",
            Condition::Not(_) => "NotCondition",
        }
    }

    /// Left-hand key of a single-column predicate. Logical, negated and
    /// column-comparison conditions have none.
    pub fn key(&self) -> Option<&Expr> {
        match self {
            Condition::Binary { key, .. }
            | Condition::Between { key, .. }
            | Condition::In { key, .. }
            | Condition::NotIn { key, .. }
            | Condition::Null { key, .. }
            | Condition::Like { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Build a logical condition, dropping absent members. Returns `None` when
    /// nothing is left, which every consumer treats as "no condition".
    pub fn logical<I>(operator: LogicalOp, conditions: I) -> Option<Condition>
    where
        I: IntoIterator<Item = Option<Condition>>,
    {
        let conditions: Vec<Condition> = conditions.into_iter().flatten().collect();
        if conditions.is_empty() {
            return None;
        }
        Some(Condition::Logical {
            conditions,
            operator,
        })
    }
}
