use crate::ast::{Condition, SelectQuery, Value};
use crate::error::{QirError, QirResult};
use chrono::{DateTime, Utc};

/// Scalar expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference or SQL fragment. The text may embed `#name#`
    /// (quoted identifier) and `&text&` (escaped string literal) markers.
    Column(String),
    /// Literal rendered with the flavor's value escaping.
    Value(Value),
    /// Literal emitted verbatim.
    Raw(Value),
    Function(FunctionCall),
    Operation(Operation),
    /// Boolean condition used as a computed column or function argument.
    Condition(Box<Condition>),
    /// Nested select rendered in parentheses.
    SubQuery(Box<SelectQuery>),
}

/// `NAME(arg, ...)`, lowered per flavor.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Infix operation over two or more operands: `(a op b op c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn raw(value: impl Into<Value>) -> Self {
        Expr::Raw(value.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(FunctionCall {
            name: name.into(),
            args,
        })
    }

    pub fn operation(operator: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Operation(Operation {
            operator: operator.into(),
            args,
        })
    }

    /// Wrap a column name in the identifier marker understood by column templates.
    pub fn escape_column(name: impl std::fmt::Display) -> String {
        format!("#{}#", name)
    }

    /// Wrap text in the string-literal marker understood by column templates.
    pub fn escape_string(text: impl std::fmt::Display) -> String {
        format!("&{}&", text)
    }

    /// The column-template form of an expression argument, for helpers that
    /// build SQL fragments out of other expressions.
    pub fn escape_expression_value(&self) -> QirResult<String> {
        match self {
            Expr::Column(name) => Ok(Self::escape_column(name)),
            Expr::Function(_) => Err(QirError::function_as_value()),
            Expr::Value(v) | Expr::Raw(v) => Ok(v.to_plain_string()),
            other => Err(QirError::invalid(format!(
                "Invalid expression value: {}",
                other.serialize()
            ))),
        }
    }

    /// Text payload of a literal-ish node, used where a flavor needs the
    /// argument's own value rather than its rendering.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Expr::Column(text) => Some(text.clone()),
            Expr::Value(v) | Expr::Raw(v) => Some(v.to_plain_string()),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Expr::Function(_))
    }

    /// Identifier a DynamoDB target should reference for this expression.
    pub fn column_name(&self) -> String {
        match self {
            Expr::Column(name) => name.clone(),
            other => other.serialize(),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Column(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Column(s)
    }
}

impl From<&String> for Expr {
    fn from(s: &String) -> Self {
        Expr::Column(s.clone())
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Column(n.to_string())
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Column(n.to_string())
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Column(Value::format_float(n))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Column(b.to_string())
    }
}

impl From<FunctionCall> for Expr {
    fn from(call: FunctionCall) -> Self {
        Expr::Function(call)
    }
}

impl From<Operation> for Expr {
    fn from(op: Operation) -> Self {
        Expr::Operation(op)
    }
}

impl From<Condition> for Expr {
    fn from(cond: Condition) -> Self {
        Expr::Condition(Box::new(cond))
    }
}

impl From<SelectQuery> for Expr {
    fn from(query: SelectQuery) -> Self {
        Expr::SubQuery(Box::new(query))
    }
}

impl From<ValueExpr> for Expr {
    fn from(v: ValueExpr) -> Self {
        v.0
    }
}

/// An expression that is allowed in value position.
///
/// Literals convert into a value node; raw, value, condition and sub-query
/// expressions pass through. A function call never converts implicitly:
/// `ValueExpr::try_from(expr)` rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueExpr(pub(crate) Expr);

impl ValueExpr {
    pub fn into_inner(self) -> Expr {
        self.0
    }

    pub fn as_expr(&self) -> &Expr {
        &self.0
    }
}

impl TryFrom<Expr> for ValueExpr {
    type Error = QirError;

    fn try_from(expr: Expr) -> QirResult<Self> {
        match expr {
            Expr::Function(_) => Err(QirError::function_as_value()),
            other => Ok(ValueExpr(other)),
        }
    }
}

impl From<Value> for ValueExpr {
    fn from(v: Value) -> Self {
        ValueExpr(Expr::Value(v))
    }
}

impl From<&str> for ValueExpr {
    fn from(s: &str) -> Self {
        Value::from(s).into()
    }
}

impl From<String> for ValueExpr {
    fn from(s: String) -> Self {
        Value::from(s).into()
    }
}

impl From<i32> for ValueExpr {
    fn from(n: i32) -> Self {
        Value::from(n).into()
    }
}

impl From<i64> for ValueExpr {
    fn from(n: i64) -> Self {
        Value::from(n).into()
    }
}

impl From<u32> for ValueExpr {
    fn from(n: u32) -> Self {
        Value::from(n).into()
    }
}

impl From<f64> for ValueExpr {
    fn from(n: f64) -> Self {
        Value::from(n).into()
    }
}

impl From<bool> for ValueExpr {
    fn from(b: bool) -> Self {
        Value::from(b).into()
    }
}

impl From<DateTime<Utc>> for ValueExpr {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d).into()
    }
}

impl From<SelectQuery> for ValueExpr {
    fn from(query: SelectQuery) -> Self {
        ValueExpr(Expr::SubQuery(Box::new(query)))
    }
}

impl From<Condition> for ValueExpr {
    fn from(cond: Condition) -> Self {
        ValueExpr(Expr::Condition(Box::new(cond)))
    }
}

impl<T: Into<ValueExpr>> From<Option<T>> for ValueExpr {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => ValueExpr(Expr::Value(Value::Null)),
        }
    }
}
