//! Query AST: expressions, conditions and statements.

pub mod builders;
pub mod conditions;
pub mod ddl;
pub mod expr;
pub mod mutation;
pub mod select;
pub mod statement;
pub mod table;
pub mod values;

pub use conditions::{CompareOp, Condition, LogicalOp};
pub use ddl::{CreateTableAsSelect, CreateViewAsSelect};
pub use expr::{Expr, FunctionCall, Operation, ValueExpr};
pub use mutation::{DeleteMutation, InsertMutation, Row, UpdateMutation};
pub use select::{OrderBy, SelectField, SelectQuery, SortOrder, UnionQuery, UnionType};
pub use statement::{OperationType, Statement};
pub use table::{Join, JoinType, Table, TableSource};
pub use values::Value;
