//! # qir: a portable query IR
//!
//! Build SQL-shaped statements as immutable values, ship them as JSON, and
//! compile them for the backend at hand: SQL text in several flavors,
//! DynamoDB PartiQL, or native DynamoDB request inputs.
//!
//! ## Quick Example
//!
//! ```
//! use qir::prelude::*;
//!
//! let query = q::select()
//!     .field("name")
//!     .from("users")
//!     .filter(cond::equal("active", true))
//!     .limit(10);
//!
//! assert_eq!(
//!     query.to_sql().unwrap(),
//!     "SELECT `name` FROM `users` WHERE `active` = true LIMIT 10"
//! );
//! assert_eq!(
//!     query.to_sql_with_flavor(&PostgresFlavor::new()).unwrap(),
//!     r#"SELECT "name" FROM "users" WHERE "active" = true LIMIT 10"#
//! );
//!
//! // The wire form reads back into the same statement.
//! let statement = q::deserialize(&query.serialize()).unwrap();
//! assert_eq!(statement.compile(&PartiqlTarget::new()).unwrap(),
//!     "SELECT name FROM users WHERE active = TRUE LIMIT 10");
//! ```
//!
//! ## Backends
//!
//! | Target          | Output                         |
//! |-----------------|--------------------------------|
//! | `SqlTarget`     | SQL text through a [`Flavor`]  |
//! | `PartiqlTarget` | DynamoDB PartiQL text          |
//! | `DynamoTarget`  | Query/Scan/PutItem/... inputs  |
//!
//! [`Flavor`]: transpiler::Flavor

pub mod ast;
pub mod codec;
pub mod config;
pub mod error;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::{conditions as cond, functions as func, statements as q};
    pub use crate::ast::{
        CompareOp, Condition, CreateTableAsSelect, CreateViewAsSelect, DeleteMutation, Expr,
        InsertMutation, JoinType, LogicalOp, OperationType, Row, SelectQuery, SortOrder, Statement,
        Table, TableSource, UnionType, UpdateMutation, Value, ValueExpr,
    };
    pub use crate::config::QirConfig;
    pub use crate::error::{QirError, QirResult};
    pub use crate::transpiler::{
        Dialect, DynamoOptions, DynamoRequest, DynamoTarget, Flavor, FlavorOptions, MySqlFlavor,
        PartiqlTarget, PostgresFlavor, QueryTarget, RenderOptions, SqlTarget, SqliteFlavor,
        TimestreamFlavor, ToSql,
    };
}
