//! Free-function builders.
//!
//! - [`statements`] (`q`): statement and expression entry points
//! - [`conditions`] (`cond`): predicate factories
//! - [`functions`] (`func`): portable SQL functions and operators

pub mod conditions;
pub mod functions;
pub mod statements;
