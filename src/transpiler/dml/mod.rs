//! DML rendering: SELECT, INSERT, UPDATE and DELETE.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::render_delete;
pub use insert::render_insert;
pub use select::{render_select, render_table};
pub use update::render_update;
