//! SQL flavors, one per dialect.

pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod timestream;

pub use mysql::MySqlFlavor;
pub use postgres::PostgresFlavor;
pub use sqlite::SqliteFlavor;
pub use timestream::TimestreamFlavor;
