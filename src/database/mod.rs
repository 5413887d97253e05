/*!
 * SQLite persistence for assembled transaction records.
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{SearchFilters, TransactionRecord};
pub use repository::Repository;
