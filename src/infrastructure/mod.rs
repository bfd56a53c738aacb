//! Infrastructure layer: database, payment gateway and token crypto.

pub mod crypto;
pub mod database;
pub mod payment;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
