//! # Seatlock
//!
//! Seat hold and booking commit service for cinema showtimes.
//!
//! A customer selects seats for a showtime, the service holds them under
//! a short-lived session lock, and a paid booking is committed inside one
//! transaction so that no seat is ever sold twice.
//!
//! ## Architecture
//!
//! - **domain**: aggregates, repository traits and collaborator ports
//! - **application**: lock manager, seat selection, booking committer and
//!   the background sweepers
//! - **infrastructure**: SeaORM storage, mock payment gateway, JWT
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
