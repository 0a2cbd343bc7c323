//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTripRepository` - Trips with row-level locking per trip
//! - `PostgresUserDirectory` - Read-only lookup of registered users

mod trip_repository;
mod user_directory;

pub use trip_repository::PostgresTripRepository;
pub use user_directory::PostgresUserDirectory;
