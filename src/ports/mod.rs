//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `TripRepository` / `TripTransaction` - Trip storage with per-trip locking
//! - `UserDirectory` - Lookup of registered users
//!
//! ## Identity Ports
//!
//! - `SessionValidator` - Bearer token validation

mod session_validator;
mod trip_repository;
mod user_directory;

pub use session_validator::SessionValidator;
pub use trip_repository::{with_transaction, TripRepository, TripTransaction};
pub use user_directory::UserDirectory;
