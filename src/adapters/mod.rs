//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Bearer token validation (JWT) and test doubles
//! - `http` - axum REST surface
//! - `memory` - In-process trip store for tests and local runs
//! - `postgres` - PostgreSQL trip store and user directory

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{JwtSessionValidator, MockSessionValidator, MockUserDirectory};
pub use memory::InMemoryTripRepository;
pub use postgres::{PostgresTripRepository, PostgresUserDirectory};
