//! Identity adapters.
//!
//! Implementations of the `SessionValidator` and `UserDirectory` ports:
//!
//! - `jwt` - Production HS256 token validation
//! - `mock` - Test implementations that don't require external services

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::{MockSessionValidator, MockUserDirectory};
