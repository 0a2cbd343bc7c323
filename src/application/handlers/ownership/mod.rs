//! Ownership command handlers.

mod add_owner;

pub use add_owner::{AddOwnerCommand, AddOwnerHandler};
