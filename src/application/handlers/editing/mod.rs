//! Editing command handlers: transactional modify and delete.

mod delete_trip;
mod modify_trip;

pub use delete_trip::{DeleteTripCommand, DeleteTripHandler};
pub use modify_trip::{ModifyTripCommand, ModifyTripHandler};
