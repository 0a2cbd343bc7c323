//! Trip module - the capacity-limited bookable event.
//!
//! # Module Structure
//!
//! - `aggregate` - Trip aggregate and its invariant-preserving mutations
//! - `values` - Capacity, Price, Stop and the editable TripDetails
//! - `errors` - TripError with stable reason codes

mod aggregate;
mod errors;
mod values;

pub use aggregate::Trip;
pub use errors::TripError;
pub use values::{Capacity, Price, Stop, TripDetails, MAX_CAPACITY};
