//! Membership command handlers: joining and leaving trips.

mod join_trip;
mod leave_trip;

pub use join_trip::{JoinTripCommand, JoinTripHandler, JoinTripResult};
pub use leave_trip::{LeaveTripCommand, LeaveTripHandler, LeaveTripResult};
