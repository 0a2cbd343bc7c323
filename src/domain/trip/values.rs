//! Value objects describing a trip.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Largest seat count the store can hold.
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Maximum number of participants a trip accepts. Between one and
/// [`MAX_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a capacity, rejecting zero and counts above [`MAX_CAPACITY`].
    pub fn new(seats: u32) -> Result<Self, ValidationError> {
        if seats == 0 {
            return Err(ValidationError::below_minimum("capacity", 1, 0));
        }
        if seats > MAX_CAPACITY {
            return Err(ValidationError::invalid_format(
                "capacity",
                format!("cannot exceed {MAX_CAPACITY}"),
            ));
        }
        Ok(Self(seats))
    }

    /// Returns the number of seats.
    pub fn seats(&self) -> u32 {
        self.0
    }

    /// Seat count as `usize`, for comparisons against set lengths.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u32> for Capacity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

/// Ticket price. Finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Creates a price, rejecting negative and non-finite amounts.
    pub fn new(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format("price", "must be a finite number"));
        }
        if amount < 0.0 {
            return Err(ValidationError::invalid_format("price", "cannot be negative"));
        }
        Ok(Self(amount))
    }

    /// A free trip.
    pub fn free() -> Self {
        Self(0.0)
    }

    /// Returns the amount.
    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// A place and the moment the trip is there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub place: String,
    pub at: Timestamp,
}

impl Stop {
    pub fn new(place: impl Into<String>, at: Timestamp) -> Self {
        Self {
            place: place.into(),
            at,
        }
    }
}

/// The descriptive fields of a trip: everything an owner may overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetails {
    pub name: String,
    pub description: String,
    pub departure: Stop,
    pub arrival: Stop,
    pub price: Price,
    pub capacity: Capacity,
    pub image: Option<String>,
}

impl TripDetails {
    /// Checks the field rules the request layer enforces before a trip is
    /// created or modified. The aggregate itself does not call this.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank name, description or place
    /// - `InvalidFormat` if arrival is not strictly after departure
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("departure", &self.departure.place),
            ("arrival", &self.arrival.place),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }

        if !self.arrival.at.is_after(&self.departure.at) {
            return Err(ValidationError::invalid_format(
                "arrival_date",
                "must be after departure date",
            ));
        }

        Ok(())
    }
}
