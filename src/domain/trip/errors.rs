//! Trip-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ActorHandle, DomainError, ErrorCode, TripId, ValidationError};

/// Every way a trip operation can be rejected.
///
/// Each variant maps to one stable [`ErrorCode`]; domain rejections are
/// detected before commit, so none of them leaves a partial write behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    /// No verified actor accompanies the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The actor lacks the ownership this operation requires.
    #[error("Permission denied")]
    Forbidden,

    /// Trip was not found.
    #[error("Trip not found: {0}")]
    NotFound(TripId),

    /// Referenced user is not registered.
    #[error("User not found: {0}")]
    UserNotFound(ActorHandle),

    #[error("Already a participant in this trip")]
    AlreadyMember,

    #[error("Not a participant in this trip")]
    NotAMember,

    #[error("Trip is full ({capacity} seats)")]
    CapacityExceeded { capacity: u32 },

    #[error("User is already an owner of this trip")]
    AlreadyOwner,

    /// Requested capacity cannot hold the current participants.
    #[error("Capacity {requested} is less than the {participants} current participants")]
    InvalidCapacity { requested: u32, participants: usize },

    /// The caller edited an outdated copy of the trip.
    #[error("Trip was modified concurrently (expected version {expected}, found {actual})")]
    StaleVersion { expected: u64, actual: u64 },

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Persistence failure. The message is for logs only.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl TripError {
    pub fn not_found(id: TripId) -> Self {
        TripError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TripError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        TripError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TripError::Unauthenticated => ErrorCode::Unauthenticated,
            TripError::Forbidden => ErrorCode::Forbidden,
            TripError::NotFound(_) => ErrorCode::TripNotFound,
            TripError::UserNotFound(_) => ErrorCode::UserNotFound,
            TripError::AlreadyMember => ErrorCode::AlreadyMember,
            TripError::NotAMember => ErrorCode::NotAMember,
            TripError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            TripError::AlreadyOwner => ErrorCode::AlreadyOwner,
            TripError::InvalidCapacity { .. } => ErrorCode::InvalidCapacity,
            TripError::StaleVersion { .. } => ErrorCode::StaleVersion,
            TripError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TripError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// True for the rejections grouped as validation errors: the request was
    /// understood but conflicts with the trip's current state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TripError::AlreadyMember
                | TripError::NotAMember
                | TripError::CapacityExceeded { .. }
                | TripError::AlreadyOwner
                | TripError::InvalidCapacity { .. }
                | TripError::ValidationFailed { .. }
        )
    }
}

impl From<DomainError> for TripError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Unauthenticated => TripError::Unauthenticated,
            ErrorCode::Forbidden => TripError::Forbidden,
            ErrorCode::AlreadyMember => TripError::AlreadyMember,
            ErrorCode::NotAMember => TripError::NotAMember,
            ErrorCode::AlreadyOwner => TripError::AlreadyOwner,
            ErrorCode::ValidationFailed => TripError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => TripError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for TripError {
    fn from(err: ValidationError) -> Self {
        TripError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
