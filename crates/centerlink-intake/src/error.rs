//! Intake error types.
//!
//! Display strings are user-facing; the API returns them verbatim.

use centerlink_state::{CenterId, StateError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Current load cannot exceed max capacity.")]
    LoadExceedsCapacity { current_load: u32, max_capacity: u32 },

    #[error("There is already a logistics center in that position.")]
    DuplicatePosition { existing: CenterId },

    #[error("Center not found.")]
    CenterNotFound(CenterId),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Unsupported order size '{size}', expected one of: {accepted}")]
    UnknownSize { size: String, accepted: String },

    #[error("Field '{0}' must not be empty.")]
    EmptyField(&'static str),

    #[error("state store error: {0}")]
    State(#[from] StateError),
}

impl IntakeError {
    /// Whether the error stems from the caller's input rather than storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            IntakeError::LoadExceedsCapacity { .. }
                | IntakeError::InvalidCoordinates(_)
                | IntakeError::UnknownSize { .. }
                | IntakeError::EmptyField(_)
        )
    }
}

pub type IntakeResult<T> = Result<T, IntakeError>;
