//! Field-level checks shared by center and order intake.

use centerlink_state::Coordinates;

use crate::error::{IntakeError, IntakeResult};

/// Coordinates must be finite and within the usual degree ranges.
pub fn coordinates(c: Coordinates) -> IntakeResult<()> {
    if !c.latitude.is_finite() || !c.longitude.is_finite() {
        return Err(IntakeError::InvalidCoordinates(
            "latitude and longitude must be finite".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&c.latitude) {
        return Err(IntakeError::InvalidCoordinates(format!(
            "latitude {} out of range [-90, 90]",
            c.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&c.longitude) {
        return Err(IntakeError::InvalidCoordinates(format!(
            "longitude {} out of range [-180, 180]",
            c.longitude
        )));
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> IntakeResult<()> {
    if value.trim().is_empty() {
        return Err(IntakeError::EmptyField(field));
    }
    Ok(())
}

pub fn load_within_capacity(current_load: u32, max_capacity: u32) -> IntakeResult<()> {
    if current_load > max_capacity {
        return Err(IntakeError::LoadExceedsCapacity {
            current_load,
            max_capacity,
        });
    }
    Ok(())
}

/// The size must match one of the accepted tokens exactly.
pub fn size(size: &str, accepted: &[String]) -> IntakeResult<()> {
    if accepted.iter().any(|a| a == size) {
        return Ok(());
    }
    Err(IntakeError::UnknownSize {
        size: size.to_string(),
        accepted: accepted.join(", "),
    })
}
