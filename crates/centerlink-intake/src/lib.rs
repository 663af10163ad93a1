//! centerlink-intake — the write path in front of the state store.
//!
//! Everything that enters the store goes through here first, so the
//! assignment engine can assume well-formed records:
//! - coordinates are finite and within range
//! - order sizes are one of the accepted tokens
//! - a center never carries more load than its capacity
//! - no two centers share a position

pub mod centers;
pub mod error;
pub mod orders;
pub mod validate;

pub use centers::{CenterPatch, CenterService};
pub use error::{IntakeError, IntakeResult};
pub use orders::{OrderCreated, OrderService};
