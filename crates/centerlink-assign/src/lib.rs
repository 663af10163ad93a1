//! centerlink order assignment — greedy nearest-center matching.
//!
//! This crate runs assignment passes: every pending order, oldest first,
//! is matched to the closest available center that serves its size and
//! still has room. Capacity consumed by one order is visible to the next
//! order in the same pass.
//!
//! # Components
//!
//! - **`distance`** — Haversine great-circle distance
//! - **`candidates`** — In-pass working set, compatibility and capacity filtering
//! - **`engine`** — Pass orchestration and persistence
//! - **`outcome`** — Per-order results
//! - **`store`** — Storage seam consumed by the engine

pub mod candidates;
pub mod distance;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod store;

pub use candidates::{Candidate, Rejection, WorkingSet};
pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use engine::AssignmentEngine;
pub use error::{AssignError, AssignResult};
pub use outcome::{AssignmentReport, ProcessedOrder};
pub use store::AssignmentStore;
