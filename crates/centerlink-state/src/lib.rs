//! centerlink-state — embedded state store for centerlink.
//!
//! Backed by [redb](https://docs.rs/redb), provides persistent and in-memory
//! storage for logistics centers and delivery orders.
//!
//! # Architecture
//!
//! Domain types are JSON-serialized into redb's `&[u8]` value columns and
//! keyed by `u64` identifiers, so table iteration yields records in
//! creation order. Identifiers come from a persisted per-table counter
//! that is bumped inside the same write transaction as the insert.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
