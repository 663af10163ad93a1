//! Assignment error types.

use centerlink_state::{OrderId, StateError};
use thiserror::Error;

use crate::outcome::ProcessedOrder;

/// Errors that abort an assignment pass.
///
/// An order that cannot be matched is not an error; it yields a pending
/// outcome instead.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("failed to load assignment inputs: {0}")]
    Load(#[source] StateError),

    /// `completed` holds the outcomes committed before the failing order.
    #[error("failed to persist assignment of order {order_id}: {source}")]
    Persist {
        order_id: OrderId,
        completed: Vec<ProcessedOrder>,
        #[source]
        source: StateError,
    },
}

impl AssignError {
    /// Outcomes already persisted when the pass stopped.
    pub fn completed(&self) -> &[ProcessedOrder] {
        match self {
            AssignError::Load(_) => &[],
            AssignError::Persist { completed, .. } => completed,
        }
    }

    pub fn into_completed(self) -> Vec<ProcessedOrder> {
        match self {
            AssignError::Load(_) => Vec::new(),
            AssignError::Persist { completed, .. } => completed,
        }
    }
}

pub type AssignResult<T> = Result<T, AssignError>;
