//! Per-order results of an assignment pass.

use centerlink_state::{OrderId, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::candidates::Rejection;

/// What happened to one order during a pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedOrder {
    /// Kilometers to the assigned center; `None` when left pending.
    pub distance: Option<f64>,
    pub order_id: OrderId,
    pub assigned_logistics_center: Option<String>,
    pub message: Option<String>,
    pub status: OrderStatus,
}

impl ProcessedOrder {
    pub fn assigned(order_id: OrderId, center_name: &str, distance_km: f64) -> Self {
        Self {
            distance: Some(distance_km),
            order_id,
            assigned_logistics_center: Some(center_name.to_string()),
            message: None,
            status: OrderStatus::Assigned,
        }
    }

    pub fn pending(order_id: OrderId, rejection: Rejection) -> Self {
        Self {
            distance: None,
            order_id,
            assigned_logistics_center: None,
            message: Some(rejection.message().to_string()),
            status: OrderStatus::Pending,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.status == OrderStatus::Assigned
    }
}

/// The full result of one pass, in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssignmentReport {
    #[serde(rename = "processed-orders")]
    pub processed_orders: Vec<ProcessedOrder>,
}

impl AssignmentReport {
    pub fn assigned_count(&self) -> usize {
        self.processed_orders.iter().filter(|o| o.is_assigned()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.processed_orders.len() - self.assigned_count()
    }
}

impl From<Vec<ProcessedOrder>> for AssignmentReport {
    fn from(processed_orders: Vec<ProcessedOrder>) -> Self {
        Self { processed_orders }
    }
}
