//! Order intake.

use centerlink_state::{Coordinates, NewOrder, Order, OrderId, OrderStatus, StateStore};
use serde::Serialize;
use tracing::info;

use crate::error::IntakeResult;
use crate::validate;

/// Sizes accepted when no configuration says otherwise.
pub const DEFAULT_ACCEPTED_SIZES: [&str; 3] = ["S", "M", "B"];

/// Confirmation attached to a freshly created order.
pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully in PENDING status.";

/// Flat confirmation returned when an order is taken in.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub customer_id: u64,
    pub size: String,
    pub assigned_logistics_center: Option<String>,
    pub coordinates: Coordinates,
    pub status: OrderStatus,
    pub message: &'static str,
}

impl From<Order> for OrderCreated {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.customer_id,
            size: order.size,
            assigned_logistics_center: order.assigned_center,
            coordinates: order.coordinates,
            status: order.status,
            message: ORDER_CREATED_MESSAGE,
        }
    }
}

/// Validating front for order records.
#[derive(Clone)]
pub struct OrderService {
    store: StateStore,
    accepted_sizes: Vec<String>,
}

impl OrderService {
    pub fn new(store: StateStore) -> Self {
        Self::with_accepted_sizes(
            store,
            DEFAULT_ACCEPTED_SIZES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_accepted_sizes(store: StateStore, accepted_sizes: Vec<String>) -> Self {
        Self {
            store,
            accepted_sizes,
        }
    }

    pub fn accepted_sizes(&self) -> &[String] {
        &self.accepted_sizes
    }

    /// Validate and store a new order in `PENDING` state.
    pub fn create_order(&self, request: NewOrder) -> IntakeResult<Order> {
        validate::size(&request.size, &self.accepted_sizes)?;
        validate::coordinates(request.coordinates)?;

        let order = self.store.insert_order(request)?;
        info!(id = order.id, customer = order.customer_id, size = %order.size, "order created");
        Ok(order)
    }

    pub fn list_orders(&self) -> IntakeResult<Vec<Order>> {
        Ok(self.store.list_orders()?)
    }
}
