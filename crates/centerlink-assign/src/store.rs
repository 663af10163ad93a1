//! Storage seam consumed by the assignment engine.
//!
//! The engine only needs four operations; [`StateStore`] provides them,
//! and tests can substitute doubles that fail on demand.

use centerlink_state::{Center, Order, OrderStatus, StateResult, StateStore};

/// Read/write access to centers and orders for an assignment pass.
pub trait AssignmentStore {
    /// All orders currently in `status`.
    fn find_orders_by_status(&self, status: OrderStatus) -> StateResult<Vec<Order>>;

    /// Upsert an order by id.
    fn save_order(&self, order: &Order) -> StateResult<Order>;

    /// Every known center, whatever its status.
    fn find_all_centers(&self) -> StateResult<Vec<Center>>;

    /// Upsert a center by id.
    fn save_center(&self, center: &Center) -> StateResult<Center>;
}

impl AssignmentStore for StateStore {
    fn find_orders_by_status(&self, status: OrderStatus) -> StateResult<Vec<Order>> {
        self.list_orders_by_status(status)
    }

    fn save_order(&self, order: &Order) -> StateResult<Order> {
        self.put_order(order)?;
        Ok(order.clone())
    }

    fn find_all_centers(&self) -> StateResult<Vec<Center>> {
        self.list_centers()
    }

    fn save_center(&self, center: &Center) -> StateResult<Center> {
        self.put_center(center)?;
        Ok(center.clone())
    }
}
