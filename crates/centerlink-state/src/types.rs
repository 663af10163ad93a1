//! Domain types for the centerlink state store.
//!
//! These types represent the persisted state of logistics centers and
//! delivery orders. Field names serialize in camelCase and status tokens
//! in upper case, which is also the shape the HTTP API exposes.

use serde::{Deserialize, Serialize};

/// Unique identifier for a logistics center.
pub type CenterId = u64;

/// Unique identifier for an order. Monotonically increasing.
pub type OrderId = u64;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ── Center ────────────────────────────────────────────────────────

/// A logistics center that orders can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    pub id: CenterId,
    pub name: String,
    /// Capacity class: the order sizes this center serves, e.g. `"MS"`.
    pub capacity: String,
    pub status: CenterStatus,
    pub max_capacity: u32,
    pub current_load: u32,
    pub coordinates: Coordinates,
}

/// Operational status of a center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CenterStatus {
    Available,
    Occupied,
}

/// Center fields before an id has been allocated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCenter {
    pub name: String,
    pub capacity: String,
    pub status: CenterStatus,
    pub max_capacity: u32,
    pub current_load: u32,
    pub coordinates: Coordinates,
}

impl NewCenter {
    pub(crate) fn with_id(self, id: CenterId) -> Center {
        Center {
            id,
            name: self.name,
            capacity: self.capacity,
            status: self.status,
            max_capacity: self.max_capacity,
            current_load: self.current_load,
            coordinates: self.coordinates,
        }
    }
}

impl Center {
    /// Whether the center accepts orders of the given size token.
    ///
    /// Case-sensitive substring match against the capacity class.
    pub fn supports(&self, size: &str) -> bool {
        self.capacity.contains(size)
    }

    /// Whether at least one more order fits.
    pub fn has_room(&self) -> bool {
        self.current_load < self.max_capacity
    }

    pub fn is_available(&self) -> bool {
        self.status == CenterStatus::Available
    }
}

// ── Order ─────────────────────────────────────────────────────────

/// A delivery order waiting for, or holding, a center assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: u64,
    /// Size token, matched against a center's capacity class.
    pub size: String,
    pub coordinates: Coordinates,
    pub status: OrderStatus,
    /// Name of the assigned center; `None` while pending.
    pub assigned_center: Option<String>,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Assigned,
}

/// Order fields before an id has been allocated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: u64,
    pub size: String,
    pub coordinates: Coordinates,
}

impl NewOrder {
    /// New orders always start pending and unassigned.
    pub(crate) fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            customer_id: self.customer_id,
            size: self.size,
            coordinates: self.coordinates,
            status: OrderStatus::Pending,
            assigned_center: None,
        }
    }
}

impl Order {
    /// Mark the order as assigned to the named center.
    pub fn assign_to(&mut self, center_name: &str) {
        self.status = OrderStatus::Assigned;
        self.assigned_center = Some(center_name.to_string());
    }
}
