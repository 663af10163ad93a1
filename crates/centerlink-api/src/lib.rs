//! centerlink-api — REST API for centerlink.
//!
//! Provides axum route handlers for managing logistics centers, taking
//! orders, and triggering assignment passes.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/centers` | Create a center |
//! | GET | `/api/centers` | List all centers |
//! | PATCH | `/api/centers/{id}` | Update some fields of a center |
//! | DELETE | `/api/centers/{id}` | Delete a center |
//! | POST | `/api/orders` | Create a pending order |
//! | GET | `/api/orders` | List all orders |
//! | POST | `/api/orders/order-assignations` | Run one assignment pass |

pub mod handlers;

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, patch, post};
use centerlink_assign::AssignmentEngine;
use centerlink_intake::{CenterService, OrderService};
use centerlink_state::StateStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub centers: CenterService,
    pub orders: OrderService,
    pub engine: Arc<AssignmentEngine<StateStore>>,
}

impl ApiState {
    /// State with the default accepted order sizes.
    ///
    /// Center writes and assignment passes share one lock, so a patch or
    /// delete never interleaves with a pass's load updates.
    pub fn new(store: StateStore) -> Self {
        let center_lock = Arc::new(Mutex::new(()));
        Self {
            centers: CenterService::with_write_lock(store.clone(), center_lock.clone()),
            orders: OrderService::new(store.clone()),
            engine: Arc::new(AssignmentEngine::with_center_lock(store, center_lock)),
        }
    }

    pub fn with_accepted_sizes(store: StateStore, accepted_sizes: Vec<String>) -> Self {
        Self {
            orders: OrderService::with_accepted_sizes(store.clone(), accepted_sizes),
            ..Self::new(store)
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/centers", get(handlers::list_centers).post(handlers::create_center))
        .route(
            "/centers/{id}",
            patch(handlers::update_center).delete(handlers::delete_center),
        )
        .route("/orders", get(handlers::list_orders).post(handlers::create_order))
        .route("/orders/order-assignations", post(handlers::assign_orders))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}
