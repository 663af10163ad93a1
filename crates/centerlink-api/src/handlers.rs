//! REST API handlers.
//!
//! Each handler goes through the intake services or the assignment engine
//! and returns JSON responses. Store access is synchronous redb I/O and may
//! wait on the center lock, so it runs on the blocking pool.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use centerlink_assign::AssignmentReport;
use centerlink_intake::{CenterPatch, IntakeError, OrderCreated};
use centerlink_state::*;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn intake_error_response(err: IntakeError) -> Response {
    let status = match &err {
        IntakeError::CenterNotFound(_) => StatusCode::NOT_FOUND,
        IntakeError::DuplicatePosition { .. } => StatusCode::CONFLICT,
        e if e.is_invalid_input() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(&err.to_string(), status).into_response()
}

/// Run store work off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "blocking task failed");
        error_response("internal error", StatusCode::INTERNAL_SERVER_ERROR).into_response()
    })
}

/// A confirmation message plus the affected record.
#[derive(serde::Serialize)]
struct Confirmation<T: serde::Serialize> {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<T>,
}

fn confirm<T: serde::Serialize>(message: &'static str, record: T) -> Confirmation<T> {
    Confirmation {
        message,
        record: Some(record),
    }
}

// ── Centers ────────────────────────────────────────────────────

/// POST /api/centers
pub async fn create_center(
    State(state): State<ApiState>,
    Json(new): Json<NewCenter>,
) -> impl IntoResponse {
    match blocking(move || state.centers.create_center(new)).await {
        Ok(Ok(center)) => (
            StatusCode::CREATED,
            ApiResponse::ok(confirm("Logistics center created successfully.", center)),
        )
            .into_response(),
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

/// GET /api/centers
pub async fn list_centers(State(state): State<ApiState>) -> impl IntoResponse {
    match blocking(move || state.centers.list_centers()).await {
        Ok(Ok(centers)) => ApiResponse::ok(centers).into_response(),
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

/// PATCH /api/centers/{id}
pub async fn update_center(
    State(state): State<ApiState>,
    Path(id): Path<CenterId>,
    Json(patch): Json<CenterPatch>,
) -> impl IntoResponse {
    match blocking(move || state.centers.update_center(id, patch)).await {
        Ok(Ok(center)) => {
            ApiResponse::ok(confirm("Logistics center updated successfully.", center))
                .into_response()
        }
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

/// DELETE /api/centers/{id}
pub async fn delete_center(
    State(state): State<ApiState>,
    Path(id): Path<CenterId>,
) -> impl IntoResponse {
    match blocking(move || state.centers.delete_center(id)).await {
        Ok(Ok(true)) => ApiResponse::ok(Confirmation::<()> {
            message: "Logistics center deleted successfully.",
            record: None,
        })
        .into_response(),
        Ok(Ok(false)) => intake_error_response(IntakeError::CenterNotFound(id)),
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

// ── Orders ─────────────────────────────────────────────────────

/// POST /api/orders
pub async fn create_order(
    State(state): State<ApiState>,
    Json(request): Json<NewOrder>,
) -> impl IntoResponse {
    match blocking(move || state.orders.create_order(request)).await {
        Ok(Ok(order)) => {
            (StatusCode::CREATED, ApiResponse::ok(OrderCreated::from(order))).into_response()
        }
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

/// GET /api/orders
pub async fn list_orders(State(state): State<ApiState>) -> impl IntoResponse {
    match blocking(move || state.orders.list_orders()).await {
        Ok(Ok(orders)) => ApiResponse::ok(orders).into_response(),
        Ok(Err(e)) => intake_error_response(e),
        Err(resp) => resp,
    }
}

// ── Assignment ─────────────────────────────────────────────────

/// POST /api/orders/order-assignations
///
/// An aborted pass answers 500 and still reports the outcomes it committed.
pub async fn assign_orders(State(state): State<ApiState>) -> impl IntoResponse {
    match blocking(move || state.engine.assign_orders_to_centers()).await {
        Ok(Ok(outcomes)) => ApiResponse::ok(AssignmentReport::from(outcomes)).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, completed = e.completed().len(), "assignment pass failed");
            let message = e.to_string();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    success: false,
                    data: Some(AssignmentReport::from(e.into_completed())),
                    error: Some(message),
                }),
            )
                .into_response()
        }
        Err(resp) => resp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use centerlink_intake::orders::ORDER_CREATED_MESSAGE;

    fn test_state() -> ApiState {
        ApiState::new(StateStore::open_in_memory().unwrap())
    }

    fn new_center(name: &str, lat: f64) -> NewCenter {
        NewCenter {
            name: name.to_string(),
            capacity: "MS".to_string(),
            status: CenterStatus::Available,
            max_capacity: 1,
            current_load: 0,
            coordinates: Coordinates::new(lat, 0.0),
        }
    }

    fn new_order(size: &str) -> NewOrder {
        NewOrder {
            customer_id: 1,
            size: size.to_string(),
            coordinates: Coordinates::new(0.0, 0.0),
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_centers_empty() {
        let state = test_state();
        let resp = list_centers(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_center_returns_created() {
        let state = test_state();
        let resp = create_center(State(state.clone()), Json(new_center("Madrid", 1.0)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let json = body_json(resp).await;
        assert_eq!(json["data"]["message"], "Logistics center created successfully.");
        assert_eq!(json["data"]["record"]["name"], "Madrid");
    }

    #[tokio::test]
    async fn duplicate_center_position_conflicts() {
        let state = test_state();
        create_center(State(state.clone()), Json(new_center("a", 1.0))).await;

        let resp = create_center(State(state), Json(new_center("b", 1.0)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "There is already a logistics center in that position."
        );
    }

    #[tokio::test]
    async fn overloaded_center_is_bad_request() {
        let state = test_state();
        let mut center = new_center("a", 1.0);
        center.current_load = 2;

        let resp = create_center(State(state), Json(center)).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_unknown_center_is_not_found() {
        let state = test_state();
        let resp = update_center(State(state), Path(9), Json(CenterPatch::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_center_then_not_found() {
        let state = test_state();
        let center = state.centers.create_center(new_center("a", 1.0)).unwrap();

        let resp = delete_center(State(state.clone()), Path(center.id))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = delete_center(State(state), Path(center.id))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_order_returns_pending() {
        let state = test_state();
        let resp = create_order(State(state), Json(new_order("S")))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let json = body_json(resp).await;
        assert_eq!(json["data"]["message"], ORDER_CREATED_MESSAGE);
        assert_eq!(json["data"]["orderId"], 1);
        assert_eq!(json["data"]["size"], "S");
        assert_eq!(json["data"]["status"], "PENDING");
        assert!(json["data"]["assignedLogisticsCenter"].is_null());
    }

    #[tokio::test]
    async fn unknown_order_size_is_bad_request() {
        let state = test_state();
        let resp = create_order(State(state), Json(new_order("XXL")))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn assignment_pass_reports_processed_orders() {
        let state = test_state();
        state.centers.create_center(new_center("Madrid", 0.1)).unwrap();
        state.orders.create_order(new_order("S")).unwrap();
        state.orders.create_order(new_order("M")).unwrap();
        state.orders.create_order(new_order("B")).unwrap();

        let resp = assign_orders(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let processed = json["data"]["processed-orders"].as_array().unwrap();
        assert_eq!(processed.len(), 3);

        assert_eq!(processed[0]["orderId"], 1);
        assert_eq!(processed[0]["status"], "ASSIGNED");
        assert_eq!(processed[0]["assignedLogisticsCenter"], "Madrid");

        assert_eq!(processed[1]["status"], "PENDING");
        assert_eq!(processed[1]["message"], "All centers are at maximum capacity.");

        assert_eq!(processed[2]["status"], "PENDING");
        assert_eq!(
            processed[2]["message"],
            "No available centers support the order type."
        );
    }
}
