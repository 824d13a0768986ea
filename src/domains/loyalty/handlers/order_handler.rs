use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::loyalty::models::Order;
use crate::domains::loyalty::services::SubmitOrderOutcome;
use crate::shared::errors::LoyaltyError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

// 주문 번호 업로드 핸들러
// 본문은 text/plain 주문 번호 하나
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body(content = String, description = "Order number", content_type = "text/plain"),
    responses(
        (status = 200, description = "Order already uploaded by this user"),
        (status = 202, description = "Order accepted for processing"),
        (status = 400, description = "Empty request body"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Order already uploaded by another user"),
        (status = 422, description = "Invalid order number format"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders",
    security(("BearerAuth" = []))
)]
pub async fn submit_order(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    body: String,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<serde_json::Value>)> {
    if body.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Order number is required" })),
        ));
    }

    let outcome = app_state
        .loyalty_state
        .order_service
        .submit_order(authenticated_user.user_id, &body)
        .await
        .map_err(|e: LoyaltyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(match outcome {
        SubmitOrderOutcome::Accepted => (
            StatusCode::ACCEPTED,
            Json(json!({ "message": "Order accepted for processing" })),
        ),
        SubmitOrderOutcome::AlreadyAccepted => (
            StatusCode::OK,
            Json(json!({ "message": "Order already uploaded" })),
        ),
    })
}

// 주문 목록 조회 핸들러 (최신순, 없으면 204)
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Orders of the current user, newest first", body = Vec<Order>),
        (status = 204, description = "No orders uploaded yet"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders",
    security(("BearerAuth" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let orders = app_state
        .loyalty_state
        .order_service
        .list_orders(authenticated_user.user_id)
        .await
        .map_err(|e: LoyaltyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    if orders.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(orders).into_response())
}
