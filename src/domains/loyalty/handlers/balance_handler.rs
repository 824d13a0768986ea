use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::loyalty::models::{Balance, WithdrawRequest, Withdrawal};
use crate::shared::errors::LoyaltyError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

// 잔고 조회 핸들러
#[utoipa::path(
    get,
    path = "/api/user/balance",
    responses(
        (status = 200, description = "Current balance", body = Balance),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Balance",
    security(("BearerAuth" = []))
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Balance>, (StatusCode, Json<serde_json::Value>)> {
    let balance = app_state
        .loyalty_state
        .balance_service
        .get_balance(authenticated_user.user_id)
        .await
        .map_err(|e: LoyaltyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(balance))
}

// 포인트 차감 핸들러
#[utoipa::path(
    post,
    path = "/api/user/balance/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Points withdrawn", body = Withdrawal),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Insufficient funds"),
        (status = 422, description = "Invalid order number or non-positive sum"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Balance",
    security(("BearerAuth" = []))
)]
pub async fn withdraw(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    request: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<Json<Withdrawal>, (StatusCode, Json<serde_json::Value>)> {
    let Json(request) = request.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid request body: {}", e.body_text()) })),
        )
    })?;

    let withdrawal = app_state
        .loyalty_state
        .withdraw_service
        .request_withdrawal(authenticated_user.user_id, &request.order, request.sum)
        .await
        .map_err(|e: LoyaltyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(withdrawal))
}

// 차감 내역 조회 핸들러 (최신순, 없으면 204)
#[utoipa::path(
    get,
    path = "/api/user/withdrawals",
    responses(
        (status = 200, description = "Withdrawals of the current user, newest first", body = Vec<Withdrawal>),
        (status = 204, description = "No withdrawals yet"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Balance",
    security(("BearerAuth" = []))
)]
pub async fn list_withdrawals(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let withdrawals = app_state
        .loyalty_state
        .withdraw_service
        .list_withdrawals(authenticated_user.user_id)
        .await
        .map_err(|e: LoyaltyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    if withdrawals.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(withdrawals).into_response())
}
