// Loyalty domain routes
// 포인트 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::loyalty::handlers::{balance_handler, order_handler};
use crate::shared::services::AppState;

/// Create loyalty router
/// 주문/잔고/차감 라우터 생성
pub fn create_loyalty_router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(order_handler::submit_order).get(order_handler::list_orders))
        .route("/balance", get(balance_handler::get_balance))
        .route("/balance/withdraw", post(balance_handler::withdraw))
        .route("/withdrawals", get(balance_handler::list_withdrawals))
}
