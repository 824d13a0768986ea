use std::time::Duration;

use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 원장 저장소 에러
/// Ledger store errors
///
/// 저장소는 재시도하지 않습니다. 연결 오류 등은 그대로 호출자에게 전달됩니다.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// 데이터베이스 에러 (원인 체인 포함)
    /// Database error (source chain preserved)
    #[error("Database error: {0:#}")]
    Database(#[from] anyhow::Error),

    /// 저장된 값이 도메인 규칙과 맞지 않음
    /// Stored value violates a domain rule
    #[error("Corrupted ledger data: {0}")]
    Corrupted(String),

    /// 호출 측 제한 시간 초과
    /// Call did not finish within the caller's deadline
    #[error("Ledger call timed out after {0:?}")]
    Timeout(Duration),
}

/// 작업 큐 에러
/// Work queue errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// 큐가 종료됨
    /// Queue has been shut down
    #[error("accrual queue is closed")]
    Closed,

    /// 버퍼가 가득 차서 제한 시간 안에 넣지 못함
    /// Buffer stayed full for longer than the enqueue timeout
    #[error("accrual queue is full, order {number} left for the next sweep")]
    Full { number: String },
}

/// 포인트 도메인 유스케이스 에러
/// Loyalty use-case errors
#[derive(Error, Debug)]
pub enum LoyaltyError {
    /// Luhn 검증 실패
    /// Number failed the Luhn check
    #[error("Invalid order number format: {number}")]
    InvalidOrderNumber { number: String },

    /// 차감 금액이 0 이하
    /// Withdrawal sum must be positive
    #[error("Withdrawal sum must be greater than zero")]
    InvalidWithdrawalSum,

    /// 다른 사용자가 이미 등록한 주문
    /// Order already uploaded by another user
    #[error("Order {number} was already uploaded by another user")]
    OrderOwnedByAnotherUser { number: String },

    /// 잔고 부족
    /// Not enough points
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// 저장소 에러
    /// Ledger failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// LoyaltyError를 HTTP 응답으로 변환
impl From<LoyaltyError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: LoyaltyError) -> Self {
        let status = match &err {
            LoyaltyError::InvalidOrderNumber { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LoyaltyError::InvalidWithdrawalSum => StatusCode::UNPROCESSABLE_ENTITY,
            LoyaltyError::OrderOwnedByAnotherUser { .. } => StatusCode::CONFLICT,
            LoyaltyError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            LoyaltyError::Ledger(e) => {
                tracing::error!(error = %e, "ledger operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &err {
            // 내부 에러 상세는 로그로만 남김
            LoyaltyError::Ledger(_) => "Internal server error".to_string(),
            _ => err.to_string(),
        };

        (status, Json(json!({ "error": message })))
    }
}
