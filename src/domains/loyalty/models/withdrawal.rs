use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// =====================================================
// Withdrawal 모델
// =====================================================
// 역할: 포인트 차감 내역 (append-only, 생성 후 변경 없음)
//
// order 필드는 포인트를 사용한 새 주문 번호로,
// 적립 주문과는 별개의 번호 공간입니다 (Luhn 검증은 동일).
// =====================================================

/// 포인트 차감 내역
/// Withdrawal record
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[schema(as = Withdrawal)]
pub struct Withdrawal {
    /// Order number the points were spent on
    /// 포인트를 사용한 주문 번호
    #[schema(example = "2377225624")]
    pub order: String,

    /// Withdrawn points
    /// 차감 포인트
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 751)]
    pub sum: Decimal,

    /// Processing timestamp
    /// 처리 시간
    pub processed_at: DateTime<Utc>,
}

/// 포인트 차감 요청
/// Withdrawal request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = WithdrawRequest)]
pub struct WithdrawRequest {
    /// Order number to spend points on
    /// 주문 번호
    #[schema(example = "2377225624")]
    pub order: String,

    /// Points to withdraw (must be positive)
    /// 차감할 포인트
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 751)]
    pub sum: Decimal,
}
