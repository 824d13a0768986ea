use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

// =====================================================
// Order 모델
// =====================================================
// 역할: 사용자가 업로드한 구매 주문 번호와 적립 상태
//
// 상태 전이:
// - NEW → PROCESSING → INVALID | PROCESSED
// - INVALID, PROCESSED는 종료 상태 (더 이상 변경 없음)
//
// number는 전체 사용자에 걸쳐 유일 (먼저 등록한 사용자가 소유)
// =====================================================

/// 주문 상태
/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// 등록됨, 아직 적립 서비스에 조회하지 않음
    New,
    /// 적립 서비스가 계산 중
    Processing,
    /// 적립 대상 아님 (종료)
    Invalid,
    /// 적립 완료 (종료)
    Processed,
}

impl OrderStatus {
    /// DB에 저장되는 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }

    /// 종료 상태 여부 (INVALID, PROCESSED)
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::Processed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "INVALID" => Ok(OrderStatus::Invalid),
            "PROCESSED" => Ok(OrderStatus::Processed),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// 주문 정보 (데이터베이스에서 조회한 주문)
/// Order information (order retrieved from database)
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[schema(as = Order)]
pub struct Order {
    /// Order number (Luhn-valid digit string)
    /// 주문 번호
    #[schema(example = "79927398713")]
    pub number: String,

    /// Owner user ID (not exposed over HTTP)
    /// 소유자 ID
    #[serde(skip)]
    pub user_id: u64,

    /// Current status
    /// 현재 상태
    pub status: OrderStatus,

    /// Accrued points, present only when PROCESSED
    /// 적립 포인트 (PROCESSED일 때만 포함)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[schema(value_type = Option<f64>, example = 500)]
    pub accrual: Option<Decimal>,

    /// Upload timestamp
    /// 업로드 시간
    pub uploaded_at: DateTime<Utc>,
}

impl Order {
    /// 저장된 상태/적립값으로 응답용 Order 구성
    /// accrual은 PROCESSED일 때만 노출
    pub fn from_parts(
        number: String,
        user_id: u64,
        status: OrderStatus,
        accrual: Decimal,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            user_id,
            status,
            accrual: (status == OrderStatus::Processed).then_some(accrual),
            uploaded_at,
        }
    }
}
