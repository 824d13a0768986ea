use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use super::order::OrderStatus;

// =====================================================
// 적립 서비스 응답 모델
// =====================================================
// 외부 적립 서비스: GET <base>/api/orders/{number}
// - 200 {order, status, accrual}
// - 204 등록되지 않은 주문
// - 429 요청 한도 초과 (Retry-After 헤더, 초 단위)
// - 5xx 서버 오류
// =====================================================

/// 적립 서비스가 보고하는 계산 상태
/// Status as reported by the accrual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    /// 등록됨, 계산 시작 전
    Registered,
    /// 적립 대상 아님
    Invalid,
    /// 계산 중
    Processing,
    /// 계산 완료
    Processed,
}

impl AccrualStatus {
    /// 주문 상태로 변환
    /// REGISTERED/PROCESSING은 모두 PROCESSING으로 저장
    pub fn to_order_status(self) -> OrderStatus {
        match self {
            AccrualStatus::Registered | AccrualStatus::Processing => OrderStatus::Processing,
            AccrualStatus::Invalid => OrderStatus::Invalid,
            AccrualStatus::Processed => OrderStatus::Processed,
        }
    }
}

/// 적립 서비스 200 응답 본문
/// Raw 200 response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualResponse {
    pub order: String,
    pub status: AccrualStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub accrual: Option<Decimal>,
}

/// 원장에 반영할 적립 결정
/// Decision to apply to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualDecision {
    pub status: OrderStatus,
    /// PROCESSED가 아니면 항상 0
    pub accrual: Decimal,
}

impl AccrualResponse {
    /// 응답을 결정으로 변환 (음수 적립은 거부)
    /// Convert into a decision; negative accrual is rejected
    pub fn into_decision(self) -> Result<AccrualDecision, String> {
        let status = self.status.to_order_status();
        let accrual = self.accrual.unwrap_or(Decimal::ZERO);

        if accrual < Decimal::ZERO {
            return Err(format!("negative accrual {} for order {}", accrual, self.order));
        }

        Ok(AccrualDecision {
            status,
            accrual: if status == OrderStatus::Processed { accrual } else { Decimal::ZERO },
        })
    }
}

/// 적립 서비스 조회 결과
/// Outcome of one accrual lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 적립 서비스가 결정을 반환함
    Decision(AccrualDecision),
    /// 적립 서비스에 등록되지 않은 주문 (204)
    NotRegistered,
}
