use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use rust_decimal::{Decimal, RoundingStrategy};

// =====================================================
// Balance 모델
// =====================================================
// 역할: 사용자별 포인트 잔고
//
// - current: 사용 가능한 포인트 (항상 0 이상)
//   PROCESSED 주문의 적립으로만 증가, 차감으로만 감소
// - withdrawn: 지금까지 차감된 포인트 총합 (감소하지 않음)
//
// 포인트는 소수점 둘째 자리까지 저장됩니다 (NUMERIC(20, 2)).
// =====================================================

/// 포인트 소수 자릿수
pub const POINTS_SCALE: u32 = 2;

/// 저장 가능한 자릿수로 반올림 (PostgreSQL NUMERIC과 같은 방식)
/// Round to the stored scale, half away from zero like PostgreSQL NUMERIC
pub fn round_points(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(POINTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 반올림 없이 그대로 저장할 수 있는 값인지
pub fn fits_points_scale(value: Decimal) -> bool {
    value.normalize().scale() <= POINTS_SCALE
}

/// 사용자 포인트 잔고
/// User points balance
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Default)]
#[schema(as = Balance)]
pub struct Balance {
    /// Spendable points
    /// 사용 가능 포인트
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 500.5)]
    pub current: Decimal,

    /// Lifetime withdrawn total
    /// 누적 차감 포인트
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 42)]
    pub withdrawn: Decimal,
}
