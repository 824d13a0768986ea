/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - Luhn 체크섬 검증 (주문 번호, 차감 번호)
pub mod luhn;

pub use luhn::*;
