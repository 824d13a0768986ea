// =====================================================
// 포인트 원장 모듈
// Loyalty Ledger Module
// =====================================================
// 주문 상태, 사용자 잔고, 차감 내역을 저장하는 원장 인터페이스입니다.
//
// 구조:
// - LedgerStore trait: 원장 인터페이스 (구현체와 분리)
// - postgres: PostgreSQL 구현 (운영)
// - memory: 메모리 구현 (테스트)
//
// 보장:
// - 주문 번호는 전체 사용자에 걸쳐 유일 (먼저 등록한 사용자가 소유)
// - 적립은 비종료 상태에서 PROCESSED로 전이될 때 정확히 한 번만 반영
// - 차감은 잔고 확인과 반영이 하나의 트랜잭션 (잔고는 음수가 될 수 없음)
// - 저장소는 재시도하지 않음 (재시도 정책은 큐/적립 클라이언트 쪽)
// =====================================================

pub mod postgres;
pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domains::loyalty::models::{Balance, Order, OrderStatus, Withdrawal};
use crate::shared::errors::LedgerError;

pub use postgres::PgLedgerStore;
pub use memory::MemoryLedgerStore;

/// 주문 등록 결과
/// Result of saving a submitted order number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrderOutcome {
    /// 새로 등록됨 (NEW)
    Created,
    /// 같은 사용자가 이미 등록함
    AlreadyOwnedBySameUser,
    /// 다른 사용자가 이미 등록함
    OwnedByOtherUser,
}

/// 적립 결과 반영 결과
/// Result of applying an accrual decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// 상태만 갱신됨 (잔고 변화 없음)
    Updated,
    /// PROCESSED로 전이되며 잔고에 적립됨
    Credited(Decimal),
    /// 이미 종료 상태이거나 존재하지 않는 주문 (아무것도 바뀌지 않음)
    Unchanged,
}

/// 차감 결과
/// Result of a withdrawal attempt
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawOutcome {
    /// 차감 완료
    Completed(Withdrawal),
    /// 잔고 부족 (아무것도 기록되지 않음)
    InsufficientFunds,
}

/// 포인트 원장 인터페이스
/// Loyalty ledger interface
///
/// # 구현체
/// - `PgLedgerStore`: PostgreSQL (운영)
/// - `MemoryLedgerStore`: 메모리 기반 (테스트)
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 새 주문 등록 (number 기준 멱등)
    /// Save a new order, idempotent on `number`
    ///
    /// 이미 존재하면 에러 대신 소유자를 비교해서 결과를 반환합니다.
    async fn save_new_order(&self, owner: u64, number: &str) -> Result<SaveOrderOutcome, LedgerError>;

    /// 적립 결정 반영 (원자적)
    /// Apply an accrual decision atomically
    ///
    /// # 처리 과정 (하나의 문장/트랜잭션)
    /// 1. 주문이 비종료 상태(NEW, PROCESSING)일 때만 status/accrual 갱신
    /// 2. 새 상태가 PROCESSED이고 accrual > 0이면 소유자 current 증가
    ///
    /// 이미 종료 상태인 주문에 다시 호출해도 잔고는 변하지 않습니다.
    /// accrual은 소수점 둘째 자리로 반올림되어 저장/반환됩니다.
    async fn apply_accrual_result(
        &self,
        number: &str,
        status: OrderStatus,
        accrual: Decimal,
    ) -> Result<ApplyOutcome, LedgerError>;

    /// 포인트 차감 (직렬화 격리)
    /// Withdraw points under serializable isolation
    ///
    /// 같은 사용자의 동시 차감 중 잔고가 하나만 감당할 수 있다면 하나만 성공합니다.
    /// sum은 호출 전에 0보다 크고 소수점 둘째 자리 이내로 검증되어 있어야 합니다.
    async fn withdraw(
        &self,
        owner: u64,
        order_number: &str,
        sum: Decimal,
    ) -> Result<WithdrawOutcome, LedgerError>;

    /// 비종료 상태(NEW, PROCESSING) 주문 번호 목록 (순서 보장 없음)
    /// Order numbers still waiting for a terminal decision
    async fn list_pending_order_numbers(&self) -> Result<Vec<String>, LedgerError>;

    /// 사용자의 주문 목록 (최신순)
    async fn list_user_orders(&self, owner: u64) -> Result<Vec<Order>, LedgerError>;

    /// 사용자의 차감 내역 (최신순)
    async fn list_user_withdrawals(&self, owner: u64) -> Result<Vec<Withdrawal>, LedgerError>;

    /// 사용자 잔고 (잔고 레코드가 없으면 0)
    async fn get_balance(&self, owner: u64) -> Result<Balance, LedgerError>;
}
