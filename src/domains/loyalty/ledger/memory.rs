use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::{ApplyOutcome, LedgerStore, SaveOrderOutcome, WithdrawOutcome};
use crate::domains::loyalty::models::{round_points, Balance, Order, OrderStatus, Withdrawal};
use crate::shared::errors::LedgerError;

// =====================================================
// 메모리 원장
// =====================================================
// PostgreSQL 원장과 같은 규칙을 하나의 Mutex 안에서 지킵니다.
// - 모든 연산이 락 하나로 직렬화되므로 트랜잭션과 같은 원자성
// - set_unavailable(true)로 DB 장애를 흉내낼 수 있음
// - operation_count()로 저장소 접근 여부를 확인할 수 있음
// =====================================================

#[derive(Debug, Clone)]
struct StoredOrder {
    user_id: u64,
    status: OrderStatus,
    accrual: Decimal,
    uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerState {
    orders: HashMap<String, StoredOrder>,
    balances: HashMap<u64, Balance>,
    withdrawals: Vec<(u64, Withdrawal)>,
}

/// 메모리 기반 원장 (테스트/로컬 실행용)
/// In-memory ledger
#[derive(Default)]
pub struct MemoryLedgerStore {
    state: Mutex<LedgerState>,
    unavailable: AtomicBool,
    operations: AtomicUsize,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 장애 흉내 (true면 모든 연산이 Database 에러)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 지금까지 호출된 연산 수
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// 주문 상태 직접 조회 (테스트 확인용)
    pub async fn order_status(&self, number: &str) -> Option<OrderStatus> {
        self.state.lock().await.orders.get(number).map(|o| o.status)
    }

    /// 주문 수
    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    /// 주문 상태 강제 설정 (재시작 전 PROCESSING으로 남은 주문 등)
    pub async fn force_status(&self, number: &str, status: OrderStatus) {
        if let Some(order) = self.state.lock().await.orders.get_mut(number) {
            order.status = status;
        }
    }

    fn begin(&self) -> Result<(), LedgerError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Database(anyhow::anyhow!("ledger unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn save_new_order(&self, owner: u64, number: &str) -> Result<SaveOrderOutcome, LedgerError> {
        self.begin()?;
        let mut state = self.state.lock().await;

        if let Some(existing) = state.orders.get(number) {
            return Ok(if existing.user_id == owner {
                SaveOrderOutcome::AlreadyOwnedBySameUser
            } else {
                SaveOrderOutcome::OwnedByOtherUser
            });
        }

        state.orders.insert(
            number.to_string(),
            StoredOrder {
                user_id: owner,
                status: OrderStatus::New,
                accrual: Decimal::ZERO,
                uploaded_at: Utc::now(),
            },
        );
        Ok(SaveOrderOutcome::Created)
    }

    async fn apply_accrual_result(
        &self,
        number: &str,
        status: OrderStatus,
        accrual: Decimal,
    ) -> Result<ApplyOutcome, LedgerError> {
        self.begin()?;
        let mut state = self.state.lock().await;
        let accrual = if status == OrderStatus::Processed { round_points(accrual) } else { Decimal::ZERO };

        let owner = match state.orders.get_mut(number) {
            Some(order) if !order.status.is_terminal() => {
                order.status = status;
                order.accrual = accrual;
                order.user_id
            }
            _ => return Ok(ApplyOutcome::Unchanged),
        };

        if status == OrderStatus::Processed && accrual > Decimal::ZERO {
            state.balances.entry(owner).or_default().current += accrual;
            return Ok(ApplyOutcome::Credited(accrual));
        }
        Ok(ApplyOutcome::Updated)
    }

    async fn withdraw(
        &self,
        owner: u64,
        order_number: &str,
        sum: Decimal,
    ) -> Result<WithdrawOutcome, LedgerError> {
        self.begin()?;
        let mut state = self.state.lock().await;

        let balance = state.balances.entry(owner).or_default();
        if balance.current < sum {
            return Ok(WithdrawOutcome::InsufficientFunds);
        }
        balance.current -= sum;
        balance.withdrawn += sum;

        let withdrawal = Withdrawal {
            order: order_number.to_string(),
            sum,
            processed_at: Utc::now(),
        };
        state.withdrawals.push((owner, withdrawal.clone()));
        Ok(WithdrawOutcome::Completed(withdrawal))
    }

    async fn list_pending_order_numbers(&self) -> Result<Vec<String>, LedgerError> {
        self.begin()?;
        let state = self.state.lock().await;
        Ok(state
            .orders
            .iter()
            .filter(|(_, order)| !order.status.is_terminal())
            .map(|(number, _)| number.clone())
            .collect())
    }

    async fn list_user_orders(&self, owner: u64) -> Result<Vec<Order>, LedgerError> {
        self.begin()?;
        let state = self.state.lock().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|(_, order)| order.user_id == owner)
            .map(|(number, order)| {
                Order::from_parts(
                    number.clone(),
                    order.user_id,
                    order.status,
                    order.accrual,
                    order.uploaded_at,
                )
            })
            .collect();
        orders.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(orders)
    }

    async fn list_user_withdrawals(&self, owner: u64) -> Result<Vec<Withdrawal>, LedgerError> {
        self.begin()?;
        let state = self.state.lock().await;
        let mut withdrawals: Vec<Withdrawal> = state
            .withdrawals
            .iter()
            .filter(|(user_id, _)| *user_id == owner)
            .map(|(_, withdrawal)| withdrawal.clone())
            .collect();
        withdrawals.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Ok(withdrawals)
    }

    async fn get_balance(&self, owner: u64) -> Result<Balance, LedgerError> {
        self.begin()?;
        let state = self.state.lock().await;
        Ok(state.balances.get(&owner).copied().unwrap_or_default())
    }
}
