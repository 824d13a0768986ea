// Loyalty domain state
// 포인트 도메인 상태
use std::sync::Arc;

use crate::domains::loyalty::ledger::LedgerStore;
use crate::domains::loyalty::queue::QueueManager;
use crate::domains::loyalty::services::{BalanceService, OrderService, WithdrawService};

/// Loyalty domain state
/// 원장과 큐를 공유하는 포인트 도메인 서비스 묶음
#[derive(Clone)]
pub struct LoyaltyState {
    pub order_service: OrderService,
    pub withdraw_service: WithdrawService,
    pub balance_service: BalanceService,
    pub queue: QueueManager,
}

impl LoyaltyState {
    pub fn new(ledger: Arc<dyn LedgerStore>, queue: QueueManager) -> Self {
        Self {
            order_service: OrderService::new(ledger.clone(), queue.clone()),
            withdraw_service: WithdrawService::new(ledger.clone()),
            balance_service: BalanceService::new(ledger),
            queue,
        }
    }
}
