use std::sync::Arc;

use crate::domains::loyalty::ledger::{LedgerStore, SaveOrderOutcome};
use crate::domains::loyalty::models::Order;
use crate::domains::loyalty::queue::QueueManager;
use crate::shared::errors::LoyaltyError;
use crate::shared::utils::is_valid_luhn;

/// 주문 등록 결과
/// Result of an order submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOrderOutcome {
    /// 새로 접수됨 (202)
    Accepted,
    /// 같은 사용자가 이미 접수함 (200)
    AlreadyAccepted,
}

// 주문 서비스
// OrderService: order submission and listing
#[derive(Clone)]
pub struct OrderService {
    ledger: Arc<dyn LedgerStore>,
    queue: QueueManager,
}

impl OrderService {
    pub fn new(ledger: Arc<dyn LedgerStore>, queue: QueueManager) -> Self {
        Self { ledger, queue }
    }

    /// 주문 번호 등록
    /// Submit an order number for accrual
    ///
    /// # 처리 과정
    /// 1. Luhn 검증 (실패하면 저장소/큐에 접근하지 않음)
    /// 2. 원장에 NEW로 저장 (번호 기준 멱등)
    /// 3. 큐 등록은 신규/재등록 모두 (재등록은 멈춘 주문을 다시 처리하게 함)
    ///
    /// 큐 등록 실패는 호출자에게 전달하지 않습니다.
    /// 주문은 이미 저장되었으므로 다음 sweep이 다시 등록합니다.
    pub async fn submit_order(&self, owner: u64, raw_number: &str) -> Result<SubmitOrderOutcome, LoyaltyError> {
        let number = raw_number.trim();

        // 1. 형식 검증
        if !is_valid_luhn(number) {
            return Err(LoyaltyError::InvalidOrderNumber {
                number: number.to_string(),
            });
        }

        // 2. 저장
        let outcome = match self.ledger.save_new_order(owner, number).await? {
            SaveOrderOutcome::Created => {
                tracing::info!(user_id = owner, order = %number, "Order accepted");
                SubmitOrderOutcome::Accepted
            }
            SaveOrderOutcome::AlreadyOwnedBySameUser => {
                tracing::debug!(user_id = owner, order = %number, "Order resubmitted by its owner");
                SubmitOrderOutcome::AlreadyAccepted
            }
            SaveOrderOutcome::OwnedByOtherUser => {
                return Err(LoyaltyError::OrderOwnedByAnotherUser {
                    number: number.to_string(),
                });
            }
        };

        // 3. 큐 등록 (이미 대기/처리 중이면 큐에서 무시)
        if let Err(e) = self.queue.enqueue(number).await {
            tracing::warn!(order = %number, error = %e, "Order saved but not queued, sweep will pick it up");
        }

        Ok(outcome)
    }

    /// 사용자 주문 목록 (최신순)
    pub async fn list_orders(&self, owner: u64) -> Result<Vec<Order>, LoyaltyError> {
        Ok(self.ledger.list_user_orders(owner).await?)
    }
}
