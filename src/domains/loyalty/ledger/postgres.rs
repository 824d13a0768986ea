use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{ApplyOutcome, LedgerStore, SaveOrderOutcome, WithdrawOutcome};
use crate::domains::loyalty::models::{round_points, Balance, Order, OrderStatus, Withdrawal};
use crate::shared::database::{BalanceRepository, Database, OrderRepository, WithdrawalRepository};
use crate::shared::errors::LedgerError;

/// PostgreSQL 원장
/// PostgreSQL-backed ledger
#[derive(Clone)]
pub struct PgLedgerStore {
    db: Database,
}

impl PgLedgerStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.db.pool().clone())
    }

    fn balances(&self) -> BalanceRepository {
        BalanceRepository::new(self.db.pool().clone())
    }

    fn withdrawals(&self) -> WithdrawalRepository {
        WithdrawalRepository::new(self.db.pool().clone())
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn save_new_order(&self, owner: u64, number: &str) -> Result<SaveOrderOutcome, LedgerError> {
        let repo = self.orders();

        if repo.insert_if_absent(owner, number).await? {
            return Ok(SaveOrderOutcome::Created);
        }

        // 충돌: 기존 소유자 비교
        match repo.get_owner(number).await? {
            Some(existing) if existing == owner => Ok(SaveOrderOutcome::AlreadyOwnedBySameUser),
            Some(_) => Ok(SaveOrderOutcome::OwnedByOtherUser),
            None => Err(LedgerError::Corrupted(format!(
                "order {} conflicted on insert but has no owner",
                number
            ))),
        }
    }

    async fn apply_accrual_result(
        &self,
        number: &str,
        status: OrderStatus,
        accrual: Decimal,
    ) -> Result<ApplyOutcome, LedgerError> {
        // PROCESSED가 아니면 accrual은 0, 저장 자릿수로 반올림
        let accrual = if status == OrderStatus::Processed { round_points(accrual) } else { Decimal::ZERO };

        let counts = self.orders().apply_accrual_result(number, status, accrual).await?;

        Ok(match (counts.updated, counts.credited) {
            (0, _) => ApplyOutcome::Unchanged,
            (_, 0) => ApplyOutcome::Updated,
            _ => ApplyOutcome::Credited(accrual),
        })
    }

    async fn withdraw(
        &self,
        owner: u64,
        order_number: &str,
        sum: Decimal,
    ) -> Result<WithdrawOutcome, LedgerError> {
        Ok(match self.balances().withdraw(owner, order_number, sum).await? {
            Some(withdrawal) => WithdrawOutcome::Completed(withdrawal),
            None => WithdrawOutcome::InsufficientFunds,
        })
    }

    async fn list_pending_order_numbers(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.orders().list_pending_numbers().await?)
    }

    async fn list_user_orders(&self, owner: u64) -> Result<Vec<Order>, LedgerError> {
        Ok(self.orders().list_by_user(owner).await?)
    }

    async fn list_user_withdrawals(&self, owner: u64) -> Result<Vec<Withdrawal>, LedgerError> {
        Ok(self.withdrawals().list_by_user(owner).await?)
    }

    async fn get_balance(&self, owner: u64) -> Result<Balance, LedgerError> {
        Ok(self.balances().get_by_user(owner).await?)
    }
}
