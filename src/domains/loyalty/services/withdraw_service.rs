use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domains::loyalty::ledger::{LedgerStore, WithdrawOutcome};
use crate::domains::loyalty::models::{fits_points_scale, Withdrawal};
use crate::shared::errors::LoyaltyError;
use crate::shared::utils::is_valid_luhn;

// 포인트 차감 서비스
// WithdrawService: spending points against a new order number
#[derive(Clone)]
pub struct WithdrawService {
    ledger: Arc<dyn LedgerStore>,
}

impl WithdrawService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// 포인트 차감 요청
    /// Request a withdrawal
    ///
    /// # Errors
    /// * `InvalidOrderNumber` - Luhn 검증 실패
    /// * `InvalidWithdrawalSum` - 금액이 0 이하이거나 소수점 셋째 자리 이하가 있음
    /// * `InsufficientFunds` - 잔고 부족 (아무것도 기록되지 않음)
    pub async fn request_withdrawal(
        &self,
        owner: u64,
        raw_number: &str,
        sum: Decimal,
    ) -> Result<Withdrawal, LoyaltyError> {
        let number = raw_number.trim();

        if !is_valid_luhn(number) {
            return Err(LoyaltyError::InvalidOrderNumber {
                number: number.to_string(),
            });
        }
        if sum <= Decimal::ZERO || !fits_points_scale(sum) {
            return Err(LoyaltyError::InvalidWithdrawalSum);
        }

        match self.ledger.withdraw(owner, number, sum).await? {
            WithdrawOutcome::Completed(withdrawal) => {
                tracing::info!(user_id = owner, order = %number, %sum, "Points withdrawn");
                Ok(withdrawal)
            }
            WithdrawOutcome::InsufficientFunds => Err(LoyaltyError::InsufficientFunds),
        }
    }

    /// 사용자 차감 내역 (최신순)
    pub async fn list_withdrawals(&self, owner: u64) -> Result<Vec<Withdrawal>, LoyaltyError> {
        Ok(self.ledger.list_user_withdrawals(owner).await?)
    }
}
