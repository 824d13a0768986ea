use std::sync::Arc;

use crate::domains::loyalty::ledger::LedgerStore;
use crate::domains::loyalty::models::Balance;
use crate::shared::errors::LoyaltyError;

// 잔고 조회 서비스
#[derive(Clone)]
pub struct BalanceService {
    ledger: Arc<dyn LedgerStore>,
}

impl BalanceService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn get_balance(&self, owner: u64) -> Result<Balance, LoyaltyError> {
        Ok(self.ledger.get_balance(owner).await?)
    }
}
