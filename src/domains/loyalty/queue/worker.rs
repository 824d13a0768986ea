use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::InFlightSet;
use crate::domains::loyalty::ledger::{ApplyOutcome, LedgerStore};
use crate::domains::loyalty::models::{FetchOutcome, OrderStatus};
use crate::shared::clients::AccrualFetcher;
use crate::shared::errors::{AccrualError, LedgerError};

/// 작업 하나의 실패 원인 (로그용, 워커 밖으로 전파되지 않음)
#[derive(Error, Debug)]
enum JobError {
    #[error("accrual lookup failed: {0}")]
    Fetch(#[from] AccrualError),

    #[error("accrual lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("ledger update failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// 적립 워커
/// Accrual worker pulling one order number at a time
///
/// # 처리 과정
/// 1. 채널에서 번호 하나 수신 → InProgress
/// 2. 적립 서비스 조회 (job_timeout 제한)
/// 3. 결정 반영 (204면 INVALID, 적립 0, store_timeout 제한)
/// 4. 결과와 관계없이 in-flight 집합에서 제거
///
/// 실패는 로그만 남기고 다음 작업으로 넘어갑니다. 재시도는 sweep이 담당합니다.
pub(super) struct Worker {
    pub(super) id: usize,
    pub(super) receiver: Arc<Mutex<mpsc::Receiver<String>>>,
    pub(super) in_flight: Arc<InFlightSet>,
    pub(super) ledger: Arc<dyn LedgerStore>,
    pub(super) fetcher: Arc<dyn AccrualFetcher>,
    pub(super) job_timeout: Duration,
    pub(super) store_timeout: Duration,
    pub(super) cancel: CancellationToken,
}

impl Worker {
    pub(super) async fn run(self) {
        tracing::debug!(worker = self.id, "Accrual worker started");

        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => break,
                next = async { self.receiver.lock().await.recv().await } => next,
            };

            // 채널이 닫히고 비었으면 종료
            let Some(number) = next else { break };
            self.process(&number).await;
        }

        tracing::debug!(worker = self.id, "Accrual worker stopped");
    }

    async fn process(&self, number: &str) {
        self.in_flight.mark_in_progress(number);

        match self.run_job(number).await {
            Ok(ApplyOutcome::Credited(accrual)) => {
                tracing::info!(worker = self.id, order = %number, %accrual, "Order processed and credited");
            }
            Ok(ApplyOutcome::Updated) => {
                tracing::debug!(worker = self.id, order = %number, "Order status updated");
            }
            Ok(ApplyOutcome::Unchanged) => {
                tracing::debug!(worker = self.id, order = %number, "Order already final, nothing applied");
            }
            Err(JobError::Fetch(e)) if e.is_transient() => {
                tracing::warn!(worker = self.id, order = %number, error = %e, "Accrual job left for next sweep");
            }
            Err(JobError::Timeout(limit)) => {
                tracing::warn!(worker = self.id, order = %number, ?limit, "Accrual job timed out, left for next sweep");
            }
            Err(e) => {
                tracing::error!(worker = self.id, order = %number, error = %e, "Accrual job failed");
            }
        }

        self.in_flight.release(number);
    }

    async fn run_job(&self, number: &str) -> Result<ApplyOutcome, JobError> {
        let job_cancel = self.cancel.child_token();
        let outcome = tokio::time::timeout(self.job_timeout, self.fetcher.fetch(number, &job_cancel))
            .await
            .map_err(|_| JobError::Timeout(self.job_timeout))??;

        let (status, accrual) = match outcome {
            FetchOutcome::Decision(decision) => (decision.status, decision.accrual),
            FetchOutcome::NotRegistered => {
                tracing::info!(worker = self.id, order = %number, "Order not registered in accrual service, marking INVALID");
                (OrderStatus::Invalid, Decimal::ZERO)
            }
        };

        let applied = tokio::time::timeout(
            self.store_timeout,
            self.ledger.apply_accrual_result(number, status, accrual),
        )
        .await
        .map_err(|_| LedgerError::Timeout(self.store_timeout))??;

        Ok(applied)
    }
}
