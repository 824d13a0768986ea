use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::worker::Worker;
use super::{InFlightSet, JobState, QueueConfig};
use crate::domains::loyalty::ledger::LedgerStore;
use crate::shared::clients::AccrualFetcher;
use crate::shared::errors::{LedgerError, QueueError};

/// 적립 작업 큐 관리자
/// Queue Manager owning the in-flight set, work channel, worker pool and sweep
///
/// 전역 인스턴스 없이 main에서 만들어 필요한 곳(주문 서비스)에 넘깁니다.
/// Clone은 같은 큐를 공유합니다.
///
/// # 처리 흐름
/// 1. `enqueue`: in-flight 집합에 없을 때만 Queued로 표시하고 채널에 넣음
/// 2. 워커 N개가 채널에서 하나씩 꺼내 처리
/// 3. sweep이 주기적으로 비종료 주문을 다시 enqueue (재시작/유실 복구)
/// 4. `shutdown`: sweep 중지 → 채널 닫기 → 워커가 남은 작업을 비우고 종료
#[derive(Clone)]
pub struct QueueManager {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    in_flight: Arc<InFlightSet>,
    /// None이면 종료됨
    sender: RwLock<Option<mpsc::Sender<String>>>,
    ledger: Arc<dyn LedgerStore>,
    enqueue_timeout: Duration,
    store_timeout: Duration,
    /// sweep 중지
    sweep_stop: CancellationToken,
    /// 진행 중인 적립 조회 중단 (종료 유예 시간 초과 시)
    jobs_cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
    sweep: Mutex<Option<JoinHandle<()>>>,
}

impl QueueManager {
    /// 큐 생성 + 워커/sweep 시작
    /// Build the queue and spawn workers and the sweep task
    ///
    /// 첫 sweep은 바로 실행되어 재시작 전에 남은 주문을 다시 등록합니다.
    pub fn start(
        config: QueueConfig,
        ledger: Arc<dyn LedgerStore>,
        fetcher: Arc<dyn AccrualFetcher>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let in_flight = Arc::new(InFlightSet::new());
        let jobs_cancel = CancellationToken::new();

        let workers = (0..config.workers.max(1))
            .map(|id| {
                let worker = Worker {
                    id,
                    receiver: receiver.clone(),
                    in_flight: in_flight.clone(),
                    ledger: ledger.clone(),
                    fetcher: fetcher.clone(),
                    job_timeout: config.job_timeout,
                    store_timeout: config.store_timeout,
                    cancel: jobs_cancel.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        let manager = Self {
            inner: Arc::new(QueueInner {
                in_flight,
                sender: RwLock::new(Some(sender)),
                ledger,
                enqueue_timeout: config.enqueue_timeout,
                store_timeout: config.store_timeout,
                sweep_stop: CancellationToken::new(),
                jobs_cancel,
                workers: Mutex::new(workers),
                sweep: Mutex::new(None),
            }),
        };

        let sweep = manager.spawn_sweep(config.sweep_interval);
        *manager.inner.sweep.lock() = Some(sweep);

        tracing::info!(
            workers = config.workers.max(1),
            capacity = config.capacity.max(1),
            sweep_interval = ?config.sweep_interval,
            "Accrual queue started"
        );

        manager
    }

    /// 주문 번호 등록
    /// Enqueue an order number
    ///
    /// # Returns
    /// * `Ok(true)` - 새로 등록됨
    /// * `Ok(false)` - 이미 대기/처리 중 (아무것도 하지 않음)
    /// * `Err(QueueError::Full)` - 채널이 enqueue_timeout 동안 가득 참 (sweep이 나중에 다시 등록)
    /// * `Err(QueueError::Closed)` - 종료됨
    pub async fn enqueue(&self, number: &str) -> Result<bool, QueueError> {
        let sender = self.inner.sender.read().clone();
        let Some(sender) = sender else {
            return Err(QueueError::Closed);
        };

        if !self.inner.in_flight.try_mark_queued(number) {
            return Ok(false);
        }

        match sender
            .send_timeout(number.to_string(), self.inner.enqueue_timeout)
            .await
        {
            Ok(()) => Ok(true),
            Err(mpsc::error::SendTimeoutError::Timeout(_)) => {
                self.inner.in_flight.release(number);
                Err(QueueError::Full {
                    number: number.to_string(),
                })
            }
            Err(mpsc::error::SendTimeoutError::Closed(_)) => {
                self.inner.in_flight.release(number);
                Err(QueueError::Closed)
            }
        }
    }

    /// sweep 한 번 실행: 비종료 주문을 모두 enqueue
    /// Run one recovery sweep; returns how many numbers were newly queued
    pub async fn sweep_once(&self) -> Result<usize, LedgerError> {
        let limit = self.inner.store_timeout;
        let pending = tokio::time::timeout(limit, self.inner.ledger.list_pending_order_numbers())
            .await
            .map_err(|_| LedgerError::Timeout(limit))??;
        let mut queued = 0;

        for number in &pending {
            match self.enqueue(number).await {
                Ok(true) => queued += 1,
                Ok(false) => {}
                Err(QueueError::Closed) => break,
                Err(e) => {
                    tracing::warn!(order = %number, error = %e, "Sweep could not enqueue order");
                }
            }
        }

        if queued > 0 {
            tracing::info!(pending = pending.len(), queued, "Recovery sweep re-enqueued orders");
        }
        Ok(queued)
    }

    fn spawn_sweep(&self, period: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        let stop = self.inner.sweep_stop.clone();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                if let Err(e) = manager.sweep_once().await {
                    tracing::error!(error = %e, "Recovery sweep failed");
                }
            }

            tracing::debug!("Recovery sweep stopped");
        })
    }

    /// 주문 번호의 현재 큐 상태
    pub fn state_of(&self, number: &str) -> JobState {
        self.inner.in_flight.state_of(number)
    }

    /// 대기/처리 중인 작업 수
    pub fn in_flight_len(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// 종료 여부
    pub fn is_closed(&self) -> bool {
        self.inner.sender.read().is_none()
    }

    /// 큐 종료
    /// Shut the queue down
    ///
    /// 1. sweep 중지
    /// 2. 채널 닫기 (이후 enqueue는 Closed)
    /// 3. 워커가 남은 작업을 비우고 종료할 때까지 최대 `grace` 대기
    /// 4. 유예 시간을 넘기면 진행 중인 조회를 취소 (주문은 비종료 상태로 남고 재시작 후 sweep이 처리)
    pub async fn shutdown(&self, grace: Duration) {
        self.inner.sweep_stop.cancel();
        let sweep = self.inner.sweep.lock().take();
        if let Some(sweep) = sweep {
            if let Err(e) = sweep.await {
                tracing::error!(error = %e, "Recovery sweep task panicked");
            }
        }

        // 마지막 Sender를 버리면 워커의 recv가 남은 작업 이후 None을 받음
        self.inner.sender.write().take();

        let workers: Vec<JoinHandle<()>> = std::mem::take(&mut *self.inner.workers.lock());
        let mut drain = tokio::spawn(async move {
            for worker in workers {
                if let Err(e) = worker.await {
                    tracing::error!(error = %e, "Accrual worker panicked");
                }
            }
        });

        if tokio::time::timeout(grace, &mut drain).await.is_err() {
            tracing::warn!(?grace, "Accrual workers did not drain in time, cancelling jobs");
            self.inner.jobs_cancel.cancel();
            let _ = drain.await;
        }

        tracing::info!("Accrual queue stopped");
    }
}
