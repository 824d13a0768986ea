// =====================================================
// 적립 큐 통합 테스트
// =====================================================
// MemoryLedgerStore + ScriptedFetcher로 큐의 중복 방지, sweep 복구,
// 실패 격리, 종료 동작을 확인합니다.
// =====================================================

mod common;
use common::*;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use loyalty_server::domains::loyalty::ledger::{LedgerStore, MemoryLedgerStore};
use loyalty_server::domains::loyalty::models::OrderStatus;
use loyalty_server::domains::loyalty::queue::{JobState, QueueConfig, QueueManager};
use loyalty_server::shared::errors::QueueError;

const WAIT: Duration = Duration::from_secs(5);

/// 테스트용 큐 설정 (sweep은 충분히 길게 해서 직접 호출)
fn test_config() -> QueueConfig {
    QueueConfig {
        workers: 2,
        capacity: 8,
        sweep_interval: Duration::from_secs(3600),
        job_timeout: Duration::from_secs(2),
        enqueue_timeout: Duration::from_millis(200),
        store_timeout: Duration::from_secs(1),
    }
}

fn start(ledger: &Arc<MemoryLedgerStore>, fetcher: &Arc<ScriptedFetcher>, config: QueueConfig) -> QueueManager {
    QueueManager::start(config, ledger.clone(), fetcher.clone())
}

async fn status_is(ledger: &MemoryLedgerStore, number: &str, status: OrderStatus) -> bool {
    ledger.order_status(number).await == Some(status)
}

/// 테스트: 대기/처리 중인 번호는 다시 등록되지 않음
#[tokio::test]
async fn test_enqueue_deduplicates_in_flight_numbers() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::Processed(Decimal::new(10, 0)));
    fetcher.set_delay(Duration::from_millis(300));
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();

    let queue = start(&ledger, &fetcher, test_config());

    // 시작 직후 sweep이 먼저 등록했을 수도 있으므로 첫 결과는 확인하지 않음
    queue.enqueue(ORDER_A).await.unwrap();
    assert_eq!(queue.enqueue(ORDER_A).await, Ok(false));

    // 처리 중에도 중복 등록 불가
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::InProgress }).await);
    assert_eq!(queue.enqueue(ORDER_A).await, Ok(false));

    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_A, OrderStatus::Processed)).await);
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::Unqueued }).await);
    assert_eq!(fetcher.calls_for(ORDER_A), 1);
    assert_eq!(ledger.get_balance(USER_A).await.unwrap().current, Decimal::new(10, 0));

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: 재시작 전에 PROCESSING으로 남은 주문을 sweep이 다시 처리
#[tokio::test]
async fn test_sweep_recovers_order_left_processing() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::Processed(Decimal::new(500, 0)));

    // 이전 프로세스가 PROCESSING 반영 후 종료된 상황
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();
    ledger.force_status(ORDER_A, OrderStatus::Processing).await;

    // 시작 직후 첫 sweep이 바로 실행됨
    let config = QueueConfig {
        sweep_interval: Duration::from_millis(50),
        ..test_config()
    };
    let queue = start(&ledger, &fetcher, config);

    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_A, OrderStatus::Processed)).await);
    assert_eq!(ledger.get_balance(USER_A).await.unwrap().current, Decimal::new(500, 0));

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: sweep_once는 비종료 주문만, 대기 중이 아닌 것만 등록
#[tokio::test]
async fn test_sweep_once_enqueues_only_pending_orders() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::Processing);
    fetcher.set(ORDER_B, Scripted::Processed(Decimal::new(5, 0)));

    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();
    ledger.save_new_order(USER_A, ORDER_B).await.unwrap();
    ledger.save_new_order(USER_A, ORDER_C).await.unwrap();
    ledger
        .apply_accrual_result(ORDER_C, OrderStatus::Invalid, Decimal::ZERO)
        .await
        .unwrap();

    let queue = start(&ledger, &fetcher, test_config());

    // 첫 sweep (시작 직후) 결과를 기다림
    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_B, OrderStatus::Processed)).await);
    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_A, OrderStatus::Processing)).await);
    assert!(wait_until(WAIT, || async { queue.in_flight_len() == 0 }).await);
    assert_eq!(fetcher.calls_for(ORDER_C), 0);

    // PROCESSING은 계속 비종료이므로 다음 sweep에서 다시 조회
    assert_eq!(queue.sweep_once().await.unwrap(), 1);
    assert!(wait_until(WAIT, || async { fetcher.calls_for(ORDER_A) == 2 }).await);
    assert_eq!(fetcher.calls_for(ORDER_B), 1);

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: 적립 서비스에 등록되지 않은 주문은 INVALID (잔고 변화 없음, 재조회 없음)
#[tokio::test]
async fn test_not_registered_marks_invalid() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::NotRegistered);
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();

    let queue = start(&ledger, &fetcher, test_config());

    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_A, OrderStatus::Invalid)).await);
    assert_eq!(ledger.get_balance(USER_A).await.unwrap().current, Decimal::ZERO);

    // 종료 상태이므로 sweep 대상이 아님
    assert_eq!(queue.sweep_once().await.unwrap(), 0);
    assert_eq!(fetcher.calls_for(ORDER_A), 1);

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: 실패한 작업이 워커 풀을 멈추지 않음
#[tokio::test]
async fn test_failing_order_does_not_stop_pool() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::ServerFault);
    fetcher.set(ORDER_B, Scripted::Processed(Decimal::new(7, 0)));
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();
    ledger.save_new_order(USER_B, ORDER_B).await.unwrap();

    // 워커 하나가 두 주문을 모두 처리 (첫 sweep이 등록)
    let config = QueueConfig {
        workers: 1,
        ..test_config()
    };
    let queue = start(&ledger, &fetcher, config);

    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_B, OrderStatus::Processed)).await);
    assert!(wait_until(WAIT, || async { fetcher.calls_for(ORDER_A) == 1 }).await);
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::Unqueued }).await);
    assert_eq!(ledger.order_status(ORDER_A).await, Some(OrderStatus::New));
    assert_eq!(ledger.get_balance(USER_B).await.unwrap().current, Decimal::new(7, 0));

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: 원장 장애 시 작업은 실패하지만 번호는 해제되어 다음 sweep에서 재처리
#[tokio::test]
async fn test_ledger_outage_leaves_order_for_next_sweep() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::Processed(Decimal::new(3, 0)));
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();

    // 장애 중에는 첫 sweep도 실패하므로 직접 등록한 작업만 실행됨
    ledger.set_unavailable(true);
    let queue = start(&ledger, &fetcher, test_config());

    assert_eq!(queue.enqueue(ORDER_A).await, Ok(true));
    assert!(wait_until(WAIT, || async { fetcher.calls_for(ORDER_A) >= 1 }).await);
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::Unqueued }).await);
    assert!(queue.sweep_once().await.is_err());

    ledger.set_unavailable(false);
    assert_eq!(ledger.order_status(ORDER_A).await, Some(OrderStatus::New));
    assert_eq!(queue.sweep_once().await.unwrap(), 1);
    assert!(wait_until(WAIT, || status_is(&ledger, ORDER_A, OrderStatus::Processed)).await);

    queue.shutdown(Duration::from_secs(1)).await;
}

/// 테스트: 종료 후 등록은 Closed, 걸린 작업은 유예 시간 후 취소
#[tokio::test]
async fn test_shutdown_closes_queue_and_cancels_stuck_jobs() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.set(ORDER_A, Scripted::Hang);
    ledger.save_new_order(USER_A, ORDER_A).await.unwrap();

    let config = QueueConfig {
        job_timeout: Duration::from_secs(60),
        ..test_config()
    };
    let queue = start(&ledger, &fetcher, config);
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::InProgress }).await);

    tokio::time::timeout(WAIT, queue.shutdown(Duration::from_millis(100)))
        .await
        .expect("shutdown should finish after cancelling stuck jobs");

    assert!(queue.is_closed());
    assert_eq!(queue.enqueue(ORDER_B).await, Err(QueueError::Closed));
    // 주문은 비종료 상태로 남아 재시작 후 sweep이 처리
    assert_eq!(ledger.order_status(ORDER_A).await, Some(OrderStatus::New));
}

/// 테스트: 채널이 가득 차면 제한 시간 후 Full (번호는 해제되어 sweep이 다시 등록 가능)
#[tokio::test]
async fn test_full_queue_reports_and_releases_number() {
    let ledger = Arc::new(MemoryLedgerStore::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    for number in [ORDER_A, ORDER_B] {
        fetcher.set(number, Scripted::Hang);
    }

    let config = QueueConfig {
        workers: 1,
        capacity: 1,
        job_timeout: Duration::from_secs(60),
        enqueue_timeout: Duration::from_millis(50),
        ..test_config()
    };
    let queue = start(&ledger, &fetcher, config);

    // 워커 하나가 ORDER_A에 걸려 있고, ORDER_B가 채널을 채움
    assert_eq!(queue.enqueue(ORDER_A).await, Ok(true));
    assert!(wait_until(WAIT, || async { queue.state_of(ORDER_A) == JobState::InProgress }).await);
    assert_eq!(queue.enqueue(ORDER_B).await, Ok(true));

    let result = queue.enqueue(ORDER_C).await;
    assert_eq!(
        result,
        Err(QueueError::Full {
            number: ORDER_C.to_string()
        })
    );
    assert_eq!(queue.state_of(ORDER_C), JobState::Unqueued);

    queue.shutdown(Duration::from_millis(50)).await;
}
