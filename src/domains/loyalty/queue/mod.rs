// =====================================================
// 적립 작업 큐
// Accrual Queue Module
// =====================================================
// 주문 번호별 상태: Unqueued → Queued → InProgress → Unqueued
//
// 구조:
// - in_flight: 대기/처리 중인 주문 번호 집합 (중복 방지)
// - manager: 큐 생성/등록/sweep/종료
// - worker: 작업 하나 처리 (조회 → 원장 반영)
//
// 전달은 최소 한 번(at-least-once)이며,
// 원장의 적립 반영이 멱등이므로 중복 전달은 안전합니다.
// =====================================================

pub mod in_flight;
pub mod manager;
pub mod worker;

use std::time::Duration;

pub use in_flight::{InFlightSet, JobState};
pub use manager::QueueManager;

/// 큐 설정
/// Queue Manager configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// 워커 수
    pub workers: usize,
    /// 작업 채널 크기
    pub capacity: usize,
    /// sweep 주기
    pub sweep_interval: Duration,
    /// 작업 하나의 적립 조회 제한 시간
    pub job_timeout: Duration,
    /// 채널이 가득 찼을 때 등록 대기 한도
    pub enqueue_timeout: Duration,
    /// 워커/sweep의 원장 호출 하나당 제한 시간
    pub store_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            capacity: 100,
            sweep_interval: Duration::from_secs(10),
            job_timeout: Duration::from_secs(30),
            enqueue_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(5),
        }
    }
}
