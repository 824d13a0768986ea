use std::collections::HashMap;
use parking_lot::Mutex;

/// 주문 번호의 큐 상태
/// Queue state of one order number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// 큐에 없음
    Unqueued,
    /// 채널에서 대기 중
    Queued,
    /// 워커가 처리 중
    InProgress,
}

/// 대기/처리 중인 주문 번호 집합
/// In-flight set guarding against duplicate work
///
/// 확인과 등록이 하나의 락 안에서 일어나므로
/// 같은 번호를 동시에 등록해도 하나만 성공합니다.
#[derive(Debug, Default)]
pub struct InFlightSet {
    jobs: Mutex<HashMap<String, JobState>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unqueued면 Queued로 바꾸고 true, 이미 있으면 false
    pub fn try_mark_queued(&self, number: &str) -> bool {
        let mut jobs = self.jobs.lock();
        if jobs.contains_key(number) {
            return false;
        }
        jobs.insert(number.to_string(), JobState::Queued);
        true
    }

    /// Queued → InProgress
    pub fn mark_in_progress(&self, number: &str) {
        self.jobs.lock().insert(number.to_string(), JobState::InProgress);
    }

    /// 집합에서 제거 (Unqueued)
    pub fn release(&self, number: &str) {
        self.jobs.lock().remove(number);
    }

    pub fn state_of(&self, number: &str) -> JobState {
        self.jobs
            .lock()
            .get(number)
            .copied()
            .unwrap_or(JobState::Unqueued)
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}
